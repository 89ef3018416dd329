//! Terminal output
//!
//! Uses `cliclack` for framed step output in interactive terminals and
//! falls back to plain, prefix-tagged lines in CI and pipes.
//!
//! Diagnostics go through `tracing`; this module only renders results the
//! user asked for (banners, preset listings, summaries).

mod context;
mod output;
mod progress;

pub use context::UiContext;
pub use output::{
    intro, key_value, key_value_status, outro_success, remark, section, step_ok, step_warn,
};
pub use progress::DownloadProgress;
