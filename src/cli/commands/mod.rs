//! CLI command implementations

pub mod build;
pub mod clean;
pub mod clear;
pub mod config;
pub mod deps;
pub mod presets;

pub use build::{build_and_install, install};
pub use clean::execute as clean;
pub use clear::execute as clear;
pub use config::execute as config;
pub use deps::execute as deps;
pub use presets::execute as list_presets;
