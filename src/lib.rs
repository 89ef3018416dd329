//! luxbuild - LuxCore build driver
//!
//! Installs the pinned LuxCore dependency bundle into an isolated Conan
//! cache, deploys it for each build type and drives CMake through the
//! generated presets.

pub mod build_type;
pub mod cli;
pub mod config;
pub mod deps;
pub mod error;
pub mod platform;
pub mod preset;
pub mod tool;
pub mod ui;

pub use error::{LuxError, LuxResult};
