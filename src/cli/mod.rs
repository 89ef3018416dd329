//! Command-line interface

mod args;
pub mod commands;

pub use args::{Cli, Commands, DepsArgs, TargetArgs};

use crate::config::ProjectLayout;
use crate::error::{LuxError, LuxResult};

impl Cli {
    /// Directory layout selected by the global options
    pub fn layout(&self) -> LuxResult<ProjectLayout> {
        let source_dir = match &self.source_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()
                .map_err(|e| LuxError::io("getting current directory", e))?,
        };
        Ok(ProjectLayout::new(
            self.binary_dir.clone(),
            source_dir,
            self.build_type.clone(),
        ))
    }
}
