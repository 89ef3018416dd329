//! Settings and project layout

pub mod schema;

pub use schema::Settings;

use crate::build_type::BuildType;
use crate::error::{LuxError, LuxResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Default settings file, relative to the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "luxcore.json";

/// Settings loader
pub struct SettingsLoader {
    settings_path: PathBuf,
}

impl SettingsLoader {
    /// Create a loader for `luxcore.json` in the working directory
    pub fn new() -> Self {
        Self {
            settings_path: PathBuf::from(DEFAULT_SETTINGS_FILE),
        }
    }

    /// Create a loader with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            settings_path: path,
        }
    }

    /// Load and validate the settings file. A missing file is an error.
    pub async fn load(&self) -> LuxResult<Settings> {
        let path = &self.settings_path;
        if !path.exists() {
            return Err(LuxError::ConfigNotFound(path.clone()));
        }

        debug!("Reading settings from {}", path.display());
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| LuxError::io(format!("reading settings from {}", path.display()), e))?;

        serde_json::from_str(&content).map_err(|e| LuxError::ConfigInvalid {
            path: path.clone(),
            reason: e.to_string(),
        })
    }

    /// Get the settings file path
    pub fn path(&self) -> &Path {
        &self.settings_path
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Where sources, build trees and installs live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    binary_dir: PathBuf,
    source_dir: PathBuf,
    build_type: String,
}

impl ProjectLayout {
    /// The build type is kept as given and only validated by the commands
    /// that need it, so `clear` keeps working with a bad value.
    pub fn new(binary_dir: PathBuf, source_dir: PathBuf, build_type: impl Into<String>) -> Self {
        Self {
            binary_dir,
            source_dir,
            build_type: build_type.into(),
        }
    }

    /// Root of every generated directory
    pub fn binary_dir(&self) -> &Path {
        &self.binary_dir
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// CMake build tree
    pub fn build_dir(&self) -> PathBuf {
        self.binary_dir.join("build")
    }

    /// Deployed dependency tree
    pub fn dependencies_dir(&self) -> PathBuf {
        self.binary_dir.join("dependencies")
    }

    /// Parent of the per-build-type install trees
    pub fn install_root(&self) -> PathBuf {
        self.binary_dir.join("install")
    }

    /// Install prefix for one build type
    pub fn install_dir(&self, build_type: BuildType) -> PathBuf {
        self.install_root().join(build_type.as_str())
    }

    /// The configured build type
    pub fn build_type(&self) -> LuxResult<BuildType> {
        self.build_type.parse()
    }
}
