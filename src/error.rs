//! Error types for luxbuild
//!
//! All modules use `LuxResult<T>` as their return type. Every variant is
//! fatal except where a caller explicitly downgrades it (attestation).

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for luxbuild operations
pub type LuxResult<T> = Result<T, LuxError>;

/// All errors that can occur in luxbuild
#[derive(Error, Debug)]
pub enum LuxError {
    // Environment errors
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Required tool not found: {name}")]
    ToolNotFound { name: String },

    // Configuration errors
    #[error("Invalid settings at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Settings file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Unknown build type '{given}'. Valid values (case sensitive) are: {}", .valid.join(", "))]
    UnknownBuildType {
        given: String,
        valid: Vec<&'static str>,
    },

    #[error("Preset '{preset}' missing. Available presets: {}", .available.join(", "))]
    PresetMissing {
        preset: String,
        available: Vec<String>,
    },

    // Process errors
    #[error("Failed to launch: {command}")]
    ToolLaunch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error while executing {command} (exit code: {})", .code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    ToolFailed {
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    // Dependency errors
    #[error("Cache integrity check failed")]
    IntegrityFailure { stdout: String, stderr: String },

    #[error("Download failed: {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("Invalid archive {path}: {reason}")]
    Archive { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LuxError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a tool launch error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::ToolLaunch {
            command: command.into(),
            source,
        }
    }

    /// Captured stdout/stderr of the failing invocation, if any
    pub fn diagnostics(&self) -> Option<(&str, &str)> {
        match self {
            Self::ToolFailed { stdout, stderr, .. } | Self::IntegrityFailure { stdout, stderr } => {
                Some((stdout, stderr))
            }
            _ => None,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ToolNotFound { name } => match name.as_str() {
                "conan" => Some("Install Conan 2: pip install conan"),
                "cmake" => Some("Install CMake from https://cmake.org/download/"),
                _ => None,
            },
            Self::ConfigNotFound(_) => {
                Some("Run from the project root or pass --settings <path to luxcore.json>")
            }
            Self::PresetMissing { .. } => Some("Run: luxbuild deps && luxbuild config"),
            Self::IntegrityFailure { .. } => {
                Some("The dependency bundle is corrupted; run 'luxbuild deps' again")
            }
            _ => None,
        }
    }
}
