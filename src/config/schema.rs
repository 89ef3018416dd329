//! Settings schema
//!
//! Settings are read from `luxcore.json` at the project root:
//!
//! ```json
//! {
//!   "Dependencies": { "user": "LuxCoreRender", "release": "2.10.0" },
//!   "Build": { "gcc": 14, "cxx": 20 }
//! }
//! ```
//!
//! Every key above is required. Other keys are ignored.

use serde::Deserialize;
use std::fmt;

/// Root settings structure
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Pinned dependency bundle
    #[serde(rename = "Dependencies")]
    pub dependencies: DependencySettings,

    /// Toolchain versions exported to the package tool
    #[serde(rename = "Build")]
    pub build: BuildSettings,
}

/// Dependency bundle coordinates
#[derive(Debug, Clone, Deserialize)]
pub struct DependencySettings {
    /// GitHub owner publishing the bundle (empty selects the default owner)
    pub user: String,

    /// Bundle release version, without the leading `v`
    pub release: String,
}

/// Compiler versions
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSettings {
    pub gcc: SettingValue,
    pub cxx: SettingValue,
}

/// A scalar that may be written as a string or a number
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}
