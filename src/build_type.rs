//! Logical build types and their preset names

use crate::error::{LuxError, LuxResult};
use std::fmt;
use std::str::FromStr;

/// Prefix of the presets generated by the Conan CMake toolchain
pub const PRESET_PREFIX: &str = "conan";

/// Build configuration, in processing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuildType {
    Debug,
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    /// Every build type, standard ones first
    pub const ALL: [BuildType; 4] = [
        BuildType::Debug,
        BuildType::Release,
        BuildType::RelWithDebInfo,
        BuildType::MinSizeRel,
    ];

    /// Build types installed by the dependency pipeline
    pub fn selection(extended: bool) -> &'static [BuildType] {
        if extended {
            &Self::ALL
        } else {
            &Self::ALL[..2]
        }
    }

    /// CMake spelling of the build type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
            Self::RelWithDebInfo => "RelWithDebInfo",
            Self::MinSizeRel => "MinSizeRel",
        }
    }

    /// Whether the build type is only installed with `--extended`
    pub fn is_extended(&self) -> bool {
        matches!(self, Self::RelWithDebInfo | Self::MinSizeRel)
    }

    /// Name of the build preset for this build type (`conan-release`, ...)
    pub fn preset_name(&self) -> String {
        format!("{}-{}", PRESET_PREFIX, self.as_str().to_lowercase())
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildType {
    type Err = LuxError;

    fn from_str(s: &str) -> LuxResult<Self> {
        Self::ALL
            .into_iter()
            .find(|bt| bt.as_str() == s)
            .ok_or_else(|| LuxError::UnknownBuildType {
                given: s.to_string(),
                valid: Self::ALL.map(|bt| bt.as_str()).to_vec(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_sensitive() {
        assert_eq!("Release".parse::<BuildType>().unwrap(), BuildType::Release);
        assert_eq!(
            "RelWithDebInfo".parse::<BuildType>().unwrap(),
            BuildType::RelWithDebInfo
        );
        let err = "release".parse::<BuildType>().unwrap_err();
        match err {
            LuxError::UnknownBuildType { given, valid } => {
                assert_eq!(given, "release");
                assert_eq!(valid, vec!["Debug", "Release", "RelWithDebInfo", "MinSizeRel"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn preset_names() {
        assert_eq!(BuildType::Release.preset_name(), "conan-release");
        assert_eq!(BuildType::Debug.preset_name(), "conan-debug");
        assert_eq!(BuildType::RelWithDebInfo.preset_name(), "conan-relwithdebinfo");
        assert_eq!(BuildType::MinSizeRel.preset_name(), "conan-minsizerel");
    }

    #[test]
    fn selection_keeps_order() {
        assert_eq!(
            BuildType::selection(false),
            &[BuildType::Debug, BuildType::Release]
        );
        assert_eq!(BuildType::selection(true).len(), 4);
        assert!(BuildType::selection(true)[2..].iter().all(|bt| bt.is_extended()));
    }
}
