//! Host platform identification
//!
//! Maps the host OS and CPU architecture onto the fixed set of platforms the
//! dependency bundles are published for. Unknown hosts are an error, never a
//! fallback.

use crate::error::{LuxError, LuxResult};
use std::fmt;

/// Supported {OS x architecture} pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformTag {
    /// Linux, x86_64
    LinuxX64,
    /// Windows, x86_64
    WindowsX64,
    /// macOS, Apple Silicon
    MacOsArm64,
    /// macOS, Intel
    MacOsX64,
}

impl PlatformTag {
    /// All supported platforms
    pub const ALL: [PlatformTag; 4] = [
        PlatformTag::LinuxX64,
        PlatformTag::WindowsX64,
        PlatformTag::MacOsArm64,
        PlatformTag::MacOsX64,
    ];

    /// Identify the platform this process runs on
    pub fn identify() -> LuxResult<Self> {
        Self::from_host(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Resolve a platform from a reported OS name and machine architecture.
    ///
    /// Accepts both Rust target names (`macos`, `aarch64`) and the names
    /// reported by `uname` (`Darwin`, `arm64`).
    pub fn from_host(os: &str, arch: &str) -> LuxResult<Self> {
        match os.to_ascii_lowercase().as_str() {
            "linux" => Ok(Self::LinuxX64),
            "windows" => Ok(Self::WindowsX64),
            "macos" | "darwin" => match arch.to_ascii_lowercase().as_str() {
                "arm64" | "aarch64" => Ok(Self::MacOsArm64),
                "x86_64" => Ok(Self::MacOsX64),
                _ => Err(LuxError::UnsupportedPlatform(format!(
                    "unknown machine for macOS: '{}'",
                    arch
                ))),
            },
            _ => Err(LuxError::UnsupportedPlatform(format!(
                "unknown system '{}'. Supported: {}",
                os,
                Self::ALL.map(|p| p.as_str()).join(", ")
            ))),
        }
    }

    /// Tag as used in profile names
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LinuxX64 => "Linux-X64",
            Self::WindowsX64 => "Windows-X64",
            Self::MacOsArm64 => "macOS-ARM64",
            Self::MacOsX64 => "macOS-X64",
        }
    }

    /// Suffix of the bundle published for this platform
    pub fn url_suffix(&self) -> &'static str {
        match self {
            Self::LinuxX64 => "ubuntu-latest",
            Self::WindowsX64 => "windows-latest",
            Self::MacOsArm64 => "macos-14",
            Self::MacOsX64 => "macos-13",
        }
    }
}

impl fmt::Display for PlatformTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_hosts() {
        let cases = [
            ("Linux", "x86_64", PlatformTag::LinuxX64),
            ("linux", "x86_64", PlatformTag::LinuxX64),
            ("Windows", "AMD64", PlatformTag::WindowsX64),
            ("windows", "x86_64", PlatformTag::WindowsX64),
            ("Darwin", "arm64", PlatformTag::MacOsArm64),
            ("macos", "aarch64", PlatformTag::MacOsArm64),
            ("Darwin", "x86_64", PlatformTag::MacOsX64),
        ];
        for (os, arch, expected) in cases {
            assert_eq!(PlatformTag::from_host(os, arch).unwrap(), expected);
        }
    }

    #[test]
    fn unsupported_hosts_are_errors() {
        for (os, arch) in [("FreeBSD", "x86_64"), ("Darwin", "ppc"), ("", "")] {
            let err = PlatformTag::from_host(os, arch).unwrap_err();
            assert!(matches!(err, LuxError::UnsupportedPlatform(_)));
        }
    }

    #[test]
    fn identify_is_idempotent() {
        let first = PlatformTag::identify().ok();
        let second = PlatformTag::identify().ok();
        assert_eq!(first, second);
    }

    #[test]
    fn names_and_suffixes() {
        assert_eq!(PlatformTag::MacOsArm64.to_string(), "macOS-ARM64");
        assert_eq!(PlatformTag::LinuxX64.url_suffix(), "ubuntu-latest");
        assert_eq!(PlatformTag::MacOsX64.url_suffix(), "macos-13");
    }
}
