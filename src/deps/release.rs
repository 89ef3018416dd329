//! Pinned dependency release coordinates

use crate::config::Settings;
use crate::platform::PlatformTag;

/// Owner used when the settings leave `Dependencies.user` empty
pub const DEFAULT_OWNER: &str = "LuxCoreRender";

/// Repository publishing the dependency bundles
pub const BUNDLE_REPO: &str = "LuxCoreDeps";

/// File name prefix of the bundle assets
pub const BUNDLE_PREFIX: &str = "luxcore-deps";

const RELEASE_HOST: &str = "https://github.com";

/// Identifies a pinned dependency bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRelease {
    owner: String,
    version: String,
}

impl DependencyRelease {
    pub fn new(owner: impl Into<String>, version: impl Into<String>) -> Self {
        let owner = owner.into();
        Self {
            owner: if owner.is_empty() {
                DEFAULT_OWNER.to_string()
            } else {
                owner
            },
            version: version.into(),
        }
    }

    /// Release pinned by the settings file
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.dependencies.user.clone(),
            settings.dependencies.release.clone(),
        )
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Download URL of the bundle built for `platform`
    pub fn download_url(&self, platform: PlatformTag) -> String {
        format!(
            "{}/{}/{}/releases/download/v{}/{}-{}.zip",
            RELEASE_HOST,
            self.owner,
            BUNDLE_REPO,
            self.version,
            BUNDLE_PREFIX,
            platform.url_suffix()
        )
    }

    /// Conan reference of the configuration package shipped with the release
    pub fn profile_package(&self) -> String {
        format!("luxcoreconf/{}@luxcore/luxcore", self.version)
    }
}
