//! Build profile installation

use super::release::DependencyRelease;
use crate::error::LuxResult;
use crate::platform::PlatformTag;
use crate::tool::Conan;

/// Prefix shared by the profiles shipped in the configuration package
pub const PROFILE_PREFIX: &str = "conan-profile";

/// Profile name for a platform (`conan-profile-Linux-X64`, ...)
pub fn profile_name(platform: PlatformTag) -> String {
    format!("{}-{}", PROFILE_PREFIX, platform)
}

/// Install the release's configuration package and return the profile to
/// use on `platform`.
pub async fn resolve_profile(
    conan: &Conan<'_>,
    release: &DependencyRelease,
    platform: PlatformTag,
) -> LuxResult<String> {
    conan
        .install_config_package(&release.profile_package())
        .await?;
    Ok(profile_name(platform))
}
