//! Dependency pipeline
//!
//! Fetches the pinned dependency bundle, loads it into an isolated Conan
//! cache and deploys it for every requested build type:
//!
//! ```text
//! IDENTIFY_PLATFORM -> ACQUIRE_ARCHIVE -> CLEAN_CACHE -> COPY_CONFIG
//!   -> RESTORE_CACHE -> CHECK_INTEGRITY -> INSTALL_PROFILES
//!   -> GENERATE_AND_DEPLOY (per build type) -> LIST_PRESETS
//! ```
//!
//! `ACQUIRE_ARCHIVE` is skipped when a local archive is supplied. The first
//! failing step ends the run.

mod cache;
mod fetch;
mod profile;
mod release;

pub use cache::{copy_global_conf, install_cache, GLOBAL_CONF};
pub use fetch::{
    extract_zip, fetch, sha256_file, verify_and_extract, verify_attestation, Archive,
    Attestation, ATTESTATION_OWNER, CACHE_ARCHIVE_NAME,
};
pub use profile::{profile_name, resolve_profile, PROFILE_PREFIX};
pub use release::{DependencyRelease, BUNDLE_PREFIX, BUNDLE_REPO, DEFAULT_OWNER};

use crate::build_type::BuildType;
use crate::config::Settings;
use crate::error::{LuxError, LuxResult};
use crate::platform::PlatformTag;
use crate::tool::{CMake, Conan, EnvOverlay, InstallRequest, PresetType, ToolRunner};
use crate::ui::UiContext;
use std::fmt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{info, warn};

/// Name of the isolated Conan home inside the workspace
const CACHE_HOME_DIR: &str = ".conan2";

/// Build type exported to the recipe through the environment
const RECIPE_BUILD_TYPE: BuildType = BuildType::Release;

/// Pipeline states, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    IdentifyPlatform,
    AcquireArchive,
    CleanCache,
    CopyConfig,
    RestoreCache,
    CheckIntegrity,
    InstallProfiles,
    GenerateAndDeploy(BuildType),
    ListPresets,
}

impl Stage {
    /// Log the transition into this stage
    pub fn enter(self) {
        info!("{}", self);
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdentifyPlatform => f.write_str("Identifying platform"),
            Self::AcquireArchive => f.write_str("Downloading dependencies"),
            Self::CleanCache => f.write_str("Cleaning local cache"),
            Self::CopyConfig => f.write_str("Copying global configuration"),
            Self::RestoreCache => f.write_str("Installing"),
            Self::CheckIntegrity => f.write_str("Checking integrity"),
            Self::InstallProfiles => f.write_str("Installing profiles"),
            Self::GenerateAndDeploy(bt) => write!(f, "Generating '{}'", bt),
            Self::ListPresets => f.write_str("Listing build presets"),
        }
    }
}

/// Per-run scratch directory. Removed when dropped.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh workspace, under `root` if given, else the system temp dir
    pub fn create(root: Option<&Path>) -> LuxResult<Self> {
        let dir = match root {
            Some(root) => TempDir::new_in(root),
            None => TempDir::new(),
        }
        .map_err(|e| LuxError::io("creating pipeline workspace", e))?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Conan home used instead of the caller's own
    pub fn cache_home(&self) -> PathBuf {
        self.dir.path().join(CACHE_HOME_DIR)
    }

    /// Remove the workspace, reporting removal errors
    pub fn close(self) -> LuxResult<()> {
        self.dir
            .close()
            .map_err(|e| LuxError::io("removing pipeline workspace", e))
    }
}

/// Options of one pipeline run
#[derive(Debug, Clone)]
pub struct DepsOptions {
    /// Root of the generated tree (`<output>/dependencies`, presets, ...)
    pub output_dir: PathBuf,
    /// Directory holding the consumer conanfile
    pub recipe_dir: PathBuf,
    /// Use this cache archive instead of downloading the bundle
    pub local: Option<PathBuf>,
    /// Also deploy RelWithDebInfo and MinSizeRel
    pub extended: bool,
    /// Parent of the per-run workspace (system temp dir if unset)
    pub workspace_root: Option<PathBuf>,
}

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct DepsReport {
    pub platform: PlatformTag,
    pub release: DependencyRelease,
    pub profile: String,
    pub build_types: Vec<BuildType>,
    /// `None` for local archives
    pub attestation: Option<Attestation>,
    /// Build presets visible after deployment
    pub presets: Vec<String>,
}

/// Environment overlay for every Conan call of a run
pub fn conan_env(cache_home: &Path, settings: &Settings) -> EnvOverlay {
    EnvOverlay::new()
        .with("CONAN_HOME", cache_home.display().to_string())
        .with("GCC_VERSION", settings.build.gcc.to_string())
        .with("CXX_VERSION", settings.build.cxx.to_string())
        .with("BUILD_TYPE", RECIPE_BUILD_TYPE.as_str())
}

/// Run the whole pipeline.
pub async fn run(
    runner: &dyn ToolRunner,
    ctx: &UiContext,
    settings: &Settings,
    options: &DepsOptions,
) -> LuxResult<DepsReport> {
    Stage::IdentifyPlatform.enter();
    let platform = PlatformTag::identify()?;
    info!("Platform: {}", platform);

    let release = DependencyRelease::from_settings(settings);
    let workspace = Workspace::create(options.workspace_root.as_deref())?;
    let conan = Conan::new(runner, conan_env(&workspace.cache_home(), settings));

    let (archive, attestation) = match &options.local {
        Some(local) => {
            info!("Using local dependency set ('{}')", local.display());
            (Archive::local(local)?, None)
        }
        None => {
            Stage::AcquireArchive.enter();
            let url = release.download_url(platform);
            info!("Downloading dependencies (url='{}')", url);
            let (archive, attestation) = fetch(runner, ctx, &url, workspace.path()).await?;
            (archive, Some(attestation))
        }
    };

    install_cache(&conan, &archive, &workspace.cache_home()).await?;

    Stage::InstallProfiles.enter();
    let profile = resolve_profile(&conan, &release, platform).await?;

    let build_types = BuildType::selection(options.extended);
    for &build_type in build_types {
        Stage::GenerateAndDeploy(build_type).enter();
        conan
            .install(&InstallRequest {
                profile: &profile,
                output_dir: &options.output_dir,
                recipe_dir: &options.recipe_dir,
                build_type,
            })
            .await?;
    }

    Stage::ListPresets.enter();
    let presets = match CMake::new(runner).list_presets(PresetType::Build).await {
        Ok(presets) => presets,
        Err(e) => {
            warn!("Could not list build presets: {}", e);
            Vec::new()
        }
    };

    workspace.close()?;

    Ok(DepsReport {
        platform,
        release,
        profile,
        build_types: build_types.to_vec(),
        attestation,
        presets,
    })
}
