//! Preset orchestrator
//!
//! Maps the logical build type onto CMake presets and drives CMake for the
//! `config`, `build-and-install`, `install`, `clean`, `clear` and
//! `list-presets` commands. Every tool failure ends the command.

use crate::config::ProjectLayout;
use crate::error::{LuxError, LuxResult};
use crate::tool::{CMake, PresetType, ToolRunner};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info};

/// Configure preset written by the Conan toolchain
pub const CONFIGURE_PRESET: &str = "conan-default";

/// Subdirectories of the binary dir owned by luxbuild
pub const CLEARABLE_SUBDIRS: [&str; 3] = ["build", "dependencies", "install"];

/// Drives CMake for one project layout
pub struct Orchestrator<'a> {
    cmake: CMake<'a>,
    layout: &'a ProjectLayout,
}

impl<'a> Orchestrator<'a> {
    pub fn new(runner: &'a dyn ToolRunner, layout: &'a ProjectLayout) -> Self {
        Self {
            cmake: CMake::new(runner),
            layout,
        }
    }

    /// Configure the build tree with the Conan-generated configure preset
    pub async fn config(&self) -> LuxResult<()> {
        let build_type = self.layout.build_type()?;
        let prefix = self.layout.install_dir(build_type);
        info!("Configuring (install prefix '{}')", prefix.display());
        self.cmake
            .configure(CONFIGURE_PRESET, &prefix, self.layout.source_dir())
            .await
    }

    /// Build preset for the configured build type.
    ///
    /// The build type is validated before CMake is called; the preset must
    /// appear in `cmake --list-presets=build`.
    pub async fn resolve_preset(&self) -> LuxResult<String> {
        let build_type = self.layout.build_type()?;
        let preset = build_type.preset_name();
        let available = self.cmake.list_presets(PresetType::Build).await?;
        if !available.contains(&preset) {
            return Err(LuxError::PresetMissing { preset, available });
        }
        debug!("Using preset '{}'", preset);
        Ok(preset)
    }

    /// Build `target` then install its component
    pub async fn build_and_install(&self, target: &str) -> LuxResult<()> {
        let preset = self.resolve_preset().await?;
        info!("Building '{}' with preset '{}'", target, preset);
        self.cmake.build(&preset, target).await?;
        self.install(target).await
    }

    /// Install the `target` component of the build tree
    pub async fn install(&self, target: &str) -> LuxResult<()> {
        let build_type = self.layout.build_type()?;
        let prefix = self.layout.install_dir(build_type);
        info!("Installing '{}' into '{}'", target, prefix.display());
        self.cmake
            .install(&self.layout.build_dir(), &prefix, build_type, target)
            .await
    }

    /// Run the `clean` target of every build preset
    pub async fn clean(&self) -> LuxResult<Vec<String>> {
        let presets = self.cmake.list_presets(PresetType::Build).await?;
        for preset in &presets {
            info!("Cleaning preset '{}'", preset);
            self.cmake.clean(preset).await?;
        }
        Ok(presets)
    }

    /// All presets, grouped by category
    pub async fn list_all_presets(&self) -> LuxResult<BTreeMap<PresetType, Vec<String>>> {
        let mut listing = BTreeMap::new();
        for preset_type in PresetType::ALL {
            let presets = self.cmake.list_presets(preset_type).await?;
            listing.insert(preset_type, presets);
        }
        Ok(listing)
    }
}

/// Remove the generated subdirectories of the binary dir.
///
/// Missing directories are skipped. Returns the directories removed.
pub async fn clear_binary_dir(layout: &ProjectLayout) -> LuxResult<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for name in CLEARABLE_SUBDIRS {
        let dir = layout.binary_dir().join(name);
        match fs::remove_dir_all(&dir).await {
            Ok(()) => {
                info!("Removed '{}'", dir.display());
                removed.push(dir);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("'{}' not present", dir.display());
            }
            Err(e) => {
                return Err(LuxError::io(format!("removing {}", dir.display()), e));
            }
        }
    }
    Ok(removed)
}
