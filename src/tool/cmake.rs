//! CMake command contract

use super::{Invocation, OutputMode, Tool, ToolRunner};
use crate::build_type::BuildType;
use crate::error::LuxResult;
use std::fmt;
use std::path::Path;

/// CMake preset categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PresetType {
    Configure,
    Build,
    Test,
    Package,
}

impl PresetType {
    pub const ALL: [PresetType; 4] = [
        PresetType::Configure,
        PresetType::Build,
        PresetType::Test,
        PresetType::Package,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configure => "configure",
            Self::Build => "build",
            Self::Test => "test",
            Self::Package => "package",
        }
    }
}

impl fmt::Display for PresetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CMake driven through presets
pub struct CMake<'a> {
    runner: &'a dyn ToolRunner,
}

impl<'a> CMake<'a> {
    pub fn new(runner: &'a dyn ToolRunner) -> Self {
        Self { runner }
    }

    async fn exec(&self, args: Vec<String>) -> LuxResult<()> {
        let invocation = Invocation::new(Tool::CMake, args).with_output(OutputMode::Stream);
        self.runner.run(&invocation).await?;
        Ok(())
    }

    /// Configure `source_dir` with a configure preset
    pub async fn configure(
        &self,
        preset: &str,
        install_prefix: &Path,
        source_dir: &Path,
    ) -> LuxResult<()> {
        self.exec(vec![
            "--preset".to_string(),
            preset.to_string(),
            format!("-DCMAKE_INSTALL_PREFIX={}", install_prefix.display()),
            "-S".to_string(),
            source_dir.display().to_string(),
        ])
        .await
    }

    /// Build one target through a build preset
    pub async fn build(&self, preset: &str, target: &str) -> LuxResult<()> {
        self.exec(vec![
            "--build".to_string(),
            "--preset".to_string(),
            preset.to_string(),
            "--target".to_string(),
            target.to_string(),
        ])
        .await
    }

    /// Run the `clean` target of a build preset
    pub async fn clean(&self, preset: &str) -> LuxResult<()> {
        self.build(preset, "clean").await
    }

    /// Install one component of a configured build tree
    pub async fn install(
        &self,
        build_dir: &Path,
        prefix: &Path,
        config: BuildType,
        component: &str,
    ) -> LuxResult<()> {
        self.exec(vec![
            "--install".to_string(),
            build_dir.display().to_string(),
            "--prefix".to_string(),
            prefix.display().to_string(),
            "--config".to_string(),
            config.to_string(),
            "--component".to_string(),
            component.to_string(),
        ])
        .await
    }

    /// Names of the presets of one category
    pub async fn list_presets(&self, preset_type: PresetType) -> LuxResult<Vec<String>> {
        let invocation = Invocation::new(
            Tool::CMake,
            [format!("--list-presets={}", preset_type)],
        );
        let output = self.runner.run(&invocation).await?;
        Ok(parse_presets(&output.stdout))
    }
}

/// Extract preset names from `cmake --list-presets` output.
///
/// Preset lines look like `  "conan-release" - 'conan-release' config`.
pub fn parse_presets(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(preset_from_line)
        .map(str::to_string)
        .collect()
}

fn preset_from_line(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix('"')?;
    let end = rest.find('"')?;
    let name = &rest[..end];
    let valid = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic() || c == '-');
    valid.then_some(name)
}
