//! Conan 2 command contract

use super::{EnvOverlay, Invocation, OutputMode, Tool, ToolOutput, ToolRunner};
use crate::build_type::BuildType;
use crate::error::{LuxError, LuxResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Package pattern matching every recipe in the cache
const ALL_PACKAGES: &str = "*";

/// CMake generator requested from the Conan toolchain
const CMAKE_GENERATOR: &str = "Ninja Multi-Config";

/// Conan invoked against a fixed environment overlay
pub struct Conan<'a> {
    runner: &'a dyn ToolRunner,
    env: EnvOverlay,
}

impl<'a> Conan<'a> {
    pub fn new(runner: &'a dyn ToolRunner, env: EnvOverlay) -> Self {
        Self { runner, env }
    }

    /// Overlay passed to every call except [`Conan::default_home`]
    pub fn env(&self) -> &EnvOverlay {
        &self.env
    }

    async fn exec(&self, args: Vec<String>, output: OutputMode) -> LuxResult<ToolOutput> {
        let invocation = Invocation::new(Tool::Conan, args)
            .with_env(self.env.clone())
            .with_output(output);
        self.runner.run(&invocation).await
    }

    /// Remove every package from the cache
    pub async fn remove_all(&self) -> LuxResult<()> {
        let output = self
            .exec(
                vec!["remove".into(), "-c".into(), ALL_PACKAGES.into()],
                OutputMode::Capture,
            )
            .await?;
        output.log_stderr();
        Ok(())
    }

    /// Home of the caller's own Conan installation.
    ///
    /// Queried without the overlay so the answer is the ambient home, not the
    /// isolated one.
    pub async fn default_home(&self) -> LuxResult<PathBuf> {
        let output = self
            .runner
            .run(&Invocation::new(Tool::Conan, ["config", "home"]))
            .await?;
        let home = output.stdout.trim();
        if home.is_empty() {
            return Err(LuxError::Internal(
                "conan config home returned an empty path".to_string(),
            ));
        }
        debug!("Default Conan home: {}", home);
        Ok(PathBuf::from(home))
    }

    /// Restore cache contents from a `conan cache save` archive
    pub async fn restore(&self, archive: &Path) -> LuxResult<()> {
        let output = self
            .exec(
                vec![
                    "cache".into(),
                    "restore".into(),
                    archive.display().to_string(),
                ],
                OutputMode::Capture,
            )
            .await?;
        output.log_stderr();
        Ok(())
    }

    /// Verify every package in the cache; any corruption is fatal
    pub async fn check_integrity(&self) -> LuxResult<()> {
        let result = self
            .exec(
                vec![
                    "cache".into(),
                    "check-integrity".into(),
                    ALL_PACKAGES.into(),
                ],
                OutputMode::Capture,
            )
            .await;

        match result {
            Ok(output) => {
                output.log_stderr();
                Ok(())
            }
            Err(LuxError::ToolFailed { stdout, stderr, .. }) => {
                Err(LuxError::IntegrityFailure { stdout, stderr })
            }
            Err(e) => Err(e),
        }
    }

    /// Install a configuration package (profiles, settings) by reference
    pub async fn install_config_package(&self, reference: &str) -> LuxResult<()> {
        info!("Installing configuration package {}", reference);
        self.exec(
            vec!["config".into(), "install-pkg".into(), reference.into()],
            OutputMode::Stream,
        )
        .await?;
        Ok(())
    }

    /// Generate build files and deploy dependencies for one build type
    pub async fn install(&self, request: &InstallRequest<'_>) -> LuxResult<()> {
        self.exec(request.args(), OutputMode::Stream).await?;
        Ok(())
    }
}

/// Arguments of one `conan install` run
#[derive(Debug, Clone)]
pub struct InstallRequest<'r> {
    /// Profile applied to both host and build contexts
    pub profile: &'r str,
    /// Root of the generated files; dependencies land in `<output>/dependencies`
    pub output_dir: &'r Path,
    /// Directory holding the consumer conanfile
    pub recipe_dir: &'r Path,
    pub build_type: BuildType,
}

impl InstallRequest<'_> {
    /// Full argument list, `install` subcommand included.
    ///
    /// Dependencies are always Release; only the consumer (`&`) switches
    /// build type, so Debug builds link against Release dependencies.
    pub fn args(&self) -> Vec<String> {
        vec![
            "install".to_string(),
            "--build=missing".to_string(),
            format!("--profile:all={}", self.profile),
            "--deployer=full_deploy".to_string(),
            format!(
                "--deployer-folder={}",
                self.output_dir.join("dependencies").display()
            ),
            format!("--output-folder={}", self.output_dir.display()),
            "--settings=build_type=Release".to_string(),
            format!(
                "--conf:all=tools.cmake.cmaketoolchain:generator={}",
                CMAKE_GENERATOR
            ),
            format!("--settings=&:build_type={}", self.build_type),
            self.recipe_dir.display().to_string(),
        ]
    }
}
