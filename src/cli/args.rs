//! CLI argument definitions using clap derive

use crate::config::DEFAULT_SETTINGS_FILE;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// LuxCore build driver
///
/// Installs the pinned LuxCore dependency set into an isolated Conan cache
/// and drives CMake through the generated presets.
#[derive(Parser, Debug)]
#[command(name = "luxbuild")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Root of the generated tree
    #[arg(long, global = true, env = "LUX_BINARY_DIR", default_value = "out")]
    pub binary_dir: PathBuf,

    /// Project source directory (defaults to the working directory)
    #[arg(long, global = true, env = "LUX_SOURCE_DIR")]
    pub source_dir: Option<PathBuf>,

    /// Build type: Debug, Release, RelWithDebInfo or MinSizeRel
    #[arg(long, global = true, env = "LUX_BUILD_TYPE", default_value = "Release")]
    pub build_type: String,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configure the build tree from the Conan-generated preset
    Config,

    /// Build a target and install its component
    BuildAndInstall(TargetArgs),

    /// Install a target's component from the build tree
    Install(TargetArgs),

    /// Run the clean target of every build preset
    Clean,

    /// Remove the generated build, dependencies and install directories
    Clear,

    /// List configure, build, test and package presets
    ListPresets,

    /// Install the pinned dependency set
    Deps(DepsArgs),
}

/// Target of build-and-install / install
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// CMake target (and install component)
    pub target: String,
}

/// Arguments for the deps command
#[derive(Args, Debug)]
pub struct DepsArgs {
    /// Use a local cache archive instead of downloading the bundle
    #[arg(short, long, value_name = "PATH")]
    pub local: Option<PathBuf>,

    /// Output directory (defaults to the binary dir)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Also install RelWithDebInfo and MinSizeRel
    #[arg(short, long)]
    pub extended: bool,

    /// Settings file
    #[arg(long, env = "LUX_SETTINGS", default_value = DEFAULT_SETTINGS_FILE)]
    pub settings: PathBuf,
}
