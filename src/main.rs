//! luxbuild - LuxCore build driver
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use luxbuild::cli::{commands, Cli, Commands};
use luxbuild::error::LuxResult;
use luxbuild::tool::SystemRunner;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some((stdout, stderr)) = e.diagnostics() {
                for (label, output) in [("stdout", stdout), ("stderr", stderr)] {
                    let output = output.trim_end();
                    if !output.is_empty() {
                        eprintln!("{}", style(format!("--- {} ---", label)).dim());
                        eprintln!("{}", output);
                    }
                }
            }
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> LuxResult<()> {
    let cli = Cli::parse();

    // 0 = info (pipeline progress), 1+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("luxbuild=info"),
        _ => EnvFilter::new("luxbuild=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let layout = cli.layout()?;
    debug!("Layout: {:?}", layout);
    let runner = SystemRunner::new();

    match cli.command {
        Commands::Config => commands::config(&layout, &runner).await,
        Commands::BuildAndInstall(args) => {
            commands::build_and_install(&args.target, &layout, &runner).await
        }
        Commands::Install(args) => commands::install(&args.target, &layout, &runner).await,
        Commands::Clean => commands::clean(&layout, &runner).await,
        Commands::Clear => commands::clear(&layout).await,
        Commands::ListPresets => commands::list_presets(&layout, &runner).await,
        Commands::Deps(args) => commands::deps(args, &layout, &runner).await,
    }
}
