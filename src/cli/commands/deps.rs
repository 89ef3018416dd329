//! Deps command - install the pinned dependency set

use crate::cli::DepsArgs;
use crate::config::{ProjectLayout, SettingsLoader};
use crate::deps::{self, Attestation, DepsOptions, DepsReport};
use crate::error::LuxResult;
use crate::tool::ToolRunner;
use crate::ui::{self, UiContext};
use tracing::debug;

/// Execute the deps command
pub async fn execute(args: DepsArgs, layout: &ProjectLayout, runner: &dyn ToolRunner) -> LuxResult<()> {
    let ctx = UiContext::detect();
    let settings = SettingsLoader::with_path(args.settings).load().await?;

    let options = DepsOptions {
        output_dir: args.output.unwrap_or_else(|| layout.binary_dir().to_path_buf()),
        recipe_dir: layout.source_dir().to_path_buf(),
        local: args.local,
        extended: args.extended,
        workspace_root: None,
    };
    debug!("Pipeline options: {:?}", options);

    ui::intro(&ctx, "luxbuild deps: BEGIN");
    let report = deps::run(runner, &ctx, &settings, &options).await?;
    print_report(&ctx, &report, &options);
    ui::outro_success(&ctx, "luxbuild deps: END");

    Ok(())
}

fn print_report(ctx: &UiContext, report: &DepsReport, options: &DepsOptions) {
    ui::section(ctx, "Dependencies");
    ui::key_value(
        ctx,
        "Release",
        &format!("{}/{}", report.release.owner(), report.release.version()),
    );
    ui::key_value(ctx, "Platform", report.platform.as_str());
    ui::key_value(ctx, "Profile", &report.profile);
    ui::key_value(
        ctx,
        "Build types",
        &report
            .build_types
            .iter()
            .map(|bt| bt.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    );
    ui::key_value(ctx, "Output", &options.output_dir.display().to_string());

    match &report.attestation {
        Some(Attestation::Verified { .. }) => {
            ui::key_value_status(ctx, "Attestation", "verified", true)
        }
        Some(Attestation::Unverifiable(_)) => {
            ui::key_value_status(ctx, "Attestation", "not checked", false)
        }
        Some(Attestation::Failed(_)) => ui::key_value_status(ctx, "Attestation", "failed", false),
        None => ui::key_value(ctx, "Attestation", "local archive"),
    }

    ui::section(ctx, "Build presets");
    if report.presets.is_empty() {
        ui::step_warn(ctx, "No build presets found");
    }
    for preset in &report.presets {
        ui::remark(ctx, preset);
    }
}
