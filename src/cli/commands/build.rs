//! Build-and-install and install commands

use crate::config::ProjectLayout;
use crate::error::LuxResult;
use crate::preset::Orchestrator;
use crate::tool::ToolRunner;
use crate::ui::{self, UiContext};

/// Execute the build-and-install command
pub async fn build_and_install(
    target: &str,
    layout: &ProjectLayout,
    runner: &dyn ToolRunner,
) -> LuxResult<()> {
    Orchestrator::new(runner, layout)
        .build_and_install(target)
        .await?;
    report_install(target, layout)
}

/// Execute the install command
pub async fn install(target: &str, layout: &ProjectLayout, runner: &dyn ToolRunner) -> LuxResult<()> {
    Orchestrator::new(runner, layout).install(target).await?;
    report_install(target, layout)
}

fn report_install(target: &str, layout: &ProjectLayout) -> LuxResult<()> {
    let ctx = UiContext::detect();
    let prefix = layout.install_dir(layout.build_type()?);
    ui::step_ok(
        &ctx,
        &format!("Installed '{}' into {}", target, prefix.display()),
    );
    Ok(())
}
