//! Clean command - run the clean target of every build preset

use crate::config::ProjectLayout;
use crate::error::LuxResult;
use crate::preset::Orchestrator;
use crate::tool::ToolRunner;
use crate::ui::{self, UiContext};

/// Execute the clean command
pub async fn execute(layout: &ProjectLayout, runner: &dyn ToolRunner) -> LuxResult<()> {
    let ctx = UiContext::detect();
    let cleaned = Orchestrator::new(runner, layout).clean().await?;

    if cleaned.is_empty() {
        ui::step_warn(&ctx, "No build presets found");
    }
    for preset in cleaned {
        ui::step_ok(&ctx, &format!("Cleaned {}", preset));
    }
    Ok(())
}
