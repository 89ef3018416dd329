//! List-presets command - show presets per category

use crate::config::ProjectLayout;
use crate::error::LuxResult;
use crate::preset::Orchestrator;
use crate::tool::ToolRunner;
use crate::ui::{self, UiContext};

/// Execute the list-presets command
pub async fn execute(layout: &ProjectLayout, runner: &dyn ToolRunner) -> LuxResult<()> {
    let ctx = UiContext::detect();
    let listing = Orchestrator::new(runner, layout).list_all_presets().await?;

    for (preset_type, presets) in listing {
        ui::section(&ctx, &format!("{} presets", preset_type));
        if presets.is_empty() {
            ui::remark(&ctx, "(none)");
        }
        for preset in presets {
            println!("  {}", preset);
        }
    }
    Ok(())
}
