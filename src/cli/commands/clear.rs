//! Clear command - remove generated directories

use crate::config::ProjectLayout;
use crate::error::LuxResult;
use crate::preset::clear_binary_dir;
use crate::ui::{self, UiContext};

/// Execute the clear command
pub async fn execute(layout: &ProjectLayout) -> LuxResult<()> {
    let ctx = UiContext::detect();
    let removed = clear_binary_dir(layout).await?;

    if removed.is_empty() {
        ui::remark(
            &ctx,
            &format!("Nothing to clear in {}", layout.binary_dir().display()),
        );
    }
    for dir in removed {
        ui::step_ok(&ctx, &format!("Removed {}", dir.display()));
    }
    Ok(())
}
