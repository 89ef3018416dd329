//! Config command - configure the build tree

use crate::config::ProjectLayout;
use crate::error::LuxResult;
use crate::preset::Orchestrator;
use crate::tool::ToolRunner;

/// Execute the config command
pub async fn execute(layout: &ProjectLayout, runner: &dyn ToolRunner) -> LuxResult<()> {
    Orchestrator::new(runner, layout).config().await
}
