//! Tool runner backed by real child processes

use super::{
    error_tail, stream_child_output, Invocation, OutputMode, Tool, ToolOutput, ToolRunner,
};
use crate::error::{LuxError, LuxResult};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::OnceLock;
use tokio::process::Command;
use tracing::debug;

/// Runs tools found on `PATH`.
///
/// Each tool is looked up at most once per runner; the result (found or
/// not) is kept for the lifetime of the process.
#[derive(Debug, Default)]
pub struct SystemRunner {
    lookups: [OnceLock<Option<PathBuf>>; 3],
}

impl SystemRunner {
    /// Create a runner with no cached lookups
    pub fn new() -> Self {
        Self::default()
    }

    /// Locate a tool executable
    pub fn locate(&self, tool: Tool) -> LuxResult<PathBuf> {
        let found = self.lookups[tool.index()].get_or_init(|| {
            debug!("Looking for {}", tool);
            let found = which::which(tool.program()).ok();
            match &found {
                Some(path) => debug!("{} found: '{}'", tool, path.display()),
                None => debug!("{} not found", tool),
            }
            found
        });

        found.clone().ok_or_else(|| LuxError::ToolNotFound {
            name: tool.program().to_string(),
        })
    }
}

#[async_trait]
impl ToolRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> LuxResult<ToolOutput> {
        let program = self.locate(invocation.tool)?;
        let command_line = invocation.command_line();
        debug!("Executing: {}", command_line);

        let mut command = Command::new(&program);
        command
            .args(&invocation.args)
            .envs(invocation.env.iter())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let (status, stdout, stderr) = match invocation.output {
            OutputMode::Capture => {
                let output = command
                    .output()
                    .await
                    .map_err(|e| LuxError::command_failed(&command_line, e))?;
                (
                    output.status,
                    String::from_utf8_lossy(&output.stdout).into_owned(),
                    String::from_utf8_lossy(&output.stderr).into_owned(),
                )
            }
            OutputMode::Stream => {
                let mut child = command
                    .spawn()
                    .map_err(|e| LuxError::command_failed(&command_line, e))?;
                let (out, err) = stream_child_output(&mut child).await?;
                let status = child
                    .wait()
                    .await
                    .map_err(|e| LuxError::command_failed(&command_line, e))?;
                (status, out.join("\n"), err.join("\n"))
            }
        };

        if status.success() {
            Ok(ToolOutput { stdout, stderr })
        } else {
            Err(LuxError::ToolFailed {
                command: command_line,
                code: status.code(),
                stdout: failure_output(invocation.output, stdout),
                stderr: failure_output(invocation.output, stderr),
            })
        }
    }
}

/// Output kept on a failed invocation.
///
/// Captured output was never shown and is kept whole. Streamed output was
/// already echoed, so only its tail is replayed.
fn failure_output(mode: OutputMode, output: String) -> String {
    match mode {
        OutputMode::Capture => output,
        OutputMode::Stream => error_tail(&output),
    }
}
