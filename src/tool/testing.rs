//! Scripted tool runner for unit tests

use super::{Invocation, Tool, ToolOutput, ToolRunner};
use crate::error::{LuxError, LuxResult};
use async_trait::async_trait;
use std::sync::Mutex;

/// Canned answer for a matching invocation
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    /// Exit 0 with this stdout
    Ok(String),
    /// Exit with this code and stderr
    Fail(i32, String),
    /// Executable not on PATH
    Missing,
}

/// Records every invocation and answers from a list of prefix rules.
///
/// The first rule whose tool matches and whose args prefix the invocation's
/// args wins; unmatched invocations succeed with empty output.
#[derive(Default)]
pub(crate) struct ScriptedRunner {
    rules: Vec<(Tool, Vec<String>, Reply)>,
    calls: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on(mut self, tool: Tool, prefix: &[&str], reply: Reply) -> Self {
        self.rules.push((
            tool,
            prefix.iter().map(|s| s.to_string()).collect(),
            reply,
        ));
        self
    }

    pub(crate) fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(Invocation::command_line).collect()
    }

    /// Whether any recorded invocation of `tool` starts with `prefix`
    pub(crate) fn invoked(&self, tool: Tool, prefix: &[&str]) -> bool {
        self.calls()
            .iter()
            .any(|inv| inv.tool == tool && starts_with(&inv.args, prefix))
    }
}

fn starts_with<S: AsRef<str>>(args: &[String], prefix: &[S]) -> bool {
    args.len() >= prefix.len()
        && args
            .iter()
            .zip(prefix)
            .all(|(arg, want)| arg == want.as_ref())
}

#[async_trait]
impl ToolRunner for ScriptedRunner {
    async fn run(&self, invocation: &Invocation) -> LuxResult<ToolOutput> {
        self.calls.lock().unwrap().push(invocation.clone());

        let reply = self
            .rules
            .iter()
            .find(|(tool, prefix, _)| {
                *tool == invocation.tool && starts_with(&invocation.args, prefix.as_slice())
            })
            .map(|(_, _, reply)| reply.clone())
            .unwrap_or_else(|| Reply::Ok(String::new()));

        match reply {
            Reply::Ok(stdout) => Ok(ToolOutput {
                stdout,
                stderr: String::new(),
            }),
            Reply::Fail(code, stderr) => Err(LuxError::ToolFailed {
                command: invocation.command_line(),
                code: Some(code),
                stdout: String::new(),
                stderr,
            }),
            Reply::Missing => Err(LuxError::ToolNotFound {
                name: invocation.tool.program().to_string(),
            }),
        }
    }
}
