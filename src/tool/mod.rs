//! External tool invocation
//!
//! Every external program (Conan, CMake, the GitHub CLI) is driven through
//! the [`ToolRunner`] trait:
//! - `SystemRunner` locates tools on `PATH` once per process and runs them
//! - `Conan` and `CMake` translate operations into command lines
//!
//! Invocations are strictly sequential; each call blocks the pipeline until
//! the child exits. There is no timeout.

mod cmake;
mod conan;
mod system;
#[cfg(test)]
pub(crate) mod testing;

pub use cmake::{parse_presets, CMake, PresetType};
pub use conan::{Conan, InstallRequest};
pub use system::SystemRunner;

use crate::error::{LuxError, LuxResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Max number of streamed output lines replayed when a tool fails.
const ERROR_TAIL_LINES: usize = 50;

/// External programs luxbuild knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Conan 2 package manager
    Conan,
    /// CMake build system generator
    CMake,
    /// GitHub CLI, used for attestation checks only
    Gh,
}

impl Tool {
    /// Executable name looked up on `PATH`
    pub fn program(&self) -> &'static str {
        match self {
            Self::Conan => "conan",
            Self::CMake => "cmake",
            Self::Gh => "gh",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Self::Conan => 0,
            Self::CMake => 1,
            Self::Gh => 2,
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// Environment variables layered over the ambient process environment.
///
/// Values are immutable once built; each invocation carries its own copy and
/// the merge happens only when the child process is spawned (overlay wins).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverlay {
    vars: BTreeMap<String, String>,
}

impl EnvOverlay {
    /// Empty overlay (pure ambient environment)
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of the overlay with one more variable set
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Look up a variable
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Iterate over the variables in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.vars.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// How the child's output is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Collect silently, for machine-read or logged output
    #[default]
    Capture,
    /// Echo each line as it arrives and keep a copy for diagnostics
    Stream,
}

/// A single external tool call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub tool: Tool,
    pub args: Vec<String>,
    pub env: EnvOverlay,
    pub output: OutputMode,
}

impl Invocation {
    /// Captured invocation with no environment overlay
    pub fn new<I, S>(tool: Tool, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tool,
            args: args.into_iter().map(Into::into).collect(),
            env: EnvOverlay::new(),
            output: OutputMode::Capture,
        }
    }

    pub fn with_env(mut self, env: EnvOverlay) -> Self {
        self.env = env;
        self
    }

    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    /// Human-readable command line for logs and error messages
    pub fn command_line(&self) -> String {
        if self.args.is_empty() {
            self.tool.program().to_string()
        } else {
            format!("{} {}", self.tool.program(), self.args.join(" "))
        }
    }
}

/// Output of a successful invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// Replay captured stderr at info level (Conan reports progress there)
    pub fn log_stderr(&self) {
        for line in self.stderr.lines().filter(|l| !l.trim().is_empty()) {
            tracing::info!("{}", line);
        }
    }
}

/// Abstract tool execution interface
///
/// A non-zero exit is reported as [`LuxError::ToolFailed`] carrying the
/// captured output; a missing executable as [`LuxError::ToolNotFound`].
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Run the invocation to completion
    async fn run(&self, invocation: &Invocation) -> LuxResult<ToolOutput>;
}

/// Keep only the last `ERROR_TAIL_LINES` lines of tool output.
pub fn error_tail(output: &str) -> String {
    let lines: Vec<&str> = output.lines().collect();
    let total = lines.len();
    if total > ERROR_TAIL_LINES {
        lines[total - ERROR_TAIL_LINES..].join("\n")
    } else {
        lines.join("\n")
    }
}

/// Stream stdout and stderr of a child process line by line.
///
/// Lines are echoed to the matching stream of this process as they arrive.
/// Both pipes are drained to EOF; bytes that are not UTF-8 are replaced, so
/// output in a local codepage never stalls the child.
/// Returns the collected (stdout, stderr) lines for error reporting.
pub(crate) async fn stream_child_output(
    child: &mut tokio::process::Child,
) -> LuxResult<(Vec<String>, Vec<String>)> {
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| LuxError::Internal("child stdout not piped".to_string()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| LuxError::Internal("child stderr not piped".to_string()))?;

    let mut stdout_reader = BufReader::new(stdout);
    let mut stderr_reader = BufReader::new(stderr);
    let mut stdout_buf = Vec::new();
    let mut stderr_buf = Vec::new();

    let mut out_lines = Vec::new();
    let mut err_lines = Vec::new();
    let mut stdout_done = false;
    let mut stderr_done = false;

    while !stdout_done || !stderr_done {
        tokio::select! {
            read = stdout_reader.read_until(b'\n', &mut stdout_buf), if !stdout_done => {
                match read {
                    Ok(n) => {
                        stdout_done = n == 0;
                        if !stdout_buf.is_empty() {
                            let line = decode_line(&stdout_buf);
                            println!("{}", line);
                            out_lines.push(line);
                            stdout_buf.clear();
                        }
                    }
                    Err(e) => return Err(LuxError::io("reading child stdout", e)),
                }
            }
            read = stderr_reader.read_until(b'\n', &mut stderr_buf), if !stderr_done => {
                match read {
                    Ok(n) => {
                        stderr_done = n == 0;
                        if !stderr_buf.is_empty() {
                            let line = decode_line(&stderr_buf);
                            eprintln!("{}", line);
                            err_lines.push(line);
                            stderr_buf.clear();
                        }
                    }
                    Err(e) => return Err(LuxError::io("reading child stderr", e)),
                }
            }
        }
    }

    Ok((out_lines, err_lines))
}

/// One output line without its terminator, invalid UTF-8 replaced
fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
