//! Subprocess execution helpers — the one place that owns
//! `tokio::process::Command` + `tokio::time::timeout` composition (spec §4.2,
//! Design Notes §9: "centralize in C2 with a typed command description").

use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;

/// A typed description of a command to run, instead of an ad-hoc shell
/// string (Design Notes §9).
#[derive(Debug, Clone)]
pub struct ScriptCommand {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
    pub cwd: Option<PathBuf>,
}

impl ScriptCommand {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self { program: program.into(), args: Vec::new(), timeout, cwd: None }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status_code == Some(0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("{description} failed: {source}")]
    Spawn { description: String, #[source] source: std::io::Error },
    #[error("{description} timed out after {}s", timeout.as_secs())]
    Timeout { description: String, timeout: Duration },
}

/// Run `cmd` to completion with a hard deadline. The child process is
/// killed automatically on timeout (tokio `Child`'s drop implementation).
pub async fn run_with_timeout(cmd: &ScriptCommand, description: &str) -> Result<CommandOutput, ExecError> {
    let mut command = Command::new(&cmd.program);
    command.args(&cmd.args);
    if let Some(cwd) = &cmd.cwd {
        command.current_dir(cwd);
    }

    match tokio::time::timeout(cmd.timeout, command.output()).await {
        Ok(Ok(output)) => Ok(CommandOutput {
            status_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }),
        Ok(Err(source)) => Err(ExecError::Spawn { description: description.to_string(), source }),
        Err(_elapsed) => {
            Err(ExecError::Timeout { description: description.to_string(), timeout: cmd.timeout })
        }
    }
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
