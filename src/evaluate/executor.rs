use crate::script::MaterializedScript;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Result of one executor invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BuildOutcome {
    Succeeded,
    /// `exit_code` is absent when the process was killed by a signal
    Failed { exit_code: Option<i32> },
    NotStarted { reason: String },
}

impl BuildOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl fmt::Display for BuildOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => f.write_str("succeeded"),
            Self::Failed {
                exit_code: Some(code),
            } => write!(f, "failed (exit code {})", code),
            Self::Failed { exit_code: None } => f.write_str("failed (terminated by signal)"),
            Self::NotStarted { reason } => write!(f, "not started: {}", reason),
        }
    }
}

/// Runs the build script that the evaluator has just written
pub trait BuildExecutor {
    fn execute(&self, script_path: &Path, script: &MaterializedScript) -> BuildOutcome;
}

/// Invokes an external compile entry point that picks up the script from its
/// well-known location.
#[derive(Debug, Clone)]
pub struct CompileExecutor {
    command: String,
}

impl CompileExecutor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn working_dir(script_path: &Path) -> PathBuf {
        match script_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

impl Default for CompileExecutor {
    fn default() -> Self {
        Self::new("compile")
    }
}

impl BuildExecutor for CompileExecutor {
    fn execute(&self, script_path: &Path, script: &MaterializedScript) -> BuildOutcome {
        let cwd = Self::working_dir(script_path);
        debug!(
            command = %self.command,
            cwd = %cwd.display(),
            label = script.label(),
            "Invoking compile command"
        );

        let status = Command::new("bash")
            .arg("-c")
            .arg(&self.command)
            .current_dir(&cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => BuildOutcome::Succeeded,
            Ok(status) => BuildOutcome::Failed {
                exit_code: status.code(),
            },
            Err(e) => {
                warn!(command = %self.command, error = %e, "Failed to spawn compile command");
                BuildOutcome::NotStarted {
                    reason: e.to_string(),
                }
            }
        }
    }
}
