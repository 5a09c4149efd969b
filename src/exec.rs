//! External command execution.
//!
//! Privilege escalation and macOS post-processing shell out to system
//! tools (`sudo`, `xattr`, `codesign`). The trait seam lets tests stub
//! those invocations without touching the host.

use crate::error::{InstallerError, Result};
use std::process::{Command, Output};

/// Abstraction for running external commands.
///
/// Not automocked: the nested reference in `args` does not suit
/// generated mocks. Tests use the scripted stub in
/// [`crate::test_utils`] instead.
pub trait CommandExecutor {
    /// Runs a command with arguments and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the
    /// command.
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        Command::new(cmd)
            .args(args)
            .output()
            .map_err(InstallerError::from)
    }
}

/// Returns the trimmed stderr of a failed command output.
#[must_use]
pub fn failure_detail(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let detail = stderr.trim();
    if detail.is_empty() {
        format!("exit status {}", output.status)
    } else {
        detail.to_owned()
    }
}
