//! Shell executor port for running external commands.

use serde::{Deserialize, Serialize};

use super::PortError;

/// The output of an external command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellOutput {
    /// The exit code of the process (`-1` when terminated by a signal).
    pub exit_code: i32,
    /// The captured standard output.
    pub stdout: String,
    /// The captured standard error.
    pub stderr: String,
}

impl ShellOutput {
    /// Returns `true` when the process exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executes external programs.
///
/// Programs are invoked directly with an argument vector, never through a
/// shell, so package names from input manifests cannot inject commands.
pub trait ShellExecutor: Send + Sync {
    /// Runs `program` with `args` and returns its captured output.
    ///
    /// A non-zero exit status is still `Ok`; callers decide what it means.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Process`] if the program cannot be spawned.
    fn run(&self, program: &str, args: &[&str]) -> Result<ShellOutput, PortError>;
}
