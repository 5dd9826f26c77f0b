//! Recording adapter for the `ShellExecutor` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{PortError, ShellExecutor, ShellOutput};

/// Records shell interactions while delegating to an inner implementation.
pub struct RecordingShellExecutor {
    inner: Box<dyn ShellExecutor>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingShellExecutor {
    /// Creates a new recording shell executor wrapping the given implementation.
    pub fn new(inner: Box<dyn ShellExecutor>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
pub(crate) struct CommandInput<'a> {
    pub(crate) program: &'a str,
    pub(crate) args: &'a [&'a str],
}

impl ShellExecutor for RecordingShellExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ShellOutput, PortError> {
        let result = self.inner.run(program, args);
        record_result(&self.recorder, "shell", "run", &CommandInput { program, args }, &result);
        result
    }
}
