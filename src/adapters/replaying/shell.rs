//! Replaying adapter for the `ShellExecutor` port.

use std::sync::{Arc, Mutex};

use serde_json::json;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::shell::{ShellExecutor, ShellOutput};
use crate::ports::PortError;

/// Replays recorded command results from a cassette.
pub struct ReplayingShellExecutor {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingShellExecutor {
    /// Creates a replaying shell executor backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl ShellExecutor for ReplayingShellExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ShellOutput, PortError> {
        let input = json!({ "program": program, "args": args });
        replay_result(next_output(&self.replayer, "shell", "run", &input))
    }
}
