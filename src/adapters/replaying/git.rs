//! Replaying adapter for the `GitClient` port.

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde_json::json;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{GitClient, PortFuture};

/// Serves recorded git outcomes. Nothing touches the disk.
pub struct ReplayingGitClient {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingGitClient {
    /// Creates a replaying git client backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl GitClient for ReplayingGitClient {
    fn clone_repo<'a>(
        &'a self,
        url: &'a str,
        branch: Option<&'a str>,
        dest: &'a Path,
    ) -> PortFuture<'a, ()> {
        let input = json!({ "url": url, "branch": branch, "dest": dest.display().to_string() });
        let output = next_output(&self.replayer, "git", "clone_repo", &input);
        Box::pin(async move { replay_result(output) })
    }

    fn init<'a>(&'a self, dir: &'a Path) -> PortFuture<'a, ()> {
        let input = json!({ "dir": dir.display().to_string() });
        let output = next_output(&self.replayer, "git", "init", &input);
        Box::pin(async move { replay_result(output) })
    }

    fn commit_all<'a>(&'a self, dir: &'a Path, message: &'a str) -> PortFuture<'a, bool> {
        let input = json!({ "dir": dir.display().to_string(), "message": message });
        let output = next_output(&self.replayer, "git", "commit_all", &input);
        Box::pin(async move { replay_result(output) })
    }

    fn push<'a>(
        &'a self,
        dir: &'a Path,
        remote_url: &'a str,
        branch: &'a str,
    ) -> PortFuture<'a, ()> {
        let input = json!({
            "dir": dir.display().to_string(),
            "remote_url": remote_url,
            "branch": branch,
        });
        let output = next_output(&self.replayer, "git", "push", &input);
        Box::pin(async move { replay_result(output) })
    }
}
