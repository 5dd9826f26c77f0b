//! Replaying adapter for the `SourceHost` port.

use std::sync::{Arc, Mutex};

use serde_json::json;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{CreatedRepo, NewRepo, PortFuture, RemoteRepo, RepoScope, SourceHost};

/// Serves recorded source-host responses.
pub struct ReplayingSourceHost {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingSourceHost {
    /// Creates a replaying source host backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl SourceHost for ReplayingSourceHost {
    fn list_repos<'a>(
        &'a self,
        scope: &'a RepoScope,
        page: u32,
        per_page: u32,
    ) -> PortFuture<'a, Vec<RemoteRepo>> {
        let input = json!({ "scope": scope, "page": page, "per_page": per_page });
        let output = next_output(&self.replayer, "source_host", "list_repos", &input);
        Box::pin(async move { replay_result(output) })
    }

    fn branch_exists<'a>(&'a self, full_name: &'a str, branch: &'a str) -> PortFuture<'a, bool> {
        let input = json!({ "full_name": full_name, "branch": branch });
        let output = next_output(&self.replayer, "source_host", "branch_exists", &input);
        Box::pin(async move { replay_result(output) })
    }

    fn create_repo<'a>(&'a self, request: &'a NewRepo) -> PortFuture<'a, CreatedRepo> {
        let output = next_output(&self.replayer, "source_host", "create_repo", request);
        Box::pin(async move { replay_result(output) })
    }

    fn set_private<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        private: bool,
    ) -> PortFuture<'a, ()> {
        let input = json!({ "owner": owner, "repo": repo, "private": private });
        let output = next_output(&self.replayer, "source_host", "set_private", &input);
        Box::pin(async move { replay_result(output) })
    }
}
