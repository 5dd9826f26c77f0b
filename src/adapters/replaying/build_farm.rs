//! Replaying adapter for the `BuildFarm` port.

use std::sync::{Arc, Mutex};

use serde_json::json;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{BuildFarm, FarmProject, PortFuture, ScmSource, SubmittedPackage};

/// Serves recorded build-farm responses.
pub struct ReplayingBuildFarm {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingBuildFarm {
    /// Creates a replaying build farm backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl BuildFarm for ReplayingBuildFarm {
    fn get_project<'a>(&'a self, owner: &'a str, project: &'a str) -> PortFuture<'a, FarmProject> {
        let input = json!({ "owner": owner, "project": project });
        let output = next_output(&self.replayer, "build_farm", "get_project", &input);
        Box::pin(async move { replay_result(output) })
    }

    fn add_package<'a>(
        &'a self,
        owner: &'a str,
        project: &'a str,
        package: &'a str,
        source: &'a ScmSource,
    ) -> PortFuture<'a, SubmittedPackage> {
        let input = json!({
            "owner": owner,
            "project": project,
            "package": package,
            "source": source,
        });
        let output = next_output(&self.replayer, "build_farm", "add_package", &input);
        Box::pin(async move { replay_result(output) })
    }
}
