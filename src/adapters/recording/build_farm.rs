//! Recording adapter for the `BuildFarm` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{BuildFarm, FarmProject, PortFuture, ScmSource, SubmittedPackage};

/// Records build-farm calls while delegating to an inner implementation.
pub struct RecordingBuildFarm {
    inner: Box<dyn BuildFarm>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingBuildFarm {
    /// Creates a new recording build farm wrapping the given implementation.
    pub fn new(inner: Box<dyn BuildFarm>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct ProjectInput<'a> {
    owner: &'a str,
    project: &'a str,
}

#[derive(Serialize)]
struct PackageInput<'a> {
    owner: &'a str,
    project: &'a str,
    package: &'a str,
    source: &'a ScmSource,
}

impl BuildFarm for RecordingBuildFarm {
    fn get_project<'a>(&'a self, owner: &'a str, project: &'a str) -> PortFuture<'a, FarmProject> {
        Box::pin(async move {
            let result = self.inner.get_project(owner, project).await;
            let input = ProjectInput { owner, project };
            record_result(&self.recorder, "build_farm", "get_project", &input, &result);
            result
        })
    }

    fn add_package<'a>(
        &'a self,
        owner: &'a str,
        project: &'a str,
        package: &'a str,
        source: &'a ScmSource,
    ) -> PortFuture<'a, SubmittedPackage> {
        Box::pin(async move {
            let result = self.inner.add_package(owner, project, package, source).await;
            let input = PackageInput { owner, project, package, source };
            record_result(&self.recorder, "build_farm", "add_package", &input, &result);
            result
        })
    }
}
