//! Recording adapter for the `SourceHost` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{CreatedRepo, NewRepo, PortFuture, RemoteRepo, RepoScope, SourceHost};

/// Records source-host calls while delegating to an inner implementation.
pub struct RecordingSourceHost {
    inner: Box<dyn SourceHost>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSourceHost {
    /// Creates a new recording source host wrapping the given implementation.
    pub fn new(inner: Box<dyn SourceHost>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct ListInput<'a> {
    scope: &'a RepoScope,
    page: u32,
    per_page: u32,
}

#[derive(Serialize)]
struct BranchInput<'a> {
    full_name: &'a str,
    branch: &'a str,
}

#[derive(Serialize)]
struct VisibilityInput<'a> {
    owner: &'a str,
    repo: &'a str,
    private: bool,
}

impl SourceHost for RecordingSourceHost {
    fn list_repos<'a>(
        &'a self,
        scope: &'a RepoScope,
        page: u32,
        per_page: u32,
    ) -> PortFuture<'a, Vec<RemoteRepo>> {
        Box::pin(async move {
            let result = self.inner.list_repos(scope, page, per_page).await;
            let input = ListInput { scope, page, per_page };
            record_result(&self.recorder, "source_host", "list_repos", &input, &result);
            result
        })
    }

    fn branch_exists<'a>(&'a self, full_name: &'a str, branch: &'a str) -> PortFuture<'a, bool> {
        Box::pin(async move {
            let result = self.inner.branch_exists(full_name, branch).await;
            let input = BranchInput { full_name, branch };
            record_result(&self.recorder, "source_host", "branch_exists", &input, &result);
            result
        })
    }

    fn create_repo<'a>(&'a self, request: &'a NewRepo) -> PortFuture<'a, CreatedRepo> {
        Box::pin(async move {
            let result = self.inner.create_repo(request).await;
            record_result(&self.recorder, "source_host", "create_repo", request, &result);
            result
        })
    }

    fn set_private<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        private: bool,
    ) -> PortFuture<'a, ()> {
        Box::pin(async move {
            let result = self.inner.set_private(owner, repo, private).await;
            let input = VisibilityInput { owner, repo, private };
            record_result(&self.recorder, "source_host", "set_private", &input, &result);
            result
        })
    }
}
