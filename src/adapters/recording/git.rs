//! Recording adapter for the `GitClient` port.

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{GitClient, PortFuture};

/// Records git interactions while delegating to an inner implementation.
pub struct RecordingGitClient {
    inner: Box<dyn GitClient>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingGitClient {
    /// Creates a new recording git client wrapping the given implementation.
    pub fn new(inner: Box<dyn GitClient>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct CloneInput<'a> {
    url: &'a str,
    branch: Option<&'a str>,
    dest: String,
}

#[derive(Serialize)]
struct DirInput<'a> {
    dir: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    remote_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
}

impl<'a> DirInput<'a> {
    fn new(dir: &Path) -> Self {
        Self { dir: dir.display().to_string(), message: None, remote_url: None, branch: None }
    }
}

impl GitClient for RecordingGitClient {
    fn clone_repo<'a>(
        &'a self,
        url: &'a str,
        branch: Option<&'a str>,
        dest: &'a Path,
    ) -> PortFuture<'a, ()> {
        Box::pin(async move {
            let result = self.inner.clone_repo(url, branch, dest).await;
            let input = CloneInput { url, branch, dest: dest.display().to_string() };
            record_result(&self.recorder, "git", "clone_repo", &input, &result);
            result
        })
    }

    fn init<'a>(&'a self, dir: &'a Path) -> PortFuture<'a, ()> {
        Box::pin(async move {
            let result = self.inner.init(dir).await;
            record_result(&self.recorder, "git", "init", &DirInput::new(dir), &result);
            result
        })
    }

    fn commit_all<'a>(&'a self, dir: &'a Path, message: &'a str) -> PortFuture<'a, bool> {
        Box::pin(async move {
            let result = self.inner.commit_all(dir, message).await;
            let input = DirInput { message: Some(message), ..DirInput::new(dir) };
            record_result(&self.recorder, "git", "commit_all", &input, &result);
            result
        })
    }

    fn push<'a>(
        &'a self,
        dir: &'a Path,
        remote_url: &'a str,
        branch: &'a str,
    ) -> PortFuture<'a, ()> {
        Box::pin(async move {
            let result = self.inner.push(dir, remote_url, branch).await;
            let input =
                DirInput { remote_url: Some(remote_url), branch: Some(branch), ..DirInput::new(dir) };
            record_result(&self.recorder, "git", "push", &input, &result);
            result
        })
    }
}
