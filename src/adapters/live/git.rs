//! Live git adapter that shells out to the `git` CLI.

use std::path::Path;
use std::process::Output;

use tokio::process::Command;

use crate::ports::git::GitClient;
use crate::ports::{PortError, PortFuture};

/// Live git adapter using `tokio::process` so clones overlap.
pub struct LiveGitClient;

/// Runs git with `args`, inside `dir` when given, without ever prompting.
async fn git(dir: Option<&Path>, args: &[&str]) -> Result<Output, PortError> {
    let mut command = Command::new("git");
    command.args(args).env("GIT_TERMINAL_PROMPT", "0").kill_on_drop(true);
    if let Some(dir) = dir {
        command.current_dir(dir);
    }
    command
        .output()
        .await
        .map_err(|e| PortError::Process { code: None, stderr: format!("git: {e}") })
}

/// Like [`git`], but a non-zero exit status is an error.
async fn git_checked(dir: Option<&Path>, args: &[&str]) -> Result<Output, PortError> {
    let output = git(dir, args).await?;
    if output.status.success() {
        Ok(output)
    } else {
        Err(PortError::Process {
            code: output.status.code(),
            stderr: format!(
                "git {} failed: {}",
                args.first().copied().unwrap_or_default(),
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        })
    }
}

impl GitClient for LiveGitClient {
    fn clone_repo<'a>(
        &'a self,
        url: &'a str,
        branch: Option<&'a str>,
        dest: &'a Path,
    ) -> PortFuture<'a, ()> {
        Box::pin(async move {
            let dest = dest.to_string_lossy();
            let mut args = vec!["clone"];
            if let Some(branch) = branch {
                args.extend(["-b", branch]);
            }
            args.extend([url, dest.as_ref()]);
            git_checked(None, &args).await.map(|_| ())
        })
    }

    fn init<'a>(&'a self, dir: &'a Path) -> PortFuture<'a, ()> {
        Box::pin(async move {
            if dir.join(".git").is_dir() {
                return Ok(());
            }
            git_checked(Some(dir), &["init"]).await.map(|_| ())
        })
    }

    fn commit_all<'a>(&'a self, dir: &'a Path, message: &'a str) -> PortFuture<'a, bool> {
        Box::pin(async move {
            git_checked(Some(dir), &["add", "."]).await?;
            let staged = git(Some(dir), &["diff", "--cached", "--quiet"]).await?;
            if staged.status.success() {
                return Ok(false);
            }
            git_checked(Some(dir), &["commit", "-m", message]).await?;
            Ok(true)
        })
    }

    fn push<'a>(
        &'a self,
        dir: &'a Path,
        remote_url: &'a str,
        branch: &'a str,
    ) -> PortFuture<'a, ()> {
        Box::pin(async move {
            let added = git(Some(dir), &["remote", "add", "origin", remote_url]).await?;
            if !added.status.success() {
                git_checked(Some(dir), &["remote", "set-url", "origin", remote_url]).await?;
            }
            git_checked(Some(dir), &["branch", "-M", branch]).await?;
            git_checked(Some(dir), &["push", "-u", "origin", branch]).await?;
            Ok(())
        })
    }
}
