//! Git port for cloning and publishing repositories.

use std::path::Path;

use super::PortFuture;

/// Version-control operations used by the fetcher and the stager.
pub trait GitClient: Send + Sync {
    /// Clones `url` into `dest`, pinned to `branch` when one is given.
    ///
    /// # Errors
    ///
    /// Returns [`super::PortError::Process`] if `git clone` fails.
    fn clone_repo<'a>(
        &'a self,
        url: &'a str,
        branch: Option<&'a str>,
        dest: &'a Path,
    ) -> PortFuture<'a, ()>;

    /// Initializes a repository in `dir` unless one already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if `git init` fails.
    fn init<'a>(&'a self, dir: &'a Path) -> PortFuture<'a, ()>;

    /// Stages everything in `dir` and commits it with `message`.
    ///
    /// Resolves to `false` when nothing was staged and no commit was made.
    ///
    /// # Errors
    ///
    /// Returns an error if staging or committing fails.
    fn commit_all<'a>(&'a self, dir: &'a Path, message: &'a str) -> PortFuture<'a, bool>;

    /// Points `origin` at `remote_url`, renames the current branch to
    /// `branch` and pushes it upstream.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the steps fails.
    fn push<'a>(&'a self, dir: &'a Path, remote_url: &'a str, branch: &'a str)
        -> PortFuture<'a, ()>;
}
