//! Build-farm port for submitting packages as build jobs.

use serde::{Deserialize, Serialize};

use super::PortFuture;

/// Source location of a package built straight from a git repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScmSource {
    /// HTTPS clone URL.
    pub clone_url: String,
    /// Branch name or commit id to build.
    pub committish: String,
    /// Subdirectory holding the spec file (empty for the repository root).
    pub subdirectory: String,
    /// Spec file name.
    pub spec: String,
    /// SCM kind, always `git` here.
    pub scm_type: String,
}

/// A project on the build farm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmProject {
    /// Project id.
    #[serde(default)]
    pub id: Option<u64>,
    /// Project name.
    pub name: String,
    /// Owner of the project.
    #[serde(default)]
    pub ownername: Option<String>,
}

/// Result of adding a package to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedPackage {
    /// Id assigned by the farm.
    #[serde(default)]
    pub id: Option<u64>,
    /// Package name.
    pub name: String,
}

/// Build-farm client operations.
pub trait BuildFarm: Send + Sync {
    /// Looks up a project.
    ///
    /// # Errors
    ///
    /// Returns [`super::PortError::NotFound`] when the project does not exist.
    fn get_project<'a>(&'a self, owner: &'a str, project: &'a str) -> PortFuture<'a, FarmProject>;

    /// Adds (or updates) `package` in `project` with an SCM source.
    ///
    /// # Errors
    ///
    /// Returns an error when the farm rejects the submission.
    fn add_package<'a>(
        &'a self,
        owner: &'a str,
        project: &'a str,
        package: &'a str,
        source: &'a ScmSource,
    ) -> PortFuture<'a, SubmittedPackage>;
}
