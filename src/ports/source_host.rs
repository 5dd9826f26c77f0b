//! Source-host port (repository listing, branches, creation, visibility).

use serde::{Deserialize, Serialize};

use super::PortFuture;

/// Owner of a remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoOwner {
    /// Login name of the owning user or organization.
    pub login: String,
}

/// A repository as reported by the source host.
///
/// Fields are optional because the host's listing is not trusted to be
/// complete; consumers decide what to do with partial entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRepo {
    /// Short repository name (e.g. `urg_c`).
    #[serde(default)]
    pub name: Option<String>,
    /// `owner/name` path.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Whether the repository is private.
    #[serde(default)]
    pub private: bool,
    /// Browser URL of the repository.
    #[serde(default)]
    pub html_url: Option<String>,
    /// Owning account.
    #[serde(default)]
    pub owner: Option<RepoOwner>,
}

/// Which repositories a listing covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "name", rename_all = "snake_case")]
pub enum RepoScope {
    /// Public view of a named user's repositories.
    User(String),
    /// Everything visible to the authenticated token owner.
    Authenticated,
    /// Repositories of an organization.
    Org(String),
}

/// Request to create a remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRepo {
    /// Repository name.
    pub name: String,
    /// Create under this organization instead of the token owner.
    pub org: Option<String>,
    /// Repository description.
    pub description: String,
    /// Whether the repository should be private.
    pub private: bool,
}

/// A repository created on the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedRepo {
    /// `owner/name` path.
    pub full_name: String,
    /// URL used for pushing.
    pub push_url: String,
    /// Browser URL.
    pub html_url: String,
}

/// REST operations on the source-hosting platform.
pub trait SourceHost: Send + Sync {
    /// Lists one page (1-based) of repositories in `scope`.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures and non-success statuses.
    fn list_repos<'a>(
        &'a self,
        scope: &'a RepoScope,
        page: u32,
        per_page: u32,
    ) -> PortFuture<'a, Vec<RemoteRepo>>;

    /// Checks whether `full_name` has a branch called `branch`.
    ///
    /// Any non-success status resolves to `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns an error only when no response was received.
    fn branch_exists<'a>(&'a self, full_name: &'a str, branch: &'a str) -> PortFuture<'a, bool>;

    /// Creates a repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the request.
    fn create_repo<'a>(&'a self, request: &'a NewRepo) -> PortFuture<'a, CreatedRepo>;

    /// Changes the visibility of `owner/repo`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the request.
    fn set_private<'a>(&'a self, owner: &'a str, repo: &'a str, private: bool)
        -> PortFuture<'a, ()>;
}
