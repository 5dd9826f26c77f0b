//! Publisher: turns repositories on the source host into build-farm
//! packages.
//!
//! Every operation starts from a complete listing of remote repositories,
//! filters it and acts on each survivor independently. A listing that fails
//! part way aborts the operation; nothing is done with a partial listing.

pub mod descriptor;
pub mod manifest;
pub mod submit;
pub mod visibility;

use crate::ports::{PortError, RemoteRepo, RepoScope, SourceHost};

/// Collects every repository in `scope`, requesting pages until one comes
/// back empty.
///
/// # Errors
///
/// Returns the first page error.
pub async fn list_all(
    host: &dyn SourceHost,
    scope: &RepoScope,
    per_page: u32,
) -> Result<Vec<RemoteRepo>, PortError> {
    let per_page = per_page.max(1);
    let mut repos = Vec::new();
    for page in 1.. {
        let batch = host.list_repos(scope, page, per_page).await?;
        if batch.is_empty() {
            break;
        }
        log::debug!("page {page}: {} repositories", batch.len());
        repos.extend(batch);
    }
    Ok(repos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{calls, repo, FakeHost};

    #[tokio::test]
    async fn pages_until_an_empty_page() {
        let host = FakeHost {
            repos: (0..5).map(|i| repo("porter", &format!("r{i}"), false)).collect(),
            ..FakeHost::default()
        };
        let scope = RepoScope::User("porter".into());

        let repos = list_all(&host, &scope, 2).await.unwrap();
        assert_eq!(repos.len(), 5);
        assert_eq!(calls(&host.calls).len(), 4);
    }

    #[tokio::test]
    async fn listing_error_is_returned() {
        let host = FakeHost {
            list_error: Some(PortError::Status { code: 401, body: "unauthorized".into() }),
            ..FakeHost::default()
        };
        let err = list_all(&host, &RepoScope::Authenticated, 100).await.unwrap_err();
        assert_eq!(err, PortError::Status { code: 401, body: "unauthorized".into() });
    }
}
