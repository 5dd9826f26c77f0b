//! Bulk visibility toggling of private repositories.

use crate::ports::{PortError, RemoteRepo, RepoScope, SourceHost};
use crate::publisher::list_all;

/// Outcome of a publicize run.
#[derive(Debug, Default)]
pub struct VisibilityReport {
    /// Browser URLs of repositories made public.
    pub made_public: Vec<String>,
    /// Repositories that could not be changed, with the reason.
    pub failed: Vec<(String, String)>,
}

/// Lists every repository in `scope` and keeps the private ones.
///
/// # Errors
///
/// Returns an error if the listing fails.
pub async fn private_repos(
    host: &dyn SourceHost,
    scope: &RepoScope,
    per_page: u32,
) -> Result<Vec<RemoteRepo>, PortError> {
    let repos = list_all(host, scope, per_page).await?;
    Ok(repos.into_iter().filter(|r| r.private).collect())
}

/// Makes each repository public. Failures are recorded and the rest still
/// run.
pub async fn make_public(host: &dyn SourceHost, repos: &[RemoteRepo]) -> VisibilityReport {
    let mut report = VisibilityReport::default();
    for repo in repos {
        let label = repo.full_name.clone().unwrap_or_else(|| format!("{repo:?}"));
        let (Some(owner), Some(name)) = (repo.owner.as_ref(), repo.name.as_deref()) else {
            log::error!("{label} has no owner or name, skipping");
            report.failed.push((label, "missing owner or name".to_string()));
            continue;
        };

        match host.set_private(&owner.login, name, false).await {
            Ok(()) => {
                log::info!("made {}/{name} public", owner.login);
                let url = repo.html_url.clone().unwrap_or_else(|| label.clone());
                report.made_public.push(url);
            }
            Err(e) => {
                log::error!("failed to make {}/{name} public: {e}", owner.login);
                report.failed.push((label, e.to_string()));
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{calls, repo, FakeHost};

    #[tokio::test]
    async fn keeps_private_repositories_only() {
        let host = FakeHost {
            repos: vec![repo("ros", "a", true), repo("ros", "b", false), repo("ros", "c", true)],
            ..FakeHost::default()
        };
        let private = private_repos(&host, &RepoScope::Org("ros".into()), 100).await.unwrap();
        let names: Vec<_> = private.iter().filter_map(|r| r.name.as_deref()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn failures_are_isolated() {
        let host = FakeHost {
            patch_rejects: ["ros/b".to_string()].into(),
            ..FakeHost::default()
        };
        let repos = vec![repo("ros", "a", true), repo("ros", "b", true), repo("ros", "c", true)];

        let report = make_public(&host, &repos).await;

        assert_eq!(report.made_public, vec!["https://gitee.com/ros/a", "https://gitee.com/ros/c"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "ros/b");
        assert_eq!(
            calls(&host.calls),
            vec!["patch ros/a private=false", "patch ros/b private=false", "patch ros/c private=false"]
        );
    }

    #[tokio::test]
    async fn entries_without_owner_are_not_patched() {
        let host = FakeHost::default();
        let repos = vec![RemoteRepo { owner: None, ..repo("ros", "a", true) }];
        let report = make_public(&host, &repos).await;
        assert_eq!(report.failed.len(), 1);
        assert!(calls(&host.calls).is_empty());
    }
}
