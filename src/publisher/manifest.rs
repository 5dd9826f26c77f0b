//! Builds the Package Submission List from branch-filtered repositories.

use crate::context::ServiceContext;
use crate::ports::{PortError, RepoScope};
use crate::publisher::descriptor::{Naming, PackageDescriptor};
use crate::publisher::list_all;

/// Result of scanning an account's repositories.
#[derive(Debug, Default)]
pub struct ManifestReport {
    /// Descriptors of repositories carrying the target branch.
    pub descriptors: Vec<PackageDescriptor>,
    /// Repositories listed.
    pub listed: usize,
    /// Listed entries missing `name` or `full_name`.
    pub malformed: usize,
    /// Repositories without the target branch.
    pub without_branch: Vec<String>,
}

/// Lists `user`'s repositories and describes those that have `branch`.
///
/// A failed branch check counts as "branch absent".
///
/// # Errors
///
/// Returns an error if the repository listing fails.
pub async fn build(
    ctx: &ServiceContext,
    user: &str,
    branch: &str,
    naming: &Naming,
    per_page: u32,
) -> Result<ManifestReport, PortError> {
    let repos = list_all(ctx.host.as_ref(), &RepoScope::User(user.to_string()), per_page).await?;
    log::info!("{user} has {} repositories", repos.len());

    let mut report = ManifestReport { listed: repos.len(), ..ManifestReport::default() };
    for repo in &repos {
        let (Some(name), Some(full_name)) = (repo.name.as_deref(), repo.full_name.as_deref()) else {
            log::warn!("repository entry without name or full_name, skipping: {repo:?}");
            report.malformed += 1;
            continue;
        };

        let has_branch = match ctx.host.branch_exists(full_name, branch).await {
            Ok(found) => found,
            Err(e) => {
                log::warn!("branch check for {full_name} failed: {e}");
                false
            }
        };
        if has_branch {
            let descriptor = naming.describe(name, full_name);
            log::info!("{full_name} has {branch} => {}", descriptor.package_name);
            report.descriptors.push(descriptor);
        } else {
            log::info!("{full_name} has no {branch}, skipping");
            report.without_branch.push(full_name.to_string());
        }
    }
    Ok(report)
}
