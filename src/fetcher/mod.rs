//! Source fetcher: discovers packages from the index and clones their
//! upstream repositories.
//!
//! Entries are processed by a bounded pool of concurrent tasks. Each entry
//! runs page fetch, link resolution and clone end to end; a failure is
//! recorded against the entry and never stops the batch.

pub mod checkout;
pub mod index;

use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};
use url::Url;

use crate::context::ServiceContext;
use crate::ports::PortError;
use crate::settings::FetcherSettings;
use checkout::{checkout_dir_name, SourceLinks};

/// What happened to one index entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Cloned at the configured branch, or at the default branch after the
    /// configured one failed.
    Cloned {
        /// Checkout directory.
        dir: PathBuf,
        /// Whether the default-branch retry was needed.
        default_branch: bool,
    },
    /// The checkout directory already existed; nothing was fetched.
    AlreadyPresent {
        /// Existing checkout directory.
        dir: PathBuf,
    },
    /// No repository could be derived from the package page.
    Unresolved,
    /// Both clone attempts failed.
    Failed {
        /// Repository URL that could not be cloned.
        repo_url: String,
        /// Error of the final attempt.
        error: PortError,
    },
}

/// Per-entry outcomes of a fetch run.
#[derive(Debug, Default)]
pub struct FetchSummary {
    /// Entry page URL and its outcome, in completion order.
    pub outcomes: Vec<(String, FetchOutcome)>,
}

impl FetchSummary {
    fn count(&self, pred: impl Fn(&FetchOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }

    /// Entries cloned in this run.
    #[must_use]
    pub fn cloned(&self) -> usize {
        self.count(|o| matches!(o, FetchOutcome::Cloned { .. }))
    }

    /// Entries cloned only after falling back to the default branch.
    #[must_use]
    pub fn default_branch_fallbacks(&self) -> usize {
        self.count(|o| matches!(o, FetchOutcome::Cloned { default_branch: true, .. }))
    }

    /// Entries whose checkout already existed.
    #[must_use]
    pub fn already_present(&self) -> usize {
        self.count(|o| matches!(o, FetchOutcome::AlreadyPresent { .. }))
    }

    /// Entries without a resolvable repository.
    #[must_use]
    pub fn unresolved(&self) -> usize {
        self.count(|o| matches!(o, FetchOutcome::Unresolved))
    }

    /// Entries whose clone failed.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &PortError)> {
        self.outcomes.iter().filter_map(|(_, o)| match o {
            FetchOutcome::Failed { repo_url, error } => Some((repo_url.as_str(), error)),
            _ => None,
        })
    }
}

/// Fetches the sitemap and returns the package page URLs.
///
/// # Errors
///
/// Returns an error if the sitemap cannot be fetched or parsed; the run
/// cannot proceed without it.
pub async fn discover(
    ctx: &ServiceContext,
    settings: &FetcherSettings,
) -> Result<Vec<String>, PortError> {
    let sitemap = ctx.web.get_text(&settings.sitemap_url).await?;
    index::package_pages(&sitemap, &settings.package_marker).map_err(PortError::decode)
}

/// Resolves a package page to its canonical repository URL.
///
/// Fetch failures count as "no repository".
pub async fn resolve_repo(ctx: &ServiceContext, links: &SourceLinks, page: &str) -> Option<String> {
    let page_url = match Url::parse(page) {
        Ok(url) => url,
        Err(e) => {
            log::warn!("skipping malformed page URL {page}: {e}");
            return None;
        }
    };
    match ctx.web.get_text(page).await {
        Ok(html) => links.repo_url(&html, &page_url),
        Err(e) => {
            log::warn!("failed to fetch {page}: {e}");
            None
        }
    }
}

/// Clones `repo_url` under `root`, pinned to `branch` with a single retry at
/// the default branch.
///
/// An existing checkout directory is taken as done and no git operation
/// runs.
pub async fn clone_repo(
    ctx: &ServiceContext,
    root: &Path,
    repo_url: &str,
    branch: &str,
) -> FetchOutcome {
    let Some(name) = checkout_dir_name(repo_url) else {
        return FetchOutcome::Failed {
            repo_url: repo_url.to_string(),
            error: PortError::decode(format!("no directory name in {repo_url}")),
        };
    };
    let dir = root.join(name);
    if ctx.fs.exists(&dir) {
        log::info!("{} already exists, skipping", dir.display());
        return FetchOutcome::AlreadyPresent { dir };
    }

    log::info!("cloning {repo_url} ({branch}) into {}", dir.display());
    let Err(e) = ctx.git.clone_repo(repo_url, Some(branch), &dir).await else {
        return FetchOutcome::Cloned { dir, default_branch: false };
    };
    log::warn!("clone of {repo_url} at {branch} failed: {e}; retrying default branch");

    match ctx.git.clone_repo(repo_url, None, &dir).await {
        Ok(()) => FetchOutcome::Cloned { dir, default_branch: true },
        Err(error) => {
            log::error!("failed to clone {repo_url}: {error}");
            FetchOutcome::Failed { repo_url: repo_url.to_string(), error }
        }
    }
}

async fn process(
    ctx: &ServiceContext,
    links: &SourceLinks,
    settings: &FetcherSettings,
    page: String,
) -> (String, FetchOutcome) {
    log::debug!("processing {page}");
    let outcome = match resolve_repo(ctx, links, &page).await {
        Some(repo_url) => clone_repo(ctx, &settings.clone_root, &repo_url, &settings.branch).await,
        None => FetchOutcome::Unresolved,
    };
    (page, outcome)
}

/// Runs discovery and then every entry through the worker pool.
///
/// # Errors
///
/// Returns an error when discovery fails or the configured organization
/// cannot form a redirect pattern. Per-entry failures are in the summary.
pub async fn fetch_all(
    ctx: &ServiceContext,
    settings: &FetcherSettings,
) -> Result<FetchSummary, PortError> {
    let links =
        SourceLinks::new(&settings.source_host, &settings.redirect_org).map_err(PortError::decode)?;
    let pages = discover(ctx, settings).await?;
    log::info!("found {} package pages", pages.len());

    let outcomes = stream::iter(pages)
        .map(|page| process(ctx, &links, settings, page))
        .buffer_unordered(settings.max_workers.max(1))
        .collect::<Vec<_>>()
        .await;
    Ok(FetchSummary { outcomes })
}
