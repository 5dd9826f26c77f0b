//! Stager: turns locally built spec files and source tarballs into git
//! repositories on the source host.
//!
//! Each spec file is staged on its own; a failure skips that package and
//! the run moves on.

pub mod spec_file;

use std::path::Path;

use crate::context::ServiceContext;
use crate::ports::{NewRepo, PortError};
use crate::settings::StagerSettings;
use spec_file::{render_readme, repo_name, SpecInfo};

const COMMIT_MESSAGE: &str = "Initial commit with source tarball, spec file, and README.";

/// What happened to one spec file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// Nothing was pushed because the inputs were unusable.
    Skipped {
        /// Why the spec was skipped.
        reason: String,
    },
    /// The remote repository could not be created; the push was skipped.
    CreateFailed {
        /// Host error.
        error: PortError,
    },
    /// The push to the new repository failed.
    PushFailed {
        /// Git error.
        error: PortError,
    },
    /// The working copy was pushed.
    Pushed {
        /// Browser URL of the new repository.
        html_url: String,
    },
}

/// Per-spec outcomes in file-name order.
#[derive(Debug, Default)]
pub struct StageReport {
    /// Spec file name and its outcome.
    pub outcomes: Vec<(String, StageOutcome)>,
}

impl StageReport {
    /// Browser URLs of the pushed repositories.
    pub fn pushed(&self) -> impl Iterator<Item = &str> {
        self.outcomes.iter().filter_map(|(_, o)| match o {
            StageOutcome::Pushed { html_url } => Some(html_url.as_str()),
            _ => None,
        })
    }
}

fn skipped(reason: impl Into<String>) -> StageOutcome {
    let reason = reason.into();
    log::warn!("{reason}, skipping");
    StageOutcome::Skipped { reason }
}

/// Stages every `*.spec` file in the specs directory.
///
/// # Errors
///
/// Returns an error if the specs directory cannot be listed.
pub async fn stage_all(
    ctx: &ServiceContext,
    settings: &StagerSettings,
    org: Option<&str>,
) -> Result<StageReport, PortError> {
    let mut report = StageReport::default();
    for file in ctx.fs.list_dir(&settings.specs_dir)? {
        if !file.ends_with(".spec") {
            continue;
        }
        let outcome = stage_one(ctx, settings, org, &settings.specs_dir.join(&file)).await;
        report.outcomes.push((file, outcome));
    }
    Ok(report)
}

async fn stage_one(
    ctx: &ServiceContext,
    settings: &StagerSettings,
    org: Option<&str>,
    spec_path: &Path,
) -> StageOutcome {
    let content = match ctx.fs.read_to_string(spec_path) {
        Ok(content) => content,
        Err(e) => return skipped(format!("cannot read {}: {e}", spec_path.display())),
    };
    let info = SpecInfo::parse(&content);
    let (Some(name), Some(version)) = (info.name.as_deref(), info.version.as_deref()) else {
        return skipped(format!("no Name or Version in {}", spec_path.display()));
    };
    log::info!("staging {name} {version}");

    let tarball = settings.sources_dir.join(format!("{name}-{version}.tar.gz"));
    if !ctx.fs.exists(&tarball) {
        return skipped(format!("source tarball {} not found", tarball.display()));
    }

    let dependencies = info.dependencies(&settings.dependency_prefixes);
    let repo = repo_name(name, &settings.name_prefix);
    let repo_dir = settings.output_dir.join(repo);

    let populated = ctx
        .fs
        .copy_into(&tarball, &repo_dir)
        .and_then(|()| ctx.fs.copy_into(spec_path, &repo_dir))
        .and_then(|()| {
            ctx.fs.write(&repo_dir.join("README.md"), &render_readme(name, version, &dependencies))
        });
    if let Err(e) = populated {
        return skipped(format!("cannot populate {}: {e}", repo_dir.display()));
    }

    if let Err(e) = ctx.git.init(&repo_dir).await {
        return skipped(format!("git init in {} failed: {e}", repo_dir.display()));
    }
    match ctx.git.commit_all(&repo_dir, COMMIT_MESSAGE).await {
        Ok(true) => log::debug!("committed {repo}"),
        Ok(false) => log::info!("{repo} has nothing new to commit"),
        Err(e) => log::warn!("commit in {repo} failed: {e}"),
    }

    let request = NewRepo {
        name: repo.to_string(),
        org: org.map(str::to_string),
        description: format!("Repository for {repo}"),
        private: false,
    };
    let created = match ctx.host.create_repo(&request).await {
        Ok(created) => created,
        Err(error) => {
            log::error!("creating remote repository {repo} failed: {error}; not pushing");
            return StageOutcome::CreateFailed { error };
        }
    };
    log::info!("created {}", created.full_name);

    match ctx.git.push(&repo_dir, &created.push_url, &settings.branch).await {
        Ok(()) => {
            log::info!("pushed {repo} to {}", created.html_url);
            StageOutcome::Pushed { html_url: created.html_url }
        }
        Err(error) => {
            log::error!("pushing {repo} failed: {error}");
            StageOutcome::PushFailed { error }
        }
    }
}
