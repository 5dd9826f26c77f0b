//! `rosport submit` command.

use anyhow::Context as _;

use crate::context::ServiceContext;
use crate::publisher::descriptor::load_list;
use crate::publisher::submit::{ensure_project, submit_all, SubmitOutcome};
use crate::settings::{CoprCredentials, PublisherSettings};

/// Execute the `submit` command.
///
/// # Errors
///
/// Returns an error if the build-farm configuration is unusable, the project
/// does not exist or the submission list cannot be read. Rejected
/// submissions are reported, not returned.
pub async fn run(ctx: &ServiceContext, settings: &PublisherSettings) -> anyhow::Result<()> {
    let credentials = CoprCredentials::load(&settings.farm_config)
        .context("build-farm configuration is required to submit packages")?;
    let owner = credentials.username.as_str();

    ensure_project(ctx.farm.as_ref(), owner, &settings.project)
        .await
        .with_context(|| format!("build-farm project {owner}/{} is not usable", settings.project))?;
    let descriptors = load_list(ctx.fs.as_ref(), &settings.list_path)?;
    log::info!("{} entries in {}", descriptors.len(), settings.list_path.display());

    let report = submit_all(
        ctx.farm.as_ref(),
        owner,
        &settings.project,
        &settings.target_branch,
        &descriptors,
    )
    .await;

    println!("Submitted {} of {} packages to {owner}/{}:", report.submitted(), report.outcomes.len(), settings.project);
    for (package, outcome) in &report.outcomes {
        match outcome {
            SubmitOutcome::Submitted { id: Some(id) } => println!("  ok      {package} (id {id})"),
            SubmitOutcome::Submitted { id: None } => println!("  ok      {package}"),
            SubmitOutcome::Dropped { reason } => println!("  skipped {package}: {reason}"),
            SubmitOutcome::Failed { error } => println!("  failed  {package}: {error}"),
        }
    }
    Ok(())
}
