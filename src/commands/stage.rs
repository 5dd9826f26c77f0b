//! `rosport stage` command.

use anyhow::Context as _;

use crate::context::ServiceContext;
use crate::settings::Settings;
use crate::stager::{stage_all, StageOutcome};

/// Execute the `stage` command.
///
/// # Errors
///
/// Returns an error if no token is configured or the specs directory cannot
/// be listed.
pub async fn run(ctx: &ServiceContext, settings: &Settings) -> anyhow::Result<()> {
    settings.host.require_token()?;
    let stager = &settings.stager;

    let report = stage_all(ctx, stager, settings.host.org.as_deref())
        .await
        .with_context(|| format!("cannot list spec files in {}", stager.specs_dir.display()))?;

    let pushed: Vec<&str> = report.pushed().collect();
    println!("Pushed {} of {} packages:", pushed.len(), report.outcomes.len());
    for url in pushed {
        println!("  {url}");
    }
    for (spec, outcome) in &report.outcomes {
        match outcome {
            StageOutcome::Pushed { .. } => {}
            StageOutcome::Skipped { reason } => println!("  skipped {spec}: {reason}"),
            StageOutcome::CreateFailed { error } => {
                println!("  failed  {spec}: cannot create repository: {error}");
            }
            StageOutcome::PushFailed { error } => println!("  failed  {spec}: push: {error}"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{self, MemFs};

    #[tokio::test]
    async fn missing_token_is_fatal() {
        let err = run(&fakes::context(), &Settings::default()).await.unwrap_err();
        assert!(err.to_string().contains("GITEE_TOKEN"));
    }

    #[tokio::test]
    async fn missing_specs_directory_is_fatal() {
        let mut settings = Settings::default();
        settings.host.token = Some("t0k".into());
        settings.stager.specs_dir = "/nowhere/SPECS".into();
        let mut ctx = fakes::context();
        ctx.fs = Box::new(MemFs::default());

        let err = run(&ctx, &settings).await.unwrap_err();
        assert!(err.to_string().contains("/nowhere/SPECS"));
    }
}
