//! `rosport publicize` command.

use anyhow::Context as _;

use crate::context::ServiceContext;
use crate::ports::RepoScope;
use crate::publisher::visibility::{make_public, private_repos};
use crate::settings::Settings;

/// Execute the `publicize` command.
///
/// Private repositories are always listed first. Nothing changes unless
/// `yes` is given, and `dry_run` wins over `yes`.
///
/// # Errors
///
/// Returns an error if no token is configured or the listing fails.
pub async fn run(
    ctx: &ServiceContext,
    settings: &Settings,
    dry_run: bool,
    yes: bool,
) -> anyhow::Result<()> {
    settings.host.require_token()?;
    let scope = match &settings.host.org {
        Some(org) => RepoScope::Org(org.clone()),
        None => RepoScope::Authenticated,
    };

    let repos = private_repos(ctx.host.as_ref(), &scope, settings.publisher.per_page)
        .await
        .context("failed to list repositories")?;
    if repos.is_empty() {
        println!("No private repositories found.");
        return Ok(());
    }

    println!("{} private repositories:", repos.len());
    for repo in &repos {
        println!("  {}", repo.full_name.as_deref().unwrap_or("<unnamed>"));
    }
    if dry_run {
        println!("Dry run, nothing changed.");
        return Ok(());
    }
    if !yes {
        println!("Re-run with --yes to make them public.");
        return Ok(());
    }

    let report = make_public(ctx.host.as_ref(), &repos).await;
    println!("Made {} repositories public:", report.made_public.len());
    for url in &report.made_public {
        println!("  {url}");
    }
    if !report.failed.is_empty() {
        println!("Failed to change {}:", report.failed.len());
        for (repo, reason) in &report.failed {
            println!("  {repo}: {reason}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{self, calls, repo, FakeHost};

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.host.token = Some("t0k".into());
        settings.host.org = Some("ros".into());
        settings
    }

    fn host() -> FakeHost {
        FakeHost {
            repos: vec![repo("ros", "a", true), repo("ros", "b", false), repo("ros", "c", true)],
            ..FakeHost::default()
        }
    }

    fn patches(host: &FakeHost) -> Vec<String> {
        calls(&host.calls).into_iter().filter(|c| c.starts_with("patch")).collect()
    }

    #[tokio::test]
    async fn without_acknowledgement_nothing_changes() {
        let host = host();
        let mut ctx = fakes::context();
        ctx.host = Box::new(host.clone());

        run(&ctx, &settings(), false, false).await.unwrap();
        run(&ctx, &settings(), true, true).await.unwrap();
        assert!(patches(&host).is_empty());
    }

    #[tokio::test]
    async fn acknowledged_run_patches_each_private_repo() {
        let host = host();
        let mut ctx = fakes::context();
        ctx.host = Box::new(host.clone());

        run(&ctx, &settings(), false, true).await.unwrap();
        assert_eq!(patches(&host), vec!["patch ros/a private=false", "patch ros/c private=false"]);
        assert!(calls(&host.calls)[0].starts_with("list Org(\"ros\")"));
    }

    #[tokio::test]
    async fn missing_token_is_fatal() {
        let err = run(&fakes::context(), &Settings::default(), false, true).await.unwrap_err();
        assert!(err.to_string().contains("GITEE_TOKEN"));
    }
}
