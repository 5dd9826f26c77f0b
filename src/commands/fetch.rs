//! `rosport fetch` command.

use anyhow::Context as _;

use crate::context::ServiceContext;
use crate::fetcher::{fetch_all, FetchSummary};
use crate::settings::FetcherSettings;

/// Execute the `fetch` command.
///
/// # Errors
///
/// Returns an error if the package index cannot be fetched or parsed.
pub async fn run(ctx: &ServiceContext, settings: &FetcherSettings) -> anyhow::Result<()> {
    let summary = fetch_all(ctx, settings)
        .await
        .with_context(|| format!("cannot read the package index at {}", settings.sitemap_url))?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &FetchSummary) {
    println!("Processed {} packages:", summary.outcomes.len());
    println!("  cloned:                  {}", summary.cloned());
    println!("  default-branch fallback: {}", summary.default_branch_fallbacks());
    println!("  already present:         {}", summary.already_present());
    println!("  no repository found:     {}", summary.unresolved());
    let failures: Vec<_> = summary.failures().collect();
    println!("  failed:                  {}", failures.len());
    for (repo_url, error) in failures {
        println!("    {repo_url}: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{self, FakeWeb};
    use crate::ports::PortError;

    #[tokio::test]
    async fn unreachable_index_is_fatal() {
        let settings = FetcherSettings::default();
        let mut ctx = fakes::context();
        ctx.web = Box::new(
            FakeWeb::default()
                .failing(&settings.sitemap_url, PortError::transport("connection refused")),
        );

        let err = run(&ctx, &settings).await.unwrap_err();
        assert!(format!("{err:#}").contains("connection refused"));
    }
}
