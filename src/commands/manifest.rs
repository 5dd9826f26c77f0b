//! `rosport manifest` command.

use anyhow::Context as _;

use crate::context::ServiceContext;
use crate::publisher::descriptor::{save_list, Naming};
use crate::publisher::manifest::build;
use crate::settings::Settings;

/// Execute the `manifest` command.
///
/// # Errors
///
/// Returns an error if no account is configured, the listing fails or the
/// list cannot be written.
pub async fn run(ctx: &ServiceContext, settings: &Settings) -> anyhow::Result<()> {
    let user = settings.host.require_username()?;
    let publisher = &settings.publisher;
    let naming = Naming {
        web_base: settings.host.web_base.clone(),
        package_prefix: publisher.package_prefix.clone(),
        spec_suffix: publisher.spec_suffix.clone(),
    };

    let report = build(ctx, user, &publisher.target_branch, &naming, publisher.per_page)
        .await
        .with_context(|| format!("failed to list repositories of {user}"))?;
    let written = save_list(ctx.fs.as_ref(), &publisher.list_path, &report.descriptors)?;

    println!(
        "{} repositories listed, {} with branch {}, {} without, {} malformed.",
        report.listed,
        report.descriptors.len(),
        publisher.target_branch,
        report.without_branch.len(),
        report.malformed
    );
    println!("Wrote {written} packages to {}", publisher.list_path.display());
    Ok(())
}
