//! `rosport resolve` command.

use crate::context::ServiceContext;
use crate::resolver::oracle::DnfOracle;
use crate::resolver::{manifest, resolve};
use crate::settings::ResolverSettings;

/// Execute the `resolve` command.
///
/// # Errors
///
/// Returns an error if the input manifest is missing or unreadable, or an
/// output file cannot be written.
pub fn run(ctx: &ServiceContext, settings: &ResolverSettings) -> anyhow::Result<()> {
    let fs = ctx.fs.as_ref();
    let mut rosdep = manifest::load(fs, &settings.input)?;
    log::info!("loaded {} keys from {}", rosdep.len(), settings.input.display());

    let oracle = DnfOracle::new(ctx.shell.as_ref());
    let summary = resolve(&mut rosdep, &settings.target_distro, &settings.fallback_chain, |pkg| {
        oracle.exists(pkg)
    });

    manifest::save(fs, &settings.output, &rosdep)?;
    manifest::save_failures(fs, &settings.fail_list, &summary.failed)?;

    println!(
        "Processed {} keys: {} updated, {} failed.",
        summary.processed,
        summary.changed,
        summary.failed.len()
    );
    println!("Manifest written to {}", settings.output.display());
    println!("Failed keys written to {}", settings.fail_list.display());
    Ok(())
}
