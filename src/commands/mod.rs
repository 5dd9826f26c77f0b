//! Command dispatch and handlers.

pub mod fetch;
pub mod manifest;
pub mod publicize;
pub mod resolve;
pub mod stage;
pub mod submit;

use std::env;
use std::path::PathBuf;

use anyhow::Context as _;

use crate::cli::{Cli, Command};
use crate::context::ServiceContext;
use crate::settings::Settings;

/// Environment variable naming a cassette file to record the run into.
pub const RECORD_ENV: &str = "ROSPORT_RECORD";

/// Dispatch a parsed command line to its handler.
///
/// When `ROSPORT_RECORD` is set to a file path, every port interaction is
/// recorded to a cassette written there once the command finishes.
///
/// # Errors
///
/// Returns an error if settings cannot be loaded or the command fails a
/// precondition.
pub fn dispatch(cli: &Cli) -> anyhow::Result<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    apply_overrides(&mut settings, &cli.command);

    let ctx = match env::var_os(RECORD_ENV) {
        Some(path) => ServiceContext::recording(&settings, &PathBuf::from(path))?,
        None => ServiceContext::live(&settings)?,
    };

    // The cassette is written when the context drops, even on error.
    dispatch_with_context(&cli.command, &ctx, &settings)
}

/// Dispatch a command with the given service context and settings.
///
/// # Errors
///
/// Returns an error if the command fails a precondition.
pub fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    settings: &Settings,
) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    runtime.block_on(async {
        match command {
            Command::Resolve { .. } => resolve::run(ctx, &settings.resolver),
            Command::Fetch { .. } => fetch::run(ctx, &settings.fetcher).await,
            Command::Manifest { .. } => manifest::run(ctx, settings).await,
            Command::Submit { .. } => submit::run(ctx, &settings.publisher).await,
            Command::Publicize { dry_run, yes, .. } => {
                publicize::run(ctx, settings, *dry_run, *yes).await
            }
            Command::Stage { .. } => stage::run(ctx, settings).await,
        }
    })
}

fn set<T: Clone>(slot: &mut T, value: Option<&T>) {
    if let Some(value) = value {
        *slot = value.clone();
    }
}

/// Applies command-line flags on top of file and environment settings.
pub fn apply_overrides(settings: &mut Settings, command: &Command) {
    match command {
        Command::Resolve { input, output, fail_list, target } => {
            let resolver = &mut settings.resolver;
            set(&mut resolver.input, input.as_ref());
            set(&mut resolver.output, output.as_ref());
            set(&mut resolver.fail_list, fail_list.as_ref());
            set(&mut resolver.target_distro, target.as_ref());
        }
        Command::Fetch { branch, workers, dest } => {
            let fetcher = &mut settings.fetcher;
            set(&mut fetcher.branch, branch.as_ref());
            set(&mut fetcher.max_workers, workers.as_ref());
            set(&mut fetcher.clone_root, dest.as_ref());
        }
        Command::Manifest { user, branch, output } => {
            if user.is_some() {
                settings.host.username.clone_from(user);
            }
            set(&mut settings.publisher.target_branch, branch.as_ref());
            set(&mut settings.publisher.list_path, output.as_ref());
        }
        Command::Submit { list, project, branch } => {
            let publisher = &mut settings.publisher;
            set(&mut publisher.list_path, list.as_ref());
            set(&mut publisher.project, project.as_ref());
            set(&mut publisher.target_branch, branch.as_ref());
        }
        Command::Publicize { org, .. } => {
            if org.is_some() {
                settings.host.org.clone_from(org);
            }
        }
        Command::Stage { specs, sources, output, org } => {
            let stager = &mut settings.stager;
            set(&mut stager.specs_dir, specs.as_ref());
            set(&mut stager.sources_dir, sources.as_ref());
            set(&mut stager.output_dir, output.as_ref());
            if org.is_some() {
                settings.host.org.clone_from(org);
            }
        }
    }
}
