//! Core library entry for the `rosport` CLI.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod context;
pub mod fetcher;
pub mod ports;
pub mod publisher;
pub mod resolver;
pub mod settings;
pub mod stager;

#[cfg(test)]
pub(crate) mod fakes;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// Help and version requests print and return `Ok`.
///
/// # Errors
///
/// Returns an error when argument parsing fails or the command fails.
pub fn run<I, T>(args: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            err.print()?;
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };
    init_logging(cli.verbose);
    commands::dispatch(&cli)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    // A second run in the same process keeps the first logger.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_target(false)
        .try_init();
}
