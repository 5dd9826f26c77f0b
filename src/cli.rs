//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Top-level CLI parser for `rosport`.
#[derive(Debug, Parser)]
#[command(name = "rosport", version, about = "Port ROS packages to openEuler")]
pub struct Cli {
    /// YAML settings file (defaults to `$ROSPORT_CONFIG` when set).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (`-v` debug, `-vv` trace). `RUST_LOG` wins.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add openEuler package names to a rosdep manifest.
    Resolve {
        /// Source rosdep manifest.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Augmented manifest to write.
        #[arg(long)]
        output: Option<PathBuf>,
        /// File receiving the keys that failed verification.
        #[arg(long)]
        fail_list: Option<PathBuf>,
        /// Distribution key to add.
        #[arg(long)]
        target: Option<String>,
    },
    /// Clone the upstream source of every indexed package.
    Fetch {
        /// Branch to clone before falling back to the default branch.
        #[arg(long)]
        branch: Option<String>,
        /// Number of packages processed concurrently.
        #[arg(long)]
        workers: Option<usize>,
        /// Directory clones are created in.
        #[arg(long)]
        dest: Option<PathBuf>,
    },
    /// Write the Package Submission List from branch-filtered repositories.
    Manifest {
        /// Account whose repositories are listed.
        #[arg(long)]
        user: Option<String>,
        /// Branch a repository must carry.
        #[arg(long)]
        branch: Option<String>,
        /// Where the list is written.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Submit the Package Submission List to the build farm.
    Submit {
        /// Package Submission List to read.
        #[arg(long)]
        list: Option<PathBuf>,
        /// Build-farm project.
        #[arg(long)]
        project: Option<String>,
        /// Branch the farm builds from.
        #[arg(long)]
        branch: Option<String>,
    },
    /// Make private repositories public.
    Publicize {
        /// Organization to operate on instead of the token owner.
        #[arg(long)]
        org: Option<String>,
        /// Only list the private repositories.
        #[arg(long)]
        dry_run: bool,
        /// Confirm the visibility change.
        #[arg(long)]
        yes: bool,
    },
    /// Turn built specs and tarballs into pushed repositories.
    Stage {
        /// Directory of `.spec` files.
        #[arg(long)]
        specs: Option<PathBuf>,
        /// Directory of source tarballs.
        #[arg(long)]
        sources: Option<PathBuf>,
        /// Directory working copies are created in.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Organization to create repositories under.
        #[arg(long)]
        org: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn parses_resolve_overrides() {
        let cli = Cli::parse_from(["rosport", "resolve", "--input", "base.yaml", "--target", "oe"]);
        match cli.command {
            Command::Resolve { input, target, output, .. } => {
                assert_eq!(input, Some(PathBuf::from("base.yaml")));
                assert_eq!(target.as_deref(), Some("oe"));
                assert!(output.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::parse_from(["rosport", "fetch", "--workers", "4", "-vv", "--config", "r.yaml"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("r.yaml")));
        assert!(matches!(cli.command, Command::Fetch { workers: Some(4), .. }));
    }

    #[test]
    fn publicize_defaults_to_no_acknowledgement() {
        let cli = Cli::parse_from(["rosport", "publicize"]);
        assert!(matches!(cli.command, Command::Publicize { dry_run: false, yes: false, .. }));
    }

    #[test]
    fn rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["rosport", "plan"]).is_err());
    }
}
