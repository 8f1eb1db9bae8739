use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Bootstrap a host for building the project, then launch it
#[derive(Parser, Debug)]
#[command(name = "hostprep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Installs system build dependencies and launches a release build", long_about = None)]
pub struct Args {
    /// Verbose logging
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install the C toolchain, pkg-config and OpenSSL headers via apt, dnf or pacman
    InstallDeps {
        /// Show the install commands without running them
        #[arg(short = 'n', long = "dry-run")]
        dry_run: bool,

        /// Directory for the install log (defaults to the temp directory)
        #[arg(long = "log-dir", value_name = "DIR")]
        log_dir: Option<PathBuf>,
    },

    /// Check build dependency status without installing
    CheckDeps {
        /// Print the report as JSON
        #[arg(long = "json")]
        json: bool,
    },

    /// Build and run the project in release mode
    Run {
        /// Project directory (defaults to the one containing this executable)
        #[arg(long = "project-dir", value_name = "DIR")]
        project_dir: Option<PathBuf>,

        /// Arguments passed through to the project binary
        #[arg(last = true, value_name = "ARGS")]
        forwarded: Vec<String>,
    },
}

/// Parses command-line arguments
pub fn parse_args() -> Args {
    Args::parse()
}
