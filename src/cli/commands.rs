//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Singer tap for AWS Athena
#[derive(Parser, Debug)]
#[command(name = "tap-athena")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the tap's configuration specification
    Spec,

    /// Test the connection to Athena
    Check {
        /// Inline config JSON
        #[arg(long)]
        config_json: Option<String>,
    },

    /// Discover streams and print the catalog
    Discover {
        /// Inline config JSON
        #[arg(long)]
        config_json: Option<String>,
    },

    /// Sync selected streams, emitting Singer messages to stdout
    Sync {
        /// Catalog file produced by discover, with operator annotations
        #[arg(long)]
        catalog: PathBuf,

        /// State file from the previous run
        #[arg(long)]
        state: Option<PathBuf>,

        /// Inline state JSON
        #[arg(long)]
        state_json: Option<String>,

        /// Inline config JSON
        #[arg(long)]
        config_json: Option<String>,
    },
}
