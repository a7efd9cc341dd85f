//! Command line argument parsing
//!
//! Subcommands:
//! - `export`: snapshot all session state into one archive and stream it out
//! - `import`: restore session state from a previously exported archive
//! - `purge`: permanently wipe the token store and user data tree
//! - `sessions`: list persisted session identifiers

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "warden")]
#[command(author = "Session Warden Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Session lifecycle orchestrator for a pool of automation-browser sessions")]
#[command(long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,
    /// Base directory anchoring the token store and archive paths
    #[arg(long = "base-dir", global = true)]
    pub base_dir: Option<PathBuf>,
    /// Live user data tree location
    #[arg(long = "user-data-dir", global = true)]
    pub user_data_dir: Option<PathBuf>,
    /// Print the operation summary as JSON on stdout
    #[arg(long = "json", global = true)]
    pub json: bool,
    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Snapshot all session state into a single archive and stream it out
    Export {
        /// Destination file (defaults to streaming the archive to stdout)
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Restore session state from a previously exported archive
    Import {
        /// Path to the uploaded archive
        file: PathBuf,
        /// Declared content type (defaults from the file extension)
        #[arg(long = "content-type")]
        content_type: Option<String>,
    },
    /// Permanently wipe the token store and user data tree
    Purge {
        /// Confirm the irreversible wipe
        #[arg(long = "yes")]
        yes: bool,
    },
    /// List persisted session identifiers
    Sessions,
}
