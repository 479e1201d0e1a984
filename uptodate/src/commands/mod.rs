//! Uptodate command-line interface
//!
//! Uptodate supports two modes of operation:
//! - `check`: Decide for one unit of work from two state files
//! - `batch`: Decide for every unit of work in a history file, in parallel

use clap::{Parser, Subcommand, crate_version};
use std::path::PathBuf;

pub mod batch;
pub mod check;

/// Uptodate - explains whether a unit of work has to run again
#[derive(Parser)]
#[command(name = "uptodate")]
#[command(about = "Explains whether a unit of work is up-to-date, incremental or must be rebuilt")]
#[command(version = crate_version!())]
pub struct Cli {
    /// Detector configuration (YAML)
    #[arg(short, long, global = true, env = "UPTODATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level: debug, info, warn, error
    #[arg(long, global = true, default_value = "info", env = "UPTODATE_LOG")]
    pub log_level: String,

    /// Print debug information
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Compare the previous and the current state of one unit of work
    Check {
        /// State recorded after the previous execution (JSON)
        #[arg(short, long)]
        previous: PathBuf,

        /// State before the upcoming execution (JSON)
        #[arg(short = 'n', long)]
        current: PathBuf,

        /// Display name of the unit of work
        #[arg(long, default_value = "unit of work")]
        name: String,

        /// Input file property consumed incrementally (repeatable)
        #[arg(short, long = "incremental")]
        incremental: Vec<String>,

        /// Consume every input file property incrementally
        #[arg(long, conflicts_with = "incremental")]
        all_incremental: bool,

        /// Detect outputs written by other units before comparing
        #[arg(long)]
        detect_overlaps: bool,

        /// Print every incremental input file change
        #[arg(short, long)]
        details: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check every unit of work of a history file
    Batch {
        /// History file with the units of work (JSON)
        #[arg(long)]
        history: PathBuf,

        /// Print the reports as JSON
        #[arg(long)]
        json: bool,
    },
}
