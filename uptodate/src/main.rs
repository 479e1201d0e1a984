//! Uptodate - explains whether a unit of work has to run again
//!
//! Loads persisted execution states, runs the change detector and prints
//! whether each unit of work is up-to-date, incremental or must be rebuilt.

use clap::Parser;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use uptodate::commands::check::{self, CheckOptions, incremental_properties};
use uptodate::commands::{Cli, Commands, batch};
use uptodate::history::load_config;
use uptodate::report::batch_to_json;

/// Gets the log level enum variant from a level string.
///
/// Unknown levels fall back to `INFO`.
fn get_log_level(level: &str) -> Level {
    match level.to_uppercase().as_ref() {
        "TRACE" => Level::TRACE,
        "DEBUG" => Level::DEBUG,
        "WARN" => Level::WARN,
        "ERROR" | "FATAL" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn init_tracing(cli: &Cli) {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        get_log_level(&cli.log_level)
    };
    let level = level.as_str().to_lowercase();
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("uptodate={level},convenient_changes={level}").into()
            }),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Check {
            previous,
            current,
            name,
            incremental,
            all_incremental,
            detect_overlaps,
            details,
            json,
        } => {
            let options = CheckOptions {
                previous: &previous,
                current: &current,
                name: &name,
                incremental: incremental_properties(&incremental, all_incremental),
                detect_overlaps,
                details,
            };
            let report = check::execute(&options, config)?;
            if json {
                println!("{}", report.to_json()?);
            } else {
                println!("{report}");
            }
        }
        Commands::Batch { history, json } => {
            let (reports, summary) = batch::execute(&history, config)?;
            if json {
                println!("{}", batch_to_json(&reports, &summary)?);
            } else {
                for report in &reports {
                    println!("{report}");
                }
                println!();
                println!("{summary}");
            }
        }
    }

    Ok(())
}
