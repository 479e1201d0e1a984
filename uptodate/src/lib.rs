//! Uptodate - explains whether a unit of work has to run again
//!
//! Uptodate is a thin front end over **convenient-changes**. It loads the
//! execution states a build tool persisted for its units of work, runs the
//! change detector and reports the decision:
//!
//! 1. **Loading**: execution states and histories as JSON, the detector
//!    configuration as YAML ([`history`])
//! 2. **Detection**: [`convenient_changes::DefaultExecutionStateChangeDetector`]
//! 3. **Reporting**: text or JSON reports per unit of work ([`report`])
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use uptodate::commands::check::{self, CheckOptions};
//! use uptodate::IncrementalInputProperties;
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = CheckOptions {
//!     previous: Path::new("build/state/compileJava.previous.json"),
//!     current: Path::new("build/state/compileJava.current.json"),
//!     name: "Task ':compileJava'",
//!     incremental: IncrementalInputProperties::declared(["sources"]),
//!     detect_overlaps: false,
//!     details: true,
//! };
//! let report = check::execute(&options, Default::default())?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(unused_results)]

pub mod commands;
pub mod error;
pub mod history;
pub mod report;

// Re-export the engine types used on the command line
pub use convenient_changes::{DetectorConfig, ExecutionState, IncrementalInputProperties};
pub use error::{CliError, CliResult};
pub use report::{Decision, Summary, UnitReport};
