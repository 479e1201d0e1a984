//! Check command for a single unit of work

use crate::error::CliResult;
use crate::history::load_state;
use crate::report::UnitReport;
use convenient_changes::{
    DefaultExecutionStateChangeDetector, DetectorConfig, ExecutionStateChangeDetector,
    IncrementalInputProperties,
};
use std::path::Path;
use tracing::info;

/// Options of the check command.
#[derive(Debug, Clone)]
pub struct CheckOptions<'a> {
    /// State recorded after the previous execution
    pub previous: &'a Path,
    /// State before the upcoming execution
    pub current: &'a Path,
    /// Display name of the unit of work
    pub name: &'a str,
    /// Input file properties consumed incrementally
    pub incremental: IncrementalInputProperties,
    /// Detect outputs written by other units before comparing
    pub detect_overlaps: bool,
    /// Replay every incremental input file change
    pub details: bool,
}

/// Incremental properties from the command-line flags.
#[must_use]
pub fn incremental_properties(names: &[String], all: bool) -> IncrementalInputProperties {
    if all {
        IncrementalInputProperties::All
    } else if names.is_empty() {
        IncrementalInputProperties::None
    } else {
        IncrementalInputProperties::declared(names.iter().cloned())
    }
}

/// Compare the two states of one unit of work.
///
/// # Errors
///
/// Returns an error if a state cannot be loaded or its changes cannot be
/// detected.
pub fn execute(options: &CheckOptions<'_>, config: DetectorConfig) -> CliResult<UnitReport> {
    let previous = load_state(options.previous)?;
    let mut current = load_state(options.current)?;
    if options.detect_overlaps {
        current = current.detecting_overlaps_with(&previous);
        if let Some(overlapping) = &current.detected_overlapping_outputs {
            info!("Detected overlapping outputs: {overlapping}");
        }
    }

    let detector = DefaultExecutionStateChangeDetector::new(config);
    let mut changes =
        detector.detect_changes(&previous, &current, options.name, &options.incremental)?;
    UnitReport::from_changes(options.name, &mut changes, options.details)
}
