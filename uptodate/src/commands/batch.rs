//! Batch command checking many units of work in parallel

use crate::error::{CliError, CliResult};
use crate::history::{UnitHistory, load_history};
use crate::report::{Summary, UnitReport};
use convenient_changes::{
    DefaultExecutionStateChangeDetector, DetectorConfig, ExecutionStateChangeDetector,
};
use rayon::prelude::*;
use std::path::Path;
use tracing::{info, warn};

/// Check one unit of work. Failures are reported, not returned.
fn check_unit(detector: &DefaultExecutionStateChangeDetector, unit: &UnitHistory) -> UnitReport {
    let current = unit.current_state();
    let report = detector
        .detect_changes(&unit.previous, &current, unit.name.as_str(), &unit.incremental)
        .map_err(CliError::from)
        .and_then(|mut changes| UnitReport::from_changes(unit.name.as_str(), &mut changes, false));
    report.unwrap_or_else(|error| {
        warn!(unit = %unit.name, "Cannot check unit: {error}");
        UnitReport::failed(unit.name.as_str(), &error)
    })
}

/// Check every unit of work of a history file.
///
/// Reports keep the order of the history file.
///
/// # Errors
///
/// Returns an error if the history file cannot be loaded.
pub fn execute(history: &Path, config: DetectorConfig) -> CliResult<(Vec<UnitReport>, Summary)> {
    let history = load_history(history)?;
    info!("Checking {} units of work", history.units.len());

    let detector = DefaultExecutionStateChangeDetector::new(config);
    let reports: Vec<UnitReport> = history
        .units
        .par_iter()
        .map(|unit| check_unit(&detector, unit))
        .collect();

    let summary = Summary::of(&reports);
    info!("{summary}");
    Ok((reports, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Decision;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn unit(name: &str, previous_hash: &str, current_hash: &str, strategy: &str) -> String {
        let state = |hash: &str| {
            format!(
                r#"{{
                    "implementation": {{ "type_name": "Copy", "class_loader_hash": "1" }},
                    "input_file_properties": {{
                        "source": {{
                            "strategy": "{strategy}",
                            "fingerprints": {{
                                "/src/a.txt": {{
                                    "normalized_path": "a.txt",
                                    "file_type": "RegularFile",
                                    "content_hash": "{hash}"
                                }}
                            }}
                        }}
                    }}
                }}"#
            )
        };
        format!(
            r#"{{ "name": "{name}", "previous": {}, "current": {}, "incremental": "all" }}"#,
            state(previous_hash),
            state(current_hash)
        )
    }

    #[test]
    fn test_batch_keeps_order_and_reports_failures() {
        let units = [
            unit("Task ':a'", "1", "1", "RELATIVE_PATH"),
            unit("Task ':b'", "1", "2", "ABSOLUTE_PATH"),
            unit("Task ':c'", "1", "2", "CONTENT_ONLY"),
        ];
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "units": [{}] }}"#, units.join(",")).unwrap();

        let (reports, summary) = execute(file.path(), DetectorConfig::default()).unwrap();

        let decisions: Vec<_> = reports.iter().map(|r| (r.name.as_str(), r.decision)).collect();
        assert_eq!(
            decisions,
            vec![
                ("Task ':a'", Decision::UpToDate),
                ("Task ':b'", Decision::Incremental),
                ("Task ':c'", Decision::Failed),
            ]
        );
        assert_eq!(reports[2].messages[0], "Cannot determine changes for Task ':c'");
        assert_eq!(summary.failed, 1);
    }
}
