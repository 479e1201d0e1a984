//! Loading persisted execution states and the detector configuration.

use crate::error::{CliError, CliResult};
use convenient_changes::{DetectorConfig, ExecutionState, IncrementalInputProperties};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::debug;

/// The recorded states of one unit of work.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitHistory {
    /// Display name, e.g. `Task ':compileJava'`
    pub name: String,
    /// State recorded after the previous execution
    pub previous: ExecutionState,
    /// State before the upcoming execution
    pub current: ExecutionState,
    /// Input file properties consumed incrementally
    #[serde(default)]
    pub incremental: IncrementalInputProperties,
    /// Detect outputs written by other units before comparing
    #[serde(default)]
    pub detect_overlaps: bool,
}

impl UnitHistory {
    /// The current state, with overlapping outputs detected if requested.
    #[must_use]
    pub fn current_state(&self) -> ExecutionState {
        if self.detect_overlaps {
            self.current.clone().detecting_overlaps_with(&self.previous)
        } else {
            self.current.clone()
        }
    }
}

/// A history file with many units of work.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct History {
    /// Units in the order they are reported
    #[serde(default)]
    pub units: Vec<UnitHistory>,
}

fn read(path: &Path) -> CliResult<String> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let content = read(path)?;
    serde_json::from_str(&content).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load one execution state.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid state.
pub fn load_state(path: &Path) -> CliResult<ExecutionState> {
    let state: ExecutionState = load_json(path)?;
    debug!(
        path = %path.display(),
        input_files = state.input_file_properties.len(),
        outputs = state.output_file_properties.len(),
        "Loaded execution state"
    );
    Ok(state)
}

/// Load a history file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid history.
pub fn load_history(path: &Path) -> CliResult<History> {
    let history: History = load_json(path)?;
    debug!(path = %path.display(), units = history.units.len(), "Loaded history");
    Ok(history)
}

/// Load the detector configuration, or the defaults without a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid YAML.
pub fn load_config(path: Option<&Path>) -> CliResult<DetectorConfig> {
    let Some(path) = path else {
        return Ok(DetectorConfig::default());
    };
    let content = read(path)?;
    let config = serde_yaml::from_str(&content).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), ?config, "Loaded detector configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_state() {
        let file = file_with(
            r#"{
                "implementation": { "type_name": "Copy", "class_loader_hash": "1" },
                "input_file_properties": {
                    "source": {
                        "strategy": "RELATIVE_PATH",
                        "fingerprints": {
                            "/src/a.txt": {
                                "normalized_path": "a.txt",
                                "file_type": "RegularFile",
                                "content_hash": "abc"
                            }
                        }
                    }
                }
            }"#,
        );

        let state = load_state(file.path()).unwrap();
        assert!(state.successful);
        assert_eq!(state.input_file_properties["source"].len(), 1);
    }

    #[test]
    fn test_invalid_state_names_the_file() {
        let file = file_with("{ not json");
        let err = load_state(file.path()).unwrap_err();

        assert!(matches!(err, CliError::Json { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_missing_file() {
        let err = load_state(Path::new("/does/not/exist.json")).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }

    #[test]
    fn test_load_history_defaults() {
        let file = file_with(
            r#"{
                "units": [{
                    "name": "Task ':copy'",
                    "previous": { "implementation": { "type_name": "Copy" } },
                    "current": { "implementation": { "type_name": "Copy" } }
                }]
            }"#,
        );

        let history = load_history(file.path()).unwrap();
        assert_eq!(history.units.len(), 1);
        assert_eq!(history.units[0].incremental, IncrementalInputProperties::None);
        assert!(!history.units[0].detect_overlaps);
    }

    #[test]
    fn test_load_config() {
        assert_eq!(load_config(None).unwrap(), DetectorConfig::default());

        let file = file_with("max_out_of_date_messages: 10\n");
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.max_out_of_date_messages, 10);
        assert_eq!(config.max_cached_changes, 3);

        let broken = file_with("max_cached_changes: [\n");
        assert!(matches!(
            load_config(Some(broken.path())),
            Err(CliError::Config { .. })
        ));
    }
}
