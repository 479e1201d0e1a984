//! Error types for the command-line front end.

use convenient_changes::ChangeError;
use std::path::PathBuf;

/// Errors while loading states or reporting changes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// File system I/O error
    #[error("IO error reading {path}: {source}")]
    Io {
        /// The file that could not be read
        path: PathBuf,
        /// The underlying error
        source: std::io::Error,
    },

    /// A state or history file is not valid JSON
    #[error("Parse error in {path}: {source}")]
    Json {
        /// The file that could not be parsed
        path: PathBuf,
        /// The underlying error
        source: serde_json::Error,
    },

    /// The detector configuration is not valid YAML
    #[error("Invalid detector configuration in {path}: {source}")]
    Config {
        /// The configuration file
        path: PathBuf,
        /// The underlying error
        source: serde_yaml::Error,
    },

    /// A report could not be rendered as JSON
    #[error("Cannot render report: {0}")]
    Render(#[from] serde_json::Error),

    /// Changes could not be detected
    #[error(transparent)]
    Detection(#[from] ChangeError),
}

/// Result type for the command-line front end.
pub type CliResult<T> = Result<T, CliError>;
