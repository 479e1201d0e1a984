//! Detector configuration.

use crate::visitor::MAX_OUT_OF_DATE_MESSAGES;
use serde::{Deserialize, Serialize};

/// Limits applied when reporting changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Number of out-of-date reasons reported before truncating
    pub max_out_of_date_messages: usize,
    /// Number of incremental input file changes kept for replay
    pub max_cached_changes: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_out_of_date_messages: MAX_OUT_OF_DATE_MESSAGES,
            max_cached_changes: MAX_OUT_OF_DATE_MESSAGES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DetectorConfig::default();
        assert_eq!(config.max_out_of_date_messages, 3);
        assert_eq!(config.max_cached_changes, 3);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: DetectorConfig =
            serde_json::from_str(r#"{ "max_cached_changes": 100 }"#).unwrap();
        assert_eq!(config.max_out_of_date_messages, 3);
        assert_eq!(config.max_cached_changes, 100);
    }
}
