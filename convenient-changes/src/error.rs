//! Error types for change detection.

/// Error types for change detection.
#[derive(Debug, thiserror::Error)]
pub enum ChangeError {
    /// A fingerprint was recorded with a strategy this engine cannot compare.
    #[error("Unknown fingerprinting strategy '{0}'")]
    UnknownStrategy(String),

    /// A comparison failed while detecting changes for a unit of work.
    #[error("Cannot determine changes for {executable}")]
    Detection {
        /// Display name of the unit of work being compared
        executable: String,
        /// The underlying comparison fault
        #[source]
        source: Box<ChangeError>,
    },

    /// Per-property changes were requested but nothing is incremental.
    #[error(
        "Cannot query incremental changes for property '{property}': No incremental properties declared."
    )]
    NoIncrementalProperties {
        /// The requested property
        property: String,
    },

    /// Per-property changes were requested for a non-incremental property.
    #[error(
        "Cannot query incremental changes for property '{property}': Requested property is not declared as incremental."
    )]
    NotIncremental {
        /// The requested property
        property: String,
    },

    /// Per-property changes were requested for a property without a current fingerprint.
    #[error("Cannot query changes for unknown input file property '{property}'")]
    UnknownProperty {
        /// The requested property
        property: String,
    },
}

impl ChangeError {
    /// Returns true for errors caused by querying changes the wrong way,
    /// as opposed to a fault while comparing fingerprints.
    #[must_use]
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::NoIncrementalProperties { .. }
                | Self::NotIncremental { .. }
                | Self::UnknownProperty { .. }
        )
    }
}

/// Result type for change detection.
pub type ChangeResult<T> = Result<T, ChangeError>;
