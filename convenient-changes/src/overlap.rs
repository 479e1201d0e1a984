//! Outputs shared with other units of work.
//!
//! When another unit of work writes into the same output locations, files it
//! produced or removed must not make this unit of work look out of date.

use crate::fingerprint::{FileCollectionFingerprint, FileType, FingerprintMap};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The first output location found to be touched by someone else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlappingOutputs {
    /// Output property the location belongs to
    pub property_name: String,
    /// Absolute path of the overlapped location
    pub overlapped_file_path: String,
}

impl OverlappingOutputs {
    /// Create a record of an overlapped output.
    pub fn new(property_name: impl Into<String>, overlapped_file_path: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            overlapped_file_path: overlapped_file_path.into(),
        }
    }

    /// Detect overlap in one output property.
    ///
    /// A location overlaps when it exists before this execution but was not
    /// recorded after the previous one, or was recorded with another type or
    /// content.
    #[must_use]
    pub fn detect(
        property_name: &str,
        after_previous_execution: &FingerprintMap,
        before_execution: &FingerprintMap,
    ) -> Option<Self> {
        before_execution
            .iter()
            .filter(|(_, before)| before.file_type != FileType::Missing)
            .find(|(path, before)| {
                after_previous_execution
                    .get(path.as_str())
                    .is_none_or(|previous| !previous.is_content_up_to_date(before))
            })
            .map(|(path, _)| Self::new(property_name, path.as_str()))
    }

    /// Detect overlap across all output properties, in property name order.
    #[must_use]
    pub fn detect_all(
        after_previous_execution: &BTreeMap<String, FileCollectionFingerprint>,
        before_execution: &BTreeMap<String, FileCollectionFingerprint>,
    ) -> Option<Self> {
        let empty = FingerprintMap::new();
        before_execution.iter().find_map(|(property_name, before)| {
            let previous = after_previous_execution
                .get(property_name)
                .map_or(&empty, |fingerprint| &fingerprint.fingerprints);
            Self::detect(property_name, previous, &before.fingerprints)
        })
    }
}

impl fmt::Display for OverlappingOutputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "output property '{}' with path '{}'",
            self.property_name, self.overlapped_file_path
        )
    }
}

/// Keep only the previous outputs that still exist in the current fingerprint.
///
/// Used before comparing outputs when overlap was detected, so outputs that
/// another unit of work already cleaned up are not reported as removed.
#[must_use]
pub fn retain_present_outputs(
    previous: &FingerprintMap,
    current: &FingerprintMap,
) -> FingerprintMap {
    previous
        .iter()
        .filter(|(path, _)| {
            current
                .get(path.as_str())
                .is_some_and(|fingerprint| fingerprint.file_type != FileType::Missing)
        })
        .map(|(path, fingerprint)| (path.clone(), fingerprint.clone()))
        .collect()
}

/// Filter an output fingerprint taken after execution down to this unit's outputs.
///
/// An entry is kept when it exists and was either created during the
/// execution, changed during the execution, or already an output after the
/// previous execution. Returns `after_execution` unchanged when all entries
/// qualify.
#[must_use]
pub fn filter_output_fingerprint(
    after_previous_execution: Option<&FileCollectionFingerprint>,
    before_execution: &FileCollectionFingerprint,
    after_execution: &FileCollectionFingerprint,
) -> FileCollectionFingerprint {
    if before_execution.is_empty() || after_execution.is_empty() {
        return after_execution.clone();
    }
    let empty = FingerprintMap::new();
    let previous = after_previous_execution.map_or(&empty, |fingerprint| &fingerprint.fingerprints);

    let outputs: FingerprintMap = after_execution
        .fingerprints
        .iter()
        .filter(|(path, after)| {
            if after.file_type == FileType::Missing {
                return false;
            }
            match before_execution.fingerprints.get(path.as_str()) {
                None => true,
                Some(before) => !after.is_content_up_to_date(before) || previous.contains_key(path.as_str()),
            }
        })
        .map(|(path, fingerprint)| (path.clone(), fingerprint.clone()))
        .collect();

    if outputs.len() == after_execution.len() {
        after_execution.clone()
    } else {
        FileCollectionFingerprint {
            strategy: after_execution.strategy.clone(),
            fingerprints: outputs,
        }
    }
}
