//! Execution states compared by the detector.

use crate::fingerprint::{ContentHash, FileCollectionFingerprint};
use crate::overlap::OverlappingOutputs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Snapshot of an input property value.
pub type ValueSnapshot = serde_json::Value;

/// Identity of the code that executes a unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImplementationSnapshot {
    /// Name of the implementing type
    pub type_name: String,
    /// Hash of the class loader hierarchy, if it could be determined
    #[serde(default)]
    pub class_loader_hash: Option<ContentHash>,
}

impl ImplementationSnapshot {
    /// An implementation loaded by a known class loader.
    pub fn new(type_name: impl Into<String>, class_loader_hash: ContentHash) -> Self {
        Self {
            type_name: type_name.into(),
            class_loader_hash: Some(class_loader_hash),
        }
    }

    /// An implementation whose class loader could not be determined.
    pub fn unknown(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            class_loader_hash: None,
        }
    }

    /// Returns true if the class loader could not be determined.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.class_loader_hash.is_none()
    }
}

impl fmt::Display for ImplementationSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.class_loader_hash {
            Some(hash) => write!(f, "{}@{}", self.type_name, hash),
            None => write!(f, "{}@<unknown classloader>", self.type_name),
        }
    }
}

/// Everything recorded about one execution of a unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionState {
    /// Whether the execution completed successfully
    #[serde(default = "successful_by_default")]
    pub successful: bool,

    /// Implementation of the unit of work
    pub implementation: ImplementationSnapshot,

    /// Implementations of additional actions, in execution order
    #[serde(default)]
    pub additional_implementations: Vec<ImplementationSnapshot>,

    /// Input property values by property name
    #[serde(default)]
    pub input_properties: BTreeMap<String, ValueSnapshot>,

    /// Input file fingerprints by property name
    #[serde(default)]
    pub input_file_properties: BTreeMap<String, FileCollectionFingerprint>,

    /// Output file fingerprints by property name
    #[serde(default)]
    pub output_file_properties: BTreeMap<String, FileCollectionFingerprint>,

    /// Outputs another unit of work wrote to, if any were detected
    #[serde(default)]
    pub detected_overlapping_outputs: Option<OverlappingOutputs>,
}

fn successful_by_default() -> bool {
    true
}

impl ExecutionState {
    /// A successful state with no properties.
    #[must_use]
    pub fn new(implementation: ImplementationSnapshot) -> Self {
        Self {
            successful: true,
            implementation,
            additional_implementations: Vec::new(),
            input_properties: BTreeMap::new(),
            input_file_properties: BTreeMap::new(),
            output_file_properties: BTreeMap::new(),
            detected_overlapping_outputs: None,
        }
    }

    /// Set whether the execution succeeded.
    #[must_use]
    pub fn with_success(mut self, successful: bool) -> Self {
        self.successful = successful;
        self
    }

    /// Add an additional action implementation.
    #[must_use]
    pub fn with_additional_implementation(mut self, implementation: ImplementationSnapshot) -> Self {
        self.additional_implementations.push(implementation);
        self
    }

    /// Set an input property value.
    #[must_use]
    pub fn with_input_property(mut self, name: impl Into<String>, value: ValueSnapshot) -> Self {
        let _ = self.input_properties.insert(name.into(), value);
        self
    }

    /// Set the fingerprint of an input file property.
    #[must_use]
    pub fn with_input_files(
        mut self,
        name: impl Into<String>,
        fingerprint: FileCollectionFingerprint,
    ) -> Self {
        let _ = self.input_file_properties.insert(name.into(), fingerprint);
        self
    }

    /// Set the fingerprint of an output file property.
    #[must_use]
    pub fn with_output_files(
        mut self,
        name: impl Into<String>,
        fingerprint: FileCollectionFingerprint,
    ) -> Self {
        let _ = self.output_file_properties.insert(name.into(), fingerprint);
        self
    }

    /// Record outputs that were written by someone else.
    #[must_use]
    pub fn with_overlapping_outputs(mut self, overlapping: Option<OverlappingOutputs>) -> Self {
        self.detected_overlapping_outputs = overlapping;
        self
    }

    /// Detect outputs overlapping with the outputs recorded after `previous`.
    #[must_use]
    pub fn detecting_overlaps_with(self, previous: &ExecutionState) -> Self {
        let overlapping = OverlappingOutputs::detect_all(
            &previous.output_file_properties,
            &self.output_file_properties,
        );
        self.with_overlapping_outputs(overlapping)
    }
}

/// Something with a name to show users, like a task.
pub trait Describable {
    /// Name shown in change messages.
    fn display_name(&self) -> String;
}

impl Describable for str {
    fn display_name(&self) -> String {
        self.to_string()
    }
}

impl Describable for String {
    fn display_name(&self) -> String {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::FileSystemLocationFingerprint;
    use serde_json::json;

    #[test]
    fn test_state_from_json_uses_defaults() {
        let state: ExecutionState = serde_json::from_str(
            r#"{
                "implementation": { "type_name": "JavaCompile", "class_loader_hash": "abc" },
                "input_properties": { "release": 17 }
            }"#,
        )
        .unwrap();

        assert!(state.successful);
        assert_eq!(state.implementation.type_name, "JavaCompile");
        assert!(!state.implementation.is_unknown());
        assert_eq!(state.input_properties["release"], json!(17));
        assert!(state.output_file_properties.is_empty());
        assert!(state.detected_overlapping_outputs.is_none());
    }

    #[test]
    fn test_detecting_overlaps() {
        let previous = ExecutionState::new(ImplementationSnapshot::new("Copy", ContentHash::new("1")))
            .with_output_files(
                "destination",
                FileCollectionFingerprint::new("OUTPUT")
                    .with("/out", FileSystemLocationFingerprint::directory("out")),
            );
        let current = previous.clone().with_output_files(
            "destination",
            FileCollectionFingerprint::new("OUTPUT")
                .with("/out", FileSystemLocationFingerprint::directory("out"))
                .with(
                    "/out/stranger.txt",
                    FileSystemLocationFingerprint::file("stranger.txt", ContentHash::new("s")),
                ),
        );

        let current = current.detecting_overlaps_with(&previous);
        let overlapping = current.detected_overlapping_outputs.unwrap();
        assert_eq!(overlapping.property_name, "destination");
        assert_eq!(overlapping.overlapped_file_path, "/out/stranger.txt");
    }

    #[test]
    fn test_implementation_display() {
        assert_eq!(
            ImplementationSnapshot::new("Copy", ContentHash::new("ab")).to_string(),
            "Copy@ab"
        );
        assert_eq!(
            ImplementationSnapshot::unknown("Copy").to_string(),
            "Copy@<unknown classloader>"
        );
    }
}
