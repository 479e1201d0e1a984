//! File fingerprints as recorded before and after an execution.
//!
//! Computing fingerprints is the job of the snapshotting layer. This module
//! only describes the values that the change detector compares.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Type of a file system location at the time it was fingerprinted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
    /// A regular file
    RegularFile,
    /// A directory
    Directory,
    /// Nothing exists at the location
    Missing,
}

/// Content identity hash (hex encoded).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    /// Wrap an already computed hash.
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Calculate the SHA256 hash of some content.
    #[must_use]
    pub fn from_content(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Get the hash as a string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fingerprint of a single file system location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileSystemLocationFingerprint {
    /// Path after applying the property's path sensitivity
    pub normalized_path: String,
    /// Type of the location
    pub file_type: FileType,
    /// Hash of the normalized content
    pub content_hash: ContentHash,
}

impl FileSystemLocationFingerprint {
    /// Create a new fingerprint.
    pub fn new(
        normalized_path: impl Into<String>,
        file_type: FileType,
        content_hash: ContentHash,
    ) -> Self {
        Self {
            normalized_path: normalized_path.into(),
            file_type,
            content_hash,
        }
    }

    /// Fingerprint of a regular file.
    pub fn file(normalized_path: impl Into<String>, content_hash: ContentHash) -> Self {
        Self::new(normalized_path, FileType::RegularFile, content_hash)
    }

    /// Fingerprint of a directory. All directories share the same content hash.
    pub fn directory(normalized_path: impl Into<String>) -> Self {
        Self::new(
            normalized_path,
            FileType::Directory,
            ContentHash::new(DIRECTORY_HASH),
        )
    }

    /// Fingerprint of a location where nothing exists.
    pub fn missing(normalized_path: impl Into<String>) -> Self {
        Self::new(normalized_path, FileType::Missing, ContentHash::new(MISSING_HASH))
    }

    /// Returns true if both fingerprints describe the same content.
    #[must_use]
    pub fn is_content_up_to_date(&self, other: &Self) -> bool {
        self.file_type == other.file_type && self.content_hash == other.content_hash
    }
}

const DIRECTORY_HASH: &str = "directory";
const MISSING_HASH: &str = "missing";

/// Absolute path to fingerprint, in the order the files were visited.
pub type FingerprintMap = IndexMap<String, FileSystemLocationFingerprint>;

/// Fingerprint of all files of one input or output property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCollectionFingerprint {
    /// Identifier of the fingerprinting strategy, as persisted
    pub strategy: String,
    /// Fingerprints keyed by absolute path
    #[serde(default)]
    pub fingerprints: FingerprintMap,
}

impl FileCollectionFingerprint {
    /// Create an empty fingerprint for the given strategy identifier.
    pub fn new(strategy: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            fingerprints: IndexMap::new(),
        }
    }

    /// Add a location, keeping visiting order.
    #[must_use]
    pub fn with(
        mut self,
        absolute_path: impl Into<String>,
        fingerprint: FileSystemLocationFingerprint,
    ) -> Self {
        let _ = self.fingerprints.insert(absolute_path.into(), fingerprint);
        self
    }

    /// Create a fingerprint from already collected entries.
    pub fn from_entries<I, P>(strategy: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (P, FileSystemLocationFingerprint)>,
        P: Into<String>,
    {
        Self {
            strategy: strategy.into(),
            fingerprints: entries
                .into_iter()
                .map(|(path, fingerprint)| (path.into(), fingerprint))
                .collect(),
        }
    }

    /// Number of fingerprinted locations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    /// Returns true if no location was fingerprinted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_is_stable() {
        let a = ContentHash::from_content(b"fn main() {}");
        let b = ContentHash::from_content(b"fn main() {}");
        let c = ContentHash::from_content(b"fn main() { panic!() }");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str().len(), 64);
    }

    #[test]
    fn test_collection_keeps_insertion_order() {
        let collection = FileCollectionFingerprint::new("CLASSPATH")
            .with("/z.jar", FileSystemLocationFingerprint::file("", ContentHash::new("1")))
            .with("/a.jar", FileSystemLocationFingerprint::file("", ContentHash::new("2")));

        let paths: Vec<_> = collection.fingerprints.keys().cloned().collect();
        assert_eq!(paths, vec!["/z.jar", "/a.jar"]);
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_json_round_trip_preserves_order() {
        let collection = FileCollectionFingerprint::new("RELATIVE_PATH")
            .with("/src/b.rs", FileSystemLocationFingerprint::file("b.rs", ContentHash::new("b")))
            .with("/src/a.rs", FileSystemLocationFingerprint::file("a.rs", ContentHash::new("a")))
            .with("/src", FileSystemLocationFingerprint::directory(""));

        let json = serde_json::to_string(&collection).unwrap();
        let parsed: FileCollectionFingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, collection);
        assert_eq!(
            parsed.fingerprints.keys().collect::<Vec<_>>(),
            vec!["/src/b.rs", "/src/a.rs", "/src"]
        );
    }

    #[test]
    fn test_content_up_to_date_ignores_normalized_path() {
        let a = FileSystemLocationFingerprint::file("a.txt", ContentHash::new("h"));
        let b = FileSystemLocationFingerprint::file("b.txt", ContentHash::new("h"));
        let missing = FileSystemLocationFingerprint::missing("a.txt");

        assert!(a.is_content_up_to_date(&b));
        assert!(!a.is_content_up_to_date(&missing));
    }
}
