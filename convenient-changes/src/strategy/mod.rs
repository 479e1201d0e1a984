//! Compare strategies diffing two fingerprints of one property.
//!
//! The strategy is chosen by the fingerprinting strategy the property was
//! recorded with:
//!
//! | Identifier | Strategy |
//! |------------|----------|
//! | `ABSOLUTE_PATH`, `OUTPUT` | [`CompareStrategy::AbsolutePath`] |
//! | `RELATIVE_PATH`, `NAME_ONLY` | [`CompareStrategy::NormalizedPath`] |
//! | `IGNORED_PATH` | [`CompareStrategy::IgnoredPath`] |
//! | `CLASSPATH`, `COMPILE_CLASSPATH` | [`CompareStrategy::Classpath`] |

mod absolute;
mod classpath;
mod normalized;

use crate::change::{Change, FileChange};
use crate::error::{ChangeError, ChangeResult};
use crate::fingerprint::{FileSystemLocationFingerprint, FingerprintMap};
use crate::visitor::ChangeVisitor;
use std::fmt;

/// Fingerprinting strategy identifier for absolute path sensitive inputs.
pub const ABSOLUTE_PATH: &str = "ABSOLUTE_PATH";
/// Fingerprinting strategy identifier for outputs.
pub const OUTPUT: &str = "OUTPUT";
/// Fingerprinting strategy identifier for relative path sensitive inputs.
pub const RELATIVE_PATH: &str = "RELATIVE_PATH";
/// Fingerprinting strategy identifier for name only sensitive inputs.
pub const NAME_ONLY: &str = "NAME_ONLY";
/// Fingerprinting strategy identifier for path insensitive inputs.
pub const IGNORED_PATH: &str = "IGNORED_PATH";
/// Fingerprinting strategy identifier for runtime classpaths.
pub const CLASSPATH: &str = "CLASSPATH";
/// Fingerprinting strategy identifier for compile classpaths.
pub const COMPILE_CLASSPATH: &str = "COMPILE_CLASSPATH";

/// How two fingerprints of the same property are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareStrategy {
    /// Files are the same entry iff their absolute paths match
    AbsolutePath,
    /// Files are matched by normalized path and content, tolerating moves
    NormalizedPath,
    /// Nothing is ever reported
    IgnoredPath,
    /// Order sensitive comparison of classpath entries
    Classpath,
}

impl CompareStrategy {
    /// Look up the compare strategy for a fingerprinting strategy identifier.
    ///
    /// # Errors
    ///
    /// Returns `ChangeError::UnknownStrategy` for identifiers this engine
    /// does not know how to compare.
    pub fn from_identifier(identifier: &str) -> ChangeResult<Self> {
        match identifier {
            ABSOLUTE_PATH | OUTPUT => Ok(Self::AbsolutePath),
            RELATIVE_PATH | NAME_ONLY => Ok(Self::NormalizedPath),
            IGNORED_PATH => Ok(Self::IgnoredPath),
            CLASSPATH | COMPILE_CLASSPATH => Ok(Self::Classpath),
            unknown => Err(ChangeError::UnknownStrategy(unknown.to_string())),
        }
    }

    /// Visit the changes between two fingerprints of one property.
    ///
    /// Returns `false` as soon as the visitor asks to stop.
    pub fn visit_changes_since(
        self,
        previous: &FingerprintMap,
        current: &FingerprintMap,
        property_title: &str,
        visitor: &mut dyn ChangeVisitor,
    ) -> bool {
        match self {
            Self::IgnoredPath => true,
            Self::Classpath => classpath::visit_changes_since(previous, current, property_title, visitor),
            Self::AbsolutePath => visit_trivial_changes(
                previous,
                current,
                property_title,
                visitor,
                |path, _| path,
            )
            .unwrap_or_else(|| {
                absolute::visit_changes_since(previous, current, property_title, visitor)
            }),
            Self::NormalizedPath => visit_trivial_changes(
                previous,
                current,
                property_title,
                visitor,
                |_, fingerprint| fingerprint.normalized_path.as_str(),
            )
            .unwrap_or_else(|| {
                normalized::visit_changes_since(previous, current, property_title, visitor)
            }),
        }
    }
}

impl fmt::Display for CompareStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AbsolutePath => "absolute path",
            Self::NormalizedPath => "normalized path",
            Self::IgnoredPath => "ignored path",
            Self::Classpath => "classpath",
        };
        f.write_str(name)
    }
}

/// Handles the cheap cases: one side empty, or a single entry on each side.
///
/// `identity` decides whether two entries are the same file. Returns `None`
/// when the full comparison is needed.
fn visit_trivial_changes<'a>(
    previous: &'a FingerprintMap,
    current: &'a FingerprintMap,
    property_title: &str,
    visitor: &mut dyn ChangeVisitor,
    identity: impl Fn(&'a str, &'a FileSystemLocationFingerprint) -> &'a str,
) -> Option<bool> {
    if current.is_empty() {
        return Some(previous.iter().all(|(path, fingerprint)| {
            visit_removed(visitor, property_title, path, fingerprint)
        }));
    }
    if previous.is_empty() {
        return Some(current.iter().all(|(path, fingerprint)| {
            visit_added(visitor, property_title, path, fingerprint)
        }));
    }
    if previous.len() == 1 && current.len() == 1 {
        let (previous_path, previous_fingerprint) = previous.first()?;
        let (current_path, current_fingerprint) = current.first()?;
        if identity(previous_path.as_str(), previous_fingerprint)
            == identity(current_path.as_str(), current_fingerprint)
        {
            if previous_fingerprint.content_hash == current_fingerprint.content_hash {
                return Some(true);
            }
            return Some(visit_modified(
                visitor,
                property_title,
                current_path,
                previous_fingerprint,
                current_fingerprint,
            ));
        }
        return Some(
            visit_removed(visitor, property_title, previous_path, previous_fingerprint)
                && visit_added(visitor, property_title, current_path, current_fingerprint),
        );
    }
    None
}

fn visit_added(
    visitor: &mut dyn ChangeVisitor,
    property_title: &str,
    path: &str,
    current: &FileSystemLocationFingerprint,
) -> bool {
    visitor.visit_change(&Change::File(FileChange::added(
        path,
        property_title,
        current.file_type,
        current.normalized_path.as_str(),
    )))
}

fn visit_removed(
    visitor: &mut dyn ChangeVisitor,
    property_title: &str,
    path: &str,
    previous: &FileSystemLocationFingerprint,
) -> bool {
    visitor.visit_change(&Change::File(FileChange::removed(
        path,
        property_title,
        previous.file_type,
        previous.normalized_path.as_str(),
    )))
}

fn visit_modified(
    visitor: &mut dyn ChangeVisitor,
    property_title: &str,
    path: &str,
    previous: &FileSystemLocationFingerprint,
    current: &FileSystemLocationFingerprint,
) -> bool {
    visitor.visit_change(&Change::File(FileChange::modified(
        path,
        property_title,
        previous.file_type,
        current.file_type,
        current.normalized_path.as_str(),
    )))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::fingerprint::{
        ContentHash, FileSystemLocationFingerprint, FingerprintMap,
    };

    /// Build a fingerprint map from (absolute path, normalized path, hash) triples.
    pub(crate) fn fingerprints(entries: &[(&str, &str, &str)]) -> FingerprintMap {
        entries
            .iter()
            .map(|(path, normalized, hash)| {
                (
                    (*path).to_string(),
                    FileSystemLocationFingerprint::file(*normalized, ContentHash::new(*hash)),
                )
            })
            .collect()
    }
}
