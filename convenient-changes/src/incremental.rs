//! Which input file properties a unit of work consumes incrementally.

use crate::error::{ChangeError, ChangeResult};
use crate::fingerprint::FileCollectionFingerprint;
use crate::stage::{DefaultInputFileChanges, FileProperties, RebuildInputFileChanges, select};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Input file properties whose changes are reported file by file.
///
/// Changes of the other input file properties make the whole unit of work
/// out of date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncrementalInputProperties {
    /// No property is incremental
    #[default]
    None,
    /// Every input file property is incremental
    All,
    /// Only the named properties are incremental
    Declared(BTreeSet<String>),
}

impl IncrementalInputProperties {
    /// Declare the given properties as incremental.
    pub fn declared<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Declared(names.into_iter().map(Into::into).collect())
    }

    /// Returns true if changes of the property are reported file by file.
    #[must_use]
    pub fn is_incremental(&self, property_name: &str) -> bool {
        match self {
            Self::None => false,
            Self::All => true,
            Self::Declared(names) => names.contains(property_name),
        }
    }

    /// Validate that per-property changes can be queried for a property.
    ///
    /// # Errors
    ///
    /// Returns `ChangeError::NoIncrementalProperties` if nothing is
    /// incremental, and `ChangeError::NotIncremental` if the property is not
    /// declared as incremental.
    pub fn property_name_for<'n>(&self, property_name: &'n str) -> ChangeResult<&'n str> {
        match self {
            Self::None => Err(ChangeError::NoIncrementalProperties {
                property: property_name.to_string(),
            }),
            Self::Declared(names) if !names.contains(property_name) => {
                Err(ChangeError::NotIncremental {
                    property: property_name.to_string(),
                })
            }
            Self::All | Self::Declared(_) => Ok(property_name),
        }
    }

    /// Changes of the incremental properties.
    #[must_use]
    pub fn incremental_changes<'a>(
        &self,
        previous: &'a BTreeMap<String, FileCollectionFingerprint>,
        current: &'a BTreeMap<String, FileCollectionFingerprint>,
    ) -> DefaultInputFileChanges<'a> {
        let is_incremental = |name: &str| self.is_incremental(name);
        DefaultInputFileChanges::from_properties(
            select(previous, is_incremental),
            select(current, is_incremental),
        )
    }

    /// Changes of the properties that are not incremental.
    #[must_use]
    pub fn non_incremental_changes<'a>(
        &self,
        previous: &'a BTreeMap<String, FileCollectionFingerprint>,
        current: &'a BTreeMap<String, FileCollectionFingerprint>,
    ) -> DefaultInputFileChanges<'a> {
        let is_non_incremental = |name: &str| !self.is_incremental(name);
        DefaultInputFileChanges::from_properties(
            select(previous, is_non_incremental),
            select(current, is_non_incremental),
        )
    }

    /// Every current file of the incremental properties, reported as added.
    #[must_use]
    pub fn rebuild_changes<'a>(
        &self,
        current: &'a BTreeMap<String, FileCollectionFingerprint>,
    ) -> RebuildInputFileChanges<'a> {
        let current: FileProperties<'a> = select(current, |name| self.is_incremental(name));
        RebuildInputFileChanges::new(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{ChangeContainer, InputFileChanges};
    use crate::fingerprint::{ContentHash, FileSystemLocationFingerprint};
    use crate::visitor::CollectingChangeVisitor;

    fn properties() -> (
        BTreeMap<String, FileCollectionFingerprint>,
        BTreeMap<String, FileCollectionFingerprint>,
    ) {
        let fingerprint = |hash: &str| {
            FileCollectionFingerprint::new("ABSOLUTE_PATH")
                .with("/f", FileSystemLocationFingerprint::file("f", ContentHash::new(hash)))
        };
        let previous = [("a", fingerprint("1")), ("b", fingerprint("1"))]
            .into_iter()
            .map(|(name, fp)| (name.to_string(), fp))
            .collect();
        let current = [("a", fingerprint("2")), ("b", fingerprint("2"))]
            .into_iter()
            .map(|(name, fp)| (name.to_string(), fp))
            .collect();
        (previous, current)
    }

    fn count(mut changes: DefaultInputFileChanges<'_>) -> usize {
        let mut visitor = CollectingChangeVisitor::new();
        assert!(changes.accept(&mut visitor).unwrap());
        visitor.changes().len()
    }

    #[test]
    fn test_partition_of_properties() {
        let (previous, current) = properties();

        let none = IncrementalInputProperties::None;
        assert_eq!(count(none.incremental_changes(&previous, &current)), 0);
        assert_eq!(count(none.non_incremental_changes(&previous, &current)), 2);

        let all = IncrementalInputProperties::All;
        assert_eq!(count(all.incremental_changes(&previous, &current)), 2);
        assert_eq!(count(all.non_incremental_changes(&previous, &current)), 0);

        let declared = IncrementalInputProperties::declared(["a"]);
        assert_eq!(count(declared.incremental_changes(&previous, &current)), 1);
        assert_eq!(count(declared.non_incremental_changes(&previous, &current)), 1);
    }

    #[test]
    fn test_property_name_for() {
        assert!(matches!(
            IncrementalInputProperties::None.property_name_for("a"),
            Err(ChangeError::NoIncrementalProperties { .. })
        ));
        assert!(matches!(
            IncrementalInputProperties::declared(["a"]).property_name_for("b"),
            Err(ChangeError::NotIncremental { .. })
        ));
        assert_eq!(
            IncrementalInputProperties::declared(["a"])
                .property_name_for("a")
                .unwrap(),
            "a"
        );
        assert_eq!(IncrementalInputProperties::All.property_name_for("z").unwrap(), "z");
    }

    #[test]
    fn test_rebuild_changes_only_cover_incremental_properties() {
        let (_, current) = properties();
        let mut rebuild = IncrementalInputProperties::declared(["b"]).rebuild_changes(&current);
        let mut visitor = CollectingChangeVisitor::new();

        assert!(rebuild.accept(&mut visitor).unwrap());
        assert_eq!(
            visitor.messages(),
            vec!["Input file property 'b' file /f has been added."]
        );
        assert!(rebuild.accept_property("a", &mut visitor).is_err());
    }

    #[test]
    fn test_deserialize() {
        let declared: IncrementalInputProperties =
            serde_json::from_str(r#"{"declared": ["sources"]}"#).unwrap();
        assert!(declared.is_incremental("sources"));
        assert!(!declared.is_incremental("classpath"));

        let all: IncrementalInputProperties = serde_json::from_str(r#""all""#).unwrap();
        assert_eq!(all, IncrementalInputProperties::All);
    }
}
