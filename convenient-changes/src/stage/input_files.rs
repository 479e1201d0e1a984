use crate::change::{Change, FileChange};
use crate::container::{ChangeContainer, InputFileChanges};
use crate::error::{ChangeError, ChangeResult};
use crate::fingerprint::{FileCollectionFingerprint, FingerprintMap};
use crate::strategy::CompareStrategy;
use crate::visitor::ChangeVisitor;
use std::collections::BTreeMap;

/// Input file fingerprints by property name, borrowed from an execution state.
pub type FileProperties<'a> = BTreeMap<&'a str, &'a FileCollectionFingerprint>;

/// Select the properties whose name matches `filter`.
pub(crate) fn select<'a>(
    properties: &'a BTreeMap<String, FileCollectionFingerprint>,
    filter: impl Fn(&str) -> bool,
) -> FileProperties<'a> {
    properties
        .iter()
        .filter(|(name, _)| filter(name))
        .map(|(name, fingerprint)| (name.as_str(), fingerprint))
        .collect()
}

fn input_file_title(property_name: &str) -> String {
    format!("Input file property '{property_name}'")
}

/// Changes of input files, compared with the strategy each property was
/// fingerprinted with.
///
/// Properties are visited in name order; only properties present on both
/// sides are compared.
#[derive(Debug, Clone, Default)]
pub struct DefaultInputFileChanges<'a> {
    previous: FileProperties<'a>,
    current: FileProperties<'a>,
}

impl<'a> DefaultInputFileChanges<'a> {
    /// Compare all properties of both sides.
    #[must_use]
    pub fn new(
        previous: &'a BTreeMap<String, FileCollectionFingerprint>,
        current: &'a BTreeMap<String, FileCollectionFingerprint>,
    ) -> Self {
        Self::from_properties(select(previous, |_| true), select(current, |_| true))
    }

    /// Compare already selected properties.
    #[must_use]
    pub fn from_properties(previous: FileProperties<'a>, current: FileProperties<'a>) -> Self {
        Self { previous, current }
    }

    fn visit_property(
        property_name: &str,
        previous: &FingerprintMap,
        current: &FileCollectionFingerprint,
        visitor: &mut dyn ChangeVisitor,
    ) -> ChangeResult<bool> {
        let strategy = CompareStrategy::from_identifier(&current.strategy)?;
        Ok(strategy.visit_changes_since(
            previous,
            &current.fingerprints,
            &input_file_title(property_name),
            visitor,
        ))
    }
}

impl ChangeContainer for DefaultInputFileChanges<'_> {
    fn accept(&mut self, visitor: &mut dyn ChangeVisitor) -> ChangeResult<bool> {
        for (name, current) in &self.current {
            let Some(previous) = self.previous.get(name) else {
                continue;
            };
            if !Self::visit_property(name, &previous.fingerprints, current, visitor)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl InputFileChanges for DefaultInputFileChanges<'_> {
    fn accept_property(
        &mut self,
        property_name: &str,
        visitor: &mut dyn ChangeVisitor,
    ) -> ChangeResult<bool> {
        let current = self
            .current
            .get(property_name)
            .ok_or_else(|| ChangeError::UnknownProperty {
                property: property_name.to_string(),
            })?;
        let empty = FingerprintMap::new();
        let previous = self
            .previous
            .get(property_name)
            .map_or(&empty, |fingerprint| &fingerprint.fingerprints);
        Self::visit_property(property_name, previous, current, visitor)
    }
}

/// Input file changes when the unit of work has to be rebuilt from scratch.
///
/// Every current file is reported as added.
#[derive(Debug, Clone, Default)]
pub struct RebuildInputFileChanges<'a> {
    current: FileProperties<'a>,
}

impl<'a> RebuildInputFileChanges<'a> {
    /// Report every file of the given properties.
    #[must_use]
    pub fn new(current: FileProperties<'a>) -> Self {
        Self { current }
    }

    fn visit_property(
        property_name: &str,
        current: &FileCollectionFingerprint,
        visitor: &mut dyn ChangeVisitor,
    ) -> bool {
        let title = input_file_title(property_name);
        current.fingerprints.iter().all(|(path, fingerprint)| {
            visitor.visit_change(&Change::File(FileChange::added(
                path.as_str(),
                title.as_str(),
                fingerprint.file_type,
                fingerprint.normalized_path.as_str(),
            )))
        })
    }
}

impl ChangeContainer for RebuildInputFileChanges<'_> {
    fn accept(&mut self, visitor: &mut dyn ChangeVisitor) -> ChangeResult<bool> {
        Ok(self
            .current
            .iter()
            .all(|(name, current)| Self::visit_property(name, current, visitor)))
    }
}

impl InputFileChanges for RebuildInputFileChanges<'_> {
    fn accept_property(
        &mut self,
        property_name: &str,
        visitor: &mut dyn ChangeVisitor,
    ) -> ChangeResult<bool> {
        let current = self
            .current
            .get(property_name)
            .ok_or_else(|| ChangeError::UnknownProperty {
                property: property_name.to_string(),
            })?;
        Ok(Self::visit_property(property_name, current, visitor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::{ContentHash, FileSystemLocationFingerprint};
    use crate::stage::test_support::state;
    use crate::state::ExecutionState;
    use crate::visitor::CollectingChangeVisitor;

    fn file(normalized: &str, hash: &str) -> FileSystemLocationFingerprint {
        FileSystemLocationFingerprint::file(normalized, ContentHash::new(hash))
    }

    fn previous_state() -> ExecutionState {
        state()
            .with_input_files(
                "sources",
                FileCollectionFingerprint::new("RELATIVE_PATH")
                    .with("/src/A.java", file("A.java", "a"))
                    .with("/src/B.java", file("B.java", "b")),
            )
            .with_input_files(
                "classpath",
                FileCollectionFingerprint::new("CLASSPATH")
                    .with("/libs/guava.jar", file("", "g1")),
            )
    }

    #[test]
    fn test_dispatches_by_strategy_in_name_order() {
        let previous = previous_state();
        let current = state()
            .with_input_files(
                "sources",
                FileCollectionFingerprint::new("RELATIVE_PATH")
                    .with("/moved/A.java", file("A.java", "a"))
                    .with("/src/B.java", file("B.java", "b2")),
            )
            .with_input_files(
                "classpath",
                FileCollectionFingerprint::new("CLASSPATH")
                    .with("/libs/guava.jar", file("", "g2")),
            );
        let mut changes =
            DefaultInputFileChanges::new(&previous.input_file_properties, &current.input_file_properties);
        let mut visitor = CollectingChangeVisitor::new();

        assert!(changes.accept(&mut visitor).unwrap());
        assert_eq!(
            visitor.messages(),
            vec![
                "Input file property 'classpath' file /libs/guava.jar has changed.",
                "Input file property 'sources' file /src/B.java has changed.",
            ]
        );
    }

    #[test]
    fn test_unknown_strategy_is_a_fault() {
        let previous = previous_state();
        let current = state().with_input_files(
            "sources",
            FileCollectionFingerprint::new("CONTENT_ONLY").with("/src/A.java", file("A.java", "a")),
        );
        let mut changes =
            DefaultInputFileChanges::new(&previous.input_file_properties, &current.input_file_properties);
        let mut visitor = CollectingChangeVisitor::new();

        let err = changes.accept(&mut visitor).unwrap_err();
        assert!(matches!(err, ChangeError::UnknownStrategy(ref s) if s == "CONTENT_ONLY"));
    }

    #[test]
    fn test_single_property() {
        let previous = previous_state();
        let current = previous_state().with_input_files(
            "resources",
            FileCollectionFingerprint::new("ABSOLUTE_PATH").with("/res/app.properties", file("app.properties", "p")),
        );
        let mut changes =
            DefaultInputFileChanges::new(&previous.input_file_properties, &current.input_file_properties);

        let mut visitor = CollectingChangeVisitor::new();
        assert!(changes.accept_property("sources", &mut visitor).unwrap());
        assert!(visitor.changes().is_empty());

        let mut visitor = CollectingChangeVisitor::new();
        assert!(changes.accept_property("resources", &mut visitor).unwrap());
        assert_eq!(
            visitor.messages(),
            vec!["Input file property 'resources' file /res/app.properties has been added."]
        );

        let err = changes
            .accept_property("missing", &mut CollectingChangeVisitor::new())
            .unwrap_err();
        assert!(matches!(err, ChangeError::UnknownProperty { .. }));
    }

    #[test]
    fn test_rebuild_reports_everything_as_added() {
        let current = previous_state();
        let mut changes = RebuildInputFileChanges::new(select(&current.input_file_properties, |name| {
            name == "sources"
        }));
        let mut visitor = CollectingChangeVisitor::new();

        assert!(changes.accept(&mut visitor).unwrap());
        assert_eq!(
            visitor.messages(),
            vec![
                "Input file property 'sources' file /src/A.java has been added.",
                "Input file property 'sources' file /src/B.java has been added.",
            ]
        );
        assert!(changes
            .accept_property("classpath", &mut CollectingChangeVisitor::new())
            .is_err());
    }
}
