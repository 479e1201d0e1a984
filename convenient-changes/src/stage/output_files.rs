use crate::change::{Change, ChangeType};
use crate::container::ChangeContainer;
use crate::error::ChangeResult;
use crate::fingerprint::FileCollectionFingerprint;
use crate::overlap::retain_present_outputs;
use crate::strategy::CompareStrategy;
use crate::visitor::ChangeVisitor;
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::debug;

/// Reports changed output files of properties present on both sides.
///
/// Outputs are always compared by absolute path. Locations that were not
/// recorded by the previous execution are never reported, so only removed or
/// modified outputs make the unit of work out of date. When another unit of work
/// writes to the same locations, previous outputs that no longer exist are
/// not reported as removed either.
#[derive(Debug, Clone)]
pub struct OutputFileChanges<'a> {
    previous: &'a BTreeMap<String, FileCollectionFingerprint>,
    current: &'a BTreeMap<String, FileCollectionFingerprint>,
    overlapping_outputs: bool,
}

impl<'a> OutputFileChanges<'a> {
    /// Create the stage.
    pub fn new(
        previous: &'a BTreeMap<String, FileCollectionFingerprint>,
        current: &'a BTreeMap<String, FileCollectionFingerprint>,
        overlapping_outputs: bool,
    ) -> Self {
        Self {
            previous,
            current,
            overlapping_outputs,
        }
    }
}

impl ChangeContainer for OutputFileChanges<'_> {
    fn accept(&mut self, visitor: &mut dyn ChangeVisitor) -> ChangeResult<bool> {
        for (name, current) in self.current {
            let Some(previous) = self.previous.get(name) else {
                continue;
            };
            let previous = if self.overlapping_outputs {
                debug!(property = %name, "Ignoring vanished outputs of overlapping property");
                Cow::Owned(retain_present_outputs(
                    &previous.fingerprints,
                    &current.fingerprints,
                ))
            } else {
                Cow::Borrowed(&previous.fingerprints)
            };
            let title = format!("Output property '{name}'");
            let mut without_added = |change: &Change| match change.as_file_change() {
                Some(file) if file.change_type() == ChangeType::Added => true,
                _ => visitor.visit_change(change),
            };
            if !CompareStrategy::AbsolutePath.visit_changes_since(
                &previous,
                &current.fingerprints,
                &title,
                &mut without_added,
            ) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
