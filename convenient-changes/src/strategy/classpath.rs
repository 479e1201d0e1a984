//! Order sensitive comparison of classpath entries.
//!
//! Classpath order decides which class wins when several entries provide it,
//! so reordering entries is a change even when no content changed.

use super::{visit_added, visit_modified, visit_removed};
use crate::fingerprint::FingerprintMap;
use crate::visitor::ChangeVisitor;

pub(super) fn visit_changes_since(
    previous: &FingerprintMap,
    current: &FingerprintMap,
    property_title: &str,
    visitor: &mut dyn ChangeVisitor,
) -> bool {
    ClasspathComparison {
        previous,
        current,
        property_title,
        previous_index: 0,
        current_index: 0,
    }
    .run(visitor)
}

/// Cursor state of one comparison. Discarded once the walk ends or stops.
struct ClasspathComparison<'a> {
    previous: &'a FingerprintMap,
    current: &'a FingerprintMap,
    property_title: &'a str,
    previous_index: usize,
    current_index: usize,
}

/// How far the cursors move after a step.
enum Advance {
    Both,
    Previous,
    Current,
}

impl ClasspathComparison<'_> {
    fn run(mut self, visitor: &mut dyn ChangeVisitor) -> bool {
        let (previous, current, title) = (self.previous, self.current, self.property_title);
        loop {
            let previous_entry = previous.get_index(self.previous_index);
            let current_entry = current.get_index(self.current_index);

            let (keep_going, advance) = match (previous_entry, current_entry) {
                (None, None) => return true,
                (Some((path, fingerprint)), None) => (
                    visit_removed(visitor, title, path, fingerprint),
                    Advance::Previous,
                ),
                (None, Some((path, fingerprint))) => (
                    visit_added(visitor, title, path, fingerprint),
                    Advance::Current,
                ),
                (
                    Some((previous_path, previous_fingerprint)),
                    Some((current_path, current_fingerprint)),
                ) => {
                    if previous_fingerprint.normalized_path != current_fingerprint.normalized_path {
                        (
                            visit_removed(visitor, title, previous_path, previous_fingerprint)
                                && visit_added(visitor, title, current_path, current_fingerprint),
                            Advance::Both,
                        )
                    } else if previous_fingerprint.content_hash == current_fingerprint.content_hash {
                        (true, Advance::Both)
                    } else if !current_fingerprint.normalized_path.is_empty()
                        || previous_path == current_path
                    {
                        (
                            visit_modified(
                                visitor,
                                title,
                                current_path,
                                previous_fingerprint,
                                current_fingerprint,
                            ),
                            Advance::Both,
                        )
                    } else {
                        // Root entries have no normalized path, so their
                        // absolute paths tell whether they are the same entry.
                        let removed = !current.contains_key(previous_path);
                        let added = !previous.contains_key(current_path);
                        match (removed, added) {
                            (true, false) => (
                                visit_removed(visitor, title, previous_path, previous_fingerprint),
                                Advance::Previous,
                            ),
                            (false, true) => (
                                visit_added(visitor, title, current_path, current_fingerprint),
                                Advance::Current,
                            ),
                            _ => (
                                visit_removed(visitor, title, previous_path, previous_fingerprint)
                                    && visit_added(visitor, title, current_path, current_fingerprint),
                                Advance::Both,
                            ),
                        }
                    }
                }
            };

            if !keep_going {
                return false;
            }
            match advance {
                Advance::Both => {
                    self.previous_index += 1;
                    self.current_index += 1;
                }
                Advance::Previous => self.previous_index += 1,
                Advance::Current => self.current_index += 1,
            }
        }
    }
}
