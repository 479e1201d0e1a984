//! Normalized path comparison for relative path and name only sensitivity.
//!
//! Files are matched by normalized path and content. A file that moved to a
//! different absolute path with the same normalized path and content is not
//! a change.

use super::{visit_added, visit_modified, visit_removed};
use crate::fingerprint::{ContentHash, FileSystemLocationFingerprint, FingerprintMap};
use crate::visitor::ChangeVisitor;
use std::collections::{HashMap, VecDeque};

pub(super) fn visit_changes_since(
    previous: &FingerprintMap,
    current: &FingerprintMap,
    property_title: &str,
    visitor: &mut dyn ChangeVisitor,
) -> bool {
    let previous_entries: Vec<(&str, &FileSystemLocationFingerprint)> = previous
        .iter()
        .map(|(path, fingerprint)| (path.as_str(), fingerprint))
        .collect();

    // Previous files not yet paired with a current file, by identity.
    let mut unaccounted: HashMap<(&str, &ContentHash), VecDeque<usize>> =
        HashMap::with_capacity(previous_entries.len());
    for (index, (_, fingerprint)) in previous_entries.iter().enumerate() {
        unaccounted
            .entry(identity(fingerprint))
            .or_default()
            .push_back(index);
    }

    let mut added: Vec<(&str, &FileSystemLocationFingerprint)> = Vec::new();
    for (path, fingerprint) in current {
        let paired = unaccounted
            .get_mut(&identity(fingerprint))
            .and_then(VecDeque::pop_front);
        if paired.is_none() {
            added.push((path.as_str(), fingerprint));
        }
    }

    let mut remaining: Vec<usize> = unaccounted.into_values().flatten().collect();
    // Unpaired previous files are visited in (normalized path, hash) order.
    remaining.sort_by(|&a, &b| {
        identity(previous_entries[a].1)
            .cmp(&identity(previous_entries[b].1))
            .then(a.cmp(&b))
    });

    let mut added_by_normalized_path: HashMap<&str, VecDeque<usize>> = HashMap::new();
    for (index, (_, fingerprint)) in added.iter().enumerate() {
        added_by_normalized_path
            .entry(fingerprint.normalized_path.as_str())
            .or_default()
            .push_back(index);
    }
    let mut consumed = vec![false; added.len()];

    for index in remaining {
        let (previous_path, previous_fingerprint) = previous_entries[index];
        let replacement = added_by_normalized_path
            .get_mut(previous_fingerprint.normalized_path.as_str())
            .and_then(VecDeque::pop_front);
        let keep_going = match replacement {
            Some(added_index) => {
                consumed[added_index] = true;
                let (current_path, current_fingerprint) = added[added_index];
                visit_modified(
                    visitor,
                    property_title,
                    current_path,
                    previous_fingerprint,
                    current_fingerprint,
                )
            }
            None => visit_removed(visitor, property_title, previous_path, previous_fingerprint),
        };
        if !keep_going {
            return false;
        }
    }

    added
        .iter()
        .zip(consumed)
        .filter(|(_, consumed)| !consumed)
        .all(|((path, fingerprint), _)| visit_added(visitor, property_title, path, fingerprint))
}

fn identity(fingerprint: &FileSystemLocationFingerprint) -> (&str, &ContentHash) {
    (fingerprint.normalized_path.as_str(), &fingerprint.content_hash)
}

#[cfg(test)]
mod tests {
    use crate::strategy::CompareStrategy;
    use crate::strategy::test_support::fingerprints;
    use crate::visitor::CollectingChangeVisitor;

    fn messages(previous: &[(&str, &str, &str)], current: &[(&str, &str, &str)]) -> Vec<String> {
        let mut visitor = CollectingChangeVisitor::new();
        assert!(CompareStrategy::NormalizedPath.visit_changes_since(
            &fingerprints(previous),
            &fingerprints(current),
            "Input",
            &mut visitor
        ));
        visitor.messages()
    }

    #[test]
    fn test_moved_file_is_not_a_change() {
        assert!(messages(&[("/old/a.txt", "a.txt", "H")], &[("/new/a.txt", "a.txt", "H")]).is_empty());
    }

    #[test]
    fn test_moved_files_in_larger_collection() {
        let previous = [("/old/a.txt", "a.txt", "A"), ("/old/b.txt", "b.txt", "B")];
        let current = [("/new/b.txt", "b.txt", "B"), ("/new/a.txt", "a.txt", "A")];
        assert!(messages(&previous, &current).is_empty());
    }

    #[test]
    fn test_content_change_at_same_normalized_path() {
        let previous = [("/src/a.txt", "a.txt", "A"), ("/src/b.txt", "b.txt", "B")];
        let current = [("/other/a.txt", "a.txt", "A2"), ("/src/b.txt", "b.txt", "B")];

        assert_eq!(
            messages(&previous, &current),
            vec!["Input file /other/a.txt has changed."]
        );
    }

    #[test]
    fn test_removed_sorted_by_normalized_path_then_added_in_current_order() {
        let previous = [
            ("/p/z.txt", "z.txt", "Z"),
            ("/p/m.txt", "m.txt", "M"),
            ("/p/a.txt", "a.txt", "A"),
        ];
        let current = [
            ("/p/m.txt", "m.txt", "M"),
            ("/p/y.txt", "y.txt", "Y"),
            ("/p/b.txt", "b.txt", "B"),
        ];

        assert_eq!(
            messages(&previous, &current),
            vec![
                "Input file /p/a.txt has been removed.",
                "Input file /p/z.txt has been removed.",
                "Input file /p/y.txt has been added.",
                "Input file /p/b.txt has been added.",
            ]
        );
    }

    #[test]
    fn test_duplicate_identities_are_paired_one_to_one() {
        let previous = [("/a/x.txt", "x.txt", "X"), ("/b/x.txt", "x.txt", "X")];
        let current = [
            ("/c/x.txt", "x.txt", "X"),
            ("/d/x.txt", "x.txt", "X"),
            ("/e/x.txt", "x.txt", "X"),
        ];

        assert_eq!(
            messages(&previous, &current),
            vec!["Input file /e/x.txt has been added."]
        );
    }

    #[test]
    fn test_unpaired_previous_files_follow_hash_order() {
        let previous = [
            ("/p1/x", "x", "H2"),
            ("/p2/x", "x", "H1"),
            ("/p3/o", "o", "O"),
        ];
        let current = [("/q/x", "x", "H3"), ("/p3/o", "o", "O")];

        assert_eq!(
            messages(&previous, &current),
            vec![
                "Input file /q/x has changed.",
                "Input file /p1/x has been removed.",
            ]
        );
    }
}
