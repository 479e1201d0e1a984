//! Absolute path comparison: a file is identified by where it lives.

use super::{visit_added, visit_modified, visit_removed};
use crate::fingerprint::FingerprintMap;
use crate::visitor::ChangeVisitor;

/// Additions and modifications in current order, then removals in previous order.
pub(super) fn visit_changes_since(
    previous: &FingerprintMap,
    current: &FingerprintMap,
    property_title: &str,
    visitor: &mut dyn ChangeVisitor,
) -> bool {
    for (path, current_fingerprint) in current {
        match previous.get(path) {
            None => {
                if !visit_added(visitor, property_title, path, current_fingerprint) {
                    return false;
                }
            }
            Some(previous_fingerprint) => {
                if previous_fingerprint.content_hash != current_fingerprint.content_hash
                    && !visit_modified(
                        visitor,
                        property_title,
                        path,
                        previous_fingerprint,
                        current_fingerprint,
                    )
                {
                    return false;
                }
            }
        }
    }

    for (path, previous_fingerprint) in previous {
        if !current.contains_key(path)
            && !visit_removed(visitor, property_title, path, previous_fingerprint)
        {
            return false;
        }
    }

    true
}
