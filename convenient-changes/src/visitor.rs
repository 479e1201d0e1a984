//! The short-circuiting change visitor protocol.
//!
//! A visitor returns `true` to receive more changes and `false` once it has
//! seen enough. Producers stop as soon as a visitor returns `false`, which is
//! what keeps "is anything out of date?" queries cheap.

use crate::change::Change;

/// Default number of messages reported before truncating.
pub const MAX_OUT_OF_DATE_MESSAGES: usize = 3;

/// Marker appended when more changes exist than are reported.
pub const MORE_CHANGES_MARKER: &str = "and more...";

/// Receives changes one at a time.
pub trait ChangeVisitor {
    /// Visit a change. Returning `false` stops the producer.
    fn visit_change(&mut self, change: &Change) -> bool;
}

impl<F> ChangeVisitor for F
where
    F: FnMut(&Change) -> bool,
{
    fn visit_change(&mut self, change: &Change) -> bool {
        self(change)
    }
}

/// Collects at most `max` messages, then records [`MORE_CHANGES_MARKER`] and stops.
#[derive(Debug)]
pub struct MessageCollectingChangeVisitor {
    max: usize,
    messages: Vec<String>,
}

impl MessageCollectingChangeVisitor {
    /// Create a collector with the given cap.
    #[must_use]
    pub fn new(max: usize) -> Self {
        Self {
            max,
            messages: Vec::new(),
        }
    }

    /// Messages collected so far.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Consume the collector, returning the messages.
    #[must_use]
    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

impl Default for MessageCollectingChangeVisitor {
    fn default() -> Self {
        Self::new(MAX_OUT_OF_DATE_MESSAGES)
    }
}

impl ChangeVisitor for MessageCollectingChangeVisitor {
    fn visit_change(&mut self, change: &Change) -> bool {
        if self.messages.len() < self.max {
            self.messages.push(change.message());
            true
        } else {
            self.messages.push(MORE_CHANGES_MARKER.to_string());
            false
        }
    }
}

/// Collects every change it is offered.
#[derive(Debug, Default)]
pub struct CollectingChangeVisitor {
    changes: Vec<Change>,
}

impl CollectingChangeVisitor {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes collected so far.
    #[must_use]
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Messages of the collected changes.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.changes.iter().map(Change::message).collect()
    }

    /// Consume the collector, returning the changes.
    #[must_use]
    pub fn into_changes(self) -> Vec<Change> {
        self.changes
    }
}

impl ChangeVisitor for CollectingChangeVisitor {
    fn visit_change(&mut self, change: &Change) -> bool {
        self.changes.push(change.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(n: usize) -> Change {
        Change::descriptive(format!("change {n}"))
    }

    #[test]
    fn test_collects_up_to_max() {
        let mut visitor = MessageCollectingChangeVisitor::default();
        for n in 0..3 {
            assert!(visitor.visit_change(&change(n)));
        }
        assert_eq!(visitor.messages(), ["change 0", "change 1", "change 2"]);
    }

    #[test]
    fn test_truncates_with_marker() {
        let mut visitor = MessageCollectingChangeVisitor::new(2);
        assert!(visitor.visit_change(&change(0)));
        assert!(visitor.visit_change(&change(1)));
        assert!(!visitor.visit_change(&change(2)));

        assert_eq!(
            visitor.into_messages(),
            vec!["change 0", "change 1", MORE_CHANGES_MARKER]
        );
    }

    #[test]
    fn test_closure_is_a_visitor() {
        let mut seen = 0;
        let mut visitor = |_: &Change| {
            seen += 1;
            seen < 2
        };
        assert!(visitor.visit_change(&change(0)));
        assert!(!visitor.visit_change(&change(1)));
        assert_eq!(seen, 2);
    }
}
