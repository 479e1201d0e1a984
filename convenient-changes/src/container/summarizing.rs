//! Reports the changes of the first source that has any.

use super::ChangeContainer;
use crate::change::Change;
use crate::error::ChangeResult;
use crate::visitor::ChangeVisitor;

/// Visits its sources in order and stops after the first one with changes.
///
/// Later sources may be expensive to compare, and one category of changes is
/// enough to explain why a unit of work is out of date.
pub struct SummarizingChangeContainer<'a> {
    sources: Vec<Box<dyn ChangeContainer + 'a>>,
}

impl<'a> SummarizingChangeContainer<'a> {
    /// Create a container over the given sources, visited in order.
    #[must_use]
    pub fn new(sources: Vec<Box<dyn ChangeContainer + 'a>>) -> Self {
        Self { sources }
    }

    /// Number of sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if there are no sources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl ChangeContainer for SummarizingChangeContainer<'_> {
    fn accept(&mut self, visitor: &mut dyn ChangeVisitor) -> ChangeResult<bool> {
        for source in &mut self.sources {
            let mut tracking = TrackingVisitor {
                delegate: &mut *visitor,
                changes_detected: false,
            };
            if !source.accept(&mut tracking)? {
                return Ok(false);
            }
            if tracking.changes_detected {
                return Ok(true);
            }
        }
        Ok(true)
    }
}

struct TrackingVisitor<'v> {
    delegate: &'v mut dyn ChangeVisitor,
    changes_detected: bool,
}

impl ChangeVisitor for TrackingVisitor<'_> {
    fn visit_change(&mut self, change: &Change) -> bool {
        self.changes_detected = true;
        self.delegate.visit_change(change)
    }
}
