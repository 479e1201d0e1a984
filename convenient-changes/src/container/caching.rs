//! Bounded replay cache for a container that is visited more than once.
//!
//! The detector first asks whether anything changed and may later ask for
//! every change. When the first walk saw everything, the second one is
//! served from memory.

use super::{ChangeContainer, InputFileChanges};
use crate::change::Change;
use crate::error::ChangeResult;
use crate::visitor::ChangeVisitor;
use tracing::trace;

/// What the cache knows about the delegate's changes.
#[derive(Debug)]
enum CacheState {
    /// No walk has completed yet
    NotYetCached,
    /// Every change of the delegate, in order
    Cached(Vec<Change>),
    /// The delegate has more changes than fit in the cache
    Overrun,
}

/// Caches up to `max_cached_changes` changes of a delegate.
///
/// If a visitor does not consume all the changes, then nothing is cached.
#[derive(Debug)]
pub struct CachingChangeContainer<C> {
    delegate: C,
    max_cached_changes: usize,
    state: CacheState,
}

impl<C> CachingChangeContainer<C> {
    /// Wrap a delegate.
    pub fn new(max_cached_changes: usize, delegate: C) -> Self {
        Self {
            delegate,
            max_cached_changes,
            state: CacheState::NotYetCached,
        }
    }

    /// Returns true if later walks are replayed from memory.
    #[must_use]
    pub fn is_cached(&self) -> bool {
        matches!(self.state, CacheState::Cached(_))
    }

    /// Returns true if the delegate had more changes than the cache holds.
    #[must_use]
    pub fn is_overrun(&self) -> bool {
        matches!(self.state, CacheState::Overrun)
    }
}

impl<C: ChangeContainer> ChangeContainer for CachingChangeContainer<C> {
    fn accept(&mut self, visitor: &mut dyn ChangeVisitor) -> ChangeResult<bool> {
        match &self.state {
            CacheState::Cached(changes) => {
                return Ok(changes.iter().all(|change| visitor.visit_change(change)));
            }
            CacheState::Overrun => return self.delegate.accept(visitor),
            CacheState::NotYetCached => {}
        }

        let mut caching = CachingVisitor {
            delegate: visitor,
            max_cached_changes: self.max_cached_changes,
            cache: Vec::new(),
            overrun: false,
        };
        let completed = self.delegate.accept(&mut caching)?;
        let CachingVisitor { cache, overrun, .. } = caching;

        if overrun {
            trace!(
                max_cached_changes = self.max_cached_changes,
                "Too many changes to cache"
            );
            self.state = CacheState::Overrun;
        } else if completed {
            trace!(changes = cache.len(), "Cached all changes");
            self.state = CacheState::Cached(cache);
        }
        Ok(completed)
    }
}

impl<C: InputFileChanges> InputFileChanges for CachingChangeContainer<C> {
    fn accept_property(
        &mut self,
        property_name: &str,
        visitor: &mut dyn ChangeVisitor,
    ) -> ChangeResult<bool> {
        self.delegate.accept_property(property_name, visitor)
    }
}

struct CachingVisitor<'v> {
    delegate: &'v mut dyn ChangeVisitor,
    max_cached_changes: usize,
    cache: Vec<Change>,
    overrun: bool,
}

impl ChangeVisitor for CachingVisitor<'_> {
    fn visit_change(&mut self, change: &Change) -> bool {
        if !self.overrun {
            if self.cache.len() < self.max_cached_changes {
                self.cache.push(change.clone());
            } else {
                self.overrun = true;
                self.cache.clear();
            }
        }
        self.delegate.visit_change(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::test_support::ScriptedChanges;
    use crate::visitor::{CollectingChangeVisitor, MessageCollectingChangeVisitor};

    #[test]
    fn test_replays_after_full_walk() {
        let delegate = ScriptedChanges::new(&["a", "b"]);
        let accepts = delegate.accepts.clone();
        let mut container = CachingChangeContainer::new(3, delegate);

        let mut first = CollectingChangeVisitor::new();
        assert!(container.accept(&mut first).unwrap());
        assert!(container.is_cached());

        let mut second = CollectingChangeVisitor::new();
        assert!(container.accept(&mut second).unwrap());

        assert_eq!(accepts.get(), 1);
        assert_eq!(first.changes(), second.changes());
    }

    #[test]
    fn test_nothing_cached_when_visitor_stops_early() {
        let delegate = ScriptedChanges::new(&["a", "b"]);
        let accepts = delegate.accepts.clone();
        let mut container = CachingChangeContainer::new(3, delegate);

        let mut stop_immediately = |_: &Change| false;
        assert!(!container.accept(&mut stop_immediately).unwrap());
        assert!(!container.is_cached());

        let mut all = CollectingChangeVisitor::new();
        assert!(container.accept(&mut all).unwrap());
        assert_eq!(all.messages(), vec!["a", "b"]);
        assert_eq!(accepts.get(), 2);
        assert!(container.is_cached());
    }

    #[test]
    fn test_overrun_always_delegates() {
        let delegate = ScriptedChanges::new(&["a", "b", "c", "d"]);
        let accepts = delegate.accepts.clone();
        let mut container = CachingChangeContainer::new(3, delegate);

        let mut all = CollectingChangeVisitor::new();
        assert!(container.accept(&mut all).unwrap());
        assert!(container.is_overrun());

        let mut again = CollectingChangeVisitor::new();
        assert!(container.accept(&mut again).unwrap());
        assert_eq!(again.messages(), vec!["a", "b", "c", "d"]);
        assert_eq!(accepts.get(), 2);
    }

    #[test]
    fn test_bounded_collector_with_exactly_max_changes_caches() {
        let delegate = ScriptedChanges::new(&["a", "b", "c"]);
        let accepts = delegate.accepts.clone();
        let mut container = CachingChangeContainer::new(3, delegate);

        let mut messages = MessageCollectingChangeVisitor::new(3);
        assert!(container.accept(&mut messages).unwrap());
        assert_eq!(messages.into_messages(), vec!["a", "b", "c"]);

        let mut all = CollectingChangeVisitor::new();
        assert!(container.accept(&mut all).unwrap());
        assert_eq!(accepts.get(), 1);
    }

    #[test]
    fn test_empty_delegate_is_cached() {
        let delegate = ScriptedChanges::new(&[]);
        let accepts = delegate.accepts.clone();
        let mut container = CachingChangeContainer::new(3, delegate);
        let mut visitor = CollectingChangeVisitor::new();

        assert!(container.accept(&mut visitor).unwrap());
        assert!(container.accept(&mut visitor).unwrap());
        assert_eq!(accepts.get(), 1);
    }

    #[test]
    fn test_property_queries_go_to_the_delegate() {
        let delegate = ScriptedChanges::new(&["a"]);
        let accepts = delegate.accepts.clone();
        let mut container = CachingChangeContainer::new(3, delegate);
        let mut visitor = CollectingChangeVisitor::new();

        assert!(container.accept_property("sources", &mut visitor).unwrap());
        assert!(!container.is_cached());
        assert_eq!(accepts.get(), 1);
    }
}
