//! Change containers and the policies composed around them.
//!
//! A container produces its changes lazily through a [`ChangeVisitor`]. The
//! wrappers in this module add cross-cutting behavior without knowing what
//! the wrapped container compares:
//!
//! - [`SummarizingChangeContainer`] reports only the first source with changes
//! - [`CachingChangeContainer`] replays a fully visited, bounded change list
//! - [`ErrorHandlingChangeContainer`] names the unit of work in faults

mod caching;
mod error_handling;
mod summarizing;

pub use caching::CachingChangeContainer;
pub use error_handling::ErrorHandlingChangeContainer;
pub use summarizing::SummarizingChangeContainer;

use crate::error::ChangeResult;
use crate::visitor::ChangeVisitor;

/// Produces changes through the visitor protocol.
pub trait ChangeContainer {
    /// Offer changes to the visitor until it stops or nothing is left.
    ///
    /// Returns `Ok(false)` if the visitor stopped the walk.
    ///
    /// # Errors
    ///
    /// Returns an error if the changes cannot be computed.
    fn accept(&mut self, visitor: &mut dyn ChangeVisitor) -> ChangeResult<bool>;
}

/// Changes of input file properties, queryable per property.
pub trait InputFileChanges: ChangeContainer {
    /// Offer the changes of a single property to the visitor.
    ///
    /// # Errors
    ///
    /// Returns an error if the property is unknown or its changes cannot be
    /// computed.
    fn accept_property(
        &mut self,
        property_name: &str,
        visitor: &mut dyn ChangeVisitor,
    ) -> ChangeResult<bool>;
}

impl<C: ChangeContainer + ?Sized> ChangeContainer for Box<C> {
    fn accept(&mut self, visitor: &mut dyn ChangeVisitor) -> ChangeResult<bool> {
        (**self).accept(visitor)
    }
}

impl<C: InputFileChanges + ?Sized> InputFileChanges for Box<C> {
    fn accept_property(
        &mut self,
        property_name: &str,
        visitor: &mut dyn ChangeVisitor,
    ) -> ChangeResult<bool> {
        (**self).accept_property(property_name, visitor)
    }
}
