//! Attaches the unit of work to comparison faults.

use super::{ChangeContainer, InputFileChanges};
use crate::error::{ChangeError, ChangeResult};
use crate::visitor::ChangeVisitor;
use tracing::error;

/// Wraps faults of the delegate in [`ChangeError::Detection`].
///
/// Usage errors from per-property queries are returned unchanged.
#[derive(Debug)]
pub struct ErrorHandlingChangeContainer<C> {
    executable: String,
    delegate: C,
}

impl<C> ErrorHandlingChangeContainer<C> {
    /// Wrap a delegate comparing states of `executable`.
    pub fn new(executable: impl Into<String>, delegate: C) -> Self {
        Self {
            executable: executable.into(),
            delegate,
        }
    }

    fn wrap(&self, source: ChangeError) -> ChangeError {
        error!(executable = %self.executable, error = %source, "Change detection failed");
        ChangeError::Detection {
            executable: self.executable.clone(),
            source: Box::new(source),
        }
    }
}

impl<C: ChangeContainer> ChangeContainer for ErrorHandlingChangeContainer<C> {
    fn accept(&mut self, visitor: &mut dyn ChangeVisitor) -> ChangeResult<bool> {
        self.delegate
            .accept(visitor)
            .map_err(|source| self.wrap(source))
    }
}

impl<C: InputFileChanges> InputFileChanges for ErrorHandlingChangeContainer<C> {
    fn accept_property(
        &mut self,
        property_name: &str,
        visitor: &mut dyn ChangeVisitor,
    ) -> ChangeResult<bool> {
        match self.delegate.accept_property(property_name, visitor) {
            Err(source) if !source.is_usage_error() => Err(self.wrap(source)),
            result => result,
        }
    }
}
