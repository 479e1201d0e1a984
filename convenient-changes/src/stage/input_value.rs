use crate::change::Change;
use crate::container::ChangeContainer;
use crate::error::ChangeResult;
use crate::state::ValueSnapshot;
use crate::visitor::ChangeVisitor;
use std::collections::BTreeMap;

/// Reports input properties whose value changed.
///
/// Only properties present on both sides are compared; added and removed
/// properties are reported by [`super::PropertyChanges`].
#[derive(Debug, Clone)]
pub struct InputValueChanges<'a> {
    previous: &'a BTreeMap<String, ValueSnapshot>,
    current: &'a BTreeMap<String, ValueSnapshot>,
    executable: String,
}

impl<'a> InputValueChanges<'a> {
    /// Create the stage.
    pub fn new(
        previous: &'a BTreeMap<String, ValueSnapshot>,
        current: &'a BTreeMap<String, ValueSnapshot>,
        executable: impl Into<String>,
    ) -> Self {
        Self {
            previous,
            current,
            executable: executable.into(),
        }
    }
}

impl ChangeContainer for InputValueChanges<'_> {
    fn accept(&mut self, visitor: &mut dyn ChangeVisitor) -> ChangeResult<bool> {
        for (name, value) in self.current {
            let Some(previous) = self.previous.get(name) else {
                continue;
            };
            if previous != value {
                let message = format!(
                    "Value of input property '{name}' has changed for {}.",
                    self.executable
                );
                if !visitor.visit_change(&Change::descriptive(message)) {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }
}
