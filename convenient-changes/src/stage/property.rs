use crate::change::Change;
use crate::container::ChangeContainer;
use crate::error::ChangeResult;
use crate::visitor::ChangeVisitor;
use std::collections::{BTreeMap, BTreeSet};

/// Reports properties that were removed or added since the previous execution.
///
/// Removed properties are reported first, then added ones, each in name order.
#[derive(Debug, Clone)]
pub struct PropertyChanges<'a> {
    previous: BTreeSet<&'a str>,
    current: BTreeSet<&'a str>,
    title: &'static str,
    executable: String,
}

impl<'a> PropertyChanges<'a> {
    /// Compare the property names of two property maps.
    pub fn new<P, C>(
        previous: &'a BTreeMap<String, P>,
        current: &'a BTreeMap<String, C>,
        title: &'static str,
        executable: impl Into<String>,
    ) -> Self {
        Self {
            previous: previous.keys().map(String::as_str).collect(),
            current: current.keys().map(String::as_str).collect(),
            title,
            executable: executable.into(),
        }
    }
}

impl ChangeContainer for PropertyChanges<'_> {
    fn accept(&mut self, visitor: &mut dyn ChangeVisitor) -> ChangeResult<bool> {
        for removed in self.previous.difference(&self.current) {
            let message = format!(
                "{} property '{removed}' has been removed for {}.",
                self.title, self.executable
            );
            if !visitor.visit_change(&Change::descriptive(message)) {
                return Ok(false);
            }
        }
        for added in self.current.difference(&self.previous) {
            let message = format!(
                "{} property '{added}' has been added for {}.",
                self.title, self.executable
            );
            if !visitor.visit_change(&Change::descriptive(message)) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
