use crate::change::Change;
use crate::container::ChangeContainer;
use crate::error::ChangeResult;
use crate::state::ImplementationSnapshot;
use crate::visitor::ChangeVisitor;

/// Reports a change of the code executing the unit of work.
///
/// At most one change is reported, the first one that applies:
///
/// 1. the implementing type changed
/// 2. the implementation was loaded by an unknown class loader
/// 3. the class loader changed
/// 4. an additional action was loaded by an unknown class loader
/// 5. the additional actions changed
#[derive(Debug, Clone)]
pub struct ImplementationChanges<'a> {
    previous: &'a ImplementationSnapshot,
    previous_additional: &'a [ImplementationSnapshot],
    current: &'a ImplementationSnapshot,
    current_additional: &'a [ImplementationSnapshot],
    executable: String,
}

impl<'a> ImplementationChanges<'a> {
    /// Create the stage.
    pub fn new(
        previous: &'a ImplementationSnapshot,
        previous_additional: &'a [ImplementationSnapshot],
        current: &'a ImplementationSnapshot,
        current_additional: &'a [ImplementationSnapshot],
        executable: impl Into<String>,
    ) -> Self {
        Self {
            previous,
            previous_additional,
            current,
            current_additional,
            executable: executable.into(),
        }
    }

    fn detect(&self) -> Option<String> {
        let executable = &self.executable;
        if self.previous.type_name != self.current.type_name {
            return Some(format!(
                "The type of {executable} has changed from '{}' to '{}'.",
                self.previous.type_name, self.current.type_name
            ));
        }
        if self.current.is_unknown() {
            return Some(format!(
                "The implementation of {executable} was loaded with an unknown classloader."
            ));
        }
        if self.previous.class_loader_hash != self.current.class_loader_hash {
            return Some(format!(
                "Class path of {executable} has changed from {} to {}.",
                describe_class_loader(self.previous),
                describe_class_loader(self.current)
            ));
        }
        if self.current_additional.iter().any(ImplementationSnapshot::is_unknown) {
            return Some(format!(
                "Additional action for {executable} was loaded with an unknown classloader."
            ));
        }
        if self.previous_additional != self.current_additional {
            return Some(format!(
                "One or more additional actions for {executable} have changed."
            ));
        }
        None
    }
}

fn describe_class_loader(implementation: &ImplementationSnapshot) -> String {
    implementation
        .class_loader_hash
        .as_ref()
        .map_or_else(|| "<unknown classloader>".to_string(), ToString::to_string)
}

impl ChangeContainer for ImplementationChanges<'_> {
    fn accept(&mut self, visitor: &mut dyn ChangeVisitor) -> ChangeResult<bool> {
        Ok(match self.detect() {
            Some(message) => visitor.visit_change(&Change::descriptive(message)),
            None => true,
        })
    }
}
