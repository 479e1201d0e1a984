use crate::change::Change;
use crate::container::ChangeContainer;
use crate::error::ChangeResult;
use crate::visitor::ChangeVisitor;

/// Reports a failed previous execution.
#[derive(Debug, Clone)]
pub struct PreviousSuccessChanges {
    executable: String,
    successful: bool,
}

impl PreviousSuccessChanges {
    /// Create the stage from the outcome of the previous execution.
    pub fn new(executable: impl Into<String>, successful: bool) -> Self {
        Self {
            executable: executable.into(),
            successful,
        }
    }
}

impl ChangeContainer for PreviousSuccessChanges {
    fn accept(&mut self, visitor: &mut dyn ChangeVisitor) -> ChangeResult<bool> {
        if self.successful {
            return Ok(true);
        }
        Ok(visitor.visit_change(&Change::descriptive(format!(
            "{} has failed previously.",
            self.executable
        ))))
    }
}
