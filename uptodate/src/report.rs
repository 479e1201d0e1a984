//! Reports of the up-to-date decision.

use crate::error::CliResult;
use convenient_changes::{Change, ExecutionStateChanges};
use serde::Serialize;
use std::fmt;

/// What happens to a unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Decision {
    /// Nothing changed, the unit of work is skipped
    UpToDate,
    /// Only incremental input files changed
    Incremental,
    /// The unit of work is rebuilt from scratch
    NotUpToDate,
    /// Changes could not be detected
    Failed,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::UpToDate => "UP-TO-DATE",
            Self::Incremental => "INCREMENTAL",
            Self::NotUpToDate => "NOT UP-TO-DATE",
            Self::Failed => "FAILED",
        };
        f.write_str(label)
    }
}

/// The decision for one unit of work and why it was made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitReport {
    /// Display name of the unit of work
    pub name: String,
    /// The decision
    pub decision: Decision,
    /// Rebuild reasons, incremental changes or the failure
    pub messages: Vec<String>,
    /// Every incremental input file change, if requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_changes: Option<Vec<String>>,
}

impl UnitReport {
    /// Report the detected changes, replaying every file change if `details` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the file changes cannot be replayed.
    pub fn from_changes(
        name: impl Into<String>,
        changes: &mut ExecutionStateChanges<'_>,
        details: bool,
    ) -> CliResult<Self> {
        let decision = if changes.is_up_to_date() {
            Decision::UpToDate
        } else if changes.is_incremental() {
            Decision::Incremental
        } else {
            Decision::NotUpToDate
        };
        let file_changes = if details {
            let mut file_changes = Vec::new();
            let mut visitor = |change: &Change| {
                file_changes.push(change.message());
                true
            };
            let _ = changes.visit_input_file_changes(&mut visitor)?;
            Some(file_changes)
        } else {
            None
        };
        Ok(Self {
            name: name.into(),
            decision,
            messages: changes.messages().to_vec(),
            file_changes,
        })
    }

    /// Report a unit of work whose changes could not be detected.
    pub fn failed(name: impl Into<String>, error: &dyn std::error::Error) -> Self {
        let mut messages = vec![error.to_string()];
        let mut source = error.source();
        while let Some(cause) = source {
            messages.push(cause.to_string());
            source = cause.source();
        }
        Self {
            name: name.into(),
            decision: Decision::Failed,
            messages,
            file_changes: None,
        }
    }
}

impl UnitReport {
    /// Render the report as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Render` if the report cannot be serialized.
    pub fn to_json(&self) -> CliResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for UnitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.decision)?;
        for message in &self.messages {
            write!(f, "\n  {message}")?;
        }
        if let Some(file_changes) = &self.file_changes {
            write!(f, "\n  Input file changes:")?;
            for change in file_changes {
                write!(f, "\n    {change}")?;
            }
        }
        Ok(())
    }
}

/// Number of units per decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Units that are skipped
    pub up_to_date: usize,
    /// Units executed incrementally
    pub incremental: usize,
    /// Units rebuilt from scratch
    pub not_up_to_date: usize,
    /// Units whose changes could not be detected
    pub failed: usize,
}

impl Summary {
    /// Count the decisions of the given reports.
    #[must_use]
    pub fn of(reports: &[UnitReport]) -> Self {
        reports.iter().fold(Self::default(), |mut summary, report| {
            match report.decision {
                Decision::UpToDate => summary.up_to_date += 1,
                Decision::Incremental => summary.incremental += 1,
                Decision::NotUpToDate => summary.not_up_to_date += 1,
                Decision::Failed => summary.failed += 1,
            }
            summary
        })
    }
}

/// JSON document of a batch run.
#[derive(Debug, Serialize)]
struct BatchReport<'a> {
    units: &'a [UnitReport],
    summary: &'a Summary,
}

/// Render the reports of a batch run and their summary as pretty JSON.
///
/// # Errors
///
/// Returns `CliError::Render` if the reports cannot be serialized.
pub fn batch_to_json(reports: &[UnitReport], summary: &Summary) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(&BatchReport {
        units: reports,
        summary,
    })?)
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} up-to-date, {} incremental, {} not up-to-date, {} failed",
            self.up_to_date, self.incremental, self.not_up_to_date, self.failed
        )
    }
}
