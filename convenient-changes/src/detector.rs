//! The up-to-date decision for one unit of work.
//!
//! The detector compares the state recorded after the previous execution with
//! the current state and decides between three outcomes:
//!
//! - nothing changed, the unit of work is up-to-date
//! - only incremental input files changed, the unit of work can process them
//!   incrementally
//! - anything else changed, the unit of work has to be rebuilt

use crate::config::DetectorConfig;
use crate::container::{
    CachingChangeContainer, ChangeContainer, ErrorHandlingChangeContainer, InputFileChanges,
    SummarizingChangeContainer,
};
use crate::error::ChangeResult;
use crate::incremental::IncrementalInputProperties;
use crate::stage::{
    DefaultInputFileChanges, INPUT_FILE_TITLE, INPUT_TITLE, ImplementationChanges,
    InputValueChanges, OUTPUT_TITLE, OutputFileChanges, PreviousSuccessChanges, PropertyChanges,
    RebuildInputFileChanges,
};
use crate::state::{Describable, ExecutionState};
use crate::visitor::{ChangeVisitor, MessageCollectingChangeVisitor};
use tracing::debug;

/// Incremental input file changes as kept in the detection result.
pub type IncrementalInputFileChanges<'a> =
    ErrorHandlingChangeContainer<CachingChangeContainer<DefaultInputFileChanges<'a>>>;

/// Detects changes between two execution states.
pub trait ExecutionStateChangeDetector {
    /// Compare the state after the previous execution with the current state.
    ///
    /// # Errors
    ///
    /// Returns `ChangeError::Detection` naming `executable` if the
    /// fingerprints cannot be compared.
    fn detect_changes<'a, D>(
        &self,
        last_execution: &'a ExecutionState,
        this_execution: &'a ExecutionState,
        executable: &D,
        incremental_properties: &IncrementalInputProperties,
    ) -> ChangeResult<ExecutionStateChanges<'a>>
    where
        D: Describable + ?Sized;
}

/// The detector chaining all comparison stages.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultExecutionStateChangeDetector {
    config: DetectorConfig,
}

impl DefaultExecutionStateChangeDetector {
    /// Create a detector with the given limits.
    #[must_use]
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// The limits of this detector.
    #[must_use]
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }
}

impl ExecutionStateChangeDetector for DefaultExecutionStateChangeDetector {
    fn detect_changes<'a, D>(
        &self,
        last_execution: &'a ExecutionState,
        this_execution: &'a ExecutionState,
        executable: &D,
        incremental_properties: &IncrementalInputProperties,
    ) -> ChangeResult<ExecutionStateChanges<'a>>
    where
        D: Describable + ?Sized,
    {
        let executable = executable.display_name();

        let stages: Vec<Box<dyn ChangeContainer + 'a>> = vec![
            Box::new(PreviousSuccessChanges::new(
                executable.as_str(),
                last_execution.successful,
            )),
            Box::new(ImplementationChanges::new(
                &last_execution.implementation,
                &last_execution.additional_implementations,
                &this_execution.implementation,
                &this_execution.additional_implementations,
                executable.as_str(),
            )),
            Box::new(PropertyChanges::new(
                &last_execution.input_properties,
                &this_execution.input_properties,
                INPUT_TITLE,
                executable.as_str(),
            )),
            Box::new(InputValueChanges::new(
                &last_execution.input_properties,
                &this_execution.input_properties,
                executable.as_str(),
            )),
            Box::new(PropertyChanges::new(
                &last_execution.output_file_properties,
                &this_execution.output_file_properties,
                OUTPUT_TITLE,
                executable.as_str(),
            )),
            Box::new(OutputFileChanges::new(
                &last_execution.output_file_properties,
                &this_execution.output_file_properties,
                this_execution.detected_overlapping_outputs.is_some(),
            )),
            Box::new(PropertyChanges::new(
                &last_execution.input_file_properties,
                &this_execution.input_file_properties,
                INPUT_FILE_TITLE,
                executable.as_str(),
            )),
            Box::new(incremental_properties.non_incremental_changes(
                &last_execution.input_file_properties,
                &this_execution.input_file_properties,
            )),
        ];
        let mut rebuild_triggering_changes = ErrorHandlingChangeContainer::new(
            executable.as_str(),
            SummarizingChangeContainer::new(stages),
        );

        let mut visitor = MessageCollectingChangeVisitor::new(self.config.max_out_of_date_messages);
        let _ = rebuild_triggering_changes.accept(&mut visitor)?;
        let reasons = visitor.into_messages();

        if !reasons.is_empty() {
            debug!(executable = %executable, reasons = ?reasons, "Not up-to-date, rebuilding");
            return Ok(ExecutionStateChanges::NonIncremental {
                reasons,
                input_file_changes: incremental_properties
                    .rebuild_changes(&this_execution.input_file_properties),
                incremental_properties: incremental_properties.clone(),
            });
        }

        let mut input_file_changes = ErrorHandlingChangeContainer::new(
            executable.as_str(),
            CachingChangeContainer::new(
                self.config.max_cached_changes,
                incremental_properties.incremental_changes(
                    &last_execution.input_file_properties,
                    &this_execution.input_file_properties,
                ),
            ),
        );
        let mut visitor = MessageCollectingChangeVisitor::new(self.config.max_out_of_date_messages);
        let _ = input_file_changes.accept(&mut visitor)?;
        let messages = visitor.into_messages();

        if messages.is_empty() {
            debug!(executable = %executable, "Up-to-date");
        } else {
            debug!(executable = %executable, changes = ?messages, "Executing incrementally");
        }
        Ok(ExecutionStateChanges::Incremental {
            messages,
            input_file_changes,
            incremental_properties: incremental_properties.clone(),
        })
    }
}

/// Outcome of change detection for one unit of work.
#[derive(Debug)]
pub enum ExecutionStateChanges<'a> {
    /// Something other than incremental input files changed
    NonIncremental {
        /// Why the unit of work has to be rebuilt, at most the configured
        /// number of messages followed by the truncation marker
        reasons: Vec<String>,
        /// Every current file of the incremental properties as added
        input_file_changes: RebuildInputFileChanges<'a>,
        /// The incremental properties the detection was run with
        incremental_properties: IncrementalInputProperties,
    },
    /// Only incremental input files changed, or nothing at all
    Incremental {
        /// Messages of the first incremental input file changes
        messages: Vec<String>,
        /// All incremental input file changes
        input_file_changes: IncrementalInputFileChanges<'a>,
        /// The incremental properties the detection was run with
        incremental_properties: IncrementalInputProperties,
    },
}

impl ExecutionStateChanges<'_> {
    /// Returns true if the unit of work can process the changes incrementally.
    #[must_use]
    pub fn is_incremental(&self) -> bool {
        matches!(self, Self::Incremental { .. })
    }

    /// Returns true if nothing changed at all.
    #[must_use]
    pub fn is_up_to_date(&self) -> bool {
        matches!(self, Self::Incremental { messages, .. } if messages.is_empty())
    }

    /// Rebuild reasons, or the first incremental changes.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        match self {
            Self::NonIncremental { reasons, .. } => reasons,
            Self::Incremental { messages, .. } => messages,
        }
    }

    /// The incremental properties the detection was run with.
    #[must_use]
    pub fn incremental_properties(&self) -> &IncrementalInputProperties {
        match self {
            Self::NonIncremental {
                incremental_properties,
                ..
            }
            | Self::Incremental {
                incremental_properties,
                ..
            } => incremental_properties,
        }
    }

    /// Visit all incremental input file changes.
    ///
    /// When the unit of work has to be rebuilt, every current file of the
    /// incremental properties is visited as added.
    ///
    /// # Errors
    ///
    /// Returns `ChangeError::Detection` if the fingerprints cannot be compared.
    pub fn visit_input_file_changes(
        &mut self,
        visitor: &mut dyn ChangeVisitor,
    ) -> ChangeResult<bool> {
        match self {
            Self::NonIncremental {
                input_file_changes, ..
            } => input_file_changes.accept(visitor),
            Self::Incremental {
                input_file_changes, ..
            } => input_file_changes.accept(visitor),
        }
    }

    /// Visit the changes of one incremental input file property.
    ///
    /// # Errors
    ///
    /// Returns `ChangeError::NoIncrementalProperties` or
    /// `ChangeError::NotIncremental` if the property is not incremental,
    /// `ChangeError::UnknownProperty` if it has no current fingerprint, and
    /// `ChangeError::Detection` if the fingerprints cannot be compared.
    pub fn visit_property_changes(
        &mut self,
        property_name: &str,
        visitor: &mut dyn ChangeVisitor,
    ) -> ChangeResult<bool> {
        let property_name = self
            .incremental_properties()
            .property_name_for(property_name)?;
        match self {
            Self::NonIncremental {
                input_file_changes, ..
            } => input_file_changes.accept_property(property_name, visitor),
            Self::Incremental {
                input_file_changes, ..
            } => input_file_changes.accept_property(property_name, visitor),
        }
    }
}
