//! The stages of the up-to-date decision.
//!
//! Each stage compares one aspect of the previous and the current execution
//! state. The detector chains them in a fixed order, so the cheapest and most
//! telling comparisons run first.

mod implementation;
mod input_files;
mod input_value;
mod output_files;
mod previous_success;
mod property;

pub use implementation::ImplementationChanges;
pub(crate) use input_files::select;
pub use input_files::{DefaultInputFileChanges, FileProperties, RebuildInputFileChanges};
pub use input_value::InputValueChanges;
pub use output_files::OutputFileChanges;
pub use previous_success::PreviousSuccessChanges;
pub use property::PropertyChanges;

/// Title of value input properties in change messages.
pub const INPUT_TITLE: &str = "Input";
/// Title of output file properties in change messages.
pub const OUTPUT_TITLE: &str = "Output";
/// Title of input file properties in change messages.
pub const INPUT_FILE_TITLE: &str = "Input file";
