//! Change detection for incremental execution.
//!
//! This crate decides whether a previously executed unit of work (a build
//! task, a transform) can be skipped, and if not, which of its inputs changed
//! and why. It can be used for:
//! - Up-to-date checks before executing a task
//! - Incremental execution, handing only changed input files to the task
//! - Explaining to users why a task was executed
//!
//! # Features
//!
//! - Structural diff of file fingerprints with absolute path, normalized
//!   path, classpath and ignored path semantics
//! - Short-circuiting visitor protocol, so "is anything out of date?" stops
//!   at the first change
//! - Layered decision pipeline from previous failures down to input files
//! - Bounded change messages and a bounded replay cache
//! - Serde support for persisting execution states
//!
//! # Example
//!
//! ```
//! use convenient_changes::{
//!     ContentHash, DefaultExecutionStateChangeDetector, ExecutionState,
//!     ExecutionStateChangeDetector, FileCollectionFingerprint,
//!     FileSystemLocationFingerprint, ImplementationSnapshot, IncrementalInputProperties,
//! };
//!
//! let sources = |hash: &str| {
//!     FileCollectionFingerprint::new("RELATIVE_PATH").with(
//!         "/project/src/main.rs",
//!         FileSystemLocationFingerprint::file("main.rs", ContentHash::new(hash)),
//!     )
//! };
//! let implementation = ImplementationSnapshot::new("Compile", ContentHash::new("1"));
//! let previous = ExecutionState::new(implementation.clone()).with_input_files("sources", sources("a"));
//! let current = ExecutionState::new(implementation).with_input_files("sources", sources("b"));
//!
//! let detector = DefaultExecutionStateChangeDetector::default();
//! let changes = detector
//!     .detect_changes(&previous, &current, "Task ':compile'", &IncrementalInputProperties::All)
//!     .unwrap();
//!
//! assert!(changes.is_incremental());
//! assert_eq!(
//!     changes.messages(),
//!     ["Input file property 'sources' file /project/src/main.rs has changed."]
//! );
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(unused_results)]

pub mod change;
pub mod config;
pub mod container;
pub mod detector;
pub mod error;
pub mod fingerprint;
pub mod incremental;
pub mod overlap;
pub mod stage;
pub mod state;
pub mod strategy;
pub mod visitor;

pub use change::{Change, ChangeType, DescriptiveChange, FileChange};
pub use config::DetectorConfig;
pub use container::{
    CachingChangeContainer, ChangeContainer, ErrorHandlingChangeContainer, InputFileChanges,
    SummarizingChangeContainer,
};
pub use detector::{
    DefaultExecutionStateChangeDetector, ExecutionStateChangeDetector, ExecutionStateChanges,
    IncrementalInputFileChanges,
};
pub use error::{ChangeError, ChangeResult};
pub use fingerprint::{
    ContentHash, FileCollectionFingerprint, FileSystemLocationFingerprint, FileType,
    FingerprintMap,
};
pub use incremental::IncrementalInputProperties;
pub use overlap::{OverlappingOutputs, filter_output_fingerprint};
pub use state::{Describable, ExecutionState, ImplementationSnapshot, ValueSnapshot};
pub use strategy::CompareStrategy;
pub use visitor::{
    ChangeVisitor, CollectingChangeVisitor, MAX_OUT_OF_DATE_MESSAGES, MORE_CHANGES_MARKER,
    MessageCollectingChangeVisitor,
};
