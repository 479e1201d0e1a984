//! Detected changes and their human readable messages.
//!
//! Messages end up in the build output explaining why a unit of work ran,
//! so their wording is stable.

use crate::fingerprint::FileType;
use std::fmt;

/// Kind of a file change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeType {
    /// The file did not exist before
    Added,
    /// The file exists on both sides with different content
    Modified,
    /// The file does not exist anymore
    Removed,
}

impl ChangeType {
    /// Verb phrase used in change messages.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::Added => "has been added",
            Self::Modified => "has changed",
            Self::Removed => "has been removed",
        }
    }
}

/// A change described by free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptiveChange {
    message: String,
}

impl DescriptiveChange {
    /// Create a change with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A change of a single fingerprinted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    path: String,
    title: String,
    change_type: ChangeType,
    previous_file_type: FileType,
    current_file_type: FileType,
    normalized_path: String,
}

impl FileChange {
    /// A file that only exists in the current fingerprint.
    pub fn added(
        path: impl Into<String>,
        title: impl Into<String>,
        current_file_type: FileType,
        normalized_path: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            change_type: ChangeType::Added,
            previous_file_type: FileType::Missing,
            current_file_type,
            normalized_path: normalized_path.into(),
        }
    }

    /// A file that only exists in the previous fingerprint.
    pub fn removed(
        path: impl Into<String>,
        title: impl Into<String>,
        previous_file_type: FileType,
        normalized_path: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            change_type: ChangeType::Removed,
            previous_file_type,
            current_file_type: FileType::Missing,
            normalized_path: normalized_path.into(),
        }
    }

    /// A file present on both sides with different content.
    pub fn modified(
        path: impl Into<String>,
        title: impl Into<String>,
        previous_file_type: FileType,
        current_file_type: FileType,
        normalized_path: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            change_type: ChangeType::Modified,
            previous_file_type,
            current_file_type,
            normalized_path: normalized_path.into(),
        }
    }

    /// Absolute path of the file.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Normalized path of the file.
    #[must_use]
    pub fn normalized_path(&self) -> &str {
        &self.normalized_path
    }

    /// Title of the property the file belongs to.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The change type as detected by the compare strategy.
    #[must_use]
    pub fn change_type(&self) -> ChangeType {
        self.change_type
    }

    /// File type before the change.
    #[must_use]
    pub fn previous_file_type(&self) -> FileType {
        self.previous_file_type
    }

    /// File type after the change.
    #[must_use]
    pub fn current_file_type(&self) -> FileType {
        self.current_file_type
    }

    /// The change type as shown to users.
    ///
    /// A modification from or to a missing file reads as an addition or
    /// removal.
    #[must_use]
    pub fn displayed_change_type(&self) -> ChangeType {
        if self.change_type != ChangeType::Modified {
            return self.change_type;
        }
        if self.previous_file_type == FileType::Missing {
            ChangeType::Added
        } else if self.current_file_type == FileType::Missing {
            ChangeType::Removed
        } else {
            ChangeType::Modified
        }
    }

    /// Returns true if the file exists after the change.
    #[must_use]
    pub fn is_added_or_modified(&self) -> bool {
        self.displayed_change_type() != ChangeType::Removed
    }
}

impl fmt::Display for FileChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} file {} {}.",
            self.title,
            self.path,
            self.displayed_change_type().describe()
        )
    }
}

/// A detected change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Free text change
    Descriptive(DescriptiveChange),
    /// Change of a fingerprinted file
    File(FileChange),
}

impl Change {
    /// Create a free text change.
    pub fn descriptive(message: impl Into<String>) -> Self {
        Self::Descriptive(DescriptiveChange::new(message))
    }

    /// Human readable description of the change.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// The file change, if this is one.
    #[must_use]
    pub fn as_file_change(&self) -> Option<&FileChange> {
        match self {
            Self::File(change) => Some(change),
            Self::Descriptive(_) => None,
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Descriptive(change) => f.write_str(change.message()),
            Self::File(change) => change.fmt(f),
        }
    }
}

impl From<FileChange> for Change {
    fn from(change: FileChange) -> Self {
        Self::File(change)
    }
}

impl From<DescriptiveChange> for Change {
    fn from(change: DescriptiveChange) -> Self {
        Self::Descriptive(change)
    }
}
