//! Classification of tracked pull request files.
//!
//! Each tracked file gets a role (source or localization), a change type
//! derived from the GitHub file status, and warnings. A localization is
//! outdated when its source changed after the pull request was opened.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::github::{ChangedFileStatus, PullRequestFile};
use crate::tracking::FileStatus;

/// Directories hidden from displayed paths. Only the first base found is
/// stripped.
const COLLAPSED_BASES: [&str; 2] = ["src/content/docs/", "src/i18n/"];

/// Whether a file is the source or a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    /// The file is in the source locale.
    Source,
    /// The file is a localization of a source file.
    Localization,
}

/// Change type shown in the note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    /// New file, including renames and copies.
    Added,
    /// Deleted file.
    Removed,
    /// Modified file.
    Changed,
    /// File listed without changes.
    Unchanged,
}

impl From<ChangedFileStatus> for ChangeType {
    fn from(status: ChangedFileStatus) -> Self {
        match status {
            ChangedFileStatus::Added | ChangedFileStatus::Renamed | ChangedFileStatus::Copied => {
                Self::Added
            }
            ChangedFileStatus::Removed => Self::Removed,
            ChangedFileStatus::Modified | ChangedFileStatus::Changed => Self::Changed,
            ChangedFileStatus::Unchanged => Self::Unchanged,
        }
    }
}

/// A condition flagged next to a file's note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning {
    /// The source changed after the pull request was created.
    Outdated,
}

impl Warning {
    /// Every warning, in reference table order.
    pub const ALL: [Self; 1] = [Self::Outdated];

    /// Icon shown in the files table.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Outdated => "🔄️",
        }
    }

    /// Explanation shown in the warnings reference table.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Outdated => {
                "**Outdated:** Source file was updated after this PR was created and may need to be reviewed before merging."
            }
        }
    }
}

/// The outcome of classifying one tracked file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedFile {
    /// Path relative to the tracking root directory.
    pub path: String,
    /// Path with common content bases stripped, for display.
    pub display_path: String,
    /// Link to the file at the pull request head.
    pub blob_url: String,
    /// Source or localization.
    pub role: FileRole,
    /// Normalized change type.
    pub change: ChangeType,
    /// Warnings raised for the file.
    pub warnings: Vec<Warning>,
}

impl ClassifiedFile {
    /// Sentence describing what merging the change does to tracking status.
    #[must_use]
    pub const fn note_text(&self) -> &'static str {
        match (self.role, self.change) {
            (FileRole::Source, ChangeType::Added) => "Source added, will be tracked.",
            (FileRole::Source, ChangeType::Removed) => "Source removed, will stop being tracked.",
            (FileRole::Source, ChangeType::Changed) => {
                "Source changed, localizations will be marked as outdated."
            }
            (FileRole::Source, ChangeType::Unchanged) => {
                "Source unchanged, will not trigger status changes."
            }
            (FileRole::Localization, ChangeType::Added) => {
                "Localization added, will be marked as complete."
            }
            (FileRole::Localization, ChangeType::Removed) => {
                "Localization removed, will be marked as missing."
            }
            (FileRole::Localization, ChangeType::Changed) => {
                "Localization changed, will be marked as complete."
            }
            (FileRole::Localization, ChangeType::Unchanged) => {
                "Localization unchanged, its status won't change."
            }
        }
    }

    /// Note text followed by the warning icons.
    #[must_use]
    pub fn note(&self) -> String {
        let icons: Vec<&str> = self.warnings.iter().map(|warning| warning.icon()).collect();
        format!("{} {}", self.note_text(), icons.join(" "))
    }

    /// Markdown link to the file.
    #[must_use]
    pub fn link(&self) -> String {
        format!("[{}]({})", self.display_path, self.blob_url)
    }
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Source => "source",
            Self::Localization => "localization",
        })
    }
}

/// Removes the first occurrence of the first content base `filename`
/// contains.
#[must_use]
pub fn collapse_filename(filename: &str) -> String {
    COLLAPSED_BASES
        .iter()
        .find(|base| filename.contains(*base))
        .map_or_else(
            || filename.to_owned(),
            |base| filename.replacen(base, "", 1),
        )
}

/// Classifies a tracked file against its status.
///
/// `path` is the file's path relative to the tracking root. When the source
/// has no tracked change, `now` stands in for its date, so localizations of
/// sources without history are reported as outdated.
#[must_use]
pub fn classify(
    file: &PullRequestFile,
    path: &str,
    status: &FileStatus,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> ClassifiedFile {
    let role = if status.is_source(path) {
        FileRole::Source
    } else {
        FileRole::Localization
    };

    let mut warnings = Vec::new();
    if role == FileRole::Localization {
        let latest_source_change = status
            .source
            .latest_tracked_change
            .as_ref()
            .map_or(now, |change| change.date);
        if latest_source_change > created_at {
            warnings.push(Warning::Outdated);
        }
    }

    ClassifiedFile {
        path: path.to_owned(),
        display_path: collapse_filename(path),
        blob_url: file.blob_url.clone().unwrap_or_default(),
        role,
        change: file.status.into(),
        warnings,
    }
}
