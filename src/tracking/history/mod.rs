//! Latest tracked change lookup.
//!
//! A file's latest tracked change is the newest commit that touched it and
//! is not exempted by an ignored keyword or a tracker directive. The trait
//! keeps the status oracle independent of git so tests can stub history.

mod git2_impl;

use std::collections::BTreeMap;
use std::fmt::Debug;

use chrono::{DateTime, Utc};

use super::error::TrackingError;

pub use git2_impl::Git2History;

const TRACK_DIRECTIVE: &str = "@lunaria-track:";
const IGNORE_DIRECTIVE: &str = "@lunaria-ignore:";

/// A commit counted as a change to a tracked file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedChange {
    /// Full commit SHA.
    pub sha: String,
    /// Author date of the commit.
    pub date: DateTime<Utc>,
    /// Full commit message.
    pub message: String,
}

/// Source of latest tracked changes.
#[cfg_attr(test, mockall::automock)]
pub trait TrackingHistory: Send + Sync + Debug {
    /// Returns the latest tracked change of each path, relative to the
    /// configured root directory. Paths no commit counts for are absent.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::History`] when history cannot be read.
    fn latest_changes(
        &self,
        paths: &[String],
    ) -> Result<BTreeMap<String, TrackedChange>, TrackingError>;
}

/// Tracker directives found in a commit message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitDirectives {
    track: Vec<String>,
    ignore: Vec<String>,
}

impl CommitDirectives {
    /// Collects `@lunaria-track:` and `@lunaria-ignore:` path lists.
    ///
    /// Paths are separated by `;`. Repeated directives accumulate.
    #[must_use]
    pub fn parse(message: &str) -> Self {
        let mut directives = Self::default();
        for line in message.lines().map(str::trim) {
            if let Some(paths) = line.strip_prefix(TRACK_DIRECTIVE) {
                directives.track.extend(split_paths(paths));
            } else if let Some(paths) = line.strip_prefix(IGNORE_DIRECTIVE) {
                directives.ignore.extend(split_paths(paths));
            }
        }
        directives
    }

    /// Whether the commit counts as a change to `path`.
    ///
    /// A track list restricts the commit to the listed paths; an ignore list
    /// excludes the listed paths.
    #[must_use]
    pub fn counts(&self, path: &str) -> bool {
        if !self.track.is_empty() && !self.track.iter().any(|tracked| tracked == path) {
            return false;
        }
        !self.ignore.iter().any(|ignored| ignored == path)
    }
}

fn split_paths(paths: &str) -> impl Iterator<Item = String> + '_ {
    paths
        .split(';')
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(str::to_owned)
}

/// Returns the first ignored keyword contained in `text`, ignoring case.
#[must_use]
pub fn find_ignored_keyword<'k>(text: &str, keywords: &'k [String]) -> Option<&'k str> {
    let haystack = text.to_lowercase();
    keywords
        .iter()
        .filter(|keyword| !keyword.is_empty())
        .find(|keyword| haystack.contains(&keyword.to_lowercase()))
        .map(String::as_str)
}
