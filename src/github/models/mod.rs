//! Data models for pull requests, their changed files, and issue comments.
//!
//! Types prefixed with `Api` are internal deserialisation targets that convert
//! into public domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Pull request metadata used to build the status report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestMetadata {
    /// Pull request number.
    pub number: u64,
    /// Title of the pull request.
    pub title: Option<String>,
    /// HTML URL for displaying to a user.
    pub html_url: Option<String>,
    /// When the pull request was opened.
    pub created_at: DateTime<Utc>,
}

/// How GitHub reports a file changed by a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangedFileStatus {
    /// The file is new.
    Added,
    /// The file was deleted.
    Removed,
    /// The file content changed.
    Modified,
    /// The file moved, possibly with changes.
    Renamed,
    /// The file was copied from another path.
    Copied,
    /// The file mode or type changed.
    Changed,
    /// The file is listed without changes.
    Unchanged,
}

/// A file changed by the pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestFile {
    /// Repository-relative path.
    pub filename: String,
    /// Change status reported by GitHub.
    pub status: ChangedFileStatus,
    /// Link to the file at the head commit.
    pub blob_url: Option<String>,
}

/// Issue comment attached to the pull request conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueComment {
    /// Comment identifier.
    pub id: u64,
    /// Comment body.
    pub body: Option<String>,
    /// Author login.
    pub author: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequest {
    pub(crate) number: u64,
    pub(crate) title: Option<String>,
    pub(crate) html_url: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequestFile {
    pub(crate) filename: String,
    pub(crate) status: ChangedFileStatus,
    pub(crate) blob_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiComment {
    pub(crate) id: u64,
    pub(crate) body: Option<String>,
    pub(crate) user: Option<ApiUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiUser {
    pub(crate) login: Option<String>,
}

/// Request body for creating or editing an issue comment.
#[derive(Debug, Serialize)]
pub(crate) struct CommentBody<'body> {
    pub(crate) body: &'body str,
}

impl From<ApiPullRequest> for PullRequestMetadata {
    fn from(value: ApiPullRequest) -> Self {
        Self {
            number: value.number,
            title: value.title,
            html_url: value.html_url,
            created_at: value.created_at,
        }
    }
}

impl From<ApiPullRequestFile> for PullRequestFile {
    fn from(value: ApiPullRequestFile) -> Self {
        Self {
            filename: value.filename,
            status: value.status,
            blob_url: value.blob_url,
        }
    }
}

impl From<ApiComment> for IssueComment {
    fn from(value: ApiComment) -> Self {
        Self {
            id: value.id,
            body: value.body,
            author: value.user.and_then(|user| user.login),
        }
    }
}
