//! Builders for pull request fixtures shared by unit and integration tests.
//!
//! # Examples
//!
//! ```
//! use lunaria_action::github::models::ChangedFileStatus;
//! use lunaria_action::github::models::test_support::changed_file;
//!
//! let file = changed_file("src/content/docs/fr/index.mdx", ChangedFileStatus::Modified);
//! assert_eq!(file.blob_url.as_deref(), Some("https://github.com/withastro/docs/blob/head/src/content/docs/fr/index.mdx"));
//! ```

use chrono::{DateTime, Utc};

use super::{ChangedFileStatus, IssueComment, PullRequestFile, PullRequestMetadata};

/// Blob URL prefix used by [`changed_file`].
pub const BLOB_URL_PREFIX: &str = "https://github.com/withastro/docs/blob/head/";

/// Constructs a changed file whose blob URL points at a fixed head commit.
#[must_use]
pub fn changed_file(filename: &str, status: ChangedFileStatus) -> PullRequestFile {
    PullRequestFile {
        filename: filename.to_owned(),
        status,
        blob_url: Some(format!("{BLOB_URL_PREFIX}{filename}")),
    }
}

/// Constructs pull request metadata with the given title and creation time.
#[must_use]
pub fn pull_request(number: u64, title: &str, created_at: DateTime<Utc>) -> PullRequestMetadata {
    PullRequestMetadata {
        number,
        title: Some(title.to_owned()),
        html_url: Some(format!("https://github.com/withastro/docs/pull/{number}")),
        created_at,
    }
}

/// Constructs an issue comment authored by the Actions bot.
#[must_use]
pub fn bot_comment(id: u64, body: &str) -> IssueComment {
    IssueComment {
        id,
        body: Some(body.to_owned()),
        author: Some("github-actions[bot]".to_owned()),
    }
}
