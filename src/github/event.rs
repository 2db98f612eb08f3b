//! Workflow event payload intake.
//!
//! GitHub Actions writes the webhook payload that triggered a run to the file
//! named by `GITHUB_EVENT_PATH`. Only pull request `opened` and `synchronize`
//! events produce a status comment; anything else is skipped with a notice.

use std::fmt;

use camino::Utf8Path;
use serde::Deserialize;

use super::error::IntakeError;
use super::locator::PullRequestLocator;
use crate::fs;

/// Event actions that refresh the status comment.
const HANDLED_ACTIONS: [&str; 2] = ["opened", "synchronize"];

/// The subset of a `pull_request` webhook payload the action reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PullRequestEvent {
    /// Activity type, e.g. `opened`.
    #[serde(default)]
    pub action: Option<String>,
    /// Pull request the event refers to.
    #[serde(default)]
    pub pull_request: Option<EventPullRequest>,
    /// Repository the event was raised in.
    #[serde(default)]
    pub repository: Option<EventRepository>,
}

/// Pull request section of the payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventPullRequest {
    /// Pull request number.
    pub number: u64,
}

/// Repository section of the payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventRepository {
    /// `owner/name` of the repository.
    pub full_name: String,
}

/// Why an event does not lead to a status comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The payload has no `pull_request` section.
    MissingPullRequest,
    /// The payload has no `repository` section.
    MissingRepository,
    /// The activity type is not one the action handles.
    UnhandledAction,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::MissingPullRequest => "Skipped, could not find the pull request context.",
            Self::MissingRepository => "Skipped, could not find pull request repository.",
            Self::UnhandledAction => {
                "Skipped, Lunaria action only runs during pull request opening/synchronization."
            }
        };
        f.write_str(message)
    }
}

/// What the action should do with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventDisposition {
    /// Report on the located pull request.
    Report(PullRequestLocator),
    /// Do nothing.
    Skip(SkipReason),
}

impl PullRequestEvent {
    /// Reads and decodes the payload file.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Io`] when the file cannot be read and
    /// [`IntakeError::InvalidEvent`] when it is not a JSON object.
    pub fn from_path(path: &Utf8Path) -> Result<Self, IntakeError> {
        let content = fs::read_to_string(path).map_err(|error| IntakeError::Io {
            message: format!("failed to read event payload '{path}': {error}"),
        })?;
        Self::from_json_str(&content)
    }

    /// Decodes a payload from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidEvent`] when the text is not a payload.
    pub fn from_json_str(content: &str) -> Result<Self, IntakeError> {
        serde_json::from_str(content).map_err(|error| IntakeError::InvalidEvent {
            message: error.to_string(),
        })
    }

    /// Decides whether the event is reported on, checking the pull request,
    /// the repository, and the activity type in that order.
    ///
    /// # Errors
    ///
    /// Returns locator construction errors for a malformed repository name,
    /// pull request number, or API base.
    pub fn disposition(&self, api_base: &str) -> Result<EventDisposition, IntakeError> {
        let Some(pull_request) = &self.pull_request else {
            return Ok(EventDisposition::Skip(SkipReason::MissingPullRequest));
        };
        let Some(repository) = &self.repository else {
            return Ok(EventDisposition::Skip(SkipReason::MissingRepository));
        };
        let handled = self
            .action
            .as_deref()
            .is_some_and(|action| HANDLED_ACTIONS.contains(&action));
        if !handled {
            return Ok(EventDisposition::Skip(SkipReason::UnhandledAction));
        }

        PullRequestLocator::from_parts(api_base, &repository.full_name, pull_request.number)
            .map(EventDisposition::Report)
    }
}
