//! GitHub pull request intake and comment publishing.
//!
//! This module wraps Octocrab to read the workflow event, load the pull
//! request and its changed files, and create or edit the status comment.
//! Errors are mapped into user-friendly variants so that callers can surface
//! precise failures without exposing Octocrab internals.

pub mod error;
pub mod event;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod rate_limit;

pub use error::IntakeError;
pub use event::{EventDisposition, PullRequestEvent, SkipReason};
pub use gateway::{OctocrabGateway, PullRequestGateway};
pub use locator::{
    PersonalAccessToken, PullRequestLocator, PullRequestNumber, RepositoryName, RepositoryOwner,
};
pub use models::{ChangedFileStatus, IssueComment, PullRequestFile, PullRequestMetadata};

#[cfg(test)]
pub use gateway::MockPullRequestGateway;
