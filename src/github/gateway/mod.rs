//! Gateways for talking to the GitHub REST API through Octocrab.
//!
//! The trait-based design enables mocking in tests while the Octocrab
//! implementation handles real HTTP requests.

mod client;
mod error_mapping;
mod pull_request;

pub use pull_request::OctocrabGateway;

use async_trait::async_trait;

use crate::github::error::IntakeError;
use crate::github::locator::PullRequestLocator;
use crate::github::models::{IssueComment, PullRequestFile, PullRequestMetadata};

/// Number of items requested per page when listing.
pub const PER_PAGE: u8 = 100;

/// Gateway that can read a pull request and manage its issue comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestGateway: Send + Sync {
    /// Fetch the pull request metadata.
    async fn pull_request(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<PullRequestMetadata, IntakeError>;

    /// Fetch every file changed by the pull request, across all pages.
    async fn pull_request_files(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Vec<PullRequestFile>, IntakeError>;

    /// Fetch every issue comment on the pull request, across all pages.
    async fn issue_comments(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Vec<IssueComment>, IntakeError>;

    /// Post a new issue comment on the pull request.
    async fn create_comment(
        &self,
        locator: &PullRequestLocator,
        body: &str,
    ) -> Result<IssueComment, IntakeError>;

    /// Replace the body of an existing issue comment.
    async fn update_comment(
        &self,
        locator: &PullRequestLocator,
        comment_id: u64,
        body: &str,
    ) -> Result<IssueComment, IntakeError>;
}
