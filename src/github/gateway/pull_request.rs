//! Octocrab implementation of the pull request gateway.

use async_trait::async_trait;
use octocrab::{Octocrab, Page};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::github::error::IntakeError;
use crate::github::locator::{PersonalAccessToken, PullRequestLocator};
use crate::github::models::{
    ApiComment, ApiPullRequest, ApiPullRequestFile, CommentBody, IssueComment, PullRequestFile,
    PullRequestMetadata,
};
use crate::github::rate_limit::RateLimitInfo;

use super::client::build_octocrab_client;
use super::error_mapping::{is_rate_limit_error, map_octocrab_error, rate_limit_error};
use super::{PER_PAGE, PullRequestGateway};

#[derive(Debug, Serialize)]
struct PageParams {
    per_page: u8,
}

/// Octocrab-backed gateway.
pub struct OctocrabGateway {
    client: Octocrab,
}

impl OctocrabGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the given token, targeting the API base
    /// recorded in the locator.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::InvalidUrl` when the base URI cannot be parsed or
    /// `IntakeError::Api` when Octocrab fails to construct a client.
    pub fn for_token(
        token: &PersonalAccessToken,
        locator: &PullRequestLocator,
    ) -> Result<Self, IntakeError> {
        let api_base = locator.api_base().as_str().trim_end_matches('/');
        let octocrab = build_octocrab_client(token, api_base)?;
        Ok(Self::new(octocrab))
    }

    /// Fetches every page of a list endpoint.
    async fn fetch_all<T>(&self, operation: &str, route: String) -> Result<Vec<T>, IntakeError>
    where
        T: DeserializeOwned,
    {
        let params = PageParams { per_page: PER_PAGE };
        let first_page: Page<T> = match self.client.get(route, Some(&params)).await {
            Ok(page) => page,
            Err(error) => return Err(self.map_error(operation, &error).await),
        };

        match self.client.all_pages(first_page).await {
            Ok(items) => Ok(items),
            Err(error) => Err(self.map_error(operation, &error).await),
        }
    }

    /// Maps an Octocrab error, enriching rate limit failures with the current
    /// quota when GitHub will report it.
    async fn map_error(&self, operation: &str, error: &octocrab::Error) -> IntakeError {
        match error {
            octocrab::Error::GitHub { source, .. } if is_rate_limit_error(source) => {
                let rate_limit = self.fetch_rate_limit_info().await;
                rate_limit_error(operation, source, rate_limit)
            }
            _ => map_octocrab_error(operation, error),
        }
    }

    async fn fetch_rate_limit_info(&self) -> Option<RateLimitInfo> {
        let rate = self.client.ratelimit().get().await.ok()?.rate;
        RateLimitInfo::from_epoch(
            u64::try_from(rate.limit).ok()?,
            u64::try_from(rate.remaining).ok()?,
            rate.reset,
        )
    }
}

#[async_trait]
impl PullRequestGateway for OctocrabGateway {
    async fn pull_request(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<PullRequestMetadata, IntakeError> {
        match self
            .client
            .get::<ApiPullRequest, _, _>(locator.pull_request_path(), None::<&()>)
            .await
        {
            Ok(pull_request) => Ok(pull_request.into()),
            Err(error) => Err(self.map_error("pull request", &error).await),
        }
    }

    async fn pull_request_files(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Vec<PullRequestFile>, IntakeError> {
        let files: Vec<ApiPullRequestFile> = self
            .fetch_all("pull request files", locator.files_path())
            .await?;
        Ok(files.into_iter().map(Into::into).collect())
    }

    async fn issue_comments(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Vec<IssueComment>, IntakeError> {
        let comments: Vec<ApiComment> = self
            .fetch_all("issue comments", locator.comments_path())
            .await?;
        Ok(comments.into_iter().map(Into::into).collect())
    }

    async fn create_comment(
        &self,
        locator: &PullRequestLocator,
        body: &str,
    ) -> Result<IssueComment, IntakeError> {
        let payload = CommentBody { body };
        let created: Result<ApiComment, _> = self
            .client
            .post(locator.comments_path(), Some(&payload))
            .await;
        match created {
            Ok(comment) => Ok(comment.into()),
            Err(error) => Err(self.map_error("create comment", &error).await),
        }
    }

    async fn update_comment(
        &self,
        locator: &PullRequestLocator,
        comment_id: u64,
        body: &str,
    ) -> Result<IssueComment, IntakeError> {
        let payload = CommentBody { body };
        let updated: Result<ApiComment, _> = self
            .client
            .patch(locator.comment_path(comment_id), Some(&payload))
            .await;
        match updated {
            Ok(comment) => Ok(comment.into()),
            Err(error) => Err(self.map_error("update comment", &error).await),
        }
    }
}

#[cfg(test)]
#[path = "pull_request_tests.rs"]
mod tests;
