//! Idempotent status comment publishing.

use crate::github::{IntakeError, IssueComment, PullRequestGateway, PullRequestLocator};

use super::render::COMMENT_MARKER;

/// What publishing did on the pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new comment was posted.
    Created(u64),
    /// The existing status comment was replaced.
    Updated(u64),
}

impl UpsertOutcome {
    /// Identifier of the comment that now holds the report.
    #[must_use]
    pub const fn comment_id(self) -> u64 {
        match self {
            Self::Created(id) | Self::Updated(id) => id,
        }
    }
}

/// Keeps a single status comment per pull request up to date.
pub struct CommentPublisher<'client, Gateway>
where
    Gateway: PullRequestGateway + ?Sized,
{
    client: &'client Gateway,
}

impl<'client, Gateway> CommentPublisher<'client, Gateway>
where
    Gateway: PullRequestGateway + ?Sized,
{
    /// Create a publisher using the provided gateway.
    #[must_use]
    pub const fn new(client: &'client Gateway) -> Self {
        Self { client }
    }

    /// Replaces the first comment containing the marker, or posts a new one.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures from listing, creating, or editing
    /// comments.
    pub async fn upsert(
        &self,
        locator: &PullRequestLocator,
        body: &str,
    ) -> Result<UpsertOutcome, IntakeError> {
        let comments = self.client.issue_comments(locator).await?;

        if let Some(existing) = find_status_comment(&comments) {
            let updated = self
                .client
                .update_comment(locator, existing.id, body)
                .await?;
            tracing::info!("updated status comment {}", updated.id);
            return Ok(UpsertOutcome::Updated(updated.id));
        }

        let created = self.client.create_comment(locator, body).await?;
        tracing::info!("created status comment {}", created.id);
        Ok(UpsertOutcome::Created(created.id))
    }
}

/// First comment whose body carries the status marker.
#[must_use]
pub fn find_status_comment(comments: &[IssueComment]) -> Option<&IssueComment> {
    comments.iter().find(|comment| {
        comment
            .body
            .as_deref()
            .is_some_and(|body| body.contains(COMMENT_MARKER))
    })
}
