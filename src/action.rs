//! End-to-end status comment flow for one pull request.
//!
//! Changed files are filtered to tracked ones, classified against the status
//! oracle, rendered, and published as the single status comment. A file whose
//! status cannot be computed is reported through the workflow sink and left
//! out of the table; the remaining files are still published.

use chrono::{DateTime, Utc};

use crate::github::{
    IntakeError, PullRequestFile, PullRequestGateway, PullRequestLocator, SkipReason,
};
use crate::report::{
    ClassifiedFile, CommentPublisher, StatusOverview, UpsertOutcome, classify, render_comment,
};
use crate::tracking::StatusOracle;
use crate::workflow::{WorkflowCommand, WorkflowSink};

/// Notice emitted when nothing in the pull request is tracked.
pub const NO_TRACKED_FILES: &str = "This pull request doesn't include any tracked files.";

/// Whether the rendered comment is posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishMode {
    /// Create or update the status comment.
    Post,
    /// Render only.
    DryRun,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The event does not call for a report.
    Skipped(SkipReason),
    /// No changed file is tracked.
    NoTrackedFiles,
    /// The comment was posted.
    Published {
        /// Created or updated comment.
        outcome: UpsertOutcome,
        /// Files left out because their status could not be computed.
        failed_files: Vec<String>,
    },
    /// The comment was rendered without posting.
    DryRun {
        /// Rendered comment body.
        body: String,
        /// Files left out because their status could not be computed.
        failed_files: Vec<String>,
    },
}

impl ActionOutcome {
    /// True unless some file failed classification.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        match self {
            Self::Skipped(_) | Self::NoTrackedFiles => true,
            Self::Published { failed_files, .. } | Self::DryRun { failed_files, .. } => {
                failed_files.is_empty()
            }
        }
    }
}

/// A rendered report ready to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedReport {
    /// Result of screening the pull request title.
    pub overview: StatusOverview,
    /// Classified tracked files, in pull request order.
    pub files: Vec<ClassifiedFile>,
    /// Root-relative paths of files that failed classification.
    pub failed_files: Vec<String>,
    /// Rendered comment body.
    pub body: String,
}

/// Runs the status comment flow against a gateway and a status oracle.
pub struct StatusAction<'a, Gateway>
where
    Gateway: PullRequestGateway + ?Sized,
{
    gateway: &'a Gateway,
    oracle: &'a StatusOracle,
    sink: &'a dyn WorkflowSink,
}

impl<'a, Gateway> StatusAction<'a, Gateway>
where
    Gateway: PullRequestGateway + ?Sized,
{
    /// Creates the flow.
    #[must_use]
    pub const fn new(
        gateway: &'a Gateway,
        oracle: &'a StatusOracle,
        sink: &'a dyn WorkflowSink,
    ) -> Self {
        Self {
            gateway,
            oracle,
            sink,
        }
    }

    /// Runs the flow, posting the comment unless `mode` is a dry run.
    ///
    /// `now` stands in for the source change date of files without tracked
    /// history.
    ///
    /// # Errors
    ///
    /// Propagates gateway and rendering failures. Per-file status failures
    /// are reported in the outcome instead.
    pub async fn run(
        &self,
        locator: &PullRequestLocator,
        now: DateTime<Utc>,
        mode: PublishMode,
    ) -> Result<ActionOutcome, IntakeError> {
        let Some(report) = self.prepare(locator, now).await? else {
            self.sink
                .emit(WorkflowCommand::Notice(NO_TRACKED_FILES.to_owned()));
            return Ok(ActionOutcome::NoTrackedFiles);
        };

        match mode {
            PublishMode::DryRun => Ok(ActionOutcome::DryRun {
                body: report.body,
                failed_files: report.failed_files,
            }),
            PublishMode::Post => {
                let outcome = CommentPublisher::new(self.gateway)
                    .upsert(locator, &report.body)
                    .await?;
                Ok(ActionOutcome::Published {
                    outcome,
                    failed_files: report.failed_files,
                })
            }
        }
    }

    /// Builds the report, or `None` when no changed file is tracked.
    ///
    /// # Errors
    ///
    /// Propagates gateway and rendering failures.
    pub async fn prepare(
        &self,
        locator: &PullRequestLocator,
        now: DateTime<Utc>,
    ) -> Result<Option<PreparedReport>, IntakeError> {
        let pull_request = self.gateway.pull_request(locator).await?;
        let changed = self.gateway.pull_request_files(locator).await?;

        let config = self.oracle.config();
        let tracked: Vec<(&PullRequestFile, &str)> = changed
            .iter()
            .map(|file| (file, config.unroot(&file.filename)))
            .filter(|(_, path)| self.oracle.find_file_config(path).is_some())
            .collect();
        tracing::info!(
            "{} of {} changed files are tracked",
            tracked.len(),
            changed.len()
        );
        if tracked.is_empty() {
            return Ok(None);
        }

        let title = pull_request.title.as_deref().unwrap_or_default();
        let overview = StatusOverview::from_title(title, &config.tracking.ignored_keywords);

        let mut files = Vec::with_capacity(tracked.len());
        let mut failed_files = Vec::new();
        for (file, path) in tracked {
            self.sink
                .emit(WorkflowCommand::Debug(format!("Checking file: {path}")));
            match self.oracle.file_status(path) {
                Ok(Some(status)) => {
                    let classified = classify(file, path, &status, pull_request.created_at, now);
                    tracing::debug!(
                        "{path}: {} {:?} {:?}",
                        classified.role,
                        classified.change,
                        classified.warnings
                    );
                    files.push(classified);
                }
                Ok(None) => {
                    self.record_failure(path, "no tracking status found", &mut failed_files);
                }
                Err(error) => {
                    self.record_failure(path, &error.to_string(), &mut failed_files);
                }
            }
        }

        let body = render_comment(&overview, &files)?;
        Ok(Some(PreparedReport {
            overview,
            files,
            failed_files,
            body,
        }))
    }

    fn record_failure(&self, path: &str, detail: &str, failed_files: &mut Vec<String>) {
        tracing::error!("failed to compute status of {path}: {detail}");
        self.sink.emit(WorkflowCommand::Error(format!(
            "Error while processing file: {path}"
        )));
        self.sink.emit(WorkflowCommand::Error(detail.to_owned()));
        failed_files.push(path.to_owned());
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
