//! Lunaria pull request status action.
//!
//! The library reads a pull request event, matches the changed files against
//! a localization tracking configuration, checks git history for outdated
//! translations, and keeps a single status comment on the pull request up to
//! date. The binary wires these pieces to the GitHub Actions runner.

pub mod action;
pub mod config;
pub(crate) mod fs;
pub mod github;
pub mod report;
pub mod tracking;
pub mod workflow;

pub use action::{ActionOutcome, NO_TRACKED_FILES, PreparedReport, PublishMode, StatusAction};
pub use config::{ActionConfig, PullRequestSource};
pub use github::{
    EventDisposition, IntakeError, OctocrabGateway, PersonalAccessToken, PullRequestEvent,
    PullRequestGateway, PullRequestLocator, SkipReason,
};
pub use report::{COMMENT_MARKER, StatusOverview, UpsertOutcome};
pub use tracking::{Git2History, StatusOracle, TrackingConfig, TrackingError};
pub use workflow::{StdoutWorkflowSink, WorkflowCommand, WorkflowSink};
