//! Unit tests for the status comment flow.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use mockall::predicate::always;
use rstest::{fixture, rstest};

use super::{ActionOutcome, NO_TRACKED_FILES, PublishMode, StatusAction};
use crate::github::models::test_support::{bot_comment, changed_file, pull_request};
use crate::github::{ChangedFileStatus, MockPullRequestGateway, PullRequestFile, PullRequestLocator};
use crate::report::{StatusOverview, UpsertOutcome};
use crate::tracking::history::{MockTrackingHistory, TrackedChange};
use crate::tracking::{StatusOracle, TrackingConfig, TrackingError};
use crate::workflow::WorkflowCommand;
use crate::workflow::test_support::RecordingWorkflowSink;

const FRENCH_INDEX: &str = "src/content/docs/fr/index.mdx";
const ENGLISH_INDEX: &str = "src/content/docs/en/index.mdx";

fn at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .expect("timestamp should be valid")
}

fn change(sha: &str, seconds: i64) -> TrackedChange {
    TrackedChange {
        sha: sha.to_owned(),
        date: at(seconds),
        message: "Update docs".to_owned(),
    }
}

fn oracle_with(history: MockTrackingHistory) -> StatusOracle {
    StatusOracle::new(TrackingConfig::builtin(), Arc::new(history))
        .expect("builtin configuration should compile")
}

fn history_with_source_change(seconds: i64) -> MockTrackingHistory {
    let mut history = MockTrackingHistory::new();
    history.expect_latest_changes().returning(move |_| {
        let mut changes = BTreeMap::new();
        changes.insert(ENGLISH_INDEX.to_owned(), change("abc", seconds));
        Ok(changes)
    });
    history
}

fn gateway_with(title: &'static str, files: Vec<PullRequestFile>) -> MockPullRequestGateway {
    let mut gateway = MockPullRequestGateway::new();
    gateway
        .expect_pull_request()
        .with(always())
        .times(1)
        .returning(move |_| Ok(pull_request(7, title, at(150))));
    gateway
        .expect_pull_request_files()
        .with(always())
        .times(1)
        .returning(move |_| Ok(files.clone()));
    gateway
}

#[fixture]
fn locator() -> PullRequestLocator {
    PullRequestLocator::from_parts("https://api.github.com", "withastro/docs", 7)
        .expect("locator should be valid")
}

#[rstest]
#[tokio::test]
async fn untracked_changes_emit_notice(locator: PullRequestLocator) {
    let mut gateway = gateway_with(
        "Bump dependencies",
        vec![
            changed_file("package.json", ChangedFileStatus::Modified),
            changed_file("pnpm-lock.yaml", ChangedFileStatus::Modified),
        ],
    );
    gateway.expect_issue_comments().never();
    gateway.expect_create_comment().never();
    let mut history = MockTrackingHistory::new();
    history.expect_latest_changes().never();
    let oracle = oracle_with(history);
    let sink = RecordingWorkflowSink::default();

    let outcome = StatusAction::new(&gateway, &oracle, &sink)
        .run(&locator, at(1_000), PublishMode::Post)
        .await
        .expect("run should succeed");

    assert_eq!(outcome, ActionOutcome::NoTrackedFiles);
    assert!(outcome.is_success());
    assert_eq!(
        sink.take(),
        vec![WorkflowCommand::Notice(NO_TRACKED_FILES.to_owned())]
    );
}

#[rstest]
#[tokio::test]
async fn outdated_localization_is_flagged_in_dry_run(locator: PullRequestLocator) {
    let mut gateway = gateway_with(
        "Translate index",
        vec![
            changed_file(FRENCH_INDEX, ChangedFileStatus::Modified),
            changed_file("package.json", ChangedFileStatus::Modified),
        ],
    );
    gateway.expect_issue_comments().never();
    let oracle = oracle_with(history_with_source_change(200));
    let sink = RecordingWorkflowSink::default();

    let outcome = StatusAction::new(&gateway, &oracle, &sink)
        .run(&locator, at(1_000), PublishMode::DryRun)
        .await
        .expect("run should succeed");

    let ActionOutcome::DryRun { body, failed_files } = outcome else {
        panic!("expected a dry run, got {outcome:?}");
    };
    assert!(failed_files.is_empty());
    assert!(body.starts_with("<!-- lunaria-status-overview -->"));
    assert!(body.contains("This pull request will trigger status changes."));
    assert!(body.contains("Localization changed, will be marked as complete. 🔄️"));
    assert_eq!(
        sink.take(),
        vec![WorkflowCommand::Debug(format!("Checking file: {FRENCH_INDEX}"))]
    );
}

#[rstest]
#[tokio::test]
async fn publishes_status_comment(locator: PullRequestLocator) {
    let mut gateway = gateway_with(
        "Update index",
        vec![changed_file(ENGLISH_INDEX, ChangedFileStatus::Modified)],
    );
    gateway
        .expect_issue_comments()
        .times(1)
        .returning(|_| Ok(vec![bot_comment(1, "Deploy preview ready")]));
    gateway
        .expect_create_comment()
        .times(1)
        .returning(|_, body| Ok(bot_comment(42, body)));
    gateway.expect_update_comment().never();
    let oracle = oracle_with(history_with_source_change(100));
    let sink = RecordingWorkflowSink::default();

    let outcome = StatusAction::new(&gateway, &oracle, &sink)
        .run(&locator, at(1_000), PublishMode::Post)
        .await
        .expect("run should succeed");

    assert_eq!(
        outcome,
        ActionOutcome::Published {
            outcome: UpsertOutcome::Created(42),
            failed_files: Vec::new(),
        }
    );
}

#[rstest]
#[tokio::test]
async fn history_failure_is_reported_per_file(locator: PullRequestLocator) {
    let mut gateway = gateway_with(
        "Translate index",
        vec![changed_file(FRENCH_INDEX, ChangedFileStatus::Added)],
    );
    gateway
        .expect_issue_comments()
        .times(1)
        .returning(|_| Ok(Vec::new()));
    gateway
        .expect_create_comment()
        .times(1)
        .returning(|_, body| Ok(bot_comment(5, body)));
    let mut history = MockTrackingHistory::new();
    history.expect_latest_changes().returning(|_| {
        Err(TrackingError::History {
            message: "object not found".to_owned(),
        })
    });
    let oracle = oracle_with(history);
    let sink = RecordingWorkflowSink::default();

    let outcome = StatusAction::new(&gateway, &oracle, &sink)
        .run(&locator, at(1_000), PublishMode::Post)
        .await
        .expect("run should still publish");

    assert!(!outcome.is_success());
    assert_eq!(
        outcome,
        ActionOutcome::Published {
            outcome: UpsertOutcome::Created(5),
            failed_files: vec![FRENCH_INDEX.to_owned()],
        }
    );
    let commands = sink.take();
    assert!(commands.contains(&WorkflowCommand::Error(format!(
        "Error while processing file: {FRENCH_INDEX}"
    ))));
}

#[rstest]
#[tokio::test]
async fn ignored_title_marks_report_untracked(locator: PullRequestLocator) {
    let gateway = gateway_with(
        "Fix typo in French index",
        vec![changed_file(FRENCH_INDEX, ChangedFileStatus::Modified)],
    );
    let oracle = oracle_with(history_with_source_change(100));
    let sink = RecordingWorkflowSink::default();

    let report = StatusAction::new(&gateway, &oracle, &sink)
        .prepare(&locator, at(1_000))
        .await
        .expect("prepare should succeed")
        .expect("a tracked file should produce a report");

    assert_eq!(
        report.overview,
        StatusOverview::Untracked {
            keyword: "typo".to_owned()
        }
    );
    assert_eq!(report.files.len(), 1);
    assert!(report.body.contains("The keyword `typo` was found"));
    assert!(report.body.contains("> [!NOTE]"));
}
