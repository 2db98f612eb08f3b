//! Action run driven by the layered configuration.
//!
//! Output formatting utilities are in [`output`].

use std::env;
use std::path::Path;
use std::sync::Arc;

use camino::Utf8Path;
use chrono::Utc;
use lunaria_action::{
    ActionConfig, ActionOutcome, EventDisposition, Git2History, IntakeError, OctocrabGateway,
    PersonalAccessToken, PublishMode, PullRequestEvent, PullRequestLocator, PullRequestSource,
    StatusAction, StatusOracle, TrackingConfig, WorkflowCommand, WorkflowSink,
};
use ortho_config::OrthoConfig;

pub mod output;

/// Runs the action once.
///
/// # Errors
///
/// Returns configuration, repository, and GitHub failures. Files whose status
/// cannot be computed are reported through the outcome instead.
pub async fn run(sink: &dyn WorkflowSink) -> Result<ActionOutcome, IntakeError> {
    let config = load_config()?;
    run_with_config(&config, sink).await
}

/// Runs the action with already loaded configuration.
///
/// The event is screened before the working directory is entered, so a
/// skipped event never depends on the directory existing.
///
/// # Errors
///
/// See [`run`].
async fn run_with_config(
    config: &ActionConfig,
    sink: &dyn WorkflowSink,
) -> Result<ActionOutcome, IntakeError> {
    let locator = match disposition(config)? {
        EventDisposition::Report(locator) => locator,
        EventDisposition::Skip(reason) => {
            sink.emit(WorkflowCommand::Notice(reason.to_string()));
            return Ok(ActionOutcome::Skipped(reason));
        }
    };
    enter_working_directory(config)?;
    tracing::info!(
        "reporting on {}/{}#{}",
        locator.owner().as_str(),
        locator.repository().as_str(),
        locator.number().get()
    );

    let token = PersonalAccessToken::new(config.resolve_token()?)?;
    let gateway = OctocrabGateway::for_token(&token, &locator)?;

    let explicit = config.tracking_config_path();
    let tracking = TrackingConfig::load(Utf8Path::new("."), explicit.as_deref())?;
    let history = Git2History::discover(
        Path::new("."),
        &tracking.repository.root_dir,
        &tracking.tracking.ignored_keywords,
    )?;
    let oracle = StatusOracle::new(tracking, Arc::new(history))?;

    let mode = if config.dry_run {
        PublishMode::DryRun
    } else {
        PublishMode::Post
    };
    let outcome = StatusAction::new(&gateway, &oracle, sink)
        .run(&locator, Utc::now(), mode)
        .await?;

    if let ActionOutcome::DryRun { body, .. } = &outcome {
        output::write_comment(body)?;
    }
    Ok(outcome)
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<ActionConfig, IntakeError> {
    ActionConfig::load().map_err(|error| IntakeError::Configuration {
        message: error.to_string(),
    })
}

fn enter_working_directory(config: &ActionConfig) -> Result<(), IntakeError> {
    let Some(dir) = config.resolve_working_directory() else {
        return Ok(());
    };
    env::set_current_dir(&dir).map_err(|error| {
        tracing::error!("cannot enter {dir}: {error}");
        IntakeError::WorkingDirectory {
            dir: dir.to_string(),
        }
    })?;
    tracing::debug!("working in {dir}");
    Ok(())
}

fn disposition(config: &ActionConfig) -> Result<EventDisposition, IntakeError> {
    match config.resolve_pull_request_source()? {
        PullRequestSource::Url(url) => PullRequestLocator::parse(&url).map(EventDisposition::Report),
        PullRequestSource::Event(path) => {
            PullRequestEvent::from_path(&path)?.disposition(&config.resolve_api_url())
        }
    }
}
