//! Lunaria action entrypoint.

use std::process::ExitCode;

use lunaria_action::{StdoutWorkflowSink, WorkflowCommand, WorkflowSink};
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let sink = StdoutWorkflowSink;
    match cli::run(&sink).await {
        Ok(outcome) if outcome.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(error) => {
            tracing::error!("{error}");
            sink.emit(WorkflowCommand::Error(error.to_string()));
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout only carries workflow commands and dry-run
/// output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
