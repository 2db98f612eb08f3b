//! GitHub Actions workflow commands.
//!
//! The runner reads `::<command>::<message>` lines from stdout and turns them
//! into debug log entries, notices, and error annotations. Progress details
//! for humans go through `tracing` on stderr instead.

use std::fmt;
use std::io::{self, Write};

/// A workflow command understood by the Actions runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowCommand {
    /// Shown only when step debug logging is enabled.
    Debug(String),
    /// Shown as a notice annotation.
    Notice(String),
    /// Shown as an error annotation.
    Error(String),
}

impl WorkflowCommand {
    const fn name(&self) -> &'static str {
        match self {
            Self::Debug(_) => "debug",
            Self::Notice(_) => "notice",
            Self::Error(_) => "error",
        }
    }

    /// The message text.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Debug(message) | Self::Notice(message) | Self::Error(message) => message,
        }
    }
}

impl fmt::Display for WorkflowCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "::{}::{}", self.name(), escape_data(self.message()))
    }
}

/// Escapes characters the runner would otherwise treat as delimiters.
#[must_use]
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// A sink that can emit workflow commands.
pub trait WorkflowSink: Send + Sync {
    /// Emits a workflow command.
    fn emit(&self, command: WorkflowCommand);
}

/// Writes workflow commands to stdout for the Actions runner.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutWorkflowSink;

impl WorkflowSink for StdoutWorkflowSink {
    fn emit(&self, command: WorkflowCommand) {
        if let Err(error) = writeln!(io::stdout().lock(), "{command}") {
            tracing::warn!("failed to write workflow command: {error}");
        }
    }
}

/// Test doubles for workflow output.
#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use std::sync::{Mutex, PoisonError};

    use super::{WorkflowCommand, WorkflowSink};

    /// Captures emitted commands in memory.
    #[derive(Debug, Default)]
    pub struct RecordingWorkflowSink {
        commands: Mutex<Vec<WorkflowCommand>>,
    }

    impl RecordingWorkflowSink {
        /// Removes and returns every command recorded so far.
        #[must_use]
        pub fn take(&self) -> Vec<WorkflowCommand> {
            self.commands
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .drain(..)
                .collect()
        }
    }

    impl WorkflowSink for RecordingWorkflowSink {
        fn emit(&self, command: WorkflowCommand) {
            self.commands
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(command);
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::test_support::RecordingWorkflowSink;
    use super::{WorkflowCommand, WorkflowSink};

    #[rstest]
    #[case(WorkflowCommand::Debug("Checking file: a.md".to_owned()), "::debug::Checking file: a.md")]
    #[case(
        WorkflowCommand::Notice("This pull request doesn't include any tracked files.".to_owned()),
        "::notice::This pull request doesn't include any tracked files."
    )]
    #[case(WorkflowCommand::Error("100% broken\r\nagain".to_owned()), "::error::100%25 broken%0D%0Aagain")]
    fn formats_command_lines(#[case] command: WorkflowCommand, #[case] expected: &str) {
        assert_eq!(command.to_string(), expected);
    }

    #[rstest]
    fn recording_sink_captures_commands() {
        let sink = RecordingWorkflowSink::default();
        sink.emit(WorkflowCommand::Notice("first".to_owned()));
        sink.emit(WorkflowCommand::Error("second".to_owned()));

        assert_eq!(
            sink.take(),
            vec![
                WorkflowCommand::Notice("first".to_owned()),
                WorkflowCommand::Error("second".to_owned()),
            ]
        );
        assert!(sink.take().is_empty());
    }
}
