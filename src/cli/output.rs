//! Output formatting utilities for dry runs.

use std::io::{self, Write};

use lunaria_action::IntakeError;

/// Writes a rendered comment body to stdout.
///
/// # Errors
///
/// Returns [`IntakeError::Io`] when stdout cannot be written.
pub fn write_comment(body: &str) -> Result<(), IntakeError> {
    let mut stdout = io::stdout().lock();
    write_comment_to(&mut stdout, body)
}

/// Writes a rendered comment body to the given writer.
///
/// # Errors
///
/// Returns [`IntakeError::Io`] when the writer fails.
pub fn write_comment_to<W: Write>(writer: &mut W, body: &str) -> Result<(), IntakeError> {
    writeln!(writer, "{body}").map_err(|e| io_error(&e))?;
    writer.flush().map_err(|e| io_error(&e))
}

fn io_error(error: &io::Error) -> IntakeError {
    IntakeError::Io {
        message: error.to_string(),
    }
}
