//! Error types for localization tracking.

use thiserror::Error;

/// Errors raised while loading the tracking configuration or reading history.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrackingError {
    /// The tracking configuration is structurally invalid.
    #[error("invalid tracking configuration: {message}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        message: String,
    },

    /// A glob in the `files` section does not compile.
    #[error("invalid glob \"{glob}\": {message}")]
    InvalidGlob {
        /// The offending glob after alternation expansion.
        glob: String,
        /// Parser detail.
        message: String,
    },

    /// The tracking configuration file could not be read.
    #[error("failed to read tracking configuration '{path}': {message}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// Git history could not be inspected.
    #[error("git history unavailable: {message}")]
    History {
        /// Error detail from git.
        message: String,
    },
}

impl From<git2::Error> for TrackingError {
    fn from(error: git2::Error) -> Self {
        Self::History {
            message: error.message().to_owned(),
        }
    }
}
