//! Error types exposed by the GitHub intake layer.

use thiserror::Error;

use super::rate_limit::RateLimitInfo;
use crate::tracking::TrackingError;

/// Errors surfaced while reading the pull request event or communicating with
/// GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntakeError {
    /// Neither an event payload nor a pull request URL was configured.
    #[error("no pull request event payload or pull request URL was provided")]
    MissingPullRequestSource,

    /// The provided URL could not be parsed.
    #[error("pull request URL is invalid: {0}")]
    InvalidUrl(String),

    /// The pull request path is incomplete.
    #[error("pull request URL must match /owner/repo/pull/<number>")]
    MissingPathSegments,

    /// The pull request number is not a valid integer.
    #[error("pull request number must be a positive integer")]
    InvalidPullRequestNumber,

    /// The event payload could not be read or decoded.
    #[error("invalid event payload: {message}")]
    InvalidEvent {
        /// Details about the decoding failure.
        message: String,
    },

    /// The authentication token was missing.
    #[error("GitHub token is required")]
    MissingToken,

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// GitHub returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body from GitHub describing the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Rate limit exceeded - the API returned 403/429 with a rate limit message.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Rate limit info if available from the rate limit endpoint.
        rate_limit: Option<RateLimitInfo>,
        /// Error message from GitHub.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// The configured working directory could not be entered.
    #[error("Failed to change working directory to {dir}. Is the path correct?")]
    WorkingDirectory {
        /// Directory as configured.
        dir: String,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// The localization tracking layer failed.
    #[error("localization tracking failed: {message}")]
    Tracking {
        /// Details reported by the tracking layer.
        message: String,
    },
}

impl From<TrackingError> for IntakeError {
    fn from(error: TrackingError) -> Self {
        match error {
            TrackingError::InvalidConfig { .. } | TrackingError::InvalidGlob { .. } => {
                Self::Configuration {
                    message: error.to_string(),
                }
            }
            TrackingError::Io { .. } | TrackingError::History { .. } => Self::Tracking {
                message: error.to_string(),
            },
        }
    }
}
