//! Action configuration loaded from CLI, environment, and files.
//!
//! Values are merged with ortho-config's layered approach. Inputs declared in
//! `action.yml` reach the process as `INPUT_*` variables and the runner adds
//! its own `GITHUB_*` variables; both are consulted as fallbacks when the
//! layered configuration leaves a field empty.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – every field unset
//! 2. **Configuration file** – `.lunaria-action.toml` in the current
//!    directory, home directory, or XDG config directory
//! 3. **Environment variables** – `LUNARIA_TOKEN`, `LUNARIA_EVENT_PATH`, ...
//! 4. **Command-line arguments** – `--token`/`-t`, `--pr-url`/`-u`, ...
//!
//! # Configuration File
//!
//! ```toml
//! token = "ghp_example"
//! working_directory = "docs"
//! tracking_config = "lunaria.config.json"
//! dry_run = true
//! ```

use std::env;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::github::error::IntakeError;
use crate::github::locator::DEFAULT_API_BASE;

/// Where the pull request to report on comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullRequestSource {
    /// An explicit pull request URL.
    Url(String),
    /// A webhook event payload written by the runner.
    Event(Utf8PathBuf),
}

/// Action configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use lunaria_action::ActionConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = ActionConfig::load().expect("failed to load configuration");
/// let token = config.resolve_token().expect("token required");
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "LUNARIA",
    discovery(
        dotfile_name = ".lunaria-action.toml",
        config_file_name = "lunaria-action.toml",
        app_name = "lunaria-action"
    )
)]
pub struct ActionConfig {
    /// Token used to read the pull request and write the status comment.
    ///
    /// Falls back to the `token` action input, then `GITHUB_TOKEN`.
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Directory to switch into before reading the repository.
    ///
    /// Falls back to the `working-directory` action input.
    #[ortho_config(cli_short = 'w')]
    pub working_directory: Option<String>,

    /// Path of the webhook payload. Falls back to `GITHUB_EVENT_PATH`.
    #[ortho_config(cli_short = 'e')]
    pub event_path: Option<String>,

    /// GitHub REST API base. Falls back to `GITHUB_API_URL`.
    #[ortho_config()]
    pub api_url: Option<String>,

    /// Pull request URL to report on instead of the event payload.
    #[ortho_config(cli_short = 'u')]
    pub pr_url: Option<String>,

    /// Tracking configuration file, relative to the working directory.
    ///
    /// When unset, `lunaria.config.json` is used if present and the built-in
    /// configuration otherwise.
    #[ortho_config(cli_short = 'c')]
    pub tracking_config: Option<String>,

    /// Writes the rendered comment to stdout instead of posting it.
    ///
    /// Can be provided via `--dry-run` or `dry_run = true` in a
    /// configuration file. `LUNARIA_DRY_RUN` is not supported because
    /// `ortho_config` does not load boolean values from the environment.
    #[ortho_config(cli_short = 'n')]
    pub dry_run: bool,
}

impl ActionConfig {
    /// Resolves the token from configuration, the `token` input, or
    /// `GITHUB_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingToken`] when no source provides a value.
    pub fn resolve_token(&self) -> Result<String, IntakeError> {
        non_empty(self.token.as_deref())
            .or_else(|| env_value("INPUT_TOKEN"))
            .or_else(|| env_value("GITHUB_TOKEN"))
            .ok_or(IntakeError::MissingToken)
    }

    /// Resolves the directory to work in, if any.
    #[must_use]
    pub fn resolve_working_directory(&self) -> Option<Utf8PathBuf> {
        non_empty(self.working_directory.as_deref())
            .or_else(|| env_value("INPUT_WORKING-DIRECTORY"))
            .map(Utf8PathBuf::from)
    }

    /// Resolves the REST API base, defaulting to the public GitHub API.
    #[must_use]
    pub fn resolve_api_url(&self) -> String {
        non_empty(self.api_url.as_deref())
            .or_else(|| env_value("GITHUB_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_owned())
    }

    /// Resolves where the pull request comes from.
    ///
    /// An explicit pull request URL wins over the event payload.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingPullRequestSource`] when neither a URL
    /// nor an event path is available.
    pub fn resolve_pull_request_source(&self) -> Result<PullRequestSource, IntakeError> {
        if let Some(url) = non_empty(self.pr_url.as_deref()) {
            return Ok(PullRequestSource::Url(url));
        }

        non_empty(self.event_path.as_deref())
            .or_else(|| env_value("GITHUB_EVENT_PATH"))
            .map(|path| PullRequestSource::Event(Utf8PathBuf::from(path)))
            .ok_or(IntakeError::MissingPullRequestSource)
    }

    /// Explicit tracking configuration path, if configured.
    #[must_use]
    pub fn tracking_config_path(&self) -> Option<Utf8PathBuf> {
        non_empty(self.tracking_config.as_deref()).map(Utf8PathBuf::from)
    }
}

/// The runner sets unused inputs to empty strings.
fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_owned)
}

fn env_value(name: &str) -> Option<String> {
    non_empty(env::var(name).ok().as_deref())
}
