//! Pull request identity and the API paths derived from it.

use url::Url;

use super::error::IntakeError;

/// Public GitHub REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    pub(crate) fn new(value: &str) -> Result<Self, IntakeError> {
        if value.is_empty() {
            return Err(IntakeError::MissingPathSegments);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    pub(crate) fn new(value: &str) -> Result<Self, IntakeError> {
        if value.is_empty() {
            return Err(IntakeError::MissingPathSegments);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Pull request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    pub(crate) const fn new(value: u64) -> Result<Self, IntakeError> {
        if value == 0 {
            return Err(IntakeError::InvalidPullRequestNumber);
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// GitHub token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, IntakeError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IntakeError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

// Tokens end up in workflow logs through `{:?}` otherwise.
impl std::fmt::Debug for PersonalAccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PersonalAccessToken(***)")
    }
}

/// Derives the GitHub API base URL from the host of a pull request URL.
fn derive_api_base(parsed: &Url) -> Result<Url, IntakeError> {
    let host = parsed
        .host_str()
        .ok_or_else(|| IntakeError::InvalidUrl("URL must include a host".to_owned()))?;

    if host.eq_ignore_ascii_case("github.com") {
        return parse_api_base(DEFAULT_API_BASE);
    }

    let authority = if host.contains(':') {
        format!("[{host}]")
    } else {
        host.to_owned()
    };
    let mut api_url = Url::parse(&format!("{}://{authority}", parsed.scheme()))
        .map_err(|error| IntakeError::InvalidUrl(error.to_string()))?;
    api_url
        .set_port(parsed.port())
        .map_err(|()| IntakeError::InvalidUrl("invalid port".to_owned()))?;
    api_url.set_path("api/v3");
    Ok(api_url)
}

fn parse_api_base(value: &str) -> Result<Url, IntakeError> {
    Url::parse(value).map_err(|error| IntakeError::InvalidUrl(format!("{value}: {error}")))
}

/// Identifies one pull request together with the API it lives behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestLocator {
    api_base: Url,
    owner: RepositoryOwner,
    repository: RepositoryName,
    number: PullRequestNumber,
}

impl PullRequestLocator {
    /// Builds a locator from the pieces found in a workflow event.
    ///
    /// `repository` is the `owner/name` pair GitHub reports as `full_name`.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::InvalidUrl` for an unusable API base,
    /// `MissingPathSegments` when `repository` is not `owner/name`, and
    /// `InvalidPullRequestNumber` for pull request zero.
    pub fn from_parts(api_base: &str, repository: &str, number: u64) -> Result<Self, IntakeError> {
        let (owner_segment, name_segment) = repository
            .split_once('/')
            .ok_or(IntakeError::MissingPathSegments)?;

        Ok(Self {
            api_base: parse_api_base(api_base)?,
            owner: RepositoryOwner::new(owner_segment)?,
            repository: RepositoryName::new(name_segment)?,
            number: PullRequestNumber::new(number)?,
        })
    }

    /// Parses a GitHub pull request URL in the form
    /// `https://github.com/<owner>/<repo>/pull/<number>`.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::InvalidUrl` when parsing fails, `MissingPathSegments`
    /// when the URL path is not `/owner/repo/pull/<number>`, and
    /// `InvalidPullRequestNumber` when the final segment is not a positive
    /// integer.
    pub fn parse(input: &str) -> Result<Self, IntakeError> {
        let parsed =
            Url::parse(input).map_err(|error| IntakeError::InvalidUrl(error.to_string()))?;

        let mut segments = parsed
            .path_segments()
            .ok_or(IntakeError::MissingPathSegments)?;

        let owner_segment = segments.next().ok_or(IntakeError::MissingPathSegments)?;
        let repository_segment = segments.next().ok_or(IntakeError::MissingPathSegments)?;
        let marker = segments.next().ok_or(IntakeError::MissingPathSegments)?;
        let number_segment = segments.next().ok_or(IntakeError::MissingPathSegments)?;

        if marker != "pull" || number_segment.is_empty() {
            return Err(IntakeError::MissingPathSegments);
        }

        let number = number_segment
            .parse::<u64>()
            .map_err(|_| IntakeError::InvalidPullRequestNumber)
            .and_then(PullRequestNumber::new)?;

        Ok(Self {
            api_base: derive_api_base(&parsed)?,
            owner: RepositoryOwner::new(owner_segment)?,
            repository: RepositoryName::new(repository_segment)?,
            number,
        })
    }

    /// API base URL the pull request is served from.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// Pull request number.
    #[must_use]
    pub const fn number(&self) -> PullRequestNumber {
        self.number
    }

    fn repo_path(&self) -> String {
        format!(
            "/repos/{}/{}",
            self.owner.as_str(),
            self.repository.as_str()
        )
    }

    pub(crate) fn pull_request_path(&self) -> String {
        format!("{}/pulls/{}", self.repo_path(), self.number.get())
    }

    pub(crate) fn files_path(&self) -> String {
        format!("{}/pulls/{}/files", self.repo_path(), self.number.get())
    }

    pub(crate) fn comments_path(&self) -> String {
        format!("{}/issues/{}/comments", self.repo_path(), self.number.get())
    }

    pub(crate) fn comment_path(&self, comment_id: u64) -> String {
        format!("{}/issues/comments/{comment_id}", self.repo_path())
    }
}
