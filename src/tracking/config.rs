//! Localization tracking configuration.
//!
//! The configuration names the source locale, the translated locales, which
//! files are tracked, and the keywords that exempt a pull request or commit
//! from tracking. It is read from a JSON file shaped like
//! `lunaria.config.json`:
//!
//! ```json
//! {
//!   "repository": { "name": "withastro/docs", "rootDir": "." },
//!   "sourceLocale": { "label": "English", "lang": "en" },
//!   "locales": [{ "label": "Français", "lang": "fr" }],
//!   "files": [{
//!     "include": ["src/content/docs/en/**/*.(md|mdx)"],
//!     "pattern": "src/content/docs/@lang/@path",
//!     "type": "universal"
//!   }],
//!   "tracking": { "ignoredKeywords": ["typo"] }
//! }
//! ```
//!
//! When no file is present the built-in configuration from
//! [`TrackingConfig::builtin`] applies.

use std::collections::HashSet;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use super::error::TrackingError;
use super::glob::GlobSet;
use crate::fs;

/// File name looked up when no explicit configuration path is given.
pub const DEFAULT_CONFIG_FILE: &str = "lunaria.config.json";

/// Top-level tracking configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingConfig {
    /// Repository the tracked files live in.
    pub repository: RepositoryConfig,
    /// Locale the content is authored in.
    pub source_locale: Locale,
    /// Locales the content is translated into.
    pub locales: Vec<Locale>,
    /// Tracked file groups.
    pub files: Vec<FileEntry>,
    /// Tracking behaviour.
    #[serde(default)]
    pub tracking: TrackingOptions,
}

/// Repository settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryConfig {
    /// `owner/name` of the repository.
    pub name: String,
    /// Default branch.
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Directory, relative to the repository root, that paths are relative to.
    #[serde(default = "default_root_dir")]
    pub root_dir: String,
}

/// A locale and the values its placeholders expand to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Locale {
    /// Human-readable name.
    pub label: String,
    /// Value of `@lang` in patterns.
    pub lang: String,
    /// Extra placeholder values.
    #[serde(default)]
    pub parameters: LocaleParameters,
}

/// Optional placeholder values for a locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleParameters {
    /// Value of `@tag` in patterns; defaults to the locale's `lang`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl Locale {
    /// Builds a locale whose tag is given explicitly.
    #[must_use]
    pub fn new(label: &str, lang: &str, tag: &str) -> Self {
        Self {
            label: label.to_owned(),
            lang: lang.to_owned(),
            parameters: LocaleParameters {
                tag: Some(tag.to_owned()),
            },
        }
    }

    /// Value of the `@tag` placeholder.
    #[must_use]
    pub fn tag(&self) -> &str {
        self.parameters.tag.as_deref().unwrap_or(&self.lang)
    }
}

/// How a tracked file relates to its localizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Each localization is a full translation of the source file.
    Universal,
    /// Localizations hold a subset of the source's keys.
    Dictionary,
}

/// A group of tracked source files and where their localizations live.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// Globs selecting source files.
    pub include: Vec<String>,
    /// Globs removing files from `include`.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Path pattern with `@lang`, `@tag`, and `@path` placeholders.
    pub pattern: String,
    /// File kind.
    #[serde(rename = "type")]
    pub kind: FileKind,
}

/// Tracking behaviour settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingOptions {
    /// Case-insensitive keywords that exempt a pull request title or commit
    /// message from tracking.
    #[serde(default)]
    pub ignored_keywords: Vec<String>,
}

fn default_branch() -> String {
    "main".to_owned()
}

fn default_root_dir() -> String {
    ".".to_owned()
}

impl TrackingConfig {
    /// The configuration used by the Astro documentation site.
    #[must_use]
    pub fn builtin() -> Self {
        let locales = [
            ("العربية", "ar", "ar"),
            ("Deutsch", "de", "de"),
            ("Español", "es", "es"),
            ("Français", "fr", "fr"),
            ("हिन्दी", "hi", "hi"),
            ("Italiano", "it", "it"),
            ("日本語", "ja", "ja"),
            ("한국어", "ko", "ko"),
            ("Polski", "pl", "pl"),
            ("Português do Brasil", "pt-br", "pt-BR"),
            ("Русский", "ru", "ru"),
            ("简体中文", "zh-cn", "zh-CN"),
            ("正體中文", "zh-tw", "zh-TW"),
        ]
        .into_iter()
        .map(|(label, lang, tag)| Locale::new(label, lang, tag))
        .collect();

        let files = vec![
            FileEntry {
                include: vec!["src/content/i18n/en.yml".to_owned()],
                exclude: Vec::new(),
                pattern: "src/content/i18n/@tag.yml".to_owned(),
                kind: FileKind::Dictionary,
            },
            FileEntry {
                include: vec!["src/i18n/en/nav.ts".to_owned()],
                exclude: Vec::new(),
                pattern: "src/i18n/@lang/@path".to_owned(),
                kind: FileKind::Universal,
            },
            FileEntry {
                include: vec!["src/content/docs/en/**/*.(md|mdx)".to_owned()],
                exclude: Vec::new(),
                pattern: "src/content/docs/@lang/@path".to_owned(),
                kind: FileKind::Universal,
            },
        ];

        let ignored_keywords = [
            "lunaria-ignore",
            "typo",
            "en-only",
            "broken link",
            "i18nReady",
            "i18nIgnore",
        ]
        .map(str::to_owned)
        .to_vec();

        Self {
            repository: RepositoryConfig {
                name: "withastro/docs".to_owned(),
                branch: default_branch(),
                root_dir: default_root_dir(),
            },
            source_locale: Locale::new("English", "en", "en"),
            locales,
            files,
            tracking: TrackingOptions { ignored_keywords },
        }
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::InvalidConfig`] for malformed JSON or a
    /// configuration that fails [`TrackingConfig::validate`].
    pub fn from_json_str(content: &str) -> Result<Self, TrackingError> {
        let config: Self =
            serde_json::from_str(content).map_err(|error| TrackingError::InvalidConfig {
                message: error.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration for a project directory.
    ///
    /// An explicit path must exist. Without one, [`DEFAULT_CONFIG_FILE`] in
    /// `dir` is used when present and [`TrackingConfig::builtin`] otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::Io`] when a file cannot be read and
    /// [`TrackingError::InvalidConfig`] when it does not validate.
    pub fn load(dir: &Utf8Path, explicit: Option<&Utf8Path>) -> Result<Self, TrackingError> {
        let path = match explicit {
            Some(path) => dir.join(path),
            None => {
                let candidate = dir.join(DEFAULT_CONFIG_FILE);
                if !fs::is_file(&candidate) {
                    tracing::debug!("no {candidate}, using built-in tracking configuration");
                    return Ok(Self::builtin());
                }
                candidate
            }
        };

        let content = fs::read_to_string(&path).map_err(|error| TrackingError::Io {
            path: path.to_string(),
            message: error.to_string(),
        })?;
        tracing::debug!("loaded tracking configuration from {path}");
        Self::from_json_str(&content)
    }

    /// Checks the configuration for mistakes that would make matching
    /// meaningless.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::InvalidConfig`] describing the first problem
    /// found, or [`TrackingError::InvalidGlob`] for a glob that does not
    /// compile.
    pub fn validate(&self) -> Result<(), TrackingError> {
        if self.locales.is_empty() {
            return Err(invalid("at least one locale is required"));
        }

        if self.repository.root_dir.starts_with('/') {
            return Err(invalid("repository.rootDir must be relative"));
        }

        let mut seen = HashSet::new();
        for locale in &self.locales {
            if locale.lang == self.source_locale.lang {
                return Err(invalid(&format!(
                    "locale \"{}\" duplicates the source locale",
                    locale.lang
                )));
            }
            if !seen.insert(locale.lang.as_str()) {
                return Err(invalid(&format!(
                    "locale \"{}\" is listed more than once",
                    locale.lang
                )));
            }
        }

        for (index, entry) in self.files.iter().enumerate() {
            if entry.include.is_empty() {
                return Err(invalid(&format!(
                    "files[{index}] needs at least one include glob"
                )));
            }
            if !entry.pattern.contains("@lang") && !entry.pattern.contains("@tag") {
                return Err(invalid(&format!(
                    "files[{index}] pattern \"{}\" needs an @lang or @tag placeholder",
                    entry.pattern
                )));
            }
            GlobSet::compile(&entry.include)?;
            GlobSet::compile(&entry.exclude)?;
        }

        Ok(())
    }

    /// Strips [`RepositoryConfig::root_dir`] from a repository-relative path.
    ///
    /// Paths outside the root directory are returned unchanged.
    #[must_use]
    pub fn unroot<'path>(&self, filename: &'path str) -> &'path str {
        let root_dir = self.repository.root_dir.trim_end_matches('/');
        if root_dir == "." || root_dir.is_empty() {
            return filename;
        }
        filename
            .strip_prefix(root_dir)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(filename)
    }
}

fn invalid(message: &str) -> TrackingError {
    TrackingError::InvalidConfig {
        message: message.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::{DEFAULT_CONFIG_FILE, FileKind, TrackingConfig};
    use crate::tracking::error::TrackingError;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    const MINIMAL: &str = r#"{
        "repository": { "name": "octo/site", "rootDir": "docs" },
        "sourceLocale": { "label": "English", "lang": "en" },
        "locales": [{ "label": "Français", "lang": "fr" }],
        "files": [{
            "include": ["content/en/**/*.md"],
            "pattern": "content/@lang/@path",
            "type": "universal"
        }]
    }"#;

    fn utf8_dir(dir: &TempDir) -> Result<Utf8PathBuf, Box<dyn std::error::Error>> {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|_| "temp directory path must be UTF-8".into())
    }

    #[rstest]
    fn builtin_configuration_validates() {
        let config = TrackingConfig::builtin();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.locales.len(), 13);
        assert_eq!(config.files.first().map(|f| f.kind), Some(FileKind::Dictionary));
    }

    #[rstest]
    fn parses_minimal_json_with_defaults() -> TestResult {
        let config = TrackingConfig::from_json_str(MINIMAL)?;

        assert_eq!(config.repository.branch, "main");
        assert_eq!(config.repository.root_dir, "docs");
        assert!(config.tracking.ignored_keywords.is_empty());
        assert_eq!(config.locales.first().map(super::Locale::tag), Some("fr"));
        Ok(())
    }

    #[rstest]
    #[case::no_locales(r#""locales": []"#, "at least one locale")]
    #[case::source_duplicate(
        r#""locales": [{ "label": "English", "lang": "en" }]"#,
        "duplicates the source locale"
    )]
    #[case::repeated(
        r#""locales": [{ "label": "A", "lang": "fr" }, { "label": "B", "lang": "fr" }]"#,
        "more than once"
    )]
    fn rejects_bad_locale_lists(#[case] locales: &str, #[case] expected: &str) {
        let json = MINIMAL.replace(r#""locales": [{ "label": "Français", "lang": "fr" }]"#, locales);

        let error = TrackingConfig::from_json_str(&json).expect_err("config should be rejected");

        assert!(
            error.to_string().contains(expected),
            "expected `{expected}` in `{error}`"
        );
    }

    #[rstest]
    fn rejects_pattern_without_locale_placeholder() {
        let json = MINIMAL.replace("content/@lang/@path", "content/@path");

        let error = TrackingConfig::from_json_str(&json).expect_err("config should be rejected");

        assert!(matches!(error, TrackingError::InvalidConfig { .. }));
    }

    #[rstest]
    fn rejects_broken_glob() {
        let json = MINIMAL.replace("content/en/**/*.md", "content/en/[*.md");

        let error = TrackingConfig::from_json_str(&json).expect_err("config should be rejected");

        assert!(
            matches!(error, TrackingError::InvalidGlob { .. }),
            "expected InvalidGlob, got {error:?}"
        );
    }

    #[rstest]
    #[case(".", "src/content/docs/en/index.mdx", "src/content/docs/en/index.mdx")]
    #[case("docs", "docs/content/en/a.md", "content/en/a.md")]
    #[case("docs/", "docs/content/en/a.md", "content/en/a.md")]
    #[case("docs", "documentation/a.md", "documentation/a.md")]
    fn unroot_strips_root_directory(
        #[case] root_dir: &str,
        #[case] filename: &str,
        #[case] expected: &str,
    ) {
        let mut config = TrackingConfig::builtin();
        config.repository.root_dir = root_dir.to_owned();

        assert_eq!(config.unroot(filename), expected);
    }

    #[rstest]
    fn load_prefers_default_file_when_present() -> TestResult {
        let temp_dir = TempDir::new()?;
        std::fs::write(temp_dir.path().join(DEFAULT_CONFIG_FILE), MINIMAL)?;

        let config = TrackingConfig::load(&utf8_dir(&temp_dir)?, None)?;

        assert_eq!(config.repository.name, "octo/site");
        Ok(())
    }

    #[rstest]
    fn load_falls_back_to_builtin() -> TestResult {
        let temp_dir = TempDir::new()?;

        let config = TrackingConfig::load(&utf8_dir(&temp_dir)?, None)?;

        assert_eq!(config, TrackingConfig::builtin());
        Ok(())
    }

    #[rstest]
    fn load_requires_explicit_file_to_exist() -> TestResult {
        let temp_dir = TempDir::new()?;

        let result = TrackingConfig::load(
            &utf8_dir(&temp_dir)?,
            Some(camino::Utf8Path::new("missing.json")),
        );

        assert!(
            matches!(result, Err(TrackingError::Io { .. })),
            "expected Io error, got {result:?}"
        );
        Ok(())
    }
}
