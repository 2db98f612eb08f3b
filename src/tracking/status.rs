//! Per-file localization status.
//!
//! The oracle answers two questions about a repository path: which file
//! entry tracks it, and what the source file and every localization look like
//! in history. Paths are relative to the configured root directory.

use std::sync::Arc;

use super::config::{FileEntry, Locale, TrackingConfig};
use super::error::TrackingError;
use super::glob::GlobSet;
use super::history::{TrackedChange, TrackingHistory};
use super::pattern::PathPattern;

/// The source file of a tracked group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Source path.
    pub path: String,
    /// Newest commit counted as a change to the source.
    pub latest_tracked_change: Option<TrackedChange>,
}

/// One locale's copy of a tracked source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizationEntry {
    /// Locale `lang`.
    pub lang: String,
    /// Localization path.
    pub path: String,
    /// Newest commit counted as a change to the localization.
    pub latest_tracked_change: Option<TrackedChange>,
}

/// Tracking status of a source file and its localizations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStatus {
    /// The source file.
    pub source: SourceEntry,
    /// One entry per configured locale.
    pub localizations: Vec<LocalizationEntry>,
}

impl FileStatus {
    /// Whether `path` is the source file of this status.
    #[must_use]
    pub fn is_source(&self, path: &str) -> bool {
        self.source.path == path
    }
}

#[derive(Debug)]
struct CompiledEntry {
    include: GlobSet,
    exclude: GlobSet,
}

impl CompiledEntry {
    fn tracks(&self, path: &str) -> bool {
        self.include.is_match(path) && !self.exclude.is_match(path)
    }
}

/// A path resolved to the entry tracking it.
#[derive(Debug)]
struct Resolved<'c> {
    entry: &'c FileEntry,
    source_path: String,
}

/// Computes tracking status from a configuration and commit history.
#[derive(Debug)]
pub struct StatusOracle {
    config: TrackingConfig,
    compiled: Vec<CompiledEntry>,
    history: Arc<dyn TrackingHistory>,
}

impl StatusOracle {
    /// Compiles the configuration's globs.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::InvalidGlob`] when a glob does not compile.
    pub fn new(
        config: TrackingConfig,
        history: Arc<dyn TrackingHistory>,
    ) -> Result<Self, TrackingError> {
        let compiled = config
            .files
            .iter()
            .map(|entry| {
                Ok(CompiledEntry {
                    include: GlobSet::compile(&entry.include)?,
                    exclude: GlobSet::compile(&entry.exclude)?,
                })
            })
            .collect::<Result<Vec<_>, TrackingError>>()?;
        Ok(Self {
            config,
            compiled,
            history,
        })
    }

    /// The configuration the oracle was built from.
    #[must_use]
    pub const fn config(&self) -> &TrackingConfig {
        &self.config
    }

    /// Returns the file entry tracking `path` as a source or a localization.
    #[must_use]
    pub fn find_file_config(&self, path: &str) -> Option<&FileEntry> {
        self.resolve(path).map(|resolved| resolved.entry)
    }

    /// Computes the status of the group `path` belongs to.
    ///
    /// Returns `Ok(None)` for untracked paths.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::History`] when history cannot be read.
    pub fn file_status(&self, path: &str) -> Result<Option<FileStatus>, TrackingError> {
        let Some(resolved) = self.resolve(path) else {
            return Ok(None);
        };
        let pattern = PathPattern::new(&resolved.entry.pattern);

        let localization_paths: Vec<(&Locale, String)> = self
            .config
            .locales
            .iter()
            .filter_map(|locale| {
                pattern
                    .localize(&resolved.source_path, &self.config.source_locale, locale)
                    .map(|localized| (locale, localized))
            })
            .collect();

        let mut lookup = Vec::with_capacity(localization_paths.len() + 1);
        lookup.push(resolved.source_path.clone());
        lookup.extend(localization_paths.iter().map(|(_, path)| path.clone()));
        let mut changes = self.history.latest_changes(&lookup)?;

        let source = SourceEntry {
            latest_tracked_change: changes.remove(&resolved.source_path),
            path: resolved.source_path,
        };
        let localizations = localization_paths
            .into_iter()
            .map(|(locale, path)| LocalizationEntry {
                lang: locale.lang.clone(),
                latest_tracked_change: changes.remove(&path),
                path,
            })
            .collect();

        Ok(Some(FileStatus {
            source,
            localizations,
        }))
    }

    fn resolve(&self, path: &str) -> Option<Resolved<'_>> {
        let source_locale = &self.config.source_locale;
        self.config
            .files
            .iter()
            .zip(&self.compiled)
            .find_map(|(entry, compiled)| {
                let pattern = PathPattern::new(&entry.pattern);
                if compiled.tracks(path) {
                    return pattern.extract(path, source_locale).map(|_| Resolved {
                        entry,
                        source_path: path.to_owned(),
                    });
                }

                let (_, remainder) = pattern.match_path(path, &self.config.locales)?;
                let source_path = pattern.render(source_locale, &remainder);
                compiled.tracks(&source_path).then_some(Resolved {
                    entry,
                    source_path,
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    use super::StatusOracle;
    use crate::tracking::config::{FileKind, TrackingConfig};
    use crate::tracking::history::{MockTrackingHistory, TrackedChange};

    fn change(sha: &str, seconds: i64) -> TrackedChange {
        TrackedChange {
            sha: sha.to_owned(),
            date: Utc
                .timestamp_opt(seconds, 0)
                .single()
                .expect("timestamp should be valid"),
            message: "Update".to_owned(),
        }
    }

    fn oracle_with(history: MockTrackingHistory) -> StatusOracle {
        StatusOracle::new(TrackingConfig::builtin(), Arc::new(history))
            .expect("builtin configuration should compile")
    }

    #[fixture]
    fn oracle() -> StatusOracle {
        oracle_with(MockTrackingHistory::new())
    }

    #[rstest]
    #[case::docs_source("src/content/docs/en/guides/deploy.mdx", Some(FileKind::Universal))]
    #[case::docs_localization("src/content/docs/ja/guides/deploy.mdx", Some(FileKind::Universal))]
    #[case::dictionary_source("src/content/i18n/en.yml", Some(FileKind::Dictionary))]
    #[case::dictionary_localization("src/content/i18n/pt-BR.yml", Some(FileKind::Dictionary))]
    #[case::nav_localization("src/i18n/zh-cn/nav.ts", Some(FileKind::Universal))]
    #[case::untracked_asset("src/content/docs/en/guides/image.png", None)]
    #[case::unknown_locale("src/content/docs/xx/index.mdx", None)]
    #[case::other_i18n_file("src/i18n/fr/ui.ts", None)]
    #[case::outside_content("package.json", None)]
    fn finds_tracking_entry(
        oracle: StatusOracle,
        #[case] path: &str,
        #[case] expected: Option<FileKind>,
    ) {
        assert_eq!(oracle.find_file_config(path).map(|entry| entry.kind), expected);
    }

    #[rstest]
    fn untracked_paths_have_no_status(oracle: StatusOracle) {
        assert_eq!(oracle.file_status("README.md"), Ok(None));
    }

    #[rstest]
    fn localization_resolves_to_its_source() {
        let mut history = MockTrackingHistory::new();
        history.expect_latest_changes().returning(|paths| {
            assert_eq!(paths.first().map(String::as_str), Some("src/content/docs/en/index.mdx"));
            assert_eq!(paths.len(), 14);
            let mut changes = BTreeMap::new();
            changes.insert("src/content/docs/en/index.mdx".to_owned(), change("abc", 200));
            changes.insert("src/content/docs/fr/index.mdx".to_owned(), change("def", 100));
            Ok(changes)
        });
        let oracle = oracle_with(history);

        let status = oracle
            .file_status("src/content/docs/fr/index.mdx")
            .expect("history should be readable")
            .expect("path should be tracked");

        assert!(!status.is_source("src/content/docs/fr/index.mdx"));
        assert_eq!(status.source.path, "src/content/docs/en/index.mdx");
        assert_eq!(
            status.source.latest_tracked_change.map(|c| c.sha),
            Some("abc".to_owned())
        );
        let french = status
            .localizations
            .iter()
            .find(|entry| entry.lang == "fr")
            .expect("French localization should be listed");
        assert_eq!(french.path, "src/content/docs/fr/index.mdx");
        assert!(french.latest_tracked_change.is_some());
        let german = status
            .localizations
            .iter()
            .find(|entry| entry.lang == "de")
            .expect("German localization should be listed");
        assert!(german.latest_tracked_change.is_none());
    }

    #[rstest]
    fn dictionary_localizations_use_locale_tags() {
        let mut history = MockTrackingHistory::new();
        history
            .expect_latest_changes()
            .returning(|_| Ok(BTreeMap::new()));
        let oracle = oracle_with(history);

        let status = oracle
            .file_status("src/content/i18n/en.yml")
            .expect("history should be readable")
            .expect("path should be tracked");

        assert!(status.is_source("src/content/i18n/en.yml"));
        assert!(status.source.latest_tracked_change.is_none());
        assert!(
            status
                .localizations
                .iter()
                .any(|entry| entry.path == "src/content/i18n/zh-TW.yml")
        );
    }

    #[rstest]
    fn excluded_sources_are_not_tracked() {
        let mut config = TrackingConfig::builtin();
        if let Some(entry) = config.files.last_mut() {
            entry.exclude = vec!["src/content/docs/en/reference/**".to_owned()];
        }
        let oracle = StatusOracle::new(config, Arc::new(MockTrackingHistory::new()))
            .expect("configuration should compile");

        assert!(
            oracle
                .find_file_config("src/content/docs/en/reference/api.mdx")
                .is_none()
        );
        assert!(
            oracle
                .find_file_config("src/content/docs/fr/reference/api.mdx")
                .is_none()
        );
    }
}
