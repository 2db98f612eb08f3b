//! Path patterns linking a source file to its localizations.
//!
//! A pattern such as `src/content/docs/@lang/@path` names where the file for
//! each locale lives. `@lang` and `@tag` expand to locale values and `@path`
//! stands for the remainder shared by every locale's copy.

use super::config::Locale;

const LANG: &str = "@lang";
const TAG: &str = "@tag";
const PATH: &str = "@path";

/// A borrowed path pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathPattern<'a> {
    pattern: &'a str,
}

impl<'a> PathPattern<'a> {
    /// Wraps a pattern string.
    #[must_use]
    pub const fn new(pattern: &'a str) -> Self {
        Self { pattern }
    }

    /// Returns the `@path` remainder when `path` is this pattern's instance
    /// for `locale`.
    ///
    /// Patterns without `@path` match one file per locale and yield an empty
    /// remainder.
    #[must_use]
    pub fn extract(&self, path: &str, locale: &Locale) -> Option<String> {
        let expanded = expand_locale(self.pattern, locale);
        let Some((prefix, suffix)) = expanded.split_once(PATH) else {
            return (expanded == path).then(String::new);
        };

        let remainder = path.strip_prefix(prefix)?.strip_suffix(suffix)?;
        (!remainder.is_empty()).then(|| remainder.to_owned())
    }

    /// Builds the path of `locale`'s copy for the given remainder.
    #[must_use]
    pub fn render(&self, locale: &Locale, remainder: &str) -> String {
        expand_locale(self.pattern, locale).replace(PATH, remainder)
    }

    /// Maps a source path to the path of its localization for `target`.
    ///
    /// Returns `None` when `source_path` does not fit the pattern for
    /// `source`.
    #[must_use]
    pub fn localize(&self, source_path: &str, source: &Locale, target: &Locale) -> Option<String> {
        self.extract(source_path, source)
            .map(|remainder| self.render(target, &remainder))
    }

    /// Finds the locale `path` belongs to, with its `@path` remainder.
    #[must_use]
    pub fn match_path<'l, I>(&self, path: &str, locales: I) -> Option<(&'l Locale, String)>
    where
        I: IntoIterator<Item = &'l Locale>,
    {
        locales
            .into_iter()
            .find_map(|locale| self.extract(path, locale).map(|rest| (locale, rest)))
    }
}

fn expand_locale(pattern: &str, locale: &Locale) -> String {
    pattern.replace(LANG, &locale.lang).replace(TAG, locale.tag())
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::PathPattern;
    use crate::tracking::config::Locale;

    #[fixture]
    fn english() -> Locale {
        Locale::new("English", "en", "en")
    }

    #[fixture]
    fn portuguese() -> Locale {
        Locale::new("Português do Brasil", "pt-br", "pt-BR")
    }

    #[rstest]
    fn extracts_remainder_below_locale_directory(english: Locale) {
        let pattern = PathPattern::new("src/content/docs/@lang/@path");

        assert_eq!(
            pattern.extract("src/content/docs/en/guides/deploy.mdx", &english),
            Some("guides/deploy.mdx".to_owned())
        );
        assert_eq!(pattern.extract("src/content/docs/fr/index.mdx", &english), None);
        assert_eq!(pattern.extract("src/content/docs/en/", &english), None);
    }

    #[rstest]
    fn localizes_with_tag_placeholder(english: Locale, portuguese: Locale) {
        let pattern = PathPattern::new("src/content/i18n/@tag.yml");

        assert_eq!(
            pattern.localize("src/content/i18n/en.yml", &english, &portuguese),
            Some("src/content/i18n/pt-BR.yml".to_owned())
        );
        assert_eq!(
            pattern.localize("src/content/i18n/de.yml", &english, &portuguese),
            None
        );
    }

    #[rstest]
    fn localizes_with_lang_placeholder(english: Locale, portuguese: Locale) {
        let pattern = PathPattern::new("src/i18n/@lang/@path");

        assert_eq!(
            pattern.localize("src/i18n/en/nav.ts", &english, &portuguese),
            Some("src/i18n/pt-br/nav.ts".to_owned())
        );
    }

    #[rstest]
    fn match_path_finds_owning_locale(english: Locale, portuguese: Locale) {
        let pattern = PathPattern::new("src/content/docs/@lang/@path");
        let locales = [english, portuguese];

        let matched = pattern.match_path("src/content/docs/pt-br/index.mdx", &locales);

        let (locale, remainder) = matched.expect("path should match a locale");
        assert_eq!(locale.lang, "pt-br");
        assert_eq!(remainder, "index.mdx");
    }

    #[rstest]
    fn match_path_ignores_unknown_locales(english: Locale) {
        let pattern = PathPattern::new("src/content/docs/@lang/@path");

        let matched = pattern.match_path("src/content/docs/xx/index.mdx", [&english]);

        assert!(matched.is_none());
    }
}
