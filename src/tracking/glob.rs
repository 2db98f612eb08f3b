//! Glob matching for tracked file selection.
//!
//! The `glob` crate has no alternation, so `(md|mdx)` and `{md,mdx}` groups
//! are expanded into one pattern per alternative before compiling.

use glob::{MatchOptions, Pattern};

use super::error::TrackingError;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled list of globs matching when any member matches.
#[derive(Debug, Clone, Default)]
pub struct GlobSet {
    patterns: Vec<Pattern>,
}

impl GlobSet {
    /// Compiles every glob, expanding alternation groups.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::InvalidGlob`] for the first expansion that does
    /// not compile.
    pub fn compile(globs: &[String]) -> Result<Self, TrackingError> {
        let mut patterns = Vec::new();
        for glob in globs {
            for expanded in expand_alternatives(glob) {
                let pattern =
                    Pattern::new(&expanded).map_err(|error| TrackingError::InvalidGlob {
                        glob: expanded.clone(),
                        message: error.msg.to_owned(),
                    })?;
                patterns.push(pattern);
            }
        }
        Ok(Self { patterns })
    }

    /// Returns true when any glob matches `path`.
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| pattern.matches_with(path, MATCH_OPTIONS))
    }
}

/// Expands the first alternation group and recurses into each result.
///
/// Unbalanced groups are left untouched and reach the glob compiler as
/// literals.
#[must_use]
pub fn expand_alternatives(glob: &str) -> Vec<String> {
    let Some((open, close, separator)) = find_group(glob) else {
        return vec![glob.to_owned()];
    };

    let (Some(prefix), Some(body), Some(suffix)) = (
        glob.get(..open),
        glob.get(open + 1..close),
        glob.get(close + 1..),
    ) else {
        return vec![glob.to_owned()];
    };

    body.split(separator)
        .flat_map(|alternative| expand_alternatives(&format!("{prefix}{alternative}{suffix}")))
        .collect()
}

/// Locates the first `(...|...)` or `{...,...}` group holding a separator.
fn find_group(glob: &str) -> Option<(usize, usize, char)> {
    let mut in_class = false;
    for (open, character) in glob.char_indices() {
        match character {
            '[' => in_class = true,
            ']' => in_class = false,
            '(' | '{' if !in_class => {
                let (closing, separator) = if character == '(' {
                    (')', '|')
                } else {
                    ('}', ',')
                };
                let rest = glob.get(open + 1..)?;
                let Some(length) = rest.find(closing) else {
                    continue;
                };
                let body = rest.get(..length)?;
                if body.contains(separator) {
                    return Some((open, open + 1 + length, separator));
                }
            }
            _ => {}
        }
    }
    None
}
