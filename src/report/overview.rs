//! Pull request title screening for ignored keywords.

/// Whether merging the pull request triggers status changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusOverview {
    /// The changes are tracked.
    Tracked,
    /// The title contains an ignored keyword.
    Untracked {
        /// The keyword as it appears in the title.
        keyword: String,
    },
}

impl StatusOverview {
    /// Screens a pull request title, ignoring case.
    ///
    /// The leftmost keyword occurrence wins, with earlier configured keywords
    /// preferred at the same position. The keyword is reported as written in
    /// the title.
    #[must_use]
    pub fn from_title(title: &str, ignored_keywords: &[String]) -> Self {
        leftmost_keyword(title, ignored_keywords).map_or(Self::Tracked, |keyword| {
            Self::Untracked {
                keyword: keyword.to_owned(),
            }
        })
    }

    /// True when an ignored keyword was found.
    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        matches!(self, Self::Untracked { .. })
    }

    /// The matched title text, if any.
    #[must_use]
    pub fn keyword(&self) -> Option<&str> {
        match self {
            Self::Tracked => None,
            Self::Untracked { keyword } => Some(keyword),
        }
    }
}

fn leftmost_keyword<'t>(title: &'t str, keywords: &[String]) -> Option<&'t str> {
    let keywords: Vec<(String, usize)> = keywords
        .iter()
        .filter(|keyword| !keyword.is_empty())
        .map(|keyword| (keyword.to_lowercase(), keyword.chars().count()))
        .collect();

    title.char_indices().find_map(|(start, _)| {
        let rest = title.get(start..)?;
        keywords.iter().find_map(|(keyword, chars)| {
            let end = rest
                .char_indices()
                .nth(*chars)
                .map_or(rest.len(), |(index, _)| index);
            let candidate = rest.get(..end)?;
            (candidate.to_lowercase() == *keyword).then_some(candidate)
        })
    })
}
