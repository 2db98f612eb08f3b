//! Git2-based implementation of `TrackingHistory`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use git2::{Commit, DiffOptions, ErrorCode, Repository, Sort, Tree};

use super::{CommitDirectives, TrackedChange, TrackingHistory, find_ignored_keyword};
use crate::tracking::error::TrackingError;

/// Reads tracked changes from a local clone.
///
/// `git2::Repository` is not `Sync`, so it sits behind a `Mutex`.
pub struct Git2History {
    repo: Mutex<Repository>,
    root_dir: String,
    ignored_keywords: Vec<String>,
}

impl std::fmt::Debug for Git2History {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git2History")
            .field("repo", &"<git2::Repository>")
            .field("root_dir", &self.root_dir)
            .field("ignored_keywords", &self.ignored_keywords)
            .finish()
    }
}

impl Git2History {
    /// Discovers the repository containing `start_path`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::History`] when no repository is found.
    pub fn discover(
        start_path: &Path,
        root_dir: &str,
        ignored_keywords: &[String],
    ) -> Result<Self, TrackingError> {
        let repo = Repository::discover(start_path)?;
        Ok(Self::from_repository(repo, root_dir, ignored_keywords))
    }

    /// Wraps an open repository.
    ///
    /// `root_dir` is the directory tracked paths are relative to; `.` means
    /// the repository root.
    #[must_use]
    pub fn from_repository(repo: Repository, root_dir: &str, ignored_keywords: &[String]) -> Self {
        let trimmed = root_dir.trim_end_matches('/');
        let relative_root = if trimmed == "." { "" } else { trimmed };
        Self {
            repo: Mutex::new(repo),
            root_dir: relative_root.to_owned(),
            ignored_keywords: ignored_keywords.to_vec(),
        }
    }

    fn repository_path(&self, path: &str) -> String {
        if self.root_dir.is_empty() {
            path.to_owned()
        } else {
            format!("{}/{path}", self.root_dir)
        }
    }

    fn tracked_path<'p>(&self, repository_path: &'p str) -> Option<&'p str> {
        if self.root_dir.is_empty() {
            return Some(repository_path);
        }
        repository_path
            .strip_prefix(self.root_dir.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
    }

    fn ignored(&self, commit: &Commit<'_>) -> bool {
        let message = commit.message().unwrap_or_default();
        let Some(keyword) = find_ignored_keyword(message, &self.ignored_keywords) else {
            return false;
        };
        tracing::trace!("commit {} ignored by keyword `{keyword}`", commit.id());
        true
    }
}

/// Repository paths `commit` changed among `pathspecs`.
///
/// A merge only counts for a path that differs from every parent's copy, so
/// changes it brings in from one side are left to the commits that made them.
fn touched_paths(
    repo: &Repository,
    commit: &Commit<'_>,
    pathspecs: &BTreeSet<String>,
) -> Result<BTreeSet<String>, git2::Error> {
    let tree = commit.tree()?;
    if commit.parent_count() == 0 {
        return changed_paths(repo, None, &tree, pathspecs);
    }

    let mut touched: Option<BTreeSet<String>> = None;
    for parent in commit.parents() {
        let changed = changed_paths(repo, Some(&parent.tree()?), &tree, pathspecs)?;
        let remaining = match touched {
            Some(seen) => seen.intersection(&changed).cloned().collect(),
            None => changed,
        };
        if remaining.is_empty() {
            return Ok(remaining);
        }
        touched = Some(remaining);
    }
    Ok(touched.unwrap_or_default())
}

fn changed_paths(
    repo: &Repository,
    old_tree: Option<&Tree<'_>>,
    new_tree: &Tree<'_>,
    pathspecs: &BTreeSet<String>,
) -> Result<BTreeSet<String>, git2::Error> {
    let mut options = DiffOptions::new();
    options.disable_pathspec_match(true);
    for pathspec in pathspecs {
        options.pathspec(pathspec);
    }
    let diff = repo.diff_tree_to_tree(old_tree, Some(new_tree), Some(&mut options))?;

    let mut changed = BTreeSet::new();
    for delta in diff.deltas() {
        for file in [delta.old_file(), delta.new_file()] {
            if let Some(path) = file.path().and_then(|path| path.to_str())
                && pathspecs.contains(path)
            {
                changed.insert(path.to_owned());
            }
        }
    }
    Ok(changed)
}

fn tracked_change(commit: &Commit<'_>) -> Result<TrackedChange, TrackingError> {
    let author = commit.author();
    let date = Utc
        .timestamp_opt(author.when().seconds(), 0)
        .single()
        .ok_or_else(|| TrackingError::History {
            message: format!("commit {} has an out-of-range date", commit.id()),
        })?;
    Ok(TrackedChange {
        sha: commit.id().to_string(),
        date,
        message: commit.message().unwrap_or_default().to_owned(),
    })
}

impl TrackingHistory for Git2History {
    fn latest_changes(
        &self,
        paths: &[String],
    ) -> Result<BTreeMap<String, TrackedChange>, TrackingError> {
        let mut changes = BTreeMap::new();
        let mut pending: BTreeSet<String> = paths
            .iter()
            .map(|path| self.repository_path(path))
            .collect();
        if pending.is_empty() {
            return Ok(changes);
        }

        let repo = self.repo.lock().map_err(|_| TrackingError::History {
            message: "git repository lock poisoned".to_owned(),
        })?;
        let mut revwalk = repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        match revwalk.push_head() {
            Ok(()) => {}
            Err(error) if matches!(error.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                return Ok(changes);
            }
            Err(error) => return Err(error.into()),
        }

        for oid in revwalk {
            let commit = repo.find_commit(oid?)?;
            let touched = touched_paths(&repo, &commit, &pending)?;
            if touched.is_empty() || self.ignored(&commit) {
                continue;
            }

            let directives = CommitDirectives::parse(commit.message().unwrap_or_default());
            for repository_path in touched {
                let Some(path) = self.tracked_path(&repository_path) else {
                    continue;
                };
                if !directives.counts(path) {
                    continue;
                }
                changes.insert(path.to_owned(), tracked_change(&commit)?);
                pending.remove(&repository_path);
            }
            if pending.is_empty() {
                break;
            }
        }

        tracing::debug!(
            "found tracked changes for {} of {} paths",
            changes.len(),
            paths.len()
        );
        Ok(changes)
    }
}
