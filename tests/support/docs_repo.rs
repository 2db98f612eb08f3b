//! Temporary git repositories laid out like the Astro docs.

use camino::Utf8Path;
use cap_std::fs_utf8 as fs;
use git2::{ErrorCode, Oid, Repository, Signature, Time};
use tempfile::TempDir;

pub type TestError = Box<dyn std::error::Error>;

/// Unix time the fixture pull requests are opened at.
pub const PR_CREATED_AT: i64 = 1_700_000_000;

/// `created_at` value for [`PR_CREATED_AT`].
pub const PR_CREATED_AT_RFC3339: &str = "2023-11-14T22:13:20Z";

/// A repository kept alive with its directory.
pub struct DocsRepo {
    pub dir: TempDir,
    pub repo: Repository,
}

impl DocsRepo {
    /// Creates an empty repository.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory or repository cannot be created.
    pub fn init() -> Result<Self, TestError> {
        let dir = TempDir::new()?;
        let repo = Repository::init(dir.path())?;
        Ok(Self { dir, repo })
    }

    /// Commits `files` on top of `HEAD` at `offset` seconds from
    /// [`PR_CREATED_AT`].
    ///
    /// # Errors
    ///
    /// Returns an error when a file or the commit cannot be written.
    pub fn commit(
        &self,
        offset: i64,
        message: &str,
        files: &[(&str, &str)],
    ) -> Result<Oid, TestError> {
        let sig = Signature::new(
            "Docs Bot",
            "docs@example.com",
            &Time::new(PR_CREATED_AT + offset, 0),
        )?;
        let workdir = self
            .repo
            .workdir()
            .and_then(|path| path.to_str())
            .ok_or("repository has no UTF-8 working directory")?;
        let dir = fs::Dir::open_ambient_dir(workdir, cap_std::ambient_authority())?;

        let mut index = self.repo.index()?;
        for (path, content) in files {
            let utf8_path = Utf8Path::new(path);
            if let Some(parent) = utf8_path.parent()
                && !parent.as_str().is_empty()
            {
                dir.create_dir_all(parent)?;
            }
            dir.write(utf8_path, content)?;
            index.add_path(utf8_path.as_std_path())?;
        }
        index.write()?;
        let tree = self.repo.find_tree(index.write_tree()?)?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(error) if error.code() == ErrorCode::UnbornBranch => None,
            Err(error) => return Err(error.into()),
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        Ok(self
            .repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?)
    }
}
