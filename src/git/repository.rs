use crate::config::{DescribeConfig, FetchConfig};
use crate::domain::TreeState;
use crate::error::{GitStampError, Result};
use crate::git::{GitCli, RepositoryReader, UnshallowOutcome};
use git2::{DescribeFormatOptions, DescribeOptions, Repository as Git2Repo, StatusOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
    root: PathBuf,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path.as_ref())?;
        let root = repo
            .workdir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| path.as_ref().to_path_buf());

        Ok(Git2Repository { repo, root })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Result<Self> {
        let root = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| GitStampError::config("bare repositories have no working tree"))?;

        Ok(Git2Repository { repo, root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl RepositoryReader for Git2Repository {
    fn unshallow(&self, fetch: &FetchConfig) -> Result<UnshallowOutcome> {
        if !self.repo.is_shallow() {
            debug!(repo = %self.root.display(), "repository already complete");
            return Ok(UnshallowOutcome::AlreadyComplete);
        }

        // libgit2 cannot deepen a shallow clone, so hand this one to git itself.
        GitCli::new(&self.root).unshallow(fetch)
    }

    fn commit_id(&self) -> Result<String> {
        let commit = self.repo.revparse_single("HEAD^{commit}")?;
        Ok(commit.id().to_string())
    }

    fn tree_state(&self) -> Result<TreeState> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        Ok(TreeState::from_dirty(!statuses.is_empty()))
    }

    fn describe(&self, commit: &str, describe: &DescribeConfig) -> Result<String> {
        let commit = self.repo.revparse_single(commit)?.peel_to_commit()?;

        let mut opts = DescribeOptions::new();
        opts.describe_tags().pattern(&describe.match_pattern);

        let described = commit.as_object().describe(&opts);
        match described {
            Ok(found) => {
                let mut format = DescribeFormatOptions::new();
                format.abbreviated_size(describe.abbrev);
                Ok(found.format(Some(&format))?)
            }
            // No reachable tag; the engine rejects the empty string.
            Err(e) if e.class() == git2::ErrorClass::Describe => {
                debug!(error = %e.message(), "no matching tag reachable");
                Ok(String::new())
            }
            Err(e) => Err(e.into()),
        }
    }
}
