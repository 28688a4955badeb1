//! Repository state reading
//!
//! This module provides a trait-based abstraction over the three facts the
//! version engine needs from a checkout: the resolved commit, whether the
//! working tree is dirty, and the raw `git describe` output.
//!
//! # Overview
//!
//! The implementations are:
//!
//! - [command::GitCli]: runs the `git` binary as a subprocess
//! - [repository::Git2Repository]: reads the repository through the `git2` crate
//! - [mock::MockRepository]: canned answers for testing
//!
//! ```rust,no_run
//! # use git_stamp::config::DescribeConfig;
//! # use git_stamp::git::{GitCli, RepositoryReader};
//! # fn example() -> git_stamp::Result<()> {
//! let reader = GitCli::new("/path/to/checkout");
//! let commit = reader.commit_id()?;
//! let describe = reader.describe(&commit, &DescribeConfig::default())?;
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod mock;
pub mod repository;

pub use command::{CommandOutput, GitCli};
pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::config::{DescribeConfig, FetchConfig};
use crate::domain::TreeState;
use crate::error::Result;

/// The raw facts read from a checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryState {
    /// Full commit hash
    pub commit_id: String,
    pub tree_state: TreeState,
    /// Empty when no matching tag is reachable
    pub raw_describe: String,
}

/// What happened when the history was unshallowed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnshallowOutcome {
    /// Missing history was fetched
    Fetched,
    /// The repository already had its full history
    AlreadyComplete,
}

/// Read access to the state of a checkout.
///
/// Implementations map their underlying failures onto
/// [crate::error::GitStampError]; every error returned here is fatal to the run.
pub trait RepositoryReader: Send {
    /// Fetch the full history so `describe` can see every tag.
    ///
    /// An already complete repository is not an error.
    fn unshallow(&self, fetch: &FetchConfig) -> Result<UnshallowOutcome>;

    /// Resolve `HEAD` to a full commit hash
    fn commit_id(&self) -> Result<String>;

    /// Report whether the tree has changes, untracked files included
    fn tree_state(&self) -> Result<TreeState>;

    /// Describe `commit` relative to the nearest tag matching the configured pattern
    fn describe(&self, commit: &str, describe: &DescribeConfig) -> Result<String>;
}
