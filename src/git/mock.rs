use crate::config::{DescribeConfig, FetchConfig};
use crate::domain::TreeState;
use crate::error::{GitStampError, Result};
use crate::git::{RepositoryReader, UnshallowOutcome};
use std::cell::{Cell, RefCell};

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    commit: String,
    tree_state: TreeState,
    describe: String,
    unshallow: std::result::Result<UnshallowOutcome, String>,
    unshallow_calls: Cell<usize>,
    commit_calls: Cell<usize>,
    status_calls: Cell<usize>,
    last_describe_commit: RefCell<Option<String>>,
}

impl MockRepository {
    /// Create a clean repository sitting exactly on `describe`
    pub fn new(commit: impl Into<String>, describe: impl Into<String>) -> Self {
        MockRepository {
            commit: commit.into(),
            tree_state: TreeState::Clean,
            describe: describe.into(),
            unshallow: Ok(UnshallowOutcome::AlreadyComplete),
            unshallow_calls: Cell::new(0),
            commit_calls: Cell::new(0),
            status_calls: Cell::new(0),
            last_describe_commit: RefCell::new(None),
        }
    }

    pub fn with_tree_state(mut self, state: TreeState) -> Self {
        self.tree_state = state;
        self
    }

    /// Make the unshallow step fail with `stderr`
    pub fn with_unshallow_failure(mut self, stderr: impl Into<String>) -> Self {
        self.unshallow = Err(stderr.into());
        self
    }

    pub fn unshallow_calls(&self) -> usize {
        self.unshallow_calls.get()
    }

    pub fn commit_calls(&self) -> usize {
        self.commit_calls.get()
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.get()
    }

    /// The commit most recently passed to `describe`
    pub fn last_describe_commit(&self) -> Option<String> {
        self.last_describe_commit.borrow().clone()
    }
}

impl RepositoryReader for MockRepository {
    fn unshallow(&self, _fetch: &FetchConfig) -> Result<UnshallowOutcome> {
        self.unshallow_calls.set(self.unshallow_calls.get() + 1);
        self.unshallow.clone().map_err(|stderr| GitStampError::Command {
            command: "git fetch --prune --unshallow".to_string(),
            status: 128,
            stdout: String::new(),
            stderr,
        })
    }

    fn commit_id(&self) -> Result<String> {
        self.commit_calls.set(self.commit_calls.get() + 1);
        Ok(self.commit.clone())
    }

    fn tree_state(&self) -> Result<TreeState> {
        self.status_calls.set(self.status_calls.get() + 1);
        Ok(self.tree_state)
    }

    fn describe(&self, commit: &str, _describe: &DescribeConfig) -> Result<String> {
        *self.last_describe_commit.borrow_mut() = Some(commit.to_string());
        Ok(self.describe.clone())
    }
}
