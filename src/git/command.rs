use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::config::{DescribeConfig, FetchConfig};
use crate::domain::TreeState;
use crate::error::{GitStampError, Result};
use crate::git::{RepositoryReader, UnshallowOutcome};

/// stderr fragment git prints when `--unshallow` is run on a full clone
pub const ALREADY_COMPLETE: &str = "on a complete repository does not make sense";

/// Captured result of a git invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub command: String,
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }

    pub fn into_error(self) -> GitStampError {
        GitStampError::Command {
            command: self.command,
            status: self.status,
            stdout: self.stdout.trim().to_string(),
            stderr: self.stderr.trim().to_string(),
        }
    }
}

/// Reads repository state by running the `git` binary
#[derive(Debug, Clone)]
pub struct GitCli {
    repo: PathBuf,
    program: OsString,
}

impl GitCli {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        GitCli {
            repo: repo.into(),
            program: OsString::from("git"),
        }
    }

    /// Use a different git executable
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    pub fn repo(&self) -> &Path {
        &self.repo
    }

    fn full_args(&self, args: &[&str]) -> Vec<OsString> {
        let mut full: Vec<OsString> = vec![
            "--git-dir".into(),
            self.repo.join(".git").into_os_string(),
            "--work-tree".into(),
            self.repo.clone().into_os_string(),
        ];
        full.extend(args.iter().map(OsString::from));
        full
    }

    /// Run git and capture its output without judging the exit code
    pub fn run_unchecked(&self, args: &[&str]) -> Result<CommandOutput> {
        let full = self.full_args(args);
        let command = std::iter::once(self.program.to_string_lossy().into_owned())
            .chain(full.iter().map(|a| a.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ");

        debug!(%command, "running git");
        let output = Command::new(&self.program)
            .args(&full)
            .current_dir(&self.repo)
            .output()
            .map_err(|e| GitStampError::Command {
                command: command.clone(),
                status: -1,
                stdout: String::new(),
                stderr: e.to_string(),
            })?;

        Ok(CommandOutput {
            command,
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Run git, turning a non-zero exit into a [GitStampError::Command]
    pub fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = self.run_unchecked(args)?;
        if output.success() {
            Ok(output)
        } else {
            Err(output.into_error())
        }
    }
}

/// Decide whether a finished `fetch --unshallow` counts as success
pub fn unshallow_outcome(output: CommandOutput) -> Result<UnshallowOutcome> {
    if output.success() {
        Ok(UnshallowOutcome::Fetched)
    } else if output.stderr.contains(ALREADY_COMPLETE) {
        debug!(stderr = %output.stderr.trim(), "repository already complete");
        Ok(UnshallowOutcome::AlreadyComplete)
    } else {
        Err(output.into_error())
    }
}

impl RepositoryReader for GitCli {
    fn unshallow(&self, fetch: &FetchConfig) -> Result<UnshallowOutcome> {
        let mut args = vec!["fetch"];
        if fetch.prune {
            args.push("--prune");
        }
        args.push("--unshallow");

        unshallow_outcome(self.run_unchecked(&args)?)
    }

    fn commit_id(&self) -> Result<String> {
        let output = self.run(&["rev-parse", "HEAD^{commit}"])?;
        Ok(output.stdout.trim().to_string())
    }

    fn tree_state(&self) -> Result<TreeState> {
        let output = self.run(&["status", "--porcelain"])?;
        Ok(TreeState::from_dirty(!output.stdout.trim().is_empty()))
    }

    fn describe(&self, commit: &str, describe: &DescribeConfig) -> Result<String> {
        let match_arg = format!("--match={}", describe.match_pattern);
        let abbrev_arg = format!("--abbrev={}", describe.abbrev);
        let output = self.run(&["describe", "--tags", &match_arg, &abbrev_arg, commit])?;
        Ok(output.stdout.trim().to_string())
    }
}
