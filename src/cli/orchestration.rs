//! Main workflow orchestration logic
//!
//! Reads the repository state, runs it through the version engine and
//! collects the outputs together with any non-fatal warnings. Kept apart
//! from `main.rs` so the workflow can be driven without clap.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::boundary::BoundaryWarning;
use crate::config::{Config, Overrides};
use crate::domain::{normalize_describe, DerivedOutputs, SemVerVersion};
use crate::error::Result;
use crate::git::{RepositoryReader, RepositoryState, UnshallowOutcome};

/// Arguments for the stamp workflow
#[derive(Debug, Clone, PartialEq)]
pub struct StampWorkflowArgs {
    /// Repository root
    pub repo: PathBuf,

    /// Commit / tree state supplied from outside
    pub overrides: Overrides,

    /// Fetch the full history before describing
    pub unshallow: bool,
}

/// Result of a completed stamp workflow.
///
/// A result is produced even when the version is not valid semver; check
/// [WorkflowResult::failed] before trusting the outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub state: RepositoryState,
    pub outputs: DerivedOutputs,
    pub warnings: Vec<BoundaryWarning>,
}

impl WorkflowResult {
    pub fn failed(&self) -> bool {
        self.warnings.iter().any(BoundaryWarning::is_failure)
    }

    /// Message for the first warning that failed the run
    pub fn failure_message(&self) -> Option<String> {
        self.warnings
            .iter()
            .find(|w| w.is_failure())
            .map(ToString::to_string)
    }
}

/// Collect commit, tree state and describe output, honouring overrides.
pub fn read_repository_state<R: RepositoryReader + ?Sized>(
    reader: &R,
    overrides: &Overrides,
    config: &Config,
    warnings: &mut Vec<BoundaryWarning>,
) -> Result<RepositoryState> {
    let commit_id = match &overrides.commit {
        Some(commit) => {
            warnings.push(BoundaryWarning::OverrideApplied {
                key: "GIT_COMMIT".to_string(),
                value: commit.clone(),
            });
            commit.clone()
        }
        None => reader.commit_id()?,
    };

    // Untracked files count as dirty; git's own `describe --dirty` would miss them.
    let tree_state = match overrides.tree_state {
        Some(state) => {
            warnings.push(BoundaryWarning::OverrideApplied {
                key: "GIT_TREE_STATE".to_string(),
                value: state.to_string(),
            });
            state
        }
        None => reader.tree_state()?,
    };

    let raw_describe = reader.describe(&commit_id, &config.describe)?;
    debug!(%commit_id, %tree_state, %raw_describe, "repository state");

    Ok(RepositoryState {
        commit_id,
        tree_state,
        raw_describe,
    })
}

/// Turn a repository state into the output bundle.
///
/// Only a malformed describe string is an error here. A version failing the
/// strict grammar is pushed onto `warnings` and the outputs are still built.
pub fn derive_outputs(
    state: &RepositoryState,
    now: DateTime<Utc>,
    warnings: &mut Vec<BoundaryWarning>,
) -> Result<DerivedOutputs> {
    let normalized = normalize_describe(&state.raw_describe)?;
    let version = SemVerVersion::new(&normalized, state.tree_state);
    info!(%version, "derived version");

    if version.major_minor().is_none() {
        warnings.push(BoundaryWarning::VersionFieldsUnavailable {
            version: version.to_string(),
        });
    }
    if version.validate().is_err() {
        warnings.push(BoundaryWarning::InvalidSemVer {
            version: version.to_string(),
        });
    }

    Ok(DerivedOutputs::build(
        &state.commit_id,
        state.tree_state,
        &version,
        now,
    ))
}

/// Main stamp workflow
///
/// 1. Fetch the full history (optional)
/// 2. Read commit, tree state and describe output
/// 3. Normalize, suffix, extract and validate the version
/// 4. Build the output bundle
pub fn run_stamp_workflow<R: RepositoryReader + ?Sized>(
    reader: &R,
    args: &StampWorkflowArgs,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<WorkflowResult> {
    let mut warnings = Vec::new();

    if args.unshallow && config.fetch.unshallow {
        info!(repo = %args.repo.display(), "unshallow git repository");
        if reader.unshallow(&config.fetch)? == UnshallowOutcome::AlreadyComplete {
            warnings.push(BoundaryWarning::RepositoryAlreadyComplete {
                repo: args.repo.display().to_string(),
            });
        }
    }

    let state = read_repository_state(reader, &args.overrides, config, &mut warnings)?;
    let outputs = derive_outputs(&state, now, &mut warnings)?;

    Ok(WorkflowResult {
        state,
        outputs,
        warnings,
    })
}
