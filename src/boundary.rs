use std::fmt;

/// Non-fatal conditions met while deriving a version.
/// These are reported to the user; the run still emits its outputs.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Final version fails the strict semver grammar; the run is marked failed
    InvalidSemVer { version: String },
    /// Major/minor could not be extracted, so those outputs are empty
    VersionFieldsUnavailable { version: String },
    /// The history fetch was skipped because nothing was missing
    RepositoryAlreadyComplete { repo: String },
    /// A value was supplied from outside instead of read from the repository
    OverrideApplied { key: String, value: String },
}

impl BoundaryWarning {
    /// Whether this warning turns the run into a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, BoundaryWarning::InvalidSemVer { .. })
    }
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::InvalidSemVer { version } => write!(
                f,
                "git version should be a valid semantic version. current value: {}",
                version
            ),
            BoundaryWarning::VersionFieldsUnavailable { version } => write!(
                f,
                "Cannot extract major/minor from '{}'; MAJOR_VERSION and MINOR_VERSION are empty",
                version
            ),
            BoundaryWarning::RepositoryAlreadyComplete { repo } => {
                write!(f, "Repository at '{}' already has full history", repo)
            }
            BoundaryWarning::OverrideApplied { key, value } => {
                let shown = if key == "GIT_COMMIT" {
                    value.get(..7).unwrap_or(value)
                } else {
                    value.as_str()
                };
                write!(f, "Using {} override: {}", key, shown)
            }
        }
    }
}
