use thiserror::Error;

/// Unified error type for git-stamp operations
#[derive(Error, Debug)]
pub enum GitStampError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error(
        "command \"{command}\" failed with exit code {status}: {stderr}{}",
        stdout_suffix(.stdout)
    )]
    Command {
        command: String,
        status: i32,
        stdout: String,
        stderr: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed describe output: {0}")]
    Describe(String),

    #[error("git version should be a valid semantic version. current value: {0}")]
    InvalidVersion(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn stdout_suffix(stdout: &str) -> String {
    if stdout.is_empty() {
        String::new()
    } else {
        format!(" (stdout: {})", stdout)
    }
}

/// Convenience type alias for Results in git-stamp
pub type Result<T> = std::result::Result<T, GitStampError>;

impl GitStampError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitStampError::Config(msg.into())
    }

    /// Create a describe error with context
    pub fn describe(msg: impl Into<String>) -> Self {
        GitStampError::Describe(msg.into())
    }

    /// Create an invalid version error for the offending version string
    pub fn invalid_version(version: impl Into<String>) -> Self {
        GitStampError::InvalidVersion(version.into())
    }

    /// Create an output sink error with context
    pub fn output(msg: impl Into<String>) -> Self {
        GitStampError::Output(msg.into())
    }
}
