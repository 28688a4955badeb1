use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::TreeState;
use crate::error::{GitStampError, Result};

const LOCAL_CONFIG: &str = "./gitstamp.toml";
const USER_CONFIG: &str = ".gitstamp.toml";

/// Represents the complete configuration for git-stamp.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub describe: DescribeConfig,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

fn default_match_pattern() -> String {
    "v*".to_string()
}

fn default_abbrev() -> u32 {
    14
}

fn default_true() -> bool {
    true
}

/// How the nearest tag is looked up.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DescribeConfig {
    /// Glob the tag must match
    #[serde(default = "default_match_pattern")]
    pub match_pattern: String,

    /// Length of the abbreviated object name
    #[serde(default = "default_abbrev")]
    pub abbrev: u32,
}

impl Default for DescribeConfig {
    fn default() -> Self {
        DescribeConfig {
            match_pattern: default_match_pattern(),
            abbrev: default_abbrev(),
        }
    }
}

/// Controls the history fetch that runs before the repository is read.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FetchConfig {
    #[serde(default = "default_true")]
    pub unshallow: bool,

    #[serde(default = "default_true")]
    pub prune: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            unshallow: true,
            prune: true,
        }
    }
}

/// Where the derived outputs are written.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `KEY=value` lines appended to `$GITHUB_OUTPUT`
    #[default]
    Github,
    /// `KEY=value` lines on stdout
    Env,
    /// A JSON object on stdout
    Json,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitstamp.toml` in current directory
/// 3. `.gitstamp.toml` in user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path).map_err(|e| {
            GitStampError::config(format!("cannot read config '{}': {}", path, e))
        })?
    } else if Path::new(LOCAL_CONFIG).exists() {
        fs::read_to_string(LOCAL_CONFIG)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(USER_CONFIG);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}

/// Pick the repository root: explicit override, then the CI workspace, then
/// the current directory. Empty values count as unset.
pub fn resolve_repo_path(
    explicit: Option<&str>,
    workspace: Option<&str>,
    cwd: Option<&Path>,
) -> Result<PathBuf> {
    first_non_empty(explicit, workspace)
        .map(PathBuf::from)
        .or_else(|| cwd.map(Path::to_path_buf))
        .ok_or_else(|| GitStampError::config("missing repo root: set the `repo` input variable."))
}

fn first_non_empty(flag: Option<&str>, env: Option<&str>) -> Option<String> {
    [flag, env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Values that bypass the repository reader when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub commit: Option<String>,
    pub tree_state: Option<TreeState>,
}

impl Overrides {
    /// Build overrides from flag values, falling back to environment values.
    ///
    /// Flags win over the environment; empty strings are ignored.
    pub fn resolve(
        commit_flag: Option<&str>,
        commit_env: Option<&str>,
        tree_state_flag: Option<&str>,
        tree_state_env: Option<&str>,
    ) -> Result<Self> {
        let commit = first_non_empty(commit_flag, commit_env);
        let tree_state = first_non_empty(tree_state_flag, tree_state_env)
            .map(|s| s.parse::<TreeState>())
            .transpose()?;

        Ok(Overrides { commit, tree_state })
    }
}
