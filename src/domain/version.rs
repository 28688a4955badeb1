use crate::error::{GitStampError, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

const DIRTY_SUFFIX: &str = "-dirty";

/// Loose grammar used to pull out major/minor.
const MAYBE_SEMVER: &str = r"^v([0-9]+)\.([0-9]+)(\.[0-9]+)?([-].*)?([+].*)?$";

/// Strict grammar every emitted version must satisfy.
const VALID_SEMVER: &str =
    r"^v([0-9]+)\.([0-9]+)(\.[0-9]+)?(-[0-9A-Za-z.-]+)?(\+[0-9A-Za-z.-]+)?$";

fn maybe_semver() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(MAYBE_SEMVER).expect("loose semver pattern compiles"))
}

fn valid_semver() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(VALID_SEMVER).expect("strict semver pattern compiles"))
}

/// Whether the working tree has uncommitted or untracked changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeState {
    Clean,
    Dirty,
}

impl TreeState {
    pub fn from_dirty(dirty: bool) -> Self {
        if dirty {
            TreeState::Dirty
        } else {
            TreeState::Clean
        }
    }

    pub fn is_dirty(&self) -> bool {
        matches!(self, TreeState::Dirty)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TreeState::Clean => "clean",
            TreeState::Dirty => "dirty",
        }
    }
}

impl fmt::Display for TreeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TreeState {
    type Err = GitStampError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clean" => Ok(TreeState::Clean),
            "dirty" => Ok(TreeState::Dirty),
            other => Err(GitStampError::config(format!(
                "invalid tree state '{}': expected 'clean' or 'dirty'",
                other
            ))),
        }
    }
}

/// Append `-dirty` when the tree is unclean.
///
/// The suffix is applied at most once, so feeding an already suffixed
/// version back in leaves it unchanged.
pub fn apply_dirty_suffix(version: &str, state: TreeState) -> String {
    if state.is_dirty() && !version.ends_with(DIRTY_SUFFIX) {
        format!("{}{}", version, DIRTY_SUFFIX)
    } else {
        version.to_string()
    }
}

/// Major and minor components extracted from a version string.
///
/// Both are kept as strings so arbitrarily large numbers survive untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MajorMinor {
    pub major: String,
    /// Carries a trailing `+` when the version is not an exact tag.
    pub minor: String,
}

impl MajorMinor {
    /// Match `version` against the loose grammar.
    ///
    /// Returns `None` when the version does not look like `vX.Y...` at all.
    pub fn extract(version: &str) -> Option<Self> {
        let caps = maybe_semver().captures(version)?;

        let major = caps.get(1)?.as_str().to_string();
        let mut minor = caps.get(2)?.as_str().to_string();

        let has_trailer = [4, 5]
            .iter()
            .any(|&i| caps.get(i).is_some_and(|m| !m.as_str().is_empty()));
        if has_trailer {
            minor.push('+');
        }

        Some(MajorMinor { major, minor })
    }

    /// Whether the version sits past its nearest tag (or is otherwise decorated)
    pub fn is_ahead_of_tag(&self) -> bool {
        self.minor.ends_with('+')
    }
}

/// Check `version` against the strict semver grammar
pub fn is_valid_semver(version: &str) -> bool {
    valid_semver().is_match(version)
}

/// Like [`is_valid_semver`] but reports the offending value
pub fn validate_version(version: &str) -> Result<()> {
    if is_valid_semver(version) {
        Ok(())
    } else {
        Err(GitStampError::invalid_version(version))
    }
}

/// A normalized, dirty-suffixed version ready for extraction and validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemVerVersion(String);

impl SemVerVersion {
    pub fn new(normalized: &str, state: TreeState) -> Self {
        SemVerVersion(apply_dirty_suffix(normalized, state))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn major_minor(&self) -> Option<MajorMinor> {
        MajorMinor::extract(&self.0)
    }

    pub fn validate(&self) -> Result<()> {
        validate_version(&self.0)
    }
}

impl fmt::Display for SemVerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_state_parse() {
        assert_eq!("clean".parse::<TreeState>().unwrap(), TreeState::Clean);
        assert_eq!("DIRTY".parse::<TreeState>().unwrap(), TreeState::Dirty);
        assert!("maybe".parse::<TreeState>().is_err());
    }

    #[test]
    fn test_tree_state_display() {
        assert_eq!(TreeState::Clean.to_string(), "clean");
        assert_eq!(TreeState::from_dirty(true).to_string(), "dirty");
    }

    #[test]
    fn test_dirty_suffix_applied_when_dirty() {
        assert_eq!(
            apply_dirty_suffix("v1.0.0-13+34467b0668f7c9", TreeState::Dirty),
            "v1.0.0-13+34467b0668f7c9-dirty"
        );
        assert_eq!(apply_dirty_suffix("v1.0.0", TreeState::Clean), "v1.0.0");
    }

    #[test]
    fn test_dirty_suffix_applied_once() {
        let once = apply_dirty_suffix("v2.0.0", TreeState::Dirty);
        let twice = apply_dirty_suffix(&once, TreeState::Dirty);
        assert_eq!(twice, "v2.0.0-dirty");
    }

    #[test]
    fn test_extract_exact_tag() {
        let mm = MajorMinor::extract("v2.0.0").unwrap();
        assert_eq!(mm.major, "2");
        assert_eq!(mm.minor, "0");
        assert!(!mm.is_ahead_of_tag());
    }

    #[test]
    fn test_extract_marks_non_exact() {
        let mm = MajorMinor::extract("v2.0.0-5+abcdef01234567-dirty").unwrap();
        assert_eq!(mm.major, "2");
        assert_eq!(mm.minor, "0+");

        let build_only = MajorMinor::extract("v3.4.5+abc").unwrap();
        assert_eq!(build_only.minor, "4+");
    }

    #[test]
    fn test_extract_keeps_large_numbers() {
        let mm =
            MajorMinor::extract("v123456789012345678901234567890.98765432109876543210").unwrap();
        assert_eq!(mm.major, "123456789012345678901234567890");
        assert_eq!(mm.minor, "98765432109876543210");
    }

    #[test]
    fn test_extract_no_match() {
        assert_eq!(MajorMinor::extract("release-1.0"), None);
        assert_eq!(MajorMinor::extract("v1"), None);
        // Non-ASCII digits are not version digits.
        assert_eq!(MajorMinor::extract("v١.٢.٣"), None);
    }

    #[test]
    fn test_strict_validation() {
        assert!(is_valid_semver("v2.0.0"));
        assert!(is_valid_semver("v1.2"));
        assert!(is_valid_semver("v1.1.0-alpha.0+84c76d1142ea4d"));
        assert!(is_valid_semver("v1.0.0-13+34467b0668f7c9-dirty"));

        assert!(!is_valid_semver("1.0.0"));
        assert!(!is_valid_semver("v1.0.0-"));
        assert!(!is_valid_semver("v1.0.0+a+b"));
        assert!(!is_valid_semver("v1.0.0-beta_1"));
    }

    #[test]
    fn test_validate_version_reports_value() {
        let err = validate_version("v1.0.0+a+b").unwrap_err();
        assert!(err.to_string().contains("v1.0.0+a+b"));
    }

    #[test]
    fn test_valid_versions_reparse_with_fields() {
        for v in [
            "v2.0.0",
            "v0.1",
            "v1.1.0-alpha.0+84c76d1142ea4d",
            "v2.0.0-5+abcdef01234567-dirty",
        ] {
            assert!(is_valid_semver(v));
            let mm = MajorMinor::extract(v).unwrap();
            assert!(!mm.major.is_empty());
            assert!(!mm.minor.is_empty());
        }
    }

    #[test]
    fn test_semver_version_wrapper() {
        let v = SemVerVersion::new("v2.0.0-5+abcdef01234567", TreeState::Dirty);
        assert_eq!(v.as_str(), "v2.0.0-5+abcdef01234567-dirty");
        assert!(v.validate().is_ok());
        assert_eq!(v.major_minor().unwrap().minor, "0+");
    }
}
