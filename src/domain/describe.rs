use crate::error::{GitStampError, Result};

/// Raw `git describe` output split on `-`.
///
/// Only three shapes are accepted:
/// - `v2.0.0` (exact tag)
/// - `v1.0.0-13-g34467b0668f7c9` (tag, distance, hash)
/// - `v1.1.0-alpha-0-g84c76d1142ea4d` (pre-release tag, distance, hash)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescribeSegments<'a> {
    Exact {
        tag: &'a str,
    },
    Distance {
        tag: &'a str,
        distance: &'a str,
        hash: &'a str,
    },
    PreRelease {
        tag: &'a str,
        subversion: &'a str,
        distance: &'a str,
        hash: &'a str,
    },
}

impl<'a> DescribeSegments<'a> {
    /// Split a describe string into its segments
    pub fn parse(raw: &'a str) -> Result<Self> {
        if raw.is_empty() {
            return Err(GitStampError::describe(
                "empty describe output (no matching tag reachable)",
            ));
        }

        let parts: Vec<&str> = raw.split('-').collect();
        match parts[..] {
            [tag] => Ok(DescribeSegments::Exact { tag }),
            [tag, distance, hash] => Ok(DescribeSegments::Distance {
                tag,
                distance,
                hash,
            }),
            [tag, subversion, distance, hash] => Ok(DescribeSegments::PreRelease {
                tag,
                subversion,
                distance,
                hash,
            }),
            _ => Err(GitStampError::describe(format!(
                "'{}' has {} dash-separated segments, expected 1, 3 or 4",
                raw,
                parts.len()
            ))),
        }
    }

    /// Rewrite the segments using semver `.`/`+` separators
    pub fn to_semver(&self) -> String {
        match self {
            DescribeSegments::Exact { tag } => tag.to_string(),
            // The distance stays dash-joined to the tag; only the hash moves into build metadata.
            DescribeSegments::Distance {
                tag,
                distance,
                hash,
            } => format!("{}-{}+{}", tag, distance, strip_hash_prefix(hash)),
            DescribeSegments::PreRelease {
                tag,
                subversion,
                distance,
                hash,
            } => format!(
                "{}-{}.{}+{}",
                tag,
                subversion,
                distance,
                strip_hash_prefix(hash)
            ),
        }
    }
}

/// `git describe` prefixes the abbreviated object name with `g`.
fn strip_hash_prefix(hash: &str) -> &str {
    hash.strip_prefix('g').unwrap_or(hash)
}

/// Translate `git describe` output into a semver-shaped version string.
///
/// # Example
/// ```
/// use git_stamp::domain::normalize_describe;
///
/// assert_eq!(
///     normalize_describe("v1.1.0-alpha-0-g84c76d1142ea4d").unwrap(),
///     "v1.1.0-alpha.0+84c76d1142ea4d"
/// );
/// ```
pub fn normalize_describe(raw: &str) -> Result<String> {
    DescribeSegments::parse(raw).map(|segments| segments.to_semver())
}
