//! Domain logic - version derivation independent of git operations

pub mod artifact;
pub mod describe;
pub mod outputs;
pub mod version;

pub use artifact::{bare_semver, build_date, docker_tag, seconds_since_epoch};
pub use describe::{normalize_describe, DescribeSegments};
pub use outputs::DerivedOutputs;
pub use version::{
    apply_dirty_suffix, is_valid_semver, validate_version, MajorMinor, SemVerVersion, TreeState,
};
