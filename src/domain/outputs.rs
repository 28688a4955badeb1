use serde::Serialize;

use super::artifact::{bare_semver, build_date, docker_tag};
use super::version::{SemVerVersion, TreeState};
use chrono::{DateTime, Utc};

/// Everything a build pipeline gets stamped with.
///
/// Values are always strings; `major_version`/`minor_version` are empty when
/// the version did not match the loose grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct DerivedOutputs {
    pub git_commit: String,
    pub tree_state: String,
    pub scm_revision: String,
    pub major_version: String,
    pub minor_version: String,
    pub docker_tag: String,
    pub semver_version: String,
    pub build_date: String,
}

impl DerivedOutputs {
    pub fn build(
        commit: &str,
        state: TreeState,
        version: &SemVerVersion,
        now: DateTime<Utc>,
    ) -> Self {
        let fields = version.major_minor().unwrap_or_default();
        let docker = docker_tag(version.as_str());
        let semver = bare_semver(&docker).to_string();

        DerivedOutputs {
            git_commit: commit.to_string(),
            tree_state: state.as_str().to_string(),
            scm_revision: version.as_str().to_string(),
            major_version: fields.major,
            minor_version: fields.minor,
            docker_tag: docker,
            semver_version: semver,
            build_date: build_date(now),
        }
    }

    /// Named outputs in emission order. `SCM_STATUS` and `TREE_STATE` carry the same value.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("GIT_COMMIT", self.git_commit.as_str()),
            ("SCM_STATUS", self.tree_state.as_str()),
            ("TREE_STATE", self.tree_state.as_str()),
            ("SCM_REVISION", self.scm_revision.as_str()),
            ("MAJOR_VERSION", self.major_version.as_str()),
            ("MINOR_VERSION", self.minor_version.as_str()),
            ("DOCKER_TAG", self.docker_tag.as_str()),
            ("SEMVER_VERSION", self.semver_version.as_str()),
            ("BUILD_DATE", self.build_date.as_str()),
        ]
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs()
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }
}
