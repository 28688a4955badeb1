// tests/integration_test.rs
use std::fs;
use std::path::Path;
use std::process::Command;

use git2::{Oid, Repository, Signature};
use tempfile::TempDir;

fn init_repo() -> (TempDir, Repository) {
    let dir = TempDir::new().expect("create temp dir");
    let repo = Repository::init(dir.path()).expect("init repo");
    (dir, repo)
}

fn commit_file(repo: &Repository, name: &str, contents: &str) -> Oid {
    let root = repo.workdir().unwrap().to_path_buf();
    fs::write(root.join(name), contents).unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new(name)).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = Signature::now("Test", "test@example.com").unwrap();

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, name, &tree, &parents)
        .unwrap()
}

fn tag(repo: &Repository, name: &str, oid: Oid) {
    let object = repo.find_object(oid, None).unwrap();
    repo.tag_lightweight(name, &object, false).unwrap();
}

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn stamp(repo: &Path, backend: &str) -> std::process::Output {
    stamp_with(repo, backend, "env", false)
}

fn stamp_with(
    repo: &Path,
    backend: &str,
    format: &str,
    in_github_actions: bool,
) -> std::process::Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_git-stamp"));
    cmd.args(["--repo"])
        .arg(repo)
        .args(["--backend", backend, "--format", format, "--no-unshallow"])
        .env_remove("GIT_COMMIT")
        .env_remove("GIT_TREE_STATE")
        .env_remove("GITHUB_OUTPUT")
        .env_remove("GITHUB_ACTIONS")
        .env("RUST_LOG", "off");
    if in_github_actions {
        cmd.env("GITHUB_ACTIONS", "true");
    }
    cmd.output().expect("Failed to execute git-stamp")
}

fn output_value<'a>(stdout: &'a str, key: &str) -> Option<&'a str> {
    stdout
        .lines()
        .find_map(|line| line.strip_prefix(key)?.strip_prefix('='))
}

#[test]
fn test_git_stamp_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_git-stamp"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("git-stamp"));
    assert!(stdout.contains("semver build stamp"));
}

#[test]
fn test_exact_tag_clean_tree_git2_backend() {
    let (dir, repo) = init_repo();
    let oid = commit_file(&repo, "main.rs", "fn main() {}");
    tag(&repo, "v2.0.0", oid);

    let output = stamp(dir.path(), "git2");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(output_value(&stdout, "SCM_REVISION"), Some("v2.0.0"));
    assert_eq!(output_value(&stdout, "MAJOR_VERSION"), Some("2"));
    assert_eq!(output_value(&stdout, "MINOR_VERSION"), Some("0"));
    assert_eq!(output_value(&stdout, "TREE_STATE"), Some("clean"));
    assert_eq!(output_value(&stdout, "SCM_STATUS"), Some("clean"));
    assert_eq!(output_value(&stdout, "GIT_COMMIT"), Some(oid.to_string().as_str()));
}

#[test]
fn test_dirty_tree_past_tag_git2_backend() {
    let (dir, repo) = init_repo();
    let base = commit_file(&repo, "a.txt", "a");
    tag(&repo, "v2.0.0", base);
    let mut head = base;
    for i in 0..5 {
        head = commit_file(&repo, &format!("f{}.txt", i), "x");
    }
    fs::write(dir.path().join("untracked.rs"), "// new").unwrap();

    let output = stamp(dir.path(), "git2");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let abbrev = &head.to_string()[..14];
    let expected = format!("v2.0.0-5+{}-dirty", abbrev);
    assert_eq!(output_value(&stdout, "SCM_REVISION"), Some(expected.as_str()));
    assert_eq!(output_value(&stdout, "MINOR_VERSION"), Some("0+"));
    assert_eq!(output_value(&stdout, "TREE_STATE"), Some("dirty"));
    let docker = format!("v2.0.0-5_{}-dirty", abbrev);
    assert_eq!(output_value(&stdout, "DOCKER_TAG"), Some(docker.as_str()));
    assert_eq!(output_value(&stdout, "SEMVER_VERSION"), Some("v2.0.0"));
}

#[test]
fn test_prerelease_tag_git2_backend() {
    let (dir, repo) = init_repo();
    let base = commit_file(&repo, "a.txt", "a");
    tag(&repo, "v1.1.0-alpha", base);
    let head = commit_file(&repo, "b.txt", "b");

    let output = stamp(dir.path(), "git2");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let expected = format!("v1.1.0-alpha.1+{}", &head.to_string()[..14]);
    assert_eq!(output_value(&stdout, "SCM_REVISION"), Some(expected.as_str()));
    assert_eq!(output_value(&stdout, "MINOR_VERSION"), Some("1+"));
}

#[test]
fn test_no_tags_is_fatal_without_outputs() {
    let (dir, repo) = init_repo();
    commit_file(&repo, "a.txt", "a");

    let output = stamp(dir.path(), "git2");
    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(output_value(&stdout, "SCM_REVISION").is_none());
}

#[test]
fn test_invalid_semver_emits_outputs_and_fails() {
    let (dir, repo) = init_repo();
    let oid = commit_file(&repo, "a.txt", "a");
    tag(&repo, "v1.0.0_rc1", oid);

    let output = stamp(dir.path(), "git2");
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(output_value(&stdout, "SCM_REVISION"), Some("v1.0.0_rc1"));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("valid semantic version"));
}

#[test]
fn test_cli_backend_matches_git2_backend() {
    if !git_available() {
        return;
    }

    let (dir, repo) = init_repo();
    let base = commit_file(&repo, "a.txt", "a");
    tag(&repo, "v3.1.4", base);
    commit_file(&repo, "b.txt", "b");

    let cli = String::from_utf8(stamp(dir.path(), "cli").stdout).unwrap();
    let lib = String::from_utf8(stamp(dir.path(), "git2").stdout).unwrap();

    for key in ["GIT_COMMIT", "TREE_STATE", "SCM_REVISION", "MINOR_VERSION", "DOCKER_TAG"] {
        assert_eq!(
            output_value(&cli, key),
            output_value(&lib, key),
            "mismatch for {}",
            key
        );
    }
    assert_eq!(output_value(&cli, "MINOR_VERSION"), Some("1+"));
}

#[test]
fn test_produced_versions_parse_as_semver() {
    let (dir, repo) = init_repo();
    let base = commit_file(&repo, "a.txt", "a");
    tag(&repo, "v1.2.3", base);
    commit_file(&repo, "b.txt", "b");

    let stdout = String::from_utf8(stamp(dir.path(), "git2").stdout).unwrap();
    let revision = output_value(&stdout, "SCM_REVISION").unwrap();
    let parsed = semver::Version::parse(revision.trim_start_matches('v')).unwrap();
    assert_eq!((parsed.major, parsed.minor, parsed.patch), (1, 2, 3));
    assert_eq!(parsed.pre.as_str(), "1");
    assert!(!parsed.build.is_empty());
}

#[test]
fn test_invalid_semver_json_stays_parseable_under_actions() {
    let (dir, repo) = init_repo();
    let oid = commit_file(&repo, "a.txt", "a");
    tag(&repo, "v1.0.0_rc1", oid);

    let output = stamp_with(dir.path(), "git2", "json", true);
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("stdout is not a JSON object ({}): {}", e, stdout));
    assert_eq!(value["SCM_REVISION"], "v1.0.0_rc1");
    assert!(!stdout.contains("::error::"));

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("::error::git version should be a valid semantic version"));
}

#[test]
fn test_cli_backend_untracked_file_is_dirty() {
    if !git_available() {
        return;
    }

    let (dir, repo) = init_repo();
    let oid = commit_file(&repo, "a.txt", "a");
    tag(&repo, "v2.0.0", oid);
    fs::write(dir.path().join("untracked.rs"), "// new").unwrap();

    let output = stamp(dir.path(), "cli");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(output_value(&stdout, "TREE_STATE"), Some("dirty"));
    assert_eq!(output_value(&stdout, "SCM_REVISION"), Some("v2.0.0-dirty"));
    assert_eq!(output_value(&stdout, "DOCKER_TAG"), Some("v2.0.0-dirty"));
}

#[test]
fn test_cli_backend_describe_failure_reports_command() {
    if !git_available() {
        return;
    }

    let (dir, repo) = init_repo();
    commit_file(&repo, "a.txt", "a");

    let output = stamp(dir.path(), "cli");
    assert!(!output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(output_value(&stdout, "SCM_REVISION").is_none());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("describe --tags"), "stderr: {}", stderr);
    assert!(stderr.contains("fatal"), "stderr: {}", stderr);
}
