use std::fs;

use gitclone::core::destination::{self, PlanOptions};

/// A fresh bare clone's layout should put the git dir at the work dir
/// itself, with no `.git` indirection.
#[test]
fn plan_fresh_bare_uses_work_dir_as_git_dir() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("repo.git");

    let layout = destination::plan_fresh(
        "https://example.com/user/repo.git",
        Some(dest.to_str().unwrap()),
        &PlanOptions {
            bare: true,
            mirror: false,
            separate_git_dir: None,
            resume: false,
        },
    )
    .unwrap();

    assert!(layout.bare);
    assert_eq!(layout.work_dir, dest);
    assert_eq!(layout.git_dir, dest);
}

/// A non-empty existing destination must be rejected before any clone work
/// starts, per the Destination Planner's existence rule.
#[test]
fn plan_fresh_rejects_nonempty_existing_dir() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("taken");
    fs::create_dir(&dest).unwrap();
    fs::write(dest.join("file.txt"), b"hello").unwrap();

    let result = destination::plan_fresh(
        "https://example.com/user/repo.git",
        Some(dest.to_str().unwrap()),
        &PlanOptions {
            bare: false,
            mirror: false,
            separate_git_dir: None,
            resume: false,
        },
    );

    assert!(result.is_err());
}

/// An empty existing directory is a legal destination (matches real git's
/// `git clone` behavior of cloning into an empty dir without complaint).
#[test]
fn plan_fresh_accepts_empty_existing_dir() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("empty");
    fs::create_dir(&dest).unwrap();

    let layout = destination::plan_fresh(
        "https://example.com/user/repo.git",
        Some(dest.to_str().unwrap()),
        &PlanOptions {
            bare: false,
            mirror: false,
            separate_git_dir: None,
            resume: false,
        },
    )
    .unwrap();

    assert_eq!(layout.work_dir, dest);
    assert_eq!(layout.git_dir, dest.join(".git"));
}

/// `--separate-git-dir` must override the default `work_dir/.git` placement.
#[test]
fn plan_fresh_honors_separate_git_dir() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("work");
    let sep = dir.path().join("elsewhere.git");

    let layout = destination::plan_fresh(
        "https://example.com/user/repo.git",
        Some(dest.to_str().unwrap()),
        &PlanOptions {
            bare: false,
            mirror: false,
            separate_git_dir: Some(sep.clone()),
            resume: false,
        },
    )
    .unwrap();

    assert_eq!(layout.git_dir, sep);
    assert_eq!(layout.work_dir, dest);
}

/// `resolve_local_source` must find a real on-disk bare repository and not
/// misclassify it as a bundle.
#[test]
fn resolve_local_source_finds_bare_repo_dir() {
    let dir = tempfile::tempdir().unwrap();
    let repo = dir.path().join("source");
    fs::create_dir_all(repo.join("objects")).unwrap();
    fs::write(repo.join("HEAD"), "ref: refs/heads/main\n").unwrap();

    let resolved = destination::resolve_local_source(repo.to_str().unwrap()).unwrap();
    let (path, is_bundle) = resolved.expect("expected a local source to resolve");
    assert_eq!(path, repo);
    assert!(!is_bundle);
}

/// A `.bundle` file on disk should resolve as a local source flagged as a
/// bundle rather than a plain repository directory.
#[test]
fn resolve_local_source_finds_bundle_file() {
    let dir = tempfile::tempdir().unwrap();
    let bundle_path = dir.path().join("archive.bundle");
    fs::write(&bundle_path, b"# v2 git bundle\n").unwrap();

    let resolved =
        destination::resolve_local_source(dir.path().join("archive").to_str().unwrap()).unwrap();
    let (path, is_bundle) = resolved.expect("expected the bundle file to resolve");
    assert_eq!(path, bundle_path);
    assert!(is_bundle);
}

/// A remote-looking URL with no matching local path must resolve to `None`
/// rather than erroring, so the Orchestrator treats it as a network source.
#[test]
fn resolve_local_source_treats_remote_url_as_non_local() {
    let resolved =
        destination::resolve_local_source("https://example.com/user/repo.git").unwrap();
    assert!(resolved.is_none());
}
