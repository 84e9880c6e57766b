//! Gitoxide-based implementations of git operations.
//!
//! Each function provides a native Rust alternative to a git subprocess call.
//! These are called from `GitCommand` methods when `daft.experimental.gitoxide`
//! is enabled.

use anyhow::{Context, Result};
use gix::bstr::ByteSlice;
use gix::remote::Direction;
use gix::Repository;

// --- Group 1: Repository Discovery & State ---

/// gitoxide equivalent of `git rev-parse --git-common-dir`
pub fn rev_parse_git_common_dir(repo: &Repository) -> Result<String> {
    let common_dir = repo.common_dir();
    common_dir
        .to_str()
        .map(|s| s.to_string())
        .context("Common dir path is not valid UTF-8")
}

/// gitoxide equivalent of `git rev-parse --git-dir` (success = inside a repo)
pub fn is_inside_git_repo() -> Result<bool> {
    let cwd = std::env::current_dir().context("Failed to get current working directory")?;
    Ok(gix::discover(&cwd).is_ok())
}

/// gitoxide equivalent of `git rev-parse --is-inside-work-tree`
///
/// Note: We check only `workdir().is_some()` rather than `!is_bare()` because
/// gitoxide reports `is_bare() == true` for linked worktrees of bare repos,
/// even though those worktrees have a valid working directory.
pub fn rev_parse_is_inside_work_tree(repo: &Repository) -> Result<bool> {
    Ok(repo.workdir().is_some())
}

/// gitoxide equivalent of `git rev-parse --is-bare-repository`
///
/// Note: We use `workdir().is_none()` instead of `is_bare()` because gitoxide
/// reports `is_bare() == true` for linked worktrees of bare repos, but git CLI
/// reports `false` since the worktree has a working directory.
pub fn rev_parse_is_bare_repository(repo: &Repository) -> Result<bool> {
    Ok(repo.workdir().is_none())
}

/// gitoxide equivalent of `git rev-parse --git-dir`
pub fn get_git_dir(repo: &Repository) -> Result<String> {
    let git_dir = repo.git_dir();
    git_dir
        .to_str()
        .map(|s| s.to_string())
        .context("Git dir path is not valid UTF-8")
}

// --- Group 2: References ---

/// gitoxide equivalent of `git show-ref --verify --quiet <ref_name>`
pub fn show_ref_exists(repo: &Repository, ref_name: &str) -> Result<bool> {
    Ok(repo.try_find_reference(ref_name)?.is_some())
}

// --- Group 3: Config Reading ---

/// gitoxide equivalent of `git config --get <key>`
pub fn config_get(repo: &Repository, key: &str) -> Result<Option<String>> {
    let config = repo.config_snapshot();
    Ok(config.string(key).map(|v| v.to_string()))
}

/// gitoxide equivalent of `git config --global --get <key>`
///
/// Opens a standalone repository to read global config only.
pub fn config_get_global(key: &str) -> Result<Option<String>> {
    // Use git's global config by opening config from environment
    // This reads ~/.gitconfig and XDG config
    let config = gix::config::File::from_globals().context("Failed to read global git config")?;
    // gix::config::File::string() takes key as impl AsKey
    Ok(config.string(key).map(|v| v.to_string()))
}

// --- Group 5: Remote Info (local data) ---

/// gitoxide equivalent of `git remote`
pub fn remote_list(repo: &Repository) -> Result<Vec<String>> {
    Ok(repo
        .remote_names()
        .iter()
        .map(|name| name.to_string())
        .collect())
}

/// gitoxide equivalent of `git remote get-url <remote>`
pub fn remote_get_url(repo: &Repository, remote_name: &str) -> Result<String> {
    let remote = repo
        .find_remote(remote_name)
        .with_context(|| format!("Remote '{remote_name}' not found"))?;
    let url = remote
        .url(Direction::Fetch)
        .context("Remote has no fetch URL")?;
    Ok(url.to_bstring().to_string())
}

// --- Group 6: Remote Network ---
//
// NOTE: These functions require a real, discovered Repository — they cannot
// work with an ephemeral bare repo because gitoxide's `ref_map()` does not
// properly negotiate refs with anonymous remotes on freshly-initialized repos.
// When no local repo exists (e.g. during clone), the callers in git.rs fall
// through to the git CLI subprocess path instead.

/// gitoxide equivalent of `git ls-remote --symref <remote_url> HEAD`
///
/// Returns output formatted like git's ls-remote --symref output:
/// ```text
/// ref: refs/heads/main\tHEAD
/// <oid>\tHEAD
/// ```
pub fn ls_remote_symref(repo: &Repository, remote_url: &str) -> Result<String> {
    let remote = repo
        .remote_at(remote_url)
        .context("Failed to create remote")?;

    let connection = remote
        .connect(Direction::Fetch)
        .context("Failed to connect to remote")?;

    let (ref_map, _outcome) = connection
        .ref_map(gix::progress::Discard, Default::default())
        .context("Failed to get ref map from remote")?;

    let mut output = String::new();

    for remote_ref in &ref_map.remote_refs {
        match remote_ref {
            gix::protocol::handshake::Ref::Symbolic {
                full_ref_name,
                target,
                object,
                ..
            } => {
                if full_ref_name.as_bstr() == "HEAD" {
                    output.push_str(&format!("ref: {target}\tHEAD\n"));
                    output.push_str(&format!("{object}\tHEAD\n"));
                }
            }
            gix::protocol::handshake::Ref::Direct {
                full_ref_name,
                object,
            } => {
                if full_ref_name.as_bstr() == "HEAD" {
                    output.push_str(&format!("{object}\tHEAD\n"));
                }
            }
            _ => {}
        }
    }

    Ok(output)
}

/// gitoxide equivalent of `git ls-remote --heads <remote> [refs/heads/<branch>]`
///
/// Returns output formatted like git's ls-remote output:
/// ```text
/// <oid>\trefs/heads/branch-name
/// ```
pub fn ls_remote_heads(repo: &Repository, remote: &str, branch: Option<&str>) -> Result<String> {
    // Try to find a configured remote first, then fall back to URL
    let remote_obj = match repo.try_find_remote(remote) {
        Some(Ok(r)) => r,
        _ => repo.remote_at(remote).context("Failed to create remote")?,
    };

    let connection = remote_obj
        .connect(Direction::Fetch)
        .context("Failed to connect to remote")?;

    let (ref_map, _outcome) = connection
        .ref_map(gix::progress::Discard, Default::default())
        .context("Failed to get ref map from remote")?;

    let mut output = String::new();

    let filter_ref = branch.map(|b| format!("refs/heads/{b}"));

    for remote_ref in &ref_map.remote_refs {
        let (name, oid) = match remote_ref {
            gix::protocol::handshake::Ref::Direct {
                full_ref_name,
                object,
            } => (full_ref_name.to_string(), object.to_string()),
            gix::protocol::handshake::Ref::Symbolic {
                full_ref_name,
                object,
                ..
            } => (full_ref_name.to_string(), object.to_string()),
            gix::protocol::handshake::Ref::Peeled {
                full_ref_name, tag, ..
            } => (full_ref_name.to_string(), tag.to_string()),
            gix::protocol::handshake::Ref::Unborn {
                full_ref_name,
                target,
            } => (full_ref_name.to_string(), target.to_string()),
        };

        if !name.starts_with("refs/heads/") {
            continue;
        }

        if let Some(ref filter) = filter_ref {
            if name != *filter {
                continue;
            }
        }

        output.push_str(&format!("{oid}\t{name}\n"));
    }

    Ok(output)
}

/// gitoxide equivalent of `git ls-remote --heads <remote> refs/heads/<branch>`
/// Returns true if the branch exists on the remote.
pub fn ls_remote_branch_exists(repo: &Repository, remote_name: &str, branch: &str) -> Result<bool> {
    let output = ls_remote_heads(repo, remote_name, Some(branch))?;
    Ok(!output.trim().is_empty())
}


#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::process::Command;
    use tempfile::tempdir;

    /// Git environment variables that must be stripped from test subprocesses.
    /// When tests run inside a git hook (e.g., pre-push), git sets these
    /// variables, which would redirect test git commands to the host repo
    /// instead of the temp test repo — causing commits, config writes, and
    /// other mutations to land in the host repo.
    const GIT_ENV_VARS: &[&str] = &[
        "GIT_DIR",
        "GIT_WORK_TREE",
        "GIT_INDEX_FILE",
        "GIT_OBJECT_DIRECTORY",
        "GIT_ALTERNATE_OBJECT_DIRECTORIES",
        "GIT_COMMON_DIR",
        "GIT_CEILING_DIRECTORIES",
    ];

    fn git_cmd() -> Command {
        let mut cmd = Command::new("git");
        for var in GIT_ENV_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    fn strip_git_env() {
        for var in GIT_ENV_VARS {
            std::env::remove_var(var);
        }
    }

    fn create_test_repo() -> (tempfile::TempDir, Repository) {
        let dir = tempdir().unwrap();
        let path = dir.path().canonicalize().unwrap();

        strip_git_env();

        git_cmd()
            .args(["init", "-b", "main"])
            .arg(&path)
            .current_dir(&path)
            .output()
            .unwrap();

        git_cmd()
            .args(["config", "user.email", "test@test.com"])
            .current_dir(&path)
            .output()
            .unwrap();

        git_cmd()
            .args(["config", "user.name", "Test"])
            .current_dir(&path)
            .output()
            .unwrap();

        std::fs::write(path.join("file.txt"), "hello").unwrap();
        git_cmd()
            .args(["add", "."])
            .current_dir(&path)
            .output()
            .unwrap();
        git_cmd()
            .args(["commit", "-m", "initial"])
            .current_dir(&path)
            .output()
            .unwrap();

        let saved_cwd = std::env::current_dir().ok();
        std::env::set_current_dir(&path).unwrap();
        let repo = gix::open(&path).unwrap();
        if let Some(cwd) = saved_cwd {
            let _ = std::env::set_current_dir(cwd);
        }
        (dir, repo)
    }

    #[test]
    #[serial]
    fn test_rev_parse_git_common_dir() {
        let (_dir, repo) = create_test_repo();
        let result = rev_parse_git_common_dir(&repo).unwrap();
        assert!(result.ends_with(".git"));
    }

    #[test]
    #[serial]
    fn test_is_inside_git_repo() {
        let saved_cwd = std::env::current_dir().unwrap();
        let (_dir, _repo) = create_test_repo();
        std::env::set_current_dir(_dir.path()).unwrap();
        let result = is_inside_git_repo().unwrap();
        std::env::set_current_dir(&saved_cwd).unwrap();
        assert!(result);
    }

    #[test]
    #[serial]
    fn test_rev_parse_is_inside_work_tree() {
        let (_dir, repo) = create_test_repo();
        assert!(rev_parse_is_inside_work_tree(&repo).unwrap());
    }

    #[test]
    #[serial]
    fn test_rev_parse_is_bare_repository() {
        let (_dir, repo) = create_test_repo();
        assert!(!rev_parse_is_bare_repository(&repo).unwrap());
    }

    #[test]
    #[serial]
    fn test_get_git_dir() {
        let (_dir, repo) = create_test_repo();
        let result = get_git_dir(&repo).unwrap();
        assert!(result.ends_with(".git"));
    }

    #[test]
    #[serial]
    fn test_show_ref_exists() {
        let (_dir, repo) = create_test_repo();
        assert!(show_ref_exists(&repo, "refs/heads/main").unwrap());
        assert!(!show_ref_exists(&repo, "refs/heads/nonexistent").unwrap());
    }

    #[test]
    #[serial]
    fn test_config_get() {
        let (_dir, repo) = create_test_repo();
        let result = config_get(&repo, "user.email").unwrap();
        assert_eq!(result, Some("test@test.com".to_string()));

        let result = config_get(&repo, "nonexistent.key").unwrap();
        assert!(result.is_none());
    }

    #[test]
    #[serial]
    fn test_remote_list_empty() {
        let (_dir, repo) = create_test_repo();
        let result = remote_list(&repo).unwrap();
        assert!(result.is_empty());
    }
}
