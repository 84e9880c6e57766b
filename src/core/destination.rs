//! Destination Planner (spec §4.A): resolve a source identifier and an
//! optional destination string into a [`DestinationLayout`].

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::model::DestinationLayout;
use crate::utils::path_exists;

/// Probe suffixes tried, in order, when the source is a local path that
/// might itself be a repository directory rather than a bare repo root.
const LOCAL_REPO_PROBES: &[&str] = &["/.git", "", ".git/.git", ".git"];
const BUNDLE_PROBES: &[&str] = &[".bundle", ""];

/// Resolve a source string against the local filesystem, per §4.A
/// "Source resolution". Returns `Some((resolved_path, is_bundle))` if the
/// source names something on disk, `None` if it should be treated as a
/// remote (non-local) identifier.
pub fn resolve_local_source(source: &str) -> Result<Option<(PathBuf, bool)>> {
    let has_scheme_or_host_sep = source.contains("://") || looks_like_scp_host(source);
    let base = Path::new(source);

    for suffix in LOCAL_REPO_PROBES {
        let candidate = if suffix.is_empty() {
            base.to_path_buf()
        } else {
            PathBuf::from(format!("{source}{suffix}"))
        };
        if path_exists(&candidate) {
            return Ok(Some((candidate, false)));
        }
    }

    for suffix in BUNDLE_PROBES {
        let candidate = if suffix.is_empty() {
            base.to_path_buf()
        } else {
            PathBuf::from(format!("{source}{suffix}"))
        };
        if path_exists(&candidate) {
            return Ok(Some((candidate, true)));
        }
    }

    if has_scheme_or_host_sep {
        return Ok(None);
    }

    if !source.contains(':') {
        anyhow::bail!("repository path '{source}' does not exist");
    }

    Ok(None)
}

fn looks_like_scp_host(source: &str) -> bool {
    // `user@host:path` style shorthand: a `:` with no preceding `/`.
    if let Some(colon) = source.find(':') {
        !source[..colon].contains('/')
    } else {
        false
    }
}

/// Derive a destination directory name from a source string, per §4.A
/// "Destination guessing". `bare` controls whether a `.git` suffix is
/// appended to the result.
///
/// This is a pure function so it can be tested in isolation, and so that
/// [`crate::extract_repo_name`] can reuse it without a filesystem probe.
pub fn guess_dir_name(source: &str, bare: bool) -> Option<String> {
    // (1) strip scheme `://`
    let mut s = match source.find("://") {
        Some(idx) => &source[idx + 3..],
        None => source,
    };

    // (2) strip credentials up to the last `@` within the host component.
    // The host component ends at the first '/' (or the end of string).
    let host_end = s.find('/').unwrap_or(s.len());
    if let Some(at) = s[..host_end].rfind('@') {
        s = &s[at + 1..];
    }

    // (3) strip trailing whitespace/separators, then a trailing `/.git`.
    let mut s = s.trim_end_matches(['/', '\\']).to_string();
    if let Some(stripped) = s.strip_suffix("/.git") {
        s = stripped.to_string();
    }

    // (4) if the remaining component contains ':' but no '/', strip a
    // trailing ':<digits>' port.
    if s.contains(':') && !s.contains('/') {
        if let Some(colon) = s.rfind(':') {
            if s[colon + 1..].chars().all(|c| c.is_ascii_digit()) && colon + 1 < s.len() {
                s.truncate(colon);
            }
        }
    }

    // (5) take the last path component, treating ':' as a separator too.
    let last = s
        .rsplit(['/', ':'])
        .find(|part| !part.is_empty())
        .unwrap_or("");
    let mut last = last.to_string();

    // (6) strip a trailing `.git` (or `.bundle` for bundles).
    if let Some(stripped) = last.strip_suffix(".git") {
        last = stripped.to_string();
    } else if let Some(stripped) = last.strip_suffix(".bundle") {
        last = stripped.to_string();
    }

    // (7) collapse runs of control/whitespace characters to a single space
    // and trim.
    let mut collapsed = String::with_capacity(last.len());
    let mut last_was_space = false;
    for c in last.chars() {
        if c.is_control() || c.is_whitespace() {
            if !last_was_space {
                collapsed.push(' ');
                last_was_space = true;
            }
        } else {
            collapsed.push(c);
            last_was_space = false;
        }
    }
    let result = collapsed.trim().to_string();

    if result.is_empty() || result == "/" {
        return None;
    }

    if bare {
        Some(format!("{result}.git"))
    } else {
        Some(result)
    }
}

/// Options that influence destination planning (a subset of the CLI flags).
pub struct PlanOptions {
    pub bare: bool,
    pub mirror: bool,
    pub separate_git_dir: Option<PathBuf>,
    pub resume: bool,
}

/// Plan the destination layout for a fresh (non-resume) clone.
///
/// Implements §4.A "Existence rule": the destination must not exist, or
/// must be an empty directory.
pub fn plan_fresh(source: &str, explicit_dest: Option<&str>, opts: &PlanOptions) -> Result<DestinationLayout> {
    debug_assert!(!opts.resume, "plan_fresh is not used in resume mode");

    let bare = opts.bare || opts.mirror;
    let work_dir = match explicit_dest {
        Some(d) => PathBuf::from(d),
        None => {
            let name = guess_dir_name(source, bare)
                .context("could not derive a destination directory name from the source")?;
            PathBuf::from(name)
        }
    };

    if path_exists(&work_dir) && !is_empty_dir(&work_dir)? {
        anyhow::bail!(
            "destination path '{}' already exists and is not an empty directory",
            work_dir.display()
        );
    }

    let git_dir = match &opts.separate_git_dir {
        Some(sep) => sep.clone(),
        None if bare => work_dir.clone(),
        None => work_dir.join(".git"),
    };

    Ok(DestinationLayout {
        work_dir,
        git_dir,
        bare,
    })
}

/// Resolve the destination for a `--resume` invocation (§4.A "Resume mode").
/// The destination must already exist; this only determines layout shape
/// (bare vs. work-tree), not the remote configuration — the Orchestrator
/// reads that back from the existing repository's config.
pub fn plan_resume(dest: &str) -> Result<DestinationLayout> {
    let work_dir = PathBuf::from(dest);
    if !path_exists(&work_dir) {
        anyhow::bail!(
            "--resume destination '{}' does not exist",
            work_dir.display()
        );
    }

    let dot_git = work_dir.join(".git");
    let (git_dir, bare) = if path_exists(&dot_git) {
        (dot_git, false)
    } else {
        (work_dir.clone(), true)
    };

    Ok(DestinationLayout {
        work_dir,
        git_dir,
        bare,
    })
}

fn is_empty_dir(path: &Path) -> Result<bool> {
    if !path.is_dir() {
        return Ok(false);
    }
    let mut entries = std::fs::read_dir(path)
        .with_context(|| format!("failed to read directory '{}'", path.display()))?;
    Ok(entries.next().is_none())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scheme_and_git_suffix() {
        assert_eq!(
            guess_dir_name("https://example.com/user/foo.git", false),
            Some("foo".to_string())
        );
    }

    #[test]
    fn strips_credentials_and_port() {
        assert_eq!(
            guess_dir_name("https://user%40host:2222/x.git", false),
            Some("x".to_string())
        );
    }

    #[test]
    fn strips_ssh_shorthand_credentials() {
        assert_eq!(
            guess_dir_name("git@github.com:user/repo.git", false),
            Some("repo".to_string())
        );
    }

    #[test]
    fn bare_appends_git_suffix() {
        assert_eq!(
            guess_dir_name("https://example.com/foo.git", true),
            Some("foo.git".to_string())
        );
    }

    #[test]
    fn bundle_suffix_is_stripped() {
        assert_eq!(
            guess_dir_name("/path/to/archive.bundle", false),
            Some("archive".to_string())
        );
    }

    #[test]
    fn trailing_slash_is_ignored() {
        assert_eq!(
            guess_dir_name("https://example.com/foo/", false),
            Some("foo".to_string())
        );
    }

    #[test]
    fn empty_result_is_none() {
        assert_eq!(guess_dir_name("https://example.com/", false), None);
    }

    #[test]
    fn plan_resume_detects_bare_vs_worktree() {
        let dir = tempfile::tempdir().unwrap();
        let bare_layout = plan_resume(dir.path().to_str().unwrap()).unwrap();
        assert!(bare_layout.bare);
        assert_eq!(bare_layout.git_dir, dir.path());

        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let worktree_layout = plan_resume(dir.path().to_str().unwrap()).unwrap();
        assert!(!worktree_layout.bare);
        assert_eq!(worktree_layout.git_dir, dir.path().join(".git"));
    }

    #[test]
    fn plan_resume_missing_destination_fails() {
        assert!(plan_resume("/nonexistent/surely/not/real/path").is_err());
    }

    #[test]
    fn guess_dir_name_is_idempotent() {
        let sources = [
            "https://example.com/user/foo.git",
            "git@github.com:user/repo.git",
            "/path/to/archive.bundle",
            "https://user%40host:2222/x.git",
        ];
        for source in sources {
            let first = guess_dir_name(source, false).unwrap();
            let second = guess_dir_name(&first, false).unwrap();
            assert_eq!(first, second, "not idempotent for {source}");
        }
    }
}
