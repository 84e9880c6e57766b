//! Ref-store binding (spec §6 "Ref-store"): atomic installation of the
//! Reference Planner's mapped refs, HEAD, and temporary primer-pinning refs.
//!
//! Grounded in `gix::Repository::edit_references`, the same transactional
//! primitive `daft::git::oxide` uses for reading refs, now used for writing
//! them. All ref updates for one clone step go through a single transaction
//! so a crash never leaves a half-updated ref set.

use std::path::Path;

use anyhow::{Context, Result};
use gix::refs::transaction::{Change, LogChange, PreviousValue, RefEdit, RefLog};
use gix::refs::Target;

use crate::core::model::Ref;

/// Open (without requiring a work tree) the repository at `git_dir` for ref
/// transactions.
pub fn open(git_dir: &Path) -> Result<gix::Repository> {
    gix::open_opts(git_dir, gix::open::Options::isolated())
        .with_context(|| format!("failed to open repository at {}", git_dir.display()))
}

/// Atomically create every mapped ref from the Reference Planner's output in
/// one transaction.
pub fn install_refs(repo: &gix::Repository, refs: &[Ref]) -> Result<()> {
    let edits = refs
        .iter()
        .map(|r| RefEdit {
            change: Change::Update {
                log: LogChange {
                    message: "clone: storing head".into(),
                    ..Default::default()
                },
                expected: PreviousValue::Any,
                new: Target::Object(r.target),
            },
            name: r.name.as_str().try_into().with_context(|| {
                format!("'{}' is not a valid reference name", r.name)
            })?,
            deref: false,
        })
        .collect::<Result<Vec<_>>>()?;

    if edits.is_empty() {
        return Ok(());
    }

    repo.edit_references(edits)
        .context("failed to install reference updates")?;
    Ok(())
}

/// Point HEAD at `target_ref` (symbolic) or, if `target_ref` is `None`, at a
/// direct object id (detached HEAD), per the Reference Planner's output.
pub fn set_head(
    repo: &gix::Repository,
    target_ref: Option<&str>,
    detached_oid: Option<gix::ObjectId>,
) -> Result<()> {
    let new = match (target_ref, detached_oid) {
        (Some(name), _) => Target::Symbolic(
            name.try_into()
                .with_context(|| format!("'{name}' is not a valid reference name"))?,
        ),
        (None, Some(oid)) => Target::Object(oid),
        (None, None) => anyhow::bail!("set_head requires either a target ref or a detached oid"),
    };

    let edit = RefEdit {
        change: Change::Update {
            log: LogChange {
                message: "clone: storing head".into(),
                ..Default::default()
            },
            expected: PreviousValue::Any,
            new,
        },
        name: "HEAD".try_into().expect("HEAD is a valid ref name"),
        deref: false,
    };

    repo.edit_reference(edit).context("failed to update HEAD")?;
    Ok(())
}

/// Create (or overwrite) a symbolic ref at `name` pointing at `target`, e.g.
/// the remote-tracking `refs/remotes/<origin>/HEAD` (spec §4.F step 10).
pub fn create_symref(repo: &gix::Repository, name: &str, target: &str) -> Result<()> {
    let edit = RefEdit {
        change: Change::Update {
            log: LogChange {
                message: "clone: storing head".into(),
                ..Default::default()
            },
            expected: PreviousValue::Any,
            new: Target::Symbolic(
                target
                    .try_into()
                    .with_context(|| format!("'{target}' is not a valid reference name"))?,
            ),
        },
        name: name
            .try_into()
            .with_context(|| format!("'{name}' is not a valid reference name"))?,
        deref: false,
    };
    repo.edit_reference(edit)
        .with_context(|| format!("failed to create symbolic ref '{name}'"))?;
    Ok(())
}

/// Create (or overwrite) the temporary ref pinning a not-yet-indexed primer
/// pack's tips, per §4.D Installing.
pub fn pin_temp_ref(repo: &gix::Repository, name: &str, target: gix::ObjectId) -> Result<()> {
    let edit = RefEdit {
        change: Change::Update {
            log: LogChange {
                message: "clone: primer temp ref".into(),
                force_create_reflog: false,
                ..Default::default()
            },
            expected: PreviousValue::Any,
            new: Target::Object(target),
        },
        name: name
            .try_into()
            .with_context(|| format!("'{name}' is not a valid reference name"))?,
        deref: false,
    };
    repo.edit_reference(edit)
        .with_context(|| format!("failed to pin temporary ref '{name}'"))?;
    Ok(())
}

/// Delete a single ref outright (used to drop temporary primer-pinning refs
/// once the permanent refs above them have been installed).
pub fn delete_ref(repo: &gix::Repository, name: &str) -> Result<()> {
    let edit = RefEdit {
        change: Change::Delete {
            expected: PreviousValue::Any,
            log: RefLog::AndReference,
        },
        name: name
            .try_into()
            .with_context(|| format!("'{name}' is not a valid reference name"))?,
        deref: false,
    };
    repo.edit_reference(edit)
        .with_context(|| format!("failed to delete ref '{name}'"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;
    use tempfile::tempdir;

    fn init_bare() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        Command::new("git")
            .args(["init", "--bare"])
            .arg(dir.path())
            .output()
            .unwrap();
        dir
    }

    #[test]
    fn install_refs_creates_heads_and_tags() {
        let dir = init_bare();
        let repo = open(dir.path()).unwrap();

        // A commit object must exist for the oid to resolve; use git's
        // well-known empty-tree commit produced via `git hash-object`.
        let output = Command::new("git")
            .args(["hash-object", "-t", "tree", "--stdin", "-w"])
            .arg("/dev/null")
            .current_dir(dir.path())
            .output()
            .unwrap();
        let tree_oid = String::from_utf8(output.stdout).unwrap().trim().to_string();
        let commit_output = Command::new("git")
            .args(["commit-tree", &tree_oid, "-m", "root"])
            .current_dir(dir.path())
            .env("GIT_AUTHOR_NAME", "t")
            .env("GIT_AUTHOR_EMAIL", "t@t")
            .env("GIT_COMMITTER_NAME", "t")
            .env("GIT_COMMITTER_EMAIL", "t@t")
            .output()
            .unwrap();
        let commit_hex = String::from_utf8(commit_output.stdout)
            .unwrap()
            .trim()
            .to_string();
        let oid = gix::ObjectId::from_hex(commit_hex.as_bytes()).unwrap();

        let refs = vec![Ref {
            name: "refs/remotes/origin/main".to_string(),
            target: oid,
            symref_target: None,
        }];

        install_refs(&repo, &refs).unwrap();
        assert!(repo
            .try_find_reference("refs/remotes/origin/main")
            .unwrap()
            .is_some());
    }
}
