//! Config Writer (spec §4.G): install the remote's configuration block into
//! the freshly created repository.
//!
//! Grounded in `daft::git::config`'s CLI-subprocess idiom for mutating git
//! config, invoked with an explicit `--git-dir` so it can target the new
//! repository before anything `cd`s into it.

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};

use super::model::RemoteConfig;

fn config_set(git_dir: &Path, key: &str, value: &str) -> Result<()> {
    let output = Command::new("git")
        .arg("--git-dir")
        .arg(git_dir)
        .args(["config", key, value])
        .output()
        .context("failed to execute git config")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("git config {key} {value} failed: {stderr}");
    }
    Ok(())
}

fn config_add(git_dir: &Path, key: &str, value: &str) -> Result<()> {
    let output = Command::new("git")
        .arg("--git-dir")
        .arg(git_dir)
        .args(["config", "--add", key, value])
        .output()
        .context("failed to execute git config --add")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("git config --add {key} {value} failed: {stderr}");
    }
    Ok(())
}

/// Write the `[remote "<name>"]` and initial fetch refspec block, plus the
/// mirror/bare flags `clone` sets on the repository itself (§4.G).
pub fn write_remote_config(git_dir: &Path, config: &RemoteConfig) -> Result<()> {
    let remote = &config.remote_name;

    config_set(git_dir, &format!("remote.{remote}.url"), &config.url)?;

    if config.mirror {
        config_set(git_dir, &format!("remote.{remote}.mirror"), "true")?;
        config_set(git_dir, "core.bare", "true")?;
    } else if config.bare {
        config_set(git_dir, "core.bare", "true")?;
    }

    if config.fetch_refspecs.is_empty() {
        let default_refspec = format!(
            "+refs/heads/*:refs/remotes/{remote}/*",
            remote = remote
        );
        config_add(git_dir, &format!("remote.{remote}.fetch"), &default_refspec)?;
    } else {
        for (i, refspec) in config.fetch_refspecs.iter().enumerate() {
            let key = format!("remote.{remote}.fetch");
            let rendered = refspec.to_string();
            if i == 0 {
                config_set(git_dir, &key, &rendered)?;
            } else {
                config_add(git_dir, &key, &rendered)?;
            }
        }
    }

    config_set(git_dir, "core.repositoryformatversion", "0")?;

    Ok(())
}

/// Apply `--config key=value` overrides (spec §6), one `git config` call per
/// entry, the same subprocess idiom as the rest of this module.
pub fn write_custom_config(git_dir: &Path, entries: &[String]) -> Result<()> {
    for entry in entries {
        let (key, value) = entry
            .split_once('=')
            .with_context(|| format!("--config entry '{entry}' is not in key=value form"))?;
        config_set(git_dir, key, value)?;
    }
    Ok(())
}

/// Record `branch.<name>.remote`/`branch.<name>.merge` tracking config for
/// the branch checked out (or pointed at by HEAD) after clone.
pub fn write_branch_tracking(git_dir: &Path, remote_name: &str, branch: &str) -> Result<()> {
    config_set(
        git_dir,
        &format!("branch.{branch}.remote"),
        remote_name,
    )?;
    config_set(
        git_dir,
        &format!("branch.{branch}.merge"),
        &format!("refs/heads/{branch}"),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Refspec;
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

    fn config_get(git_dir: &Path, key: &str) -> Option<String> {
        let output = Command::new("git")
            .arg("--git-dir")
            .arg(git_dir)
            .args(["config", "--get", key])
            .output()
            .unwrap();
        if output.status.success() {
            Some(String::from_utf8(output.stdout).unwrap().trim().to_string())
        } else {
            None
        }
    }

    #[test]
    fn writes_url_and_default_fetch_refspec() {
        let dir = init_bare();
        let config = RemoteConfig {
            remote_name: "origin".to_string(),
            url: "https://example.com/repo.git".to_string(),
            fetch_refspecs: vec![],
            mirror: false,
            bare: false,
        };
        write_remote_config(dir.path(), &config).unwrap();

        assert_eq!(
            config_get(dir.path(), "remote.origin.url"),
            Some("https://example.com/repo.git".to_string())
        );
        assert_eq!(
            config_get(dir.path(), "remote.origin.fetch"),
            Some("+refs/heads/*:refs/remotes/origin/*".to_string())
        );
    }

    #[test]
    fn mirror_sets_bare_and_mirror_flags() {
        let dir = init_bare();
        let config = RemoteConfig {
            remote_name: "origin".to_string(),
            url: "https://example.com/repo.git".to_string(),
            fetch_refspecs: vec![Refspec {
                source: "refs/*".to_string(),
                destination: "refs/*".to_string(),
                force: true,
            }],
            mirror: true,
            bare: true,
        };
        write_remote_config(dir.path(), &config).unwrap();

        assert_eq!(
            config_get(dir.path(), "remote.origin.mirror"),
            Some("true".to_string())
        );
        assert_eq!(config_get(dir.path(), "core.bare"), Some("true".to_string()));
    }

    #[test]
    fn writes_custom_config_entries() {
        let dir = init_bare();
        write_custom_config(
            dir.path(),
            &["user.name=Test User".to_string(), "core.fileMode=false".to_string()],
        )
        .unwrap();
        assert_eq!(
            config_get(dir.path(), "user.name"),
            Some("Test User".to_string())
        );
        assert_eq!(
            config_get(dir.path(), "core.fileMode"),
            Some("false".to_string())
        );
    }

    #[test]
    fn rejects_custom_config_entry_without_equals() {
        let dir = init_bare();
        let result = write_custom_config(dir.path(), &["not-a-kv-pair".to_string()]);
        assert!(result.is_err());
    }

    #[test]
    fn writes_branch_tracking_config() {
        let dir = init_bare();
        write_branch_tracking(dir.path(), "origin", "main").unwrap();
        assert_eq!(
            config_get(dir.path(), "branch.main.remote"),
            Some("origin".to_string())
        );
        assert_eq!(
            config_get(dir.path(), "branch.main.merge"),
            Some("refs/heads/main".to_string())
        );
    }
}
