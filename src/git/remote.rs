use super::oxide;
use super::GitCommand;
use crate::core::model::{Ref, RefSet};
use anyhow::{Context, Result};
use gix::ObjectId;
use std::process::Command;

fn split_ls_remote_line(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.splitn(2, char::is_whitespace);
    let oid = parts.next()?.trim();
    let name = parts.next()?.trim();
    if oid.is_empty() || name.is_empty() {
        None
    } else {
        Some((oid, name))
    }
}

impl GitCommand {
    /// Fetch the full advertised ref set (heads, tags, and the HEAD symref
    /// hint) from `url`, per the Transport interface's `get_refs_list` (§6).
    /// `upload_pack` names a remote-side `git-upload-pack` program;
    /// `ip_version` forces `-4`/`-6` if requested.
    pub fn ls_remote_all(
        &self,
        url: &str,
        upload_pack: Option<&str>,
        ip_version: super::IpVersion,
    ) -> Result<RefSet> {
        let mut symref_cmd = Command::new("git");
        symref_cmd.args(["ls-remote", "--symref"]);
        if let Some(program) = upload_pack {
            symref_cmd.arg(format!("--upload-pack={program}"));
        }
        if let Some(flag) = ip_version.as_arg() {
            symref_cmd.arg(flag);
        }
        symref_cmd.arg(url).arg("HEAD");
        let symref_output = symref_cmd
            .output()
            .context("Failed to execute git ls-remote --symref")?;
        if !symref_output.status.success() {
            let stderr = String::from_utf8_lossy(&symref_output.stderr);
            anyhow::bail!("Git ls-remote failed: {}", stderr);
        }
        let symref_text = String::from_utf8(symref_output.stdout)
            .context("Failed to parse git ls-remote output")?;

        let mut head_symref_target = None;
        let mut head_oid = None;
        for line in symref_text.lines() {
            if let Some(rest) = line.strip_prefix("ref: ") {
                if let Some((target, _)) = split_ls_remote_line(rest) {
                    head_symref_target = Some(target.to_string());
                }
            } else if let Some((oid, name)) = split_ls_remote_line(line) {
                if name == "HEAD" {
                    head_oid = ObjectId::from_hex(oid.as_bytes()).ok();
                }
            }
        }

        let mut heads_tags_cmd = Command::new("git");
        heads_tags_cmd.args(["ls-remote", "--heads", "--tags"]);
        if let Some(program) = upload_pack {
            heads_tags_cmd.arg(format!("--upload-pack={program}"));
        }
        if let Some(flag) = ip_version.as_arg() {
            heads_tags_cmd.arg(flag);
        }
        heads_tags_cmd.arg(url);
        let heads_tags_output = heads_tags_cmd
            .output()
            .context("Failed to execute git ls-remote --heads --tags")?;
        if !heads_tags_output.status.success() {
            let stderr = String::from_utf8_lossy(&heads_tags_output.stderr);
            anyhow::bail!("Git ls-remote failed: {}", stderr);
        }
        let heads_tags_text = String::from_utf8(heads_tags_output.stdout)
            .context("Failed to parse git ls-remote output")?;

        let mut refs = Vec::new();
        if let Some(oid) = head_oid {
            refs.push(Ref {
                name: "HEAD".to_string(),
                target: oid,
                symref_target: head_symref_target,
            });
        }
        for line in heads_tags_text.lines() {
            // Peeled annotated-tag entries (`<tag>^{}`) name the commit the
            // tag points at; the tag object itself is the ref we track.
            if line.ends_with("^{}") {
                continue;
            }
            if let Some((oid, name)) = split_ls_remote_line(line) {
                if let Ok(target) = ObjectId::from_hex(oid.as_bytes()) {
                    refs.push(Ref {
                        name: name.to_string(),
                        target,
                        symref_target: None,
                    });
                }
            }
        }

        Ok(RefSet { refs })
    }

    /// Fetch objects and refs for a refspec via the CLI fallback path (used
    /// when `use_gitoxide` is false, or as a recovery path if the gitoxide
    /// transport fails mid-clone).
    pub fn fetch_refspec(&self, remote: &str, refspec: &str) -> Result<()> {
        let mut cmd = Command::new("git");
        cmd.args(["fetch", remote, refspec]);

        if self.quiet {
            cmd.arg("--quiet");
        }

        let output = cmd
            .output()
            .context("Failed to execute git fetch command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git fetch with refspec failed: {}", stderr);
        }

        Ok(())
    }

    pub fn ls_remote_heads(&self, remote: &str, branch: Option<&str>) -> Result<String> {
        if self.use_gitoxide {
            if let Ok(repo) = self.gix_repo() {
                return oxide::ls_remote_heads(&repo, remote, branch);
            }
            // No local repo (e.g. during clone) — fall through to git CLI
        }
        let mut cmd = Command::new("git");
        cmd.args(["ls-remote", "--heads", remote]);

        if let Some(branch) = branch {
            cmd.arg(format!("refs/heads/{branch}"));
        }

        let output = cmd
            .output()
            .context("Failed to execute git ls-remote command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git ls-remote failed: {}", stderr);
        }

        String::from_utf8(output.stdout).context("Failed to parse git ls-remote output")
    }

    /// Execute git ls-remote with symref to get remote HEAD
    pub fn ls_remote_symref(&self, remote_url: &str) -> Result<String> {
        if self.use_gitoxide {
            if let Ok(repo) = self.gix_repo() {
                return oxide::ls_remote_symref(&repo, remote_url);
            }
            // No local repo (e.g. during clone) — fall through to git CLI
        }
        let output = Command::new("git")
            .args(["ls-remote", "--symref", remote_url, "HEAD"])
            .output()
            .context("Failed to execute git ls-remote command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git ls-remote failed: {}", stderr);
        }

        String::from_utf8(output.stdout).context("Failed to parse git ls-remote output")
    }

    /// Check if specific remote branch exists
    pub fn ls_remote_branch_exists(&self, remote_name: &str, branch: &str) -> Result<bool> {
        if self.use_gitoxide {
            if let Ok(repo) = self.gix_repo() {
                return oxide::ls_remote_branch_exists(&repo, remote_name, branch);
            }
            // No local repo (e.g. during clone) — fall through to git CLI
        }
        let output = Command::new("git")
            .args([
                "ls-remote",
                "--heads",
                remote_name,
                &format!("refs/heads/{branch}"),
            ])
            .output()
            .context("Failed to execute git ls-remote command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git ls-remote failed: {}", stderr);
        }

        let stdout =
            String::from_utf8(output.stdout).context("Failed to parse git ls-remote output")?;
        Ok(!stdout.trim().is_empty())
    }

    pub fn remote_set_head_auto(&self, remote: &str) -> Result<()> {
        let output = Command::new("git")
            .args(["remote", "set-head", remote, "--auto"])
            .output()
            .context("Failed to execute git remote set-head command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git remote set-head failed: {}", stderr);
        }

        Ok(())
    }

    /// List all configured remotes.
    pub fn remote_list(&self) -> Result<Vec<String>> {
        if self.use_gitoxide {
            return oxide::remote_list(&self.gix_repo()?);
        }
        let output = Command::new("git")
            .args(["remote"])
            .output()
            .context("Failed to execute git remote command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git remote failed: {}", stderr);
        }

        let stdout =
            String::from_utf8(output.stdout).context("Failed to parse git remote output")?;

        Ok(stdout
            .lines()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect())
    }

    /// Check if a remote exists.
    pub fn remote_exists(&self, remote: &str) -> Result<bool> {
        let remotes = self.remote_list()?;
        Ok(remotes.contains(&remote.to_string()))
    }

    /// Get the URL of a remote.
    pub fn remote_get_url(&self, remote: &str) -> Result<String> {
        if self.use_gitoxide {
            return oxide::remote_get_url(&self.gix_repo()?, remote);
        }
        let output = Command::new("git")
            .args(["remote", "get-url", remote])
            .output()
            .context("Failed to execute git remote get-url command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git remote get-url failed: {}", stderr);
        }

        String::from_utf8(output.stdout)
            .context("Failed to parse git remote get-url output")
            .map(|s| s.trim().to_string())
    }
}
