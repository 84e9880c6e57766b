use super::{GitCommand, IpVersion};
use crate::errors::CloneError;
use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// Private ref namespace `fetch_objects` stages into, never a final
/// destination (§8 invariant 1).
const STAGING_NAMESPACE: &str = "refs/gitclone-fetch";

/// Rewrite a refspec's destination to land under [`STAGING_NAMESPACE`]
/// instead of wherever the ref plan ultimately wants it, keyed by `index` so
/// concurrent refspecs in one fetch don't collide.
fn staging_refspec(refspec: &str, index: usize) -> String {
    let (force, body) = match refspec.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, refspec),
    };
    let source = body.split_once(':').map(|(s, _)| s).unwrap_or(body);
    let destination = if source.ends_with('*') {
        format!("{STAGING_NAMESPACE}/{index}/*")
    } else {
        format!("{STAGING_NAMESPACE}/{index}")
    };
    let rendered = format!("{source}:{destination}");
    if force {
        format!("+{rendered}")
    } else {
        rendered
    }
}

impl GitCommand {
    /// Initialize an empty repository at `target_dir` (bare or with a work
    /// tree), without fetching anything. The Orchestrator (§4.F step 2)
    /// calls this before the Config Writer installs the remote block.
    /// `separate_git_dir`, when set, splits the git directory from the work
    /// tree per `--separate-git-dir`; `template`, when set, seeds the new
    /// git dir from `--template=<dir>`.
    pub fn init_repo(
        &self,
        target_dir: &Path,
        bare: bool,
        initial_branch: &str,
        separate_git_dir: Option<&Path>,
        template: Option<&Path>,
    ) -> Result<()> {
        let mut cmd = Command::new("git");
        cmd.arg("init");
        if bare {
            cmd.arg("--bare");
        }
        if self.quiet {
            cmd.arg("--quiet");
        }
        if let Some(sep) = separate_git_dir {
            cmd.arg(format!("--separate-git-dir={}", sep.display()));
        }
        if let Some(template) = template {
            cmd.arg(format!("--template={}", template.display()));
        }
        cmd.arg(format!("--initial-branch={initial_branch}"))
            .arg(target_dir);

        let output = cmd.output().context("Failed to execute git init command")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git init failed: {}", stderr);
        }
        Ok(())
    }

    /// Fetch objects for the given refspecs into `git_dir`'s object store
    /// from `url`, without ever installing a final ref name. Each refspec's
    /// destination is rewritten to land under [`STAGING_NAMESPACE`], which
    /// is deleted again once the fetch succeeds — the Orchestrator's
    /// `refstore::install_refs` call (§4.F step 9) remains the only place
    /// that ever writes a final ref, keeping it the single atomic
    /// installation point (§8 invariant 1, §5 steps 9-10). Since `--tags`
    /// would otherwise have git write straight to `refs/tags/*` itself,
    /// bypassing the staging rewrite entirely, tags are always fetched with
    /// `--no-tags` and, when `follow_tags` is requested, an explicit staged
    /// tag refspec is appended instead. `depth`, when set, produces a
    /// shallow fetch; `upload_pack` names a remote-side `git-upload-pack`
    /// program; `ip_version` forces `-4`/`-6` if requested.
    pub fn fetch_objects(
        &self,
        git_dir: &Path,
        url: &str,
        refspecs: &[String],
        depth: Option<u32>,
        follow_tags: bool,
        upload_pack: Option<&str>,
        ip_version: IpVersion,
    ) -> Result<()> {
        let mut cmd = Command::new("git");
        cmd.arg("--git-dir").arg(git_dir).arg("fetch");

        if self.quiet {
            cmd.arg("--quiet");
        }
        if let Some(depth) = depth {
            cmd.arg(format!("--depth={depth}"));
        }
        if let Some(program) = upload_pack {
            cmd.arg(format!("--upload-pack={program}"));
        }
        if let Some(flag) = ip_version.as_arg() {
            cmd.arg(flag);
        }
        cmd.arg("--no-tags");

        cmd.arg(url);
        for (index, refspec) in refspecs.iter().enumerate() {
            cmd.arg(staging_refspec(refspec, index));
        }
        if follow_tags {
            cmd.arg(format!("+refs/tags/*:{STAGING_NAMESPACE}/tags/*"));
        }

        let output = cmd
            .output()
            .context("Failed to execute git fetch command")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git fetch failed: {}", stderr);
        }

        self.delete_staging_refs(git_dir)
    }

    /// Remove every ref left under [`STAGING_NAMESPACE`] after a fetch. The
    /// objects those refs reached stay in the object store regardless —
    /// only the ref names go away.
    fn delete_staging_refs(&self, git_dir: &Path) -> Result<()> {
        let output = Command::new("git")
            .arg("--git-dir")
            .arg(git_dir)
            .args(["for-each-ref", "--format=%(refname)", STAGING_NAMESPACE])
            .output()
            .context("Failed to execute git for-each-ref")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("git for-each-ref failed: {}", stderr);
        }

        let refnames = String::from_utf8_lossy(&output.stdout);
        for refname in refnames.lines().filter(|l| !l.is_empty()) {
            let output = Command::new("git")
                .arg("--git-dir")
                .arg(git_dir)
                .args(["update-ref", "-d", refname])
                .output()
                .context("Failed to execute git update-ref -d")?;
            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                anyhow::bail!("git update-ref -d {refname} failed: {}", stderr);
            }
        }
        Ok(())
    }

    /// Initialize and fetch submodules recursively (spec §4.F "recursive").
    pub fn submodule_update_recursive(&self, work_dir: &Path) -> Result<()> {
        let mut cmd = Command::new("git");
        cmd.arg("-C")
            .arg(work_dir)
            .args(["submodule", "update", "--init", "--recursive"]);
        if self.quiet {
            cmd.arg("--quiet");
        }

        let output = cmd
            .output()
            .context("Failed to execute git submodule update command")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git submodule update failed: {}", stderr);
        }
        Ok(())
    }

    /// Materialize the working tree from the current HEAD (spec §4.F step
    /// 13). Run after HEAD and the index's backing refs are already in
    /// place, so a hard reset is sufficient to populate the tree. A failure
    /// here leaves the repository and its refs intact — it reports as a
    /// typed [`CloneError::Checkout`] rather than a generic failure, so the
    /// Orchestrator can tell this apart from an earlier, fataler failure.
    pub fn checkout_head(&self, work_dir: &Path) -> Result<()> {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(work_dir).args(["reset", "--hard"]);
        if self.quiet {
            cmd.arg("--quiet");
        }

        let output = cmd
            .output()
            .context("Failed to execute git reset --hard command")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CloneError::Checkout(stderr.trim().to_string()).into());
        }
        Ok(())
    }

    /// Repack with `-a -d` (spec §4.F step 12 "--dissociate").
    pub fn repack_consolidate(&self, git_dir: &Path) -> Result<()> {
        let mut cmd = Command::new("git");
        cmd.arg("--git-dir").arg(git_dir).args(["repack", "-a", "-d"]);
        if self.quiet {
            cmd.arg("--quiet");
        }

        let output = cmd
            .output()
            .context("Failed to execute git repack command")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git repack failed: {}", stderr);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_refspec_preserves_glob_shape() {
        assert_eq!(
            staging_refspec("+refs/heads/*:refs/remotes/origin/*", 0),
            "+refs/heads/*:refs/gitclone-fetch/0/*"
        );
    }

    #[test]
    fn staging_refspec_preserves_non_glob_shape() {
        assert_eq!(
            staging_refspec("HEAD:refs/remotes/origin/HEAD", 2),
            "HEAD:refs/gitclone-fetch/2"
        );
    }

    #[test]
    fn staging_refspec_without_force_stays_unforced() {
        assert_eq!(
            staging_refspec("refs/heads/main:refs/remotes/origin/main", 1),
            "refs/heads/main:refs/gitclone-fetch/1"
        );
    }
}
