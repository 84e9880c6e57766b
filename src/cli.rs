//! Command-line surface (spec §6 "CLI").
//!
//! Grounded in `daft`'s `clap::Parser`-derive style for its subcommand
//! Args structs, collapsed here into a single top-level command since this
//! crate has exactly one operation.

use std::path::PathBuf;

use clap::Parser;

/// A resumable, primer-aware implementation of `git clone`.
#[derive(Parser, Debug)]
#[command(name = "gitclone", version = crate::VERSION, about, long_about = None)]
pub struct Args {
    /// Repository to clone, or (with `--resume`) the destination to resume.
    pub repo: String,

    /// Destination directory. Guessed from `repo` when omitted.
    pub dir: Option<PathBuf>,

    /// Create a bare repository with no working tree.
    #[arg(long)]
    pub bare: bool,

    /// Set up a mirror of the source repository (implies `--bare`).
    #[arg(long)]
    pub mirror: bool,

    /// Bypass the transport and hardlink/copy local object stores (default
    /// for local sources).
    #[arg(long, overrides_with = "no_local")]
    pub local: bool,

    /// Force use of the ordinary transport even for a local source.
    #[arg(long)]
    pub no_local: bool,

    /// When using the local-clone path, copy objects instead of hardlinking.
    #[arg(long)]
    pub no_hardlinks: bool,

    /// Borrow the source's objects via a single `alternates` entry instead of
    /// copying/hardlinking.
    #[arg(long)]
    pub shared: bool,

    /// Initialize and fetch submodules after checkout.
    #[arg(long, visible_alias = "recurse-submodules")]
    pub recursive: bool,

    /// Directory of templates to seed the new git-dir with.
    #[arg(long, value_name = "DIR")]
    pub template: Option<PathBuf>,

    /// Alternate reference repository to borrow objects from (repeatable).
    #[arg(long, value_name = "REPO")]
    pub reference: Vec<String>,

    /// Copy objects borrowed via `--reference` into the new repository and
    /// drop the alternates link, making it self-contained.
    #[arg(long)]
    pub dissociate: bool,

    /// Name to give the remote pointing at the source.
    #[arg(long, default_value = crate::config::clone::DEFAULT_REMOTE_NAME)]
    pub origin: String,

    /// Branch or tag to check out instead of the remote's default.
    #[arg(long, value_name = "REF")]
    pub branch: Option<String>,

    /// Path to the remote-side `git-upload-pack` program.
    #[arg(long, value_name = "PATH")]
    pub upload_pack: Option<String>,

    /// Path to the remote-side primer-producing program.
    #[arg(long, value_name = "PATH")]
    pub prime_clone: Option<String>,

    /// Create a shallow clone truncated to this many commits.
    #[arg(long, value_name = "N")]
    pub depth: Option<u32>,

    /// Fetch only the history of the chosen branch's tip.
    #[arg(long, overrides_with = "no_single_branch")]
    pub single_branch: bool,

    /// Fetch the history of every remote branch.
    #[arg(long)]
    pub no_single_branch: bool,

    /// Resume a previously interrupted clone at `repo` (the destination).
    #[arg(long)]
    pub resume: bool,

    /// Separate the git directory from the working tree.
    #[arg(long, value_name = "DIR")]
    pub separate_git_dir: Option<PathBuf>,

    /// Set a config value in the new repository (repeatable, `key=value`).
    #[arg(long, value_name = "KEY=VALUE")]
    pub config: Vec<String>,

    /// Use IPv4 addresses only.
    #[arg(short = '4', long)]
    pub ipv4: bool,

    /// Use IPv6 addresses only.
    #[arg(short = '6', long)]
    pub ipv6: bool,

    /// Force progress reporting even when stderr is not a terminal.
    #[arg(long)]
    pub progress: bool,

    /// Increase verbosity.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Do not checkout a working tree after cloning.
    #[arg(short = 'n', long)]
    pub no_checkout: bool,
}

impl Args {
    /// Resolve the `--local`/`--no-local` pair into a tri-state: `None`
    /// means "default" (local iff the source is a local path).
    pub fn local_override(&self) -> Option<bool> {
        if self.no_local {
            Some(false)
        } else if self.local {
            Some(true)
        } else {
            None
        }
    }

    /// Resolve the `--single-branch`/`--no-single-branch` pair, applying the
    /// spec §4.F default: single-branch defaults true when `--depth` is set.
    pub fn single_branch_resolved(&self) -> bool {
        if self.no_single_branch {
            false
        } else if self.single_branch {
            true
        } else {
            self.depth.is_some()
        }
    }

    /// Validate the mutually-exclusive-flag rules from spec §4.F step 1.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bare && self.origin != crate::config::clone::DEFAULT_REMOTE_NAME {
            anyhow::bail!("--bare and --origin are mutually exclusive");
        }
        if self.bare && self.separate_git_dir.is_some() {
            anyhow::bail!("--bare and --separate-git-dir are mutually exclusive");
        }
        if self.resume {
            let only_positional = !self.bare
                && !self.mirror
                && !self.local
                && !self.no_local
                && !self.no_hardlinks
                && !self.shared
                && !self.recursive
                && self.template.is_none()
                && self.reference.is_empty()
                && !self.dissociate
                && self.origin == crate::config::clone::DEFAULT_REMOTE_NAME
                && self.branch.is_none()
                && self.upload_pack.is_none()
                && self.prime_clone.is_none()
                && self.depth.is_none()
                && !self.single_branch
                && !self.no_single_branch
                && self.separate_git_dir.is_none()
                && self.config.is_empty()
                && self.dir.is_none();
            if !only_positional {
                anyhow::bail!("--resume cannot be combined with any other flag");
            }
        }
        if let Some(depth) = self.depth {
            if depth < 1 {
                anyhow::bail!("--depth must be at least 1");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_branch_defaults_true_with_depth() {
        let args = Args::parse_from(["gitclone", "src", "--depth", "1"]);
        assert!(args.single_branch_resolved());
    }

    #[test]
    fn single_branch_defaults_false_without_depth() {
        let args = Args::parse_from(["gitclone", "src"]);
        assert!(!args.single_branch_resolved());
    }

    #[test]
    fn no_single_branch_overrides_depth_default() {
        let args = Args::parse_from(["gitclone", "src", "--depth", "1", "--no-single-branch"]);
        assert!(!args.single_branch_resolved());
    }

    #[test]
    fn bare_with_custom_origin_is_rejected() {
        let args = Args::parse_from(["gitclone", "src", "--bare", "--origin", "upstream"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn resume_with_extra_flag_is_rejected() {
        let args = Args::parse_from(["gitclone", "/dst", "--resume", "--bare"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn resume_alone_is_accepted() {
        let args = Args::parse_from(["gitclone", "/dst", "--resume"]);
        assert!(args.validate().is_ok());
    }
}
