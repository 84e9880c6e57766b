use anyhow::{Context, Result};
use std::path::Path;
use which::which;

/// Version string shown by `--version`: the crate version plus the dev
/// branch/commit suffix `build.rs` attaches unless `GITCLONE_BUILD_RELEASE`
/// is set.
pub const VERSION: &str = env!("GITCLONE_VERSION_DISPLAY");

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod git;
pub mod logging;
pub mod output;
pub mod styles;
pub mod utils;

pub fn check_dependencies() -> Result<()> {
    let required_tools = ["git"];
    let mut missing = Vec::new();

    for tool in required_tools {
        if which(tool).is_err() {
            missing.push(tool);
        }
    }

    if !missing.is_empty() {
        anyhow::bail!("Missing required dependencies: {}", missing.join(", "));
    }

    Ok(())
}

pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

pub fn cleanup_on_error<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        std::fs::remove_dir_all(path)
            .with_context(|| format!("Failed to cleanup directory: {}", path.display()))?;
    }
    Ok(())
}

/// Extracts the destination directory name a plain `git clone` would pick,
/// before any `--bare` adjustment. See [`core::destination::guess_dir_name`]
/// for the full algorithm including the bare-repository `.git` suffix rule.
pub fn extract_repo_name(source: &str) -> Result<String> {
    core::destination::guess_dir_name(source, false)
        .context("Could not determine a destination directory name from the repository URL")
}
