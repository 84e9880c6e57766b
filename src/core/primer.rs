//! Primer Subsystem (spec §4.D): discover, download, index, and adopt the
//! optional out-of-band primer resource.
//!
//! Grounded in `daft::git::clone`'s subprocess-dispatch idiom for the
//! pack-index step (§6 "Pack-index subprocess"), and in the well-known
//! git bundle v2/v3 text header format for parsing tip references in the
//! Installing phase (supplemented beyond the distilled spec, which names
//! the operation without specifying the format). The download step itself
//! reuses `daft::update_check::fetch_latest_version`'s `curl` subprocess
//! idiom rather than adding an HTTP client dependency of our own.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};

use super::junk::JunkTracker;
use super::model::{AltResource, JunkMode, ResumeRecord};
use crate::config::primer::INDEX_PACK_BIN;
use crate::errors::CloneError;

/// The Primer state machine's current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimerPhase {
    Idle,
    Fetching,
    Indexing,
    Installing,
    Done,
    Abandon,
}

/// A tip reference parsed out of a bundle header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleTip {
    pub oid: String,
    pub refname: String,
}

/// Parse a git bundle v2/v3 text header: a `#` signature line, zero or more
/// `-<oid>` prerequisite lines, then `<oid> <ref>` tip lines, terminated by
/// a blank line before the packfile bytes begin.
pub fn parse_bundle_header(data: &[u8]) -> Result<Vec<BundleTip>> {
    let text = std::str::from_utf8(data).context("bundle header is not valid UTF-8")?;
    let mut lines = text.lines();

    let signature = lines.next().context("bundle file is empty")?;
    if !signature.starts_with('#') {
        anyhow::bail!("not a bundle file (missing '#' signature line)");
    }

    let mut tips = Vec::new();
    for line in lines {
        if line.is_empty() {
            break;
        }
        if let Some(stripped) = line.strip_prefix('-') {
            // Prerequisite line: `-<oid>` optionally followed by a comment.
            let _ = stripped;
            continue;
        }
        let mut parts = line.splitn(2, ' ');
        let oid = parts.next().context("malformed bundle tip line")?;
        let refname = parts.next().context("bundle tip line missing ref name")?;
        tips.push(BundleTip {
            oid: oid.to_string(),
            refname: refname.to_string(),
        });
    }

    Ok(tips)
}

/// Run the pack-index subprocess against a downloaded primer pack.
///
/// Invokes `git index-pack --clone-bundle -v --check-self-contained-and-connected
/// -o <out.idx> <in.pack>`, per §6.
pub fn index_pack(pack_path: &Path, out_idx_path: &Path) -> Result<()> {
    let output = Command::new(INDEX_PACK_BIN)
        .arg("index-pack")
        .arg("--clone-bundle")
        .arg("-v")
        .arg("--check-self-contained-and-connected")
        .arg("-o")
        .arg(out_idx_path)
        .arg(pack_path)
        .output()
        .context("failed to execute git index-pack")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CloneError::Primer(format!("index-pack failed: {stderr}")).into());
    }

    Ok(())
}

/// Download the primer resource to `dest_path` (§4.D "Fetching").
///
/// Uses `curl` the same way `daft::update_check::fetch_latest_version` does
/// for its GitHub API call, rather than pulling in a dedicated HTTP client
/// crate for a single GET.
pub fn download_primer(resource: &AltResource, dest_path: &Path) -> Result<()> {
    let output = Command::new("curl")
        .args(["-sL", "--fail", "--max-time", "300", "-o"])
        .arg(dest_path)
        .arg(&resource.url)
        .output()
        .context("failed to execute curl")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CloneError::Primer(format!(
            "failed to download primer from {}: {stderr}",
            resource.url
        ))
        .into());
    }
    Ok(())
}

/// Discover an out-of-band primer resource by running the program named by
/// `--prime-clone` (§4.D "Discovery"), analogous to how `--upload-pack` names
/// a remote-side program. The program is expected to print the same
/// two-line `<url>\n<filetype>\n` shape the resume record persists; no
/// `--prime-clone` path means no primer is offered.
pub fn discover(prime_clone_path: Option<&str>) -> Result<Option<AltResource>> {
    let Some(path) = prime_clone_path else {
        return Ok(None);
    };

    let output = Command::new(path)
        .output()
        .with_context(|| format!("failed to execute prime-clone program '{path}'"))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CloneError::Primer(format!(
            "prime-clone program '{path}' failed: {stderr}"
        ))
        .into());
    }

    let stdout = String::from_utf8(output.stdout)
        .with_context(|| format!("prime-clone program '{path}' produced non-UTF-8 output"))?;
    let mut lines = stdout.lines();
    let url = lines.next().filter(|l| !l.is_empty()).map(str::to_string);
    let filetype = lines.next().filter(|l| !l.is_empty()).map(str::to_string);

    match (url, filetype) {
        (Some(url), Some(filetype)) => Ok(Some(AltResource { url, filetype })),
        _ => Ok(None),
    }
}

/// Paths the primer subsystem manages inside `<git_dir>/objects/pack/`.
pub struct PrimerPaths {
    pub pack: PathBuf,
    pub idx: PathBuf,
    pub bndl: PathBuf,
}

impl PrimerPaths {
    pub fn new(git_dir: &Path, name: &str) -> Self {
        let pack_dir = git_dir.join("objects").join("pack");
        Self {
            pack: pack_dir.join(format!("{name}.pack")),
            idx: pack_dir.join(format!("{name}.idx")),
            bndl: pack_dir.join(format!("{name}.bndl")),
        }
    }
}

/// Delete every artifact a freshly-downloaded, not-yet-adopted primer left
/// behind (§4.D "Abandon").
pub fn abandon(paths: &PrimerPaths, resume_requested: bool) -> Result<()> {
    if resume_requested {
        return Err(CloneError::Primer(
            "a --resume invocation cannot abandon its primer".to_string(),
        )
        .into());
    }

    for path in [&paths.pack, &paths.idx, &paths.bndl] {
        let _ = std::fs::remove_file(path);
    }
    let temp = paths.pack.with_extension("pack.temp");
    let _ = std::fs::remove_file(temp);

    JunkTracker::set_resume_record(None);
    JunkTracker::force_mode(JunkMode::None);
    Ok(())
}

/// Finalize a successfully adopted primer (§4.D "Done"): drop the temporary
/// refs' backing bundle file, keep the permanent `.pack`/`.idx` pair.
/// Temporary ref deletion itself goes through the ref-store (see
/// `crate::git::refstore`); this only removes the now-unneeded bundle file.
pub fn finalize(paths: &PrimerPaths) -> Result<()> {
    std::fs::remove_file(&paths.bndl).or_else(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Ok(())
        } else {
            Err(e)
        }
    })?;
    Ok(())
}

/// Build the name for a temporary primer-pinning ref, per §4.D Installing:
/// `refs/temp/<origin>/resume/temp-<hex-id>`.
pub fn temp_ref_name(origin: &str, hex_id: &str) -> String {
    format!("refs/temp/{origin}/resume/temp-{hex_id}")
}

/// Whether a primer resource's filetype is one this subsystem knows how to
/// adopt. Per the resolved Open Question (§9), an unsupported filetype
/// yields a warning rather than a silent failure.
pub fn is_supported_filetype(resource: &AltResource) -> bool {
    resource.filetype == "pack"
}

/// Convert an on-disk [`ResumeRecord`] back into an [`AltResource`] for a
/// `--resume` invocation.
pub fn resource_from_resume_record(record: &ResumeRecord) -> AltResource {
    AltResource {
        url: record.primer_url.clone(),
        filetype: record.primer_filetype.clone(),
    }
}
