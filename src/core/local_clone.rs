//! Local-Clone Path (spec §4.E): when the source is a local repository,
//! mirror its object store instead of performing a network fetch.
//!
//! Grounded in `daft::utils`'s directory helpers, generalized into a
//! recursive hardlink-or-copy walk; timestamp preservation uses `filetime`
//! (already part of the teacher's dependency stack) rather than a
//! hand-rolled `utimensat` wrapper.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::ProgressSink;

/// Whether `source_dir` (a candidate local repository's git-dir) is a
/// shallow clone, detected by the presence of a `shallow` marker file.
pub fn is_shallow(git_dir: &Path) -> bool {
    git_dir.join("shallow").exists()
}

/// Add a single `alternates` entry pointing at `source_objects_dir`
/// (§4.E "If shared").
pub fn link_shared(dest_git_dir: &Path, source_objects_dir: &Path) -> Result<()> {
    let alternates_path = dest_git_dir.join("objects").join("info").join("alternates");
    if let Some(parent) = alternates_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let mut contents = fs::read_to_string(&alternates_path).unwrap_or_default();
    if !contents.is_empty() && !contents.ends_with('\n') {
        contents.push('\n');
    }
    contents.push_str(&source_objects_dir.display().to_string());
    contents.push('\n');
    fs::write(&alternates_path, contents)
        .with_context(|| format!("failed to write {}", alternates_path.display()))
}

/// Mirror `source_objects_dir` into `dest_objects_dir` (§4.E, general case):
/// hardlink each regular file when permitted and supported, else copy
/// preserving timestamps. Recurses into subdirectories except dotfiles.
/// The `info/alternates` file is rewritten rather than copied verbatim.
pub fn mirror_object_store(
    source_objects_dir: &Path,
    dest_objects_dir: &Path,
    allow_hardlinks: bool,
    progress: &mut dyn ProgressSink,
) -> Result<()> {
    mirror_tree(source_objects_dir, dest_objects_dir, allow_hardlinks, progress)
}

/// Recursively mirror `source_dir` into `dest_dir`. Both must already exist
/// or be creatable; `dest_dir` is created if missing.
pub fn mirror_tree(
    source_dir: &Path,
    dest_dir: &Path,
    allow_hardlinks: bool,
    progress: &mut dyn ProgressSink,
) -> Result<()> {
    fs::create_dir_all(dest_dir)
        .with_context(|| format!("failed to create {}", dest_dir.display()))?;

    for entry in fs::read_dir(source_dir)
        .with_context(|| format!("failed to read {}", source_dir.display()))?
    {
        let entry = entry?;
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();
        let source_path = entry.path();
        let dest_path = dest_dir.join(&file_name);

        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            if name.starts_with('.') {
                continue;
            }
            mirror_tree(&source_path, &dest_path, allow_hardlinks, progress)?;
        } else if file_type.is_file() {
            if name == "alternates" && source_path.parent().map(|p| p.ends_with("info")).unwrap_or(false) {
                rewrite_alternates(&source_path, &dest_path, source_dir)?;
            } else {
                copy_or_link_file(&source_path, &dest_path, allow_hardlinks, progress)?;
            }
        }
    }

    Ok(())
}

fn copy_or_link_file(
    source_path: &Path,
    dest_path: &Path,
    allow_hardlinks: bool,
    progress: &mut dyn ProgressSink,
) -> Result<()> {
    if allow_hardlinks {
        match fs::hard_link(source_path, dest_path) {
            Ok(()) => return Ok(()),
            Err(e) => {
                progress.on_debug(&format!(
                    "hardlink failed for {} ({e}); falling back to copy",
                    source_path.display()
                ));
            }
        }
    }

    fs::copy(source_path, dest_path)
        .with_context(|| format!("failed to copy {}", source_path.display()))?;

    if let Ok(metadata) = fs::metadata(source_path) {
        let mtime = filetime::FileTime::from_last_modification_time(&metadata);
        let atime = filetime::FileTime::from_last_access_time(&metadata);
        let _ = filetime::set_file_times(dest_path, atime, mtime);
    }

    Ok(())
}

/// Rewrite a source `info/alternates` file into the destination's:
/// skip blank lines and comments, resolve relative paths as absolute
/// (against the source repository), and append to (not overwrite) any
/// existing destination entries.
fn rewrite_alternates(source_alternates: &Path, dest_alternates: &Path, source_objects_dir: &Path) -> Result<()> {
    let contents = fs::read_to_string(source_alternates)
        .with_context(|| format!("failed to read {}", source_alternates.display()))?;

    let mut rewritten = Vec::new();
    for line in contents.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let path = Path::new(trimmed);
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            source_objects_dir.join(path)
        };
        rewritten.push(absolute.display().to_string());
    }

    if rewritten.is_empty() {
        return Ok(());
    }

    if let Some(parent) = dest_alternates.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut existing = fs::read_to_string(dest_alternates).unwrap_or_default();
    if !existing.is_empty() && !existing.ends_with('\n') {
        existing.push('\n');
    }
    for line in rewritten {
        existing.push_str(&line);
        existing.push('\n');
    }
    fs::write(dest_alternates, existing)
        .with_context(|| format!("failed to write {}", dest_alternates.display()))
}

/// Locate the object directory for a resolved local source git-dir.
pub fn objects_dir_for(git_dir: &Path) -> PathBuf {
    git_dir.join("objects")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NullSink;
    use tempfile::tempdir;

    #[test]
    fn mirror_tree_hardlinks_regular_files() {
        let source = tempdir().unwrap();
        let dest = tempdir().unwrap();

        fs::write(source.path().join("pack-1.pack"), b"packdata").unwrap();
        fs::create_dir(source.path().join("pack")).unwrap();
        fs::write(source.path().join("pack").join("pack-2.pack"), b"more").unwrap();
        fs::create_dir(source.path().join(".hidden")).unwrap();
        fs::write(source.path().join(".hidden").join("x"), b"skip me").unwrap();

        let mut sink = NullSink;
        mirror_tree(source.path(), dest.path(), true, &mut sink).unwrap();

        assert!(dest.path().join("pack-1.pack").exists());
        assert!(dest.path().join("pack").join("pack-2.pack").exists());
        assert!(!dest.path().join(".hidden").exists());

        let source_meta = fs::metadata(source.path().join("pack-1.pack")).unwrap();
        let dest_meta = fs::metadata(dest.path().join("pack-1.pack")).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            assert_eq!(source_meta.ino(), dest_meta.ino());
        }
        let _ = (source_meta, dest_meta);
    }

    #[test]
    fn shared_adds_single_alternates_entry() {
        let source = tempdir().unwrap();
        let dest = tempdir().unwrap();
        let dest_git_dir = dest.path().join(".git");
        fs::create_dir_all(&dest_git_dir).unwrap();

        link_shared(&dest_git_dir, &source.path().join("objects")).unwrap();

        let alternates = dest_git_dir
            .join("objects")
            .join("info")
            .join("alternates");
        let contents = fs::read_to_string(alternates).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.contains("objects"));
    }

    #[test]
    fn rewrite_alternates_resolves_relative_paths() {
        let source = tempdir().unwrap();
        let dest = tempdir().unwrap();

        let source_info = source.path().join("info");
        fs::create_dir_all(&source_info).unwrap();
        fs::write(source_info.join("alternates"), "../other/objects\n# comment\n\n").unwrap();

        let dest_alternates = dest.path().join("info").join("alternates");
        rewrite_alternates(
            &source_info.join("alternates"),
            &dest_alternates,
            source.path(),
        )
        .unwrap();

        let contents = fs::read_to_string(&dest_alternates).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(Path::new(contents.lines().next().unwrap()).is_absolute());
    }

    #[test]
    fn is_shallow_detects_marker_file() {
        let dir = tempdir().unwrap();
        assert!(!is_shallow(dir.path()));
        fs::write(dir.path().join("shallow"), "").unwrap();
        assert!(is_shallow(dir.path()));
    }
}
