use std::fs;

use gitclone::core::junk::JunkTracker;
use gitclone::core::model::{JunkMode, ResumeRecord};
use serial_test::serial;

/// `LeaveResumable` cleanup must persist a parseable resume record into the
/// registered git dir, so a later `--resume` invocation can recover the
/// primer URL and filetype.
#[test]
#[serial]
fn leave_resumable_writes_a_recoverable_record() {
    let dir = tempfile::tempdir().unwrap();
    let git_dir = dir.path().join(".git");
    fs::create_dir(&git_dir).unwrap();

    JunkTracker::register(git_dir.clone(), Some(dir.path().to_path_buf()));
    JunkTracker::set_resume_record(Some(ResumeRecord {
        primer_url: "https://example.com/repo.pack".to_string(),
        primer_filetype: "pack".to_string(),
    }));
    JunkTracker::advance(JunkMode::LeaveResumable);
    JunkTracker::run_cleanup();

    let contents = fs::read_to_string(git_dir.join("resumable")).unwrap();
    let record: ResumeRecord = contents.parse().unwrap();
    assert_eq!(record.primer_url, "https://example.com/repo.pack");
    assert_eq!(record.primer_filetype, "pack");

    // Both the working tree and the git dir must survive at this mode.
    assert!(dir.path().exists());
    assert!(git_dir.exists());
}

/// `JunkMode::None` cleanup (the default, unregistered-success state) must
/// remove everything it was told about, since nothing reached a point
/// worth resuming from.
#[test]
#[serial]
fn none_mode_cleanup_removes_everything() {
    let dir = tempfile::tempdir().unwrap();
    let work_tree = dir.path().join("work");
    let git_dir = work_tree.join(".git");
    fs::create_dir_all(&git_dir).unwrap();

    JunkTracker::register(git_dir.clone(), Some(work_tree.clone()));
    JunkTracker::set_resume_record(None);
    JunkTracker::run_cleanup();

    assert!(!work_tree.exists());
}

/// A resume record with a missing filetype line must fail to parse rather
/// than silently defaulting, since an incomplete record can't safely drive
/// primer re-adoption.
#[test]
fn resume_record_rejects_missing_filetype_line() {
    let result: Result<ResumeRecord, _> = "https://example.com/repo.pack\n".parse();
    assert!(result.is_err());
}

/// A resume record with a blank first line (e.g. a truncated write from an
/// interrupted cleanup) must also fail to parse.
#[test]
fn resume_record_rejects_blank_url_line() {
    let result: Result<ResumeRecord, _> = "\npack\n".parse();
    assert!(result.is_err());
}
