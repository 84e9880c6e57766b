//! Junk Tracker (spec §4.B): process-wide state deciding what survives a
//! normal exit or a fatal signal.
//!
//! Grounded in the `daft::core::worktree::clone` cleanup-on-error idiom
//! (remove the partially created directory when a step fails), generalized
//! into an explicit state machine and made signal-aware the way
//! `signal-hook`/`nix` are used for termination bookkeeping in the
//! `worktrunk` test harness.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use super::model::{JunkMode, ResumeRecord};
use crate::config::primer::RESUME_RECORD_FILE;

struct JunkState {
    git_dir: Option<PathBuf>,
    work_tree: Option<PathBuf>,
    mode: JunkMode,
    resume_record: Option<ResumeRecord>,
}

impl Default for JunkState {
    fn default() -> Self {
        Self {
            git_dir: None,
            work_tree: None,
            mode: JunkMode::None,
            resume_record: None,
        }
    }
}

/// The process-wide Junk Tracker singleton.
///
/// A `Mutex` rather than bare atomics because cleanup touches multiple
/// fields together and must run to completion without a concurrent signal
/// handler observing a half-updated state.
pub struct JunkTracker {
    state: Mutex<JunkState>,
}

static TRACKER: OnceLock<JunkTracker> = OnceLock::new();

impl JunkTracker {
    fn global() -> &'static JunkTracker {
        TRACKER.get_or_init(|| JunkTracker {
            state: Mutex::new(JunkState::default()),
        })
    }

    /// Register the git-dir (and, for non-bare clones, the work-tree) as
    /// junk to delete unless a later step raises the mode.
    pub fn register(git_dir: PathBuf, work_tree: Option<PathBuf>) {
        let tracker = Self::global();
        let mut state = tracker.state.lock().unwrap();
        state.git_dir = Some(git_dir);
        state.work_tree = work_tree;
    }

    /// Attempt to advance the mode. No-op (and logged at debug level) if
    /// `next` would regress the current mode.
    pub fn advance(next: JunkMode) {
        let tracker = Self::global();
        let mut state = tracker.state.lock().unwrap();
        if !state.mode.advance_to(next) {
            log::debug!(
                "junk tracker: ignoring regression from {:?} to {:?}",
                state.mode,
                next
            );
        }
    }

    /// Record the primer's advertised URL/filetype so cleanup can persist a
    /// `ResumeRecord` if interrupted mid-primer-adoption.
    pub fn set_resume_record(record: Option<ResumeRecord>) {
        let tracker = Self::global();
        let mut state = tracker.state.lock().unwrap();
        state.resume_record = record;
    }

    pub fn current_mode() -> JunkMode {
        Self::global().state.lock().unwrap().mode
    }

    /// Force the mode backward. The only caller is the Primer Subsystem's
    /// Abandon path (§4.D), which regresses `LeaveResumable -> None` when a
    /// not-yet-adopted primer is discarded.
    pub fn force_mode(next: JunkMode) {
        let tracker = Self::global();
        let mut state = tracker.state.lock().unwrap();
        state.mode.force_to(next);
    }

    /// Execute the cleanup policy table from §4.B. Idempotent: calling this
    /// more than once (e.g. once from the signal handler, once from normal
    /// `main` exit) is safe because the Mutex serializes it and the second
    /// call finds nothing left to do for `None`/`LeaveResumable`.
    pub fn run_cleanup() {
        let tracker = Self::global();
        let state = tracker.state.lock().unwrap();
        match state.mode {
            JunkMode::None => {
                if let Some(dir) = &state.work_tree {
                    let _ = std::fs::remove_dir_all(dir);
                }
                if let Some(dir) = &state.git_dir {
                    let _ = std::fs::remove_dir_all(dir);
                }
            }
            JunkMode::LeaveResumable => {
                if let (Some(git_dir), Some(record)) = (&state.git_dir, &state.resume_record) {
                    let path = git_dir.join(RESUME_RECORD_FILE);
                    if let Err(e) = std::fs::write(&path, record.to_string()) {
                        log::error!("failed to write resume record to {}: {e}", path.display());
                    } else {
                        eprintln!(
                            "clone interrupted; run with --resume to continue ({})",
                            git_dir.display()
                        );
                    }
                }
            }
            JunkMode::LeaveRepo => {
                if let Some(git_dir) = &state.git_dir {
                    eprintln!(
                        "checkout did not complete, but the repository at {} is usable",
                        git_dir.display()
                    );
                }
            }
            JunkMode::LeaveAll => {}
        }
    }

    /// Remove a `ResumeRecord` file left by a prior interrupted run, on
    /// successful completion (§4.F step 14, invariant 2).
    pub fn remove_resume_record(git_dir: &std::path::Path) {
        let path = git_dir.join(RESUME_RECORD_FILE);
        let _ = std::fs::remove_file(path);
    }
}

/// Install the termination-signal handler that drives cleanup on `SIGINT`
/// and `SIGTERM`.
///
/// The handler blocks other instances of itself by running cleanup under
/// the tracker's mutex (re-entry during cleanup simply waits, rather than
/// re-entering), then calls `emulate_default_handler` so the process's exit
/// status still reflects the signal, per POSIX convention and per §4.B /
/// §5 "Cancellation".
///
/// Before spawning the dedicated handler thread, these signals are blocked
/// on the calling thread via `pthread_sigmask` — threads spawned afterward
/// inherit that mask, so the `Signals` iterator below is the only place in
/// the process that ever observes them.
#[cfg(unix)]
pub fn install_signal_handler() -> anyhow::Result<()> {
    use anyhow::Context;
    use nix::sys::signal::{self, SigSet, Signal, SigmaskHow};
    use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut mask = SigSet::empty();
    mask.add(Signal::SIGINT);
    mask.add(Signal::SIGTERM);
    mask.add(Signal::SIGHUP);
    signal::pthread_sigmask(SigmaskHow::SIG_BLOCK, Some(&mask), None)
        .context("failed to block termination signals on the main thread")?;

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])?;
    std::thread::spawn(move || {
        for signal in signals.forever() {
            JunkTracker::run_cleanup();
            let _ = signal_hook::low_level::emulate_default_handler(signal);
        }
    });
    Ok(())
}

#[cfg(not(unix))]
pub fn install_signal_handler() -> anyhow::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::JunkMode;

    #[test]
    fn advance_is_monotonic_via_model() {
        let mut mode = JunkMode::None;
        assert!(mode.advance_to(JunkMode::LeaveRepo));
        assert!(!mode.advance_to(JunkMode::None));
    }
}
