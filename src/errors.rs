//! Typed error taxonomy for the clone pipeline.
//!
//! Call sites generally still propagate failures through `anyhow::Result`
//! (matching the rest of this codebase), attaching a [`CloneError`] variant
//! with `.context()` or `anyhow::Error::from` at the point something goes
//! wrong. The handful of sites that need to branch on *kind* rather than
//! just report the message recover the variant with
//! `anyhow::Error::downcast_ref::<CloneError>()`.

use thiserror::Error;

/// The taxonomy of failures a clone can produce.
///
/// Recoverability differs by variant: a [`CloneError::Primer`] failure
/// degrades to a plain fetch unless `--resume` was requested, in which case
/// it is fatal. A [`CloneError::Checkout`] failure leaves the bare
/// repository and refs intact and is reported as a warning rather than
/// aborting the whole clone.
#[derive(Debug, Error)]
pub enum CloneError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Environment(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("could not connect to remote: {0}")]
    Connectivity(String),

    #[error("ref store error: {0}")]
    RefStore(String),

    #[error("primer failed: {0}")]
    Primer(String),

    #[error("checkout failed: {0}")]
    Checkout(String),
}

impl CloneError {
    /// Whether this failure should abandon a resumable primer but still let
    /// the clone fall back to a full fetch, versus surface directly.
    ///
    /// Per the resolved Open Question: `--resume` makes a primer failure
    /// fatal, because the whole point of resuming was to avoid re-fetching.
    pub fn primer_is_fatal(&self, resume_requested: bool) -> bool {
        matches!(self, CloneError::Primer(_)) && resume_requested
    }

    /// Whether this failure happened after ref installation, meaning the
    /// Junk Tracker should transition to `LeaveRepo` rather than `LeaveAll`.
    pub fn is_checkout_failure(&self) -> bool {
        matches!(self, CloneError::Checkout(_))
    }
}
