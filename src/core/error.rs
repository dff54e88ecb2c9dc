// Reconcile Errors
// Conditions the reconciler cannot absorb locally

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by candidate construction and reconciliation
///
/// Recoverable conditions (missing source, stale source, unconfirmed upload)
/// are reported through [`crate::core::ReconcileReport`] instead.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Local destination directory does not exist; aborts the whole run
    #[error("destination directory does not exist: {}", .0.display())]
    DestinationMissing(PathBuf),

    /// Source path has no usable final component to name the destination
    #[error("cannot derive a destination name from {}", .0.display())]
    InvalidCandidate(PathBuf),
}

impl ReconcileError {
    /// Whether this error must stop a batch
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::DestinationMissing(_))
    }
}
