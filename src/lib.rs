// Remote Edit Library
// Edit files on remote storage and reconcile them back with verified uploads

// Core infrastructure - data model, errors, configuration
pub mod core;

// Operations - freshness gate, verified transfer, reconciliation, rclone and mounts
pub mod operations;

// UI - file picker and editor launcher
pub mod ui;

// Utilities - helper functions and tools
pub mod utilities;

// Application constants
pub mod constants;

// Re-export commonly used items for convenience
pub use self::core::{
    Destination, FreshnessDecision, ReconcileError, ReconcileReport, ReconcileState, Settings,
    TransferCandidate, TransferOutcome,
};
pub use operations::{EditSession, FreshnessGate, Reconciler, RetryPolicy, VerifiedTransfer};
