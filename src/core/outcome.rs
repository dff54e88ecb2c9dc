// Reconcile Outcomes
// Decisions, transfer results and per-candidate reports

use std::path::PathBuf;

/// Result of comparing a candidate against its destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessDecision {
    /// Destination exists and the candidate is strictly newer
    Accept,
    /// Destination exists and is at least as new as the candidate
    Reject,
    /// Nothing at the destination yet
    AcceptNoConflict,
}

impl FreshnessDecision {
    /// Whether the candidate may proceed to transfer
    pub fn allows_transfer(self) -> bool {
        !matches!(self, Self::Reject)
    }
}

/// What a verified transfer observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOutcome {
    /// Destination size matched the source size
    pub success: bool,
    /// Number of size checks performed
    pub attempts_used: u32,
    /// Source size, read before the write
    pub local_size_bytes: u64,
    /// Last destination size observed (0 if never reported)
    pub remote_size_bytes: u64,
}

/// Reconciliation flow states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileState {
    Idle,
    Gated,
    Transferring,
    Confirmed,
    Exhausted,
    Skipped,
}

impl ReconcileState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmed | Self::Exhausted | Self::Skipped)
    }
}

/// Why a candidate was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Source is missing or not a regular file
    NotRegularFile,
    /// Destination is at least as new as the source
    Stale,
}

/// Terminal report for one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub source_path: PathBuf,
    pub state: ReconcileState,
    pub decision: Option<FreshnessDecision>,
    pub skip_reason: Option<SkipReason>,
    pub transfer: Option<TransferOutcome>,
    /// Whether the local source was removed after confirmation
    pub source_removed: bool,
}

impl ReconcileReport {
    pub(crate) fn skipped(
        source_path: PathBuf,
        reason: SkipReason,
        decision: Option<FreshnessDecision>,
    ) -> Self {
        Self {
            source_path,
            state: ReconcileState::Skipped,
            decision,
            skip_reason: Some(reason),
            transfer: None,
            source_removed: false,
        }
    }

    pub(crate) fn transferred(
        source_path: PathBuf,
        decision: FreshnessDecision,
        outcome: TransferOutcome,
        source_removed: bool,
    ) -> Self {
        let state = if outcome.success {
            ReconcileState::Confirmed
        } else {
            ReconcileState::Exhausted
        };

        Self {
            source_path,
            state,
            decision: Some(decision),
            skip_reason: None,
            transfer: Some(outcome),
            source_removed,
        }
    }

    /// Whether the local file is still present as a backup
    pub fn local_retained(&self) -> bool {
        !self.source_removed
    }
}

/// Result of reconciling several candidates
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Number of candidates confirmed at the destination
    pub confirmed: usize,
    /// Number of candidates whose upload could not be confirmed
    pub exhausted: usize,
    /// Number of candidates skipped (missing or stale)
    pub skipped: usize,
    /// Per-candidate reports in input order
    pub reports: Vec<ReconcileReport>,
    /// Candidates that could not be built, with the reason
    pub errors: Vec<String>,
}

impl BatchSummary {
    pub(crate) fn record(&mut self, report: ReconcileReport) {
        match report.state {
            ReconcileState::Confirmed => self.confirmed += 1,
            ReconcileState::Exhausted => self.exhausted += 1,
            _ => self.skipped += 1,
        }
        self.reports.push(report);
    }

    /// True when every candidate either confirmed or was skipped
    pub fn all_settled(&self) -> bool {
        self.exhausted == 0 && self.errors.is_empty()
    }
}
