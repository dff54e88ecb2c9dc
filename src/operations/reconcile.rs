// Reconciler
// Runs the freshness gate and verified transfer for one or many candidates

use std::path::Path;
use tracing::{debug, error, info, warn};

use super::{FreshnessGate, LocalFs, RemoteStore, RetryPolicy, VerifiedTransfer};
use crate::core::{
    BatchSummary, Destination, FreshnessDecision, ReconcileError, ReconcileReport, ReconcileState,
    SkipReason, TransferCandidate,
};

/// Reconciles locally edited files back to their destination
///
/// The local source is deleted only after a confirmed transfer; every other
/// outcome leaves it in place.
pub struct Reconciler<'a> {
    local: &'a dyn LocalFs,
    remote: &'a dyn RemoteStore,
    policy: RetryPolicy,
}

impl<'a> Reconciler<'a> {
    pub fn new(local: &'a dyn LocalFs, remote: &'a dyn RemoteStore, policy: RetryPolicy) -> Self {
        Self { local, remote, policy }
    }

    /// Fail fast when a local destination directory is missing
    ///
    /// Remote destinations are created on write and are not checked.
    pub fn check_destination(&self, destination: &Destination) -> Result<(), ReconcileError> {
        match destination {
            Destination::LocalPath(dir) if !self.local.is_dir(dir) => {
                error!(destination = %dir.display(), "destination directory does not exist");
                Err(ReconcileError::DestinationMissing(dir.clone()))
            }
            _ => Ok(()),
        }
    }

    /// Reconcile a single candidate
    pub fn reconcile(&self, candidate: &TransferCandidate) -> Result<ReconcileReport, ReconcileError> {
        self.check_destination(candidate.destination())?;
        Ok(self.reconcile_checked(candidate))
    }

    /// Reconcile several files into one destination, continuing past skips and failures
    pub fn reconcile_batch<P: AsRef<Path>>(
        &self,
        sources: &[P],
        destination: &Destination,
    ) -> Result<BatchSummary, ReconcileError> {
        self.check_destination(destination)?;

        let mut summary = BatchSummary::default();

        for source in sources {
            let source = source.as_ref();
            match TransferCandidate::new(source, destination.clone()) {
                Ok(candidate) => summary.record(self.reconcile_checked(&candidate)),
                Err(e) => {
                    warn!(source = %source.display(), error = %e, "skipping");
                    summary.errors.push(format!("{}: {}", source.display(), e));
                }
            }
        }

        info!(
            confirmed = summary.confirmed,
            exhausted = summary.exhausted,
            skipped = summary.skipped,
            "batch finished"
        );

        Ok(summary)
    }

    fn reconcile_checked(&self, candidate: &TransferCandidate) -> ReconcileReport {
        let source = candidate.source_path().to_path_buf();
        let target = candidate.target();

        if !self.local.is_regular_file(&source) {
            transition(&source, ReconcileState::Idle, ReconcileState::Skipped);
            info!(source = %source.display(), "not a regular file; skipping");
            return ReconcileReport::skipped(source, SkipReason::NotRegularFile, None);
        }

        let decision = FreshnessGate::new(self.local, self.remote).evaluate(candidate);

        if !decision.allows_transfer() {
            transition(&source, ReconcileState::Idle, ReconcileState::Skipped);
            warn!(
                source = %source.display(),
                %target,
                "destination is as new or newer; keeping local copy"
            );
            return ReconcileReport::skipped(source, SkipReason::Stale, Some(decision));
        }

        transition(&source, ReconcileState::Idle, ReconcileState::Gated);
        match decision {
            FreshnessDecision::AcceptNoConflict => info!(%target, "no existing file at destination"),
            _ => info!(%target, "local copy is newer than destination"),
        }

        transition(&source, ReconcileState::Gated, ReconcileState::Transferring);
        let outcome = VerifiedTransfer::new(self.local, self.remote).execute(candidate, &self.policy);

        if !outcome.success {
            transition(&source, ReconcileState::Transferring, ReconcileState::Exhausted);
            warn!(
                source = %source.display(),
                attempts = outcome.attempts_used,
                "could not confirm upload; local copy kept as backup"
            );
            return ReconcileReport::transferred(source, decision, outcome, false);
        }

        transition(&source, ReconcileState::Transferring, ReconcileState::Confirmed);
        let source_removed = self.remove_source(&source);

        ReconcileReport::transferred(source, decision, outcome, source_removed)
    }

    fn remove_source(&self, source: &Path) -> bool {
        match self.local.remove(source) {
            Ok(()) => {
                info!(source = %source.display(), "removed local copy");
                true
            }
            Err(e) => {
                warn!(source = %source.display(), error = %e, "upload confirmed but local copy could not be removed");
                false
            }
        }
    }
}

fn transition(source: &Path, from: ReconcileState, to: ReconcileState) {
    debug!(source = %source.display(), ?from, ?to, "state transition");
}
