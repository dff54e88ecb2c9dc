// Verified Transfer
// Writes an accepted candidate and polls the destination until its size matches

use anyhow::{bail, Result};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::destination::DestinationIo;
use super::{LocalFs, RemoteStore};
use crate::core::{TransferCandidate, TransferOutcome};

/// Confirmation polling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Upper bound on confirmation polling before declaring failure
    pub max_attempts: u32,
    /// Fixed wait between polls, no exponential backoff
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retry_delay: Duration::from_secs(3),
        }
    }
}

impl RetryPolicy {
    /// Create a policy, rejecting a zero attempt budget
    pub fn new(max_attempts: u32, retry_delay: Duration) -> Result<Self> {
        if max_attempts == 0 {
            bail!("max_attempts must be at least 1");
        }

        Ok(Self {
            max_attempts,
            retry_delay,
        })
    }
}

/// Performs the write for an accepted candidate and confirms it by size
pub struct VerifiedTransfer<'a> {
    io: DestinationIo<'a>,
    local: &'a dyn LocalFs,
}

impl<'a> VerifiedTransfer<'a> {
    pub fn new(local: &'a dyn LocalFs, remote: &'a dyn RemoteStore) -> Self {
        Self {
            io: DestinationIo::new(local, remote),
            local,
        }
    }

    /// Write the candidate and poll until the destination size matches
    ///
    /// Never fails: an unreadable source, a failed write and failed size
    /// queries all surface as an unconfirmed outcome. A failed write skips
    /// polling, since an older file of the same size may still sit at the
    /// destination. The source is left untouched; deleting it is the
    /// caller's decision.
    pub fn execute(&self, candidate: &TransferCandidate, policy: &RetryPolicy) -> TransferOutcome {
        let target = candidate.target();
        let max_attempts = policy.max_attempts.max(1);

        // Read before the write so the size is known even if the write moves data
        let local_size_bytes = match self.local.size_bytes(candidate.source_path()) {
            Ok(size) => size,
            Err(e) => {
                warn!(source = %candidate.source_path().display(), error = %e, "cannot read source size");
                0
            }
        };

        info!(%target, bytes = local_size_bytes, "uploading");
        if let Err(e) = self.io.write(candidate) {
            warn!(%target, error = %e, "write failed; local copy kept");
            return TransferOutcome {
                success: false,
                attempts_used: 0,
                local_size_bytes,
                remote_size_bytes: 0,
            };
        }

        let mut remote_size_bytes = 0;

        for attempt in 1..=max_attempts {
            match self.io.reported_size(candidate) {
                Some(size) => {
                    remote_size_bytes = size;
                    if size > 0 && size == local_size_bytes {
                        info!(%target, attempt, bytes = size, "upload confirmed");
                        return TransferOutcome {
                            success: true,
                            attempts_used: attempt,
                            local_size_bytes,
                            remote_size_bytes,
                        };
                    }
                    debug!(%target, attempt, local = local_size_bytes, remote = size, "size mismatch");
                }
                None => debug!(%target, attempt, "destination size not available yet"),
            }

            if attempt < max_attempts {
                thread::sleep(policy.retry_delay);
            }
        }

        warn!(
            %target,
            attempts = max_attempts,
            local = local_size_bytes,
            remote = remote_size_bytes,
            "upload not confirmed"
        );

        TransferOutcome {
            success: false,
            attempts_used: max_attempts,
            local_size_bytes,
            remote_size_bytes,
        }
    }
}
