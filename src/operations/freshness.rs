// Freshness Gate
// Decides whether a candidate may replace what is already at its destination

use tracing::{debug, warn};

use super::destination::DestinationIo;
use super::{LocalFs, RemoteStore};
use crate::core::{FreshnessDecision, TransferCandidate};

/// Compares candidate and destination modification times
///
/// Reads metadata only. The source is expected to be an existing regular
/// file; the reconciler skips anything else before asking the gate.
pub struct FreshnessGate<'a> {
    io: DestinationIo<'a>,
    local: &'a dyn LocalFs,
}

impl<'a> FreshnessGate<'a> {
    pub fn new(local: &'a dyn LocalFs, remote: &'a dyn RemoteStore) -> Self {
        Self {
            io: DestinationIo::new(local, remote),
            local,
        }
    }

    /// Decide whether the candidate should replace its destination
    ///
    /// Equal timestamps reject: only a strictly newer candidate overwrites.
    /// Unreadable timestamps on either side also reject, keeping the
    /// destination as it is.
    pub fn evaluate(&self, candidate: &TransferCandidate) -> FreshnessDecision {
        let target = candidate.target();

        let destination_mtime = match self.io.modified(candidate) {
            Ok(None) => {
                debug!(%target, "no file at destination");
                return FreshnessDecision::AcceptNoConflict;
            }
            Ok(Some(mtime)) => mtime,
            Err(e) => {
                warn!(%target, error = %e, "cannot read destination timestamp");
                return FreshnessDecision::Reject;
            }
        };

        let source_mtime = match self.local.modification_time(candidate.source_path()) {
            Ok(mtime) => mtime,
            Err(e) => {
                warn!(source = %candidate.source_path().display(), error = %e, "cannot read source timestamp");
                return FreshnessDecision::Reject;
            }
        };

        debug!(?source_mtime, ?destination_mtime, %target, "comparing timestamps");

        if source_mtime > destination_mtime {
            FreshnessDecision::Accept
        } else {
            FreshnessDecision::Reject
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Destination;
    use crate::operations::StdFs;
    use anyhow::{bail, Result};
    use filetime::FileTime;
    use std::fs;
    use std::path::Path;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    /// Remote that only answers timestamp queries
    struct TimestampRemote(Result<Option<SystemTime>, String>);

    impl RemoteStore for TimestampRemote {
        fn reported_size(&self, _object: &str) -> Option<u64> {
            None
        }

        fn modified(&self, _object: &str) -> Result<Option<SystemTime>> {
            match &self.0 {
                Ok(mtime) => Ok(*mtime),
                Err(message) => bail!("{}", message),
            }
        }

        fn write_object(&self, _local_path: &Path, _remote_directory: &str) -> Result<()> {
            unreachable!("gate never writes")
        }

        fn fetch_object(&self, _object: &str, _local_path: &Path) -> Result<()> {
            unreachable!("gate never fetches")
        }

        fn list_objects(&self, _remote_directory: &str) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn write_with_mtime(path: &Path, secs: i64) {
        fs::write(path, "content").unwrap();
        filetime::set_file_mtime(path, FileTime::from_unix_time(secs, 0)).unwrap();
    }

    fn local_case(source_secs: i64, dest_secs: Option<i64>) -> FreshnessDecision {
        let work = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let source = work.path().join("draft.txt");
        write_with_mtime(&source, source_secs);
        if let Some(secs) = dest_secs {
            write_with_mtime(&dest.path().join("draft.txt"), secs);
        }

        let candidate = TransferCandidate::new(&source, Destination::LocalPath(dest.path().to_path_buf())).unwrap();
        let remote = TimestampRemote(Ok(None));
        FreshnessGate::new(&StdFs, &remote).evaluate(&candidate)
    }

    #[test]
    fn test_no_destination_accepts_without_conflict() {
        assert_eq!(local_case(1_000, None), FreshnessDecision::AcceptNoConflict);
    }

    #[test]
    fn test_newer_source_accepted() {
        assert_eq!(local_case(2_000, Some(1_000)), FreshnessDecision::Accept);
    }

    #[test]
    fn test_equal_mtime_rejected() {
        assert_eq!(local_case(1_000, Some(1_000)), FreshnessDecision::Reject);
    }

    #[test]
    fn test_older_source_rejected() {
        assert_eq!(local_case(1_000, Some(2_000)), FreshnessDecision::Reject);
    }

    fn remote_case(remote: TimestampRemote, source_secs: i64) -> FreshnessDecision {
        let work = tempfile::tempdir().unwrap();
        let source = work.path().join("draft.txt");
        write_with_mtime(&source, source_secs);

        let candidate = TransferCandidate::new(&source, Destination::parse("gdrive:notes")).unwrap();
        FreshnessGate::new(&StdFs, &remote).evaluate(&candidate)
    }

    #[test]
    fn test_remote_destination() {
        let at = |secs| UNIX_EPOCH + Duration::from_secs(secs);

        assert_eq!(remote_case(TimestampRemote(Ok(None)), 10), FreshnessDecision::AcceptNoConflict);
        assert_eq!(remote_case(TimestampRemote(Ok(Some(at(5)))), 10), FreshnessDecision::Accept);
        assert_eq!(remote_case(TimestampRemote(Ok(Some(at(10)))), 10), FreshnessDecision::Reject);
        assert_eq!(
            remote_case(TimestampRemote(Err("timeout".to_string())), 10),
            FreshnessDecision::Reject
        );
    }
}
