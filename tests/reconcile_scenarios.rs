// Reconciliation scenarios against local and scripted remote destinations

mod common;

use filetime::FileTime;
use std::fs;
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime};

use common::{at, write_file, ScriptedRemote};
use remote_edit::core::{BatchSummary, SkipReason};
use remote_edit::operations::{LocalFs, StdFs};
use remote_edit::{
    Destination, FreshnessDecision, FreshnessGate, ReconcileError, ReconcileState, Reconciler,
    RetryPolicy, TransferCandidate, VerifiedTransfer,
};

const T1: i64 = 1_700_000_000;
const T2: i64 = 1_700_000_600;

fn policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(max_attempts, Duration::ZERO).unwrap()
}

fn remote_dest() -> Destination {
    Destination::parse("gdrive:notes")
}

/// Local filesystem whose copies always fail
struct FullDisk;

impl LocalFs for FullDisk {
    fn exists(&self, path: &Path) -> bool {
        StdFs.exists(path)
    }
    fn is_regular_file(&self, path: &Path) -> bool {
        StdFs.is_regular_file(path)
    }
    fn is_dir(&self, path: &Path) -> bool {
        StdFs.is_dir(path)
    }
    fn modification_time(&self, path: &Path) -> io::Result<SystemTime> {
        StdFs.modification_time(path)
    }
    fn size_bytes(&self, path: &Path) -> io::Result<u64> {
        StdFs.size_bytes(path)
    }
    fn move_file(&self, src: &Path, dst: &Path) -> io::Result<()> {
        StdFs.move_file(src, dst)
    }
    fn copy_file(&self, _src: &Path, _dst: &Path) -> io::Result<u64> {
        Err(io::Error::new(io::ErrorKind::Other, "No space left on device"))
    }
    fn remove(&self, path: &Path) -> io::Result<()> {
        StdFs.remove(path)
    }
}

#[test]
fn scenario_a_missing_local_destination_aborts_before_touching_files() {
    let work = tempfile::tempdir().unwrap();
    let first = work.path().join("first.txt");
    let second = work.path().join("second.txt");
    write_file(&first, 10, T1);
    write_file(&second, 10, T1);
    let remote = ScriptedRemote::new(vec![]);

    let result = Reconciler::new(&StdFs, &remote, policy(5))
        .reconcile_batch(&[&first, &second], &Destination::LocalPath(work.path().join("absent")));

    assert!(matches!(result, Err(ReconcileError::DestinationMissing(_))));
    assert!(first.exists());
    assert!(second.exists());
    assert!(remote.writes.borrow().is_empty());
}

#[test]
fn scenario_b_newer_source_confirmed_and_removed() {
    let work = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let source = work.path().join("draft.txt");
    write_file(&source, 500, T2);
    write_file(&dest.path().join("draft.txt"), 120, T1);
    let remote = ScriptedRemote::new(vec![]);

    let candidate = TransferCandidate::new(&source, Destination::LocalPath(dest.path().to_path_buf())).unwrap();
    let report = Reconciler::new(&StdFs, &remote, policy(5)).reconcile(&candidate).unwrap();

    assert_eq!(report.decision, Some(FreshnessDecision::Accept));
    assert_eq!(report.state, ReconcileState::Confirmed);
    let outcome = report.transfer.unwrap();
    assert_eq!(outcome.attempts_used, 1);
    assert_eq!(outcome.local_size_bytes, 500);
    assert_eq!(outcome.remote_size_bytes, 500);
    assert!(!source.exists());
    assert_eq!(fs::metadata(dest.path().join("draft.txt")).unwrap().len(), 500);
}

#[test]
fn scenario_b_remote_destination() {
    let work = tempfile::tempdir().unwrap();
    let source = work.path().join("draft.txt");
    write_file(&source, 500, T2);
    let remote = ScriptedRemote::new(vec![Some(500)]).with_existing(at(T1 as u64));

    let candidate = TransferCandidate::new(&source, remote_dest()).unwrap();
    let report = Reconciler::new(&StdFs, &remote, policy(5)).reconcile(&candidate).unwrap();

    assert_eq!(report.state, ReconcileState::Confirmed);
    assert_eq!(report.transfer.unwrap().attempts_used, 1);
    assert_eq!(remote.writes.borrow().as_slice(), &[(source.clone(), "gdrive:notes".to_string())]);
    assert!(!source.exists());
}

#[test]
fn scenario_c_older_source_rejected_without_transfer() {
    let work = tempfile::tempdir().unwrap();
    let source = work.path().join("draft.txt");
    write_file(&source, 500, T1);
    let remote = ScriptedRemote::new(vec![Some(500)]).with_existing(at(T2 as u64));

    let candidate = TransferCandidate::new(&source, remote_dest()).unwrap();
    let report = Reconciler::new(&StdFs, &remote, policy(5)).reconcile(&candidate).unwrap();

    assert_eq!(report.state, ReconcileState::Skipped);
    assert_eq!(report.skip_reason, Some(SkipReason::Stale));
    assert_eq!(report.decision, Some(FreshnessDecision::Reject));
    assert!(report.transfer.is_none());
    assert!(source.exists());
    assert!(remote.writes.borrow().is_empty());
    assert_eq!(remote.size_queries.get(), 0);
}

#[test]
fn scenario_d_confirms_on_last_attempt() {
    let work = tempfile::tempdir().unwrap();
    let source = work.path().join("draft.txt");
    write_file(&source, 500, T2);
    let remote = ScriptedRemote::new(vec![Some(0), Some(0), Some(0), Some(0), Some(500)]);

    let candidate = TransferCandidate::new(&source, remote_dest()).unwrap();
    let report = Reconciler::new(&StdFs, &remote, policy(5)).reconcile(&candidate).unwrap();

    assert_eq!(report.decision, Some(FreshnessDecision::AcceptNoConflict));
    assert_eq!(report.state, ReconcileState::Confirmed);
    assert_eq!(report.transfer.unwrap().attempts_used, 5);
    assert_eq!(remote.size_queries.get(), 5);
    assert!(!source.exists());
}

#[test]
fn scenario_e_never_confirmed_keeps_source() {
    let work = tempfile::tempdir().unwrap();
    let source = work.path().join("draft.txt");
    write_file(&source, 500, T2);
    let remote = ScriptedRemote::new(vec![None, Some(0), Some(499), Some(501), None]);

    let candidate = TransferCandidate::new(&source, remote_dest()).unwrap();
    let report = Reconciler::new(&StdFs, &remote, policy(5)).reconcile(&candidate).unwrap();

    assert_eq!(report.state, ReconcileState::Exhausted);
    let outcome = report.transfer.unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.attempts_used, 5);
    assert_eq!(outcome.remote_size_bytes, 501);
    assert!(report.local_retained());
    assert!(source.exists());
}

#[test]
fn single_attempt_checks_size_once() {
    let work = tempfile::tempdir().unwrap();
    let source = work.path().join("draft.txt");
    write_file(&source, 500, T2);
    let remote = ScriptedRemote::new(vec![Some(0), Some(500)]);

    let candidate = TransferCandidate::new(&source, remote_dest()).unwrap();
    let outcome = VerifiedTransfer::new(&StdFs, &remote).execute(&candidate, &policy(1));

    assert!(!outcome.success);
    assert_eq!(outcome.attempts_used, 1);
    assert_eq!(remote.size_queries.get(), 1);
}

#[test]
fn retry_delay_applies_between_polls_only() {
    let work = tempfile::tempdir().unwrap();
    let source = work.path().join("draft.txt");
    write_file(&source, 10, T2);
    let remote = ScriptedRemote::new(vec![Some(0), Some(10)]);

    let candidate = TransferCandidate::new(&source, remote_dest()).unwrap();
    let delay = RetryPolicy::new(2, Duration::from_millis(50)).unwrap();
    let started = std::time::Instant::now();
    let outcome = VerifiedTransfer::new(&StdFs, &remote).execute(&candidate, &delay);

    assert!(outcome.success);
    assert_eq!(outcome.attempts_used, 2);
    assert!(started.elapsed() >= Duration::from_millis(50));
}

#[test]
fn failed_upload_keeps_source_even_when_sizes_match() {
    let work = tempfile::tempdir().unwrap();
    let source = work.path().join("draft.txt");
    write_file(&source, 42, T2);
    // An older object of the same size is already there
    let remote = ScriptedRemote::new(vec![Some(42)])
        .with_existing(at(T1 as u64))
        .with_failing_writes();

    let candidate = TransferCandidate::new(&source, remote_dest()).unwrap();
    let report = Reconciler::new(&StdFs, &remote, policy(3)).reconcile(&candidate).unwrap();

    assert_eq!(report.decision, Some(FreshnessDecision::Accept));
    assert_eq!(report.state, ReconcileState::Exhausted);
    assert_eq!(report.transfer.unwrap().attempts_used, 0);
    assert_eq!(remote.size_queries.get(), 0);
    assert!(source.exists());
}

#[test]
fn failed_local_copy_keeps_source_and_old_destination() {
    let work = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let source = work.path().join("note.txt");
    let existing = dest.path().join("note.txt");
    fs::write(&source, "hello world\n").unwrap();
    fs::write(&existing, "hello there\n").unwrap();
    filetime::set_file_mtime(&source, FileTime::from_unix_time(T2, 0)).unwrap();
    filetime::set_file_mtime(&existing, FileTime::from_unix_time(T1, 0)).unwrap();
    let remote = ScriptedRemote::new(vec![]);

    let candidate = TransferCandidate::new(&source, Destination::LocalPath(dest.path().to_path_buf())).unwrap();
    let report = Reconciler::new(&FullDisk, &remote, policy(3)).reconcile(&candidate).unwrap();

    assert_eq!(report.state, ReconcileState::Exhausted);
    assert!(report.local_retained());
    assert_eq!(fs::read_to_string(&source).unwrap(), "hello world\n");
    assert_eq!(fs::read_to_string(&existing).unwrap(), "hello there\n");
}

#[test]
fn confirmed_transfer_is_idempotent() {
    let work = tempfile::tempdir().unwrap();
    let source = work.path().join("draft.txt");
    write_file(&source, 500, T2);
    let remote = ScriptedRemote::new(vec![Some(500)]);
    let reconciler = Reconciler::new(&StdFs, &remote, policy(5));
    let candidate = TransferCandidate::new(&source, remote_dest()).unwrap();

    let first = reconciler.reconcile(&candidate).unwrap();
    let second = reconciler.reconcile(&candidate).unwrap();

    assert_eq!(first.state, ReconcileState::Confirmed);
    assert_eq!(second.state, ReconcileState::Skipped);
    assert_eq!(second.skip_reason, Some(SkipReason::NotRegularFile));
    assert_eq!(remote.writes.borrow().len(), 1);
    assert!(!source.exists());
}

#[test]
fn gate_equal_mtime_rejects_and_missing_destination_accepts() {
    let work = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let remote = ScriptedRemote::new(vec![]);
    let gate = FreshnessGate::new(&StdFs, &remote);

    for (index, dest_mtime) in [None, Some(T1), Some(T2)].into_iter().enumerate() {
        let name = format!("file{}.txt", index);
        let source = work.path().join(&name);
        write_file(&source, 5, T2);
        if let Some(mtime) = dest_mtime {
            write_file(&dest.path().join(&name), 5, mtime);
        }

        let candidate = TransferCandidate::new(&source, Destination::LocalPath(dest.path().to_path_buf())).unwrap();
        let expected = match dest_mtime {
            None => FreshnessDecision::AcceptNoConflict,
            Some(T1) => FreshnessDecision::Accept,
            Some(_) => FreshnessDecision::Reject,
        };
        assert_eq!(gate.evaluate(&candidate), expected, "destination mtime {:?}", dest_mtime);
    }
}

#[test]
fn batch_mixes_outcomes() {
    let work = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let fresh = work.path().join("fresh.txt");
    let stale = work.path().join("stale.txt");
    let empty = work.path().join("empty.txt");
    write_file(&fresh, 30, T2);
    write_file(&stale, 30, T1);
    write_file(&dest.path().join("stale.txt"), 10, T2);
    write_file(&empty, 0, T2);
    let remote = ScriptedRemote::new(vec![]);

    let summary: BatchSummary = Reconciler::new(&StdFs, &remote, policy(2))
        .reconcile_batch(
            &[&fresh, &stale, &empty, &work.path().join("missing.txt")],
            &Destination::LocalPath(dest.path().to_path_buf()),
        )
        .unwrap();

    assert_eq!(summary.confirmed, 1);
    assert_eq!(summary.exhausted, 1);
    assert_eq!(summary.skipped, 2);
    assert!(!fresh.exists());
    assert!(stale.exists());
    assert!(empty.exists());
    assert!(!summary.all_settled());
}
