// Destination I/O
// Per-kind metadata reads and writes for a resolved destination file

use anyhow::{Context, Result};
use std::time::SystemTime;

use super::{LocalFs, RemoteStore};
use crate::core::{DestinationTarget, TransferCandidate};

/// Routes destination queries to the local filesystem or the remote store
pub(crate) struct DestinationIo<'a> {
    local: &'a dyn LocalFs,
    remote: &'a dyn RemoteStore,
}

impl<'a> DestinationIo<'a> {
    pub(crate) fn new(local: &'a dyn LocalFs, remote: &'a dyn RemoteStore) -> Self {
        Self { local, remote }
    }

    /// Modification time of the destination file, `Ok(None)` when nothing is there
    pub(crate) fn modified(&self, candidate: &TransferCandidate) -> Result<Option<SystemTime>> {
        match candidate.target() {
            DestinationTarget::Local(path) => {
                if !self.local.exists(&path) {
                    return Ok(None);
                }
                let mtime = self.local
                    .modification_time(&path)
                    .with_context(|| format!("Failed to read mtime of {}", path.display()))?;
                Ok(Some(mtime))
            }
            DestinationTarget::Remote(object) => self.remote.modified(&object),
        }
    }

    /// Size the destination reports, `None` when unknown
    pub(crate) fn reported_size(&self, candidate: &TransferCandidate) -> Option<u64> {
        match candidate.target() {
            DestinationTarget::Local(path) => self.local.size_bytes(&path).ok(),
            DestinationTarget::Remote(object) => self.remote.reported_size(&object),
        }
    }

    /// Issue the single logical write of the candidate's content
    pub(crate) fn write(&self, candidate: &TransferCandidate) -> Result<()> {
        let source = candidate.source_path();

        match candidate.target() {
            DestinationTarget::Local(path) => {
                self.local
                    .copy_file(source, &path)
                    .with_context(|| format!("Failed to copy {} to {}", source.display(), path.display()))?;
            }
            DestinationTarget::Remote(_) => {
                let directory = candidate
                    .destination()
                    .remote_directory()
                    .context("Remote target without a remote directory")?;
                self.remote.write_object(source, &directory)?;
            }
        }

        Ok(())
    }
}
