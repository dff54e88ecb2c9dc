// Edit Session
// List remote files, pick one, edit a local working copy, reconcile it back

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::{LocalFs, Reconciler, RemoteStore, RetryPolicy};
use crate::constants::DOWNLOAD_SUFFIX;
use crate::core::{Destination, ReconcileReport, TransferCandidate};
use crate::ui::{Editor, Picker};
use crate::utilities::PatternMatcher;

/// How an edit session ended
#[derive(Debug)]
pub enum SessionOutcome {
    /// The remote directory had nothing to pick
    NothingToEdit,
    /// The user backed out of the picker
    Cancelled,
    /// The working copy went through reconciliation
    Reconciled(ReconcileReport),
}

/// One pick-edit-reconcile cycle against a remote directory
pub struct EditSession<'a> {
    local: &'a dyn LocalFs,
    remote: &'a dyn RemoteStore,
    destination: Destination,
    work_dir: PathBuf,
    /// Local view of the remote, used for downloads when present
    mounted_at: Option<PathBuf>,
    excludes: PatternMatcher,
    policy: RetryPolicy,
}

impl<'a> EditSession<'a> {
    pub fn new(
        local: &'a dyn LocalFs,
        remote: &'a dyn RemoteStore,
        destination: Destination,
        work_dir: impl Into<PathBuf>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            local,
            remote,
            destination,
            work_dir: work_dir.into(),
            mounted_at: None,
            excludes: PatternMatcher::default(),
            policy,
        }
    }

    /// Read files through a mounted copy of the destination directory
    pub fn with_mount(mut self, mounted_at: impl Into<PathBuf>) -> Self {
        self.mounted_at = Some(mounted_at.into());
        self
    }

    /// Hide names matching these patterns from the picker
    pub fn with_excludes(mut self, patterns: Vec<String>) -> Self {
        self.excludes = PatternMatcher::new(patterns);
        self
    }

    /// Editable names in the destination, excludes applied
    pub fn list(&self) -> Result<Vec<String>> {
        let names = match (&self.mounted_at, &self.destination) {
            (Some(mount), _) => list_directory(mount)?,
            (None, Destination::RemoteStore { .. }) => {
                let directory = self
                    .destination
                    .remote_directory()
                    .context("Remote destination without a directory")?;
                self.remote.list_objects(&directory)?
            }
            (None, Destination::LocalPath(dir)) => list_directory(dir)?,
        };

        Ok(self.excludes.filter(names))
    }

    /// Run the whole cycle with the given picker and editor
    pub fn run(&self, picker: &mut dyn Picker, editor: &dyn Editor) -> Result<SessionOutcome> {
        let names = self.list()?;
        if names.is_empty() {
            info!(destination = %self.destination, "no files found");
            return Ok(SessionOutcome::NothingToEdit);
        }

        let Some(index) = picker.pick(&names)? else {
            info!("selection cancelled");
            return Ok(SessionOutcome::Cancelled);
        };
        let name = names
            .get(index)
            .with_context(|| format!("Picker returned out-of-range index {}", index))?;

        let working_copy = self.prepare_working_copy(name)?;

        editor.edit(&working_copy)?;

        let candidate = TransferCandidate::new(&working_copy, self.destination.clone())?;
        let report = Reconciler::new(self.local, self.remote, self.policy).reconcile(&candidate)?;

        if report.local_retained() {
            info!(working_copy = %working_copy.display(), "local copy kept");
        }

        Ok(SessionOutcome::Reconciled(report))
    }

    /// Download `name` into the work directory, or reuse a copy left by an earlier session
    fn prepare_working_copy(&self, name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.work_dir)
            .with_context(|| format!("Failed to create work directory: {}", self.work_dir.display()))?;

        let working_copy = self.work_dir.join(name);

        if self.local.is_regular_file(&working_copy) {
            warn!(
                working_copy = %working_copy.display(),
                "reusing local copy from an earlier session"
            );
            return Ok(working_copy);
        }

        // Download next to the final name so an interrupted fetch never looks like a working copy
        let partial = self.work_dir.join(format!("{}.{}", name, DOWNLOAD_SUFFIX));
        self.download(name, &partial)?;
        self.local
            .move_file(&partial, &working_copy)
            .with_context(|| format!("Failed to move download into place: {}", working_copy.display()))?;

        info!(working_copy = %working_copy.display(), "fetched working copy");
        Ok(working_copy)
    }

    fn download(&self, name: &str, to: &Path) -> Result<()> {
        let source = match (&self.mounted_at, &self.destination) {
            (Some(mount), _) => Some(mount.join(name)),
            (None, Destination::LocalPath(dir)) => Some(dir.join(name)),
            (None, Destination::RemoteStore { .. }) => None,
        };

        match source {
            Some(path) => {
                self.local
                    .copy_file(&path, to)
                    .with_context(|| format!("Failed to copy {}", path.display()))?;
            }
            None => {
                let object = TransferCandidate::new(name, self.destination.clone())?
                    .target()
                    .to_string();
                self.remote.fetch_object(&object, to)?;
            }
        }

        Ok(())
    }
}

/// Sorted names of the regular files directly inside `dir`
fn list_directory(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();

    for entry in walkdir::WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        if entry.file_type().is_file() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }

    names.sort();
    Ok(names)
}
