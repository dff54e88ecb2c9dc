// Shared test helpers: a scripted remote store and file fixtures

#![allow(dead_code)]

use anyhow::{bail, Result};
use filetime::FileTime;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use remote_edit::operations::RemoteStore;

/// Remote store whose size answers are played back from a script
///
/// Once the script runs out, the last answer repeats.
pub struct ScriptedRemote {
    sizes: RefCell<VecDeque<Option<u64>>>,
    last_size: Cell<Option<u64>>,
    modified: Option<SystemTime>,
    fail_writes: bool,
    pub size_queries: Cell<u32>,
    pub writes: RefCell<Vec<(PathBuf, String)>>,
    pub objects: Vec<String>,
}

impl ScriptedRemote {
    pub fn new(sizes: Vec<Option<u64>>) -> Self {
        Self {
            sizes: RefCell::new(sizes.into()),
            last_size: Cell::new(None),
            modified: None,
            fail_writes: false,
            size_queries: Cell::new(0),
            writes: RefCell::new(Vec::new()),
            objects: Vec::new(),
        }
    }

    /// An object already exists remotely with this mtime
    pub fn with_existing(mut self, modified: SystemTime) -> Self {
        self.modified = Some(modified);
        self
    }

    pub fn with_failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }
}

impl RemoteStore for ScriptedRemote {
    fn reported_size(&self, _object: &str) -> Option<u64> {
        self.size_queries.set(self.size_queries.get() + 1);
        if let Some(next) = self.sizes.borrow_mut().pop_front() {
            self.last_size.set(next);
        }
        self.last_size.get()
    }

    fn modified(&self, _object: &str) -> Result<Option<SystemTime>> {
        Ok(self.modified)
    }

    fn write_object(&self, local_path: &Path, remote_directory: &str) -> Result<()> {
        self.writes
            .borrow_mut()
            .push((local_path.to_path_buf(), remote_directory.to_string()));
        if self.fail_writes {
            bail!("transfer interrupted");
        }
        Ok(())
    }

    fn fetch_object(&self, _object: &str, local_path: &Path) -> Result<()> {
        fs::write(local_path, "remote content\n")?;
        Ok(())
    }

    fn list_objects(&self, _remote_directory: &str) -> Result<Vec<String>> {
        Ok(self.objects.clone())
    }
}

pub fn at(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

/// Write `len` bytes to `path` and pin its mtime
pub fn write_file(path: &Path, len: usize, mtime_secs: i64) {
    fs::write(path, vec![b'a'; len]).unwrap();
    filetime::set_file_mtime(path, FileTime::from_unix_time(mtime_secs, 0)).unwrap();
}
