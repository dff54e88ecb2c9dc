// Rclone Operations
// RemoteStore backed by the rclone command-line client

use anyhow::{bail, Context, Result};
use chrono::DateTime;
use serde::Deserialize;
use std::path::Path;
use std::process::{Command, Output};
use std::time::SystemTime;
use tracing::debug;

use super::RemoteStore;

/// rclone exit code for "directory not found"
const EXIT_DIRECTORY_NOT_FOUND: i32 = 3;

/// rclone exit code for "file not found"
const EXIT_FILE_NOT_FOUND: i32 = 4;

/// One entry of `rclone lsjson` output
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectInfo {
    pub name: String,
    /// -1 when the backend cannot report a size
    pub size: i64,
    pub mod_time: String,
    #[serde(default)]
    pub is_dir: bool,
}

impl ObjectInfo {
    /// Reported size, `None` when the backend does not know it
    pub fn size_bytes(&self) -> Option<u64> {
        u64::try_from(self.size).ok()
    }

    pub fn modified(&self) -> Result<SystemTime> {
        parse_mod_time(&self.mod_time)
    }
}

/// rclone command wrapper
#[derive(Debug, Clone)]
pub struct Rclone {
    binary: String,
}

impl Rclone {
    /// Create a wrapper that invokes the given rclone executable
    pub fn new(binary: impl Into<String>) -> Self {
        Self { binary: binary.into() }
    }

    /// Run rclone with the given arguments and capture its output
    fn run(&self, args: &[&str]) -> Result<Output> {
        debug!(binary = %self.binary, ?args, "running rclone");

        Command::new(&self.binary)
            .args(args)
            .output()
            .with_context(|| format!("Failed to run {}", self.binary))
    }

    /// Metadata for a single object, `None` if it does not exist
    pub fn stat(&self, object: &str) -> Result<Option<ObjectInfo>> {
        let output = self.run(&["lsjson", "--stat", object])?;

        if output.status.success() {
            let info = parse_stat(&output.stdout)
                .with_context(|| format!("Unexpected lsjson output for {}", object))?;
            return Ok(Some(info));
        }

        match output.status.code() {
            Some(EXIT_DIRECTORY_NOT_FOUND) | Some(EXIT_FILE_NOT_FOUND) => Ok(None),
            _ => bail!(
                "rclone lsjson failed for {}: {}",
                object,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        }
    }
}

impl RemoteStore for Rclone {
    fn reported_size(&self, object: &str) -> Option<u64> {
        match self.stat(object) {
            Ok(Some(info)) if !info.is_dir => info.size_bytes(),
            Ok(_) => None,
            Err(e) => {
                debug!(object, error = %e, "size query failed");
                None
            }
        }
    }

    fn modified(&self, object: &str) -> Result<Option<SystemTime>> {
        match self.stat(object)? {
            Some(info) if !info.is_dir => Ok(Some(info.modified()?)),
            _ => Ok(None),
        }
    }

    fn write_object(&self, local_path: &Path, remote_directory: &str) -> Result<()> {
        let local = local_path.to_string_lossy();
        let output = self.run(&["copy", &*local, remote_directory])?;

        if !output.status.success() {
            bail!(
                "rclone copy {} -> {} failed: {}",
                local,
                remote_directory,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(())
    }

    fn fetch_object(&self, object: &str, local_path: &Path) -> Result<()> {
        let local = local_path.to_string_lossy();
        let output = self.run(&["copyto", object, &*local])?;

        if !output.status.success() {
            bail!(
                "rclone copyto {} -> {} failed: {}",
                object,
                local,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(())
    }

    fn list_objects(&self, remote_directory: &str) -> Result<Vec<String>> {
        let output = self.run(&["lsf", "--files-only", remote_directory])?;

        if !output.status.success() {
            bail!(
                "rclone lsf {} failed: {}",
                remote_directory,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(parse_listing(&String::from_utf8(output.stdout)?))
    }
}

/// Parse `rclone lsjson --stat` output
fn parse_stat(stdout: &[u8]) -> Result<ObjectInfo> {
    Ok(serde_json::from_slice(stdout)?)
}

/// Parse an RFC 3339 timestamp as reported in `ModTime`
fn parse_mod_time(value: &str) -> Result<SystemTime> {
    let parsed = DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("Invalid modification time: {}", value))?;

    Ok(SystemTime::from(parsed))
}

/// Parse `rclone lsf` output into sorted file names
fn parse_listing(stdout: &str) -> Vec<String> {
    let mut names: Vec<String> = stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.ends_with('/'))
        .map(str::to_string)
        .collect();

    names.sort();
    names
}
