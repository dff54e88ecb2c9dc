// Mount Operations
// Mount and unmount an rclone remote as a local directory

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::{info, warn};

/// Kernel mount table on Linux
const MOUNT_TABLE: &str = "/proc/mounts";

/// Mount handler
pub struct MountManager {
    rclone_binary: String,
}

impl MountManager {
    pub fn new(rclone_binary: impl Into<String>) -> Self {
        Self {
            rclone_binary: rclone_binary.into(),
        }
    }

    /// Check if a directory is currently a mount point
    pub fn is_mounted(mount_point: &Path) -> bool {
        match fs::read_to_string(MOUNT_TABLE) {
            Ok(table) => mount_table_contains(&table, mount_point),
            Err(_) => false,
        }
    }

    /// Mount `remote:` at the given directory, creating the directory if needed
    pub fn mount(&self, remote: &str, mount_point: &Path) -> Result<()> {
        if Self::is_mounted(mount_point) {
            info!(mount_point = %mount_point.display(), "already mounted");
            return Ok(());
        }

        fs::create_dir_all(mount_point)
            .with_context(|| format!("Failed to create mount point: {}", mount_point.display()))?;

        let remote_root = format!("{}:", remote.trim_end_matches(':'));
        let output = Command::new(&self.rclone_binary)
            .arg("mount")
            .arg(&remote_root)
            .arg(mount_point)
            .args(["--daemon", "--vfs-cache-mode", "writes"])
            .output()
            .with_context(|| format!("Failed to run {}", self.rclone_binary))?;

        if !output.status.success() {
            bail!(
                "rclone mount {} failed: {}",
                remote_root,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        info!(remote = %remote_root, mount_point = %mount_point.display(), "mounted");
        Ok(())
    }

    /// Unmount a directory, trying `fusermount -u` before `umount`
    pub fn unmount(&self, mount_point: &Path) -> Result<()> {
        if !Self::is_mounted(mount_point) {
            info!(mount_point = %mount_point.display(), "not mounted");
            return Ok(());
        }

        let fusermount = Command::new("fusermount").arg("-u").arg(mount_point).output();

        match fusermount {
            Ok(output) if output.status.success() => {}
            _ => {
                warn!("fusermount -u failed, trying umount");
                let output = Command::new("umount")
                    .arg(mount_point)
                    .output()
                    .context("Failed to run umount")?;

                if !output.status.success() {
                    bail!(
                        "Unmount of {} failed: {}",
                        mount_point.display(),
                        String::from_utf8_lossy(&output.stderr).trim()
                    );
                }
            }
        }

        info!(mount_point = %mount_point.display(), "unmounted");
        Ok(())
    }
}

/// Whether a `/proc/mounts` style table lists `mount_point` as a target
fn mount_table_contains(table: &str, mount_point: &Path) -> bool {
    let wanted = fs::canonicalize(mount_point).unwrap_or_else(|_| mount_point.to_path_buf());

    table
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(unescape_mount_path)
        .any(|target| Path::new(&target) == wanted)
}

/// Undo the octal escaping /proc/mounts applies to spaces, tabs and backslashes
fn unescape_mount_path(field: &str) -> String {
    field
        .replace("\\040", " ")
        .replace("\\011", "\t")
        .replace("\\012", "\n")
        .replace("\\134", "\\")
}
