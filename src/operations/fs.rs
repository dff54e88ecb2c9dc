// Local Filesystem
// Metadata and file operations the reconciler needs from the local disk

use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Local filesystem operations used by the freshness gate and transfers
pub trait LocalFs {
    fn exists(&self, path: &Path) -> bool;

    /// True for regular files only (not directories, sockets, dangling links)
    fn is_regular_file(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn modification_time(&self, path: &Path) -> io::Result<SystemTime>;

    fn size_bytes(&self, path: &Path) -> io::Result<u64>;

    /// Move a file, falling back to copy + remove across filesystems
    fn move_file(&self, src: &Path, dst: &Path) -> io::Result<()>;

    /// Copy a file, preserving its modification time
    fn copy_file(&self, src: &Path, dst: &Path) -> io::Result<u64>;

    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// [`LocalFs`] backed by `std::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFs;

impl LocalFs for StdFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_regular_file(&self, path: &Path) -> bool {
        fs::metadata(path)
            .map(|meta| meta.file_type().is_file())
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn modification_time(&self, path: &Path) -> io::Result<SystemTime> {
        fs::metadata(path)?.modified()
    }

    fn size_bytes(&self, path: &Path) -> io::Result<u64> {
        Ok(fs::metadata(path)?.len())
    }

    fn move_file(&self, src: &Path, dst: &Path) -> io::Result<()> {
        match fs::rename(src, dst) {
            Ok(()) => Ok(()),
            // EXDEV and friends: rename cannot cross mount points
            Err(_) if src.is_file() => {
                self.copy_file(src, dst)?;
                fs::remove_file(src)
            }
            Err(e) => Err(e),
        }
    }

    fn copy_file(&self, src: &Path, dst: &Path) -> io::Result<u64> {
        let copied = fs::copy(src, dst)?;

        // Preserve modification time so the freshness gate sees the edit time, not the copy time
        let mtime = filetime::FileTime::from_last_modification_time(&fs::metadata(src)?);
        filetime::set_file_mtime(dst, mtime)?;

        Ok(copied)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}
