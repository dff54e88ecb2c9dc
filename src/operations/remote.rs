// Remote Store
// The operations the reconciler and edit session need from remote storage

use anyhow::Result;
use std::path::Path;
use std::time::SystemTime;

/// Remote object store reached through a synchronization client
///
/// Object paths and directories use the client's `remote:path` notation.
/// Writes may become visible to size queries only after a delay.
pub trait RemoteStore {
    /// Size the store currently reports for an object, `None` if unknown or absent
    fn reported_size(&self, object: &str) -> Option<u64>;

    /// Modification time of an object: `Ok(None)` if absent, `Err` if the query failed
    fn modified(&self, object: &str) -> Result<Option<SystemTime>>;

    /// Upload a local file into a remote directory, keeping its file name
    fn write_object(&self, local_path: &Path, remote_directory: &str) -> Result<()>;

    /// Download an object to a local path
    fn fetch_object(&self, object: &str, local_path: &Path) -> Result<()>;

    /// File names in a remote directory, sorted
    fn list_objects(&self, remote_directory: &str) -> Result<Vec<String>>;
}
