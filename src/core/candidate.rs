// Transfer Candidates
// A local file proposed for relocation and the place it should land

use std::fmt;
use std::path::{Path, PathBuf};

use super::ReconcileError;

/// Where an accepted candidate gets written
///
/// Chosen once when the candidate is built; later stages match on the
/// variant instead of inspecting path strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// A directory on a local (or locally mounted) filesystem
    LocalPath(PathBuf),
    /// A directory inside an rclone remote, e.g. `gdrive:notes`
    RemoteStore { remote: String, directory: String },
}

impl Destination {
    /// Build a remote destination, normalizing slashes in the directory
    pub fn remote(remote: impl Into<String>, directory: impl AsRef<str>) -> Self {
        Self::RemoteStore {
            remote: remote.into(),
            directory: directory.as_ref().trim_matches('/').to_string(),
        }
    }

    /// Parse an operator-supplied destination
    ///
    /// `name:dir/sub` is a remote when `name` is at least two characters and
    /// contains no path separator. Anything else is a local directory, which
    /// keeps Windows drive letters (`C:\notes`) and relative paths local.
    pub fn parse(value: &str) -> Self {
        if let Some((remote, directory)) = value.split_once(':') {
            let looks_like_remote = remote.len() > 1
                && !remote.contains('/')
                && !remote.contains('\\');

            if looks_like_remote {
                return Self::remote(remote, directory);
            }
        }

        Self::LocalPath(PathBuf::from(value))
    }

    /// rclone path of the destination directory (`remote:dir`)
    pub fn remote_directory(&self) -> Option<String> {
        match self {
            Self::RemoteStore { remote, directory } => Some(format!("{}:{}", remote, directory)),
            Self::LocalPath(_) => None,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalPath(dir) => write!(f, "{}", dir.display()),
            Self::RemoteStore { remote, directory } => write!(f, "{}:{}", remote, directory),
        }
    }
}

/// Resolved location of a single destination file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationTarget {
    /// Full path of the destination file
    Local(PathBuf),
    /// rclone object path (`remote:dir/name`)
    Remote(String),
}

impl fmt::Display for DestinationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(object) => f.write_str(object),
        }
    }
}

/// A file proposed for relocation from the working area to a destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCandidate {
    source_path: PathBuf,
    destination: Destination,
    destination_name: String,
}

impl TransferCandidate {
    /// Create a candidate; the destination name is the source's final path component
    pub fn new(source_path: impl Into<PathBuf>, destination: Destination) -> Result<Self, ReconcileError> {
        let source_path = source_path.into();

        let destination_name = source_path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .ok_or_else(|| ReconcileError::InvalidCandidate(source_path.clone()))?;

        Ok(Self {
            source_path,
            destination,
            destination_name,
        })
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn destination_name(&self) -> &str {
        &self.destination_name
    }

    /// The concrete file this candidate would replace
    pub fn target(&self) -> DestinationTarget {
        match &self.destination {
            Destination::LocalPath(dir) => DestinationTarget::Local(dir.join(&self.destination_name)),
            Destination::RemoteStore { remote, directory } => {
                let object = if directory.is_empty() {
                    format!("{}:{}", remote, self.destination_name)
                } else {
                    format!("{}:{}/{}", remote, directory, self.destination_name)
                };
                DestinationTarget::Remote(object)
            }
        }
    }
}
