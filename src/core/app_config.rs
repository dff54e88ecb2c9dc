// Application Configuration
// Defaults compiled from config.yaml at build time
// Modify config.yaml and rebuild to change these values

// Include the auto-generated config from build.rs
pub mod compiled {
    include!(concat!(env!("OUT_DIR"), "/compiled_config.rs"));
}

/// Built-in configuration for remote-edit
/// Values are compiled in from config.yaml at build time
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Remote storage settings
    pub remote: RemoteDefaults,

    /// Edit session settings
    pub session: SessionDefaults,

    /// Upload verification settings
    pub retry: RetryDefaults,

    /// Patterns hidden from the file picker
    pub global_excludes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RemoteDefaults {
    /// rclone remote name (without the trailing colon)
    pub name: String,

    /// Directory inside the remote that holds editable files
    pub directory: String,

    /// Where the remote gets mounted
    pub mount_point: String,

    /// rclone executable
    pub rclone_binary: String,
}

#[derive(Debug, Clone)]
pub struct SessionDefaults {
    /// Local directory for working copies
    pub work_dir: String,

    /// Fallback editor command when neither $VISUAL nor $EDITOR is set
    pub editor: String,

    /// Mount the remote before listing files
    pub mount_on_edit: bool,

    /// Unmount once the session finishes
    pub unmount_after_edit: bool,
}

#[derive(Debug, Clone)]
pub struct RetryDefaults {
    /// Upper bound on confirmation polling before declaring failure
    pub max_attempts: u32,

    /// Fixed wait between polls
    pub retry_delay_secs: u64,
}

impl Default for RemoteDefaults {
    fn default() -> Self {
        Self {
            name: compiled::REMOTE_NAME.to_string(),
            directory: compiled::REMOTE_DIRECTORY.to_string(),
            mount_point: compiled::MOUNT_POINT.to_string(),
            rclone_binary: compiled::RCLONE_BINARY.to_string(),
        }
    }
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            work_dir: compiled::WORK_DIR.to_string(),
            editor: compiled::EDITOR.to_string(),
            mount_on_edit: compiled::MOUNT_ON_EDIT,
            unmount_after_edit: compiled::UNMOUNT_AFTER_EDIT,
        }
    }
}

impl Default for RetryDefaults {
    fn default() -> Self {
        Self {
            max_attempts: compiled::MAX_ATTEMPTS,
            retry_delay_secs: compiled::RETRY_DELAY_SECS,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            remote: RemoteDefaults::default(),
            session: SessionDefaults::default(),
            retry: RetryDefaults::default(),
            global_excludes: compiled::GLOBAL_EXCLUDES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
