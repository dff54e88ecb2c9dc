// Application Constants
// Names and fixed values shared across modules

/// Environment variable that points at an alternate config file
pub const CONFIG_ENV_VAR: &str = "REMOTE_EDIT_CONFIG";

/// Directory under `$HOME/.config`
pub const CONFIG_SUBDIR: &str = "remote-edit";

/// Config file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Suffix for working copies that are still being downloaded
pub const DOWNLOAD_SUFFIX: &str = "download";

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "remote_edit=info";

/// Log filter used with `--verbose`
pub const VERBOSE_LOG_FILTER: &str = "remote_edit=debug";
