// Effective Settings
// Compiled defaults, overlaid by the user config file, overlaid by command-line flags

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::user_config::{RemoteSection, RetrySection, SessionSection};
use super::{AppConfig, Destination, UserConfig};
use crate::operations::RetryPolicy;
use crate::utilities::expand_home;

/// Values supplied on the command line; `None` leaves the lower layers in charge
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub remote: Option<String>,
    pub remote_directory: Option<String>,
    pub mount_point: Option<String>,
    pub work_dir: Option<String>,
    pub editor: Option<String>,
    pub max_attempts: Option<u32>,
    pub retry_delay_secs: Option<u64>,
    pub no_mount: bool,
    pub unmount_after_edit: bool,
}

/// Settings after all layers are merged and validated
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub remote: String,
    pub remote_directory: String,
    pub mount_point: PathBuf,
    pub rclone_binary: String,
    pub work_dir: PathBuf,
    pub editor: String,
    /// Editor came from the command line and wins over $VISUAL/$EDITOR
    pub editor_from_cli: bool,
    pub mount_on_edit: bool,
    pub unmount_after_edit: bool,
    pub retry: RetryPolicy,
    pub global_excludes: Vec<String>,
}

impl Settings {
    /// Load the user config (explicit path or default location) and merge all layers
    pub fn load(config_path: Option<&Path>, overrides: &SettingsOverrides) -> Result<Self> {
        let user = match config_path {
            Some(path) => UserConfig::load(path)?,
            None => match UserConfig::default_path() {
                Some(path) => UserConfig::load_optional(&path)?,
                None => UserConfig::default(),
            },
        };

        Self::resolve(&AppConfig::default(), &user, overrides)
    }

    /// Merge the three layers; later layers win
    pub fn resolve(app: &AppConfig, user: &UserConfig, overrides: &SettingsOverrides) -> Result<Self> {
        let remote = pick(&overrides.remote, &user.remote.name, &app.remote.name);
        let remote = remote.trim().trim_end_matches(':').to_string();
        if remote.is_empty() {
            bail!("remote name must not be empty");
        }
        if remote.contains(':') || remote.contains('/') {
            bail!("remote name '{}' must not contain ':' or '/'", remote);
        }

        let remote_directory = pick(&overrides.remote_directory, &user.remote.directory, &app.remote.directory)
            .trim_matches('/')
            .to_string();

        let max_attempts = overrides
            .max_attempts
            .or(user.retry.max_attempts)
            .unwrap_or(app.retry.max_attempts);
        let retry_delay_secs = overrides
            .retry_delay_secs
            .or(user.retry.retry_delay_secs)
            .unwrap_or(app.retry.retry_delay_secs);
        let retry = RetryPolicy::new(max_attempts, Duration::from_secs(retry_delay_secs))
            .context("Invalid retry settings")?;

        let mount_on_edit = !overrides.no_mount
            && user.session.mount_on_edit.unwrap_or(app.session.mount_on_edit);
        let unmount_after_edit = overrides.unmount_after_edit
            || user.session.unmount_after_edit.unwrap_or(app.session.unmount_after_edit);

        Ok(Self {
            remote,
            remote_directory,
            mount_point: expand_home(&pick(&overrides.mount_point, &user.remote.mount_point, &app.remote.mount_point)),
            rclone_binary: pick(&None, &user.remote.rclone_binary, &app.remote.rclone_binary),
            work_dir: expand_home(&pick(&overrides.work_dir, &user.session.work_dir, &app.session.work_dir)),
            editor: pick(&overrides.editor, &user.session.editor, &app.session.editor),
            editor_from_cli: overrides.editor.is_some(),
            mount_on_edit,
            unmount_after_edit,
            retry,
            global_excludes: user
                .global_excludes
                .clone()
                .unwrap_or_else(|| app.global_excludes.clone()),
        })
    }

    /// Remote directory that holds the editable files
    pub fn destination(&self) -> Destination {
        Destination::remote(&self.remote, &self.remote_directory)
    }

    /// Render as a config file that reproduces these settings
    pub fn to_user_config(&self) -> UserConfig {
        UserConfig {
            remote: RemoteSection {
                name: Some(self.remote.clone()),
                directory: Some(self.remote_directory.clone()),
                mount_point: Some(self.mount_point.display().to_string()),
                rclone_binary: Some(self.rclone_binary.clone()),
            },
            session: SessionSection {
                work_dir: Some(self.work_dir.display().to_string()),
                editor: Some(self.editor.clone()),
                mount_on_edit: Some(self.mount_on_edit),
                unmount_after_edit: Some(self.unmount_after_edit),
            },
            retry: RetrySection {
                max_attempts: Some(self.retry.max_attempts),
                retry_delay_secs: Some(self.retry.retry_delay.as_secs()),
            },
            global_excludes: Some(self.global_excludes.clone()),
        }
    }
}

fn pick(cli: &Option<String>, file: &Option<String>, default: &str) -> String {
    cli.as_deref()
        .or(file.as_deref())
        .unwrap_or(default)
        .to_string()
}
