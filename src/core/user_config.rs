// User Configuration
// Optional YAML file that overrides the compiled defaults

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{CONFIG_ENV_VAR, CONFIG_FILE_NAME, CONFIG_SUBDIR};

/// User-level configuration
/// Every field is optional; missing values fall back to the compiled defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    #[serde(default)]
    pub remote: RemoteSection,

    #[serde(default)]
    pub session: SessionSection,

    #[serde(default)]
    pub retry: RetrySection,

    /// Replaces the compiled exclude list when present
    pub global_excludes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteSection {
    pub name: Option<String>,
    pub directory: Option<String>,
    pub mount_point: Option<String>,
    pub rclone_binary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionSection {
    pub work_dir: Option<String>,
    pub editor: Option<String>,
    pub mount_on_edit: Option<bool>,
    pub unmount_after_edit: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    pub max_attempts: Option<u32>,
    pub retry_delay_secs: Option<u64>,
}

impl UserConfig {
    /// Load user configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Parse configuration from YAML text
    pub fn parse(content: &str) -> Result<Self> {
        // An empty file is a valid "no overrides" config
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: UserConfig = serde_yaml::from_str(content)
            .context("Invalid config YAML")?;

        Ok(config)
    }

    /// Load the config file if one exists at `path`, otherwise return empty overrides
    pub fn load_optional(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Default config location: `$REMOTE_EDIT_CONFIG`, then `$HOME/.config/remote-edit/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        std::env::var("HOME").ok().map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join(CONFIG_SUBDIR)
                .join(CONFIG_FILE_NAME)
        })
    }

    /// Save user configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;

        Ok(())
    }
}
