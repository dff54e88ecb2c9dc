// Editor Launcher
// Opens a file in an external editor and waits for it to exit

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;
use tracing::info;

/// Edits a file in place
pub trait Editor {
    fn edit(&self, path: &Path) -> Result<()>;
}

/// Runs an editor command such as `vim` or `code --wait`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEditor {
    command: String,
}

impl CommandEditor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// `$VISUAL`, then `$EDITOR`, then the configured fallback
    pub fn from_env(fallback: &str) -> Self {
        let command = ["VISUAL", "EDITOR"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());

        Self::new(command)
    }

    /// Program and leading arguments of the editor command
    fn split(&self) -> Result<(&str, Vec<&str>)> {
        let mut parts = self.command.split_whitespace();
        let program = match parts.next() {
            Some(program) => program,
            None => bail!("No editor configured"),
        };
        Ok((program, parts.collect()))
    }
}

impl Editor for CommandEditor {
    fn edit(&self, path: &Path) -> Result<()> {
        let (program, args) = self.split()?;
        info!(editor = %self.command, file = %path.display(), "opening editor");

        let status = Command::new(program)
            .args(&args)
            .arg(path)
            .status()
            .with_context(|| format!("Failed to launch editor: {}", program))?;

        if !status.success() {
            bail!("Editor {} exited with {}", program, status);
        }

        Ok(())
    }
}
