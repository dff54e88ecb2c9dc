// Build script - reads config.yaml at compile time and generates defaults
// This allows changing defaults during development without editing source code

use std::env;
use std::fs;
use std::path::Path;

fn main() {
    // Tell Cargo to rerun if config.yaml changes
    println!("cargo:rerun-if-changed=src/config.yaml");

    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("compiled_config.rs");

    // Try to read config.yaml from src/, fall back to hardcoded defaults if not found
    let config = if Path::new("src/config.yaml").exists() {
        let content = fs::read_to_string("src/config.yaml")
            .expect("Failed to read src/config.yaml");
        parse_config(&content)
    } else {
        CompiledConfig::default()
    };

    let generated = format!(
        r#"// Auto-generated from config.yaml at compile time
// Do not edit - modify config.yaml and rebuild instead

pub const REMOTE_NAME: &str = {remote_name:?};
pub const REMOTE_DIRECTORY: &str = {remote_directory:?};
pub const MOUNT_POINT: &str = {mount_point:?};
pub const RCLONE_BINARY: &str = {rclone_binary:?};

pub const WORK_DIR: &str = {work_dir:?};
pub const EDITOR: &str = {editor:?};
pub const MOUNT_ON_EDIT: bool = {mount_on_edit};
pub const UNMOUNT_AFTER_EDIT: bool = {unmount_after_edit};

pub const MAX_ATTEMPTS: u32 = {max_attempts};
pub const RETRY_DELAY_SECS: u64 = {retry_delay_secs};

pub const GLOBAL_EXCLUDES: &[&str] = &[
{excludes}
];
"#,
        remote_name = config.remote_name,
        remote_directory = config.remote_directory,
        mount_point = config.mount_point,
        rclone_binary = config.rclone_binary,
        work_dir = config.work_dir,
        editor = config.editor,
        mount_on_edit = config.mount_on_edit,
        unmount_after_edit = config.unmount_after_edit,
        max_attempts = config.max_attempts,
        retry_delay_secs = config.retry_delay_secs,
        excludes = config.global_excludes
            .iter()
            .map(|e| format!("    {:?},", e))
            .collect::<Vec<_>>()
            .join("\n"),
    );

    fs::write(&dest_path, generated).expect("Failed to write compiled config");
}

struct CompiledConfig {
    remote_name: String,
    remote_directory: String,
    mount_point: String,
    rclone_binary: String,
    work_dir: String,
    editor: String,
    mount_on_edit: bool,
    unmount_after_edit: bool,
    max_attempts: u32,
    retry_delay_secs: u64,
    global_excludes: Vec<String>,
}

impl Default for CompiledConfig {
    fn default() -> Self {
        Self {
            remote_name: "gdrive".to_string(),
            remote_directory: String::new(),
            mount_point: "~/mnt/gdrive".to_string(),
            rclone_binary: "rclone".to_string(),
            work_dir: "~/.cache/remote-edit".to_string(),
            editor: "nano".to_string(),
            mount_on_edit: true,
            unmount_after_edit: false,
            max_attempts: 5,
            retry_delay_secs: 3,
            global_excludes: vec![
                "*.swp".to_string(),
                "*.swo".to_string(),
                "*~".to_string(),
                ".DS_Store".to_string(),
            ],
        }
    }
}

#[derive(PartialEq)]
enum Section {
    None,
    Remote,
    Session,
    Retry,
    Excludes,
}

fn parse_config(content: &str) -> CompiledConfig {
    let mut config = CompiledConfig::default();

    // Simple YAML parsing (avoiding external dependencies in build script)
    let mut section = Section::None;

    for line in content.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        // Track which section we're in
        if !line.starts_with(' ') && !line.starts_with('\t') {
            section = match trimmed {
                "remote:" => Section::Remote,
                "session:" => Section::Session,
                "retry:" => Section::Retry,
                "global_excludes:" => {
                    config.global_excludes.clear(); // Start fresh when we see the section
                    Section::Excludes
                }
                _ => Section::None,
            };
            continue;
        }

        if section == Section::Excludes {
            if let Some(item) = trimmed.strip_prefix("- ") {
                config.global_excludes.push(unquote(item).to_string());
            }
            continue;
        }

        let Some((key, value)) = parse_kv(trimmed) else {
            continue;
        };

        match section {
            Section::Remote => match key {
                "name" => config.remote_name = value.to_string(),
                "directory" => config.remote_directory = value.to_string(),
                "mount_point" => config.mount_point = value.to_string(),
                "rclone_binary" => config.rclone_binary = value.to_string(),
                _ => {}
            },
            Section::Session => match key {
                "work_dir" => config.work_dir = value.to_string(),
                "editor" => config.editor = value.to_string(),
                "mount_on_edit" => config.mount_on_edit = parse_bool(value),
                "unmount_after_edit" => config.unmount_after_edit = parse_bool(value),
                _ => {}
            },
            Section::Retry => match key {
                "max_attempts" => config.max_attempts = value.parse().unwrap_or(5),
                "retry_delay_secs" => config.retry_delay_secs = value.parse().unwrap_or(3),
                _ => {}
            },
            Section::Excludes | Section::None => {}
        }
    }

    config
}

fn parse_kv(line: &str) -> Option<(&str, &str)> {
    let colon_pos = line.find(':')?;
    let key = line[..colon_pos].trim();
    let mut value = line[colon_pos + 1..].trim();

    // Remove inline comments
    if let Some(comment_pos) = value.find(" #") {
        value = value[..comment_pos].trim();
    }

    Some((key, unquote(value)))
}

fn unquote(s: &str) -> &str {
    s.trim().trim_matches('"').trim_matches('\'')
}

fn parse_bool(s: &str) -> bool {
    matches!(s.to_lowercase().as_str(), "true" | "yes" | "1")
}
