//! Platform-specific locations for settings and user presets.
//!
//! - **User config**: `~/.config/voxbox/` (Linux), `~/Library/Application Support/voxbox/` (macOS), `%APPDATA%\voxbox\` (Windows)
//! - **Settings file**: `<user config>/config.toml`
//! - **User presets**: `<user config>/presets/`

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Application name used for directory paths.
const APP_NAME: &str = "voxbox";

/// Subdirectory name for presets.
const PRESETS_SUBDIR: &str = "presets";

/// Settings file name inside the config directory.
const SETTINGS_FILE: &str = "config.toml";

/// Returns the user-specific configuration directory.
///
/// Falls back to `./voxbox` if the platform config directory is unknown.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the user-specific presets directory.
pub fn user_presets_dir() -> PathBuf {
    user_config_dir().join(PRESETS_SUBDIR)
}

/// Returns the path of `config.toml`.
pub fn settings_path() -> PathBuf {
    user_config_dir().join(SETTINGS_FILE)
}

/// Ensure the user presets directory exists.
pub fn ensure_user_presets_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_presets_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
    }
    Ok(dir)
}

/// File name a preset called `name` is saved under.
///
/// Lowercases and replaces anything outside `[a-z0-9_-]` with `_`.
pub fn preset_file_name(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{stem}.toml")
}

/// Find a user preset file by name or path.
///
/// `name` may be a path to an existing file, or a preset name (with or
/// without `.toml`) looked up in the user presets directory.
pub fn find_preset(name: &str) -> Option<PathBuf> {
    find_preset_in(name, &user_presets_dir())
}

fn find_preset_in(name: &str, dir: &Path) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let stem = name.strip_suffix(".toml").unwrap_or(name);
    let candidate = dir.join(preset_file_name(stem));
    candidate.is_file().then_some(candidate)
}

/// List preset files in the user presets directory.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn list_user_presets() -> Vec<PathBuf> {
    list_presets_in_dir(&user_presets_dir())
}

fn list_presets_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut presets: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    presets.sort();
    presets
}
