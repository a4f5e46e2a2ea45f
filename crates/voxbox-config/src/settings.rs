//! Application settings persisted as `config.toml`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::paths;

/// Longest accumulation buffer a session may pre-reserve (one hour).
const MAX_RESERVE_SECONDS: f32 = 3600.0;

/// Audio and session settings.
///
/// Every field has a serde default, so a partial (or empty) file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Capture and render sample rate in Hz.
    pub sample_rate: u32,
    /// Samples per capture block.
    pub block_size: usize,
    /// Input device name or index; `None` selects the system default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_device: Option<String>,
    /// Output device name or index; `None` selects the system default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_device: Option<String>,
    /// Seconds of audio pre-reserved for the accumulation buffer.
    pub reserve_seconds: f32,
    /// Preset applied when a session starts.
    pub default_preset: String,
    /// Bit depth for WAV export (16, 24 or 32).
    pub export_bits: u16,
    /// Start recordings with live monitoring enabled.
    pub monitor: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            block_size: 2048,
            input_device: None,
            output_device: None,
            reserve_seconds: 60.0,
            default_preset: "Normal".to_string(),
            export_bits: 16,
            monitor: false,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse settings from a TOML string and check them.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(toml_str)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load `config.toml` from the user config directory.
    ///
    /// A missing file yields the defaults. A file that exists but cannot be
    /// read or parsed is logged and also yields the defaults.
    pub fn load_or_default() -> Self {
        let path = paths::settings_path();
        if !path.is_file() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
                Self::default()
            }
        }
    }

    /// Save settings to a TOML file, creating the parent directory if needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::invalid("sample_rate", "must be greater than 0"));
        }
        if self.block_size == 0 {
            return Err(ConfigError::invalid("block_size", "must be greater than 0"));
        }
        if !(self.reserve_seconds.is_finite()
            && (0.0..=MAX_RESERVE_SECONDS).contains(&self.reserve_seconds))
        {
            return Err(ConfigError::invalid(
                "reserve_seconds",
                format!(
                    "must be between 0.0 and {MAX_RESERVE_SECONDS}, got {}",
                    self.reserve_seconds
                ),
            ));
        }
        if !matches!(self.export_bits, 16 | 24 | 32) {
            return Err(ConfigError::invalid(
                "export_bits",
                format!("must be 16, 24 or 32, got {}", self.export_bits),
            ));
        }
        Ok(())
    }

    /// Number of samples to pre-reserve for the accumulation buffer.
    pub fn reserve_samples(&self) -> usize {
        voxbox_core::secs_to_samples(self.reserve_seconds, self.sample_rate as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn partial_file_overrides_some_fields() {
        let settings = Settings::from_toml(
            r#"
sample_rate = 48000
monitor = true
input_device = "USB Mic"
"#,
        )
        .unwrap();
        assert_eq!(settings.sample_rate, 48000);
        assert!(settings.monitor);
        assert_eq!(settings.input_device.as_deref(), Some("USB Mic"));
        assert_eq!(settings.block_size, 2048);
        assert_eq!(settings.default_preset, "Normal");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Settings::from_toml("block_size = 0").is_err());
        assert!(Settings::from_toml("sample_rate = 0").is_err());
        assert!(Settings::from_toml("export_bits = 8").is_err());
        assert!(Settings::from_toml("reserve_seconds = -1.0").is_err());
    }

    #[test]
    fn reserve_seconds_is_capped_at_an_hour() {
        let err = Settings::from_toml("reserve_seconds = 1e7").unwrap_err();
        assert!(err.to_string().contains("reserve_seconds"), "{err}");
        let settings = Settings::from_toml("reserve_seconds = 3600.0").unwrap();
        assert_eq!(settings.reserve_samples(), 44100 * 3600);
    }

    #[test]
    fn reserve_samples_follows_rate() {
        let settings = Settings::default();
        assert_eq!(settings.reserve_samples(), 44100 * 60);
    }

    #[test]
    fn save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("voxbox").join("config.toml");

        let settings = Settings {
            output_device: Some("1".to_string()),
            export_bits: 24,
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }
}
