//! Named voice presets and their TOML file format.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::params::EffectParameters;

/// A named, immutable set of effect parameters.
///
/// Presets are stored as flat TOML files:
///
/// ```toml
/// name = "Robot"
/// description = "Raised pitch with a tight, dry room"
/// pitch_semitones = 5.0
/// reverb_room_size = 0.1
/// reverb_mix = 0.3
/// input_gain = 1.2
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Display name, also the lookup key.
    pub name: String,

    /// Optional one-line description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The parameter tuple this preset applies.
    #[serde(flatten)]
    pub params: EffectParameters,
}

impl Preset {
    /// Create a preset with the given parameters.
    pub fn new(name: impl Into<String>, params: EffectParameters) -> Self {
        Self {
            name: name.into(),
            description: None,
            params,
        }
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Load a preset from a TOML file and validate its parameters.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse a preset from a TOML string and validate its parameters.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let preset: Preset = toml::from_str(toml_str)?;
        preset.params.validate()?;
        Ok(preset)
    }

    /// Save the preset to a TOML file, creating the parent directory if needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Render the preset as a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::new("Normal", EffectParameters::default())
    }
}
