//! Configuration for the voxbox voice changer.
//!
//! - **Effect parameters**: the four-value tuple driving pitch, reverb and gain
//! - **Presets**: the seven built-in voices plus user presets stored as TOML
//! - **Settings**: audio and session settings in `config.toml`
//! - **Paths**: platform-specific config and preset directories
//!
//! # Example
//!
//! ```rust,no_run
//! use voxbox_config::{Preset, Settings, resolve_preset, paths};
//!
//! let settings = Settings::load_or_default();
//! let preset = resolve_preset(&settings.default_preset).unwrap();
//!
//! let mut custom = Preset::new("Alien", preset.params.with_pitch(3.0));
//! custom.description = Some("A little higher".into());
//! custom.save(paths::user_presets_dir().join("alien.toml")).unwrap();
//! ```

mod error;
mod params;
mod preset;
mod settings;

/// Built-in voice presets.
pub mod factory_presets;

/// Platform-specific config and preset paths.
pub mod paths;

pub use error::ConfigError;
pub use factory_presets::{FACTORY_PRESET_NAMES, factory_preset, factory_presets, is_factory_preset};
pub use params::EffectParameters;
pub use preset::Preset;
pub use settings::Settings;

/// Resolve a preset by name.
///
/// Searches the factory catalogue first, then the user presets directory,
/// then treats `name` as a path to a preset file.
pub fn resolve_preset(name: &str) -> Result<Preset, ConfigError> {
    if let Some(preset) = factory_preset(name) {
        return Ok(preset);
    }
    match paths::find_preset(name) {
        Some(path) => Preset::load(path),
        None => Err(ConfigError::PresetNotFound(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_factory_first() {
        let preset = resolve_preset("monster").unwrap();
        assert_eq!(preset.name, "Monster");
        assert_eq!(preset.params, EffectParameters::new(-8.0, 0.8, 0.6, 1.5));
    }

    #[test]
    fn unknown_name_is_not_found() {
        assert!(matches!(
            resolve_preset("no_such_voice_98765"),
            Err(ConfigError::PresetNotFound(name)) if name == "no_such_voice_98765"
        ));
    }
}
