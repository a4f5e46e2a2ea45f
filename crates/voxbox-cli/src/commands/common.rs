//! Shared CLI helpers used across multiple commands.

use clap::Args;
use voxbox_config::{ConfigError, EffectParameters, Preset, resolve_preset};

/// Load a preset by name or path.
///
/// Searches the factory catalogue, then the user presets directory, then
/// treats `name` as a path to a `.toml` file.
pub fn load_preset(name: &str) -> anyhow::Result<Preset> {
    match resolve_preset(name) {
        Ok(preset) => Ok(preset),
        Err(ConfigError::PresetNotFound(_)) => anyhow::bail!(
            "Preset '{}' not found. Use 'voxbox presets list' to see available presets.",
            name
        ),
        Err(e) => Err(e.into()),
    }
}

/// Per-parameter overrides on top of a preset.
#[derive(Args, Debug, Default, Clone)]
pub struct ParamOverrides {
    /// Pitch shift in semitones
    #[arg(long, allow_hyphen_values = true)]
    pub pitch: Option<f32>,

    /// Reverb room size (0.0 - 1.0)
    #[arg(long)]
    pub room: Option<f32>,

    /// Reverb mix (0.0 - 1.0)
    #[arg(long)]
    pub mix: Option<f32>,

    /// Input gain (linear)
    #[arg(long)]
    pub gain: Option<f32>,
}

impl ParamOverrides {
    /// Whether any override was given.
    pub fn is_empty(&self) -> bool {
        self.pitch.is_none() && self.room.is_none() && self.mix.is_none() && self.gain.is_none()
    }

    /// Apply the overrides to `params` and check the result.
    pub fn apply(&self, mut params: EffectParameters) -> anyhow::Result<EffectParameters> {
        if let Some(pitch) = self.pitch {
            params.pitch_semitones = pitch;
        }
        if let Some(room) = self.room {
            params.reverb_room_size = room;
        }
        if let Some(mix) = self.mix {
            params.reverb_mix = mix;
        }
        if let Some(gain) = self.gain {
            params.input_gain = gain;
        }
        params.validate()?;
        Ok(params)
    }
}

/// Resolve `--preset` (or `default`) and apply any overrides.
pub fn effect_params(
    preset: Option<&str>,
    default: &str,
    overrides: &ParamOverrides,
) -> anyhow::Result<(String, EffectParameters)> {
    let preset = load_preset(preset.unwrap_or(default))?;
    let params = overrides.apply(preset.params)?;
    let label = if overrides.is_empty() {
        preset.name
    } else {
        format!("{} (custom)", preset.name)
    };
    Ok((label, params))
}

/// Format a linear level as dBFS.
pub fn format_db(linear: f32) -> String {
    format!("{:.1} dBFS", voxbox_core::linear_to_db(linear))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_given_fields() {
        let overrides = ParamOverrides {
            pitch: Some(-3.0),
            gain: Some(0.8),
            ..ParamOverrides::default()
        };
        let params = overrides.apply(EffectParameters::default()).unwrap();
        assert_eq!(params, EffectParameters::new(-3.0, 0.3, 0.3, 0.8));
    }

    #[test]
    fn overrides_are_validated() {
        let overrides = ParamOverrides {
            mix: Some(2.0),
            ..ParamOverrides::default()
        };
        assert!(overrides.apply(EffectParameters::default()).is_err());
    }

    #[test]
    fn unknown_preset_mentions_list() {
        let err = load_preset("no-such-voice-anywhere").unwrap_err();
        assert!(err.to_string().contains("voxbox presets list"));
    }

    #[test]
    fn custom_label() {
        let overrides = ParamOverrides {
            room: Some(0.5),
            ..ParamOverrides::default()
        };
        let (label, params) = effect_params(Some("robot"), "Normal", &overrides).unwrap();
        assert_eq!(label, "Robot (custom)");
        assert_eq!(params.reverb_room_size, 0.5);

        let (label, _) = effect_params(None, "Normal", &ParamOverrides::default()).unwrap();
        assert_eq!(label, "Normal");
    }

    #[test]
    fn db_formatting() {
        assert_eq!(format_db(1.0), "0.0 dBFS");
        assert_eq!(format_db(0.0), "-100.0 dBFS");
    }
}
