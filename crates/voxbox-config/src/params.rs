//! The four-value effect configuration shared by the live and offline paths.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Effect parameters for one voice setting.
///
/// A plain `Copy` value: the engine publishes whole snapshots of it and never
/// edits fields of a published value in place.
///
/// | Field | Range | Meaning |
/// |-------|-------|---------|
/// | `pitch_semitones` | any finite | Pitch shift, 12 = one octave up |
/// | `reverb_room_size` | 0.0–1.0 | Scales the reverb delay lengths |
/// | `reverb_mix` | 0.0–1.0 | Scales the reverb tap gains |
/// | `input_gain` | ≥ 0.0 | Linear gain applied to captured audio |
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectParameters {
    /// Pitch shift in semitones.
    #[serde(default)]
    pub pitch_semitones: f32,
    /// Reverb room size, 0.0 to 1.0.
    #[serde(default = "default_room_size")]
    pub reverb_room_size: f32,
    /// Reverb wet amount, 0.0 to 1.0.
    #[serde(default = "default_mix")]
    pub reverb_mix: f32,
    /// Linear input gain.
    #[serde(default = "default_gain")]
    pub input_gain: f32,
}

fn default_room_size() -> f32 {
    0.3
}

fn default_mix() -> f32 {
    0.3
}

fn default_gain() -> f32 {
    1.0
}

impl EffectParameters {
    /// Create a parameter set. Values are stored as given; see
    /// [`validate`](Self::validate).
    pub const fn new(
        pitch_semitones: f32,
        reverb_room_size: f32,
        reverb_mix: f32,
        input_gain: f32,
    ) -> Self {
        Self {
            pitch_semitones,
            reverb_room_size,
            reverb_mix,
            input_gain,
        }
    }

    /// Frequency ratio of the pitch shift, `2^(semitones/12)`.
    pub fn pitch_factor(&self) -> f32 {
        voxbox_core::pitch_factor(self.pitch_semitones)
    }

    /// Whether the live chain needs to run the pitch shifter at all.
    pub fn shifts_pitch(&self) -> bool {
        self.pitch_semitones != 0.0
    }

    /// Check every field against its documented range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.pitch_semitones.is_finite() {
            return Err(ConfigError::invalid(
                "pitch_semitones",
                format!("must be finite, got {}", self.pitch_semitones),
            ));
        }
        check_unit("reverb_room_size", self.reverb_room_size)?;
        check_unit("reverb_mix", self.reverb_mix)?;
        if !(self.input_gain.is_finite() && self.input_gain >= 0.0) {
            return Err(ConfigError::invalid(
                "input_gain",
                format!("must be a finite value >= 0.0, got {}", self.input_gain),
            ));
        }
        Ok(())
    }

    /// Replace the pitch shift.
    pub fn with_pitch(mut self, semitones: f32) -> Self {
        self.pitch_semitones = semitones;
        self
    }

    /// Replace the reverb settings.
    pub fn with_reverb(mut self, room_size: f32, mix: f32) -> Self {
        self.reverb_room_size = room_size;
        self.reverb_mix = mix;
        self
    }

    /// Replace the input gain.
    pub fn with_gain(mut self, gain: f32) -> Self {
        self.input_gain = gain;
        self
    }
}

impl Default for EffectParameters {
    /// The "Normal" voice: no shift, light reverb, unity gain.
    fn default() -> Self {
        Self::new(0.0, default_room_size(), default_mix(), default_gain())
    }
}

fn check_unit(param: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            param,
            format!("must be within 0.0..=1.0, got {value}"),
        ))
    }
}
