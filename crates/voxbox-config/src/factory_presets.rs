//! The built-in voice catalogue.
//!
//! Seven presets are compiled in and always available. Lookup ignores case
//! and word separators, so `DeepVoice`, `deep_voice`, `deep-voice` and
//! `Deep Voice` all name the same preset.

use crate::Preset;
use crate::params::EffectParameters;

/// Display names of the factory presets, in catalogue order.
pub static FACTORY_PRESET_NAMES: &[&str] = &[
    "Normal",
    "Robot",
    "Monster",
    "Chipmunk",
    "Echo",
    "DeepVoice",
    "HighPitch",
];

static FACTORY_PRESETS: &[(&str, &str, EffectParameters)] = &[
    (
        "Normal",
        "Unshifted voice with a light room",
        EffectParameters::new(0.0, 0.3, 0.3, 1.0),
    ),
    (
        "Robot",
        "Raised pitch in a tight, dry room",
        EffectParameters::new(5.0, 0.1, 0.3, 1.2),
    ),
    (
        "Monster",
        "Deep growl in a large hall",
        EffectParameters::new(-8.0, 0.8, 0.6, 1.5),
    ),
    (
        "Chipmunk",
        "One octave up, almost dry",
        EffectParameters::new(12.0, 0.2, 0.1, 1.0),
    ),
    (
        "Echo",
        "Unshifted voice in a big reflective space",
        EffectParameters::new(0.0, 0.9, 0.8, 1.0),
    ),
    (
        "DeepVoice",
        "Lowered pitch with extra gain",
        EffectParameters::new(-5.0, 0.4, 0.3, 1.3),
    ),
    (
        "HighPitch",
        "Raised a fifth, light room",
        EffectParameters::new(7.0, 0.3, 0.2, 1.0),
    ),
];

fn build(entry: &(&str, &str, EffectParameters)) -> Preset {
    let (name, description, params) = *entry;
    Preset::new(name, params).with_description(description)
}

/// Lowercase and strip separators so spelling variants compare equal.
fn lookup_key(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// All factory presets, in catalogue order.
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS.iter().map(build).collect()
}

/// Look up a factory preset by name.
///
/// # Example
///
/// ```rust
/// use voxbox_config::factory_preset;
///
/// let robot = factory_preset("robot").unwrap();
/// assert_eq!(robot.params.pitch_semitones, 5.0);
/// assert!(factory_preset("deep_voice").is_some());
/// assert!(factory_preset("Alien").is_none());
/// ```
pub fn factory_preset(name: &str) -> Option<Preset> {
    let key = lookup_key(name);
    FACTORY_PRESETS
        .iter()
        .find(|(preset_name, _, _)| lookup_key(preset_name) == key)
        .map(build)
}

/// Whether `name` refers to a factory preset.
pub fn is_factory_preset(name: &str) -> bool {
    factory_preset(name).is_some()
}
