//! Envelope-driven dynamics: compressor and noise gate.
//!
//! Both processors run an [`EnvelopeFollower`] over the buffer and update the
//! envelope with each sample before deciding what to do with it.

use crate::envelope::EnvelopeFollower;

/// Downward compressor, in place.
///
/// While the envelope is above `threshold` (linear), each sample is scaled by
///
/// ```text
/// reduction = (threshold + (envelope - threshold) / ratio) / envelope
/// ```
///
/// which is at most 1. Below the threshold samples pass unchanged. A `ratio`
/// below 1 would expand instead of compress and is treated as 1, and a
/// negative `threshold` is treated as 0.
///
/// # Arguments
/// * `threshold` - Linear level where compression begins
/// * `ratio` - Compression ratio (4.0 = 4:1)
/// * `attack_secs` / `release_secs` - Envelope time constants
/// * `sample_rate` - Sample rate in Hz
pub fn compressor(
    buffer: &mut [f32],
    threshold: f32,
    ratio: f32,
    attack_secs: f32,
    release_secs: f32,
    sample_rate: f32,
) {
    if buffer.is_empty() {
        return;
    }

    let ratio = ratio.max(1.0);
    let threshold = threshold.max(0.0);
    let mut env = EnvelopeFollower::new(attack_secs, release_secs, sample_rate);

    for sample in buffer.iter_mut() {
        let envelope = env.process(*sample);
        // Silence passes even at a zero threshold.
        if envelope > threshold && envelope > 0.0 {
            let reduction = (threshold + (envelope - threshold) / ratio) / envelope;
            *sample *= reduction;
        }
    }
}

/// Noise gate, in place: zeroes every sample whose envelope is below
/// `threshold` (linear).
pub fn noise_gate(
    buffer: &mut [f32],
    threshold: f32,
    attack_secs: f32,
    release_secs: f32,
    sample_rate: f32,
) {
    if buffer.is_empty() {
        return;
    }

    let mut env = EnvelopeFollower::new(attack_secs, release_secs, sample_rate);

    for sample in buffer.iter_mut() {
        if env.process(*sample) < threshold {
            *sample = 0.0;
        }
    }
}
