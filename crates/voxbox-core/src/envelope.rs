//! Envelope follower for tracking signal amplitude.
//!
//! Used by the [`compressor`](crate::compressor) and
//! [`noise_gate`](crate::noise_gate).

use libm::expf;

/// Peak envelope follower with separate attack and release times.
///
/// Each sample moves the envelope toward `|x|`:
///
/// ```text
/// env = coeff * env + (1 - coeff) * |x|
/// ```
///
/// using the attack coefficient while the signal rises above the envelope and
/// the release coefficient while it falls. A coefficient is
/// `exp(-1 / (time_secs * sample_rate))`.
///
/// # Example
///
/// ```rust
/// use voxbox_core::EnvelopeFollower;
///
/// let mut env = EnvelopeFollower::new(0.001, 0.050, 48000.0);
/// let level = env.process(0.5);
/// assert!(level > 0.0 && level < 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    envelope: f32,
    attack_coeff: f32,
    release_coeff: f32,
}

impl EnvelopeFollower {
    /// Create a follower starting at zero.
    ///
    /// Non-positive times give an instantaneous (coefficient 0) response.
    pub fn new(attack_secs: f32, release_secs: f32, sample_rate: f32) -> Self {
        Self {
            envelope: 0.0,
            attack_coeff: time_coeff(attack_secs, sample_rate),
            release_coeff: time_coeff(release_secs, sample_rate),
        }
    }

    /// Process a sample and return the updated envelope level.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let input_abs = input.abs();
        let coeff = if input_abs > self.envelope {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.envelope = coeff * self.envelope + (1.0 - coeff) * input_abs;
        self.envelope
    }

    /// Current envelope level without processing new input.
    pub fn level(&self) -> f32 {
        self.envelope
    }

    /// Reset the envelope to zero.
    pub fn reset(&mut self) {
        self.envelope = 0.0;
    }
}

fn time_coeff(secs: f32, sample_rate: f32) -> f32 {
    let samples = secs * sample_rate;
    if samples > 0.0 && samples.is_finite() {
        expf(-1.0 / samples)
    } else {
        0.0
    }
}
