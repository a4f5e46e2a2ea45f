//! Level, fade, mix, and metering helpers.

use alloc::vec::Vec;
use libm::sqrtf;

/// Peaks below this are treated as silence by [`normalize`].
const SILENCE_PEAK: f32 = 0.001;

/// Multiply every sample by `gain`, in place.
#[inline]
pub fn apply_gain(buffer: &mut [f32], gain: f32) {
    for sample in buffer.iter_mut() {
        *sample *= gain;
    }
}

/// Scale the buffer so its peak magnitude equals `target_peak`.
///
/// Buffers whose peak is below 0.001 are left untouched, so silence (and
/// near-silence) is never amplified into noise or divided by zero.
///
/// # Example
///
/// ```rust
/// use voxbox_core::{normalize, peak_amplitude};
///
/// let mut buf = vec![0.1, -0.4, 0.2];
/// normalize(&mut buf, 0.95);
/// assert!((peak_amplitude(&buf) - 0.95).abs() < 1e-6);
/// ```
pub fn normalize(buffer: &mut [f32], target_peak: f32) {
    let peak = peak_amplitude(buffer);
    if peak < SILENCE_PEAK {
        return;
    }
    apply_gain(buffer, target_peak / peak);
}

/// Linear fade-in over the first `fade_samples` samples, in place.
///
/// Sample `i` of the fade is scaled by `i / fade_samples`, so the first sample
/// becomes silent. A fade longer than the buffer is shortened to fit.
pub fn fade_in(buffer: &mut [f32], fade_samples: usize) {
    let len = fade_samples.min(buffer.len());
    if len == 0 {
        return;
    }
    let step = 1.0 / fade_samples.max(1) as f32;
    for (i, sample) in buffer[..len].iter_mut().enumerate() {
        *sample *= i as f32 * step;
    }
}

/// Linear fade-out over the last `fade_samples` samples, in place.
///
/// Sample `i` of the fade is scaled by `1 - i / fade_samples`, so the fade
/// starts at full level and the last sample is scaled by `1 / fade_samples`.
/// A fade longer than the buffer is shortened to fit.
pub fn fade_out(buffer: &mut [f32], fade_samples: usize) {
    let len = fade_samples.min(buffer.len());
    if len == 0 {
        return;
    }
    let step = 1.0 / fade_samples.max(1) as f32;
    let start = buffer.len() - len;
    for (i, sample) in buffer[start..].iter_mut().enumerate() {
        *sample *= 1.0 - i as f32 * step;
    }
}

/// Crossfade two signals: `a * (1 - amount) + b * amount`.
///
/// The result is as long as the longer input; the shorter one is treated as
/// silence past its end.
///
/// # Example
///
/// ```rust
/// use voxbox_core::mix;
///
/// assert_eq!(mix(&[1.0, 1.0, 1.0], &[-1.0, -1.0, -1.0], 0.5), vec![0.0, 0.0, 0.0]);
/// ```
pub fn mix(a: &[f32], b: &[f32], amount: f32) -> Vec<f32> {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let x = a.get(i).copied().unwrap_or(0.0);
            let y = b.get(i).copied().unwrap_or(0.0);
            x * (1.0 - amount) + y * amount
        })
        .collect()
}

/// Largest absolute sample value, or 0.0 for an empty buffer.
pub fn peak_amplitude(buffer: &[f32]) -> f32 {
    buffer.iter().fold(0.0f32, |peak, s| peak.max(s.abs()))
}

/// Root-mean-square level, or 0.0 for an empty buffer.
pub fn rms(buffer: &[f32]) -> f32 {
    if buffer.is_empty() {
        return 0.0;
    }
    let sum: f32 = buffer.iter().map(|s| s * s).sum();
    sqrtf(sum / buffer.len() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn unity_gain_is_identity() {
        let mut buf = vec![0.1, -0.5, 0.9];
        apply_gain(&mut buf, 1.0);
        assert_eq!(buf, vec![0.1, -0.5, 0.9]);
    }

    #[test]
    fn normalize_hits_target() {
        let mut buf = vec![0.0, 0.25, -0.5, 0.1];
        normalize(&mut buf, 0.95);
        assert!((peak_amplitude(&buf) - 0.95).abs() < 1e-6);
        assert!((buf[2] + 0.95).abs() < 1e-6);
    }

    #[test]
    fn normalize_leaves_silence() {
        let mut buf = vec![0.0f32; 100];
        normalize(&mut buf, 0.95);
        assert!(buf.iter().all(|&s| s == 0.0));

        let mut quiet = vec![0.0005f32; 100];
        normalize(&mut quiet, 0.95);
        assert!(quiet.iter().all(|&s| s == 0.0005));
    }

    #[test]
    fn fades_shape_constant_signal() {
        let d = 1000;
        let mut buf = vec![1.0f32; 2 * d];
        fade_in(&mut buf, d);
        fade_out(&mut buf, d);
        assert_eq!(buf[0], 0.0);
        assert_eq!(buf[d], 1.0);
        assert!(buf[2 * d - 1] < 0.01);
        assert!(buf[d / 2] > 0.4 && buf[d / 2] < 0.6);
    }

    #[test]
    fn fade_longer_than_buffer() {
        let mut buf = vec![1.0f32; 4];
        fade_in(&mut buf, 8);
        assert_eq!(buf, vec![0.0, 0.125, 0.25, 0.375]);
    }

    #[test]
    fn zero_length_fades_are_noops() {
        let mut buf = vec![1.0f32; 4];
        fade_in(&mut buf, 0);
        fade_out(&mut buf, 0);
        assert_eq!(buf, vec![1.0; 4]);
    }

    #[test]
    fn mix_cancels_opposites() {
        assert_eq!(
            mix(&[1.0, 1.0, 1.0], &[-1.0, -1.0, -1.0], 0.5),
            vec![0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn mix_pads_shorter_input() {
        let out = mix(&[1.0, 1.0], &[1.0, 1.0, 1.0, 1.0], 0.5);
        assert_eq!(out, vec![1.0, 1.0, 0.5, 0.5]);
    }

    #[test]
    fn meters() {
        assert_eq!(peak_amplitude(&[]), 0.0);
        assert_eq!(rms(&[]), 0.0);
        assert_eq!(peak_amplitude(&[0.2, -0.7, 0.5]), 0.7);
        assert!((rms(&[1.0, -1.0, 1.0, -1.0]) - 1.0).abs() < 1e-6);
        assert!((rms(&[0.5; 64]) - 0.5).abs() < 1e-6);
    }
}
