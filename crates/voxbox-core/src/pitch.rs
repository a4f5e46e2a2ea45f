//! Resampling pitch shift.
//!
//! Shifting by `n` semitones reads the input at a rate of
//! `factor = 2^(n/12)` source samples per output sample, so the output is
//! `round(len / factor)` samples long. Shifting up shortens the signal,
//! shifting down lengthens it; duration is not preserved.
//!
//! Interior positions use 4-point Catmull-Rom interpolation over
//! `idx-1..=idx+2`. Positions within one sample of either edge fall back to
//! linear interpolation between `idx` and `idx+1`, and positions at or past
//! the last sample hold the last sample.
//!
//! Source positions are tracked in `f64`; an `f32` position loses its
//! fractional part on takes longer than a few minutes.

use alloc::borrow::Cow;
use alloc::vec::Vec;
use libm::{floor, pow, powf, round};

use crate::math::{catmull_rom, lerp};

/// Shifts smaller than this many semitones are treated as no shift.
const SEMITONE_EPSILON: f32 = f32::EPSILON;

/// Frequency ratio for a shift of `semitones`: `2^(semitones/12)`.
#[inline]
pub fn pitch_factor(semitones: f32) -> f32 {
    powf(2.0, semitones / 12.0)
}

/// Source samples advanced per output sample, at full precision.
#[inline]
fn source_step(semitones: f32) -> f64 {
    pow(2.0, f64::from(semitones) / 12.0)
}

/// Output length of [`pitch_shift`] for an input of `input_len` samples.
pub fn shifted_len(input_len: usize, semitones: f32) -> usize {
    if is_identity(semitones) {
        return input_len;
    }
    let len = round(input_len as f64 / source_step(semitones));
    if len.is_finite() && len > 0.0 {
        len as usize
    } else {
        0
    }
}

/// Pitch-shift `input` by `semitones`, returning a buffer of [`shifted_len`]
/// samples.
///
/// A shift of (approximately) zero semitones borrows the input unchanged.
/// Empty input gives empty output.
///
/// # Example
///
/// ```rust
/// use voxbox_core::pitch_shift;
///
/// let input = vec![0.0f32; 1200];
/// assert_eq!(pitch_shift(&input, 12.0).len(), 600);
/// assert_eq!(pitch_shift(&input, -12.0).len(), 2400);
/// ```
pub fn pitch_shift(input: &[f32], semitones: f32) -> Cow<'_, [f32]> {
    if is_identity(semitones) || input.is_empty() {
        return Cow::Borrowed(input);
    }

    let step = source_step(semitones);
    let len = shifted_len(input.len(), semitones);
    let mut output = Vec::with_capacity(len);
    output.extend((0..len).map(|i| sample_at(input, i as f64 * step)));
    Cow::Owned(output)
}

/// Pitch-shift `input` into the fixed-size `output` block.
///
/// Writes the first `min(shifted_len, output.len())` shifted samples and
/// zero-fills whatever remains, so a shorter result is padded with silence
/// and a longer one is truncated. Returns the untruncated shifted length.
///
/// Does not allocate, which makes it usable from an audio callback.
pub fn pitch_shift_into(input: &[f32], semitones: f32, output: &mut [f32]) -> usize {
    if input.is_empty() {
        output.fill(0.0);
        return 0;
    }

    let len = shifted_len(input.len(), semitones);
    let written = len.min(output.len());

    if is_identity(semitones) {
        output[..written].copy_from_slice(&input[..written]);
    } else {
        let step = source_step(semitones);
        for (i, out) in output[..written].iter_mut().enumerate() {
            *out = sample_at(input, i as f64 * step);
        }
    }
    output[written..].fill(0.0);
    len
}

#[inline]
fn is_identity(semitones: f32) -> bool {
    semitones.abs() < SEMITONE_EPSILON
}

/// Read `input` at fractional position `pos`. `input` must be non-empty.
#[inline]
fn sample_at(input: &[f32], pos: f64) -> f32 {
    let len = input.len();
    let base = floor(pos);
    let frac = (pos - base) as f32;
    let idx = base as usize;

    if idx + 1 >= len {
        input[len - 1]
    } else if idx == 0 || idx + 2 >= len {
        lerp(input[idx], input[idx + 1], frac)
    } else {
        catmull_rom(
            input[idx - 1],
            input[idx],
            input[idx + 1],
            input[idx + 2],
            frac,
        )
    }
}
