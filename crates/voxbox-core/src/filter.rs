//! One-pole IIR filters (6 dB/octave).
//!
//! With `rc = 1 / (2π · cutoff)` and `dt = 1 / sample_rate`:
//!
//! ```text
//! low-pass:  alpha = dt / (rc + dt);  y[n] = y[n-1] + alpha * (x[n] - y[n-1])
//! high-pass: alpha = rc / (rc + dt);  y[n] = alpha * (y[n-1] + x[n] - x[n-1])
//! ```
//!
//! Filter state starts at zero for every call (`x[-1] = y[-1] = 0`).

use core::f32::consts::TAU;

/// One-pole low-pass filter, in place.
///
/// A non-positive cutoff blocks everything (output is silence); a
/// non-positive sample rate leaves the buffer untouched.
pub fn low_pass(buffer: &mut [f32], cutoff_hz: f32, sample_rate: f32) {
    if buffer.is_empty() || sample_rate <= 0.0 {
        return;
    }
    if cutoff_hz <= 0.0 {
        buffer.fill(0.0);
        return;
    }

    let rc = 1.0 / (TAU * cutoff_hz);
    let dt = 1.0 / sample_rate;
    let alpha = dt / (rc + dt);

    let mut prev = 0.0f32;
    for sample in buffer.iter_mut() {
        prev += alpha * (*sample - prev);
        *sample = prev;
    }
}

/// One-pole high-pass filter, in place.
///
/// A non-positive cutoff passes everything; a non-positive sample rate leaves
/// the buffer untouched.
pub fn high_pass(buffer: &mut [f32], cutoff_hz: f32, sample_rate: f32) {
    if buffer.is_empty() || sample_rate <= 0.0 || cutoff_hz <= 0.0 {
        return;
    }

    let rc = 1.0 / (TAU * cutoff_hz);
    let dt = 1.0 / sample_rate;
    let alpha = rc / (rc + dt);

    let mut prev_in = 0.0f32;
    let mut prev_out = 0.0f32;
    for sample in buffer.iter_mut() {
        let input = *sample;
        prev_out = alpha * (prev_out + input - prev_in);
        prev_in = input;
        *sample = prev_out;
    }
}
