//! Cascaded single-tap reverb.
//!
//! Four delay passes run one after another over the same buffer. Each pass
//! adds one echo of its own input:
//!
//! ```text
//! y[n] = x[n] + gain * x[n - d]        (x[n - d] = 0 for n < d)
//! ```
//!
//! where `d = round(room_size * sample_rate * offset)` (at least one sample)
//! and `gain = tap_gain * mix`. Pass two reads the output of pass one, so
//! later passes also echo the earlier echoes. This is a cascade, not the
//! parallel tap sum of a textbook multi-tap reverb.
//!
//! | Pass | Offset | Tap gain |
//! |------|--------|----------|
//! | 1 | 30 ms | 0.8 |
//! | 2 | 50 ms | 0.6 |
//! | 3 | 70 ms | 0.4 |
//! | 4 | 90 ms | 0.3 |

use crate::math::secs_to_samples;

/// `(offset_seconds, tap_gain)` for each pass, in processing order.
pub const REVERB_TAPS: [(f32, f32); 4] = [(0.030, 0.8), (0.050, 0.6), (0.070, 0.4), (0.090, 0.3)];

/// Apply the cascaded reverb in place.
///
/// # Arguments
/// * `buffer` - Samples to process
/// * `sample_rate` - Sample rate in Hz
/// * `room_size` - Scales every delay length, 0.0 to 1.0
/// * `mix` - Scales every tap gain, 0.0 (dry) to 1.0
///
/// Each pass walks the buffer from the end towards the start, so the
/// delayed sample it reads is still the pass input. No delay line is
/// allocated.
pub fn reverb(buffer: &mut [f32], sample_rate: f32, room_size: f32, mix: f32) {
    if buffer.is_empty() {
        return;
    }

    for &(offset, tap_gain) in &REVERB_TAPS {
        let delay = secs_to_samples(room_size * offset, sample_rate).max(1);
        let gain = tap_gain * mix;
        if delay >= buffer.len() || gain == 0.0 {
            continue;
        }
        for n in (delay..buffer.len()).rev() {
            buffer[n] += buffer[n - delay] * gain;
        }
    }
}
