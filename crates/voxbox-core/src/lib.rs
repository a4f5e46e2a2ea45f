//! Voxbox Core - DSP primitives for real-time voice effects
//!
//! This crate provides the signal-processing transforms behind the voxbox
//! voice changer. Every transform is a free function over a sample slice with
//! explicit numeric parameters; none of them keep hidden state between calls.
//!
//! # Transforms
//!
//! ## Length-changing
//!
//! - [`pitch_shift`] - Resampling pitch shift (Catmull-Rom cubic interpolation)
//! - [`pitch_shift_into`] - Same, written into a caller-owned fixed-size block
//!
//! ## In place (output length == input length)
//!
//! - [`reverb`] - Four cascaded single-tap delay passes
//! - [`compressor`] / [`noise_gate`] - Envelope-follower dynamics
//! - [`low_pass`] / [`high_pass`] - One-pole IIR filters
//! - [`normalize`], [`apply_gain`], [`fade_in`], [`fade_out`]
//!
//! ## Metering & mixing
//!
//! - [`peak_amplitude`], [`rms`], [`mix`]
//! - [`db_to_linear`] / [`linear_to_db`]
//!
//! # Empty input
//!
//! All functions treat an empty slice as a no-op. Degenerate parameters
//! (zero peak, zero cutoff, zero attack time) are guarded so that no transform
//! produces NaN or infinity from finite input.
//!
//! # Example
//!
//! ```rust
//! use voxbox_core::{SampleBuffer, normalize, pitch_shift, reverb};
//!
//! let take = SampleBuffer::from_samples(vec![0.1, -0.2, 0.3, -0.1], 44100);
//! let mut shifted = pitch_shift(take.as_slice(), 5.0).into_owned();
//! reverb(&mut shifted, 44100.0, 0.1, 0.3);
//! normalize(&mut shifted, 0.95);
//! ```
//!
//! # no_std Support
//!
//! Disable the default `std` feature to build for embedded targets; the crate
//! only needs `alloc` (for [`SampleBuffer`] and [`pitch_shift`]) and `libm`.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod buffer;
pub mod dynamics;
pub mod envelope;
pub mod filter;
pub mod level;
pub mod math;
pub mod pitch;
pub mod reverb;

pub use buffer::SampleBuffer;
pub use dynamics::{compressor, noise_gate};
pub use envelope::EnvelopeFollower;
pub use filter::{high_pass, low_pass};
pub use level::{apply_gain, fade_in, fade_out, mix, normalize, peak_amplitude, rms};
pub use math::{
    DB_FLOOR, catmull_rom, db_to_linear, lerp, linear_to_db, ms_to_samples, secs_to_samples,
};
pub use pitch::{pitch_factor, pitch_shift, pitch_shift_into, shifted_len};
pub use reverb::{REVERB_TAPS, reverb};
