//! Mathematical utility functions for DSP.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//!
//! # Interpolation
//!
//! - [`lerp`] - Linear interpolation
//! - [`catmull_rom`] - 4-point cubic interpolation
//!
//! # Utilities
//!
//! - [`ms_to_samples`] / [`secs_to_samples`] - Time conversions

use libm::{log10f, powf, roundf};

/// Lowest level reported by [`linear_to_db`], returned for non-positive input.
pub const DB_FLOOR: f32 = -100.0;

/// Convert decibels to linear gain.
///
/// `10^(dB/20)`: 0 dB → 1.0, -6 dB → ~0.5, +6 dB → ~2.0.
///
/// # Example
/// ```rust
/// use voxbox_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    powf(10.0, db / 20.0)
}

/// Convert linear gain to decibels.
///
/// `20·log10(linear)`. Zero and negative input has no logarithm, so it is
/// reported as [`DB_FLOOR`] (-100 dB).
///
/// # Example
/// ```rust
/// use voxbox_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert_eq!(linear_to_db(0.0), -100.0);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        DB_FLOOR
    } else {
        20.0 * log10f(linear)
    }
}

/// Linear interpolation between two values.
///
/// # Arguments
/// * `a` - Start value (at t=0)
/// * `b` - End value (at t=1)
/// * `t` - Interpolation factor (0.0 to 1.0)
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Catmull-Rom cubic interpolation between `p1` and `p2`.
///
/// `p0` and `p3` are the outer neighbours. At `t = 0` the result is exactly
/// `p1`; at `t = 1` it is exactly `p2`.
#[inline]
pub fn catmull_rom(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * (2.0 * p1
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// Convert milliseconds to samples.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * sample_rate / 1000.0
}

/// Convert a duration in seconds to a whole number of samples (rounded).
///
/// Negative or non-finite durations give zero.
#[inline]
pub fn secs_to_samples(secs: f32, sample_rate: f32) -> usize {
    let samples = roundf(secs * sample_rate);
    if samples.is_finite() && samples > 0.0 {
        samples as usize
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_linear_roundtrip() {
        let original = 0.5;
        let db = linear_to_db(original);
        let back = db_to_linear(db);
        assert!(
            (original - back).abs() < 1e-5,
            "Roundtrip failed: {} -> {} -> {}",
            original,
            db,
            back
        );
    }

    #[test]
    fn test_db_known_values() {
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-6);
        assert!((db_to_linear(-6.0206) - 0.5).abs() < 0.001);
        assert!((db_to_linear(6.0206) - 2.0).abs() < 0.001);
        assert!((db_to_linear(-20.0) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_linear_to_db_floor() {
        assert_eq!(linear_to_db(0.0), DB_FLOOR);
        assert_eq!(linear_to_db(-0.5), DB_FLOOR);
        // Small positive values are not clamped
        assert!(linear_to_db(1e-6) < DB_FLOOR);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
    }

    #[test]
    fn test_catmull_rom_endpoints() {
        assert_eq!(catmull_rom(0.3, 0.7, -0.2, 0.9, 0.0), 0.7);
        assert!((catmull_rom(0.3, 0.7, -0.2, 0.9, 1.0) - (-0.2)).abs() < 1e-6);
    }

    #[test]
    fn test_catmull_rom_linear_data() {
        // Collinear points interpolate linearly
        let v = catmull_rom(0.0, 1.0, 2.0, 3.0, 0.25);
        assert!((v - 1.25).abs() < 1e-6, "got {v}");
    }

    #[test]
    fn test_time_conversions() {
        assert_eq!(ms_to_samples(10.0, 48000.0), 480.0);
        assert_eq!(secs_to_samples(0.03, 44100.0), 1323);
        assert_eq!(secs_to_samples(-1.0, 44100.0), 0);
        assert_eq!(secs_to_samples(f32::NAN, 44100.0), 0);
    }
}
