//! Sample buffer with format metadata.

use alloc::vec::Vec;

/// An ordered run of `f32` samples plus the format needed to play them back.
///
/// Voxbox works in mono throughout, so `channels` is 1 for every buffer the
/// engine produces; the field exists so exporters can describe the data.
///
/// Effects operate on the raw slice ([`as_slice`](Self::as_slice) /
/// [`as_mut_slice`](Self::as_mut_slice)); the buffer itself only carries the
/// samples between stages.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

impl SampleBuffer {
    /// Create an empty mono buffer.
    pub fn new(sample_rate: u32) -> Self {
        Self::from_samples(Vec::new(), sample_rate)
    }

    /// Create an empty mono buffer with room for `capacity` samples.
    pub fn with_capacity(capacity: usize, sample_rate: u32) -> Self {
        Self::from_samples(Vec::with_capacity(capacity), sample_rate)
    }

    /// Wrap existing mono samples.
    pub fn from_samples(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
            channels: 1,
        }
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of interleaved channels.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / (self.sample_rate as f32 * f32::from(self.channels.max(1)))
    }

    /// Borrow the samples.
    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }

    /// Borrow the samples mutably, for in-place effects.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    /// Append samples to the end of the buffer.
    pub fn extend_from_slice(&mut self, samples: &[f32]) {
        self.samples.extend_from_slice(samples);
    }

    /// Remove all samples, keeping the allocation.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Consume the buffer and return the raw samples.
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}

impl AsRef<[f32]> for SampleBuffer {
    fn as_ref(&self) -> &[f32] {
        &self.samples
    }
}
