//! The per-block step that runs inside the capture callback.
//!
//! Nothing here allocates once the [`Recorder`] has been sized: the
//! accumulation buffer is reserved up front, the reverb runs in place, and the
//! pitch shifter writes into a pre-sized scratch block.

use voxbox_config::EffectParameters;
use voxbox_core::{apply_gain, pitch_shift_into, reverb};

/// The live monitor chain: gain → reverb → pitch shift, in place.
#[derive(Debug, Clone, Default)]
pub struct LiveChain {
    scratch: Vec<f32>,
}

impl LiveChain {
    /// A chain whose scratch space fits blocks of up to `block_size` samples.
    pub fn new(block_size: usize) -> Self {
        Self {
            scratch: vec![0.0; block_size],
        }
    }

    /// Run the chain over `block`, leaving exactly `block.len()` samples.
    ///
    /// The pitch shift changes length: a shorter result is zero-padded and a
    /// longer one is truncated to the block.
    pub fn process(&mut self, block: &mut [f32], params: &EffectParameters, sample_rate: f32) {
        apply_gain(block, params.input_gain);
        reverb(block, sample_rate, params.reverb_room_size, params.reverb_mix);

        if params.shifts_pitch() {
            if self.scratch.len() < block.len() {
                // Only when the device hands over a larger block than sized for.
                self.scratch.resize(block.len(), 0.0);
            }
            let source = &mut self.scratch[..block.len()];
            source.copy_from_slice(block);
            pitch_shift_into(source, params.pitch_semitones, block);
        }
    }
}

/// Audio-thread half of a capture session: the growing take plus the live
/// chain's scratch space.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    accumulated: Vec<f32>,
    chain: LiveChain,
}

impl Recorder {
    /// A recorder with `reserve_samples` of accumulation capacity and a live
    /// chain sized for `block_size`.
    pub fn new(reserve_samples: usize, block_size: usize) -> Self {
        Self {
            accumulated: Vec::with_capacity(reserve_samples),
            chain: LiveChain::new(block_size),
        }
    }

    /// Append `block * gain` to the take.
    pub fn append_scaled(&mut self, block: &[f32], gain: f32) {
        self.accumulated.extend(block.iter().map(|s| s * gain));
    }

    /// Samples recorded so far.
    pub fn samples(&self) -> &[f32] {
        &self.accumulated
    }

    /// Number of samples recorded so far.
    pub fn len(&self) -> usize {
        self.accumulated.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.accumulated.is_empty()
    }

    /// Accumulation capacity currently reserved.
    pub fn capacity(&self) -> usize {
        self.accumulated.capacity()
    }

    /// Discard the take and reserve room for `reserve_samples` more.
    pub fn reset(&mut self, reserve_samples: usize) {
        self.accumulated.clear();
        self.accumulated.reserve(reserve_samples);
    }

    /// Move the take out, leaving the recorder empty.
    pub fn take(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.accumulated)
    }
}

/// One capture block: record it, then optionally run the monitor chain on it.
///
/// `params` is the snapshot read once for this block. The take receives
/// `block * input_gain`. When `monitor` is set the block itself is replaced by
/// the live chain's output, ready for playback; otherwise it is left alone.
/// Returns whether the block now holds monitor audio.
pub fn process_block(
    block: &mut [f32],
    params: &EffectParameters,
    monitor: bool,
    sample_rate: f32,
    recorder: &mut Recorder,
) -> bool {
    recorder.append_scaled(block, params.input_gain);
    if !monitor {
        return false;
    }
    recorder.chain.process(block, params, sample_rate);
    true
}
