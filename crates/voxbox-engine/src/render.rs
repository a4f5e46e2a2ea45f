//! Offline renderer: the whole take through pitch shift → reverb → normalize.

use voxbox_config::EffectParameters;
use voxbox_core::{SampleBuffer, linear_to_db, normalize, peak_amplitude, pitch_shift, reverb, rms};

/// Options for [`render_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Peak level the result is normalized to.
    pub normalize_target: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            normalize_target: 0.95,
        }
    }
}

/// Render `input` with `params`, normalizing to 0.95.
///
/// The result has [`shifted_len`](voxbox_core::shifted_len) samples at the
/// input's sample rate. Silent input stays silent.
pub fn render(input: &SampleBuffer, params: &EffectParameters) -> SampleBuffer {
    render_with(input, params, RenderOptions::default())
}

/// Render `input` with `params` and explicit [`RenderOptions`].
///
/// Runs synchronously and allocates the output; call it off the audio thread.
pub fn render_with(
    input: &SampleBuffer,
    params: &EffectParameters,
    options: RenderOptions,
) -> SampleBuffer {
    let sample_rate = input.sample_rate();
    let mut samples = pitch_shift(input.as_slice(), params.pitch_semitones).into_owned();
    reverb(
        &mut samples,
        sample_rate as f32,
        params.reverb_room_size,
        params.reverb_mix,
    );
    normalize(&mut samples, options.normalize_target);

    let peak = peak_amplitude(&samples);
    tracing::debug!(
        input = input.len(),
        output = samples.len(),
        peak_db = linear_to_db(peak),
        rms_db = linear_to_db(rms(&samples)),
        "render complete"
    );

    SampleBuffer::from_samples(samples, sample_rate)
}
