//! Offline render of a WAV file.

use clap::Args;
use std::path::{Path, PathBuf};
use voxbox_config::{EffectParameters, Settings};
use voxbox_core::{
    SampleBuffer, apply_gain, compressor, db_to_linear, fade_in, fade_out, high_pass, low_pass,
    mix, ms_to_samples, noise_gate, peak_amplitude,
};
use voxbox_engine::render;
use voxbox_io::{read_wav, write_wav};

use super::common::{ParamOverrides, effect_params, format_db};

const GATE_ATTACK_SECS: f32 = 0.001;
const GATE_RELEASE_SECS: f32 = 0.05;
const COMP_ATTACK_SECS: f32 = 0.005;
const COMP_RELEASE_SECS: f32 = 0.1;

#[derive(Args)]
pub struct RenderArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Voice preset name or path
    #[arg(short, long)]
    preset: Option<String>,

    #[command(flatten)]
    overrides: ParamOverrides,

    /// Noise gate threshold in dB, applied before the voice
    #[arg(long, allow_hyphen_values = true)]
    gate: Option<f32>,

    /// High-pass cutoff in Hz, applied before the voice
    #[arg(long)]
    highpass: Option<f32>,

    /// Low-pass cutoff in Hz, applied before the voice
    #[arg(long)]
    lowpass: Option<f32>,

    /// Compressor threshold in dB, applied before the voice
    #[arg(long, allow_hyphen_values = true)]
    compress: Option<f32>,

    /// Compression ratio
    #[arg(long, default_value = "4.0")]
    ratio: f32,

    /// Fade-in length in milliseconds
    #[arg(long)]
    fade_in: Option<f32>,

    /// Fade-out length in milliseconds
    #[arg(long)]
    fade_out: Option<f32>,

    /// Blend of rendered (1.0) and dry (0.0) signal
    #[arg(long)]
    wet: Option<f32>,

    /// Output bit depth (16, 24 or 32)
    #[arg(long)]
    bits: Option<u16>,
}

/// Clean-up stages run on the dry signal before the voice.
#[derive(Debug, Default, Clone, Copy)]
struct CleanUp {
    gate_db: Option<f32>,
    highpass_hz: Option<f32>,
    lowpass_hz: Option<f32>,
    compress_db: Option<f32>,
    ratio: f32,
}

impl CleanUp {
    /// Gate → high-pass → low-pass → compressor, in place.
    fn apply(&self, samples: &mut [f32], sample_rate: f32) {
        if let Some(db) = self.gate_db {
            noise_gate(
                samples,
                db_to_linear(db),
                GATE_ATTACK_SECS,
                GATE_RELEASE_SECS,
                sample_rate,
            );
        }
        if let Some(hz) = self.highpass_hz {
            high_pass(samples, hz, sample_rate);
        }
        if let Some(hz) = self.lowpass_hz {
            low_pass(samples, hz, sample_rate);
        }
        if let Some(db) = self.compress_db {
            compressor(
                samples,
                db_to_linear(db),
                self.ratio,
                COMP_ATTACK_SECS,
                COMP_RELEASE_SECS,
                sample_rate,
            );
        }
    }
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let settings = Settings::load_or_default();
    let bits = args.bits.unwrap_or(settings.export_bits);
    if let Some(wet) = args.wet
        && !(0.0..=1.0).contains(&wet)
    {
        anyhow::bail!("--wet must be between 0.0 and 1.0, got {}", wet);
    }

    let (label, params) = effect_params(
        args.preset.as_deref(),
        &settings.default_preset,
        &args.overrides,
    )?;

    let input = read_wav(&args.input)?;
    println!(
        "Input: {} ({:.2}s, {} Hz)",
        args.input.display(),
        input.duration_secs(),
        input.sample_rate()
    );
    println!("Voice: {}", label);

    let clean_up = CleanUp {
        gate_db: args.gate,
        highpass_hz: args.highpass,
        lowpass_hz: args.lowpass,
        compress_db: args.compress,
        ratio: args.ratio,
    };
    let output = render_file(
        &input,
        &params,
        &clean_up,
        args.fade_in,
        args.fade_out,
        args.wet,
    );

    write(&args.output, &output, bits)?;
    println!(
        "Output: {} ({:.2}s, peak {})",
        args.output.display(),
        output.duration_secs(),
        format_db(peak_amplitude(output.as_slice()))
    );
    Ok(())
}

/// Gain → clean-up → voice render → fades → optional dry/wet blend.
fn render_file(
    input: &SampleBuffer,
    params: &EffectParameters,
    clean_up: &CleanUp,
    fade_in_ms: Option<f32>,
    fade_out_ms: Option<f32>,
    wet: Option<f32>,
) -> SampleBuffer {
    let sample_rate = input.sample_rate();
    let sr = sample_rate as f32;

    // A file stands in for a take, so it gets the same input gain.
    let mut dry = input.as_slice().to_vec();
    apply_gain(&mut dry, params.input_gain);
    clean_up.apply(&mut dry, sr);

    let take = SampleBuffer::from_samples(dry, sample_rate);
    let mut samples = render(&take, params).into_samples();

    if let Some(ms) = fade_in_ms {
        fade_in(&mut samples, ms_to_samples(ms, sr) as usize);
    }
    if let Some(ms) = fade_out_ms {
        fade_out(&mut samples, ms_to_samples(ms, sr) as usize);
    }
    if let Some(amount) = wet {
        samples = mix(take.as_slice(), &samples, amount);
    }

    SampleBuffer::from_samples(samples, sample_rate)
}

fn write(path: &Path, buffer: &SampleBuffer, bits: u16) -> anyhow::Result<()> {
    write_wav(path, buffer, bits)
        .map_err(|e| anyhow::anyhow!("failed to write {}: {}", path.display(), e))
}
