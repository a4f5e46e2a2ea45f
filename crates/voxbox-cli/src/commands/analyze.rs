//! Level analysis of a WAV file.

use clap::Args;
use std::path::PathBuf;
use voxbox_core::{SampleBuffer, peak_amplitude, rms};
use voxbox_io::{read_wav, read_wav_info};

use super::common::format_db;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// WAV file to analyze
    #[arg(value_name = "FILE")]
    input: PathBuf,
}

/// Levels of a mono buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Levels {
    peak: f32,
    rms: f32,
    duration_secs: f32,
}

impl Levels {
    fn measure(buffer: &SampleBuffer) -> Self {
        Self {
            peak: peak_amplitude(buffer.as_slice()),
            rms: rms(buffer.as_slice()),
            duration_secs: buffer.duration_secs(),
        }
    }
}

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let info = read_wav_info(&args.input)?;
    let buffer = read_wav(&args.input)?;
    let levels = Levels::measure(&buffer);

    println!("File: {}", args.input.display());
    println!(
        "  Format: {} Hz, {} channel(s), {}-bit {}",
        info.sample_rate,
        info.channels,
        info.bits_per_sample,
        if info.is_float { "float" } else { "PCM" }
    );
    println!(
        "  Duration: {:.3}s ({} frames)",
        levels.duration_secs, info.num_frames
    );
    println!("  Peak: {:.4} ({})", levels.peak, format_db(levels.peak));
    println!("  RMS:  {:.4} ({})", levels.rms, format_db(levels.rms));
    if levels.peak < 0.001 {
        println!("  (silent)");
    }
    Ok(())
}
