//! Record-from-microphone command.

use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use voxbox_config::Settings;
use voxbox_engine::Session;
use voxbox_io::CpalBackend;

use super::common::{ParamOverrides, effect_params, format_db};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Args)]
pub struct RecordArgs {
    /// Stop after this many seconds (default: until Ctrl+C)
    #[arg(short, long)]
    seconds: Option<f32>,

    /// Voice preset name or path
    #[arg(short, long)]
    preset: Option<String>,

    #[command(flatten)]
    overrides: ParamOverrides,

    /// Hear the processed voice while recording
    #[arg(short, long)]
    monitor: bool,

    /// Write the rendered take to this WAV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Play the rendered take when recording stops
    #[arg(long)]
    play: bool,

    /// Input device name or index
    #[arg(long)]
    input: Option<String>,

    /// Output device name or index
    #[arg(long)]
    output_device: Option<String>,

    /// Sample rate in Hz
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Samples per capture block
    #[arg(long)]
    block_size: Option<usize>,

    /// Export bit depth (16, 24 or 32)
    #[arg(long)]
    bits: Option<u16>,
}

pub fn run(args: RecordArgs) -> anyhow::Result<()> {
    let mut settings = Settings::load_or_default();
    if let Some(rate) = args.sample_rate {
        settings.sample_rate = rate;
    }
    if let Some(block_size) = args.block_size {
        settings.block_size = block_size;
    }
    if args.input.is_some() {
        settings.input_device = args.input;
    }
    if args.output_device.is_some() {
        settings.output_device = args.output_device;
    }
    if let Some(bits) = args.bits {
        settings.export_bits = bits;
    }
    settings.validate()?;

    if let Some(seconds) = args.seconds
        && !(seconds.is_finite() && seconds > 0.0)
    {
        anyhow::bail!("--seconds must be positive, got {}", seconds);
    }

    let (label, params) = effect_params(
        args.preset.as_deref(),
        &settings.default_preset,
        &args.overrides,
    )?;
    let monitor = args.monitor || settings.monitor;
    let bits = settings.export_bits;

    let mut session = Session::new(Box::new(CpalBackend::new()), settings);
    session.set_params(params)?;

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    session.start_recording(monitor)?;
    println!("Recording with voice: {}", label);
    println!(
        "  Pitch: {:+.1} st   Room: {:.2}   Mix: {:.2}   Gain: {:.2}",
        params.pitch_semitones, params.reverb_room_size, params.reverb_mix, params.input_gain
    );
    if session.is_monitoring() {
        println!("  Monitor: on");
    }
    match args.seconds {
        Some(seconds) => println!("\nRecording for {:.1}s (Ctrl+C to stop early)...", seconds),
        None => println!("\nPress Ctrl+C to stop..."),
    }

    while running.load(Ordering::SeqCst) {
        if args
            .seconds
            .is_some_and(|limit| session.recorded_seconds() >= limit)
        {
            break;
        }
        thread::sleep(POLL_INTERVAL);
    }

    let Some(processed) = session.stop_recording()? else {
        println!("Nothing recorded.");
        return Ok(());
    };

    let recorded = session.recorded_seconds();
    println!("\nRecorded {:.2}s", recorded);
    println!(
        "Rendered {:.2}s  (peak {})",
        processed.duration_secs(),
        format_db(voxbox_core::peak_amplitude(processed.as_slice()))
    );

    if let Some(path) = &args.output {
        session.export(path, bits)?;
        println!("Saved to {}", path.display());
    }

    if args.play {
        running.store(true, Ordering::SeqCst);
        session.play_processed(false)?;
        println!("Playing... (Ctrl+C to stop)");
        while session.is_playing() && running.load(Ordering::SeqCst) {
            thread::sleep(POLL_INTERVAL);
        }
        session.stop_playback();
    }

    println!("Done!");
    Ok(())
}
