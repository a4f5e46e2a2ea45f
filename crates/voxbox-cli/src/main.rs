//! Voxbox CLI - record, render and inspect voice takes.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "voxbox")]
#[command(author, version, about = "Voxbox voice changer", long_about = None)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record from the microphone and render the take
    Record(commands::record::RecordArgs),

    /// Render a WAV file through a voice preset
    Render(commands::render::RenderArgs),

    /// Show levels and format of a WAV file
    Analyze(commands::analyze::AnalyzeArgs),

    /// List, show and save voice presets
    Presets(commands::presets::PresetsArgs),

    /// List audio devices
    Devices(commands::devices::DevicesArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Record(args) => commands::record::run(args),
        Commands::Render(args) => commands::render::run(args),
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Presets(args) => commands::presets::run(args),
        Commands::Devices(args) => commands::devices::run(args),
    }
}
