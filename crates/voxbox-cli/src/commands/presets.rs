//! Preset management commands.
//!
//! Lists, shows and saves voice presets.

use clap::{Args, Subcommand};
use std::path::PathBuf;
use voxbox_config::{Preset, factory_presets, is_factory_preset, paths};

use super::common::{ParamOverrides, load_preset};

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List available presets (factory and user)
    List {
        /// Show only factory presets
        #[arg(long)]
        factory: bool,

        /// Show only user presets
        #[arg(long)]
        user: bool,
    },

    /// Show details of a preset
    Show {
        /// Preset name or path
        name: String,
    },

    /// Save a new preset derived from an existing one
    Save {
        /// Name for the new preset
        name: String,

        /// Preset to start from
        #[arg(long, default_value = "Normal")]
        from: String,

        #[command(flatten)]
        overrides: ParamOverrides,

        /// Description of the preset
        #[arg(short, long)]
        description: Option<String>,

        /// Write to this file instead of the user presets directory
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite if the preset file already exists
        #[arg(long)]
        force: bool,
    },

    /// Show preset directories
    Paths,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List { factory, user } => list_presets(factory, user),
        PresetsCommand::Show { name } => show_preset(&name),
        PresetsCommand::Save {
            name,
            from,
            overrides,
            description,
            path,
            force,
        } => save_preset(&name, &from, &overrides, description, path, force),
        PresetsCommand::Paths => show_paths(),
    }
}

fn list_presets(factory_only: bool, user_only: bool) -> anyhow::Result<()> {
    let show_factory = !user_only;
    let show_user = !factory_only;

    if show_factory {
        println!("Factory Presets:");
        println!("================");
        for preset in factory_presets() {
            let desc = preset.description.as_deref().unwrap_or("");
            println!("  {:12} - {}", preset.name, desc);
        }
        println!();
    }

    if show_user {
        println!("User Presets:");
        println!("=============");
        let user_presets = paths::list_user_presets();
        if user_presets.is_empty() {
            println!("  (none)");
            println!();
            println!("  Create a preset with: voxbox presets save <name> --from <preset> --pitch <st>\n");
        } else {
            for path in user_presets {
                let stem = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("unknown");
                match Preset::load(&path) {
                    Ok(preset) => {
                        let desc = preset.description.as_deref().unwrap_or("");
                        println!("  {:12} - {}", preset.name, desc);
                    }
                    Err(e) => {
                        tracing::debug!(path = %path.display(), error = %e, "unreadable preset");
                        println!("  {:12} - (error loading)", stem);
                    }
                }
            }
        }
        println!();
    }

    Ok(())
}

fn show_preset(name: &str) -> anyhow::Result<()> {
    let preset = load_preset(name)?;
    let p = preset.params;

    println!("Preset: {}", preset.name);
    println!("{}", "=".repeat(8 + preset.name.len()));
    println!();

    if let Some(desc) = &preset.description {
        println!("Description: {}", desc);
        println!();
    }

    println!(
        "  Pitch:       {:+.1} semitones (x{:.3})",
        p.pitch_semitones,
        p.pitch_factor()
    );
    println!("  Room size:   {:.2}", p.reverb_room_size);
    println!("  Reverb mix:  {:.2}", p.reverb_mix);
    println!("  Input gain:  {:.2}", p.input_gain);
    println!();
    println!(
        "Source: {}",
        if is_factory_preset(name) {
            "factory"
        } else {
            "user"
        }
    );

    Ok(())
}

fn save_preset(
    name: &str,
    from: &str,
    overrides: &ParamOverrides,
    description: Option<String>,
    path: Option<PathBuf>,
    force: bool,
) -> anyhow::Result<()> {
    if is_factory_preset(name) {
        anyhow::bail!("'{}' is a factory preset name; choose another name", name);
    }

    let base = load_preset(from)?;
    let params = overrides.apply(base.params)?;

    let preset_path = match path {
        Some(path) => path,
        None => paths::ensure_user_presets_dir()?.join(paths::preset_file_name(name)),
    };
    if preset_path.exists() && !force {
        anyhow::bail!(
            "Preset file {} already exists. Use --force to overwrite.",
            preset_path.display()
        );
    }

    let mut preset = Preset::new(name, params);
    preset.description = description.or_else(|| Some(format!("Based on {}", base.name)));
    preset.save(&preset_path)?;

    println!("Saved preset '{}' to {}", name, preset_path.display());
    Ok(())
}

fn show_paths() -> anyhow::Result<()> {
    println!("Preset Directories:");
    println!("===================");
    println!();
    println!("Config:   {}", paths::user_config_dir().display());
    println!("Settings: {}", paths::settings_path().display());
    println!("Presets:  {}", paths::user_presets_dir().display());
    Ok(())
}
