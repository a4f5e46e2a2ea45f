//! Audio device listing command.

use clap::{Args, Subcommand};
use voxbox_io::{AudioDevice, default_device, list_devices};

#[derive(Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    command: Option<DevicesCommand>,
}

#[derive(Subcommand)]
enum DevicesCommand {
    /// List all available audio devices
    List,

    /// Show default device information
    Info,
}

pub fn run(args: DevicesArgs) -> anyhow::Result<()> {
    match args.command.unwrap_or(DevicesCommand::List) {
        DevicesCommand::List => {
            let devices = list_devices()?;

            if devices.is_empty() {
                println!("No audio devices found.");
                return Ok(());
            }

            println!("Available Audio Devices");
            println!("=======================\n");

            let inputs: Vec<_> = devices.iter().filter(|d| d.is_input).collect();
            let outputs: Vec<_> = devices.iter().filter(|d| d.is_output).collect();
            print_group("Input Devices:", &inputs);
            print_group("Output Devices:", &outputs);

            println!(
                "Total: {} input(s), {} output(s)",
                inputs.len(),
                outputs.len()
            );
            println!();
            println!("Tip: Use device index or partial name with --input/--output-device:");
            println!("  voxbox record --input 0 --monitor");
            println!("  voxbox record --input \"USB\" --output-device \"USB\" --monitor");
        }

        DevicesCommand::Info => {
            let (input, output) = default_device()?;

            println!("Default Audio Devices");
            println!("=====================\n");
            print_default("Input", input.as_ref());
            println!();
            print_default("Output", output.as_ref());
        }
    }

    Ok(())
}

fn print_group(title: &str, devices: &[&AudioDevice]) {
    if devices.is_empty() {
        return;
    }
    println!("{}", title);
    for (idx, device) in devices.iter().enumerate() {
        let duplex = if device.is_input && device.is_output {
            " (input/output)"
        } else {
            ""
        };
        println!(
            "  [{}] {} ({} Hz, {} ch){}",
            idx, device.name, device.default_sample_rate, device.default_channels, duplex
        );
    }
    println!();
}

fn print_default(kind: &str, device: Option<&AudioDevice>) {
    match device {
        Some(device) => {
            println!("Default {}:", kind);
            println!("  Name: {}", device.name);
            println!("  Sample Rate: {} Hz", device.default_sample_rate);
            println!("  Channels: {}", device.default_channels);
        }
        None => println!("Default {}: None", kind),
    }
}
