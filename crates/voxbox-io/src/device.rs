//! Device enumeration and lookup on the cpal default host.

use crate::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{Device, Host};

/// Fallback rate when a device will not report its default config.
const FALLBACK_SAMPLE_RATE: u32 = 44100;

/// Extract device name via `description()` (cpal 0.17+).
pub(crate) fn device_name(device: &Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

/// Audio device information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDevice {
    /// Human-readable device name.
    pub name: String,
    /// Whether the device supports audio input.
    pub is_input: bool,
    /// Whether the device supports audio output.
    pub is_output: bool,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
    /// Default channel count.
    pub default_channels: u16,
}

fn input_info(device: &Device, name: String) -> AudioDevice {
    let config = device.default_input_config().ok();
    AudioDevice {
        name,
        is_input: true,
        is_output: device.default_output_config().is_ok(),
        default_sample_rate: config
            .as_ref()
            .map(|c| c.sample_rate())
            .unwrap_or(FALLBACK_SAMPLE_RATE),
        default_channels: config.as_ref().map(|c| c.channels()).unwrap_or(1),
    }
}

fn output_info(device: &Device, name: String) -> AudioDevice {
    let config = device.default_output_config().ok();
    AudioDevice {
        name,
        is_input: false,
        is_output: true,
        default_sample_rate: config
            .as_ref()
            .map(|c| c.sample_rate())
            .unwrap_or(FALLBACK_SAMPLE_RATE),
        default_channels: config.as_ref().map(|c| c.channels()).unwrap_or(2),
    }
}

/// List all available audio devices on the default host.
///
/// Devices that are both input and output appear once, as inputs.
pub fn list_devices() -> Result<Vec<AudioDevice>> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    if let Ok(inputs) = host.input_devices() {
        for device in inputs {
            if let Ok(name) = device_name(&device) {
                devices.push(input_info(&device, name));
            }
        }
    }

    if let Ok(outputs) = host.output_devices() {
        for device in outputs {
            if let Ok(name) = device_name(&device) {
                if devices.iter().any(|d| d.name == name) {
                    continue;
                }
                devices.push(output_info(&device, name));
            }
        }
    }

    Ok(devices)
}

/// Get the default input and output devices, if present.
pub fn default_device() -> Result<(Option<AudioDevice>, Option<AudioDevice>)> {
    let host = cpal::default_host();

    let input = host
        .default_input_device()
        .and_then(|d| device_name(&d).ok().map(|name| input_info(&d, name)));

    let output = host
        .default_output_device()
        .and_then(|d| device_name(&d).ok().map(|name| output_info(&d, name)));

    Ok((input, output))
}

/// Which side of the host a lookup searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeviceKind {
    Input,
    Output,
}

impl DeviceKind {
    fn label(self) -> &'static str {
        match self {
            DeviceKind::Input => "input",
            DeviceKind::Output => "output",
        }
    }
}

/// Resolve a device by index, exact name, or case-insensitive partial name;
/// `None` selects the host default.
pub(crate) fn find_device(host: &Host, name_or_index: Option<&str>, kind: DeviceKind) -> Result<Device> {
    let Some(search) = name_or_index else {
        let default = match kind {
            DeviceKind::Input => host.default_input_device(),
            DeviceKind::Output => host.default_output_device(),
        };
        return default.ok_or(Error::NoDevice);
    };

    let devices: Vec<Device> = match kind {
        DeviceKind::Input => host.input_devices(),
        DeviceKind::Output => host.output_devices(),
    }
    .map_err(|e| Error::Stream(e.to_string()))?
    .collect();

    let names: Vec<String> = devices
        .iter()
        .map(|d| device_name(d).unwrap_or_default())
        .collect();

    let index = match_device(&names, search, kind.label())?;
    devices
        .into_iter()
        .nth(index)
        .ok_or_else(|| Error::DeviceNotFound(search.to_string()))
}

/// Pick an entry of `names` by index, exact name, or partial name.
fn match_device(names: &[String], search: &str, kind: &str) -> Result<usize> {
    if let Ok(index) = search.parse::<usize>() {
        return if index < names.len() {
            Ok(index)
        } else {
            Err(Error::DeviceNotFound(format!(
                "{} device index {} (only {} devices available)",
                kind,
                index,
                names.len()
            )))
        };
    }

    if let Some(index) = names.iter().position(|n| n == search) {
        return Ok(index);
    }

    let search_lower = search.to_lowercase();
    let matches: Vec<usize> = names
        .iter()
        .enumerate()
        .filter(|(_, n)| n.to_lowercase().contains(&search_lower))
        .map(|(i, _)| i)
        .collect();

    match matches.as_slice() {
        [] => Err(Error::DeviceNotFound(format!(
            "no {} device matching '{}'",
            kind, search
        ))),
        [only] => Ok(*only),
        [first, ..] => {
            tracing::warn!(
                search,
                kind,
                candidates = matches.len(),
                using = %names[*first],
                "device name is ambiguous, using first match"
            );
            Ok(*first)
        }
    }
}
