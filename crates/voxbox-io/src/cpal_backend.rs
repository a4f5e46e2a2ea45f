//! The default [`AudioBackend`], wrapping [cpal](https://crates.io/crates/cpal)
//! (ALSA on Linux, CoreAudio on macOS, WASAPI on Windows).
//!
//! Capture streams run at the device's own period size and channel count; a
//! [`BlockAssembler`] inside the callback turns whatever the host delivers
//! into the fixed-length mono blocks the session expects.

use crate::backend::{
    AudioBackend, BlockCallback, ErrorCallback, OutputCallback, StreamConfig, StreamHandle,
};
use crate::block::{BlockAssembler, expand_mono};
use crate::device::{DeviceKind, find_device};
use crate::{AudioDevice, Error, Result};
use cpal::Host;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

/// cpal-based audio backend.
pub struct CpalBackend {
    host: Host,
}

impl CpalBackend {
    /// Create a backend on the platform's default audio host.
    pub fn new() -> Self {
        let host = cpal::default_host();
        tracing::info!(host = host.id().name(), "cpal backend initialized");
        Self { host }
    }

    fn channels_for(
        &self,
        device: &cpal::Device,
        config: &StreamConfig,
        kind: DeviceKind,
    ) -> u16 {
        if let Some(channels) = config.channels {
            return channels.max(1);
        }
        let default = match kind {
            DeviceKind::Input => device.default_input_config().map(|c| c.channels()),
            DeviceKind::Output => device.default_output_config().map(|c| c.channels()),
        };
        default.unwrap_or(match kind {
            DeviceKind::Input => 1,
            DeviceKind::Output => 2,
        })
    }
}

impl Default for CpalBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioBackend for CpalBackend {
    fn name(&self) -> &'static str {
        "cpal"
    }

    fn list_devices(&self) -> Result<Vec<AudioDevice>> {
        crate::device::list_devices()
    }

    fn default_input_device(&self) -> Result<Option<AudioDevice>> {
        let (input, _) = crate::device::default_device()?;
        Ok(input)
    }

    fn default_output_device(&self) -> Result<Option<AudioDevice>> {
        let (_, output) = crate::device::default_device()?;
        Ok(output)
    }

    fn open_capture(
        &self,
        config: &StreamConfig,
        mut callback: BlockCallback,
        mut error_callback: ErrorCallback,
    ) -> Result<StreamHandle> {
        let device = find_device(&self.host, config.device.as_deref(), DeviceKind::Input)?;
        let channels = self.channels_for(&device, config, DeviceKind::Input);

        let stream_config = cpal::StreamConfig {
            channels,
            sample_rate: config.sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        let mut assembler = BlockAssembler::new(config.block_size, channels);
        let stream = device
            .build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    assembler.push(data, |block| callback(block));
                },
                move |err| {
                    error_callback(&err.to_string());
                },
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        stream.play().map_err(|e| Error::Stream(e.to_string()))?;
        tracing::info!(
            channels,
            sample_rate = config.sample_rate,
            block_size = config.block_size,
            "capture stream started"
        );

        Ok(StreamHandle::new(stream))
    }

    fn open_output(
        &self,
        config: &StreamConfig,
        mut callback: OutputCallback,
        mut error_callback: ErrorCallback,
    ) -> Result<StreamHandle> {
        let device = find_device(&self.host, config.device.as_deref(), DeviceKind::Output)?;
        let channels = self.channels_for(&device, config, DeviceKind::Output);

        let stream_config = cpal::StreamConfig {
            channels,
            sample_rate: config.sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        // Sized for the requested period; grows only if the host asks for more.
        let mut mono = vec![0.0f32; config.block_size.max(1)];
        let stride = usize::from(channels);
        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let frames = data.len() / stride;
                    if mono.len() < frames {
                        mono.resize(frames, 0.0);
                    }
                    let buf = &mut mono[..frames];
                    buf.fill(0.0);
                    callback(&mut *buf);
                    expand_mono(buf, data, channels);
                },
                move |err| {
                    error_callback(&err.to_string());
                },
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        stream.play().map_err(|e| Error::Stream(e.to_string()))?;
        tracing::info!(
            channels,
            sample_rate = config.sample_rate,
            "output stream started"
        );

        Ok(StreamHandle::new(stream))
    }
}
