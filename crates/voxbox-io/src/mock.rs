//! A deterministic [`AudioBackend`] driven by the caller instead of a device.
//!
//! Clones share state: hand one clone to the session under test and keep the
//! other to feed capture blocks and pull output.
//!
//! ```rust
//! use voxbox_io::{AudioBackend, MockBackend, StreamConfig};
//!
//! let mock = MockBackend::new();
//! let backend: Box<dyn AudioBackend> = Box::new(mock.clone());
//!
//! let _capture = backend
//!     .open_capture(
//!         &StreamConfig::new(44100, 4),
//!         Box::new(|block: &mut [f32]| block.iter_mut().for_each(|s| *s *= 2.0)),
//!         Box::new(|_: &str| {}),
//!     )
//!     .unwrap();
//!
//! let blocks = mock.push_block(&[0.1, 0.2, 0.3, 0.4]);
//! assert_eq!(blocks, vec![vec![0.2, 0.4, 0.6, 0.8]]);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;

use crate::backend::{
    AudioBackend, BlockCallback, ErrorCallback, OutputCallback, StreamConfig, StreamHandle,
};
use crate::block::BlockAssembler;
use crate::{AudioDevice, Error, Result};

const INPUT_NAME: &str = "Mock Microphone";
const OUTPUT_NAME: &str = "Mock Speakers";
const MOCK_RATE: u32 = 44100;

struct CaptureSlot {
    id: u64,
    assembler: BlockAssembler,
    callback: BlockCallback,
    error_callback: ErrorCallback,
}

struct OutputSlot {
    id: u64,
    callback: OutputCallback,
    error_callback: ErrorCallback,
}

struct MockState {
    has_input: bool,
    has_output: bool,
    next_id: u64,
    capture: Option<CaptureSlot>,
    outputs: Vec<OutputSlot>,
    captures_opened: usize,
    last_capture_config: Option<StreamConfig>,
}

/// Caller-driven audio backend for tests and headless runs.
#[derive(Clone)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    /// A backend with one input and one output device.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                has_input: true,
                has_output: true,
                next_id: 0,
                capture: None,
                outputs: Vec::new(),
                captures_opened: 0,
                last_capture_config: None,
            })),
        }
    }

    /// Simulate a machine with no capture device.
    pub fn without_input(self) -> Self {
        self.state.lock().has_input = false;
        self
    }

    /// Simulate a machine with no output device.
    pub fn without_output(self) -> Self {
        self.state.lock().has_output = false;
        self
    }

    /// Deliver captured samples to the open capture stream.
    ///
    /// Samples are re-chunked to the stream's block size exactly like a real
    /// device; the callback runs synchronously once per completed block. Returns
    /// each completed block as the callback left it. With no capture stream
    /// open the samples are dropped and the result is empty.
    pub fn push_block(&self, samples: &[f32]) -> Vec<Vec<f32>> {
        let mut state = self.state.lock();
        let mut delivered = Vec::new();
        if let Some(slot) = state.capture.as_mut() {
            let callback = &mut slot.callback;
            slot.assembler.push(samples, |block| {
                callback(&mut *block);
                delivered.push(block.to_vec());
            });
        }
        delivered
    }

    /// Pull `frames` samples from the open output streams.
    ///
    /// Streams are summed, as a device mixer would. Returns `None` when no
    /// output stream is open.
    pub fn pull_output(&self, frames: usize) -> Option<Vec<f32>> {
        let mut state = self.state.lock();
        if state.outputs.is_empty() {
            return None;
        }
        let mut mixed = vec![0.0f32; frames];
        let mut scratch = vec![0.0f32; frames];
        for slot in &mut state.outputs {
            scratch.fill(0.0);
            (slot.callback)(&mut scratch[..]);
            for (m, s) in mixed.iter_mut().zip(&scratch) {
                *m += s;
            }
        }
        Some(mixed)
    }

    /// Report a runtime failure to every open stream's error callback.
    pub fn fail_streams(&self, message: &str) {
        let mut state = self.state.lock();
        if let Some(slot) = state.capture.as_mut() {
            (slot.error_callback)(message);
        }
        for slot in &mut state.outputs {
            (slot.error_callback)(message);
        }
    }

    /// Whether a capture stream is currently open.
    pub fn is_capturing(&self) -> bool {
        self.state.lock().capture.is_some()
    }

    /// Number of output streams currently open.
    pub fn open_outputs(&self) -> usize {
        self.state.lock().outputs.len()
    }

    /// Total capture streams opened over the backend's lifetime.
    pub fn captures_opened(&self) -> usize {
        self.state.lock().captures_opened
    }

    /// Config of the most recently opened capture stream.
    pub fn last_capture_config(&self) -> Option<StreamConfig> {
        self.state.lock().last_capture_config.clone()
    }

    fn check_device(name: Option<&str>, expected: &str) -> Result<()> {
        match name {
            Some(search) if !expected.to_lowercase().contains(&search.to_lowercase()) => {
                Err(Error::DeviceNotFound(search.to_string()))
            }
            _ => Ok(()),
        }
    }

    fn input_device(&self) -> AudioDevice {
        AudioDevice {
            name: INPUT_NAME.to_string(),
            is_input: true,
            is_output: false,
            default_sample_rate: MOCK_RATE,
            default_channels: 1,
        }
    }

    fn output_device(&self) -> AudioDevice {
        AudioDevice {
            name: OUTPUT_NAME.to_string(),
            is_input: false,
            is_output: true,
            default_sample_rate: MOCK_RATE,
            default_channels: 2,
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MockBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MockBackend")
            .field("has_input", &state.has_input)
            .field("has_output", &state.has_output)
            .field("capturing", &state.capture.is_some())
            .field("outputs", &state.outputs.len())
            .finish()
    }
}

/// Closes its slot when the owning [`StreamHandle`] is dropped.
struct MockStream {
    state: Arc<Mutex<MockState>>,
    id: u64,
}

impl Drop for MockStream {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        if state.capture.as_ref().is_some_and(|c| c.id == self.id) {
            state.capture = None;
        }
        state.outputs.retain(|o| o.id != self.id);
    }
}

impl AudioBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn list_devices(&self) -> Result<Vec<AudioDevice>> {
        let state = self.state.lock();
        let mut devices = Vec::new();
        if state.has_input {
            devices.push(self.input_device());
        }
        if state.has_output {
            devices.push(self.output_device());
        }
        Ok(devices)
    }

    fn default_input_device(&self) -> Result<Option<AudioDevice>> {
        let has_input = self.state.lock().has_input;
        Ok(has_input.then(|| self.input_device()))
    }

    fn default_output_device(&self) -> Result<Option<AudioDevice>> {
        let has_output = self.state.lock().has_output;
        Ok(has_output.then(|| self.output_device()))
    }

    fn open_capture(
        &self,
        config: &StreamConfig,
        callback: BlockCallback,
        error_callback: ErrorCallback,
    ) -> Result<StreamHandle> {
        let mut state = self.state.lock();
        if !state.has_input {
            return Err(Error::NoDevice);
        }
        Self::check_device(config.device.as_deref(), INPUT_NAME)?;
        if state.capture.is_some() {
            return Err(Error::Stream("capture device already open".to_string()));
        }

        let id = state.next_id;
        state.next_id += 1;
        state.capture = Some(CaptureSlot {
            id,
            assembler: BlockAssembler::new(config.block_size, config.channels.unwrap_or(1)),
            callback,
            error_callback,
        });
        state.captures_opened += 1;
        state.last_capture_config = Some(config.clone());

        Ok(StreamHandle::new(MockStream {
            state: Arc::clone(&self.state),
            id,
        }))
    }

    fn open_output(
        &self,
        config: &StreamConfig,
        callback: OutputCallback,
        error_callback: ErrorCallback,
    ) -> Result<StreamHandle> {
        let mut state = self.state.lock();
        if !state.has_output {
            return Err(Error::NoDevice);
        }
        Self::check_device(config.device.as_deref(), OUTPUT_NAME)?;

        let id = state.next_id;
        state.next_id += 1;
        state.outputs.push(OutputSlot {
            id,
            callback,
            error_callback,
        });

        Ok(StreamHandle::new(MockStream {
            state: Arc::clone(&self.state),
            id,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn noop_error() -> ErrorCallback {
        Box::new(|_: &str| {})
    }

    #[test]
    fn capture_requires_input_device() {
        let mock = MockBackend::new().without_input();
        let result = mock.open_capture(&StreamConfig::default(), Box::new(|_: &mut [f32]| {}), noop_error());
        assert!(matches!(result, Err(Error::NoDevice)));
        assert!(mock.default_input_device().unwrap().is_none());
    }

    #[test]
    fn dropping_handle_closes_capture() {
        let mock = MockBackend::new();
        let handle = mock
            .open_capture(&StreamConfig::new(44100, 2), Box::new(|_: &mut [f32]| {}), noop_error())
            .unwrap();
        assert!(mock.is_capturing());
        drop(handle);
        assert!(!mock.is_capturing());
        assert!(mock.push_block(&[1.0, 1.0]).is_empty());
    }

    #[test]
    fn blocks_are_fixed_length() {
        let mock = MockBackend::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let _handle = mock
            .open_capture(
                &StreamConfig::new(44100, 100),
                Box::new(move |block: &mut [f32]| {
                    assert_eq!(block.len(), 100);
                    c.fetch_add(1, Ordering::SeqCst);
                }),
                noop_error(),
            )
            .unwrap();

        mock.push_block(&[0.0; 150]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        mock.push_block(&[0.0; 150]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn second_capture_is_rejected() {
        let mock = MockBackend::new();
        let _first = mock
            .open_capture(&StreamConfig::default(), Box::new(|_: &mut [f32]| {}), noop_error())
            .unwrap();
        let second = mock.open_capture(&StreamConfig::default(), Box::new(|_: &mut [f32]| {}), noop_error());
        assert!(matches!(second, Err(Error::Stream(_))));
    }

    #[test]
    fn outputs_are_summed() {
        let mock = MockBackend::new();
        assert!(mock.pull_output(4).is_none());

        let _a = mock
            .open_output(&StreamConfig::default(), Box::new(|b: &mut [f32]| b.fill(0.25)), noop_error())
            .unwrap();
        let _b = mock
            .open_output(&StreamConfig::default(), Box::new(|b: &mut [f32]| b.fill(0.5)), noop_error())
            .unwrap();

        assert_eq!(mock.open_outputs(), 2);
        assert_eq!(mock.pull_output(3), Some(vec![0.75; 3]));
    }

    #[test]
    fn unknown_device_name() {
        let mock = MockBackend::new();
        let config = StreamConfig::default().with_device(Some("Bluetooth".into()));
        let result = mock.open_output(&config, Box::new(|_: &mut [f32]| {}), noop_error());
        assert!(matches!(result, Err(Error::DeviceNotFound(_))));

        let config = StreamConfig::default().with_device(Some("headset".into()));
        let result = mock.open_capture(&config, Box::new(|_: &mut [f32]| {}), noop_error());
        assert!(matches!(result, Err(Error::DeviceNotFound(_))));

        let config = StreamConfig::default().with_device(Some("microphone".into()));
        assert!(mock.open_capture(&config, Box::new(|_: &mut [f32]| {}), noop_error()).is_ok());
    }

    #[test]
    fn errors_reach_callbacks() {
        let mock = MockBackend::new();
        let errors = Arc::new(AtomicUsize::new(0));
        let e = Arc::clone(&errors);
        let _handle = mock
            .open_capture(
                &StreamConfig::default(),
                Box::new(|_: &mut [f32]| {}),
                Box::new(move |msg: &str| {
                    assert_eq!(msg, "device unplugged");
                    e.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();
        mock.fail_streams("device unplugged");
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn lists_configured_devices() {
        let mock = MockBackend::new().without_output();
        let devices = mock.list_devices().unwrap();
        assert_eq!(devices.len(), 1);
        assert!(devices[0].is_input);
        assert_eq!(mock.name(), "mock");
    }
}
