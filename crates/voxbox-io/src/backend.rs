//! The [`AudioBackend`] trait separates the capture session from any specific
//! platform audio API.
//!
//! ```text
//! ┌──────────────────────────────────┐
//! │      Session / CLI commands      │
//! └──────────────┬───────────────────┘
//!                │ uses AudioBackend trait
//!                ▼
//! ┌──────────────────────────────────┐
//! │        AudioBackend trait        │
//! │   open_capture / open_output     │
//! └──────────────┬───────────────────┘
//!        ┌───────┴────────┐
//!        ▼                ▼
//! ┌─────────────┐  ┌─────────────┐
//! │ CpalBackend │  │ MockBackend │
//! └─────────────┘  └─────────────┘
//! ```
//!
//! Callbacks are boxed closures, so the trait is object-safe and the session
//! can hold a `Box<dyn AudioBackend>`. Streams come back as a type-erased
//! [`StreamHandle`]; dropping the handle closes the device.

use crate::{AudioDevice, Result};

/// Configuration for opening a capture or output stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    /// Requested sample rate in Hz.
    pub sample_rate: u32,
    /// Samples per capture block. Output streams use it as a period hint.
    pub block_size: usize,
    /// Device channel count; `None` uses the device's default.
    pub channels: Option<u16>,
    /// Device name or index; `None` uses the system default.
    pub device: Option<String>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            block_size: 2048,
            channels: None,
            device: None,
        }
    }
}

impl StreamConfig {
    /// Config with the given rate and block size on the default device.
    pub fn new(sample_rate: u32, block_size: usize) -> Self {
        Self {
            sample_rate,
            block_size,
            ..Self::default()
        }
    }

    /// Select a device by name or index.
    pub fn with_device(mut self, device: Option<String>) -> Self {
        self.device = device;
        self
    }
}

/// Type-erased audio stream handle.
///
/// The stream is active while this handle exists; dropping it stops playback
/// or capture.
pub struct StreamHandle {
    _inner: Box<dyn Send>,
}

impl StreamHandle {
    /// Wrap a backend-specific stream object, keeping it alive until drop.
    pub fn new<T: Send + 'static>(stream: T) -> Self {
        Self {
            _inner: Box::new(stream),
        }
    }
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle").finish_non_exhaustive()
    }
}

/// Capture callback.
///
/// Called on the audio thread with exactly `block_size` mono samples. The
/// block is mutable so the callee can process it in place; whatever it leaves
/// there is discarded by the backend.
///
/// ## Real-Time Safety
///
/// Implementations must not allocate, block on locks, or perform I/O.
pub type BlockCallback = Box<dyn FnMut(&mut [f32]) + Send>;

/// Output callback.
///
/// Called on the audio thread with a mono buffer to fill. The backend copies
/// each sample to every device channel.
pub type OutputCallback = Box<dyn FnMut(&mut [f32]) + Send>;

/// Error callback, called with a human-readable message when a running
/// stream fails.
pub type ErrorCallback = Box<dyn FnMut(&str) + Send>;

/// Pluggable audio backend.
pub trait AudioBackend: Send {
    /// Human-readable name of this backend (e.g. "cpal", "mock").
    fn name(&self) -> &str;

    /// List all available audio devices.
    fn list_devices(&self) -> Result<Vec<AudioDevice>>;

    /// Get the default input device, if any.
    fn default_input_device(&self) -> Result<Option<AudioDevice>>;

    /// Get the default output device, if any.
    fn default_output_device(&self) -> Result<Option<AudioDevice>>;

    /// Open a capture stream delivering fixed-length mono blocks.
    ///
    /// Returns [`Error::NoDevice`](crate::Error::NoDevice) when the machine
    /// has no capture device.
    fn open_capture(
        &self,
        config: &StreamConfig,
        callback: BlockCallback,
        error_callback: ErrorCallback,
    ) -> Result<StreamHandle>;

    /// Open an output stream pulling mono samples from `callback`.
    fn open_output(
        &self,
        config: &StreamConfig,
        callback: OutputCallback,
        error_callback: ErrorCallback,
    ) -> Result<StreamHandle>;
}
