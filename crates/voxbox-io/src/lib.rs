//! Device and sink adapters for the voxbox voice changer.
//!
//! This crate provides:
//!
//! - **Backends**: the [`AudioBackend`] trait with a cpal implementation
//!   ([`CpalBackend`]) and a deterministic, test-driven one ([`MockBackend`])
//! - **Capture**: fixed-length mono blocks, regardless of the device's period
//!   size or channel count ([`BlockAssembler`])
//! - **Playback**: [`Player`], a one-shot or looping sink for a rendered buffer
//! - **WAV files**: [`read_wav`] and [`write_wav`] for import and export
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use voxbox_io::{AudioBackend, CpalBackend, StreamConfig};
//!
//! let backend = CpalBackend::new();
//! let config = StreamConfig::default();
//! let _capture = backend.open_capture(
//!     &config,
//!     Box::new(|block: &mut [f32]| {
//!         // exactly config.block_size mono samples
//!     }),
//!     Box::new(|err: &str| eprintln!("capture error: {err}")),
//! )?;
//! // Capture runs until `_capture` is dropped.
//! ```

/// Pluggable audio backend abstraction.
pub mod backend;
mod block;
/// cpal-based backend implementation.
pub mod cpal_backend;
mod device;
/// Deterministic backend for tests.
pub mod mock;
mod player;
mod wav;

pub use backend::{
    AudioBackend, BlockCallback, ErrorCallback, OutputCallback, StreamConfig, StreamHandle,
};
pub use block::{BlockAssembler, expand_mono};
pub use cpal_backend::CpalBackend;
pub use device::{AudioDevice, default_device, list_devices};
pub use mock::MockBackend;
pub use player::Player;
pub use wav::{WavInfo, read_wav, read_wav_info, write_wav};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio device available on the system.
    #[error("No audio device available")]
    NoDevice,

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
