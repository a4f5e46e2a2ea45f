//! Session error type.

use voxbox_config::ConfigError;

/// Errors returned by [`Session`](crate::Session) operations.
///
/// Every failure is recoverable: the operation that returned it left the
/// session exactly as it was.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No usable capture (or playback) device.
    #[error("no audio device available")]
    DeviceUnavailable,

    /// The operation is only valid while recording.
    #[error("not recording")]
    NotRecording,

    /// Playback was requested before anything was rendered.
    #[error("nothing to play")]
    NothingToPlay,

    /// Export was requested before anything was rendered.
    #[error("nothing to export")]
    NothingToExport,

    /// The name is not in the preset catalogue.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    /// Effect parameters out of range.
    #[error(transparent)]
    InvalidParams(#[from] ConfigError),

    /// Stream or file failure.
    #[error(transparent)]
    Io(#[from] voxbox_io::Error),
}

impl SessionError {
    /// Map a device-open failure, folding "no device" cases into
    /// [`DeviceUnavailable`](Self::DeviceUnavailable).
    pub(crate) fn from_device(err: voxbox_io::Error) -> Self {
        match err {
            voxbox_io::Error::NoDevice | voxbox_io::Error::DeviceNotFound(_) => {
                SessionError::DeviceUnavailable
            }
            other => SessionError::Io(other),
        }
    }
}
