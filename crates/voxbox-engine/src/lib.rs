//! Voxbox Engine - capture session, live chain and offline renderer
//!
//! Sequences the [`voxbox_core`] transforms in two places:
//!
//! - **Live**, on fixed-size blocks from the capture device ([`process_block`],
//!   [`LiveChain`]). Every block is recorded gain-adjusted; with monitoring on
//!   the block is also run through gain → reverb → pitch shift and reconciled
//!   back to its original length.
//! - **Offline**, over the whole take once recording stops ([`render`]):
//!   pitch shift → reverb → normalize.
//!
//! [`Session`] owns the lifecycle (Idle → Recording → Stopped, plus clear) and
//! the handoff between the audio thread and the control thread. Effect
//! parameters live in a [`ParamStore`] so the audio thread reads a whole
//! snapshot per block.
//!
//! # Example
//!
//! ```rust
//! use voxbox_config::Settings;
//! use voxbox_engine::{Session, SessionState};
//! use voxbox_io::MockBackend;
//!
//! let mock = MockBackend::new();
//! let settings = Settings { block_size: 256, ..Settings::default() };
//! let mut session = Session::new(Box::new(mock.clone()), settings);
//!
//! session.start_recording(false).unwrap();
//! mock.push_block(&vec![0.2; 1024]);
//! session.stop_recording().unwrap();
//! assert_eq!(session.state(), SessionState::Stopped);
//!
//! // A new preset re-renders the take.
//! session.apply_preset("Chipmunk").unwrap();
//! assert_eq!(session.processed().unwrap().len(), 512);
//! ```

mod error;
mod live;
mod params;
mod render;
mod session;

pub use error::SessionError;
pub use live::{LiveChain, Recorder, process_block};
pub use params::ParamStore;
pub use render::{RenderOptions, render, render_with};
pub use session::{Session, SessionState};
