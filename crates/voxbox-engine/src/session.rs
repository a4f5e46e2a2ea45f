//! Capture session state machine.
//!
//! ```text
//!            start_recording            stop_recording
//!   Idle ─────────────────► Recording ─────────────────► Stopped
//!    ▲                    (monitor on/off)                  │
//!    │                     ▲        │ toggle_monitor        │
//!    │                     └────────┘                       │
//!    │                         start_recording              │
//!    │         ◄────────────────────────────────────────────┘
//!    └──────── clear (from any state)
//! ```
//!
//! # Threads
//!
//! The control thread owns the [`Session`] and every transition. The capture
//! callback runs on the device's audio thread and touches only:
//!
//! - the [`ParamStore`] snapshot (one wait-free load per block)
//! - the monitor flag (an atomic)
//! - the [`Recorder`], reached with `try_lock` so the callback never waits
//! - the producer half of the monitor ring
//!
//! The control thread locks the recorder only once the capture stream has
//! been dropped, so the lock is never contended while recording.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;
use rtrb::{Consumer, RingBuffer};
use voxbox_config::{EffectParameters, Settings, factory_preset};
use voxbox_core::SampleBuffer;
use voxbox_io::{AudioBackend, Player, StreamConfig, StreamHandle, write_wav};

use crate::error::SessionError;
use crate::live::{Recorder, process_block};
use crate::params::ParamStore;
use crate::render::render;

/// Monitor ring capacity, in blocks.
const MONITOR_RING_BLOCKS: usize = 4;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing recorded yet, or cleared.
    Idle,
    /// Capturing; `monitor` reports whether live monitoring is on.
    Recording {
        /// Live monitor playback enabled.
        monitor: bool,
    },
    /// Capture closed. [`Session::processed`] holds the latest render, if
    /// any take captured samples.
    Stopped,
}

/// A voice-capture session: records from the input device, optionally
/// monitors through the live chain, and renders the take offline.
///
/// # Example
///
/// ```rust
/// use voxbox_config::Settings;
/// use voxbox_engine::Session;
/// use voxbox_io::MockBackend;
///
/// let mock = MockBackend::new();
/// let settings = Settings { block_size: 4, ..Settings::default() };
/// let mut session = Session::new(Box::new(mock.clone()), settings);
///
/// session.apply_preset("Robot").unwrap();
/// session.start_recording(false).unwrap();
/// mock.push_block(&[0.1, 0.2, 0.3, 0.4]);
/// let processed = session.stop_recording().unwrap().unwrap();
/// assert_eq!(processed.len(), voxbox_core::shifted_len(4, 5.0));
/// ```
pub struct Session {
    backend: Box<dyn AudioBackend>,
    settings: Settings,
    state: SessionState,

    params: Arc<ParamStore>,
    monitor: Arc<AtomicBool>,
    recorded: Arc<AtomicUsize>,
    recorder: Arc<Mutex<Recorder>>,

    capture: Option<StreamHandle>,
    monitor_out: Option<StreamHandle>,
    monitor_feed: Option<Arc<Mutex<Consumer<f32>>>>,

    recording: Option<Arc<SampleBuffer>>,
    processed: Option<Arc<SampleBuffer>>,
    player: Player,
}

impl Session {
    /// Create an idle session on `backend`.
    ///
    /// The initial parameters come from `settings.default_preset`; an unknown
    /// name falls back to the Normal voice.
    pub fn new(backend: Box<dyn AudioBackend>, settings: Settings) -> Self {
        let initial = factory_preset(&settings.default_preset).map_or_else(
            || {
                tracing::warn!(
                    preset = %settings.default_preset,
                    "unknown default preset, using Normal"
                );
                EffectParameters::default()
            },
            |preset| preset.params,
        );
        tracing::debug!(backend = backend.name(), "session created");

        Self {
            backend,
            settings,
            state: SessionState::Idle,
            params: Arc::new(ParamStore::new(initial)),
            monitor: Arc::new(AtomicBool::new(false)),
            recorded: Arc::new(AtomicUsize::new(0)),
            recorder: Arc::new(Mutex::new(Recorder::default())),
            capture: None,
            monitor_out: None,
            monitor_feed: None,
            recording: None,
            processed: None,
            player: Player::new(),
        }
    }

    /// Open the capture device and start a new take.
    ///
    /// Fails with [`SessionError::DeviceUnavailable`] when there is no capture
    /// device; the session, its previous take and any playback are then left
    /// as they were. If monitoring was requested but the output cannot be
    /// opened, recording still starts with monitoring off. Calling this while
    /// already recording does nothing.
    pub fn start_recording(&mut self, enable_monitor: bool) -> Result<(), SessionError> {
        if matches!(self.state, SessionState::Recording { .. }) {
            tracing::warn!("start_recording while already recording, ignored");
            return Ok(());
        }

        let block_size = self.settings.block_size;
        let recorder = Arc::new(Mutex::new(Recorder::new(
            self.settings.reserve_samples(),
            block_size,
        )));
        let recorded = Arc::new(AtomicUsize::new(0));
        let (mut producer, consumer) = RingBuffer::<f32>::new(block_size * MONITOR_RING_BLOCKS);

        let params = Arc::clone(&self.params);
        let monitor = Arc::clone(&self.monitor);
        let take = Arc::clone(&recorder);
        let counter = Arc::clone(&recorded);
        let sample_rate = self.settings.sample_rate as f32;

        let config = self.capture_config();
        let stream = self
            .backend
            .open_capture(
                &config,
                Box::new(move |block: &mut [f32]| {
                    let snapshot = params.load();
                    let monitoring = monitor.load(Ordering::Acquire);
                    let Some(mut recorder) = take.try_lock() else {
                        return;
                    };
                    let live =
                        process_block(block, &snapshot, monitoring, sample_rate, &mut recorder);
                    counter.store(recorder.len(), Ordering::Release);
                    drop(recorder);

                    // Whole blocks only: a partial block would splice audio.
                    if live && producer.slots() >= block.len() {
                        for &sample in block.iter() {
                            let _ = producer.push(sample);
                        }
                    }
                }),
                Box::new(|err: &str| {
                    tracing::warn!(error = err, "capture stream error");
                }),
            )
            .map_err(|e| {
                let err = SessionError::from_device(e);
                tracing::warn!(error = %err, "could not open capture device");
                err
            })?;

        self.player.stop();
        self.monitor.store(false, Ordering::Release);
        self.recorder = recorder;
        self.recorded = recorded;
        self.capture = Some(stream);
        self.monitor_feed = Some(Arc::new(Mutex::new(consumer)));
        self.state = SessionState::Recording { monitor: false };
        tracing::info!(
            sample_rate = config.sample_rate,
            block_size,
            device = config.device.as_deref().unwrap_or("default"),
            "recording started"
        );

        if enable_monitor && let Err(err) = self.enable_monitor() {
            tracing::warn!(error = %err, "monitor unavailable, recording without it");
        }
        Ok(())
    }

    /// Flip live monitoring while recording. Returns the new monitor state.
    pub fn toggle_monitor(&mut self) -> Result<bool, SessionError> {
        let SessionState::Recording { monitor } = self.state else {
            tracing::warn!("toggle_monitor while not recording, ignored");
            return Err(SessionError::NotRecording);
        };

        if monitor {
            self.disable_monitor();
            Ok(false)
        } else {
            self.enable_monitor().inspect_err(|err| {
                tracing::warn!(error = %err, "could not start monitor");
            })?;
            Ok(true)
        }
    }

    /// Close the capture device and render the take.
    ///
    /// Live monitoring is halted before the device closes. Returns the
    /// rendered result, or `None` when nothing was captured, in which case
    /// the previous take and its render are kept.
    pub fn stop_recording(&mut self) -> Result<Option<Arc<SampleBuffer>>, SessionError> {
        if !matches!(self.state, SessionState::Recording { .. }) {
            tracing::warn!("stop_recording while not recording, ignored");
            return Err(SessionError::NotRecording);
        }

        self.disable_monitor();
        // Once the capture handle is gone no callback can be in flight.
        self.capture = None;
        self.monitor_feed = None;
        let samples = self.recorder.lock().take();
        self.state = SessionState::Stopped;

        if samples.is_empty() {
            tracing::info!("recording stopped, nothing captured");
            return Ok(None);
        }

        tracing::info!(
            samples = samples.len(),
            seconds = samples.len() as f32 / self.settings.sample_rate as f32,
            "recording stopped"
        );
        let recording = Arc::new(SampleBuffer::from_samples(samples, self.settings.sample_rate));
        let processed = Arc::new(render(&recording, &self.params.load()));
        self.recording = Some(recording);
        self.processed = Some(Arc::clone(&processed));
        Ok(Some(processed))
    }

    /// Stop everything and discard the take and its render.
    pub fn clear(&mut self) {
        self.player.stop();
        self.disable_monitor();
        self.capture = None;
        self.monitor_feed = None;
        self.recorder.lock().reset(0);
        self.recorded.store(0, Ordering::Release);
        self.recording = None;
        self.processed = None;
        self.state = SessionState::Idle;
        tracing::info!("session cleared");
    }

    /// Apply a catalogue preset by name.
    ///
    /// Re-renders the existing take, if there is one.
    pub fn apply_preset(&mut self, name: &str) -> Result<(), SessionError> {
        let Some(preset) = factory_preset(name) else {
            tracing::warn!(preset = name, "unknown preset");
            return Err(SessionError::UnknownPreset(name.to_string()));
        };
        tracing::info!(preset = %preset.name, "preset applied");
        self.set_params(preset.params)
    }

    /// Replace the effect parameters with a custom tuple.
    ///
    /// The new values reach the live chain at the next block and re-render the
    /// existing take, if there is one.
    pub fn set_params(&mut self, params: EffectParameters) -> Result<(), SessionError> {
        params.validate()?;
        self.params.store(params);
        if let Some(recording) = &self.recording {
            self.processed = Some(Arc::new(render(recording, &params)));
            tracing::debug!("take re-rendered");
        }
        Ok(())
    }

    /// Play the rendered take, one-shot or looping.
    pub fn play_processed(&mut self, looping: bool) -> Result<(), SessionError> {
        let Some(processed) = &self.processed else {
            tracing::warn!("nothing to play");
            return Err(SessionError::NothingToPlay);
        };
        let config = self.output_config();
        self.player
            .play(self.backend.as_ref(), &config, Arc::clone(processed), looping)
            .map_err(|e| {
                let err = SessionError::from_device(e);
                tracing::warn!(error = %err, "playback failed");
                err
            })
    }

    /// Stop playback of the rendered take.
    pub fn stop_playback(&mut self) {
        self.player.stop();
    }

    /// Whether the rendered take is playing.
    pub fn is_playing(&self) -> bool {
        self.player.is_playing()
    }

    /// Write the rendered take to a WAV file at `bits` per sample.
    pub fn export(&self, path: impl AsRef<Path>, bits: u16) -> Result<(), SessionError> {
        let path = path.as_ref();
        let Some(processed) = &self.processed else {
            tracing::warn!("nothing to export");
            return Err(SessionError::NothingToExport);
        };
        write_wav(path, processed, bits).map_err(|e| {
            tracing::warn!(error = %e, path = %path.display(), "export failed");
            SessionError::Io(e)
        })?;
        tracing::info!(path = %path.display(), bits, "exported");
        Ok(())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether live monitoring is on.
    pub fn is_monitoring(&self) -> bool {
        matches!(self.state, SessionState::Recording { monitor: true })
    }

    /// Current effect parameters.
    pub fn params(&self) -> EffectParameters {
        self.params.load()
    }

    /// The last take, gain-adjusted but otherwise dry.
    pub fn recording(&self) -> Option<Arc<SampleBuffer>> {
        self.recording.clone()
    }

    /// The last rendered result.
    pub fn processed(&self) -> Option<Arc<SampleBuffer>> {
        self.processed.clone()
    }

    /// Seconds captured so far in the current (or last) take.
    pub fn recorded_seconds(&self) -> f32 {
        self.recorded.load(Ordering::Acquire) as f32 / self.settings.sample_rate as f32
    }

    /// The settings this session was created with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn capture_config(&self) -> StreamConfig {
        StreamConfig::new(self.settings.sample_rate, self.settings.block_size)
            .with_device(self.settings.input_device.clone())
    }

    fn output_config(&self) -> StreamConfig {
        StreamConfig::new(self.settings.sample_rate, self.settings.block_size)
            .with_device(self.settings.output_device.clone())
    }

    fn enable_monitor(&mut self) -> Result<(), SessionError> {
        let Some(feed) = &self.monitor_feed else {
            return Err(SessionError::NotRecording);
        };

        // Drop audio left over from an earlier monitor period.
        {
            let mut consumer = feed.lock();
            while consumer.pop().is_ok() {}
        }

        let feed = Arc::clone(feed);
        let stream = self
            .backend
            .open_output(
                &self.output_config(),
                Box::new(move |data: &mut [f32]| {
                    let Some(mut consumer) = feed.try_lock() else {
                        data.fill(0.0);
                        return;
                    };
                    for sample in data.iter_mut() {
                        *sample = consumer.pop().unwrap_or(0.0);
                    }
                }),
                Box::new(|err: &str| {
                    tracing::warn!(error = err, "monitor stream error");
                }),
            )
            .map_err(SessionError::from_device)?;

        self.monitor_out = Some(stream);
        self.monitor.store(true, Ordering::Release);
        self.state = SessionState::Recording { monitor: true };
        tracing::info!("monitor on");
        Ok(())
    }

    fn disable_monitor(&mut self) {
        self.monitor.store(false, Ordering::Release);
        if self.monitor_out.take().is_some() {
            tracing::info!("monitor off");
        }
        if let SessionState::Recording { .. } = self.state {
            self.state = SessionState::Recording { monitor: false };
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("backend", &self.backend.name())
            .field("state", &self.state)
            .field("params", &self.params.load())
            .field("recording", &self.recording.as_ref().map(|b| b.len()))
            .field("processed", &self.processed.as_ref().map(|b| b.len()))
            .finish_non_exhaustive()
    }
}
