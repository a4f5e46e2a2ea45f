//! Playback sink for rendered buffers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use voxbox_core::SampleBuffer;

use crate::Result;
use crate::backend::{AudioBackend, StreamConfig, StreamHandle};

#[derive(Debug, Default)]
struct PlaybackState {
    playing: AtomicBool,
    position: AtomicUsize,
}

/// Plays a shared [`SampleBuffer`] through an output stream, one-shot or
/// looping.
///
/// The buffer is shared with the audio thread through an `Arc`, so replacing
/// the session's rendered result never disturbs a buffer that is still playing.
#[derive(Debug, Default)]
pub struct Player {
    state: Arc<PlaybackState>,
    stream: Option<StreamHandle>,
}

impl Player {
    /// An idle player.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start playing `buffer` from the beginning, replacing any current
    /// playback.
    ///
    /// The output stream runs at the buffer's own sample rate; the device and
    /// period hint come from `config`.
    pub fn play(
        &mut self,
        backend: &dyn AudioBackend,
        config: &StreamConfig,
        buffer: Arc<SampleBuffer>,
        looping: bool,
    ) -> Result<()> {
        self.stop();

        let state = Arc::new(PlaybackState::default());
        state.playing.store(!buffer.is_empty(), Ordering::SeqCst);

        let config = StreamConfig {
            sample_rate: buffer.sample_rate(),
            ..config.clone()
        };
        let total_frames = buffer.len();
        tracing::info!(
            frames = total_frames,
            sample_rate = config.sample_rate,
            looping,
            "playback started"
        );

        let cb_state = Arc::clone(&state);
        let stream = backend.open_output(
            &config,
            Box::new(move |data: &mut [f32]| {
                if !cb_state.playing.load(Ordering::Relaxed) {
                    data.fill(0.0);
                    return;
                }

                let samples = buffer.as_slice();
                let mut pos = cb_state.position.load(Ordering::Relaxed);
                for i in 0..data.len() {
                    if pos >= total_frames {
                        if looping && total_frames > 0 {
                            pos = 0;
                        } else {
                            data[i..].fill(0.0);
                            cb_state.playing.store(false, Ordering::Relaxed);
                            break;
                        }
                    }
                    data[i] = samples[pos];
                    pos += 1;
                }
                cb_state.position.store(pos, Ordering::Relaxed);
            }),
            Box::new(|err: &str| {
                tracing::warn!(error = err, "playback stream error");
            }),
        )?;

        self.state = state;
        self.stream = Some(stream);
        Ok(())
    }

    /// Stop playback and close the output stream.
    pub fn stop(&mut self) {
        self.state.playing.store(false, Ordering::SeqCst);
        if self.stream.take().is_some() {
            tracing::debug!("playback stopped");
        }
    }

    /// Whether audio is still being produced.
    ///
    /// A one-shot playback reports `false` once it reaches the end of the
    /// buffer, even though the stream stays open until [`stop`](Self::stop).
    pub fn is_playing(&self) -> bool {
        self.stream.is_some() && self.state.playing.load(Ordering::SeqCst)
    }

    /// Playback position in frames from the start of the buffer.
    pub fn position_frames(&self) -> usize {
        self.state.position.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockBackend;

    fn buffer(samples: Vec<f32>) -> Arc<SampleBuffer> {
        Arc::new(SampleBuffer::from_samples(samples, 44100))
    }

    #[test]
    fn one_shot_stops_at_end() {
        let mock = MockBackend::new();
        let mut player = Player::new();
        player
            .play(&mock, &StreamConfig::default(), buffer(vec![0.1, 0.2, 0.3]), false)
            .unwrap();
        assert!(player.is_playing());

        assert_eq!(mock.pull_output(2), Some(vec![0.1, 0.2]));
        assert!(player.is_playing());
        assert_eq!(mock.pull_output(3), Some(vec![0.3, 0.0, 0.0]));
        assert!(!player.is_playing());
        assert_eq!(mock.pull_output(2), Some(vec![0.0, 0.0]));
    }

    #[test]
    fn looping_wraps() {
        let mock = MockBackend::new();
        let mut player = Player::new();
        player
            .play(&mock, &StreamConfig::default(), buffer(vec![1.0, 2.0]), true)
            .unwrap();

        assert_eq!(mock.pull_output(5), Some(vec![1.0, 2.0, 1.0, 2.0, 1.0]));
        assert!(player.is_playing());
        assert_eq!(player.position_frames(), 1);
    }

    #[test]
    fn stop_closes_stream() {
        let mock = MockBackend::new();
        let mut player = Player::new();
        player
            .play(&mock, &StreamConfig::default(), buffer(vec![0.5; 10]), true)
            .unwrap();
        assert_eq!(mock.open_outputs(), 1);

        player.stop();
        assert!(!player.is_playing());
        assert_eq!(mock.open_outputs(), 0);
    }

    #[test]
    fn replaying_replaces_stream() {
        let mock = MockBackend::new();
        let mut player = Player::new();
        player
            .play(&mock, &StreamConfig::default(), buffer(vec![0.5; 10]), false)
            .unwrap();
        player
            .play(&mock, &StreamConfig::default(), buffer(vec![0.25; 10]), false)
            .unwrap();
        assert_eq!(mock.open_outputs(), 1);
        assert_eq!(mock.pull_output(1), Some(vec![0.25]));
    }

    #[test]
    fn empty_buffer_never_plays() {
        let mock = MockBackend::new();
        let mut player = Player::new();
        player
            .play(&mock, &StreamConfig::default(), buffer(Vec::new()), true)
            .unwrap();
        assert!(!player.is_playing());
        assert_eq!(mock.pull_output(2), Some(vec![0.0, 0.0]));
    }

    #[test]
    fn no_output_device_is_an_error() {
        let mock = MockBackend::new().without_output();
        let mut player = Player::new();
        let result = player.play(&mock, &StreamConfig::default(), buffer(vec![0.1]), false);
        assert!(result.is_err());
        assert!(!player.is_playing());
    }
}
