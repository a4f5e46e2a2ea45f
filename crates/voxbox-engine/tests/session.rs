//! Session scenarios driven through the mock backend.

use voxbox_config::{EffectParameters, Settings, factory_preset};
use voxbox_core::{SampleBuffer, shifted_len};
use voxbox_engine::{Session, SessionError, SessionState, render};
use voxbox_io::{MockBackend, read_wav};

fn setup(block_size: usize) -> (MockBackend, Session) {
    let mock = MockBackend::new();
    let settings = Settings {
        block_size,
        reserve_seconds: 1.0,
        ..Settings::default()
    };
    let session = Session::new(Box::new(mock.clone()), settings);
    (mock, session)
}

fn params(name: &str) -> EffectParameters {
    factory_preset(name).unwrap().params
}

#[test]
fn silent_take_renders_silence() {
    let (mock, mut session) = setup(100);
    session
        .set_params(EffectParameters::new(5.0, 0.3, 0.3, 2.0))
        .unwrap();

    session.start_recording(false).unwrap();
    for _ in 0..3 {
        mock.push_block(&[0.0; 100]);
    }
    let processed = session.stop_recording().unwrap().unwrap();

    let recording = session.recording().unwrap();
    assert_eq!(recording.len(), 300);
    assert!(recording.as_slice().iter().all(|&s| s == 0.0));

    assert_eq!(processed.len(), shifted_len(300, 5.0));
    assert!(processed.as_slice().iter().all(|&s| s == 0.0));
    assert_eq!(session.state(), SessionState::Stopped);
}

#[test]
fn take_is_gain_adjusted() {
    let (mock, mut session) = setup(100);
    session.apply_preset("Monster").unwrap();

    session.start_recording(false).unwrap();
    mock.push_block(&[0.2; 200]);
    session.stop_recording().unwrap();

    let recording = session.recording().unwrap();
    assert_eq!(recording.len(), 200);
    assert!(recording.as_slice().iter().all(|&s| (s - 0.3).abs() < 1e-6));
}

#[test]
fn robot_preset_is_exact_and_rerenders() {
    let (mock, mut session) = setup(128);
    session.start_recording(false).unwrap();
    let voice: Vec<f32> = (0..1280).map(|i| 0.4 * (i as f32 * 0.07).sin()).collect();
    mock.push_block(&voice);
    let before = session.stop_recording().unwrap().unwrap();
    assert_eq!(before.len(), 1280);

    session.apply_preset("Robot").unwrap();
    assert_eq!(session.params(), EffectParameters::new(5.0, 0.1, 0.3, 1.2));

    let after = session.processed().unwrap();
    assert_eq!(after.len(), shifted_len(1280, 5.0));
    let expected = render(&session.recording().unwrap(), &session.params());
    assert_eq!(after.as_slice(), expected.as_slice());
}

#[test]
fn unknown_preset_is_rejected() {
    let (_, mut session) = setup(64);
    session.apply_preset("Echo").unwrap();
    assert!(matches!(
        session.apply_preset("Alien"),
        Err(SessionError::UnknownPreset(name)) if name == "Alien"
    ));
    assert_eq!(session.params(), params("Echo"));
}

#[test]
fn no_capture_device() {
    let mock = MockBackend::new().without_input();
    let mut session = Session::new(Box::new(mock), Settings::default());
    assert!(matches!(
        session.start_recording(false),
        Err(SessionError::DeviceUnavailable)
    ));
    assert_eq!(session.state(), SessionState::Idle);

    // Losing the device mid-playback leaves the previous take playing.
    let (mock, mut session) = setup(64);
    session.start_recording(false).unwrap();
    mock.push_block(&[0.3; 256]);
    let processed = session.stop_recording().unwrap().unwrap();
    session.play_processed(true).unwrap();
    assert!(session.is_playing());

    let _ = mock.clone().without_input();
    assert!(matches!(
        session.start_recording(false),
        Err(SessionError::DeviceUnavailable)
    ));
    assert!(session.is_playing());
    assert!(mock.pull_output(64).is_some());
    assert!(!mock.is_capturing());
    assert_eq!(session.state(), SessionState::Stopped);
    assert_eq!(session.processed().unwrap().as_slice(), processed.as_slice());
}

#[test]
fn toggle_requires_recording() {
    let (_, mut session) = setup(64);
    assert!(matches!(
        session.toggle_monitor(),
        Err(SessionError::NotRecording)
    ));
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn nothing_to_play_or_export() {
    let (_, mut session) = setup(64);
    assert!(matches!(
        session.play_processed(false),
        Err(SessionError::NothingToPlay)
    ));
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        session.export(dir.path().join("none.wav"), 16),
        Err(SessionError::NothingToExport)
    ));
    assert!(!dir.path().join("none.wav").exists());
}

#[test]
fn monitor_off_leaves_blocks_untouched() {
    let (mock, mut session) = setup(100);
    session.apply_preset("Chipmunk").unwrap();
    session.start_recording(false).unwrap();
    assert!(!session.is_monitoring());
    assert_eq!(mock.open_outputs(), 0);

    let blocks = mock.push_block(&[0.5; 100]);
    assert_eq!(blocks, vec![vec![0.5; 100]]);
}

#[test]
fn upward_monitor_block_is_zero_padded() {
    let (mock, mut session) = setup(100);
    session.apply_preset("Chipmunk").unwrap();
    session.start_recording(true).unwrap();
    assert!(session.is_monitoring());
    assert_eq!(mock.open_outputs(), 1);

    let blocks = mock.push_block(&[0.5; 100]);
    let block = &blocks[0];
    assert_eq!(block.len(), 100);
    // One octave up: half the block is signal, the rest silence.
    assert!(block[..50].iter().any(|&s| s != 0.0));
    assert!(block[50..].iter().all(|&s| s == 0.0));

    // The monitor output hears exactly the processed block.
    let monitored = mock.pull_output(100).unwrap();
    assert_eq!(&monitored, block);
}

#[test]
fn downward_monitor_block_is_truncated() {
    let (mock, mut session) = setup(100);
    session
        .set_params(EffectParameters::new(-8.0, 0.0, 0.0, 1.0))
        .unwrap();
    session.start_recording(true).unwrap();

    let blocks = mock.push_block(&[0.5; 100]);
    assert_eq!(blocks[0].len(), 100);
    assert!(blocks[0].iter().all(|&s| (s - 0.5).abs() < 1e-5));
}

#[test]
fn monitor_output_plays_silence_when_starved() {
    let (mock, mut session) = setup(100);
    session.start_recording(true).unwrap();
    assert_eq!(mock.pull_output(64), Some(vec![0.0; 64]));
}

#[test]
fn monitor_ring_drops_blocks_when_full() {
    let (mock, mut session) = setup(10);
    session.start_recording(true).unwrap();
    // Ring holds four blocks; the fifth and sixth are dropped.
    for i in 0..6 {
        mock.push_block(&[i as f32 * 0.1; 10]);
    }
    let out = mock.pull_output(60).unwrap();
    assert!((out[0] - 0.0).abs() < 1e-6);
    assert!((out[35] - 0.3).abs() < 1e-6);
    assert!(out[40..].iter().all(|&s| s == 0.0));
    assert!(session.recording().is_none());
    assert!((session.recorded_seconds() - 60.0 / 44100.0).abs() < 1e-9);
}

#[test]
fn toggle_monitor_opens_and_closes_output() {
    let (mock, mut session) = setup(100);
    session.start_recording(false).unwrap();

    assert!(session.toggle_monitor().unwrap());
    assert_eq!(mock.open_outputs(), 1);
    assert_eq!(session.state(), SessionState::Recording { monitor: true });

    assert!(!session.toggle_monitor().unwrap());
    assert_eq!(mock.open_outputs(), 0);
    assert_eq!(session.state(), SessionState::Recording { monitor: false });
}

#[test]
fn missing_output_records_without_monitor() {
    let mock = MockBackend::new().without_output();
    let settings = Settings {
        block_size: 50,
        ..Settings::default()
    };
    let mut session = Session::new(Box::new(mock.clone()), settings);

    session.start_recording(true).unwrap();
    assert_eq!(session.state(), SessionState::Recording { monitor: false });
    assert!(matches!(
        session.toggle_monitor(),
        Err(SessionError::DeviceUnavailable)
    ));

    mock.push_block(&[0.1; 100]);
    assert_eq!(session.stop_recording().unwrap().unwrap().len(), 100);
}

#[test]
fn stop_halts_monitor_then_capture() {
    let (mock, mut session) = setup(100);
    session.start_recording(true).unwrap();
    mock.push_block(&[0.25; 100]);

    session.stop_recording().unwrap();
    assert_eq!(mock.open_outputs(), 0);
    assert!(!mock.is_capturing());

    // Blocks after stop go nowhere.
    assert!(mock.push_block(&[0.25; 100]).is_empty());
    assert_eq!(session.recording().unwrap().len(), 100);
}

#[test]
fn parameter_changes_reach_next_block() {
    let (mock, mut session) = setup(10);
    session.start_recording(false).unwrap();
    mock.push_block(&[1.0; 10]);
    session
        .set_params(EffectParameters::default().with_gain(0.5))
        .unwrap();
    mock.push_block(&[1.0; 10]);
    session.stop_recording().unwrap();

    let take = session.recording().unwrap();
    assert!(take.as_slice()[..10].iter().all(|&s| s == 1.0));
    assert!(take.as_slice()[10..].iter().all(|&s| s == 0.5));
}

#[test]
fn clear_returns_to_idle() {
    let (mock, mut session) = setup(100);
    session.start_recording(true).unwrap();
    mock.push_block(&[0.3; 100]);
    session.clear();

    assert_eq!(session.state(), SessionState::Idle);
    assert!(!mock.is_capturing());
    assert_eq!(mock.open_outputs(), 0);
    assert!(session.recording().is_none());
    assert!(session.processed().is_none());
    assert_eq!(session.recorded_seconds(), 0.0);

    // Idle is re-enterable.
    session.start_recording(false).unwrap();
    mock.push_block(&[0.3; 100]);
    assert_eq!(session.stop_recording().unwrap().unwrap().len(), 100);
}

#[test]
fn new_take_replaces_old() {
    let (mock, mut session) = setup(100);
    session.start_recording(false).unwrap();
    mock.push_block(&[0.3; 300]);
    session.stop_recording().unwrap();

    session.start_recording(false).unwrap();
    mock.push_block(&[0.3; 100]);
    session.stop_recording().unwrap();
    assert_eq!(session.recording().unwrap().len(), 100);
}

#[test]
fn play_processed_through_output() {
    let (mock, mut session) = setup(50);
    session.start_recording(false).unwrap();
    mock.push_block(&[0.2; 100]);
    let processed = session.stop_recording().unwrap().unwrap();

    session.play_processed(false).unwrap();
    assert!(session.is_playing());
    let played = mock.pull_output(100).unwrap();
    assert_eq!(played.as_slice(), processed.as_slice());

    session.stop_playback();
    assert!(!session.is_playing());
    assert_eq!(mock.open_outputs(), 0);
}

#[test]
fn export_writes_processed_take() {
    let (mock, mut session) = setup(100);
    session.apply_preset("DeepVoice").unwrap();
    session.start_recording(false).unwrap();
    let voice: Vec<f32> = (0..1000).map(|i| 0.3 * (i as f32 * 0.1).sin()).collect();
    mock.push_block(&voice);
    let processed = session.stop_recording().unwrap().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("take.wav");
    session.export(&path, 32).unwrap();

    let loaded: SampleBuffer = read_wav(&path).unwrap();
    assert_eq!(loaded.sample_rate(), 44100);
    assert_eq!(loaded.as_slice(), processed.as_slice());
}

#[test]
fn export_rejects_bad_depth() {
    let (mock, mut session) = setup(100);
    session.start_recording(false).unwrap();
    mock.push_block(&[0.3; 100]);
    session.stop_recording().unwrap();

    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        session.export(dir.path().join("x.wav"), 12),
        Err(SessionError::Io(_))
    ));
}

#[test]
fn stream_errors_are_recovered() {
    let (mock, mut session) = setup(100);
    session.start_recording(true).unwrap();
    mock.fail_streams("device unplugged");
    assert_eq!(session.state(), SessionState::Recording { monitor: true });
    mock.push_block(&[0.1; 100]);
    assert_eq!(session.stop_recording().unwrap().unwrap().len(), 100);
}
