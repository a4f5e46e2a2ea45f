//! WAV file reading and writing.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;
use voxbox_core::SampleBuffer;

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Whether samples are IEEE floats rather than PCM integers.
    pub is_float: bool,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let num_frames = u64::from(reader.duration());
    let duration_secs = num_frames as f64 / f64::from(spec.sample_rate);

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        is_float: spec.sample_format == SampleFormat::Float,
        num_frames,
        duration_secs,
    })
}

/// Read a WAV file into a mono [`SampleBuffer`].
///
/// Multi-channel files are mixed down to mono by averaging channels. PCM
/// samples are scaled into `[-1.0, 1.0)`.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<SampleBuffer> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let mono = if channels > 1 {
        samples
            .chunks(channels)
            .map(|chunk| chunk.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        samples
    };

    Ok(SampleBuffer::from_samples(mono, spec.sample_rate))
}

/// Write a buffer as a mono WAV file.
///
/// `bits` selects 16- or 24-bit PCM, or 32-bit IEEE float. PCM samples are
/// clamped to the representable range.
pub fn write_wav<P: AsRef<Path>>(path: P, buffer: &SampleBuffer, bits: u16) -> Result<()> {
    let sample_format = match bits {
        16 | 24 => SampleFormat::Int,
        32 => SampleFormat::Float,
        other => {
            return Err(Error::UnsupportedFormat(format!(
                "{other}-bit WAV (expected 16, 24 or 32)"
            )));
        }
    };
    let spec = hound::WavSpec {
        channels: buffer.channels(),
        sample_rate: buffer.sample_rate(),
        bits_per_sample: bits,
        sample_format,
    };

    let mut writer = WavWriter::create(path, spec)?;
    if sample_format == SampleFormat::Float {
        for &sample in buffer.as_slice() {
            writer.write_sample(sample)?;
        }
    } else {
        let max_val = (1i32 << (bits - 1)) as f32;
        for &sample in buffer.as_slice() {
            let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
            writer.write_sample(int_sample)?;
        }
    }

    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn ramp() -> SampleBuffer {
        let samples = (0..100).map(|i| (i as f32 / 50.0) - 1.0).collect();
        SampleBuffer::from_samples(samples, 22050)
    }

    #[test]
    fn float_roundtrip_is_exact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("float.wav");
        let buffer = ramp();

        write_wav(&path, &buffer, 32).unwrap();
        let loaded = read_wav(&path).unwrap();
        assert_eq!(loaded.sample_rate(), 22050);
        assert_eq!(loaded.as_slice(), buffer.as_slice());
    }

    #[test]
    fn pcm_roundtrip_is_close() {
        let dir = tempdir().unwrap();
        for bits in [16u16, 24] {
            let path = dir.path().join(format!("pcm{bits}.wav"));
            let buffer = ramp();
            write_wav(&path, &buffer, bits).unwrap();

            let loaded = read_wav(&path).unwrap();
            assert_eq!(loaded.len(), buffer.len());
            let tolerance = 2.0 / (1i32 << (bits - 1)) as f32;
            for (a, b) in loaded.as_slice().iter().zip(buffer.as_slice()) {
                assert!((a - b).abs() <= tolerance, "{bits}-bit: {a} vs {b}");
            }
        }
    }

    #[test]
    fn pcm_clamps_out_of_range() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hot.wav");
        let buffer = SampleBuffer::from_samples(vec![2.0, -2.0], 44100);
        write_wav(&path, &buffer, 16).unwrap();

        let loaded = read_wav(&path).unwrap();
        assert!(loaded.as_slice()[0] < 1.0);
        assert_eq!(loaded.as_slice()[1], -1.0);
    }

    #[test]
    fn stereo_is_mixed_to_mono() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for (l, r) in [(1.0f32, 0.0f32), (0.5, 0.5), (-1.0, 0.0)] {
            writer.write_sample(l).unwrap();
            writer.write_sample(r).unwrap();
        }
        writer.finalize().unwrap();

        let loaded = read_wav(&path).unwrap();
        assert_eq!(loaded.as_slice(), &[0.5, 0.5, -0.5]);
        assert_eq!(loaded.channels(), 1);
    }

    #[test]
    fn info_reports_duration() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("info.wav");
        let buffer = SampleBuffer::from_samples(vec![0.0; 44100], 44100);
        write_wav(&path, &buffer, 16).unwrap();

        let info = read_wav_info(&path).unwrap();
        assert_eq!(info.channels, 1);
        assert_eq!(info.bits_per_sample, 16);
        assert!(!info.is_float);
        assert_eq!(info.num_frames, 44100);
        assert!((info.duration_secs - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_unsupported_depth() {
        let dir = tempdir().unwrap();
        let result = write_wav(dir.path().join("x.wav"), &ramp(), 8);
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_wav("/nonexistent/voxbox/take.wav").is_err());
    }
}
