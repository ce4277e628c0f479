//! Stereo WAV reading and writing.
//!
//! The engine is stereo-only, so this module always hands back two channel
//! buffers: mono files are duplicated into both channels, files with more
//! than two channels use the first two.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavWriter};
use thiserror::Error;

/// WAV I/O failure.
#[derive(Debug, Error)]
pub enum WavError {
    /// Underlying decoder/encoder error.
    #[error("wav error: {0}")]
    Hound(#[from] hound::Error),
    /// The file contains no audio frames.
    #[error("{0}: file contains no samples")]
    Empty(String),
    /// Unsupported output bit depth.
    #[error("unsupported bit depth {0} (use 16, 24, or 32)")]
    BitDepth(u16),
}

/// Result alias for WAV operations.
pub type Result<T> = std::result::Result<T, WavError>;

/// Output/input format description.
#[derive(Debug, Clone, Copy)]
pub struct WavSpec {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample (32 means IEEE float).
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            bits_per_sample: 32,
        }
    }
}

/// Read a WAV file into separate left/right buffers.
pub fn read_wav_stereo<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, Vec<f32>, WavSpec)> {
    let path = path.as_ref();
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            // i64 so 32-bit PCM does not overflow the shift
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    if interleaved.is_empty() {
        return Err(WavError::Empty(path.display().to_string()));
    }

    let frames = interleaved.len() / channels;
    let mut left = Vec::with_capacity(frames);
    let mut right = Vec::with_capacity(frames);
    for frame in interleaved.chunks(channels) {
        left.push(frame[0]);
        right.push(if channels > 1 { frame[1] } else { frame[0] });
    }

    Ok((
        left,
        right,
        WavSpec {
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        },
    ))
}

/// Write left/right buffers as an interleaved stereo WAV file.
///
/// 32-bit output is IEEE float; 16 and 24 bit are integer PCM with
/// clamping. Channel lengths must match.
pub fn write_wav_stereo<P: AsRef<Path>>(
    path: P,
    left: &[f32],
    right: &[f32],
    spec: WavSpec,
) -> Result<()> {
    debug_assert_eq!(left.len(), right.len());
    if !matches!(spec.bits_per_sample, 16 | 24 | 32) {
        return Err(WavError::BitDepth(spec.bits_per_sample));
    }

    let hound_spec = hound::WavSpec {
        channels: 2,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        sample_format: if spec.bits_per_sample == 32 {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    };
    let mut writer = WavWriter::create(path, hound_spec)?;

    if spec.bits_per_sample == 32 {
        for (&l, &r) in left.iter().zip(right) {
            writer.write_sample(l)?;
            writer.write_sample(r)?;
        }
    } else {
        let max_val = (1i32 << (spec.bits_per_sample - 1)) as f32;
        for (&l, &r) in left.iter().zip(right) {
            for sample in [l, r] {
                let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
                writer.write_sample(int_sample)?;
            }
        }
    }

    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stereo_float_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rt.wav");

        let left: Vec<f32> = (0..480).map(|i| (i as f32 * 0.1).sin() * 0.5).collect();
        let right: Vec<f32> = left.iter().map(|x| -x).collect();
        write_wav_stereo(&path, &left, &right, WavSpec::default()).unwrap();

        let (l, r, spec) = read_wav_stereo(&path).unwrap();
        assert_eq!(spec.sample_rate, 48000);
        assert_eq!(l.len(), 480);
        for i in 0..480 {
            assert!((l[i] - left[i]).abs() < 1e-6);
            assert!((r[i] - right[i]).abs() < 1e-6);
        }
    }

    #[test]
    fn mono_duplicates_to_both_channels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono.wav");

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for i in 0..100 {
            writer.write_sample::<i16>((i * 100) as i16).unwrap();
        }
        writer.finalize().unwrap();

        let (l, r, _) = read_wav_stereo(&path).unwrap();
        assert_eq!(l, r);
        assert_eq!(l.len(), 100);
    }

    #[test]
    fn reads_32_bit_int_pcm_with_correct_sign() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("int32.wav");

        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for _ in 0..16 {
            writer.write_sample::<i32>(i32::MAX / 2).unwrap();
            writer.write_sample::<i32>(i32::MIN / 2).unwrap();
        }
        writer.finalize().unwrap();

        let (l, r, _) = read_wav_stereo(&path).unwrap();
        assert!(l.iter().all(|&s| (s - 0.5).abs() < 1e-6), "left {:?}", l[0]);
        assert!(r.iter().all(|&s| (s + 0.5).abs() < 1e-6), "right {:?}", r[0]);
    }

    #[test]
    fn rejects_weird_bit_depth() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.wav");
        let spec = WavSpec {
            sample_rate: 48000,
            bits_per_sample: 12,
        };
        assert!(write_wav_stereo(&path, &[0.0], &[0.0], spec).is_err());
    }
}
