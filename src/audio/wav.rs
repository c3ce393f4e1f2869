//! In-memory WAV encoding and decoding
//!
//! Recordings are finalized into a WAV byte buffer for upload, and bot audio
//! clips arrive as byte buffers over HTTP, so both directions work on
//! `Cursor`-backed buffers rather than files.

use crate::audio::clip::AudioClip;
use crate::{NimbusError, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::Cursor;
use tracing::debug;

/// Encode samples as a 16-bit PCM WAV byte buffer
pub fn encode_wav(samples: &[f32], sample_rate: u32, channels: u16) -> Result<Vec<u8>> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)
            .map_err(|e| NimbusError::AudioProcessingError(format!("WAV writer: {}", e)))?;

        for &sample in samples {
            let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer
                .write_sample(value)
                .map_err(|e| NimbusError::AudioProcessingError(format!("WAV write: {}", e)))?;
        }

        writer
            .finalize()
            .map_err(|e| NimbusError::AudioProcessingError(format!("WAV finalize: {}", e)))?;
    }

    let bytes = cursor.into_inner();
    debug!("Encoded {} samples into {} WAV bytes", samples.len(), bytes.len());
    Ok(bytes)
}

/// Decode a WAV byte buffer into samples
pub fn decode_wav(bytes: &[u8]) -> Result<AudioClip> {
    let mut reader = WavReader::new(Cursor::new(bytes))
        .map_err(|e| NimbusError::PlaybackFailed(format!("not a WAV payload: {}", e)))?;

    let spec = reader.spec();

    let samples: Result<Vec<f32>> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map_err(|e| NimbusError::PlaybackFailed(format!("WAV read: {}", e))))
            .collect(),
        SampleFormat::Int => match spec.bits_per_sample {
            16 => reader
                .samples::<i16>()
                .map(|s| {
                    s.map(|sample| sample as f32 / i16::MAX as f32)
                        .map_err(|e| NimbusError::PlaybackFailed(format!("WAV read: {}", e)))
                })
                .collect(),
            24 => reader
                .samples::<i32>()
                .map(|s| {
                    s.map(|sample| sample as f32 / 8388608.0) // 2^23
                        .map_err(|e| NimbusError::PlaybackFailed(format!("WAV read: {}", e)))
                })
                .collect(),
            32 => reader
                .samples::<i32>()
                .map(|s| {
                    s.map(|sample| sample as f32 / i32::MAX as f32)
                        .map_err(|e| NimbusError::PlaybackFailed(format!("WAV read: {}", e)))
                })
                .collect(),
            other => {
                return Err(NimbusError::PlaybackFailed(format!(
                    "unsupported bit depth: {}",
                    other
                )));
            }
        },
    };

    Ok(AudioClip::new(samples?, spec.sample_rate, spec.channels))
}

/// Collapse interleaved multi-channel samples into mono by averaging
pub fn mixdown_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }

    let channels = channels as usize;
    samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_encode_decode_wav() {
        // 100ms sine wave at 440 Hz
        let sample_rate = 16000;
        let samples: Vec<f32> = (0..1600)
            .map(|i| (2.0 * PI * 440.0 * i as f32 / sample_rate as f32).sin() * 0.5)
            .collect();

        let bytes = encode_wav(&samples, sample_rate, 1).unwrap();
        let clip = decode_wav(&bytes).unwrap();

        assert_eq!(clip.sample_rate, sample_rate);
        assert_eq!(clip.channels, 1);
        assert_eq!(clip.samples.len(), samples.len());

        // Some precision loss from the i16 conversion is expected
        for (original, decoded) in samples.iter().zip(clip.samples.iter()) {
            assert!((original - decoded).abs() < 0.001);
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_wav(&[0x00, 0x01, 0x02, 0x03]).unwrap_err();
        assert!(matches!(err, NimbusError::PlaybackFailed(_)));
    }

    #[test]
    fn test_mixdown_mono() {
        let stereo = vec![0.5, 0.3, 0.7, 0.1];
        let mono = mixdown_mono(&stereo, 2);
        assert_eq!(mono.len(), 2);
        assert!((mono[0] - 0.4).abs() < 0.001);
        assert!((mono[1] - 0.4).abs() < 0.001);

        let already_mono = mixdown_mono(&[0.2, 0.4], 1);
        assert_eq!(already_mono, vec![0.2, 0.4]);
    }
}
