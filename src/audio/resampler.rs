use crate::{NimbusError, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

/// Sample-rate converter for playback clips
pub struct AudioResampler {
    resampler: SincFixedIn<f32>,
    input_rate: u32,
    output_rate: u32,
    channels: usize,
}

impl AudioResampler {
    pub fn new(input_rate: u32, output_rate: u32, channels: u16) -> Result<Self> {
        if input_rate == 0 || output_rate == 0 {
            return Err(NimbusError::ConfigError(
                "Sample rates must be greater than 0".into(),
            ));
        }
        if channels == 0 {
            return Err(NimbusError::ConfigError(
                "Number of channels must be greater than 0".into(),
            ));
        }

        let resample_ratio = output_rate as f64 / input_rate as f64;

        let params = SincInterpolationParameters {
            sinc_len: 256,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        };

        let chunk_size = 1024;

        let resampler = SincFixedIn::<f32>::new(
            resample_ratio,
            2.0,
            params,
            chunk_size,
            channels as usize,
        )
        .map_err(|e| {
            NimbusError::AudioProcessingError(format!("Failed to create resampler: {}", e))
        })?;

        debug!(
            "Created resampler: {} Hz -> {} Hz, {} channels",
            input_rate, output_rate, channels
        );

        Ok(Self {
            resampler,
            input_rate,
            output_rate,
            channels: channels as usize,
        })
    }

    /// Resample interleaved audio data
    pub fn resample(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let chunk_size = self.resampler.input_frames_max();
        let total_frames = input.len() / self.channels;

        let ratio = self.output_rate as f64 / self.input_rate as f64;
        let estimated = (total_frames as f64 * ratio * 1.1) as usize;
        let mut output = Vec::with_capacity(estimated * self.channels);

        let mut frame_offset = 0;
        while frame_offset < total_frames {
            let frames_remaining = total_frames - frame_offset;
            let frames_to_read = frames_remaining.min(chunk_size);

            // SincFixedIn consumes exactly chunk_size frames per call; the
            // tail chunk is zero-padded and trimmed after processing
            let mut planar = vec![vec![0.0f32; chunk_size]; self.channels];
            for frame in 0..frames_to_read {
                let src = (frame_offset + frame) * self.channels;
                for (channel, lane) in planar.iter_mut().enumerate() {
                    lane[frame] = input[src + channel];
                }
            }

            let processed = self
                .resampler
                .process(&planar, None)
                .map_err(|e| NimbusError::AudioProcessingError(format!("Resampling: {}", e)))?;

            let produced_frames = processed[0].len();
            let frames_to_take = if frames_to_read < chunk_size {
                ((frames_to_read as f64 / chunk_size as f64) * produced_frames as f64) as usize
            } else {
                produced_frames
            };

            for frame in 0..frames_to_take {
                for lane in processed.iter() {
                    output.push(lane[frame]);
                }
            }

            frame_offset += frames_to_read;
        }

        Ok(output)
    }
}

/// Convert mono samples to a new rate; identity when the rates match
pub fn resample_mono(samples: &[f32], input_rate: u32, output_rate: u32) -> Result<Vec<f32>> {
    if input_rate == output_rate {
        return Ok(samples.to_vec());
    }
    AudioResampler::new(input_rate, output_rate, 1)?.resample(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_rates() {
        assert!(AudioResampler::new(0, 48000, 1).is_err());
        assert!(AudioResampler::new(16000, 0, 1).is_err());
        assert!(AudioResampler::new(16000, 48000, 0).is_err());
    }

    #[test]
    fn test_identity_passthrough() {
        let samples = vec![0.1, 0.2, 0.3];
        let output = resample_mono(&samples, 16000, 16000).unwrap();
        assert_eq!(output, samples);
    }

    #[test]
    fn test_upsample_roughly_triples() {
        let samples: Vec<f32> = (0..4800).map(|i| (i as f32 * 0.01).sin()).collect();
        let output = resample_mono(&samples, 16000, 48000).unwrap();

        let expected = samples.len() * 3;
        let tolerance = expected / 10;
        assert!(
            output.len() + tolerance > expected && output.len() < expected + tolerance,
            "expected ~{} samples, got {}",
            expected,
            output.len()
        );
    }

    #[test]
    fn test_empty_input() {
        let output = resample_mono(&[], 16000, 48000).unwrap();
        assert!(output.is_empty());
    }
}
