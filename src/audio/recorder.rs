//! Voice recording session
//!
//! A recording session exists between `start` and `stop`: it holds the
//! microphone exclusively, accumulates mono chunks, and on stop finalizes
//! them into one WAV payload ready for the voice endpoint. `stop`, `cancel`,
//! and errors all release the device.

use crate::audio::capture::Microphone;
use crate::audio::wav::encode_wav;
use crate::{NimbusError, Result};
use crossbeam_channel::{bounded, Receiver};
use tracing::{debug, info};

/// Chunks buffered in the channel before the UI drains them
const CHUNK_BUFFER: usize = 1024;

#[derive(Default)]
pub struct Recorder {
    microphone: Option<Microphone>,
    chunk_rx: Option<Receiver<Vec<f32>>>,
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.microphone.is_some()
    }

    /// Begin a recording session.
    ///
    /// Fails with `DeviceUnavailable`/`PermissionDenied` without changing
    /// state; a second `start` while active is rejected.
    pub fn start(&mut self) -> Result<()> {
        if self.is_recording() {
            return Err(NimbusError::AudioProcessingError(
                "recording already active".into(),
            ));
        }

        let mut microphone = Microphone::open()?;
        let (chunk_tx, chunk_rx) = bounded(CHUNK_BUFFER);
        microphone.start(chunk_tx)?;

        self.sample_rate = microphone.sample_rate();
        self.samples.clear();
        self.microphone = Some(microphone);
        self.chunk_rx = Some(chunk_rx);

        info!("Recording session started at {} Hz", self.sample_rate);
        Ok(())
    }

    /// Drain buffered chunks into the accumulator. Call periodically while
    /// recording so long sessions do not overflow the channel.
    pub fn poll(&mut self) {
        if let Some(chunk_rx) = &self.chunk_rx {
            while let Ok(chunk) = chunk_rx.try_recv() {
                self.samples.extend_from_slice(&chunk);
            }
        }
    }

    /// Seconds of audio accumulated so far
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Stop the session, release the microphone, and finalize the buffered
    /// chunks into a WAV payload
    pub fn stop(&mut self) -> Result<Vec<u8>> {
        let mut microphone = self
            .microphone
            .take()
            .ok_or_else(|| NimbusError::AudioProcessingError("no active recording".into()))?;
        microphone.stop();
        drop(microphone);

        self.poll();
        self.chunk_rx = None;

        let samples = std::mem::take(&mut self.samples);
        debug!(
            "Recording stopped with {} samples ({:.2}s)",
            samples.len(),
            samples.len() as f32 / self.sample_rate.max(1) as f32
        );

        if samples.is_empty() {
            return Err(NimbusError::EmptyInput);
        }

        encode_wav(&samples, self.sample_rate, 1)
    }

    /// Abandon the session without producing a payload
    pub fn cancel(&mut self) {
        if let Some(mut microphone) = self.microphone.take() {
            microphone.stop();
        }
        self.chunk_rx = None;
        self.samples.clear();
        debug!("Recording cancelled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_without_start_fails() {
        let mut recorder = Recorder::new();
        assert!(!recorder.is_recording());
        assert!(recorder.stop().is_err());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut recorder = Recorder::new();
        recorder.cancel();
        recorder.cancel();
        assert!(!recorder.is_recording());
    }
}
