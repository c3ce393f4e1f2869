//! Playback of bot audio clips
//!
//! Two halves: `PlaybackRegistry` is the synchronous bookkeeping the UI
//! consults (at most one message index may be playing at any instant), and
//! `PlaybackPipeline` is the worker that fetches, decodes, resamples, and
//! feeds the output device. Decoded clips are cached per message index on
//! first play and kept for replay.

use crate::NimbusError;
#[cfg(feature = "audio-io")]
use crossbeam_channel::{bounded, Receiver, Sender};

#[cfg(feature = "audio-io")]
use crate::api::client::ApiClient;
#[cfg(feature = "audio-io")]
use crate::audio::resampler::resample_mono;
#[cfg(feature = "audio-io")]
use crate::audio::wav::{decode_wav, mixdown_mono};
#[cfg(feature = "audio-io")]
use crate::config::AppConfig;
#[cfg(feature = "audio-io")]
use crate::Result;
#[cfg(feature = "audio-io")]
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
#[cfg(feature = "audio-io")]
use parking_lot::Mutex;
#[cfg(feature = "audio-io")]
use std::collections::HashMap;
#[cfg(feature = "audio-io")]
use std::sync::Arc;
#[cfg(feature = "audio-io")]
use std::time::Duration;
#[cfg(feature = "audio-io")]
use tokio::runtime::Runtime;
#[cfg(feature = "audio-io")]
use tracing::{error, info, warn};

/// Commands that can be sent to the playback pipeline
#[derive(Debug, Clone)]
pub enum PlaybackCommand {
    /// Start playing the clip of the given message, stopping whatever is
    /// currently playing first
    Play { index: usize, url: String },

    /// Halt and rewind the clip of the given message
    Stop { index: usize },

    /// Shutdown the pipeline
    Shutdown,
}

/// Events emitted by the playback pipeline
#[derive(Debug, Clone)]
pub enum PlaybackEvent {
    /// The clip started playing
    Started { index: usize },

    /// The clip ran to natural completion
    Finished { index: usize },

    /// Loading or playing the clip failed
    Failed { index: usize, error: NimbusError },
}

/// Bookkeeping for the at-most-one-playing invariant.
///
/// The UI mutates this synchronously on user action and on pipeline events,
/// so the displayed play/stop controls never show two active clips.
#[derive(Debug, Default)]
pub struct PlaybackRegistry {
    active: Option<usize>,
}

impl PlaybackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the clip currently playing, if any
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn is_playing(&self, index: usize) -> bool {
        self.active == Some(index)
    }

    /// Mark `index` as the active clip. Returns the previously active index
    /// so the caller can halt it.
    pub fn begin(&mut self, index: usize) -> Option<usize> {
        let previous = self.active.take();
        self.active = Some(index);
        previous
    }

    /// Clear the active id if `index` holds it. Returns whether anything
    /// changed; completion, errors, and explicit stops all land here.
    pub fn clear(&mut self, index: usize) -> bool {
        if self.active == Some(index) {
            self.active = None;
            true
        } else {
            false
        }
    }
}

#[cfg(feature = "audio-io")]
#[derive(Default)]
struct PlayCursor {
    samples: Vec<f32>,
    position: usize,
}

/// Output-device handle. The stream is built once and kept alive; it plays
/// whatever the cursor holds and silence once the cursor is drained.
#[cfg(feature = "audio-io")]
struct Speaker {
    sample_rate: u32,
    _stream: cpal::Stream,
    cursor: Arc<Mutex<PlayCursor>>,
}

#[cfg(feature = "audio-io")]
impl Speaker {
    fn open() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| NimbusError::PlaybackFailed("no output device".into()))?;

        info!(
            "Using output device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config: cpal::StreamConfig = device
            .default_output_config()
            .map_err(|e| NimbusError::PlaybackFailed(format!("no output config: {}", e)))?
            .into();

        let sample_rate = config.sample_rate.0;
        let channels = config.channels as usize;
        let cursor = Arc::new(Mutex::new(PlayCursor::default()));
        let cursor_cb = Arc::clone(&cursor);

        let err_fn = |err| {
            error!("Output stream error: {}", err);
        };

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut cursor = cursor_cb.lock();
                    for frame in data.chunks_mut(channels) {
                        let sample = if cursor.position < cursor.samples.len() {
                            let s = cursor.samples[cursor.position];
                            cursor.position += 1;
                            s
                        } else {
                            0.0
                        };
                        for out in frame.iter_mut() {
                            *out = sample;
                        }
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| NimbusError::PlaybackFailed(format!("output stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| NimbusError::PlaybackFailed(format!("output start: {}", e)))?;

        Ok(Self {
            sample_rate,
            _stream: stream,
            cursor,
        })
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Replace the cursor contents and play from the start
    fn start(&self, samples: Vec<f32>) {
        let mut cursor = self.cursor.lock();
        cursor.samples = samples;
        cursor.position = 0;
    }

    /// Halt and rewind
    fn halt(&self) {
        let mut cursor = self.cursor.lock();
        cursor.samples.clear();
        cursor.position = 0;
    }

    fn is_idle(&self) -> bool {
        let cursor = self.cursor.lock();
        cursor.position >= cursor.samples.len()
    }
}

/// Playback pipeline with channel-based communication
#[cfg(feature = "audio-io")]
pub struct PlaybackPipeline {
    config: AppConfig,
    command_tx: Sender<PlaybackCommand>,
    command_rx: Receiver<PlaybackCommand>,
    event_tx: Sender<PlaybackEvent>,
    event_rx: Receiver<PlaybackEvent>,
}

#[cfg(feature = "audio-io")]
impl PlaybackPipeline {
    pub fn new(config: AppConfig) -> Self {
        let (command_tx, command_rx) = bounded(100);
        let (event_tx, event_rx) = bounded(100);

        Self {
            config,
            command_tx,
            command_rx,
            event_tx,
            event_rx,
        }
    }

    pub fn command_sender(&self) -> Sender<PlaybackCommand> {
        self.command_tx.clone()
    }

    pub fn event_receiver(&self) -> Receiver<PlaybackEvent> {
        self.event_rx.clone()
    }

    /// Start the pipeline worker thread
    pub fn start_worker(self) -> Result<()> {
        let config = self.config.clone();
        let command_rx = self.command_rx.clone();
        let event_tx = self.event_tx.clone();

        std::thread::spawn(move || {
            info!("Playback worker starting");

            let runtime = match Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    error!("Failed to create tokio runtime: {}", e);
                    return;
                }
            };

            let api = ApiClient::new(config.api_base_url.clone());

            // Opened lazily on the first play request
            let mut speaker: Option<Speaker> = None;
            // Decoded clips, mono at device rate, kept for replay
            let mut cache: HashMap<usize, Vec<f32>> = HashMap::new();
            let mut active: Option<usize> = None;

            loop {
                match command_rx.recv_timeout(Duration::from_millis(50)) {
                    Ok(PlaybackCommand::Play { index, url }) => {
                        if let Some(speaker) = &speaker {
                            speaker.halt();
                        }
                        active = None;

                        if speaker.is_none() {
                            match Speaker::open() {
                                Ok(opened) => speaker = Some(opened),
                                Err(e) => {
                                    warn!("Cannot open output device: {}", e);
                                    let _ = event_tx
                                        .send(PlaybackEvent::Failed { index, error: e });
                                    continue;
                                }
                            }
                        }
                        let Some(speaker) = speaker.as_ref() else {
                            continue;
                        };

                        let samples = match cache.get(&index) {
                            Some(cached) => cached.clone(),
                            None => match fetch_clip(&runtime, &api, &url, speaker.sample_rate())
                            {
                                Ok(samples) => {
                                    cache.insert(index, samples.clone());
                                    samples
                                }
                                Err(e) => {
                                    warn!("Clip {} failed to load: {}", index, e);
                                    let _ = event_tx
                                        .send(PlaybackEvent::Failed { index, error: e });
                                    continue;
                                }
                            },
                        };

                        speaker.start(samples);
                        active = Some(index);
                        let _ = event_tx.send(PlaybackEvent::Started { index });
                    }

                    Ok(PlaybackCommand::Stop { index }) => {
                        if active == Some(index) {
                            if let Some(speaker) = &speaker {
                                speaker.halt();
                            }
                            active = None;
                        }
                    }

                    Ok(PlaybackCommand::Shutdown) => {
                        info!("Playback worker shutting down");
                        break;
                    }

                    Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                        // Detect natural completion
                        if let (Some(index), Some(sp)) = (active, speaker.as_ref()) {
                            if sp.is_idle() {
                                active = None;
                                let _ = event_tx.send(PlaybackEvent::Finished { index });
                            }
                        }
                    }

                    Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
                }
            }

            info!("Playback worker stopped");
        });

        Ok(())
    }
}

/// Download a clip and prepare it for the output device
#[cfg(feature = "audio-io")]
fn fetch_clip(
    runtime: &Runtime,
    api: &ApiClient,
    url: &str,
    device_rate: u32,
) -> Result<Vec<f32>> {
    let bytes = runtime.block_on(api.fetch_bytes(url))?;
    let clip = decode_wav(&bytes)?;
    let mono = mixdown_mono(&clip.samples, clip.channels);
    resample_mono(&mono, clip.sample_rate, device_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_most_one_active() {
        let mut registry = PlaybackRegistry::new();
        assert_eq!(registry.active(), None);

        registry.begin(0);
        registry.begin(3);
        registry.begin(7);

        // Only the last play survives
        assert_eq!(registry.active(), Some(7));
        assert!(!registry.is_playing(0));
        assert!(!registry.is_playing(3));
        assert!(registry.is_playing(7));
    }

    #[test]
    fn test_play_i_then_j_leaves_only_j() {
        let mut registry = PlaybackRegistry::new();

        let previous = registry.begin(1);
        assert_eq!(previous, None);
        assert!(registry.is_playing(1));

        let previous = registry.begin(2);
        assert_eq!(previous, Some(1));
        assert!(registry.is_playing(2));
        assert!(!registry.is_playing(1));
    }

    #[test]
    fn test_clear_only_affects_the_holder() {
        let mut registry = PlaybackRegistry::new();
        registry.begin(5);

        // Stopping a different index does nothing
        assert!(!registry.clear(2));
        assert!(registry.is_playing(5));

        // Completion clears the holder
        assert!(registry.clear(5));
        assert_eq!(registry.active(), None);

        // Idempotent once cleared
        assert!(!registry.clear(5));
    }

    #[test]
    fn test_replay_same_index() {
        let mut registry = PlaybackRegistry::new();
        registry.begin(4);
        let previous = registry.begin(4);

        assert_eq!(previous, Some(4));
        assert!(registry.is_playing(4));
    }
}
