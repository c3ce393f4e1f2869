#[cfg(feature = "audio-io")]
pub mod capture;
pub mod clip;
pub mod playback;
#[cfg(feature = "audio-io")]
pub mod recorder;
pub mod resampler;
pub mod wav;

#[cfg(feature = "audio-io")]
pub use capture::Microphone;
pub use clip::AudioClip;
#[cfg(feature = "audio-io")]
pub use playback::PlaybackPipeline;
pub use playback::{PlaybackCommand, PlaybackEvent, PlaybackRegistry};
#[cfg(feature = "audio-io")]
pub use recorder::Recorder;
pub use resampler::AudioResampler;
pub use wav::{decode_wav, encode_wav, mixdown_mono};
