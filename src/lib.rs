pub mod advisor;
pub mod api;
pub mod audio;
pub mod chat;
pub mod config;
pub mod geo;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum NimbusError {
    #[error("Request to {endpoint} failed: {reason}")]
    RequestFailed { endpoint: String, reason: String },

    #[error("Failed to decode {endpoint} response: {reason}")]
    DecodeFailed { endpoint: String, reason: String },

    #[error("Microphone permission denied: {0}")]
    PermissionDenied(String),

    #[error("Audio device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Audio playback failed: {0}")]
    PlaybackFailed(String),

    #[error("Empty input")]
    EmptyInput,

    #[error("Audio processing error: {0}")]
    AudioProcessingError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),

    #[error("IO error: {0}")]
    IOError(String),
}

impl From<std::io::Error> for NimbusError {
    fn from(e: std::io::Error) -> Self {
        NimbusError::IOError(e.to_string())
    }
}

impl NimbusError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Network failures are transient; the user retries manually
            NimbusError::RequestFailed { .. } => true,
            NimbusError::DecodeFailed { .. } => true,
            // Media access may recover once the user grants permission
            NimbusError::PermissionDenied(_) => true,
            NimbusError::DeviceUnavailable(_) => true,
            NimbusError::PlaybackFailed(_) => true,
            NimbusError::EmptyInput => true,
            NimbusError::AudioProcessingError(_) => true,
            NimbusError::ConfigError(_) => false,
            NimbusError::ChannelError(_) => false,
            NimbusError::IOError(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            NimbusError::RequestFailed { endpoint, .. } => match endpoint.as_str() {
                "chat" => "Failed to send message. Please try again.".to_string(),
                "chatHistory" => "Failed to load chat history.".to_string(),
                "event-advisor" => "Failed to get event advice. Please try again.".to_string(),
                "travel-advisor" => "Failed to get travel advice. Please try again.".to_string(),
                other => format!("Request to {} failed. Please try again.", other),
            },
            NimbusError::DecodeFailed { endpoint, .. } => {
                format!("Unexpected response from {}.", endpoint)
            }
            NimbusError::PermissionDenied(_) => {
                "Failed to start recording. Please check microphone permissions.".to_string()
            }
            NimbusError::DeviceUnavailable(_) => {
                "No microphone available. Please check your audio devices.".to_string()
            }
            NimbusError::PlaybackFailed(_) => {
                "Failed to play audio. Please try again.".to_string()
            }
            NimbusError::EmptyInput => "Nothing to send.".to_string(),
            NimbusError::AudioProcessingError(_) => {
                "Audio processing failed. Please try again.".to_string()
            }
            NimbusError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            NimbusError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
            NimbusError::IOError(_) => "File system error occurred.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NimbusError>;
