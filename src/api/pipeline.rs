//! Backend pipeline for the weather-advisory service
//!
//! Provides a channel-based interface over the HTTP clients: the UI sends
//! `ApiCommand`s and polls `ApiEvent`s each frame, while a worker thread owns
//! the tokio runtime and performs the actual requests. Every command carries a
//! request id; consumers match events against the id they are waiting for, so
//! a response that arrives after its session moved on is simply dropped.

use crate::api::client::ApiClient;
use crate::api::geocode::GeocodeClient;
use crate::api::types::{ChatReply, EventAdviceRequest, TravelAdviceRequest};
use crate::chat::ChatMessage;
use crate::config::AppConfig;
use crate::geo::Coordinates;
use crate::{NimbusError, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use tokio::runtime::Runtime;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Commands that can be sent to the backend pipeline
#[derive(Debug, Clone)]
pub enum ApiCommand {
    /// Fetch the conversation history for the configured session
    LoadHistory { request_id: Uuid },

    /// Send a text chat message
    SendText { text: String, request_id: Uuid },

    /// Send a recorded voice message (WAV bytes)
    SendVoice { wav: Vec<u8>, request_id: Uuid },

    /// Request event advice
    EventAdvice {
        request: EventAdviceRequest,
        request_id: Uuid,
    },

    /// Request travel advice
    TravelAdvice {
        request: TravelAdviceRequest,
        request_id: Uuid,
    },

    /// Resolve a free-text location query
    Geocode { query: String, request_id: Uuid },

    /// Shutdown the pipeline
    Shutdown,
}

/// Events emitted by the backend pipeline
#[derive(Debug, Clone)]
pub enum ApiEvent {
    /// History fetch succeeded
    HistoryLoaded {
        messages: Vec<ChatMessage>,
        request_id: Uuid,
    },

    /// History fetch failed (non-fatal; chat starts empty)
    HistoryFailed {
        error: NimbusError,
        request_id: Uuid,
    },

    /// The bot answered a text or voice message
    ReplyReceived {
        reply: ChatReply,
        request_id: Uuid,
    },

    /// A text or voice send failed
    SendFailed {
        error: NimbusError,
        request_id: Uuid,
    },

    /// An advisory endpoint answered
    AdviceReceived { advice: String, request_id: Uuid },

    /// An advisory request failed
    AdviceFailed {
        error: NimbusError,
        request_id: Uuid,
    },

    /// Geocoding finished; `None` covers both no-match and failure,
    /// which leave the coordinates untouched
    GeocodeResolved {
        coordinates: Option<Coordinates>,
        request_id: Uuid,
    },

    /// Pipeline has shut down
    Shutdown,
}

/// Backend pipeline with channel-based communication
pub struct ApiPipeline {
    config: AppConfig,
    command_tx: Sender<ApiCommand>,
    command_rx: Receiver<ApiCommand>,
    event_tx: Sender<ApiEvent>,
    event_rx: Receiver<ApiEvent>,
}

impl ApiPipeline {
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

    /// Get a sender for commands
    pub fn command_sender(&self) -> Sender<ApiCommand> {
        self.command_tx.clone()
    }

    /// Get a receiver for events
    pub fn event_receiver(&self) -> Receiver<ApiEvent> {
        self.event_rx.clone()
    }

    /// Start the pipeline worker thread
    pub fn start_worker(self) -> Result<()> {
        let config = self.config.clone();
        let command_rx = self.command_rx.clone();
        let event_tx = self.event_tx.clone();

        std::thread::spawn(move || {
            info!("API pipeline worker starting");

            let runtime = match Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    error!("Failed to create tokio runtime: {}", e);
                    let _ = event_tx.send(ApiEvent::Shutdown);
                    return;
                }
            };

            let api = ApiClient::new(config.api_base_url.clone());
            let geocoder = GeocodeClient::new(config.geocode_base_url.clone());
            let user_id = config.user_id.clone();

            info!("API pipeline worker ready (session {})", user_id);

            loop {
                match command_rx.recv() {
                    Ok(ApiCommand::LoadHistory { request_id }) => {
                        debug!("Loading chat history: {}", request_id);
                        let event = match runtime.block_on(api.chat_history(&user_id)) {
                            Ok(history) => ApiEvent::HistoryLoaded {
                                messages: history.into_iter().map(ChatMessage::from).collect(),
                                request_id,
                            },
                            Err(e) => {
                                warn!("History load failed: {}", e);
                                ApiEvent::HistoryFailed {
                                    error: e,
                                    request_id,
                                }
                            }
                        };
                        let _ = event_tx.send(event);
                    }

                    Ok(ApiCommand::SendText { text, request_id }) => {
                        debug!("Sending text message: {}", request_id);
                        let event =
                            match runtime.block_on(api.send_chat_message(&user_id, &text)) {
                                Ok(reply) => ApiEvent::ReplyReceived { reply, request_id },
                                Err(e) => {
                                    warn!("Text send failed: {}", e);
                                    ApiEvent::SendFailed {
                                        error: e,
                                        request_id,
                                    }
                                }
                            };
                        let _ = event_tx.send(event);
                    }

                    Ok(ApiCommand::SendVoice { wav, request_id }) => {
                        debug!("Sending voice message ({} bytes): {}", wav.len(), request_id);
                        let event = match runtime.block_on(api.send_voice_message(&user_id, wav))
                        {
                            Ok(reply) => ApiEvent::ReplyReceived { reply, request_id },
                            Err(e) => {
                                warn!("Voice send failed: {}", e);
                                ApiEvent::SendFailed {
                                    error: e,
                                    request_id,
                                }
                            }
                        };
                        let _ = event_tx.send(event);
                    }

                    Ok(ApiCommand::EventAdvice {
                        request,
                        request_id,
                    }) => {
                        debug!("Requesting event advice: {}", request_id);
                        let event = match runtime.block_on(api.event_advice(&request)) {
                            Ok(advice) => ApiEvent::AdviceReceived { advice, request_id },
                            Err(e) => {
                                warn!("Event advice failed: {}", e);
                                ApiEvent::AdviceFailed {
                                    error: e,
                                    request_id,
                                }
                            }
                        };
                        let _ = event_tx.send(event);
                    }

                    Ok(ApiCommand::TravelAdvice {
                        request,
                        request_id,
                    }) => {
                        debug!("Requesting travel advice: {}", request_id);
                        let event = match runtime.block_on(api.travel_advice(&request)) {
                            Ok(advice) => ApiEvent::AdviceReceived { advice, request_id },
                            Err(e) => {
                                warn!("Travel advice failed: {}", e);
                                ApiEvent::AdviceFailed {
                                    error: e,
                                    request_id,
                                }
                            }
                        };
                        let _ = event_tx.send(event);
                    }

                    Ok(ApiCommand::Geocode { query, request_id }) => {
                        debug!("Geocoding {:?}: {}", query, request_id);
                        // Failures collapse into "no match"; the location
                        // input leaves its coordinates unchanged either way
                        let coordinates = match runtime.block_on(geocoder.search(&query)) {
                            Ok(hit) => hit,
                            Err(e) => {
                                warn!("Geocoding failed: {}", e);
                                None
                            }
                        };
                        let _ = event_tx.send(ApiEvent::GeocodeResolved {
                            coordinates,
                            request_id,
                        });
                    }

                    Ok(ApiCommand::Shutdown) => {
                        info!("API pipeline worker shutting down");
                        let _ = event_tx.send(ApiEvent::Shutdown);
                        break;
                    }

                    Err(e) => {
                        error!("Command channel error: {}", e);
                        break;
                    }
                }
            }

            info!("API pipeline worker stopped");
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_creation() {
        let pipeline = ApiPipeline::new(AppConfig::default());

        let _cmd_tx = pipeline.command_sender();
        let _event_rx = pipeline.event_receiver();
    }

    #[test]
    fn test_command_variants() {
        let request_id = Uuid::new_v4();

        let cmd = ApiCommand::SendText {
            text: "Will it rain tomorrow?".to_string(),
            request_id,
        };
        match cmd {
            ApiCommand::SendText { text, .. } => assert_eq!(text, "Will it rain tomorrow?"),
            _ => panic!("Wrong variant"),
        }

        let cmd = ApiCommand::Geocode {
            query: "Paris".to_string(),
            request_id,
        };
        match cmd {
            ApiCommand::Geocode { query, .. } => assert_eq!(query, "Paris"),
            _ => panic!("Wrong variant"),
        }
    }
}
