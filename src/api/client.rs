//! Typed client for the weather-advisory backend
//!
//! Pure request/response mapping: each call builds one request, checks the
//! status, and decodes the payload. No retries, no caching.

use crate::api::types::{
    Advice, ChatHistory, ChatReply, EventAdviceRequest, HistoryMessage, TravelAdviceRequest,
};
use crate::{NimbusError, Result};
use reqwest::multipart;
use serde::de::DeserializeOwned;
use tracing::debug;

const USER_AGENT: &str = concat!("nimbus/", env!("CARGO_PKG_VERSION"));

/// Client for the chat, history, and advisory endpoints
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();

        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Send a text chat message for the given session
    pub async fn send_chat_message(&self, user_id: &str, message: &str) -> Result<ChatReply> {
        let form = multipart::Form::new()
            .text("input_type", "text")
            .text("user_id", user_id.to_string())
            .text("message", message.to_string());

        self.post_form("chat", form).await
    }

    /// Send a recorded voice message (16-bit PCM WAV) for the given session
    pub async fn send_voice_message(&self, user_id: &str, wav: Vec<u8>) -> Result<ChatReply> {
        let audio = multipart::Part::bytes(wav)
            .file_name("recording.wav")
            .mime_str("audio/wav")
            .map_err(|e| NimbusError::RequestFailed {
                endpoint: "chat".to_string(),
                reason: e.to_string(),
            })?;

        let form = multipart::Form::new()
            .text("input_type", "voice")
            .text("user_id", user_id.to_string())
            .part("audio", audio);

        self.post_form("chat", form).await
    }

    /// Fetch the stored conversation history for the given session
    pub async fn chat_history(&self, user_id: &str) -> Result<Vec<HistoryMessage>> {
        let url = format!("{}/chatHistory/{}", self.base_url, user_id);
        debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| NimbusError::RequestFailed {
                endpoint: "chatHistory".to_string(),
                reason: e.to_string(),
            })?;

        let history: ChatHistory = decode_response(response, "chatHistory").await?;
        Ok(history.history)
    }

    /// Request advice for a planned event
    pub async fn event_advice(&self, request: &EventAdviceRequest) -> Result<String> {
        let advice: Advice = self.post_json("event-advisor", request).await?;
        Ok(advice.advice)
    }

    /// Request advice for a planned trip
    pub async fn travel_advice(&self, request: &TravelAdviceRequest) -> Result<String> {
        let advice: Advice = self.post_json("travel-advisor", request).await?;
        Ok(advice.advice)
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: multipart::Form,
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("POST {} (multipart)", url);

        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| NimbusError::RequestFailed {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })?;

        decode_response(response, endpoint).await
    }

    async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("POST {} (json)", url);

        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| NimbusError::RequestFailed {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })?;

        decode_response(response, endpoint).await
    }

    /// Fetch raw bytes from an absolute URL (bot audio clips)
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| NimbusError::RequestFailed {
                endpoint: "audio".to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(NimbusError::RequestFailed {
                endpoint: "audio".to_string(),
                reason: format!("status {}", response.status()),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| NimbusError::RequestFailed {
                endpoint: "audio".to_string(),
                reason: e.to_string(),
            })?;

        Ok(bytes.to_vec())
    }
}

async fn decode_response<T: DeserializeOwned>(
    response: reqwest::Response,
    endpoint: &str,
) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(NimbusError::RequestFailed {
            endpoint: endpoint.to_string(),
            reason: format!("status {}", status),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| NimbusError::DecodeFailed {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_construction() {
        let client = ApiClient::new("https://example.com/api");
        assert_eq!(client.base_url, "https://example.com/api");
    }

    #[test]
    fn test_request_failed_maps_to_user_message() {
        let err = NimbusError::RequestFailed {
            endpoint: "chat".to_string(),
            reason: "status 500".to_string(),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.user_message(), "Failed to send message. Please try again.");
    }
}
