//! Wire types for the weather-advisory backend

use crate::chat::Role;
use serde::{Deserialize, Serialize};

/// Response to a chat or voice message
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    /// The bot's answer text
    pub response: String,
    /// Optional spoken rendition of the answer
    pub audio_url: Option<String>,
}

/// One entry of the stored conversation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

/// Payload of `GET /chatHistory/{user_id}`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatHistory {
    pub history: Vec<HistoryMessage>,
}

/// Advisory answer, markdown text
#[derive(Debug, Clone, Deserialize)]
pub struct Advice {
    pub advice: String,
}

/// Kind of event being planned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Indoor,
    Outdoor,
    Hybrid,
    Other,
}

impl EventType {
    pub const ALL: [EventType; 4] = [
        EventType::Outdoor,
        EventType::Indoor,
        EventType::Hybrid,
        EventType::Other,
    ];

    /// Human-readable label for selection widgets
    pub fn label(&self) -> &'static str {
        match self {
            EventType::Indoor => "Indoor Event",
            EventType::Outdoor => "Outdoor Event",
            EventType::Hybrid => "Hybrid Event",
            EventType::Other => "Other",
        }
    }
}

/// Means of travel for the travel advisor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Car,
    Motorcycle,
    Flight,
    Train,
    Bus,
    Bicycle,
    Walking,
    Other,
}

impl VehicleType {
    pub const ALL: [VehicleType; 8] = [
        VehicleType::Car,
        VehicleType::Motorcycle,
        VehicleType::Flight,
        VehicleType::Train,
        VehicleType::Bus,
        VehicleType::Bicycle,
        VehicleType::Walking,
        VehicleType::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            VehicleType::Car => "Car",
            VehicleType::Motorcycle => "Motorcycle",
            VehicleType::Flight => "Flight",
            VehicleType::Train => "Train",
            VehicleType::Bus => "Bus",
            VehicleType::Bicycle => "Bicycle",
            VehicleType::Walking => "Walking",
            VehicleType::Other => "Other",
        }
    }
}

/// Request body of `POST /event-advisor`
#[derive(Debug, Clone, Serialize)]
pub struct EventAdviceRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub from_time: String,
    pub to_time: String,
    pub event_type: EventType,
    pub event_details: String,
}

/// Request body of `POST /travel-advisor`
#[derive(Debug, Clone, Serialize)]
pub struct TravelAdviceRequest {
    pub from_latitude: f64,
    pub from_longitude: f64,
    pub to_latitude: f64,
    pub to_longitude: f64,
    pub from_time: String,
    pub to_time: String,
    pub vehicle_type: VehicleType,
    pub travel_details: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_request_serializes_with_wire_names() {
        let request = EventAdviceRequest {
            latitude: 40.7128,
            longitude: -74.006,
            from_time: "2026-08-06T10:00".to_string(),
            to_time: "2026-08-06T18:00".to_string(),
            event_type: EventType::Outdoor,
            event_details: "Garden party".to_string(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["event_type"], "outdoor");
        assert_eq!(json["latitude"], 40.7128);
        assert_eq!(json["event_details"], "Garden party");
    }

    #[test]
    fn test_vehicle_types_serialize_lowercase() {
        for vehicle in VehicleType::ALL {
            let json = serde_json::to_string(&vehicle).unwrap();
            assert_eq!(json, json.to_lowercase());
        }
        assert_eq!(
            serde_json::to_string(&VehicleType::Bicycle).unwrap(),
            "\"bicycle\""
        );
    }

    #[test]
    fn test_chat_reply_deserializes_without_audio() {
        let reply: ChatReply =
            serde_json::from_str(r#"{"response": "Sunny all day"}"#).unwrap();
        assert_eq!(reply.response, "Sunny all day");
        assert!(reply.audio_url.is_none());
    }

    #[test]
    fn test_history_roles_deserialize() {
        let history: ChatHistory = serde_json::from_str(
            r#"{"history": [
                {"role": "user", "content": "Hi"},
                {"role": "bot", "content": "Hello", "audio_url": "https://x/a.mp3"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(history.history.len(), 2);
        assert_eq!(history.history[0].role, Role::User);
        assert_eq!(
            history.history[1].audio_url.as_deref(),
            Some("https://x/a.mp3")
        );
    }
}
