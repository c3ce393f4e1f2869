//! End-to-end state machine scenarios
//!
//! Drives the public conversation, playback, and location APIs through the
//! flows a user actually performs, without touching the network.

use nimbus::api::types::ChatReply;
use nimbus::audio::PlaybackRegistry;
use nimbus::chat::{ChatMessage, Conversation, Role};
use nimbus::geo::{Coordinates, LocationState};

fn reply(text: &str, audio_url: Option<&str>) -> ChatReply {
    ChatReply {
        response: text.to_string(),
        audio_url: audio_url.map(str::to_string),
    }
}

#[test]
fn rain_question_round_trip() {
    let mut conversation = Conversation::new();

    // Bootstrap with an empty history
    let history_id = conversation.begin_history_load();
    assert!(conversation.history_loaded(history_id, Vec::new()));

    // Optimistic append happens before the reply arrives
    let (request_id, sent) = conversation.submit("Will it rain tomorrow?").unwrap();
    assert_eq!(sent, "Will it rain tomorrow?");
    assert_eq!(conversation.len(), 1);
    assert_eq!(conversation.messages()[0].role, Role::User);

    assert!(conversation.reply_received(
        request_id,
        &reply("Yes, 80% chance", Some("https://example.com/a.mp3"))
    ));

    let messages = conversation.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content, "Will it rain tomorrow?");
    assert_eq!(messages[1].content, "Yes, 80% chance");
    assert_eq!(
        messages[1].audio_url.as_deref(),
        Some("https://example.com/a.mp3")
    );
}

#[test]
fn every_failed_send_restores_the_previous_length() {
    let mut conversation = Conversation::new();

    for round in 0..5 {
        let before = conversation.len();
        let (request_id, _) = conversation
            .submit(&format!("attempt {}", round))
            .unwrap();

        if round % 2 == 0 {
            assert!(conversation.send_failed(request_id));
            assert_eq!(conversation.len(), before);
        } else {
            assert!(conversation.reply_received(request_id, &reply("ok", None)));
            assert_eq!(conversation.len(), before + 2);
        }
    }
}

#[test]
fn recording_blocks_text_submission() {
    let mut conversation = Conversation::new();
    conversation.recording_started();

    for text in ["hello", "  padded  ", "another try"] {
        assert!(conversation.submit(text).is_none());
    }
    assert!(conversation.is_empty());

    // Stopping the recording dispatches a voice send instead
    conversation.recording_stopped();
    let voice_id = conversation.begin_voice_send().unwrap();
    assert!(conversation.reply_received(voice_id, &reply("Heard you!", None)));
    assert_eq!(conversation.len(), 1);
    assert_eq!(conversation.messages()[0].role, Role::Bot);
}

#[test]
fn history_failure_is_recoverable() {
    let mut conversation = Conversation::new();
    let history_id = conversation.begin_history_load();

    assert!(conversation.history_failed(history_id));
    assert!(conversation.is_empty());
    assert!(conversation.phase().is_idle());

    // The session keeps working after the failed bootstrap
    let (request_id, _) = conversation.submit("still here?").unwrap();
    assert!(conversation.reply_received(request_id, &reply("Still here.", None)));
    assert_eq!(conversation.len(), 2);
}

#[test]
fn hydrated_history_precedes_new_messages() {
    let mut conversation = Conversation::new();
    let history_id = conversation.begin_history_load();
    assert!(conversation.history_loaded(
        history_id,
        vec![
            ChatMessage::user("What about Sunday?"),
            ChatMessage::bot("Clear skies.", None),
        ]
    ));

    let (request_id, _) = conversation.submit("And Monday?").unwrap();
    assert!(conversation.reply_received(request_id, &reply("Light rain.", None)));

    let contents: Vec<&str> = conversation
        .messages()
        .iter()
        .map(|message| message.content.as_str())
        .collect();
    assert_eq!(
        contents,
        ["What about Sunday?", "Clear skies.", "And Monday?", "Light rain."]
    );
}

#[test]
fn playback_switches_clips_atomically() {
    let mut registry = PlaybackRegistry::new();

    registry.begin(1);
    assert!(registry.is_playing(1));

    // play(i) then play(j) leaves only j playing
    let previous = registry.begin(2);
    assert_eq!(previous, Some(1));
    assert!(registry.is_playing(2));
    assert!(!registry.is_playing(1));

    // Natural completion clears the active clip
    assert!(registry.clear(2));
    assert_eq!(registry.active(), None);
}

#[test]
fn geocoding_miss_preserves_coordinates() {
    let mut location = LocationState::new(Coordinates::new(40.7128, -74.0060));
    location.search_query = "Paris".to_string();

    let (request_id, query) = location.begin_search().unwrap();
    assert_eq!(query, "Paris");

    // No results: coordinates stay exactly where they were
    assert!(location.search_resolved(request_id, None));
    assert_eq!(location.coordinates(), Coordinates::new(40.7128, -74.0060));
}

#[test]
fn geocoding_hit_moves_coordinates() {
    let mut location = LocationState::new(Coordinates::new(40.7128, -74.0060));
    location.search_query = "Paris".to_string();

    let (request_id, _) = location.begin_search().unwrap();
    assert!(location.search_resolved(request_id, Some(Coordinates::new(48.8566, 2.3522))));
    assert_eq!(location.coordinates(), Coordinates::new(48.8566, 2.3522));
    assert_eq!(location.latitude_text, "48.8566");
}
