//! Conversation state machine
//!
//! Owns the ordered message history and the send lifecycle. A send is
//! appended optimistically and rolled back if the request fails; at most one
//! send is in flight, so messages land strictly in resolution order. Every
//! outbound request carries an id, and only the id currently awaited may
//! mutate state; late responses from an abandoned exchange are dropped.

use crate::api::types::ChatReply;
use crate::chat::types::{ChatMessage, Role};
use tracing::debug;
use uuid::Uuid;

/// Phase of the conversation lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Bootstrapping the message list from the backend
    HistoryLoading,
    /// Ready for input
    #[default]
    Idle,
    /// One exchange in flight
    Sending,
}

impl Phase {
    pub fn is_idle(&self) -> bool {
        matches!(self, Phase::Idle)
    }

    pub fn is_sending(&self) -> bool {
        matches!(self, Phase::Sending)
    }

    pub fn is_loading_history(&self) -> bool {
        matches!(self, Phase::HistoryLoading)
    }
}

/// Conversation state: message history plus the send/recording gates
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    phase: Phase,
    recording: bool,
    /// Whether the in-flight send appended a user message to roll back
    optimistic: bool,
    /// Id of the request this conversation is waiting on
    inflight: Option<Uuid>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Enter `HistoryLoading` and return the id the history fetch must carry
    pub fn begin_history_load(&mut self) -> Uuid {
        let request_id = Uuid::new_v4();
        self.phase = Phase::HistoryLoading;
        self.inflight = Some(request_id);
        request_id
    }

    /// History arrived; populates the message list and returns to `Idle`.
    /// Returns false for stale responses, which are ignored.
    pub fn history_loaded(&mut self, request_id: Uuid, messages: Vec<ChatMessage>) -> bool {
        if !self.expects(request_id) || !self.phase.is_loading_history() {
            debug!("Dropping stale history response {}", request_id);
            return false;
        }

        self.messages = messages;
        self.finish_exchange();
        true
    }

    /// History fetch failed: non-fatal, the conversation starts empty
    pub fn history_failed(&mut self, request_id: Uuid) -> bool {
        if !self.expects(request_id) || !self.phase.is_loading_history() {
            debug!("Dropping stale history failure {}", request_id);
            return false;
        }

        self.messages.clear();
        self.finish_exchange();
        true
    }

    /// Try to submit a text message.
    ///
    /// Rejected (returns `None`) for blank text, while history is loading,
    /// while a send is in flight, and while recording. On acceptance the user
    /// message is appended optimistically and the conversation enters
    /// `Sending`; the returned id and trimmed text form the chat request.
    pub fn submit(&mut self, text: &str) -> Option<(Uuid, String)> {
        let trimmed = text.trim();
        if trimmed.is_empty() || !self.phase.is_idle() || self.recording {
            return None;
        }

        self.messages.push(ChatMessage::user(trimmed));
        self.optimistic = true;
        self.phase = Phase::Sending;

        let request_id = Uuid::new_v4();
        self.inflight = Some(request_id);
        Some((request_id, trimmed.to_string()))
    }

    /// Begin a voice exchange. No optimistic user message is appended; the
    /// transcription lives server-side and only the bot reply is displayed.
    pub fn begin_voice_send(&mut self) -> Option<Uuid> {
        if !self.phase.is_idle() || self.recording {
            return None;
        }

        self.optimistic = false;
        self.phase = Phase::Sending;

        let request_id = Uuid::new_v4();
        self.inflight = Some(request_id);
        Some(request_id)
    }

    /// The bot answered the in-flight exchange
    pub fn reply_received(&mut self, request_id: Uuid, reply: &ChatReply) -> bool {
        if !self.expects(request_id) || !self.phase.is_sending() {
            debug!("Dropping stale reply {}", request_id);
            return false;
        }

        self.messages
            .push(ChatMessage::bot(&reply.response, reply.audio_url.clone()));
        self.finish_exchange();
        true
    }

    /// The in-flight exchange failed: roll back the optimistic user message
    /// (if any) and return to `Idle`. The text is not retried or restored.
    pub fn send_failed(&mut self, request_id: Uuid) -> bool {
        if !self.expects(request_id) || !self.phase.is_sending() {
            debug!("Dropping stale send failure {}", request_id);
            return false;
        }

        if self.optimistic {
            debug_assert!(matches!(
                self.messages.last().map(|m| m.role),
                Some(Role::User)
            ));
            self.messages.pop();
        }
        self.finish_exchange();
        true
    }

    /// Whether a recording may start now
    pub fn can_record(&self) -> bool {
        self.phase.is_idle() && !self.recording
    }

    pub fn recording_started(&mut self) {
        self.recording = true;
    }

    pub fn recording_stopped(&mut self) {
        self.recording = false;
    }

    fn expects(&self, request_id: Uuid) -> bool {
        self.inflight == Some(request_id)
    }

    fn finish_exchange(&mut self) {
        self.phase = Phase::Idle;
        self.optimistic = false;
        self.inflight = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(text: &str, audio_url: Option<&str>) -> ChatReply {
        ChatReply {
            response: text.to_string(),
            audio_url: audio_url.map(str::to_string),
        }
    }

    #[test]
    fn test_submit_appends_user_then_bot() {
        let mut conversation = Conversation::new();

        let (id, text) = conversation.submit("Will it rain tomorrow?").unwrap();
        assert_eq!(text, "Will it rain tomorrow?");
        assert_eq!(conversation.len(), 1);
        assert!(conversation.phase().is_sending());

        assert!(conversation
            .reply_received(id, &reply("Yes, 80% chance", Some("https://x/a.mp3"))));

        let messages = conversation.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "Will it rain tomorrow?");
        assert_eq!(messages[1].role, Role::Bot);
        assert_eq!(messages[1].content, "Yes, 80% chance");
        assert_eq!(messages[1].audio_url.as_deref(), Some("https://x/a.mp3"));
        assert!(conversation.phase().is_idle());
    }

    #[test]
    fn test_failed_send_rolls_back_optimistic_message() {
        let mut conversation = Conversation::new();
        let (first, _) = conversation.submit("first").unwrap();
        conversation.reply_received(first, &reply("ok", None));

        let before = conversation.len();
        let (id, _) = conversation.submit("doomed").unwrap();
        assert_eq!(conversation.len(), before + 1);

        assert!(conversation.send_failed(id));
        assert_eq!(conversation.len(), before);
        assert!(conversation.phase().is_idle());
    }

    #[test]
    fn test_blank_submit_is_rejected() {
        let mut conversation = Conversation::new();
        assert!(conversation.submit("").is_none());
        assert!(conversation.submit("   \n\t").is_none());
        assert!(conversation.is_empty());
    }

    #[test]
    fn test_concurrent_send_is_rejected() {
        let mut conversation = Conversation::new();
        let (_, _) = conversation.submit("first").unwrap();
        assert!(conversation.submit("second").is_none());
        assert_eq!(conversation.len(), 1);
    }

    #[test]
    fn test_submit_is_noop_while_recording() {
        let mut conversation = Conversation::new();
        conversation.recording_started();

        assert!(conversation.submit("anything at all").is_none());
        assert!(conversation.is_empty());

        conversation.recording_stopped();
        assert!(conversation.submit("anything at all").is_some());
    }

    #[test]
    fn test_history_bootstrap() {
        let mut conversation = Conversation::new();
        let id = conversation.begin_history_load();
        assert!(conversation.phase().is_loading_history());
        assert!(conversation.submit("too early").is_none());

        let history = vec![
            ChatMessage::user("Hi"),
            ChatMessage::bot("Hello", None),
        ];
        assert!(conversation.history_loaded(id, history));
        assert_eq!(conversation.len(), 2);
        assert!(conversation.phase().is_idle());
    }

    #[test]
    fn test_history_failure_yields_empty_idle() {
        let mut conversation = Conversation::new();
        let id = conversation.begin_history_load();

        assert!(conversation.history_failed(id));
        assert!(conversation.is_empty());
        assert!(conversation.phase().is_idle());
        // The conversation remains usable
        assert!(conversation.submit("hello").is_some());
    }

    #[test]
    fn test_stale_events_are_dropped() {
        let mut conversation = Conversation::new();
        let (id, _) = conversation.submit("question").unwrap();

        let stale = Uuid::new_v4();
        assert!(!conversation.reply_received(stale, &reply("late", None)));
        assert!(!conversation.send_failed(stale));
        assert_eq!(conversation.len(), 1);
        assert!(conversation.phase().is_sending());

        // The awaited id still lands
        assert!(conversation.reply_received(id, &reply("answer", None)));
        assert_eq!(conversation.len(), 2);
    }

    #[test]
    fn test_voice_send_has_no_rollback_target() {
        let mut conversation = Conversation::new();
        let id = conversation.begin_voice_send().unwrap();
        assert!(conversation.phase().is_sending());
        assert!(conversation.is_empty());

        assert!(conversation.send_failed(id));
        assert!(conversation.is_empty());
        assert!(conversation.phase().is_idle());
    }

    #[test]
    fn test_voice_reply_appends_bot_only() {
        let mut conversation = Conversation::new();
        let id = conversation.begin_voice_send().unwrap();

        assert!(conversation.reply_received(id, &reply("Spoken answer", Some("https://x/v.mp3"))));
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.messages()[0].role, Role::Bot);
    }

    #[test]
    fn test_voice_send_rejected_while_sending() {
        let mut conversation = Conversation::new();
        let _ = conversation.submit("text first").unwrap();
        assert!(conversation.begin_voice_send().is_none());
    }
}
