//! Application state management
//!
//! Central state for the Nimbus UI: the conversation, both advisor forms,
//! playback bookkeeping, and the channel ends of the worker pipelines. The
//! frame loop calls `poll_events` to drain pipeline events into state.

use crate::advisor::{EventForm, TravelForm};
use crate::api::{ApiCommand, ApiEvent};
#[cfg(feature = "audio-io")]
use crate::audio::Recorder;
use crate::audio::{PlaybackCommand, PlaybackEvent, PlaybackRegistry};
use crate::chat::Conversation;
use crate::config::AppConfig;
use crate::geo::Coordinates;
use crossbeam_channel::{Receiver, Sender};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

/// How long a notice stays on screen
const NOTICE_TTL: Duration = Duration::from_secs(6);
const MAX_NOTICES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A transient, user-visible notification
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    created: Instant,
}

impl Notice {
    fn new(kind: NoticeKind, text: String) -> Self {
        Self {
            kind,
            text,
            created: Instant::now(),
        }
    }

    pub fn age(&self) -> Duration {
        self.created.elapsed()
    }
}

/// Central application state
pub struct AppState {
    pub config: AppConfig,

    /// Chat page state
    pub conversation: Conversation,
    pub input_text: String,
    pub playback: PlaybackRegistry,

    /// Advisor pages
    pub event_form: EventForm,
    pub travel_form: TravelForm,

    /// Transient notifications
    pub notices: VecDeque<Notice>,

    /// Channel to send backend commands
    pub api_command_tx: Option<Sender<ApiCommand>>,
    /// Channel to receive backend events
    pub api_event_rx: Option<Receiver<ApiEvent>>,

    /// Channel to send playback commands
    pub playback_command_tx: Option<Sender<PlaybackCommand>>,
    /// Channel to receive playback events
    pub playback_event_rx: Option<Receiver<PlaybackEvent>>,

    #[cfg(feature = "audio-io")]
    recorder: Recorder,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let home = Coordinates::new(config.default_latitude, config.default_longitude);

        Self {
            config,
            conversation: Conversation::new(),
            input_text: String::new(),
            playback: PlaybackRegistry::new(),
            event_form: EventForm::new(home),
            travel_form: TravelForm::new(home),
            notices: VecDeque::new(),
            api_command_tx: None,
            api_event_rx: None,
            playback_command_tx: None,
            playback_event_rx: None,
            #[cfg(feature = "audio-io")]
            recorder: Recorder::new(),
        }
    }

    /// Kick off the history bootstrap
    pub fn load_history(&mut self) {
        let request_id = self.conversation.begin_history_load();
        self.send_api(ApiCommand::LoadHistory { request_id });
    }

    /// Submit the current input text as a chat message
    pub fn send_message(&mut self) {
        let text = std::mem::take(&mut self.input_text);
        match self.conversation.submit(&text) {
            Some((request_id, text)) => {
                self.send_api(ApiCommand::SendText { text, request_id });
            }
            None => {
                // Rejected: blank, send in flight, or recording. Restore the
                // field so typed text is not lost to a disabled submit.
                self.input_text = text;
            }
        }
    }

    /// Begin a voice recording, surfacing device errors as notices
    pub fn start_recording(&mut self) {
        if !self.conversation.can_record() {
            return;
        }

        #[cfg(feature = "audio-io")]
        match self.recorder.start() {
            Ok(()) => self.conversation.recording_started(),
            Err(e) => self.notice_error(e.user_message()),
        }

        #[cfg(not(feature = "audio-io"))]
        self.notice_error("Voice input is not available in this build.");
    }

    /// Stop the recording and dispatch the finalized audio as a voice message
    pub fn stop_recording(&mut self) {
        #[cfg(feature = "audio-io")]
        {
            if !self.conversation.is_recording() {
                return;
            }

            let finalized = self.recorder.stop();
            self.conversation.recording_stopped();

            match finalized {
                Ok(wav) => {
                    if let Some(request_id) = self.conversation.begin_voice_send() {
                        self.send_api(ApiCommand::SendVoice { wav, request_id });
                    }
                }
                Err(crate::NimbusError::EmptyInput) => {
                    debug!("Recording produced no audio, nothing to send");
                }
                Err(e) => self.notice_error(e.user_message()),
            }
        }
    }

    /// Seconds recorded so far, for the recording indicator
    #[cfg(feature = "audio-io")]
    pub fn recording_seconds(&mut self) -> f32 {
        self.recorder.poll();
        self.recorder.duration_seconds()
    }

    #[cfg(not(feature = "audio-io"))]
    pub fn recording_seconds(&mut self) -> f32 {
        0.0
    }

    /// Start playing the clip attached to the message at `index`
    pub fn play_clip(&mut self, index: usize) {
        let Some(url) = self
            .conversation
            .messages()
            .get(index)
            .and_then(|message| message.audio_url.clone())
        else {
            return;
        };

        self.playback.begin(index);

        match &self.playback_command_tx {
            Some(tx) => {
                let _ = tx.send(PlaybackCommand::Play { index, url });
            }
            None => {
                self.playback.clear(index);
                self.notice_error("Audio output is not available in this build.");
            }
        }
    }

    /// Stop the clip at `index` if it is the one playing
    pub fn stop_clip(&mut self, index: usize) {
        if self.playback.clear(index) {
            if let Some(tx) = &self.playback_command_tx {
                let _ = tx.send(PlaybackCommand::Stop { index });
            }
        }
    }

    /// Validate and dispatch the event advisor form
    pub fn submit_event_advice(&mut self) {
        match self.event_form.submit() {
            Ok(Some((request_id, request))) => {
                self.send_api(ApiCommand::EventAdvice {
                    request,
                    request_id,
                });
            }
            Ok(None) => {}
            Err(notice) => self.notice_error(notice),
        }
    }

    /// Validate and dispatch the travel advisor form
    pub fn submit_travel_advice(&mut self) {
        match self.travel_form.submit() {
            Ok(Some((request_id, request))) => {
                self.send_api(ApiCommand::TravelAdvice {
                    request,
                    request_id,
                });
            }
            Ok(None) => {}
            Err(notice) => self.notice_error(notice),
        }
    }

    /// Dispatch a geocoding search started by a location picker
    pub fn send_geocode(&mut self, request_id: Uuid, query: String) {
        self.send_api(ApiCommand::Geocode { query, request_id });
    }

    /// Process incoming events from the worker pipelines
    pub fn poll_events(&mut self) {
        #[cfg(feature = "audio-io")]
        if self.conversation.is_recording() {
            self.recorder.poll();
        }

        let api_events: Vec<ApiEvent> = match &self.api_event_rx {
            Some(rx) => rx.try_iter().collect(),
            None => Vec::new(),
        };
        for event in api_events {
            self.apply_api_event(event);
        }

        let playback_events: Vec<PlaybackEvent> = match &self.playback_event_rx {
            Some(rx) => rx.try_iter().collect(),
            None => Vec::new(),
        };
        for event in playback_events {
            self.apply_playback_event(event);
        }

        self.notices.retain(|notice| notice.age() < NOTICE_TTL);
    }

    fn apply_api_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::HistoryLoaded {
                messages,
                request_id,
            } => {
                self.conversation.history_loaded(request_id, messages);
            }
            ApiEvent::HistoryFailed { error, request_id } => {
                if self.conversation.history_failed(request_id) {
                    self.notice_error(error.user_message());
                }
            }
            ApiEvent::ReplyReceived { reply, request_id } => {
                self.conversation.reply_received(request_id, &reply);
            }
            ApiEvent::SendFailed { error, request_id } => {
                if self.conversation.send_failed(request_id) {
                    self.notice_error(error.user_message());
                }
            }
            ApiEvent::AdviceReceived { advice, request_id } => {
                let applied = self
                    .event_form
                    .advice_received(request_id, advice.clone())
                    || self.travel_form.advice_received(request_id, advice);
                if applied {
                    self.notice_info("Advice updated.");
                }
            }
            ApiEvent::AdviceFailed { error, request_id } => {
                let applied = self.event_form.advice_failed(request_id)
                    || self.travel_form.advice_failed(request_id);
                if applied {
                    self.notice_error(error.user_message());
                }
            }
            ApiEvent::GeocodeResolved {
                coordinates,
                request_id,
            } => {
                // Offer the result to every picker; the id matches one at most
                let _ = self
                    .event_form
                    .location
                    .search_resolved(request_id, coordinates)
                    || self
                        .travel_form
                        .from_location
                        .search_resolved(request_id, coordinates)
                    || self
                        .travel_form
                        .to_location
                        .search_resolved(request_id, coordinates);
            }
            ApiEvent::Shutdown => {
                debug!("API pipeline shut down");
            }
        }
    }

    fn apply_playback_event(&mut self, event: PlaybackEvent) {
        match event {
            PlaybackEvent::Started { index } => {
                debug!("Clip {} started", index);
            }
            PlaybackEvent::Finished { index } => {
                self.playback.clear(index);
            }
            PlaybackEvent::Failed { index, error } => {
                if self.playback.clear(index) {
                    self.notice_error(error.user_message());
                }
            }
        }
    }

    pub fn notice_info(&mut self, text: impl Into<String>) {
        self.push_notice(NoticeKind::Info, text.into());
    }

    pub fn notice_error(&mut self, text: impl Into<String>) {
        self.push_notice(NoticeKind::Error, text.into());
    }

    fn push_notice(&mut self, kind: NoticeKind, text: String) {
        if self.notices.len() >= MAX_NOTICES {
            self.notices.pop_front();
        }
        self.notices.push_back(Notice::new(kind, text));
    }

    /// Whether anything is in flight that warrants frequent repaints
    pub fn is_busy(&self) -> bool {
        !self.conversation.phase().is_idle()
            || self.conversation.is_recording()
            || self.playback.active().is_some()
            || self.event_form.is_loading()
            || self.travel_form.is_loading()
            || self.event_form.location.is_searching()
            || self.travel_form.from_location.is_searching()
            || self.travel_form.to_location.is_searching()
    }

    fn send_api(&mut self, command: ApiCommand) {
        match &self.api_command_tx {
            Some(tx) => {
                let _ = tx.send(command);
            }
            None => debug!("API pipeline not connected, dropping command"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_message_without_pipeline_still_transitions() {
        let mut state = AppState::new(AppConfig::default().with_user_id("test"));
        state.input_text = "Will it rain tomorrow?".to_string();
        state.send_message();

        assert!(state.input_text.is_empty());
        assert_eq!(state.conversation.len(), 1);
        assert!(state.conversation.phase().is_sending());
    }

    #[test]
    fn test_rejected_send_restores_input() {
        let mut state = AppState::new(AppConfig::default().with_user_id("test"));

        // Occupy the conversation with an in-flight send
        state.input_text = "first".to_string();
        state.send_message();

        state.input_text = "second".to_string();
        state.send_message();
        assert_eq!(state.input_text, "second");
        assert_eq!(state.conversation.len(), 1);
    }

    #[test]
    fn test_play_clip_without_audio_is_noop() {
        let mut state = AppState::new(AppConfig::default().with_user_id("test"));
        state.play_clip(0);
        assert_eq!(state.playback.active(), None);
    }

    #[test]
    fn test_notices_are_capped() {
        let mut state = AppState::new(AppConfig::default().with_user_id("test"));
        for i in 0..10 {
            state.notice_info(format!("notice {}", i));
        }
        assert_eq!(state.notices.len(), MAX_NOTICES);
        assert_eq!(state.notices.back().unwrap().text, "notice 9");
    }
}
