//! Message list component
//!
//! Displays the conversation as chat bubbles, with Listen/Stop controls on
//! bot messages that carry an audio clip.

use crate::chat::{ChatMessage, Role};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{Align, Color32, RichText, Vec2};

enum ClipAction {
    Play(usize),
    Stop(usize),
}

pub struct MessageList<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let messages: Vec<ChatMessage> = self.state.conversation.messages().to_vec();
        let thinking = self.state.conversation.phase().is_sending();
        let loading_history = self.state.conversation.phase().is_loading_history();
        let playing = self.state.playback.active();
        let mut action: Option<ClipAction> = None;

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.add_space(self.theme.spacing);

                if loading_history {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.spinner();
                        ui.label(
                            RichText::new("Loading chat history...")
                                .color(self.theme.text_muted),
                        );
                    });
                } else if messages.is_empty() && !thinking {
                    self.show_empty_state(ui);
                } else {
                    for (index, message) in messages.iter().enumerate() {
                        self.show_message(ui, index, message, playing, &mut action);
                        ui.add_space(self.theme.spacing_sm);
                    }

                    if thinking {
                        self.show_thinking_indicator(ui);
                    }
                }

                ui.add_space(self.theme.spacing);
            });

        match action {
            Some(ClipAction::Play(index)) => self.state.play_clip(index),
            Some(ClipAction::Stop(index)) => self.state.stop_clip(index),
            None => {}
        }
    }

    fn show_empty_state(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(100.0);

            ui.label(
                RichText::new("Conversational Weather Agent")
                    .size(24.0)
                    .color(self.theme.text_primary),
            );

            ui.add_space(self.theme.spacing);

            ui.label(
                RichText::new(
                    "Start a conversation! Ask me about weather conditions, forecasts, \
                     or any weather-related questions.",
                )
                .size(14.0)
                .color(self.theme.text_muted),
            );

            ui.add_space(self.theme.spacing_lg);

            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing = Vec2::splat(self.theme.spacing);

                self.show_hint_card(ui, "Type", "Ask about the weather below");
                self.show_hint_card(ui, "Record", "Send a voice message with the mic");
                self.show_hint_card(ui, "Listen", "Play spoken answers on bot replies");
            });
        });
    }

    fn show_hint_card(&self, ui: &mut egui::Ui, title: &str, description: &str) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.set_width(170.0);
                ui.vertical(|ui| {
                    ui.label(
                        RichText::new(title)
                            .size(14.0)
                            .strong()
                            .color(self.theme.primary),
                    );
                    ui.label(
                        RichText::new(description)
                            .size(12.0)
                            .color(self.theme.text_muted),
                    );
                });
            });
    }

    fn show_message(
        &self,
        ui: &mut egui::Ui,
        index: usize,
        message: &ChatMessage,
        playing: Option<usize>,
        action: &mut Option<ClipAction>,
    ) {
        let is_user = matches!(message.role, Role::User);
        let bubble_color = if is_user {
            self.theme.user_bubble
        } else {
            self.theme.bot_bubble
        };
        let text_color = if is_user {
            Color32::WHITE
        } else {
            self.theme.text_primary
        };
        let align = if is_user { Align::RIGHT } else { Align::LEFT };

        ui.with_layout(egui::Layout::top_down(align), |ui| {
            ui.label(
                RichText::new(if is_user { "You" } else { "Nimbus" })
                    .size(12.0)
                    .color(self.theme.text_muted),
            );

            ui.add_space(2.0);

            let max_width = ui.available_width() * 0.75;

            egui::Frame::none()
                .fill(bubble_color)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);
                    ui.label(RichText::new(&message.content).color(text_color));

                    if !is_user && message.has_audio() {
                        ui.add_space(4.0);
                        let is_playing = playing == Some(index);
                        let label = if is_playing { "⏹ Stop" } else { "🔊 Listen" };

                        let button = ui.add(
                            egui::Button::new(
                                RichText::new(label).size(12.0).color(text_color),
                            )
                            .fill(self.theme.bg_primary.gamma_multiply(0.6))
                            .rounding(self.theme.button_rounding),
                        );

                        if button.clicked() {
                            *action = Some(if is_playing {
                                ClipAction::Stop(index)
                            } else {
                                ClipAction::Play(index)
                            });
                        }
                    }
                });

            let time = message.timestamp.format("%H:%M").to_string();
            ui.label(RichText::new(time).size(10.0).color(self.theme.text_muted));
        });
    }

    fn show_thinking_indicator(&self, ui: &mut egui::Ui) {
        ui.with_layout(egui::Layout::top_down(Align::LEFT), |ui| {
            ui.label(
                RichText::new("Nimbus")
                    .size(12.0)
                    .color(self.theme.text_muted),
            );

            ui.add_space(2.0);

            egui::Frame::none()
                .fill(self.theme.bot_bubble)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.add(egui::Spinner::new().size(14.0));
                        ui.label(
                            RichText::new("Thinking...").color(self.theme.text_muted),
                        );
                    });
                });
        });

        ui.ctx().request_repaint();
    }
}
