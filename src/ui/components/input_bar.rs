//! Input bar component
//!
//! Text input, voice record toggle, and send button, with the chat page's
//! disable rules: nothing sends while a send is in flight, text entry is
//! locked while recording, and the mic is locked while sending.

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{Key, RichText, Vec2};

pub struct InputBar<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> InputBar<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let sending = self.state.conversation.phase().is_sending();
        let loading_history = self.state.conversation.phase().is_loading_history();
        let recording = self.state.conversation.is_recording();

        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    // Record toggle
                    let (icon, icon_color, tooltip) = if recording {
                        ("⏹", self.theme.recording, "Stop and send the recording")
                    } else {
                        ("🎤", self.theme.text_secondary, "Record a voice message")
                    };

                    let mic_button =
                        egui::Button::new(RichText::new(icon).size(20.0).color(icon_color))
                            .min_size(Vec2::splat(44.0))
                            .rounding(self.theme.button_rounding);
                    let mic_button = if recording {
                        mic_button.fill(self.theme.recording.gamma_multiply(0.2))
                    } else {
                        mic_button
                    };

                    let mic = ui.add_enabled(!sending && !loading_history, mic_button);
                    if mic.clicked() {
                        if recording {
                            self.state.stop_recording();
                        } else {
                            self.state.start_recording();
                        }
                    }
                    mic.on_hover_text(tooltip);

                    ui.add_space(self.theme.spacing_sm);

                    // Text input
                    let input_width = ui.available_width() - 60.0;
                    let text_edit = egui::TextEdit::singleline(&mut self.state.input_text)
                        .hint_text("Ask me about the weather...")
                        .desired_width(input_width)
                        .margin(egui::Margin::symmetric(12.0, 8.0));

                    let response =
                        ui.add_enabled(!sending && !recording && !loading_history, text_edit);

                    let enter_pressed =
                        response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
                    if enter_pressed {
                        self.state.send_message();
                        response.request_focus();
                    }

                    ui.add_space(self.theme.spacing_sm);

                    // Send button
                    let can_send = !self.state.input_text.trim().is_empty()
                        && !sending
                        && !recording
                        && !loading_history;

                    let fill = if can_send {
                        self.theme.primary
                    } else {
                        self.theme.bg_tertiary
                    };
                    let send_icon = if sending { "…" } else { "➤" };

                    let send = ui.add_enabled(
                        can_send,
                        egui::Button::new(
                            RichText::new(send_icon).size(18.0).color(egui::Color32::WHITE),
                        )
                        .min_size(Vec2::splat(44.0))
                        .rounding(self.theme.button_rounding)
                        .fill(fill),
                    );
                    if send.clicked() {
                        self.state.send_message();
                    }
                    send.on_hover_text("Send message (Enter)");
                });

                // Recording status line
                if recording {
                    ui.add_space(self.theme.spacing_sm);
                    let seconds = self.state.recording_seconds();
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("●").color(self.theme.recording));
                        ui.label(
                            RichText::new(format!(
                                "Recording {:.0}s... click the microphone to stop and send",
                                seconds
                            ))
                            .size(12.0)
                            .color(self.theme.text_muted),
                        );
                    });
                    ui.ctx().request_repaint();
                }
            });
    }
}
