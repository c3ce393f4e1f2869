//! Main application struct and eframe integration

use crate::api::ApiPipeline;
#[cfg(feature = "audio-io")]
use crate::audio::PlaybackPipeline;
use crate::config::AppConfig;
use crate::ui::components::{EventAdvisorPanel, InputBar, MessageList, TravelAdvisorPanel};
use crate::ui::state::{AppState, NoticeKind};
use crate::ui::theme::Theme;
use egui::{CentralPanel, RichText, Stroke, TopBottomPanel};
use std::time::Duration;
use tracing::warn;

/// Top-level pages of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Chat,
    EventAdvisor,
    TravelAdvisor,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Chat, Page::EventAdvisor, Page::TravelAdvisor];

    pub fn label(&self) -> &'static str {
        match self {
            Page::Chat => "Chat",
            Page::EventAdvisor => "Event Advisor",
            Page::TravelAdvisor => "Travel Advisor",
        }
    }
}

/// Main Nimbus application
pub struct NimbusApp {
    state: AppState,
    theme: Theme,
    page: Page,
}

impl NimbusApp {
    /// Create the application and start the worker pipelines
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        let mut state = AppState::new(config);

        let api = ApiPipeline::new(state.config.clone());
        state.api_command_tx = Some(api.command_sender());
        state.api_event_rx = Some(api.event_receiver());
        if let Err(e) = api.start_worker() {
            warn!("API pipeline failed to start: {}", e);
            state.notice_error(e.user_message());
        }

        #[cfg(feature = "audio-io")]
        {
            let playback = PlaybackPipeline::new(state.config.clone());
            state.playback_command_tx = Some(playback.command_sender());
            state.playback_event_rx = Some(playback.event_receiver());
            if let Err(e) = playback.start_worker() {
                warn!("Playback pipeline failed to start: {}", e);
                state.notice_error(e.user_message());
            }
        }

        state.load_history();

        Self {
            state,
            theme,
            page: Page::Chat,
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(12.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Nimbus")
                            .size(20.0)
                            .strong()
                            .color(self.theme.primary),
                    );
                    ui.label(
                        RichText::new("Weather Assistant")
                            .size(14.0)
                            .color(self.theme.text_muted),
                    );

                    ui.add_space(self.theme.spacing_lg);

                    for page in Page::ALL {
                        let selected = self.page == page;
                        if ui.selectable_label(selected, page.label()).clicked() {
                            self.page = page;
                        }
                    }
                });
            });
    }

    fn show_notices(&self, ctx: &egui::Context) {
        if self.state.notices.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("notices"))
            .anchor(egui::Align2::RIGHT_TOP, [-16.0, 56.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for notice in &self.state.notices {
                    let accent = match notice.kind {
                        NoticeKind::Info => self.theme.success,
                        NoticeKind::Error => self.theme.error,
                    };

                    egui::Frame::none()
                        .fill(self.theme.bg_tertiary)
                        .rounding(self.theme.card_rounding)
                        .inner_margin(10.0)
                        .stroke(Stroke::new(1.0, accent))
                        .show(ui, |ui| {
                            ui.set_max_width(320.0);
                            ui.label(
                                RichText::new(&notice.text).color(self.theme.text_primary),
                            );
                        });
                    ui.add_space(4.0);
                }
            });
    }

    fn show_chat_page(&mut self, ctx: &egui::Context) {
        TopBottomPanel::bottom("input_area")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                InputBar::new(&mut self.state, &self.theme).show(ui);
            });

        CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.bg_primary))
            .show(ctx, |ui| {
                MessageList::new(&mut self.state, &self.theme).show(ui);
            });
    }

    fn show_advisor_page(&mut self, ctx: &egui::Context) {
        let page = self.page;
        CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| match page {
                        Page::EventAdvisor => {
                            EventAdvisorPanel::new(&mut self.state, &self.theme).show(ui);
                        }
                        Page::TravelAdvisor => {
                            TravelAdvisorPanel::new(&mut self.state, &self.theme).show(ui);
                        }
                        Page::Chat => {}
                    });
            });
    }
}

impl eframe::App for NimbusApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Drain pipeline events before rendering
        self.state.poll_events();

        self.show_header(ctx);
        self.show_notices(ctx);

        match self.page {
            Page::Chat => self.show_chat_page(ctx),
            Page::EventAdvisor | Page::TravelAdvisor => self.show_advisor_page(ctx),
        }

        // Keep polling while work is in flight; otherwise a lazy tick is
        // enough to pick up stragglers
        if self.state.is_busy() || !self.state.notices.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(100));
        } else {
            ctx.request_repaint_after(Duration::from_millis(500));
        }
    }
}
