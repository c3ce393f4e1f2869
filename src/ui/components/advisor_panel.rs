//! Event and travel advisor pages
//!
//! Form on the left, returned advice on the right. Submit is disabled while
//! a request is in flight; validation problems surface as notices.

use crate::api::types::{EventType, VehicleType};
use crate::ui::components::LocationInput;
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{RichText, Vec2};

pub struct EventAdvisorPanel<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> EventAdvisorPanel<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        ui.add_space(self.theme.spacing_sm);
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new("Event Weather Advisor")
                    .size(22.0)
                    .strong()
                    .color(self.theme.text_primary),
            );
            ui.label(
                RichText::new("Plan your event with weather-aware recommendations.")
                    .size(13.0)
                    .color(self.theme.text_muted),
            );
        });
        ui.add_space(self.theme.spacing);

        ui.columns(2, |columns| {
            self.show_form(&mut columns[0]);
            self.show_advice(&mut columns[1]);
        });
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.label(
                    RichText::new("Event Details")
                        .size(16.0)
                        .strong()
                        .color(self.theme.text_primary),
                );
                ui.add_space(self.theme.spacing_sm);

                let search = LocationInput::new(
                    &mut self.state.event_form.location,
                    "Event Location",
                    self.theme,
                )
                .show(ui);
                if let Some((request_id, query)) = search {
                    self.state.send_geocode(request_id, query);
                }

                ui.add_space(self.theme.spacing_sm);
                show_time_fields(
                    ui,
                    self.theme,
                    &mut self.state.event_form.from_time,
                    &mut self.state.event_form.to_time,
                );

                ui.add_space(self.theme.spacing_sm);
                ui.label(
                    RichText::new("Event Type")
                        .size(13.0)
                        .strong()
                        .color(self.theme.text_secondary),
                );
                egui::ComboBox::from_id_salt("event_type")
                    .selected_text(self.state.event_form.event_type.label())
                    .show_ui(ui, |ui| {
                        for event_type in EventType::ALL {
                            ui.selectable_value(
                                &mut self.state.event_form.event_type,
                                event_type,
                                event_type.label(),
                            );
                        }
                    });

                ui.add_space(self.theme.spacing_sm);
                ui.label(
                    RichText::new("Event Details")
                        .size(13.0)
                        .strong()
                        .color(self.theme.text_secondary),
                );
                ui.add(
                    egui::TextEdit::multiline(&mut self.state.event_form.details)
                        .hint_text("Describe your event (agenda, audience, constraints...)")
                        .desired_rows(4)
                        .desired_width(f32::INFINITY),
                );

                ui.add_space(self.theme.spacing);

                let loading = self.state.event_form.is_loading();
                let label = if loading {
                    "Getting Weather Advice..."
                } else {
                    "Get Event Advice"
                };
                let button = ui.add_enabled(
                    !loading,
                    egui::Button::new(RichText::new(label).color(egui::Color32::WHITE))
                        .min_size(Vec2::new(ui.available_width(), 36.0))
                        .rounding(self.theme.button_rounding)
                        .fill(self.theme.primary),
                );
                if button.clicked() {
                    self.state.submit_event_advice();
                }
            });
    }

    fn show_advice(&self, ui: &mut egui::Ui) {
        show_advice_card(
            ui,
            self.theme,
            self.state.event_form.advice.as_deref(),
            "Fill out the event details and click \"Get Event Advice\" to receive \
             personalized weather recommendations for your event.",
        );
    }
}

pub struct TravelAdvisorPanel<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> TravelAdvisorPanel<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        ui.add_space(self.theme.spacing_sm);
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new("Travel Weather Advisor")
                    .size(22.0)
                    .strong()
                    .color(self.theme.text_primary),
            );
            ui.label(
                RichText::new("Check the weather along your route before you go.")
                    .size(13.0)
                    .color(self.theme.text_muted),
            );
        });
        ui.add_space(self.theme.spacing);

        ui.columns(2, |columns| {
            self.show_form(&mut columns[0]);
            self.show_advice(&mut columns[1]);
        });
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.label(
                    RichText::new("Trip Details")
                        .size(16.0)
                        .strong()
                        .color(self.theme.text_primary),
                );
                ui.add_space(self.theme.spacing_sm);

                let search = LocationInput::new(
                    &mut self.state.travel_form.from_location,
                    "From Location",
                    self.theme,
                )
                .show(ui);
                if let Some((request_id, query)) = search {
                    self.state.send_geocode(request_id, query);
                }

                ui.add_space(self.theme.spacing_sm);

                let search = LocationInput::new(
                    &mut self.state.travel_form.to_location,
                    "To Location",
                    self.theme,
                )
                .show(ui);
                if let Some((request_id, query)) = search {
                    self.state.send_geocode(request_id, query);
                }

                ui.add_space(self.theme.spacing_sm);
                show_time_fields(
                    ui,
                    self.theme,
                    &mut self.state.travel_form.from_time,
                    &mut self.state.travel_form.to_time,
                );

                ui.add_space(self.theme.spacing_sm);
                ui.label(
                    RichText::new("Vehicle Type")
                        .size(13.0)
                        .strong()
                        .color(self.theme.text_secondary),
                );
                egui::ComboBox::from_id_salt("vehicle_type")
                    .selected_text(self.state.travel_form.vehicle_type.label())
                    .show_ui(ui, |ui| {
                        for vehicle in VehicleType::ALL {
                            ui.selectable_value(
                                &mut self.state.travel_form.vehicle_type,
                                vehicle,
                                vehicle.label(),
                            );
                        }
                    });

                ui.add_space(self.theme.spacing_sm);
                ui.label(
                    RichText::new("Travel Details")
                        .size(13.0)
                        .strong()
                        .color(self.theme.text_secondary),
                );
                ui.add(
                    egui::TextEdit::multiline(&mut self.state.travel_form.details)
                        .hint_text("Describe your trip (purpose, luggage, flexibility...)")
                        .desired_rows(4)
                        .desired_width(f32::INFINITY),
                );

                ui.add_space(self.theme.spacing);

                let loading = self.state.travel_form.is_loading();
                let label = if loading {
                    "Getting Weather Advice..."
                } else {
                    "Get Travel Advice"
                };
                let button = ui.add_enabled(
                    !loading,
                    egui::Button::new(RichText::new(label).color(egui::Color32::WHITE))
                        .min_size(Vec2::new(ui.available_width(), 36.0))
                        .rounding(self.theme.button_rounding)
                        .fill(self.theme.primary),
                );
                if button.clicked() {
                    self.state.submit_travel_advice();
                }
            });
    }

    fn show_advice(&self, ui: &mut egui::Ui) {
        show_advice_card(
            ui,
            self.theme,
            self.state.travel_form.advice.as_deref(),
            "Fill out the trip details and click \"Get Travel Advice\" to receive \
             personalized weather recommendations for your journey.",
        );
    }
}

fn show_time_fields(ui: &mut egui::Ui, theme: &Theme, from_time: &mut String, to_time: &mut String) {
    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            ui.label(
                RichText::new("Start Time")
                    .size(13.0)
                    .strong()
                    .color(theme.text_secondary),
            );
            ui.add(
                egui::TextEdit::singleline(from_time)
                    .hint_text("2026-08-06T14:00")
                    .desired_width(150.0),
            );
        });
        ui.vertical(|ui| {
            ui.label(
                RichText::new("End Time")
                    .size(13.0)
                    .strong()
                    .color(theme.text_secondary),
            );
            ui.add(
                egui::TextEdit::singleline(to_time)
                    .hint_text("2026-08-06T18:00")
                    .desired_width(150.0),
            );
        });
    });
}

fn show_advice_card(ui: &mut egui::Ui, theme: &Theme, advice: Option<&str>, empty_text: &str) {
    egui::Frame::none()
        .fill(theme.bg_secondary)
        .rounding(theme.card_rounding)
        .inner_margin(theme.spacing)
        .show(ui, |ui| {
            ui.label(
                RichText::new("Weather Advice")
                    .size(16.0)
                    .strong()
                    .color(theme.text_primary),
            );
            ui.add_space(theme.spacing_sm);

            match advice {
                Some(advice) => {
                    egui::ScrollArea::vertical()
                        .auto_shrink([false, true])
                        .max_height(ui.available_height())
                        .show(ui, |ui| {
                            ui.label(RichText::new(advice).color(theme.text_secondary));
                        });
                }
                None => {
                    ui.add_space(40.0);
                    ui.vertical_centered(|ui| {
                        ui.label(RichText::new(empty_text).size(13.0).color(theme.text_muted));
                    });
                    ui.add_space(40.0);
                }
            }
        });
}
