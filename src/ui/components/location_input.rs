//! Location picker fields
//!
//! Search box plus direct latitude/longitude entry over one
//! [`LocationState`]. Returns the geocoding request to dispatch when the
//! user starts a search.

use crate::geo::LocationState;
use crate::ui::theme::Theme;
use egui::{Key, RichText};
use uuid::Uuid;

pub struct LocationInput<'a> {
    location: &'a mut LocationState,
    label: &'a str,
    theme: &'a Theme,
}

impl<'a> LocationInput<'a> {
    pub fn new(location: &'a mut LocationState, label: &'a str, theme: &'a Theme) -> Self {
        Self {
            location,
            label,
            theme,
        }
    }

    /// Render the picker; `Some` means a search was started and its request
    /// should be sent to the backend pipeline.
    pub fn show(self, ui: &mut egui::Ui) -> Option<(Uuid, String)> {
        let mut search_request = None;

        ui.label(
            RichText::new(self.label)
                .size(13.0)
                .strong()
                .color(self.theme.text_secondary),
        );

        ui.horizontal(|ui| {
            let search_field = egui::TextEdit::singleline(&mut self.location.search_query)
                .hint_text("Search for a location...")
                .desired_width(ui.available_width() - 44.0);
            let response = ui.add(search_field);

            let enter_pressed = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
            let can_search = !self.location.search_query.trim().is_empty()
                && !self.location.is_searching();

            let button = ui.add_enabled(can_search, egui::Button::new("🔍"));
            if (button.clicked() || enter_pressed) && can_search {
                search_request = self.location.begin_search();
            }
        });

        if self.location.is_searching() {
            ui.horizontal(|ui| {
                ui.add(egui::Spinner::new().size(12.0));
                ui.label(
                    RichText::new("Searching...")
                        .size(11.0)
                        .color(self.theme.text_muted),
                );
            });
        }

        ui.horizontal(|ui| {
            ui.label(
                RichText::new("Latitude")
                    .size(12.0)
                    .color(self.theme.text_muted),
            );
            let latitude = ui.add(
                egui::TextEdit::singleline(&mut self.location.latitude_text)
                    .desired_width(90.0),
            );
            if latitude.lost_focus() {
                self.location.apply_latitude_text();
            }

            ui.label(
                RichText::new("Longitude")
                    .size(12.0)
                    .color(self.theme.text_muted),
            );
            let longitude = ui.add(
                egui::TextEdit::singleline(&mut self.location.longitude_text)
                    .desired_width(90.0),
            );
            if longitude.lost_focus() {
                self.location.apply_longitude_text();
            }
        });

        search_request
    }
}
