//! Desktop user interface built with egui/eframe

mod app;
mod components;
mod state;
mod theme;

pub use app::{NimbusApp, Page};
pub use state::{AppState, Notice, NoticeKind};
pub use theme::Theme;

use crate::config::AppConfig;

/// Run the Nimbus application
pub fn run() -> eframe::Result<()> {
    let config = AppConfig::load();
    if let Err(e) = config.validate() {
        tracing::warn!("Configuration problem: {}", e);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 720.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Nimbus Weather Assistant"),
        ..Default::default()
    };

    eframe::run_native(
        "Nimbus",
        options,
        Box::new(move |cc| Ok(Box::new(NimbusApp::new(cc, config)))),
    )
}
