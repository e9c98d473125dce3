#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use pulse_board::app::PulseApp;
use pulse_board::config::SettingsStore;

fn main() -> eframe::Result<()> {
    pulse_board::logging::init_tracing();

    let settings_store = SettingsStore::discover();
    let settings = settings_store.load_or_default();
    tracing::info!(config = %settings_store.path().display(), "starting Pulse Board");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 760.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("Pulse Board"),
        ..Default::default()
    };

    eframe::run_native(
        "Pulse Board",
        options,
        Box::new(move |cc| Ok(Box::new(PulseApp::new(cc, settings_store, settings)))),
    )
}
