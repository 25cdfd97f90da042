mod app;
mod color;
mod ui;

use app::RustyConvertApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Convert – File Converter, Cleaner, Editor and Visualizer",
        options,
        Box::new(|_cc| Ok(Box::new(RustyConvertApp::default()))),
    )
}
