use eframe::egui;

use crate::ui::grid::CellEditor;
use crate::ui::panels;
use rusty_convert::state::Session;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// UI-side state around the processing session.
#[derive(Default)]
pub struct AppState {
    pub session: Session,

    /// Index of the file shown in the central panel.
    pub selected: Option<usize>,

    /// Cell being edited in the grid of the selected file.
    pub editor: CellEditor,

    /// Error message shown in the top bar.
    pub status_message: Option<String>,

    /// Confirmation of the last download.
    pub notice: Option<String>,
}

impl AppState {
    pub fn select(&mut self, idx: usize) {
        if self.selected != Some(idx) {
            self.editor.cancel();
        }
        self.selected = Some(idx);
    }
}

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RustyConvertApp {
    pub state: AppState,
}

impl eframe::App for RustyConvertApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: uploaded files ----
        egui::SidePanel::left("file_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: editor, cleaning, chart, export ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::file_panel(ui, &mut self.state);
        });
    }
}
