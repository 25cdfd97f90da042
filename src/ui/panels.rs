use std::path::PathBuf;

use anyhow::Context;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::app::AppState;
use crate::ui::grid::{self, CellEditor};
use crate::ui::plot;
use rusty_convert::data::chart::ChartKind;
use rusty_convert::data::export::ExportFormat;
use rusty_convert::data::loader::UploadedFile;
use rusty_convert::state::FileSession;

/// Rows shown in the head previews.
const PREVIEW_ROWS: usize = 5;

const SUCCESS: Color32 = Color32::from_rgb(70, 170, 95);

fn success(ui: &mut Ui, text: impl Into<String>) {
    ui.label(RichText::new(text).color(SUCCESS));
}

fn failure(ui: &mut Ui, text: impl Into<String>) {
    ui.label(RichText::new(text).color(Color32::RED));
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Upload…").clicked() {
                open_files_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let n_files = state.session.files.len();
        let n_failed = state.session.failures().len();
        ui.label(format!("{n_files} files uploaded, {n_failed} unreadable"));

        ui.separator();

        if let Some(msg) = &state.notice {
            success(ui, msg.as_str());
        }
        if let Some(msg) = &state.status_message {
            failure(ui, msg.as_str());
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – uploaded files
// ---------------------------------------------------------------------------

/// Render the list of uploaded files.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Files");
    ui.separator();

    if state.session.files.is_empty() {
        ui.label("No files uploaded.");
        return;
    }

    let mut clicked = None;
    for (idx, file) in state.session.files.iter().enumerate() {
        let mut text = RichText::new(file.name());
        if file.source.is_err() {
            text = text.color(Color32::RED);
        }
        if ui
            .selectable_label(state.selected == Some(idx), text)
            .clicked()
        {
            clicked = Some(idx);
        }
    }
    if let Some(idx) = clicked {
        state.select(idx);
    }

    ui.separator();
    if let Some(idx) = state.selected {
        if ui.button("Remove file").clicked() {
            state.session.remove(idx);
            state.editor.cancel();
            let n = state.session.files.len();
            state.selected = if n == 0 { None } else { Some(idx.min(n - 1)) };
        }
    }
}

// ---------------------------------------------------------------------------
// Central panel – one file
// ---------------------------------------------------------------------------

/// Render the editor, cleaning toggles, column selection, chart and export
/// controls of the selected file.
pub fn file_panel(ui: &mut Ui, state: &mut AppState) {
    let AppState {
        session,
        selected,
        editor,
        status_message,
        notice,
    } = state;

    let Some(file) = selected.and_then(|idx| session.files.get_mut(idx)) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Upload CSV or Excel files to start  (File → Upload…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(format!("{} - Preview and Edit", file.name()));

            if let Err(e) = &file.source {
                failure(ui, format!("Could not read {}: {e}", file.name()));
                return;
            }
            if let Some(Err(e)) = &file.output {
                failure(ui, format!("Processing failed: {e}"));
            }

            editor_section(ui, file, editor);
            ui.separator();
            cleaning_section(ui, file);
            ui.separator();
            columns_section(ui, file);
            ui.separator();
            chart_section(ui, file);
            ui.separator();
            export_section(ui, file, status_message, notice);
        });
}

fn editor_section(ui: &mut Ui, file: &mut FileSession, editor: &mut CellEditor) {
    let Some(edited) = file.edited() else {
        return;
    };
    let id = format!("{}_editor", file.name());
    let ops = grid::editable_table(ui, &id, edited, editor);
    for op in ops {
        file.push_edit(op);
    }

    let n_edits = file.options.edits.len();
    if n_edits > 0 {
        ui.horizontal(|ui: &mut Ui| {
            ui.label(format!("{n_edits} edits"));
            if ui.small_button("Reset edits").clicked() {
                editor.cancel();
                file.update(|opts| opts.edits.clear());
            }
        });
    }
}

fn cleaning_section(ui: &mut Ui, file: &mut FileSession) {
    let mut dedupe = file.options.deduplicate;
    if ui
        .checkbox(&mut dedupe, format!("Remove Duplicates - {}", file.name()))
        .changed()
    {
        file.update(|opts| opts.deduplicate = dedupe);
    }

    let mut fill = file.options.fill_missing;
    if ui
        .checkbox(&mut fill, format!("Fill Missing Values - {}", file.name()))
        .changed()
    {
        file.update(|opts| opts.fill_missing = fill);
    }

    let Some(Ok(processed)) = &file.output else {
        return;
    };
    let report = &processed.report;
    if let Some(deduplicated) = &processed.deduplicated {
        success(
            ui,
            format!("Duplicates Removed ({} rows)", report.duplicates_removed),
        );
        grid::preview_table(
            ui,
            &format!("{}_deduplicated", file.name()),
            deduplicated,
            PREVIEW_ROWS,
        );
    }
    if let Some(filled) = &processed.filled {
        success(ui, "Missing values filled with column means");
        for column in &report.columns_skipped {
            ui.weak(format!("'{column}' has no values to average; left missing"));
        }
        grid::preview_table(
            ui,
            &format!("{}_filled", file.name()),
            filled,
            PREVIEW_ROWS,
        );
    }
}

fn columns_section(ui: &mut Ui, file: &mut FileSession) {
    let Some(edited) = file.edited() else {
        return;
    };
    let all = edited.column_names();
    let mut selected = file.options.selected_columns.clone();
    let mut changed = false;

    ui.strong(format!("Select Columns - {}", file.name()));
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for name in &all {
            let mut on = selected.contains(name);
            if ui.checkbox(&mut on, name.as_str()).changed() {
                if on {
                    selected.push(name.clone());
                } else {
                    selected.retain(|n| n != name);
                }
                changed = true;
            }
        }
    });
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            selected = all.clone();
            changed = true;
        }
        if ui.small_button("None").clicked() {
            selected.clear();
            changed = true;
        }
    });

    if changed {
        file.update(|opts| opts.selected_columns = selected);
    }

    if file.options.selected_columns.is_empty() {
        return;
    }
    ui.label(format!(
        "Columns: {}",
        file.options.selected_columns.join(", ")
    ));
    if let Some(table) = file.table() {
        grid::preview_table(
            ui,
            &format!("{}_projected", file.name()),
            table,
            PREVIEW_ROWS,
        );
    }
}

fn chart_section(ui: &mut Ui, file: &mut FileSession) {
    let has_numeric = file
        .table()
        .is_some_and(|t| !t.numeric_columns().is_empty());

    let mut show = file.options.chart.is_some();
    ui.add_enabled_ui(has_numeric, |ui: &mut Ui| {
        if ui
            .checkbox(&mut show, format!("Show Chart - {}", file.name()))
            .changed()
        {
            file.toggle_chart(show);
        }
    });
    if !has_numeric {
        ui.weak("No numeric column to chart.");
    }

    let (Some(spec), Some(table)) = (file.options.chart.clone(), file.table()) else {
        return;
    };
    let columns = table.column_names();
    let numeric = table.numeric_columns();
    let name = file.name().to_string();

    ui.strong("Chart Options");
    let mut next = spec.clone();
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Chart Type");
        egui::ComboBox::from_id_salt(format!("{name}_chart_kind"))
            .selected_text(next.kind.title())
            .show_ui(ui, |ui: &mut Ui| {
                for kind in ChartKind::ALL {
                    ui.selectable_value(&mut next.kind, kind, kind.title());
                }
            });

        ui.label("X-axis");
        egui::ComboBox::from_id_salt(format!("{name}_chart_x"))
            .selected_text(next.x_column.clone())
            .show_ui(ui, |ui: &mut Ui| {
                for col in &columns {
                    ui.selectable_value(&mut next.x_column, col.clone(), col.as_str());
                }
            });

        ui.label("Y-axis");
        egui::ComboBox::from_id_salt(format!("{name}_chart_y"))
            .selected_text(next.y_column.clone())
            .show_ui(ui, |ui: &mut Ui| {
                for col in &numeric {
                    ui.selectable_value(&mut next.y_column, col.clone(), col.as_str());
                }
            });
    });
    if next != spec {
        file.options.chart = Some(next);
    }

    match file.chart() {
        Some(Ok(chart)) => plot::chart_plot(ui, &format!("{name}_chart"), &chart),
        Some(Err(e)) => failure(ui, format!("Cannot draw chart: {e}")),
        None => {}
    }
}

fn export_section(
    ui: &mut Ui,
    file: &mut FileSession,
    status_message: &mut Option<String>,
    notice: &mut Option<String>,
) {
    let mut format = file.options.export_format;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("Convert {} to:", file.name()));
        ui.radio_value(&mut format, ExportFormat::Csv, ExportFormat::Csv.label());
        ui.radio_value(&mut format, ExportFormat::Excel, ExportFormat::Excel.label());
    });
    file.options.export_format = format;

    let label = format!("Download {} as {}", file.name(), format.label());
    if ui.button(label).clicked() {
        match save_export(file) {
            Ok(Some((path, mime))) => {
                *status_message = None;
                *notice = Some(format!(
                    "Processing complete! Saved {} ({mime})",
                    path.display()
                ));
            }
            Ok(None) => {}
            Err(e) => {
                log::error!("Export failed: {e:#}");
                *status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_files_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Upload CSV or Excel files")
        .add_filter("Supported files", &["csv", "xlsx"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx"])
        .pick_files();

    let Some(paths) = files else {
        return;
    };
    for path in paths {
        match UploadedFile::from_path(&path) {
            Ok(upload) => {
                let idx = state.session.add_upload(upload);
                state.select(idx);
            }
            Err(e) => {
                log::error!("Failed to upload file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

/// Encode the file and write it where the user chooses.  `Ok(None)` when
/// the dialog was cancelled.
fn save_export(file: &FileSession) -> anyhow::Result<Option<(PathBuf, &'static str)>> {
    let artifact = file.export().context("no processed table to export")??;
    let format = file.options.export_format;

    let target = rfd::FileDialog::new()
        .set_title("Save converted file")
        .set_file_name(artifact.file_name.as_str())
        .add_filter(format.label(), &[format.extension()])
        .save_file();

    let Some(path) = target else {
        return Ok(None);
    };
    std::fs::write(&path, &artifact.bytes)
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!(
        "Saved '{}' as {} ({})",
        file.name(),
        path.display(),
        artifact.mime_type
    );
    Ok(Some((path, artifact.mime_type)))
}
