use eframe::egui::{self, Align, Layout, RichText, Sense, Ui};
use egui_extras::{Column, TableBuilder};

use rusty_convert::data::edit::EditOp;
use rusty_convert::data::model::{CellValue, Table};

const ROW_HEIGHT: f32 = 20.0;

/// The cell currently being edited in the grid.
#[derive(Debug, Default)]
pub struct CellEditor {
    active: Option<ActiveCell>,
}

#[derive(Debug)]
struct ActiveCell {
    row: usize,
    col: usize,
    buffer: String,
    focused: bool,
}

impl CellEditor {
    pub fn cancel(&mut self) {
        self.active = None;
    }
}

fn cell_text(cell: &CellValue) -> RichText {
    match cell {
        CellValue::Null => RichText::new("None").weak().italics(),
        other => RichText::new(other.display_text()),
    }
}

// ---------------------------------------------------------------------------
// Editable grid
// ---------------------------------------------------------------------------

/// Draw `table` as an editable grid.  Double-click a cell to edit it.
/// Returns the edits made this frame.
pub fn editable_table(
    ui: &mut Ui,
    id_salt: &str,
    table: &Table,
    editor: &mut CellEditor,
) -> Vec<EditOp> {
    let mut ops = Vec::new();
    let n_rows = table.n_rows();

    ui.push_id(id_salt, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .column(Column::auto())
            .columns(
                Column::auto().at_least(80.0).clip(true),
                table.n_cols(),
            )
            .max_scroll_height(300.0)
            .header(ROW_HEIGHT, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong("#");
                });
                for column in table.columns() {
                    header.col(|ui: &mut Ui| {
                        ui.strong(column.name.as_str());
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, n_rows, |mut row| {
                    let r = row.index();
                    row.col(|ui: &mut Ui| {
                        if ui.small_button("✕").on_hover_text("Remove row").clicked() {
                            ops.push(EditOp::RemoveRow { row: r });
                            editor.cancel();
                        }
                        ui.label(r.to_string());
                    });
                    for (c, column) in table.columns().iter().enumerate() {
                        row.col(|ui: &mut Ui| {
                            let cell = &column.cells[r];
                            if let Some(op) = edit_cell(ui, editor, r, c, &column.name, cell) {
                                ops.push(op);
                            }
                        });
                    }
                });
            });
    });

    if ui.button("Add row").clicked() {
        ops.push(EditOp::InsertRow { at: n_rows });
    }
    ops
}

fn edit_cell(
    ui: &mut Ui,
    editor: &mut CellEditor,
    row: usize,
    col: usize,
    column: &str,
    cell: &CellValue,
) -> Option<EditOp> {
    let Some(active) = editor
        .active
        .as_mut()
        .filter(|a| a.row == row && a.col == col)
    else {
        let response = ui.add(egui::Label::new(cell_text(cell)).sense(Sense::click()));
        if response.double_clicked() {
            editor.active = Some(ActiveCell {
                row,
                col,
                buffer: cell.display_text(),
                focused: false,
            });
        }
        return None;
    };

    let response = ui.text_edit_singleline(&mut active.buffer);
    if !active.focused {
        response.request_focus();
        active.focused = true;
    }
    if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
        editor.cancel();
        return None;
    }
    if !response.lost_focus() {
        return None;
    }

    let input = std::mem::take(&mut active.buffer);
    editor.cancel();
    if input == cell.display_text() {
        return None;
    }
    Some(EditOp::SetCell {
        row,
        column: column.to_string(),
        input,
    })
}

// ---------------------------------------------------------------------------
// Read-only preview
// ---------------------------------------------------------------------------

/// Draw the first `max_rows` rows of `table`.
pub fn preview_table(ui: &mut Ui, id_salt: &str, table: &Table, max_rows: usize) {
    let n_rows = table.n_rows().min(max_rows);
    ui.push_id(id_salt, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .columns(Column::auto().at_least(60.0).clip(true), table.n_cols())
            .header(ROW_HEIGHT, |mut header| {
                for column in table.columns() {
                    header.col(|ui: &mut Ui| {
                        ui.strong(column.name.as_str());
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, n_rows, |mut row| {
                    let r = row.index();
                    for column in table.columns() {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell_text(&column.cells[r]));
                        });
                    }
                });
            });
    });
    if table.n_rows() > n_rows {
        ui.weak(format!("… {} more rows", table.n_rows() - n_rows));
    }
}
