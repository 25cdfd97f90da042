use super::loader::{is_na_token, parse_bool};
use super::model::{CellValue, ColumnKind, Table};

/// One change made through the editable grid.
///
/// Edits are kept per file and replayed onto the freshly loaded table at
/// the start of every processing pass.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOp {
    SetCell {
        row: usize,
        column: String,
        input: String,
    },
    InsertRow {
        at: usize,
    },
    RemoveRow {
        row: usize,
    },
}

/// Coerce grid text into a cell of the column's kind.
///
/// Text that does not fit the column is stored as text rather than
/// rejected.
pub fn coerce_input(input: &str, kind: ColumnKind) -> CellValue {
    let trimmed = input.trim();
    if is_na_token(trimmed) {
        return CellValue::Null;
    }
    match kind {
        ColumnKind::Numeric => {
            if let Ok(i) = trimmed.parse::<i64>() {
                CellValue::Int(i)
            } else if let Ok(f) = trimmed.parse::<f64>() {
                CellValue::Float(f)
            } else {
                CellValue::Text(input.to_string())
            }
        }
        ColumnKind::Boolean => parse_bool(trimmed)
            .map(CellValue::Bool)
            .unwrap_or_else(|| CellValue::Text(input.to_string())),
        ColumnKind::Text => CellValue::Text(input.to_string()),
    }
}

/// Apply one edit in place.  Returns `false` when the edit no longer
/// matches the table and was skipped.
pub fn apply_edit(table: &mut Table, op: &EditOp) -> bool {
    match op {
        EditOp::SetCell { row, column, input } => {
            let Some(col_idx) = table.column_index(column) else {
                return false;
            };
            if *row >= table.n_rows() {
                return false;
            }
            let column = &mut table.columns_mut()[col_idx];
            column.cells[*row] = coerce_input(input, column.kind());
            // A float or a gap turns an integer column into a float column,
            // the same typing the loader gives it.
            column.normalize_numeric();
            true
        }
        EditOp::InsertRow { at } => {
            table.insert_null_row(*at);
            for column in table.columns_mut() {
                column.normalize_numeric();
            }
            true
        }
        EditOp::RemoveRow { row } => table.remove_row(*row),
    }
}

/// Replay all edits in order, skipping the ones that do not apply.
pub fn apply_edits(table: &mut Table, ops: &[EditOp]) -> usize {
    let mut applied = 0;
    for op in ops {
        if apply_edit(table, op) {
            applied += 1;
        } else {
            log::warn!("Skipping edit that no longer matches the table: {op:?}");
        }
    }
    applied
}
