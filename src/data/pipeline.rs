use super::chart::ChartSpec;
use super::clean::{deduplicate, fill_missing};
use super::edit::{apply_edits, EditOp};
use super::export::ExportFormat;
use super::model::Table;
use super::project::project;
use crate::error::TableError;

// ---------------------------------------------------------------------------
// Per-file options
// ---------------------------------------------------------------------------

/// Every widget value that drives one file's processing pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileOptions {
    pub edits: Vec<EditOp>,
    pub deduplicate: bool,
    pub fill_missing: bool,
    /// Columns to keep, in order.  Empty keeps every column.
    pub selected_columns: Vec<String>,
    /// Chart to draw, if the chart toggle is on.
    pub chart: Option<ChartSpec>,
    pub export_format: ExportFormat,
}

impl FileOptions {
    /// Options for a freshly loaded table: nothing enabled, all columns
    /// selected.
    pub fn for_table(table: &Table) -> Self {
        FileOptions {
            selected_columns: table.column_names(),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Edit,
    Deduplicate,
    FillMissing,
    Project,
}

impl Stage {
    /// The order stages run in.
    pub const ORDER: [Stage; 4] = [
        Stage::Edit,
        Stage::Deduplicate,
        Stage::FillMissing,
        Stage::Project,
    ];

    fn enabled(self, options: &FileOptions) -> bool {
        match self {
            Stage::Edit => !options.edits.is_empty(),
            Stage::Deduplicate => options.deduplicate,
            Stage::FillMissing => options.fill_missing,
            Stage::Project => !options.selected_columns.is_empty(),
        }
    }
}

/// Summary of one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineReport {
    pub edits_applied: usize,
    pub duplicates_removed: usize,
    pub columns_filled: Vec<String>,
    /// Numeric columns left missing because they had no values.
    pub columns_skipped: Vec<String>,
    pub rows: usize,
    pub columns: usize,
}

/// Result of a pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Processed {
    /// The loaded table with the edits applied; what the editor shows.
    pub edited: Table,
    /// Snapshot right after deduplication, before any later stage.
    pub deduplicated: Option<Table>,
    /// Snapshot right after missing values were filled.
    pub filled: Option<Table>,
    /// The table after every enabled stage.
    pub table: Table,
    pub report: PipelineReport,
}

/// Run the enabled stages over a copy of `source`, in [`Stage::ORDER`].
pub fn run(source: &Table, options: &FileOptions) -> Result<Processed, TableError> {
    let mut table = source.clone();
    let mut edited = None;
    let mut deduplicated = None;
    let mut filled = None;
    let mut report = PipelineReport::default();

    for stage in Stage::ORDER {
        if stage.enabled(options) {
            match stage {
                Stage::Edit => {
                    report.edits_applied = apply_edits(&mut table, &options.edits);
                }
                Stage::Deduplicate => {
                    report.duplicates_removed = deduplicate(&mut table);
                    deduplicated = Some(table.clone());
                }
                Stage::FillMissing => {
                    let fill = fill_missing(&mut table);
                    report.columns_filled = fill.filled.into_iter().map(|(name, _)| name).collect();
                    report.columns_skipped = fill.skipped;
                    filled = Some(table.clone());
                }
                Stage::Project => {
                    table = project(&table, &options.selected_columns)?;
                }
            }
            log::debug!("Stage {stage:?}: {} rows x {} columns", table.n_rows(), table.n_cols());
        }
        if stage == Stage::Edit {
            edited = Some(table.clone());
        }
    }

    report.rows = table.n_rows();
    report.columns = table.n_cols();
    Ok(Processed {
        edited: edited.unwrap_or_else(|| source.clone()),
        deduplicated,
        filled,
        table,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn sample() -> Table {
        Table::from_rows(
            &["id", "value"],
            vec![
                vec![1i64.into(), 10.0.into()],
                vec![1i64.into(), 10.0.into()],
                vec![2i64.into(), CellValue::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn nothing_enabled_leaves_table_alone() {
        let source = sample();
        let out = run(&source, &FileOptions::default()).unwrap();
        assert_eq!(out.table, source);
        assert_eq!(out.edited, source);
        assert_eq!(out.report.rows, 3);
    }

    #[test]
    fn edits_run_before_deduplication() {
        // Editing row 1 makes it distinct, so dedupe must not remove it.
        let options = FileOptions {
            edits: vec![EditOp::SetCell {
                row: 1,
                column: "value".into(),
                input: "11".into(),
            }],
            deduplicate: true,
            ..Default::default()
        };
        let out = run(&sample(), &options).unwrap();
        assert_eq!(out.report.duplicates_removed, 0);
        assert_eq!(out.table.n_rows(), 3);
        assert_eq!(out.edited.cell(1, 1), Some(&CellValue::Float(11.0)));
    }

    #[test]
    fn dedupe_runs_before_fill() {
        let mut source = sample();
        // A third copy of the first row would drag the mean if it survived.
        let options = FileOptions {
            edits: vec![
                EditOp::InsertRow { at: 3 },
                EditOp::SetCell { row: 3, column: "id".into(), input: "1".into() },
                EditOp::SetCell { row: 3, column: "value".into(), input: "40".into() },
            ],
            deduplicate: true,
            fill_missing: true,
            ..Default::default()
        };
        source = run(&source, &options).unwrap().table;
        assert_eq!(source.n_rows(), 3);
        assert_eq!(source.cell(1, 1), Some(&CellValue::Float(25.0)));
    }

    #[test]
    fn stage_snapshots_keep_every_column() {
        let options = FileOptions {
            deduplicate: true,
            fill_missing: true,
            selected_columns: vec!["id".into()],
            ..Default::default()
        };
        let out = run(&sample(), &options).unwrap();
        assert_eq!(out.table.column_names(), vec!["id"]);

        let deduplicated = out.deduplicated.unwrap();
        assert_eq!(deduplicated.column_names(), vec!["id", "value"]);
        assert_eq!(deduplicated.n_rows(), 2);
        assert_eq!(deduplicated.cell(1, 1), Some(&CellValue::Null));

        let filled = out.filled.unwrap();
        assert_eq!(filled.column_names(), vec!["id", "value"]);
        assert_eq!(filled.cell(1, 1), Some(&CellValue::Float(10.0)));
    }

    #[test]
    fn disabled_stages_leave_no_snapshot() {
        let out = run(&sample(), &FileOptions::default()).unwrap();
        assert!(out.deduplicated.is_none());
        assert!(out.filled.is_none());
    }

    #[test]
    fn edited_float_makes_rows_duplicates() {
        let source = Table::from_rows(
            &["id", "tag"],
            vec![vec![1i64.into(), "a".into()], vec![2i64.into(), "a".into()]],
        )
        .unwrap();
        let options = FileOptions {
            edits: vec![EditOp::SetCell {
                row: 1,
                column: "id".into(),
                input: "1.0".into(),
            }],
            deduplicate: true,
            ..Default::default()
        };
        let out = run(&source, &options).unwrap();
        assert_eq!(out.report.duplicates_removed, 1);
        assert_eq!(out.table.column("id").unwrap().cells, vec![CellValue::Float(1.0)]);
    }

    #[test]
    fn projection_errors_surface() {
        let options = FileOptions {
            selected_columns: vec!["nope".into()],
            ..Default::default()
        };
        assert_eq!(
            run(&sample(), &options),
            Err(TableError::UnknownColumn("nope".into()))
        );
    }
}
