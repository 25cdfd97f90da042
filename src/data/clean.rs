use std::collections::HashSet;

use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Duplicate removal
// ---------------------------------------------------------------------------

/// Remove rows identical across all columns, keeping the first occurrence.
/// Returns the number of rows removed.
pub fn deduplicate(table: &mut Table) -> usize {
    let mut seen: HashSet<Vec<CellValue>> = HashSet::with_capacity(table.n_rows());
    let keep: Vec<bool> = table.rows().map(|row| seen.insert(row)).collect();
    let removed = keep.iter().filter(|k| !**k).count();
    if removed > 0 {
        table.retain_rows(&keep);
    }
    removed
}

// ---------------------------------------------------------------------------
// Missing-value filling
// ---------------------------------------------------------------------------

/// Outcome of [`fill_missing`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillReport {
    /// Columns that had gaps filled, with the mean used.
    pub filled: Vec<(String, f64)>,
    /// Numeric columns left untouched because every cell is missing.
    pub skipped: Vec<String>,
}

/// Replace missing cells of every numeric column with that column's mean.
///
/// A numeric column with no values at all has no mean; it is left as
/// missing and listed in [`FillReport::skipped`].
pub fn fill_missing(table: &mut Table) -> FillReport {
    let mut report = FillReport::default();
    for column in table.columns_mut() {
        if !column.is_numeric() || column.null_count() == 0 {
            continue;
        }
        let Some(mean) = column.mean() else {
            log::warn!(
                "Column '{}' has no values; leaving it missing",
                column.name
            );
            report.skipped.push(column.name.clone());
            continue;
        };
        for cell in &mut column.cells {
            *cell = match &*cell {
                CellValue::Null => CellValue::Float(mean),
                CellValue::Int(i) => CellValue::Float(*i as f64),
                other => other.clone(),
            };
        }
        log::debug!("Filled column '{}' with mean {mean}", column.name);
        report.filled.push((column.name.clone(), mean));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, value: Option<f64>) -> Vec<CellValue> {
        vec![id.into(), value.into()]
    }

    #[test]
    fn keeps_first_occurrence_in_order() {
        let mut table = Table::from_rows(
            &["id", "value"],
            vec![
                row(3, Some(1.0)),
                row(1, None),
                row(3, Some(1.0)),
                row(2, Some(5.0)),
                row(1, None),
            ],
        )
        .unwrap();
        assert_eq!(deduplicate(&mut table), 2);
        let ids: Vec<CellValue> = table.column("id").unwrap().cells.clone();
        assert_eq!(ids, vec![3i64.into(), 1i64.into(), 2i64.into()]);
    }

    #[test]
    fn deduplicate_is_idempotent() {
        let mut table = Table::from_rows(
            &["id", "value"],
            vec![row(1, Some(1.0)), row(1, Some(1.0)), row(2, None)],
        )
        .unwrap();
        deduplicate(&mut table);
        let once = table.clone();
        assert_eq!(deduplicate(&mut table), 0);
        assert_eq!(table, once);
    }

    #[test]
    fn fill_keeps_mean_and_leaves_text_alone() {
        let mut table = Table::from_rows(
            &["value", "label"],
            vec![
                vec![2.0.into(), "a".into()],
                vec![CellValue::Null, CellValue::Null],
                vec![4.0.into(), "c".into()],
            ],
        )
        .unwrap();
        let before = table.column("value").unwrap().mean().unwrap();

        let report = fill_missing(&mut table);

        let value = table.column("value").unwrap();
        assert_eq!(value.null_count(), 0);
        assert_eq!(value.cells[1], CellValue::Float(3.0));
        assert!((value.mean().unwrap() - before).abs() < 1e-12);
        assert_eq!(table.column("label").unwrap().null_count(), 1);
        assert_eq!(report.filled, vec![("value".to_string(), 3.0)]);
    }

    #[test]
    fn all_missing_numeric_column_is_left_missing() {
        let mut table = Table::from_rows(
            &["empty", "n"],
            vec![
                vec![CellValue::Null, 1i64.into()],
                vec![CellValue::Null, 2i64.into()],
            ],
        )
        .unwrap();
        let report = fill_missing(&mut table);
        assert_eq!(report.skipped, vec!["empty".to_string()]);
        assert_eq!(table.column("empty").unwrap().null_count(), 2);
        // Gap-free integer columns are untouched.
        assert_eq!(
            table.column("n").unwrap().cells,
            vec![CellValue::Int(1), CellValue::Int(2)]
        );
    }
}
