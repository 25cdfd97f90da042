use std::collections::HashSet;

use super::model::Table;
use crate::error::TableError;

/// Keep exactly the selected columns, in selection order.
///
/// An empty selection leaves the table as it is.
pub fn project(table: &Table, selection: &[String]) -> Result<Table, TableError> {
    if selection.is_empty() {
        return Ok(table.clone());
    }

    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(selection.len());
    for name in selection {
        if !seen.insert(name.as_str()) {
            return Err(TableError::DuplicateColumn(name.clone()));
        }
        let column = table
            .column(name)
            .ok_or_else(|| TableError::UnknownColumn(name.clone()))?;
        columns.push(column.clone());
    }
    Table::new(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn sample() -> Table {
        Table::from_rows(
            &["a", "b", "c"],
            vec![
                vec![1i64.into(), "x".into(), 1.5.into()],
                vec![2i64.into(), "y".into(), CellValue::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn selects_in_given_order() {
        let out = project(&sample(), &["c".to_string(), "a".to_string()]).unwrap();
        assert_eq!(out.column_names(), vec!["c", "a"]);
        assert_eq!(out.n_rows(), 2);
        assert_eq!(out.column("a"), sample().column("a"));
    }

    #[test]
    fn empty_selection_is_a_no_op() {
        assert_eq!(project(&sample(), &[]).unwrap(), sample());
    }

    #[test]
    fn rejects_unknown_and_repeated_names() {
        assert_eq!(
            project(&sample(), &["zzz".to_string()]),
            Err(TableError::UnknownColumn("zzz".to_string()))
        );
        assert_eq!(
            project(&sample(), &["a".to_string(), "a".to_string()]),
            Err(TableError::DuplicateColumn("a".to_string()))
        );
    }
}
