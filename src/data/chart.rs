use super::model::{CellValue, Table};
use crate::error::ChartError;

// ---------------------------------------------------------------------------
// Chart parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Scatter,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Bar, ChartKind::Line, ChartKind::Scatter];

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar Chart",
            ChartKind::Line => "Line Chart",
            ChartKind::Scatter => "Scatter Plot",
        }
    }
}

/// What to plot: a chart kind, an x column and a numeric y column.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub x_column: String,
    pub y_column: String,
}

/// The x axis of a chart: numeric values, or category labels laid out at
/// positions `0, 1, 2, …` in order of first appearance.
#[derive(Debug, Clone, PartialEq)]
pub enum XAxis {
    Numeric,
    Categorical(Vec<String>),
}

/// A validated, renderable chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub kind: ChartKind,
    pub title: &'static str,
    pub x_label: String,
    pub y_label: String,
    pub x_axis: XAxis,
    /// `[x, y]` pairs; rows with a missing x or y are dropped.
    pub points: Vec<[f64; 2]>,
}

impl ChartSpec {
    /// Default selection: first column on x, first numeric column on y.
    /// `None` when the table has no numeric column, in which case no chart
    /// is offered.
    pub fn default_for(table: &Table) -> Option<ChartSpec> {
        let y_column = table.numeric_columns().into_iter().next()?;
        let x_column = table.columns().first()?.name.clone();
        Some(ChartSpec {
            kind: ChartKind::default(),
            x_column,
            y_column,
        })
    }

    /// Carry the selection over to a reshaped table.  Axes that still
    /// exist (and, for y, are still numeric) are kept; the others fall back
    /// to the defaults.  `None` when the table has no numeric column left.
    pub fn fit_to(&self, table: &Table) -> Option<ChartSpec> {
        let default = ChartSpec::default_for(table)?;
        let x_column = if table.column(&self.x_column).is_some() {
            self.x_column.clone()
        } else {
            default.x_column
        };
        let y_column = match table.column(&self.y_column) {
            Some(col) if col.is_numeric() => self.y_column.clone(),
            _ => default.y_column,
        };
        Some(ChartSpec {
            kind: self.kind,
            x_column,
            y_column,
        })
    }

    /// Validate the selection against `table` and extract the points.
    pub fn build(&self, table: &Table) -> Result<ChartData, ChartError> {
        if table.numeric_columns().is_empty() {
            return Err(ChartError::NoNumericColumns);
        }
        let x = table
            .column(&self.x_column)
            .ok_or_else(|| ChartError::UnknownColumn(self.x_column.clone()))?;
        let y = table
            .column(&self.y_column)
            .ok_or_else(|| ChartError::UnknownColumn(self.y_column.clone()))?;
        if !y.is_numeric() {
            return Err(ChartError::NotNumeric(self.y_column.clone()));
        }

        let (x_axis, xs) = if x.is_numeric() {
            let xs: Vec<Option<f64>> = x.cells.iter().map(CellValue::as_f64).collect();
            (XAxis::Numeric, xs)
        } else {
            let mut labels: Vec<String> = Vec::new();
            let xs: Vec<Option<f64>> = x
                .cells
                .iter()
                .map(|cell| {
                    let label = cell.display_text();
                    let pos = match labels.iter().position(|l| *l == label) {
                        Some(pos) => pos,
                        None => {
                            labels.push(label);
                            labels.len() - 1
                        }
                    };
                    Some(pos as f64)
                })
                .collect();
            (XAxis::Categorical(labels), xs)
        };

        let points = xs
            .into_iter()
            .zip(y.cells.iter().map(CellValue::as_f64))
            .filter_map(|(x, y)| Some([x?, y?]))
            .collect();

        Ok(ChartData {
            kind: self.kind,
            title: self.kind.title(),
            x_label: self.x_column.clone(),
            y_label: self.y_column.clone(),
            x_axis,
            points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(
            &["city", "sales", "year"],
            vec![
                vec!["Oslo".into(), 10.0.into(), 2020i64.into()],
                vec!["Bergen".into(), CellValue::Null, 2021i64.into()],
                vec!["Oslo".into(), 7.5.into(), 2022i64.into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn default_picks_first_numeric_for_y() {
        let spec = ChartSpec::default_for(&sample()).unwrap();
        assert_eq!(spec.x_column, "city");
        assert_eq!(spec.y_column, "sales");
        assert_eq!(spec.kind, ChartKind::Bar);
    }

    #[test]
    fn no_chart_without_numeric_columns() {
        let table = Table::from_rows(&["name"], vec![vec!["a".into()]]).unwrap();
        assert_eq!(ChartSpec::default_for(&table), None);
    }

    #[test]
    fn categorical_x_maps_labels_to_positions() {
        let spec = ChartSpec {
            kind: ChartKind::Line,
            x_column: "city".into(),
            y_column: "sales".into(),
        };
        let chart = spec.build(&sample()).unwrap();
        assert_eq!(chart.title, "Line Chart");
        assert_eq!(
            chart.x_axis,
            XAxis::Categorical(vec!["Oslo".into(), "Bergen".into()])
        );
        assert_eq!(chart.points, vec![[0.0, 10.0], [0.0, 7.5]]);
    }

    #[test]
    fn numeric_x_uses_values() {
        let spec = ChartSpec {
            kind: ChartKind::Scatter,
            x_column: "year".into(),
            y_column: "sales".into(),
        };
        let chart = spec.build(&sample()).unwrap();
        assert_eq!(chart.x_axis, XAxis::Numeric);
        assert_eq!(chart.points, vec![[2020.0, 10.0], [2022.0, 7.5]]);
    }

    #[test]
    fn rejects_non_numeric_y() {
        let spec = ChartSpec {
            kind: ChartKind::Bar,
            x_column: "sales".into(),
            y_column: "city".into(),
        };
        assert_eq!(
            spec.build(&sample()),
            Err(ChartError::NotNumeric("city".into()))
        );
    }

    #[test]
    fn unknown_axis_column_is_an_error() {
        let spec = ChartSpec {
            kind: ChartKind::Bar,
            x_column: "city".into(),
            y_column: "missing".into(),
        };
        assert_eq!(
            spec.build(&sample()),
            Err(ChartError::UnknownColumn("missing".into()))
        );
    }

    #[test]
    fn text_only_table_has_nothing_to_plot() {
        let table = Table::from_rows(&["name"], vec![vec!["a".into()]]).unwrap();
        let spec = ChartSpec {
            kind: ChartKind::Bar,
            x_column: "name".into(),
            y_column: "name".into(),
        };
        assert_eq!(spec.build(&table), Err(ChartError::NoNumericColumns));
    }

    #[test]
    fn fit_to_replaces_only_missing_axes() {
        let spec = ChartSpec {
            kind: ChartKind::Scatter,
            x_column: "year".into(),
            y_column: "sales".into(),
        };
        let narrowed = Table::from_rows(
            &["city", "year"],
            vec![vec!["Oslo".into(), 2020i64.into()]],
        )
        .unwrap();
        let fitted = spec.fit_to(&narrowed).unwrap();
        assert_eq!(fitted.kind, ChartKind::Scatter);
        assert_eq!(fitted.x_column, "year");
        assert_eq!(fitted.y_column, "year");
        assert!(fitted.build(&narrowed).is_ok());

        let text_only = Table::from_rows(&["city"], vec![vec!["Oslo".into()]]).unwrap();
        assert_eq!(spec.fit_to(&text_only), None);
    }

    #[test]
    fn fit_to_keeps_a_valid_selection() {
        let spec = ChartSpec {
            kind: ChartKind::Line,
            x_column: "year".into(),
            y_column: "sales".into(),
        };
        assert_eq!(spec.fit_to(&sample()), Some(spec.clone()));
    }
}
