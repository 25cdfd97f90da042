use std::collections::HashSet;
use std::fmt;

use crate::error::TableError;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the common dataframe dtypes.
#[derive(Debug, Clone)]
pub enum CellValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    /// Missing value.
    Null,
}

// -- Manual Eq/Hash so whole rows can go into a HashSet --
//
// Floats compare by value with NaN equal to NaN and -0.0 equal to 0.0.

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        use CellValue::*;
        match (self, other) {
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Bool(a), Bool(b)) => a == b,
            (Text(a), Text(b)) => a == b,
            (Null, Null) => true,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Int(i) => i.hash(state),
            CellValue::Float(f) => {
                let canonical = if *f == 0.0 {
                    0.0f64
                } else if f.is_nan() {
                    f64::NAN
                } else {
                    *f
                };
                canonical.to_bits().hash(state)
            }
            CellValue::Bool(b) => b.hash(state),
            CellValue::Text(s) => s.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Bool(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CellValue::Null)
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64` for arithmetic and plotting.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Int(_) | CellValue::Float(_))
    }

    /// Text shown in the editable grid; missing cells render empty.
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            other => other.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// Kind of a column, derived from the cells it currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every non-missing cell is an integer or a float (or all are missing).
    Numeric,
    /// Every non-missing cell is a boolean.
    Boolean,
    /// Anything else, including mixed content.
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<CellValue>) -> Self {
        Column {
            name: name.into(),
            cells,
        }
    }

    pub fn kind(&self) -> ColumnKind {
        let mut non_null = self.cells.iter().filter(|c| !c.is_null()).peekable();
        if non_null.peek().is_none() {
            return ColumnKind::Numeric;
        }
        let mut numeric = true;
        let mut boolean = true;
        for cell in non_null {
            numeric &= cell.is_numeric();
            boolean &= matches!(cell, CellValue::Bool(_));
        }
        if numeric {
            ColumnKind::Numeric
        } else if boolean {
            ColumnKind::Boolean
        } else {
            ColumnKind::Text
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.kind() == ColumnKind::Numeric
    }

    pub fn null_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_null()).count()
    }

    /// Mean over the non-missing cells, `None` when there are none.
    pub fn mean(&self) -> Option<f64> {
        let values: Vec<f64> = self.cells.iter().filter_map(CellValue::as_f64).collect();
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Store a numeric column as floats when it holds any float or any
    /// missing cell; integer-only columns stay integers.
    pub fn normalize_numeric(&mut self) {
        if !self.is_numeric() {
            return;
        }
        let promote = self
            .cells
            .iter()
            .any(|c| matches!(c, CellValue::Float(_) | CellValue::Null));
        if promote {
            for cell in &mut self.cells {
                if let CellValue::Int(i) = cell {
                    *cell = CellValue::Float(*i as f64);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the complete in-memory dataset
// ---------------------------------------------------------------------------

/// Ordered named columns with rows aligned by position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, checking that names are unique and lengths agree.
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        let mut seen = HashSet::new();
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(TableError::DuplicateColumn(col.name.clone()));
            }
        }
        if let Some(first) = columns.first() {
            let expected = first.cells.len();
            if let Some(bad) = columns.iter().find(|c| c.cells.len() != expected) {
                return Err(TableError::LengthMismatch {
                    column: bad.name.clone(),
                    expected,
                    found: bad.cells.len(),
                });
            }
        }
        Ok(Table { columns })
    }

    /// Build a table from a header and row-major data, mostly for tests.
    pub fn from_rows(names: &[&str], rows: Vec<Vec<CellValue>>) -> Result<Self, TableError> {
        let mut columns: Vec<Column> = names
            .iter()
            .map(|n| Column::new(*n, Vec::with_capacity(rows.len())))
            .collect();
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != columns.len() {
                return Err(TableError::LengthMismatch {
                    column: format!("row {i}"),
                    expected: columns.len(),
                    found: row.len(),
                });
            }
            for (col, cell) in columns.iter_mut().zip(row) {
                col.cells.push(cell);
            }
        }
        Table::new(columns)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Names of the numeric columns, in table order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.is_numeric())
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.cells.len())
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.columns.get(col)?.cells.get(row)
    }

    /// Copy of one row across all columns.
    pub fn row(&self, idx: usize) -> Option<Vec<CellValue>> {
        if idx >= self.n_rows() {
            return None;
        }
        Some(self.columns.iter().map(|c| c.cells[idx].clone()).collect())
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<CellValue>> + '_ {
        (0..self.n_rows()).map(|i| self.columns.iter().map(|c| c.cells[i].clone()).collect())
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    /// Keep only the rows whose index satisfies `keep`, in order.
    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        for col in &mut self.columns {
            let mut flags = keep.iter();
            col.cells.retain(|_| *flags.next().unwrap_or(&true));
        }
    }

    pub(crate) fn insert_null_row(&mut self, at: usize) {
        let at = at.min(self.n_rows());
        for col in &mut self.columns {
            col.cells.insert(at, CellValue::Null);
        }
    }

    pub(crate) fn remove_row(&mut self, idx: usize) -> bool {
        if idx >= self.n_rows() {
            return false;
        }
        for col in &mut self.columns {
            col.cells.remove(idx);
        }
        true
    }
}
