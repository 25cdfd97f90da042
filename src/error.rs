use thiserror::Error;

// ---------------------------------------------------------------------------
// Library error types
// ---------------------------------------------------------------------------

/// An uploaded file could not be turned into a [`Table`](crate::data::model::Table).
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("file is not valid UTF-8 text")]
    Encoding,

    #[error("no columns to parse from file")]
    Empty,

    #[error("line {line}: expected {expected} fields, saw {found}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("unreadable spreadsheet: {0}")]
    Xlsx(#[from] calamine::XlsxError),

    #[error("spreadsheet contains no worksheet")]
    NoWorksheet,

    #[error(transparent)]
    Table(#[from] TableError),
}

/// A table could not be encoded in the requested output format.
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel write failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("flushing output buffer failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Structural violations of the table invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("column '{column}' has {found} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },
}

/// Chart parameters that cannot be drawn.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("table has no numeric column to plot")]
    NoNumericColumns,

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("y-axis column '{0}' is not numeric")]
    NotNumeric(String),
}
