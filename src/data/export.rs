use rust_xlsxwriter::Workbook;

use super::model::{CellValue, Table};
use crate::error::SerializationError;

// ---------------------------------------------------------------------------
// Output formats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Excel,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Excel => "Excel",
        }
    }
}

/// A download request: target format plus the derived file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub format: ExportFormat,
    pub file_name: String,
}

impl ExportRequest {
    /// Derive the output name by replacing the final extension of
    /// `original_name` with the format's extension.
    pub fn new(original_name: &str, format: ExportFormat) -> Self {
        let stem = match original_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => original_name,
        };
        ExportRequest {
            format,
            file_name: format!("{stem}.{}", format.extension()),
        }
    }
}

/// Bytes ready for download.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

pub fn export(table: &Table, request: &ExportRequest) -> Result<ExportArtifact, SerializationError> {
    let bytes = serialize(table, request.format)?;
    log::info!(
        "Exported {} rows to '{}' ({} bytes, {})",
        table.n_rows(),
        request.file_name,
        bytes.len(),
        request.format.mime_type()
    );
    Ok(ExportArtifact {
        file_name: request.file_name.clone(),
        mime_type: request.format.mime_type(),
        bytes,
    })
}

pub fn serialize(table: &Table, format: ExportFormat) -> Result<Vec<u8>, SerializationError> {
    match format {
        ExportFormat::Csv => to_csv(table),
        ExportFormat::Excel => to_xlsx(table),
    }
}

// ---------------------------------------------------------------------------
// CSV writer
// ---------------------------------------------------------------------------

/// Text form of a cell.  Floats use the shortest representation that reads
/// back to the same value and always carry a decimal point or exponent, so
/// float columns reload as floats.
fn csv_field(cell: &CellValue) -> String {
    match cell {
        CellValue::Null => String::new(),
        CellValue::Int(i) => i.to_string(),
        CellValue::Float(f) => format!("{f:?}"),
        CellValue::Bool(true) => "True".to_string(),
        CellValue::Bool(false) => "False".to_string(),
        CellValue::Text(s) => s.clone(),
    }
}

fn to_csv(table: &Table) -> Result<Vec<u8>, SerializationError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.column_names())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(csv_field))?;
    }
    writer.into_inner().map_err(|e| e.into_error().into())
}

// ---------------------------------------------------------------------------
// XLSX writer
// ---------------------------------------------------------------------------

fn to_xlsx(table: &Table) -> Result<Vec<u8>, SerializationError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Sheet1")?;

    for (col_idx, column) in table.columns().iter().enumerate() {
        let col = u16::try_from(col_idx).unwrap_or(u16::MAX);
        sheet.write_string(0, col, &column.name)?;
        for (row_idx, cell) in column.cells.iter().enumerate() {
            let row = u32::try_from(row_idx + 1).unwrap_or(u32::MAX);
            match cell {
                CellValue::Int(i) => {
                    sheet.write_number(row, col, *i as f64)?;
                }
                CellValue::Float(f) => {
                    sheet.write_number(row, col, *f)?;
                }
                CellValue::Bool(b) => {
                    sheet.write_boolean(row, col, *b)?;
                }
                CellValue::Text(s) => {
                    sheet.write_string(row, col, s)?;
                }
                CellValue::Null => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
