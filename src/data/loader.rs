use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

use anyhow::Context;
use calamine::{Data, Reader, Xlsx};

use super::model::{CellValue, Column, Table};
use crate::error::ParseError;

// ---------------------------------------------------------------------------
// Uploaded files
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
}

impl FileFormat {
    /// Match a file extension, case-insensitively.
    pub fn from_extension(ext: &str) -> Result<Self, ParseError> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Ok(FileFormat::Csv),
            "xlsx" => Ok(FileFormat::Xlsx),
            other => Err(ParseError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Raw upload: name, detected format and file content.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub format: FileFormat,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ParseError> {
        let name = name.into();
        let ext = name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        let format = FileFormat::from_extension(ext)?;
        Ok(UploadedFile {
            name,
            format,
            bytes,
        })
    }

    /// Read a file from disk as an upload.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .context("file name is not valid UTF-8")?
            .to_string();
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        Ok(UploadedFile::new(name, bytes)?)
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an uploaded file into a table.  Dispatch by format.
///
/// * `.csv`  – header row, per-column type inference
/// * `.xlsx` – first worksheet, stored cell types preserved
pub fn load_table(file: &UploadedFile) -> Result<Table, ParseError> {
    let table = match file.format {
        FileFormat::Csv => load_csv(&file.bytes)?,
        FileFormat::Xlsx => load_xlsx(&file.bytes)?,
    };
    log::info!(
        "Loaded '{}': {} rows x {} columns",
        file.name,
        table.n_rows(),
        table.n_cols()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Tokens read as missing values.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub(crate) fn is_na_token(s: &str) -> bool {
    NA_TOKENS.contains(&s)
}

pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Inferred type of a CSV column.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Inferred {
    Int,
    Float,
    Bool,
    Text,
}

fn infer_column(tokens: &[Option<String>]) -> Inferred {
    let present: Vec<&str> = tokens.iter().flatten().map(String::as_str).collect();
    if present.is_empty() {
        return Inferred::Float;
    }
    if present.iter().all(|t| t.parse::<i64>().is_ok()) {
        return Inferred::Int;
    }
    if present.iter().all(|t| t.parse::<f64>().is_ok()) {
        return Inferred::Float;
    }
    if present.iter().all(|t| parse_bool(t).is_some()) {
        return Inferred::Bool;
    }
    Inferred::Text
}

fn typed_cell(token: Option<String>, ty: Inferred) -> CellValue {
    let Some(token) = token else {
        return CellValue::Null;
    };
    match ty {
        Inferred::Int => token.parse().map(CellValue::Int).unwrap_or(CellValue::Text(token)),
        Inferred::Float => token
            .parse()
            .map(CellValue::Float)
            .unwrap_or(CellValue::Text(token)),
        Inferred::Bool => parse_bool(&token)
            .map(CellValue::Bool)
            .unwrap_or(CellValue::Text(token)),
        Inferred::Text => CellValue::Text(token),
    }
}

/// Make header names unique and non-empty.
fn unique_headers(raw: &csv::StringRecord) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    raw.iter()
        .enumerate()
        .map(|(i, h)| {
            let base = if h.trim().is_empty() {
                format!("Unnamed: {i}")
            } else {
                h.to_string()
            };
            let mut name = base.clone();
            let mut n = 1;
            while !seen.insert(name.clone()) {
                name = format!("{base}.{n}");
                n += 1;
            }
            name
        })
        .collect()
}

fn load_csv(bytes: &[u8]) -> Result<Table, ParseError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    if std::str::from_utf8(bytes).is_err() {
        return Err(ParseError::Encoding);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let header_record = reader.headers()?.clone();
    if header_record.is_empty() {
        return Err(ParseError::Empty);
    }
    let headers = unique_headers(&header_record);
    let width = headers.len();

    let mut tokens: Vec<Vec<Option<String>>> = vec![Vec::new(); width];
    for result in reader.records() {
        let record = result?;
        if record.len() > width {
            return Err(ParseError::RaggedRow {
                line: record.position().map_or(0, |p| p.line()),
                expected: width,
                found: record.len(),
            });
        }
        for (col_idx, col_tokens) in tokens.iter_mut().enumerate() {
            let token = record
                .get(col_idx)
                .filter(|t| !is_na_token(t))
                .map(str::to_string);
            col_tokens.push(token);
        }
    }

    let columns = headers
        .into_iter()
        .zip(tokens)
        .map(|(name, col_tokens)| {
            let ty = infer_column(&col_tokens);
            log::debug!("CSV column '{name}' inferred as {ty:?}");
            let cells = col_tokens.into_iter().map(|t| typed_cell(t, ty)).collect();
            let mut column = Column::new(name, cells);
            column.normalize_numeric();
            column
        })
        .collect();

    Ok(Table::new(columns)?)
}

// ---------------------------------------------------------------------------
// XLSX loader
// ---------------------------------------------------------------------------

fn excel_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) if s.is_empty() => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => CellValue::Text(ndt.to_string()),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Null,
    }
}

/// Whole-number float columns without gaps are stored as integers.
fn demote_integral_floats(column: &mut Column) {
    let integral = !column.cells.is_empty()
        && column.cells.iter().all(|c| match c {
            CellValue::Int(_) => true,
            CellValue::Float(f) => f.fract() == 0.0 && f.abs() < i64::MAX as f64,
            _ => false,
        });
    if integral {
        for cell in &mut column.cells {
            if let CellValue::Float(f) = cell {
                *cell = CellValue::Int(*f as i64);
            }
        }
    } else {
        column.normalize_numeric();
    }
}

fn load_xlsx(bytes: &[u8]) -> Result<Table, ParseError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ParseError::NoWorksheet)??;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Err(ParseError::Empty);
    };

    let header_record: csv::StringRecord = header_row
        .iter()
        .map(|c| match c {
            Data::Empty => String::new(),
            other => other.to_string(),
        })
        .collect();
    let headers = unique_headers(&header_record);

    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (col_idx, col_cells) in cells.iter_mut().enumerate() {
            col_cells.push(row.get(col_idx).map_or(CellValue::Null, excel_cell));
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, col_cells)| {
            let mut column = Column::new(name, col_cells);
            demote_integral_floats(&mut column);
            column
        })
        .collect();

    Ok(Table::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_upload(text: &str) -> UploadedFile {
        UploadedFile::new("test.csv", text.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn detects_format_from_extension() {
        assert_eq!(
            UploadedFile::new("a.CSV", vec![]).unwrap().format,
            FileFormat::Csv
        );
        assert_eq!(
            UploadedFile::new("report.v2.xlsx", vec![]).unwrap().format,
            FileFormat::Xlsx
        );
        assert!(matches!(
            UploadedFile::new("notes.txt", vec![]),
            Err(ParseError::UnsupportedFormat(ext)) if ext == "txt"
        ));
    }

    #[test]
    fn infers_column_types() {
        let table = load_table(&csv_upload(
            "id,price,flag,name,blank\n1,1.5,true,a,\n2,,False,b,\n",
        ))
        .unwrap();

        let id = table.column("id").unwrap();
        assert_eq!(id.cells, vec![CellValue::Int(1), CellValue::Int(2)]);

        let price = table.column("price").unwrap();
        assert_eq!(price.cells, vec![CellValue::Float(1.5), CellValue::Null]);

        let flag = table.column("flag").unwrap();
        assert_eq!(flag.cells, vec![CellValue::Bool(true), CellValue::Bool(false)]);

        let name = table.column("name").unwrap();
        assert_eq!(name.cells, vec!["a".into(), "b".into()]);

        let blank = table.column("blank").unwrap();
        assert!(blank.is_numeric());
        assert_eq!(blank.null_count(), 2);
    }

    #[test]
    fn ints_with_missing_become_floats() {
        let table = load_table(&csv_upload("id,value\n1,10\n2,NA\n")).unwrap();
        assert_eq!(
            table.column("value").unwrap().cells,
            vec![CellValue::Float(10.0), CellValue::Null]
        );
    }

    #[test]
    fn mixed_columns_stay_text() {
        let table = load_table(&csv_upload("code\n1\nx\n")).unwrap();
        assert_eq!(
            table.column("code").unwrap().cells,
            vec!["1".into(), "x".into()]
        );
    }

    #[test]
    fn headers_are_made_unique() {
        let table = load_table(&csv_upload("a,a,\n1,2,3\n")).unwrap();
        assert_eq!(table.column_names(), vec!["a", "a.1", "Unnamed: 2"]);
    }

    #[test]
    fn short_rows_are_padded() {
        let table = load_table(&csv_upload("a,b\n1\n2,3\n")).unwrap();
        assert_eq!(
            table.column("b").unwrap().cells,
            vec![CellValue::Null, CellValue::Float(3.0)]
        );
    }

    #[test]
    fn long_rows_fail() {
        let err = load_table(&csv_upload("a,b\n1,2,3\n")).unwrap_err();
        assert!(matches!(
            err,
            ParseError::RaggedRow {
                expected: 2,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn bom_is_stripped() {
        let mut bytes = b"\xEF\xBB\xBF".to_vec();
        bytes.extend_from_slice(b"id\n1\n");
        let table = load_table(&UploadedFile::new("bom.csv", bytes).unwrap()).unwrap();
        assert_eq!(table.column_names(), vec!["id"]);
    }

    #[test]
    fn rejects_invalid_utf8_and_empty_input() {
        let bad = UploadedFile::new("bad.csv", vec![b'a', 0xFF, b'\n']).unwrap();
        assert!(matches!(load_table(&bad), Err(ParseError::Encoding)));
        assert!(matches!(
            load_table(&csv_upload("")),
            Err(ParseError::Empty)
        ));
    }

    #[test]
    fn corrupt_workbook_fails() {
        let file = UploadedFile::new("broken.xlsx", b"not a zip".to_vec()).unwrap();
        assert!(matches!(load_table(&file), Err(ParseError::Xlsx(_))));
    }
}
