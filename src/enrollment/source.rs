//! Source reading: spreadsheet or CSV bytes → raw records
//!
//! Only the first worksheet is read. The first row is the header row; every
//! following non-empty row becomes one [`RawRecord`].

use super::error::{EnrollmentError, Result};
use super::records::{CellValue, RawRecord};
use calamine::{Data, Reader};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Input encodings we know how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Any workbook calamine can open (xlsx, xlsm, xlsb, xls, ods)
    Spreadsheet,
    /// Comma separated text with a header row
    Csv,
}

impl SourceFormat {
    /// Pick the format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SourceFormat::Spreadsheet),
            "csv" => Ok(SourceFormat::Csv),
            _ => Err(EnrollmentError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Read the source file and parse it into raw records
///
/// The file read is the only await point in the whole pipeline.
pub async fn read_source(path: &Path) -> Result<Vec<RawRecord>> {
    let format = SourceFormat::from_path(path)?;
    let bytes = tokio::fs::read(path).await?;
    debug!(path = %path.display(), bytes = bytes.len(), ?format, "read source");
    parse_bytes(format, bytes)
}

/// Parse already-loaded bytes in the given format
pub fn parse_bytes(format: SourceFormat, bytes: Vec<u8>) -> Result<Vec<RawRecord>> {
    match format {
        SourceFormat::Spreadsheet => parse_spreadsheet(bytes),
        SourceFormat::Csv => parse_csv(&bytes),
    }
}

/// Parse the first sheet of a workbook
fn parse_spreadsheet(bytes: Vec<u8>) -> Result<Vec<RawRecord>> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let sheet_name = first_sheet(&workbook.sheet_names())?;

    let range = workbook.worksheet_range(&sheet_name)?;
    debug!(sheet = %sheet_name, rows = range.height(), "parsing first sheet");

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(|c| cell_from_data(c).to_string()).collect(),
        None => return Ok(Vec::new()),
    };

    let records = rows
        .map(|row| row.iter().map(cell_from_data).collect::<Vec<_>>())
        .filter_map(|cells| zip_record(&headers, cells))
        .collect();

    Ok(records)
}

/// Name of the sheet to read; a workbook without sheets is an error
fn first_sheet(names: &[String]) -> Result<String> {
    names.first().cloned().ok_or(EnrollmentError::EmptyWorkbook)
}

/// Parse CSV text with a header row
fn parse_csv(bytes: &[u8]) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let cells = row.iter().map(CellValue::from_text).collect();
        if let Some(record) = zip_record(&headers, cells) {
            records.push(record);
        }
    }

    Ok(records)
}

/// Pair header names with cells. Wholly empty rows yield `None`; empty cells
/// and unnamed columns are left out of the record. When a header repeats,
/// the leftmost non-empty cell wins.
fn zip_record(headers: &[String], cells: Vec<CellValue>) -> Option<RawRecord> {
    let mut record = RawRecord::new();
    for (name, cell) in headers.iter().zip(cells) {
        if name.is_empty() || cell == CellValue::Empty {
            continue;
        }
        record.entry(name.clone()).or_insert(cell);
    }

    if record.is_empty() {
        None
    } else {
        Some(record)
    }
}

/// Reduce a calamine cell to a [`CellValue`]
///
/// Dates keep their serial number, matching how spreadsheet-to-row converters
/// expose them when no date parsing is requested. Error cells read as empty.
fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::from_text(s),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::from_text(s),
    }
}
