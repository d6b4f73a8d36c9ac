// ==========================================
// PSA Extraction & Validation Engine - Reference Loader
// ==========================================
// Loads the optional handoff reference workbook that feeds the
// reference-aware rules (Department/Category membership,
// Has_Alt_UPC diagnostics).
// Supports: Excel (.xlsx) / CSV (.csv)
// ==========================================

use std::io::Cursor;
use std::path::Path;

use calamine::{Reader, Xlsx};
use csv::ReaderBuilder;
use tracing::info;

use crate::domain::{CellValue, RecordType, Row, Table};
use crate::error::{EngineError, EngineResult};

/// Sheet holding the handoff data, matched case-insensitively. When
/// absent the first sheet is used instead.
const HANDOFF_SHEET: &str = "handoff";

/// Headers the rules look up by canonical name.
const CANONICAL_HEADERS: [&str; 3] = ["Department", "Category", "Has_Alt_UPC"];

pub struct ReferenceLoader;

impl ReferenceLoader {
    /// Load a reference file by extension. Failures are reference
    /// input errors; the pipeline can always be run without the
    /// reference instead.
    pub fn from_path(path: &Path) -> EngineResult<Table> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        let bytes = std::fs::read(path)?;
        match ext.as_str() {
            "xlsx" => Self::from_xlsx_bytes(&bytes),
            "csv" => Self::from_csv_bytes(&bytes),
            _ => Err(EngineError::ReferenceUnsupportedFormat(ext)),
        }
    }

    pub fn from_xlsx_bytes(bytes: &[u8]) -> EngineResult<Table> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .iter()
            .find(|name| name.eq_ignore_ascii_case(HANDOFF_SHEET))
            .or_else(|| sheet_names.first())
            .cloned()
            .ok_or(EngineError::ReferenceSheetMissing)?;

        let range = workbook.worksheet_range(&sheet_name)?;
        let mut rows = range.rows();
        let header_row = rows.next().ok_or_else(|| {
            EngineError::ReferenceExcel(format!("sheet '{}' has no header row", sheet_name))
        })?;
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| canonical_header(&cell.to_string()))
            .collect();

        let mut table = Table::new(RecordType::new("Reference"), headers.clone());
        for (i, data_row) in rows.enumerate() {
            let values: Vec<CellValue> = (0..headers.len())
                .map(|col| {
                    let text = data_row.get(col).map(|cell| cell.to_string()).unwrap_or_default();
                    text_cell(&text)
                })
                .collect();
            // Skip fully blank rows
            if values.iter().all(CellValue::is_null) {
                continue;
            }
            table.push_row(Row {
                values,
                annotations: Vec::new(),
                source_line: i + 2, // one-based, after the header row
            });
        }

        info!(sheet = %sheet_name, rows = table.row_count(), "reference workbook loaded");
        Ok(table)
    }

    pub fn from_csv_bytes(bytes: &[u8]) -> EngineResult<Table> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);
        let headers: Vec<String> = reader.headers()?.iter().map(canonical_header).collect();

        let mut table = Table::new(RecordType::new("Reference"), headers.clone());
        for (i, result) in reader.records().enumerate() {
            let record = result?;
            let values: Vec<CellValue> = (0..headers.len())
                .map(|col| text_cell(record.get(col).unwrap_or("")))
                .collect();
            if values.iter().all(CellValue::is_null) {
                continue;
            }
            table.push_row(Row {
                values,
                annotations: Vec::new(),
                source_line: i + 2,
            });
        }

        info!(rows = table.row_count(), "reference CSV loaded");
        Ok(table)
    }
}

fn canonical_header(raw: &str) -> String {
    let trimmed = raw.trim();
    for name in CANONICAL_HEADERS {
        if trimmed.eq_ignore_ascii_case(name) {
            return name.to_string();
        }
    }
    trimmed.to_string()
}

fn text_cell(raw: &str) -> CellValue {
    let text = raw.trim();
    if text.is_empty() {
        CellValue::Null
    } else {
        CellValue::Text(text.to_string())
    }
}

/// Strip leading zeros for code comparisons: "014" compares as "14",
/// an all-zero value compares as "0".
pub fn strip_leading_zeros(value: &str) -> &str {
    let stripped = value.trim_start_matches('0');
    if stripped.is_empty() {
        if value.is_empty() {
            value
        } else {
            "0"
        }
    } else {
        stripped
    }
}
