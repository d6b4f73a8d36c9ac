// ==========================================
// PSA Extraction & Validation Engine - Table Domain Model
// ==========================================
// RawRecord: classifier output, immutable once parsed
// Table/Row/CellValue: extractor output, shared column schema
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// RecordType - record type identifier
// ==========================================
// Open set: the registry accepts new types without code changes,
// so this is a name, not a closed enum
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordType(String);

impl RecordType {
    pub fn new(name: impl Into<String>) -> Self {
        RecordType(name.into())
    }

    pub fn product() -> Self {
        RecordType::new("Product")
    }

    pub fn planogram() -> Self {
        RecordType::new("Planogram")
    }

    pub fn fixture() -> Self {
        RecordType::new("Fixture")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ==========================================
// RawRecord - one classified PSA line
// ==========================================
// Lifecycle: produced by the classifier, consumed by an extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    pub fields: Vec<String>, // escape-decoded fields, marker at position 0
    pub source_line: usize,  // 1-based line number in the source file
}

impl RawRecord {
    pub fn new(fields: Vec<String>, source_line: usize) -> Self {
        RawRecord {
            fields,
            source_line,
        }
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

// ==========================================
// CellValue - typed scalar cell
// ==========================================
// Serialized untagged: null / number / ISO date string / string.
// Variant order matters for deserialization: date strings must be
// tried before plain text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Number(v) => {
                // Integral values print without a trailing .0
                if v.fract() == 0.0 && v.abs() < 1e15 {
                    write!(f, "{}", *v as i64)
                } else {
                    write!(f, "{}", v)
                }
            }
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

// ==========================================
// CellAnnotation - coercion failure note
// ==========================================
// A failed type coercion nulls the cell and records this; the row
// is still included (annotation, not rejection)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellAnnotation {
    pub column: String,  // canonical column name
    pub raw: String,     // raw field text that failed to parse
    pub message: String, // what went wrong
}

// ==========================================
// Row - one mapped record
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Row {
    pub values: Vec<CellValue>, // one per canonical column, schema order
    pub annotations: Vec<CellAnnotation>,
    pub source_line: usize, // 1-based line number in the source file
}

// ==========================================
// Table - cleaned tabular output for one record type
// ==========================================
// Invariant: every row has exactly columns.len() values.
// Column order is presentation order only; validation addresses
// columns by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub record_type: RecordType,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(record_type: RecordType, columns: Vec<String>) -> Self {
        Table {
            record_type,
            columns,
            rows: Vec::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_position(name).is_some()
    }

    /// Position of a canonical column, by name.
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at (row, column name); None when either is out of range.
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let col = self.column_position(column)?;
        self.rows.get(row)?.values.get(col)
    }

    pub fn push_row(&mut self, row: Row) {
        debug_assert_eq!(row.values.len(), self.columns.len());
        self.rows.push(row);
    }
}
