// ==========================================
// PSA Extraction & Validation Engine - Error Types
// ==========================================
// Tooling: thiserror derive macros
// Fatal only for configuration and reference-input
// problems; data quality surfaces as report content
// ==========================================

use thiserror::Error;

/// Engine error type
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== Configuration errors (fatal at startup) =====
    #[error("duplicate record type registered: {0}")]
    DuplicateRecordType(String),

    #[error("duplicate rule name for {record_type}: {rule}")]
    DuplicateRuleName { record_type: String, rule: String },

    #[error("field count {count} is shared by [{types}] without distinct marker tie-breaks")]
    AmbiguousFieldCount { count: usize, types: String },

    #[error("rule '{rule}' for {record_type} references undeclared column '{column}'")]
    UndeclaredRuleColumn {
        record_type: String,
        rule: String,
        column: String,
    },

    #[error("column '{column}' for {record_type} reads raw position {position}, outside field count {field_count}")]
    ColumnPositionOutOfRange {
        record_type: String,
        column: String,
        position: usize,
        field_count: usize,
    },

    #[error("{record_type} declares smart-mapped columns but no smart span")]
    MissingSmartSpan { record_type: String },

    #[error("smart span {start}..={end} for {record_type} is outside field count {field_count}")]
    SmartSpanOutOfRange {
        record_type: String,
        start: usize,
        end: usize,
        field_count: usize,
    },

    #[error("{record_type} declares no canonical columns")]
    EmptyColumnSet { record_type: String },

    // ===== Data errors (internal invariant violations) =====
    #[error("field count mismatch for {record_type} (line {line}): expected {expected}, got {actual}")]
    FieldCountMismatch {
        record_type: String,
        line: usize,
        expected: usize,
        actual: usize,
    },

    // ===== Reference input errors =====
    #[error("reference file read failed: {0}")]
    ReferenceRead(String),

    #[error("reference workbook parse failed: {0}")]
    ReferenceExcel(String),

    #[error("reference CSV parse failed: {0}")]
    ReferenceCsv(String),

    #[error("reference workbook contains no worksheets")]
    ReferenceSheetMissing,

    #[error("reference file format not supported: {0} (expected .xlsx or .csv)")]
    ReferenceUnsupportedFormat(String),

    // ===== General errors =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// From<std::io::Error>
impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::ReferenceRead(err.to_string())
    }
}

// From<csv::Error>
impl From<csv::Error> for EngineError {
    fn from(err: csv::Error) -> Self {
        EngineError::ReferenceCsv(err.to_string())
    }
}

// From<calamine::XlsxError>
impl From<calamine::XlsxError> for EngineError {
    fn from(err: calamine::XlsxError) -> Self {
        EngineError::ReferenceExcel(err.to_string())
    }
}

/// Result type alias
pub type EngineResult<T> = Result<T, EngineError>;
