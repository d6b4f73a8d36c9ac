// ==========================================
// PSA Extraction & Validation Engine - Domain Layer
// ==========================================
// Responsibility: tables, cells, and report structures
// Invariant: no parsing logic, no rule logic
// ==========================================

pub mod report;
pub mod table;

// Re-export core types
pub use report::{
    CombinedReport, CombinedSummary, ReportSummary, RuleStatus, TaggedResult, ValidationReport,
    ValidationResult,
};
pub use table::{CellAnnotation, CellValue, RawRecord, RecordType, Row, Table};
