// ==========================================
// PSA Extraction & Validation Engine - Core Library
// ==========================================
// Turns raw planogram PSA exports into typed per-record-type tables
// and a combined data-quality report.
// Pipeline: parse -> classify -> extract -> validate -> aggregate
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer - tables, cells, reports
pub mod domain;

// Spec layer - record type catalog and registry
pub mod spec;

// Extraction layer - line parsing through field mapping
pub mod extract;

// Validation layer - rule engine and check functions
pub mod validate;

// Reference loader - optional handoff workbook
pub mod reference;

// Pipeline - end-to-end run coordinator
pub mod pipeline;

// Error types
pub mod error;

// Logging setup
pub mod logging;

// ==========================================
// Re-export core types
// ==========================================

// Domain types
pub use domain::{
    CellAnnotation, CellValue, CombinedReport, CombinedSummary, RawRecord, RecordType,
    ReportSummary, Row, RuleStatus, Table, TaggedResult, ValidationReport, ValidationResult,
};

// Spec types
pub use spec::{
    ColumnSource, ColumnSpec, ColumnType, ContentKind, MatcherConfig, RecordTypeSpec, SmartSpan,
    SpecRegistry,
};

// Engine entry points
pub use error::{EngineError, EngineResult};
pub use extract::ParserSettings;
pub use pipeline::PsaEngine;
pub use reference::ReferenceLoader;
pub use validate::{RuleSeverity, ValidationRule};

// ==========================================
// Constants
// ==========================================

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// System name
pub const APP_NAME: &str = "PSA Extraction & Validation Engine";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PsaEngine>();
        assert_send_sync::<SpecRegistry>();
    }
}
