// ==========================================
// PSA Extraction & Validation Engine - Spec Layer
// ==========================================
// Responsibility: declarative record type contracts
// (field counts, markers, columns, rules) and content
// matching for smart-mapped columns
// Invariant: validated once at registry construction
// ==========================================

pub mod catalog;
pub mod column;
pub mod content;
pub mod record_spec;

// Re-export the spec surface
pub use catalog::{standard_specs, DIMENSION_TOLERANCE};
pub use column::{ColumnSource, ColumnSpec, ColumnType, DerivedColumn};
pub use content::{ContentKind, MatcherConfig, DATE_FORMATS};
pub use record_spec::{RecordTypeSpec, SmartSpan, SpecRegistry};
