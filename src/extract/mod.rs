// ==========================================
// PSA Extraction & Validation Engine - Extraction Layer
// ==========================================
// Responsibility: raw bytes to canonical typed tables
// (decode, split, classify, coerce, smart-map, derive)
// Invariant: data quality problems never abort extraction
// ==========================================

pub mod classifier;
pub mod coerce;
pub mod derive;
pub mod extractor;
pub mod field_mapper;
pub mod line_parser;
pub mod smart_map;

// Re-export the extraction surface
pub use classifier::{ClassifiedRecords, RecordClassifier};
pub use extractor::{ExtractionStats, TableExtractor};
pub use field_mapper::FieldMapper;
pub use line_parser::{decode_psa_bytes, split_fields, LineParser, ParserSettings};
