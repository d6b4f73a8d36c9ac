// ==========================================
// PSA Extraction & Validation Engine - Table Extractor
// ==========================================
// Applies the field mapper to a classified record group and
// assembles the canonical table. The classifier has already
// verified field counts; a mismatch here is an internal
// invariant violation and is fatal.
// ==========================================

use tracing::debug;

use crate::domain::{RawRecord, Table};
use crate::error::{EngineError, EngineResult};
use crate::extract::field_mapper::FieldMapper;
use crate::spec::content::MatcherConfig;
use crate::spec::record_spec::RecordTypeSpec;

// ==========================================
// ExtractionStats
// ==========================================
// Observability counters, also consumed by the table-level
// field-count rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractionStats {
    pub records_in: usize,           // classified records handed in
    pub rows_out: usize,             // rows written to the table
    pub expected_field_count: usize, // per the record type spec
    pub mismatched_records: usize,   // defensive counter, zero in normal runs
    pub annotated_cells: usize,      // coercion failures recorded on rows
}

// ==========================================
// TableExtractor
// ==========================================
pub struct TableExtractor<'a> {
    spec: &'a RecordTypeSpec,
    matcher: &'a MatcherConfig,
}

impl<'a> TableExtractor<'a> {
    pub fn new(spec: &'a RecordTypeSpec, matcher: &'a MatcherConfig) -> Self {
        TableExtractor { spec, matcher }
    }

    pub fn extract(&self, records: &[RawRecord]) -> EngineResult<(Table, ExtractionStats)> {
        let mapper = FieldMapper::new(self.spec, self.matcher);
        let mut table = Table::new(self.spec.record_type.clone(), self.spec.column_names());
        let mut stats = ExtractionStats {
            records_in: records.len(),
            expected_field_count: self.spec.field_count,
            ..ExtractionStats::default()
        };

        for record in records {
            if record.field_count() != self.spec.field_count {
                return Err(EngineError::FieldCountMismatch {
                    record_type: self.spec.record_type.as_str().to_string(),
                    line: record.source_line,
                    expected: self.spec.field_count,
                    actual: record.field_count(),
                });
            }
            let row = mapper.map_record(record);
            stats.annotated_cells += row.annotations.len();
            table.push_row(row);
        }
        stats.rows_out = table.row_count();

        debug!(
            record_type = self.spec.record_type.as_str(),
            records = stats.records_in,
            rows = stats.rows_out,
            annotated = stats.annotated_cells,
            "extracted table"
        );
        Ok((table, stats))
    }
}
