// ==========================================
// PSA Extraction & Validation Engine - Record Classifier
// ==========================================
// Classifies raw records by field count, falling back to the
// field-0 marker when two specs share a count. Unclassifiable
// records are skipped with a warning, never an error.
// ==========================================

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::domain::{RawRecord, RecordType};
use crate::spec::record_spec::SpecRegistry;

// ==========================================
// ClassifiedRecords
// ==========================================
#[derive(Debug, Default)]
pub struct ClassifiedRecords {
    pub groups: BTreeMap<RecordType, Vec<RawRecord>>,
    pub skipped: Vec<String>, // one warning per unclassifiable record
}

impl ClassifiedRecords {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn records_for(&self, record_type: &RecordType) -> &[RawRecord] {
        self.groups
            .get(record_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

// ==========================================
// RecordClassifier
// ==========================================
pub struct RecordClassifier<'a> {
    registry: &'a SpecRegistry,
}

impl<'a> RecordClassifier<'a> {
    pub fn new(registry: &'a SpecRegistry) -> Self {
        RecordClassifier { registry }
    }

    /// Group records by record type, preserving input order within
    /// each group. Registry validation guarantees that a shared field
    /// count always comes with distinct markers, so the marker lookup
    /// here can never be ambiguous.
    pub fn classify(&self, records: Vec<RawRecord>) -> ClassifiedRecords {
        let mut out = ClassifiedRecords::default();

        for record in records {
            let candidates = self.registry.specs_with_field_count(record.field_count());
            let spec = match candidates.len() {
                0 => None,
                1 => Some(candidates[0]),
                _ => {
                    let marker = record.fields.first().map(String::as_str).unwrap_or("");
                    candidates.into_iter().find(|s| s.matches_marker(marker))
                }
            };

            match spec {
                Some(spec) => out
                    .groups
                    .entry(spec.record_type.clone())
                    .or_default()
                    .push(record),
                None => {
                    warn!(
                        line = record.source_line,
                        fields = record.field_count(),
                        "skipping unclassifiable record"
                    );
                    out.skipped.push(format!(
                        "Line {}: unrecognized record with {} fields, skipped",
                        record.source_line,
                        record.field_count()
                    ));
                }
            }
        }

        debug!(
            types = out.groups.len(),
            skipped = out.skipped.len(),
            "classification complete"
        );
        out
    }
}
