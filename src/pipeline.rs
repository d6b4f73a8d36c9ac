// ==========================================
// PSA Extraction & Validation Engine - Pipeline
// ==========================================
// Coordinates one full run: parse, classify, extract per type,
// validate per type, aggregate
// ==========================================

use std::collections::BTreeMap;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::{CombinedReport, RecordType, Table};
use crate::error::EngineResult;
use crate::extract::{LineParser, ParserSettings, RecordClassifier, TableExtractor};
use crate::spec::SpecRegistry;
use crate::validate::ValidationEngine;

// ==========================================
// PsaEngine - end-to-end run coordinator
// ==========================================
// Read-only after construction, so one engine can serve concurrent
// callers; every run builds fresh records, tables, and reports.

pub struct PsaEngine {
    registry: SpecRegistry,
    settings: ParserSettings,
}

impl PsaEngine {
    /// Engine with the standard Product/Planogram/Fixture catalog.
    pub fn new() -> EngineResult<Self> {
        Ok(PsaEngine {
            registry: SpecRegistry::standard()?,
            settings: ParserSettings::default(),
        })
    }

    /// Engine over a caller-supplied registry. New record types are
    /// added here, not by code changes in the pipeline.
    pub fn with_registry(registry: SpecRegistry) -> Self {
        PsaEngine {
            registry,
            settings: ParserSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ParserSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn registry(&self) -> &SpecRegistry {
        &self.registry
    }

    /// Run the whole pipeline over raw PSA bytes.
    ///
    /// `reference` is the optional handoff table; reference-aware
    /// rules degrade to pass-with-note without it. Record types with
    /// no classified records are skipped entirely. Data-quality
    /// findings never error; only configuration problems do.
    #[instrument(skip(self, psa_bytes, reference), fields(bytes = psa_bytes.len(), has_reference = reference.is_some()))]
    pub fn extract_and_validate(
        &self,
        psa_bytes: &[u8],
        reference: Option<&Table>,
    ) -> EngineResult<(CombinedReport, BTreeMap<RecordType, Table>)> {
        let run_id = Uuid::new_v4().to_string();
        info!(run_id = %run_id, bytes = psa_bytes.len(), "PSA run started");

        // ==========================================
        // Step 1: decode and split into raw records
        // ==========================================
        debug!("step 1: parse lines");

        let parser = LineParser::new(self.settings.clone());
        let records = parser.parse(psa_bytes);

        info!(run_id = %run_id, records = records.len(), "line parsing complete");

        // ==========================================
        // Step 2: classify by field count and marker
        // ==========================================
        debug!("step 2: classify records");

        let classified = RecordClassifier::new(&self.registry).classify(records);

        info!(
            run_id = %run_id,
            groups = classified.groups.len(),
            skipped = classified.skipped_count(),
            "classification complete"
        );

        // ==========================================
        // Step 3/4: extract and validate each type
        // ==========================================
        // Registration order, not group order: the combined report
        // lists Product before Planogram before Fixture.
        let mut tables = BTreeMap::new();
        let mut reports = Vec::new();

        for spec in self.registry.specs() {
            let group = classified.records_for(&spec.record_type);
            if group.is_empty() {
                debug!(record_type = %spec.record_type, "no records of this type, skipped");
                continue;
            }

            debug!(record_type = %spec.record_type, records = group.len(), "step 3: extract");

            let extractor = TableExtractor::new(spec, self.registry.matcher());
            let (table, stats) = extractor.extract(group)?;

            info!(
                run_id = %run_id,
                record_type = %spec.record_type,
                rows = table.row_count(),
                annotated_cells = stats.annotated_cells,
                "extraction complete"
            );

            debug!(record_type = %spec.record_type, "step 4: validate");

            let report = ValidationEngine::new(spec).validate(&table, reference, &stats);

            info!(
                run_id = %run_id,
                record_type = %spec.record_type,
                checks = report.summary.checks_run,
                failed = report.summary.failed,
                warnings = report.summary.warnings,
                "validation complete"
            );

            tables.insert(spec.record_type.clone(), table);
            reports.push(report);
        }

        // ==========================================
        // Step 5: aggregate the combined report
        // ==========================================
        let combined = CombinedReport::aggregate(run_id.clone(), reports, classified.skipped);

        info!(
            run_id = %run_id,
            total_checks = combined.summary.total_checks,
            total_errors = combined.summary.total_errors,
            overall = %combined.summary.overall_status,
            "PSA run complete"
        );

        Ok((combined, tables))
    }
}
