// ==========================================
// PSA Extraction & Validation Engine - Report Domain Model
// ==========================================
// ValidationResult/ValidationReport: per-type rule outcomes
// CombinedReport: order-preserving merge across record types
// ==========================================

use crate::domain::table::RecordType;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// RuleStatus
// ==========================================
// Serialized format: SCREAMING_SNAKE_CASE (spreadsheet contract)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleStatus {
    Pass,
    Fail,
    Warning,
}

impl fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleStatus::Pass => write!(f, "PASS"),
            RuleStatus::Fail => write!(f, "FAIL"),
            RuleStatus::Warning => write!(f, "WARNING"),
        }
    }
}

// ==========================================
// ValidationResult - one rule execution outcome
// ==========================================
// Immutable once produced. affected_rows are 0-based table row
// indices; empty for table-level checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub rule_name: String,
    pub status: RuleStatus,
    pub message: String,
    pub affected_rows: Vec<usize>,
    pub error_count: usize,
    pub pass_count: usize,
    pub details: Vec<String>, // bounded human-readable per-row notes
}

// ==========================================
// ReportSummary - per-type counters
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub checks_run: usize,
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
    pub total_errors: usize,
}

impl ReportSummary {
    fn tally(results: &[ValidationResult]) -> Self {
        ReportSummary {
            checks_run: results.len(),
            passed: results
                .iter()
                .filter(|r| r.status == RuleStatus::Pass)
                .count(),
            failed: results
                .iter()
                .filter(|r| r.status == RuleStatus::Fail)
                .count(),
            warnings: results
                .iter()
                .filter(|r| r.status == RuleStatus::Warning)
                .count(),
            total_errors: results.iter().map(|r| r.error_count).sum(),
        }
    }
}

// ==========================================
// ValidationReport - ordered results for one record type
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub record_type: RecordType,
    pub total_records: usize,
    pub results: Vec<ValidationResult>,
    pub summary: ReportSummary,
}

impl ValidationReport {
    pub fn new(
        record_type: RecordType,
        total_records: usize,
        results: Vec<ValidationResult>,
    ) -> Self {
        let summary = ReportSummary::tally(&results);
        ValidationReport {
            record_type,
            total_records,
            results,
            summary,
        }
    }
}

// ==========================================
// TaggedResult - flat-list entry of the combined report
// ==========================================
// rule_name carries the "[Product] " style display prefix; the
// per-type reports keep the canonical rule names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedResult {
    pub record_type: RecordType,
    #[serde(flatten)]
    pub result: ValidationResult,
}

// ==========================================
// CombinedSummary - cross-type counters
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedSummary {
    pub total_checks: usize,
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
    pub total_errors: usize,
    pub total_records: usize,
    pub skipped_records: usize,
    pub overall_status: RuleStatus, // FAIL > WARNING > PASS
}

// ==========================================
// CombinedReport - aggregated output of one pipeline run
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedReport {
    pub run_id: String,
    pub reports: Vec<ValidationReport>,
    pub results: Vec<TaggedResult>,
    pub skip_warnings: Vec<String>,
    pub summary: CombinedSummary,
}

impl CombinedReport {
    /// Merge per-type reports in their given (registration) order.
    ///
    /// Pure and order-preserving: the flat result list concatenates
    /// each report's results with a "[Type] " name prefix, and every
    /// summary counter is the sum of the per-type counters.
    pub fn aggregate(
        run_id: String,
        reports: Vec<ValidationReport>,
        skip_warnings: Vec<String>,
    ) -> Self {
        let mut results = Vec::new();
        for report in &reports {
            for result in &report.results {
                let mut tagged = result.clone();
                tagged.rule_name = format!("[{}] {}", report.record_type, result.rule_name);
                results.push(TaggedResult {
                    record_type: report.record_type.clone(),
                    result: tagged,
                });
            }
        }

        let failed: usize = reports.iter().map(|r| r.summary.failed).sum();
        let warnings: usize = reports.iter().map(|r| r.summary.warnings).sum();
        let overall_status = if failed > 0 {
            RuleStatus::Fail
        } else if warnings > 0 {
            RuleStatus::Warning
        } else {
            RuleStatus::Pass
        };

        let summary = CombinedSummary {
            total_checks: reports.iter().map(|r| r.summary.checks_run).sum(),
            passed: reports.iter().map(|r| r.summary.passed).sum(),
            failed,
            warnings,
            total_errors: reports.iter().map(|r| r.summary.total_errors).sum(),
            total_records: reports.iter().map(|r| r.total_records).sum(),
            skipped_records: skip_warnings.len(),
            overall_status,
        };

        CombinedReport {
            run_id,
            reports,
            results,
            skip_warnings,
            summary,
        }
    }
}
