// ==========================================
// PSA Extraction & Validation Engine - Validation Engine
// ==========================================
// Runs a record type's rules in declaration order and shapes
// outcomes into report results. Deterministic: identical input
// yields identical result sequences.
// ==========================================

use tracing::debug;

use crate::domain::{RuleStatus, Table, ValidationReport, ValidationResult};
use crate::extract::ExtractionStats;
use crate::spec::record_spec::RecordTypeSpec;
use crate::validate::rule::{
    RowOutcome, RuleCheck, RuleContext, RuleSeverity, TableOutcome, ValidationRule,
};

/// Per-result detail list cap.
const MAX_DETAILS: usize = 10;

pub struct ValidationEngine<'a> {
    spec: &'a RecordTypeSpec,
}

impl<'a> ValidationEngine<'a> {
    pub fn new(spec: &'a RecordTypeSpec) -> Self {
        ValidationEngine { spec }
    }

    /// Execute every rule against the table. Rules never mutate the
    /// table and never abort the run; a rule whose declared columns
    /// are absent reports WARNING instead of panicking.
    pub fn validate(
        &self,
        table: &Table,
        reference: Option<&Table>,
        stats: &ExtractionStats,
    ) -> ValidationReport {
        let mut results = Vec::with_capacity(self.spec.rules.len());
        for rule in &self.spec.rules {
            results.push(self.run_rule(rule, table, reference, stats));
        }

        debug!(
            record_type = self.spec.record_type.as_str(),
            checks = results.len(),
            rows = table.row_count(),
            "validation complete"
        );
        ValidationReport::new(self.spec.record_type.clone(), table.row_count(), results)
    }

    fn run_rule(
        &self,
        rule: &ValidationRule,
        table: &Table,
        reference: Option<&Table>,
        stats: &ExtractionStats,
    ) -> ValidationResult {
        let missing: Vec<&str> = rule
            .columns
            .iter()
            .filter(|column| !table.has_column(column))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return ValidationResult {
                rule_name: rule.name.clone(),
                status: RuleStatus::Warning,
                message: format!("{} column not found", missing.join(", ")),
                affected_rows: Vec::new(),
                error_count: 0,
                pass_count: 0,
                details: vec!["Column does not exist in dataset".to_string()],
            };
        }

        let ctx = RuleContext {
            table,
            reference,
            stats,
            tolerance: rule.tolerance.unwrap_or(0.0),
            columns: &rule.columns,
        };

        match rule.check {
            RuleCheck::Row(check) => self.row_result(rule, check(&ctx)),
            RuleCheck::Table(check) => self.table_result(rule, check(&ctx)),
        }
    }

    fn row_result(&self, rule: &ValidationRule, outcome: RowOutcome) -> ValidationResult {
        let error_count = outcome.failures.len();
        let pass_count = outcome.inspected.saturating_sub(error_count);
        let affected_rows: Vec<usize> = outcome.failures.iter().map(|f| f.row).collect();

        let status = if error_count > 0 {
            failing_status(rule.severity)
        } else if outcome.warning.is_some() {
            RuleStatus::Warning
        } else {
            RuleStatus::Pass
        };

        let mut message = match (&outcome.warning, &outcome.message) {
            (Some(warning), _) if error_count == 0 => warning.clone(),
            (_, Some(message)) => message.clone(),
            (_, None) => default_message(rule, error_count, pass_count),
        };
        if let Some(note) = &outcome.note {
            message.push_str(&format!(" ({})", note));
        }

        // Details show one-based row numbers; affected_rows stay
        // zero-based for programmatic consumers.
        let mut details: Vec<String> = outcome
            .failures
            .iter()
            .take(MAX_DETAILS)
            .map(|f| format!("Row {}: {}", f.row + 1, f.message))
            .collect();
        if error_count > MAX_DETAILS {
            details.push(format!("... and {} more", error_count - MAX_DETAILS));
        }

        ValidationResult {
            rule_name: rule.name.clone(),
            status,
            message,
            affected_rows,
            error_count,
            pass_count,
            details,
        }
    }

    fn table_result(&self, rule: &ValidationRule, outcome: TableOutcome) -> ValidationResult {
        let status = if outcome.ok {
            RuleStatus::Pass
        } else {
            failing_status(rule.severity)
        };
        ValidationResult {
            rule_name: rule.name.clone(),
            status,
            message: outcome.message,
            affected_rows: Vec::new(),
            error_count: outcome.error_count,
            pass_count: outcome.pass_count,
            details: outcome.details,
        }
    }
}

fn failing_status(severity: RuleSeverity) -> RuleStatus {
    match severity {
        RuleSeverity::Error => RuleStatus::Fail,
        RuleSeverity::Warning => RuleStatus::Warning,
    }
}

fn default_message(rule: &ValidationRule, error_count: usize, pass_count: usize) -> String {
    if error_count == 0 {
        format!("{} passed ({} records)", rule.name, pass_count)
    } else {
        format!("{} failed for {} records", rule.name, error_count)
    }
}
