// ==========================================
// PSA Extraction & Validation Engine - Rule Model
// ==========================================
// A validation rule bundles a name, the columns it inspects,
// an optional tolerance, and a check function. Outcomes carry
// per-row failures or a whole-table verdict.
// ==========================================

use crate::domain::Table;
use crate::extract::ExtractionStats;

// ==========================================
// RuleSeverity - what a failing rule reports as
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSeverity {
    Error,
    Warning,
}

// ==========================================
// RowFailure - one failing row with its message
// ==========================================
#[derive(Debug, Clone)]
pub struct RowFailure {
    pub row: usize, // zero-based row index in the table
    pub message: String,
}

impl RowFailure {
    pub fn new(row: usize, message: impl Into<String>) -> Self {
        RowFailure {
            row,
            message: message.into(),
        }
    }
}

// ==========================================
// RowOutcome - result of a row-scoped check
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct RowOutcome {
    pub failures: Vec<RowFailure>,
    pub inspected: usize,           // rows the check actually examined
    pub message: Option<String>,    // overrides the generated summary line
    pub note: Option<String>,       // appended to the summary on pass
    pub warning: Option<String>,    // forces WARNING when there are no failures
}

impl RowOutcome {
    pub fn new(inspected: usize) -> Self {
        RowOutcome {
            inspected,
            ..RowOutcome::default()
        }
    }

    pub fn fail(&mut self, row: usize, message: impl Into<String>) {
        self.failures.push(RowFailure::new(row, message));
    }
}

// ==========================================
// TableOutcome - result of a table-scoped check
// ==========================================
#[derive(Debug, Clone)]
pub struct TableOutcome {
    pub ok: bool,
    pub message: String,
    pub error_count: usize,
    pub pass_count: usize,
    pub details: Vec<String>,
}

// ==========================================
// RuleContext - everything a check function may read
// ==========================================
pub struct RuleContext<'a> {
    pub table: &'a Table,
    pub reference: Option<&'a Table>,
    pub stats: &'a ExtractionStats,
    pub tolerance: f64,
    pub columns: &'a [String], // columns declared by the rule, in order
}

impl<'a> RuleContext<'a> {
    /// First declared column. Only meaningful for rules that declare
    /// columns; table-level rules may declare none.
    pub fn subject(&self) -> &str {
        &self.columns[0]
    }
}

// ==========================================
// RuleCheck - check function variants
// ==========================================
#[derive(Clone, Copy)]
pub enum RuleCheck {
    Row(fn(&RuleContext) -> RowOutcome),
    Table(fn(&RuleContext) -> TableOutcome),
}

// ==========================================
// ValidationRule - one named rule in a record type's set
// ==========================================
#[derive(Clone)]
pub struct ValidationRule {
    pub name: String,
    pub severity: RuleSeverity,
    pub columns: Vec<String>,
    pub tolerance: Option<f64>,
    pub check: RuleCheck,
}

impl ValidationRule {
    pub fn row(name: &str, columns: &[&str], check: fn(&RuleContext) -> RowOutcome) -> Self {
        ValidationRule {
            name: name.to_string(),
            severity: RuleSeverity::Error,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            tolerance: None,
            check: RuleCheck::Row(check),
        }
    }

    pub fn row_with_tolerance(
        name: &str,
        columns: &[&str],
        tolerance: f64,
        check: fn(&RuleContext) -> RowOutcome,
    ) -> Self {
        ValidationRule {
            tolerance: Some(tolerance),
            ..ValidationRule::row(name, columns, check)
        }
    }

    pub fn table(name: &str, columns: &[&str], check: fn(&RuleContext) -> TableOutcome) -> Self {
        ValidationRule {
            name: name.to_string(),
            severity: RuleSeverity::Error,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            tolerance: None,
            check: RuleCheck::Table(check),
        }
    }

    pub fn with_severity(mut self, severity: RuleSeverity) -> Self {
        self.severity = severity;
        self
    }
}

impl std::fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationRule")
            .field("name", &self.name)
            .field("severity", &self.severity)
            .field("columns", &self.columns)
            .field("tolerance", &self.tolerance)
            .finish()
    }
}
