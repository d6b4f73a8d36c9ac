// ==========================================
// PSA Extraction & Validation Engine - Validation Layer
// ==========================================
// Responsibility: rule model, check functions, and the
// engine that runs a record type's rule set over a table
// Invariant: rules are pure; data failures become report
// content, never errors
// ==========================================

pub mod checks;
pub mod engine;
pub mod rule;

// Re-export the validation surface
pub use engine::ValidationEngine;
pub use rule::{
    RowFailure, RowOutcome, RuleCheck, RuleContext, RuleSeverity, TableOutcome, ValidationRule,
};
