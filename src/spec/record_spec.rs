// ==========================================
// PSA Extraction & Validation Engine - Record Type Specs
// ==========================================
// A RecordTypeSpec binds one PSA record type to its raw field
// count, classification marker, canonical columns and rule set.
// The SpecRegistry validates the whole catalog once at startup;
// everything downstream can then trust it.
// ==========================================

use std::ops::RangeInclusive;

use crate::domain::RecordType;
use crate::error::{EngineError, EngineResult};
use crate::spec::catalog;
use crate::spec::column::ColumnSpec;
use crate::spec::content::MatcherConfig;
use crate::validate::rule::ValidationRule;

// ===== smart span =====

/// Inclusive range of raw field positions scanned by smart mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmartSpan {
    pub start: usize, // first candidate position
    pub end: usize,   // last candidate position, inclusive
}

impl SmartSpan {
    pub fn new(start: usize, end: usize) -> Self {
        SmartSpan { start, end }
    }

    pub fn positions(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }
}

// ===== record type spec =====

/// Everything the engine knows about one record type.
#[derive(Debug, Clone)]
pub struct RecordTypeSpec {
    pub record_type: RecordType,
    pub field_count: usize,           // raw fields per record line
    pub marker: Option<String>,       // field 0 value breaking field-count ties
    pub smart_span: Option<SmartSpan>, // scanned by smart-mapped columns
    pub columns: Vec<ColumnSpec>,     // canonical output schema, in order
    pub rules: Vec<ValidationRule>,   // run in declaration order
}

impl RecordTypeSpec {
    pub fn new(record_type: RecordType, field_count: usize) -> Self {
        RecordTypeSpec {
            record_type,
            field_count,
            marker: None,
            smart_span: None,
            columns: Vec::new(),
            rules: Vec::new(),
        }
    }

    pub fn with_marker(mut self, marker: &str) -> Self {
        self.marker = Some(marker.to_string());
        self
    }

    pub fn with_smart_span(mut self, start: usize, end: usize) -> Self {
        self.smart_span = Some(SmartSpan::new(start, end));
        self
    }

    pub fn with_columns(mut self, columns: Vec<ColumnSpec>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_rules(mut self, rules: Vec<ValidationRule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn has_smart_columns(&self) -> bool {
        self.columns.iter().any(ColumnSpec::is_smart)
    }

    /// Marker match against the first raw field, trimmed.
    pub fn matches_marker(&self, first_field: &str) -> bool {
        match &self.marker {
            Some(marker) => first_field.trim() == marker,
            None => false,
        }
    }
}

// ===== registry =====

/// Validated catalog of record type specs plus the content matcher
/// configuration shared by smart mapping.
#[derive(Debug, Clone)]
pub struct SpecRegistry {
    specs: Vec<RecordTypeSpec>,
    matcher: MatcherConfig,
}

impl SpecRegistry {
    pub fn new(specs: Vec<RecordTypeSpec>, matcher: MatcherConfig) -> EngineResult<Self> {
        validate_specs(&specs)?;
        Ok(SpecRegistry { specs, matcher })
    }

    /// The built-in Product / Planogram / Fixture catalog.
    pub fn standard() -> EngineResult<Self> {
        Self::new(catalog::standard_specs(), MatcherConfig::default())
    }

    pub fn specs(&self) -> &[RecordTypeSpec] {
        &self.specs
    }

    pub fn matcher(&self) -> &MatcherConfig {
        &self.matcher
    }

    pub fn spec_for(&self, record_type: &RecordType) -> Option<&RecordTypeSpec> {
        self.specs.iter().find(|s| &s.record_type == record_type)
    }

    /// Specs sharing a raw field count. More than one entry means the
    /// classifier must consult markers.
    pub fn specs_with_field_count(&self, count: usize) -> Vec<&RecordTypeSpec> {
        self.specs.iter().filter(|s| s.field_count == count).collect()
    }
}

fn validate_specs(specs: &[RecordTypeSpec]) -> EngineResult<()> {
    for (i, spec) in specs.iter().enumerate() {
        if specs[..i].iter().any(|other| other.record_type == spec.record_type) {
            return Err(EngineError::DuplicateRecordType(
                spec.record_type.as_str().to_string(),
            ));
        }
    }

    for spec in specs {
        let record_type = spec.record_type.as_str();

        if spec.columns.is_empty() {
            return Err(EngineError::EmptyColumnSet {
                record_type: record_type.to_string(),
            });
        }

        for column in &spec.columns {
            if let Some(position) = column.position() {
                if position >= spec.field_count {
                    return Err(EngineError::ColumnPositionOutOfRange {
                        record_type: record_type.to_string(),
                        column: column.name.clone(),
                        position,
                        field_count: spec.field_count,
                    });
                }
            }
        }

        if spec.has_smart_columns() {
            let span = spec.smart_span.ok_or_else(|| EngineError::MissingSmartSpan {
                record_type: record_type.to_string(),
            })?;
            if span.start > span.end || span.end >= spec.field_count {
                return Err(EngineError::SmartSpanOutOfRange {
                    record_type: record_type.to_string(),
                    start: span.start,
                    end: span.end,
                    field_count: spec.field_count,
                });
            }
        }

        let column_names: Vec<&str> = spec.columns.iter().map(|c| c.name.as_str()).collect();
        for (i, rule) in spec.rules.iter().enumerate() {
            if spec.rules[..i].iter().any(|other| other.name == rule.name) {
                return Err(EngineError::DuplicateRuleName {
                    record_type: record_type.to_string(),
                    rule: rule.name.clone(),
                });
            }
            for column in &rule.columns {
                if !column_names.contains(&column.as_str()) {
                    return Err(EngineError::UndeclaredRuleColumn {
                        record_type: record_type.to_string(),
                        rule: rule.name.clone(),
                        column: column.clone(),
                    });
                }
            }
        }
    }

    // Shared field counts are only allowed when every pair carries
    // distinct markers; without that the classifier cannot decide.
    for (i, spec) in specs.iter().enumerate() {
        for other in &specs[i + 1..] {
            if spec.field_count != other.field_count {
                continue;
            }
            let distinct = matches!(
                (&spec.marker, &other.marker),
                (Some(a), Some(b)) if a != b
            );
            if !distinct {
                return Err(EngineError::AmbiguousFieldCount {
                    count: spec.field_count,
                    types: format!(
                        "{}, {}",
                        spec.record_type.as_str(),
                        other.record_type.as_str()
                    ),
                });
            }
        }
    }

    Ok(())
}
