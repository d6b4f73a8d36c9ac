// ==========================================
// PSA Extraction & Validation Engine - Column Specifications
// ==========================================
// Declarative description of one output column:
// where its value comes from and how it is typed
// ==========================================

use serde::{Deserialize, Serialize};

use crate::spec::content::ContentKind;

// ==========================================
// ColumnType - coercion target for a cell
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Text,
    Number,
    Date,
}

// ==========================================
// DerivedColumn - values computed from other columns
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivedColumn {
    WidthFeet,   // Width_Inches / 12
    Segments,    // Width_Feet / 4
    DrawingId,   // first five digits extracted from File_Name
    Footage,     // File_Name characters 5..8
    TraitNumber, // digit run after the first underscore in File_Name
}

// ==========================================
// ColumnSource - where a column's value comes from
// ==========================================
#[derive(Debug, Clone)]
pub enum ColumnSource {
    /// Fixed zero-based position in the raw record.
    Position(usize),
    /// Fixed position whose raw code is translated through a lookup
    /// table. Unlisted codes pass through unchanged.
    MappedCode {
        position: usize,
        codes: Vec<(String, String)>,
    },
    /// Resolved at runtime by content kind within the record's
    /// smart-mapping span.
    Smart(ContentKind),
    /// Computed from columns already filled in canonical order.
    Derived(DerivedColumn),
}

// ==========================================
// ColumnSpec - one canonical output column
// ==========================================
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub name: String,
    pub column_type: ColumnType,
    pub source: ColumnSource,
}

impl ColumnSpec {
    pub fn text(name: &str, position: usize) -> Self {
        ColumnSpec {
            name: name.to_string(),
            column_type: ColumnType::Text,
            source: ColumnSource::Position(position),
        }
    }

    pub fn number(name: &str, position: usize) -> Self {
        ColumnSpec {
            name: name.to_string(),
            column_type: ColumnType::Number,
            source: ColumnSource::Position(position),
        }
    }

    pub fn date(name: &str, position: usize) -> Self {
        ColumnSpec {
            name: name.to_string(),
            column_type: ColumnType::Date,
            source: ColumnSource::Position(position),
        }
    }

    pub fn mapped_code(name: &str, position: usize, codes: &[(&str, &str)]) -> Self {
        ColumnSpec {
            name: name.to_string(),
            column_type: ColumnType::Text,
            source: ColumnSource::MappedCode {
                position,
                codes: codes
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            },
        }
    }

    pub fn smart(name: &str, column_type: ColumnType, kind: ContentKind) -> Self {
        ColumnSpec {
            name: name.to_string(),
            column_type,
            source: ColumnSource::Smart(kind),
        }
    }

    pub fn derived(name: &str, column_type: ColumnType, derived: DerivedColumn) -> Self {
        ColumnSpec {
            name: name.to_string(),
            column_type,
            source: ColumnSource::Derived(derived),
        }
    }

    /// Fixed raw position read by this column, if any.
    pub fn position(&self) -> Option<usize> {
        match &self.source {
            ColumnSource::Position(p) => Some(*p),
            ColumnSource::MappedCode { position, .. } => Some(*position),
            ColumnSource::Smart(_) | ColumnSource::Derived(_) => None,
        }
    }

    pub fn is_smart(&self) -> bool {
        matches!(self.source, ColumnSource::Smart(_))
    }
}
