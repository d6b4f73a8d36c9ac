// ==========================================
// PSA Extraction & Validation Engine - Content Matchers
// ==========================================
// Tagged content classifier for smart mapping
// Priority order and matcher parameters are configuration data
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date formats accepted by the DateLike matcher and by Date coercion.
pub const DATE_FORMATS: [&str; 3] = ["%m/%d/%Y", "%m/%d/%y", "%Y-%m-%d"];

// ==========================================
// ContentKind - content-type taxonomy
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
    DateLike,  // parses as a calendar date in an accepted format
    Numeric,   // parses as a float and contains a decimal point
    ShortCode, // short token of digits or uppercase letters
    LongText,  // any other non-empty text
}

// ==========================================
// MatcherConfig - classifier configuration
// ==========================================
// A field is classified by testing matchers in priority order;
// the first match wins. Empty fields match nothing.
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    pub priority: Vec<ContentKind>,
    pub short_code_max_len: usize,
    pub date_formats: Vec<String>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        MatcherConfig {
            priority: vec![
                ContentKind::DateLike,
                ContentKind::Numeric,
                ContentKind::ShortCode,
                ContentKind::LongText,
            ],
            short_code_max_len: 6,
            date_formats: DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl MatcherConfig {
    /// Classify a raw field. Returns None for blank input.
    pub fn classify(&self, raw: &str) -> Option<ContentKind> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }
        self.priority
            .iter()
            .copied()
            .find(|kind| self.matches(*kind, text))
    }

    fn matches(&self, kind: ContentKind, text: &str) -> bool {
        match kind {
            ContentKind::DateLike => self
                .date_formats
                .iter()
                .any(|fmt| NaiveDate::parse_from_str(text, fmt).is_ok()),
            ContentKind::Numeric => {
                text.contains('.')
                    && text
                        .parse::<f64>()
                        .map(|v| v.is_finite())
                        .unwrap_or(false)
            }
            ContentKind::ShortCode => {
                text.len() <= self.short_code_max_len
                    && text
                        .chars()
                        .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
            }
            ContentKind::LongText => true,
        }
    }
}
