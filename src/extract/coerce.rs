// ==========================================
// PSA Extraction & Validation Engine - Typed Coercion
// ==========================================
// One raw field to one typed cell. Failure is never fatal:
// the cell becomes null and the row gets an annotation.
// ==========================================

use chrono::NaiveDate;

use crate::domain::{CellAnnotation, CellValue};
use crate::spec::column::ColumnType;
use crate::spec::content::DATE_FORMATS;

/// Coerce a raw field into the column's declared type. Whitespace is
/// trimmed first; an empty trimmed field is null without annotation.
pub fn coerce(raw: &str, column: &str, column_type: ColumnType) -> (CellValue, Option<CellAnnotation>) {
    let text = raw.trim();
    if text.is_empty() {
        return (CellValue::Null, None);
    }

    match column_type {
        ColumnType::Text => (CellValue::Text(text.to_string()), None),
        ColumnType::Number => match text.parse::<f64>() {
            Ok(value) if value.is_finite() => (CellValue::Number(value), None),
            _ => (CellValue::Null, Some(annotation(column, raw, "not a number"))),
        },
        ColumnType::Date => {
            for format in DATE_FORMATS {
                if let Ok(date) = NaiveDate::parse_from_str(text, format) {
                    return (CellValue::Date(date), None);
                }
            }
            (CellValue::Null, Some(annotation(column, raw, "not a date")))
        }
    }
}

fn annotation(column: &str, raw: &str, problem: &str) -> CellAnnotation {
    CellAnnotation {
        column: column.to_string(),
        raw: raw.to_string(),
        message: format!("{}: '{}'", problem, raw.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_trims_and_nulls_empty() {
        let (value, note) = coerce("  hello  ", "Name", ColumnType::Text);
        assert_eq!(value, CellValue::Text("hello".to_string()));
        assert!(note.is_none());

        let (value, note) = coerce("   ", "Name", ColumnType::Text);
        assert_eq!(value, CellValue::Null);
        assert!(note.is_none());
    }

    #[test]
    fn test_number_accepts_signed_and_decimal() {
        let (value, _) = coerce("48", "Width", ColumnType::Number);
        assert_eq!(value, CellValue::Number(48.0));
        let (value, _) = coerce("-0.25", "Width", ColumnType::Number);
        assert_eq!(value, CellValue::Number(-0.25));
    }

    #[test]
    fn test_number_failure_annotates() {
        let (value, note) = coerce("4x8", "Width", ColumnType::Number);
        assert_eq!(value, CellValue::Null);
        let note = note.unwrap();
        assert_eq!(note.column, "Width");
        assert_eq!(note.raw, "4x8");
        assert!(note.message.contains("not a number"));
    }

    #[test]
    fn test_number_rejects_non_finite() {
        let (value, note) = coerce("inf", "Width", ColumnType::Number);
        assert_eq!(value, CellValue::Null);
        assert!(note.is_some());
    }

    #[test]
    fn test_date_formats() {
        let expected = CellValue::Date(NaiveDate::from_ymd_opt(2025, 3, 7).unwrap());
        let (value, _) = coerce("3/7/2025", "Effective_Date", ColumnType::Date);
        assert_eq!(value, expected);
        let (value, _) = coerce("3/7/25", "Effective_Date", ColumnType::Date);
        assert_eq!(value, expected);
        let (value, _) = coerce("2025-03-07", "Effective_Date", ColumnType::Date);
        assert_eq!(value, expected);
    }

    #[test]
    fn test_date_failure_annotates() {
        let (value, note) = coerce("March 7", "Effective_Date", ColumnType::Date);
        assert_eq!(value, CellValue::Null);
        assert!(note.unwrap().message.contains("not a date"));
    }
}
