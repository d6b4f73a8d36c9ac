// ==========================================
// PSA Extraction & Validation Engine - Field Mapper
// ==========================================
// Maps one raw record onto the canonical row for its record
// type: direct positional copies with coercion, then smart
// mapping, then derived columns. Column order is schema order.
// ==========================================

use crate::domain::{CellAnnotation, CellValue, RawRecord, Row};
use crate::extract::coerce::coerce;
use crate::extract::{derive, smart_map};
use crate::spec::column::{ColumnSource, DerivedColumn};
use crate::spec::content::{ContentKind, MatcherConfig};
use crate::spec::record_spec::RecordTypeSpec;

pub struct FieldMapper<'a> {
    spec: &'a RecordTypeSpec,
    matcher: &'a MatcherConfig,
}

impl<'a> FieldMapper<'a> {
    pub fn new(spec: &'a RecordTypeSpec, matcher: &'a MatcherConfig) -> Self {
        FieldMapper { spec, matcher }
    }

    /// Build the canonical row for one record. Coercion failures
    /// annotate the row, they never drop it.
    pub fn map_record(&self, record: &RawRecord) -> Row {
        let mut values = vec![CellValue::Null; self.spec.columns.len()];
        let mut annotations: Vec<CellAnnotation> = Vec::new();

        for (idx, column) in self.spec.columns.iter().enumerate() {
            match &column.source {
                ColumnSource::Position(position) => {
                    let raw = record.fields.get(*position).map(String::as_str).unwrap_or("");
                    let (value, annotation) = coerce(raw, &column.name, column.column_type);
                    values[idx] = value;
                    annotations.extend(annotation);
                }
                ColumnSource::MappedCode { position, codes } => {
                    let raw = record.fields.get(*position).map(String::as_str).unwrap_or("");
                    let code = raw.trim();
                    if !code.is_empty() {
                        let mapped = codes
                            .iter()
                            .find(|(from, _)| from == code)
                            .map(|(_, to)| to.clone())
                            .unwrap_or_else(|| code.to_string());
                        values[idx] = CellValue::Text(mapped);
                    }
                }
                // resolved after the direct copies
                ColumnSource::Smart(_) | ColumnSource::Derived(_) => {}
            }
        }

        self.apply_smart(record, &mut values, &mut annotations);
        self.apply_derived(&mut values);

        Row {
            values,
            annotations,
            source_line: record.source_line,
        }
    }

    fn apply_smart(
        &self,
        record: &RawRecord,
        values: &mut [CellValue],
        annotations: &mut Vec<CellAnnotation>,
    ) {
        let span = match self.spec.smart_span {
            Some(span) => span,
            None => return,
        };
        let targets: Vec<(usize, ContentKind)> = self
            .spec
            .columns
            .iter()
            .enumerate()
            .filter_map(|(idx, column)| match &column.source {
                ColumnSource::Smart(kind) => Some((idx, *kind)),
                _ => None,
            })
            .collect();
        if targets.is_empty() {
            return;
        }

        let expected: Vec<ContentKind> = targets.iter().map(|(_, kind)| *kind).collect();
        let assigned = smart_map::assign_smart_positions(record, &span, &expected, self.matcher);

        for ((idx, _), position) in targets.iter().zip(assigned) {
            if let Some(position) = position {
                let column = &self.spec.columns[*idx];
                let (value, annotation) =
                    coerce(&record.fields[position], &column.name, column.column_type);
                values[*idx] = value;
                annotations.extend(annotation);
            }
        }
    }

    // Derived columns run last, in canonical order, so a derived
    // column may read one computed earlier (Segments reads Width_Feet).
    fn apply_derived(&self, values: &mut [CellValue]) {
        for idx in 0..self.spec.columns.len() {
            let derived = match &self.spec.columns[idx].source {
                ColumnSource::Derived(derived) => *derived,
                _ => continue,
            };
            let file_name = self.text_by_name(values, "File_Name");
            values[idx] = match derived {
                DerivedColumn::WidthFeet => {
                    number_cell(derive::width_feet(self.number_by_name(values, "Width_Inches")))
                }
                DerivedColumn::Segments => {
                    number_cell(derive::segments(self.number_by_name(values, "Width_Feet")))
                }
                DerivedColumn::DrawingId => text_cell(derive::drawing_id(file_name.as_deref())),
                DerivedColumn::Footage => number_cell(derive::footage(file_name.as_deref())),
                DerivedColumn::TraitNumber => text_cell(derive::trait_number(file_name.as_deref())),
            };
        }
    }

    fn number_by_name(&self, values: &[CellValue], name: &str) -> Option<f64> {
        let idx = self.spec.columns.iter().position(|c| c.name == name)?;
        values[idx].as_f64()
    }

    fn text_by_name(&self, values: &[CellValue], name: &str) -> Option<String> {
        let idx = self.spec.columns.iter().position(|c| c.name == name)?;
        values[idx].as_str().map(str::to_string)
    }
}

fn number_cell(value: Option<f64>) -> CellValue {
    match value {
        Some(v) => CellValue::Number(v),
        None => CellValue::Null,
    }
}

fn text_cell(value: Option<String>) -> CellValue {
    match value {
        Some(v) => CellValue::Text(v),
        None => CellValue::Null,
    }
}
