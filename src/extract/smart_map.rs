// ==========================================
// PSA Extraction & Validation Engine - Smart Mapping
// ==========================================
// Content-driven assignment of ambiguous raw positions to
// canonical columns. Deterministic: per target, the left-most
// unclaimed position whose content matches wins.
// ==========================================

use crate::domain::RawRecord;
use crate::spec::content::{ContentKind, MatcherConfig};
use crate::spec::record_spec::SmartSpan;

/// Assign one raw position (or none) to each expected content kind,
/// in target order. A position is claimed at most once; targets that
/// find no matching unclaimed position resolve to None.
pub fn assign_smart_positions(
    record: &RawRecord,
    span: &SmartSpan,
    expected: &[ContentKind],
    matcher: &MatcherConfig,
) -> Vec<Option<usize>> {
    // Classify every span position once up front
    let classified: Vec<(usize, Option<ContentKind>)> = span
        .positions()
        .map(|pos| {
            let kind = record
                .fields
                .get(pos)
                .and_then(|raw| matcher.classify(raw));
            (pos, kind)
        })
        .collect();

    let mut claimed = vec![false; classified.len()];
    let mut assignments = Vec::with_capacity(expected.len());

    for target in expected {
        let hit = classified
            .iter()
            .enumerate()
            .find(|(i, (_, kind))| !claimed[*i] && *kind == Some(*target));
        match hit {
            Some((i, (pos, _))) => {
                claimed[i] = true;
                assignments.push(Some(*pos));
            }
            None => assignments.push(None),
        }
    }

    assignments
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLANOGRAM_TARGETS: [ContentKind; 4] = [
        ContentKind::Numeric,   // Offset
        ContentKind::Numeric,   // Notch_Bar_Width
        ContentKind::ShortCode, // Department
        ContentKind::ShortCode, // Category
    ];

    fn record_with_span(span_fields: &[&str]) -> RawRecord {
        let mut fields = vec![String::new(); 7];
        fields.extend(span_fields.iter().map(|s| s.to_string()));
        RawRecord::new(fields, 4)
    }

    #[test]
    fn test_aligned_span_maps_in_order() {
        let record = record_with_span(&["1.5", "0.5", "014", "C22"]);
        let span = SmartSpan::new(7, 10);
        let assigned = assign_smart_positions(
            &record,
            &span,
            &PLANOGRAM_TARGETS,
            &MatcherConfig::default(),
        );
        assert_eq!(assigned, vec![Some(7), Some(8), Some(9), Some(10)]);
    }

    #[test]
    fn test_shifted_span_leaves_unmatched_targets_null() {
        // Optional leading field absent: only one numeric present
        let record = record_with_span(&["", "1.5", "014", "C1"]);
        let span = SmartSpan::new(7, 10);
        let assigned = assign_smart_positions(
            &record,
            &span,
            &PLANOGRAM_TARGETS,
            &MatcherConfig::default(),
        );
        assert_eq!(assigned, vec![Some(8), None, Some(9), Some(10)]);
    }

    #[test]
    fn test_left_most_wins_on_ties() {
        let record = record_with_span(&["2.5", "1.5", "AB", "CD"]);
        let span = SmartSpan::new(7, 10);
        let assigned = assign_smart_positions(
            &record,
            &span,
            &PLANOGRAM_TARGETS,
            &MatcherConfig::default(),
        );
        // First numeric target takes position 7, second takes 8
        assert_eq!(assigned, vec![Some(7), Some(8), Some(9), Some(10)]);
    }

    #[test]
    fn test_date_like_field_is_not_claimed_by_numeric() {
        let record = record_with_span(&["3/7/2025", "1.5", "014", "C1"]);
        let span = SmartSpan::new(7, 10);
        let assigned = assign_smart_positions(
            &record,
            &span,
            &PLANOGRAM_TARGETS,
            &MatcherConfig::default(),
        );
        assert_eq!(assigned, vec![Some(8), None, Some(9), Some(10)]);
    }

    #[test]
    fn test_assignment_is_deterministic() {
        let record = record_with_span(&["1.5", "2.5", "A1", "B2"]);
        let span = SmartSpan::new(7, 10);
        let first = assign_smart_positions(
            &record,
            &span,
            &PLANOGRAM_TARGETS,
            &MatcherConfig::default(),
        );
        let second = assign_smart_positions(
            &record,
            &span,
            &PLANOGRAM_TARGETS,
            &MatcherConfig::default(),
        );
        assert_eq!(first, second);
    }
}
