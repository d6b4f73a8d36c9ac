// ==========================================
// PSA Extraction & Validation Engine - Check Functions
// ==========================================
// Pure check functions wired into the rule catalog.
// Row checks read the columns declared by their rule, in
// declaration order, and never mutate the table.
// ==========================================

use crate::domain::CellValue;
use crate::reference::strip_leading_zeros;
use crate::validate::rule::{RowOutcome, RuleContext, TableOutcome};

// ===== rule data =====

pub const UPC_LENGTH: usize = 13;
pub const ORDER_TYPE_INVALID: [&str; 5] = ["03", "07", "43", "3", "7"];

/// Expected Width/Depth per fixture type. Types not listed carry no
/// dimension expectation.
pub const TYPE_DIMENSIONS: [(&str, f64, f64); 4] = [
    ("Shelf", 48.0, 24.0),
    ("Rod", 0.5, 21.0),
    ("Bar", 48.0, 0.5),
    ("Pegboard", 46.0, 0.25),
];

pub const DECK_PREFIX: &str = "DECK";
pub const DECK_SHELF_Y: f64 = 5.75;
pub const SHELF_Z_DECK: f64 = 0.25;
pub const SHELF_Z_STANDARD: f64 = 1.25;
pub const BACK_OVERHANG_DECK: f64 = 0.0;
pub const BACK_OVERHANG_STANDARD: f64 = 1.25;

// ===== cell access helpers =====

fn num(ctx: &RuleContext, row: usize, column: &str) -> Option<f64> {
    ctx.table.value(row, column).and_then(CellValue::as_f64)
}

/// Rendered cell text; None for null cells.
fn rendered(ctx: &RuleContext, row: usize, column: &str) -> Option<String> {
    match ctx.table.value(row, column) {
        Some(value) if !value.is_null() => Some(value.to_string()),
        _ => None,
    }
}

fn is_blank(ctx: &RuleContext, row: usize, column: &str) -> bool {
    ctx.table
        .value(row, column)
        .map_or(true, CellValue::is_null)
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "null".to_string(),
    }
}

// ===== generic row checks =====

/// columns: subject
pub fn not_null(ctx: &RuleContext) -> RowOutcome {
    let col = ctx.subject();
    let total = ctx.table.row_count();
    let mut out = RowOutcome::new(total);

    for row in 0..total {
        if is_blank(ctx, row, col) {
            out.fail(row, format!("{} is null/empty", col));
        }
    }

    out.message = Some(if out.failures.is_empty() {
        format!("All {} records have {} populated", total, col)
    } else {
        format!(
            "{} of {} records have null/empty {}",
            out.failures.len(),
            total,
            col
        )
    });
    out
}

/// columns: subject. Must be exactly 1; null fails.
pub fn must_equal_one(ctx: &RuleContext) -> RowOutcome {
    let col = ctx.subject();
    let total = ctx.table.row_count();
    let mut out = RowOutcome::new(total);

    for row in 0..total {
        if num(ctx, row, col) != Some(1.0) {
            let shown = rendered(ctx, row, col).unwrap_or_else(|| "null".to_string());
            out.fail(row, format!("{} = {} (must be exactly 1)", col, shown));
        }
    }

    out.message = Some(if out.failures.is_empty() {
        format!("All {} records have {} = 1", total, col)
    } else {
        format!(
            "Found {} records where {} != 1 (must be exactly 1)",
            out.failures.len(),
            col
        )
    });
    out
}

/// columns: subject. Not-null always; membership against the
/// reference column of the same name when a reference is present.
pub fn reference_membership(ctx: &RuleContext) -> RowOutcome {
    let col = ctx.subject();
    let total = ctx.table.row_count();
    let mut out = RowOutcome::new(total);

    // Allowed values with leading zeros stripped, when a reference
    // carrying the column is available.
    let allowed: Option<Vec<String>> = ctx.reference.and_then(|reference| {
        if !reference.has_column(col) {
            return None;
        }
        let mut set = Vec::new();
        for row in 0..reference.row_count() {
            if let Some(value) = reference.value(row, col) {
                if !value.is_null() {
                    let text = value.to_string();
                    let norm = strip_leading_zeros(text.trim()).to_string();
                    if !set.contains(&norm) {
                        set.push(norm);
                    }
                }
            }
        }
        Some(set)
    });

    for row in 0..total {
        match rendered(ctx, row, col) {
            None => out.fail(row, format!("{} is null/empty", col)),
            Some(value) => {
                if let Some(allowed) = &allowed {
                    let norm = strip_leading_zeros(value.trim()).to_string();
                    if !allowed.contains(&norm) {
                        out.fail(row, format!("{} '{}' not found in reference", col, value));
                    }
                }
            }
        }
    }

    if allowed.is_none() {
        out.note = Some(if ctx.reference.is_some() {
            format!("reference file has no {} column, membership check skipped", col)
        } else {
            "reference not provided, membership check skipped".to_string()
        });
    }

    out.message = Some(if out.failures.is_empty() {
        if allowed.is_some() {
            format!("All {} records have valid {}", total, col)
        } else {
            format!("All {} records have {} populated", total, col)
        }
    } else {
        format!("{} of {} records have invalid {}", out.failures.len(), total, col)
    });
    out
}

// ===== product checks =====

/// columns: Relay_ID. Expected value is the most frequent one; ties
/// break toward the first occurrence. All-null reports WARNING.
pub fn relay_uniformity(ctx: &RuleContext) -> RowOutcome {
    let col = ctx.subject();
    let total = ctx.table.row_count();
    let mut out = RowOutcome::new(total);

    let mut counts: Vec<(String, usize)> = Vec::new();
    for row in 0..total {
        if let Some(value) = rendered(ctx, row, col) {
            match counts.iter_mut().find(|(v, _)| *v == value) {
                Some((_, n)) => *n += 1,
                None => counts.push((value, 1)),
            }
        }
    }

    if counts.is_empty() {
        out.warning = Some(format!("No {} values found (all null/empty)", col));
        return out;
    }

    let mut expected = &counts[0];
    for entry in &counts[1..] {
        if entry.1 > expected.1 {
            expected = entry;
        }
    }
    let expected_value = expected.0.clone();

    for row in 0..total {
        match rendered(ctx, row, col) {
            Some(value) if value == expected_value => {}
            Some(value) => out.fail(
                row,
                format!("{} '{}' differs from expected '{}'", col, value, expected_value),
            ),
            None => out.fail(row, format!("{} is null (expected '{}')", col, expected_value)),
        }
    }

    out.message = Some(if out.failures.is_empty() {
        format!("All {} records have uniform {}: {}", total, col, expected_value)
    } else {
        format!(
            "Non-uniform {} values: {} distinct values found",
            col,
            counts.len()
        )
    });
    out
}

/// columns: UPC
pub fn upc_length(ctx: &RuleContext) -> RowOutcome {
    let col = ctx.subject();
    let total = ctx.table.row_count();
    let mut out = RowOutcome::new(total);

    for row in 0..total {
        match rendered(ctx, row, col) {
            None => out.fail(row, format!("{} is null/empty", col)),
            Some(value) => {
                let len = value.chars().count();
                if len != UPC_LENGTH {
                    out.fail(
                        row,
                        format!("{} '{}' has {} digits (expected {})", col, value, len, UPC_LENGTH),
                    );
                }
            }
        }
    }

    out.message = Some(if out.failures.is_empty() {
        format!("All {} UPCs are exactly {} digits", total, UPC_LENGTH)
    } else {
        format!(
            "Found {} UPCs with incorrect length (expected {} digits)",
            out.failures.len(),
            UPC_LENGTH
        )
    });
    out
}

/// columns: Order_Type
pub fn order_type_invalid(ctx: &RuleContext) -> RowOutcome {
    let col = ctx.subject();
    let total = ctx.table.row_count();
    let mut out = RowOutcome::new(total);

    for row in 0..total {
        if let Some(value) = rendered(ctx, row, col) {
            if ORDER_TYPE_INVALID.contains(&value.as_str()) {
                out.fail(row, format!("{} '{}' is not allowed", col, value));
            }
        }
    }

    out.message = Some(if out.failures.is_empty() {
        format!("All {} records have valid {} values", total, col)
    } else {
        format!(
            "Found {} records with invalid {} values ({})",
            out.failures.len(),
            col,
            ORDER_TYPE_INVALID.join(", ")
        )
    });
    out
}

/// columns: Peg_Hole_X, Width_Inches. Checked only when both are
/// positive.
pub fn peg_x_within_width(ctx: &RuleContext) -> RowOutcome {
    let x_col = &ctx.columns[0];
    let w_col = &ctx.columns[1];
    let total = ctx.table.row_count();
    let mut out = RowOutcome::new(total);

    for row in 0..total {
        if let (Some(x), Some(w)) = (num(ctx, row, x_col), num(ctx, row, w_col)) {
            if x > 0.0 && w > 0.0 && x >= w {
                out.fail(row, format!("{}={} must be less than {}={}", x_col, x, w_col, w));
            }
        }
    }

    out.message = Some(if out.failures.is_empty() {
        format!("All records have {} < {}", x_col, w_col)
    } else {
        format!(
            "Found {} records where {} >= {}",
            out.failures.len(),
            x_col,
            w_col
        )
    });
    out
}

/// columns: Peg_Hole_2X, Peg_Holes, Width_Inches. When the second peg
/// hole is set it must sit strictly between the first hole and the
/// width.
pub fn peg_2x_between(ctx: &RuleContext) -> RowOutcome {
    let x2_col = &ctx.columns[0];
    let first_col = &ctx.columns[1];
    let width_col = &ctx.columns[2];
    let total = ctx.table.row_count();
    let mut out = RowOutcome::new(total);

    for row in 0..total {
        let x2 = match num(ctx, row, x2_col) {
            Some(v) if v > 0.0 => v,
            _ => continue,
        };
        let first = num(ctx, row, first_col);
        let width = num(ctx, row, width_col);
        let ok = matches!((first, width), (Some(f), Some(w)) if f < x2 && x2 < w);
        if !ok {
            out.fail(
                row,
                format!(
                    "{}={} is not between {}={} and {}={}",
                    x2_col,
                    x2,
                    first_col,
                    fmt_opt(first),
                    width_col,
                    fmt_opt(width)
                ),
            );
        }
    }

    out.message = Some(if out.failures.is_empty() {
        format!("All records have correct {} positioning", x2_col)
    } else {
        format!(
            "Found {} records where {} is not between {} and {}",
            out.failures.len(),
            x2_col,
            first_col,
            width_col
        )
    });
    out
}

/// columns: subject dimension, other dimension, other dimension.
/// Null, zero and 1 fail; so does the all-dimensions-equal-2 pattern.
pub fn dimension_invalid(ctx: &RuleContext) -> RowOutcome {
    let col = ctx.subject();
    let total = ctx.table.row_count();
    let mut out = RowOutcome::new(total);

    for row in 0..total {
        let issue = match num(ctx, row, col) {
            None => Some("is null or zero"),
            Some(v) if v == 0.0 => Some("is null or zero"),
            Some(v) if v == 1.0 => Some("equals 1"),
            Some(v) if v == 2.0 => {
                let o1 = num(ctx, row, &ctx.columns[1]);
                let o2 = num(ctx, row, &ctx.columns[2]);
                if o1 == Some(2.0) && o2 == Some(2.0) {
                    Some("is 2 while all dimensions equal 2")
                } else {
                    None
                }
            }
            _ => None,
        };
        if let Some(issue) = issue {
            out.fail(row, format!("{} {}", col, issue));
        }
    }

    out.message = Some(if out.failures.is_empty() {
        format!("All {} records have valid {} values", total, col)
    } else {
        format!("Found {} records with invalid {}", out.failures.len(), col)
    });
    out
}

/// columns: subject. Must be < 1; null fails.
pub fn overhang_less_than_one(ctx: &RuleContext) -> RowOutcome {
    let col = ctx.subject();
    let total = ctx.table.row_count();
    let mut out = RowOutcome::new(total);

    for row in 0..total {
        match num(ctx, row, col) {
            None => out.fail(row, format!("{} is null (must be < 1)", col)),
            Some(v) if v >= 1.0 => out.fail(row, format!("{} = {} (must be < 1)", col, v)),
            _ => {}
        }
    }

    out.message = Some(if out.failures.is_empty() {
        format!("All {} records have {} < 1", total, col)
    } else {
        format!(
            "Found {} records where {} >= 1 or is null (must be < 1)",
            out.failures.len(),
            col
        )
    });
    out
}

/// columns: Peg_ID, then the peg hole columns. Any positive peg hole
/// requires a populated Peg_ID.
pub fn peg_id_required(ctx: &RuleContext) -> RowOutcome {
    let id_col = &ctx.columns[0];
    let total = ctx.table.row_count();
    let mut out = RowOutcome::new(total);

    for row in 0..total {
        let holes: Vec<String> = ctx.columns[1..]
            .iter()
            .filter_map(|col| {
                num(ctx, row, col)
                    .filter(|v| *v > 0.0)
                    .map(|v| format!("{}={}", col, v))
            })
            .collect();
        if holes.is_empty() {
            continue;
        }
        if is_blank(ctx, row, id_col) {
            out.fail(
                row,
                format!("Peg holes defined ({}) but {} is null", holes.join(", "), id_col),
            );
        }
    }

    out.message = Some(if out.failures.is_empty() {
        format!("All records with peg holes have {} defined", id_col)
    } else {
        format!(
            "Found {} records with peg holes but missing {}",
            out.failures.len(),
            id_col
        )
    });
    out
}

/// columns: Has_Alt_UPC. Populated values always fail; a supplied
/// reference only enriches the outcome with what the reference
/// expects, never changes the verdict.
pub fn alt_upc_must_be_null(ctx: &RuleContext) -> RowOutcome {
    let col = ctx.subject();
    let total = ctx.table.row_count();
    let mut out = RowOutcome::new(total);

    for row in 0..total {
        if let Some(value) = rendered(ctx, row, col) {
            out.fail(row, format!("{} = '{}' (must be null)", col, value));
        }
    }

    if !out.failures.is_empty() {
        if let Some(reference) = ctx.reference {
            if reference.has_column(col) {
                let mut values: Vec<String> = Vec::new();
                for row in 0..reference.row_count() {
                    if let Some(value) = reference.value(row, col) {
                        if !value.is_null() {
                            let norm = value.to_string().trim().to_lowercase();
                            if !values.contains(&norm) {
                                values.push(norm);
                            }
                        }
                    }
                }
                out.note = Some(if values.iter().all(|v| v == "no") {
                    "reference expects no alternate UPCs".to_string()
                } else {
                    format!("reference {} values: {}", col, values.join(", "))
                });
            } else {
                out.note = Some(format!("reference file has no {} column", col));
            }
        }
    }

    out.message = Some(if out.failures.is_empty() {
        format!("All {} records have {} = null", total, col)
    } else {
        format!(
            "Found {} records with non-null {} (must be null)",
            out.failures.len(),
            col
        )
    });
    out
}

// ===== planogram checks =====

/// columns: the four Print fields. A row fails when any is blank.
pub fn print_fields_populated(ctx: &RuleContext) -> RowOutcome {
    let total = ctx.table.row_count();
    let mut out = RowOutcome::new(total);

    for row in 0..total {
        let missing: Vec<&str> = ctx
            .columns
            .iter()
            .filter(|col| is_blank(ctx, row, col))
            .map(|col| col.as_str())
            .collect();
        if !missing.is_empty() {
            out.fail(row, format!("Missing {}", missing.join(", ")));
        }
    }

    out.message = Some(if out.failures.is_empty() {
        format!(
            "All {} records have all {} Print fields populated",
            total,
            ctx.columns.len()
        )
    } else {
        format!(
            "{} of {} records missing Print field values",
            out.failures.len(),
            total
        )
    });
    out
}

/// columns: Footage, Width_Feet. Null on either side fails.
pub fn footage_matches_width_feet(ctx: &RuleContext) -> RowOutcome {
    let f_col = &ctx.columns[0];
    let w_col = &ctx.columns[1];
    let total = ctx.table.row_count();
    let mut out = RowOutcome::new(total);

    for row in 0..total {
        let footage = num(ctx, row, f_col);
        let width_feet = num(ctx, row, w_col);
        match (footage, width_feet) {
            (Some(f), Some(w)) => {
                if (f - w).abs() > ctx.tolerance {
                    out.fail(row, format!("{}={} does not match {}={}", f_col, f, w_col, w));
                }
            }
            _ => out.fail(
                row,
                format!(
                    "one or both values are null ({}={}, {}={})",
                    f_col,
                    fmt_opt(footage),
                    w_col,
                    fmt_opt(width_feet)
                ),
            ),
        }
    }

    out.message = Some(if out.failures.is_empty() {
        format!("All {} records have matching {} and {}", total, f_col, w_col)
    } else {
        format!(
            "{} of {} records have mismatched {}/{}",
            out.failures.len(),
            total,
            f_col,
            w_col
        )
    });
    out
}

/// columns: Modular_Description. Letters, digits and whitespace only;
/// null rows are skipped.
pub fn alphanumeric_only(ctx: &RuleContext) -> RowOutcome {
    let col = ctx.subject();
    let total = ctx.table.row_count();
    let mut out = RowOutcome::new(total);

    for row in 0..total {
        if let Some(value) = rendered(ctx, row, col) {
            let mut special: Vec<char> = Vec::new();
            for c in value.chars() {
                if !c.is_ascii_alphanumeric() && !c.is_whitespace() && !special.contains(&c) {
                    special.push(c);
                }
            }
            if !special.is_empty() {
                let chars: Vec<String> = special.iter().map(|c| c.to_string()).collect();
                out.fail(
                    row,
                    format!("'{}' contains special characters: {}", value, chars.join(", ")),
                );
            }
        }
    }

    out.message = Some(if out.failures.is_empty() {
        format!("All {} records have alphanumeric {}", total, col)
    } else {
        format!(
            "{} of {} records have special characters in {}",
            out.failures.len(),
            total,
            col
        )
    });
    out
}

// ===== fixture checks =====

/// Table-level. Verifies extraction saw a non-empty group whose
/// records all carried the expected field count.
pub fn field_count(ctx: &RuleContext) -> TableOutcome {
    let stats = ctx.stats;
    let record_type = ctx.table.record_type.as_str();

    if stats.records_in == 0 {
        return TableOutcome {
            ok: false,
            message: format!("Field_Count_Error: no {} records found", record_type),
            error_count: 1,
            pass_count: 0,
            details: vec![format!("PSA content contains no {} records", record_type)],
        };
    }
    if stats.mismatched_records > 0 {
        return TableOutcome {
            ok: false,
            message: format!(
                "Field_Count_Error: expected {} fields, {} records differ",
                stats.expected_field_count, stats.mismatched_records
            ),
            error_count: stats.mismatched_records,
            pass_count: stats.records_in - stats.mismatched_records,
            details: vec![format!(
                "Field count mismatch: expected {}, {} of {} records differ",
                stats.expected_field_count, stats.mismatched_records, stats.records_in
            )],
        };
    }
    TableOutcome {
        ok: true,
        message: format!("Field count validated: {} fields", stats.expected_field_count),
        error_count: 0,
        pass_count: stats.records_in,
        details: vec![format!(
            "All {} records have {} fields",
            stats.records_in, stats.expected_field_count
        )],
    }
}

/// columns: Name. Blank names fail; every occurrence of a duplicated
/// name fails.
pub fn unique_name(ctx: &RuleContext) -> RowOutcome {
    let col = ctx.subject();
    let total = ctx.table.row_count();
    let mut out = RowOutcome::new(total);

    let mut counts: Vec<(String, usize)> = Vec::new();
    for row in 0..total {
        if let Some(name) = rendered(ctx, row, col) {
            match counts.iter_mut().find(|(n, _)| *n == name) {
                Some((_, c)) => *c += 1,
                None => counts.push((name, 1)),
            }
        }
    }

    for row in 0..total {
        match rendered(ctx, row, col) {
            None => out.fail(row, format!("{} is empty/blank", col)),
            Some(name) => {
                let occurrences = counts
                    .iter()
                    .find(|(n, _)| *n == name)
                    .map(|(_, c)| *c)
                    .unwrap_or(0);
                if occurrences > 1 {
                    out.fail(
                        row,
                        format!("Duplicate name '{}' (appears {} times)", name, occurrences),
                    );
                }
            }
        }
    }

    out.message = Some(if out.failures.is_empty() {
        format!("All {} fixtures have unique, non-empty names", total)
    } else {
        format!(
            "{} of {} fixtures have empty or duplicate names",
            out.failures.len(),
            total
        )
    });
    out
}

/// columns: Type, Width, Depth. Null dimensions fail for every type;
/// listed types must match their expected dimensions.
pub fn type_dimensions(ctx: &RuleContext) -> RowOutcome {
    let type_col = &ctx.columns[0];
    let width_col = &ctx.columns[1];
    let depth_col = &ctx.columns[2];
    let total = ctx.table.row_count();
    let mut out = RowOutcome::new(total);

    for row in 0..total {
        let (width, depth) = match (num(ctx, row, width_col), num(ctx, row, depth_col)) {
            (Some(w), Some(d)) => (w, d),
            _ => {
                out.fail(row, format!("{}/{} is null or blank", width_col, depth_col));
                continue;
            }
        };
        let kind = rendered(ctx, row, type_col).unwrap_or_default();
        if let Some(&(_, expected_width, expected_depth)) =
            TYPE_DIMENSIONS.iter().find(|(t, _, _)| *t == kind)
        {
            if (width - expected_width).abs() > ctx.tolerance
                || (depth - expected_depth).abs() > ctx.tolerance
            {
                out.fail(
                    row,
                    format!(
                        "{}: expected {}={}, {}={}, found {}, {}",
                        kind, width_col, expected_width, depth_col, expected_depth, width, depth
                    ),
                );
            }
        }
    }

    out.message = Some(if out.failures.is_empty() {
        format!("All {} fixtures have correct dimensions for their {}", total, type_col)
    } else {
        format!(
            "{} of {} fixtures have incorrect dimensions for their {}",
            out.failures.len(),
            total,
            type_col
        )
    });
    out
}

/// columns: Y, Notch. Fails when both are populated and equal;
/// numeric comparison when the Notch text parses as a number.
pub fn y_not_equal_notch(ctx: &RuleContext) -> RowOutcome {
    let y_col = &ctx.columns[0];
    let notch_col = &ctx.columns[1];
    let total = ctx.table.row_count();
    let mut out = RowOutcome::new(total);

    for row in 0..total {
        let y_text = rendered(ctx, row, y_col);
        let notch_text = rendered(ctx, row, notch_col);
        if let (Some(y_text), Some(notch_text)) = (y_text, notch_text) {
            let equal = match (y_text.parse::<f64>(), notch_text.parse::<f64>()) {
                (Ok(a), Ok(b)) => a == b,
                _ => y_text == notch_text,
            };
            if equal {
                out.fail(
                    row,
                    format!("{} ({}) equals {} ({})", y_col, y_text, notch_col, notch_text),
                );
            }
        }
    }

    out.message = Some(if out.failures.is_empty() {
        format!("All {} fixtures have {} != {}", total, y_col, notch_col)
    } else {
        format!(
            "{} of {} fixtures have {} = {} (not allowed)",
            out.failures.len(),
            total,
            y_col,
            notch_col
        )
    });
    out
}

fn is_deck(name: &str) -> bool {
    name.to_uppercase().starts_with(DECK_PREFIX)
}

/// columns: Type, Name, Y. DECK shelves must sit at Y = 5.75.
pub fn deck_shelf_y(ctx: &RuleContext) -> RowOutcome {
    let type_col = &ctx.columns[0];
    let name_col = &ctx.columns[1];
    let y_col = &ctx.columns[2];
    let total = ctx.table.row_count();
    let mut out = RowOutcome::new(total);
    let mut deck_count = 0usize;

    for row in 0..total {
        let kind = rendered(ctx, row, type_col).unwrap_or_default();
        let name = rendered(ctx, row, name_col).unwrap_or_default();
        if kind != "Shelf" || !is_deck(&name) {
            continue;
        }
        deck_count += 1;
        match num(ctx, row, y_col) {
            None => out.fail(
                row,
                format!("{}: {} is null or blank (expected {})", name, y_col, DECK_SHELF_Y),
            ),
            Some(y) if (y - DECK_SHELF_Y).abs() > ctx.tolerance => out.fail(
                row,
                format!("{}: {} = {} (expected {})", name, y_col, y, DECK_SHELF_Y),
            ),
            _ => {}
        }
    }

    if deck_count == 0 {
        out.message = Some("No DECK Shelves found (validation skipped)".to_string());
    } else {
        out.inspected = deck_count;
        out.message = Some(if out.failures.is_empty() {
            format!("All {} DECK Shelves have {} = {}", deck_count, y_col, DECK_SHELF_Y)
        } else {
            format!(
                "{} of {} DECK Shelves have {} != {}",
                out.failures.len(),
                deck_count,
                y_col,
                DECK_SHELF_Y
            )
        });
    }
    out
}

/// columns: Type, Name, Z. DECK shelves carry Z = 0.25, all other
/// shelves 1.25.
pub fn shelf_z(ctx: &RuleContext) -> RowOutcome {
    let type_col = &ctx.columns[0];
    let name_col = &ctx.columns[1];
    let z_col = &ctx.columns[2];
    let total = ctx.table.row_count();
    let mut out = RowOutcome::new(total);
    let mut shelf_count = 0usize;

    for row in 0..total {
        let kind = rendered(ctx, row, type_col).unwrap_or_default();
        if kind != "Shelf" {
            continue;
        }
        shelf_count += 1;
        let name = rendered(ctx, row, name_col).unwrap_or_default();
        let (expected, label) = if is_deck(&name) {
            (SHELF_Z_DECK, "DECK Shelf")
        } else {
            (SHELF_Z_STANDARD, "Non-DECK Shelf")
        };
        match num(ctx, row, z_col) {
            None => out.fail(
                row,
                format!("{}: {} is null or blank (expected {})", name, z_col, expected),
            ),
            Some(z) if (z - expected).abs() > ctx.tolerance => out.fail(
                row,
                format!("{}: {}: {} = {} (expected {})", name, label, z_col, z, expected),
            ),
            _ => {}
        }
    }

    if shelf_count == 0 {
        out.message = Some("No Shelves found (validation skipped)".to_string());
    } else {
        out.inspected = shelf_count;
        out.message = Some(if out.failures.is_empty() {
            format!(
                "All {} Shelves have correct {} values (DECK={}, Non-DECK={})",
                shelf_count, z_col, SHELF_Z_DECK, SHELF_Z_STANDARD
            )
        } else {
            format!(
                "{} of {} Shelves have incorrect {} values",
                out.failures.len(),
                shelf_count,
                z_col
            )
        });
    }
    out
}

/// columns: Type, then the overhang columns. Shelves must carry zero
/// overhangs; null fails.
pub fn shelf_overhangs(ctx: &RuleContext) -> RowOutcome {
    let type_col = &ctx.columns[0];
    let total = ctx.table.row_count();
    let mut out = RowOutcome::new(total);
    let mut shelf_count = 0usize;

    for row in 0..total {
        let kind = rendered(ctx, row, type_col).unwrap_or_default();
        if kind != "Shelf" {
            continue;
        }
        shelf_count += 1;
        let mut problems: Vec<String> = Vec::new();
        for col in &ctx.columns[1..] {
            match num(ctx, row, col) {
                None => problems.push(format!("{} is null/blank", col)),
                Some(v) if v.abs() > ctx.tolerance => problems.push(format!("{}={}", col, v)),
                _ => {}
            }
        }
        if !problems.is_empty() {
            out.fail(row, problems.join(", "));
        }
    }

    if shelf_count == 0 {
        out.message = Some("No Shelves found (validation skipped)".to_string());
    } else {
        out.inspected = shelf_count;
        out.message = Some(if out.failures.is_empty() {
            format!("All {} Shelves have zero Left/Right/Front overhangs", shelf_count)
        } else {
            format!(
                "{} of {} Shelves have non-zero overhangs",
                out.failures.len(),
                shelf_count
            )
        });
    }
    out
}

/// columns: Type, Name, Back_Overhang. DECK shelves carry 0, all
/// other shelves 1.25.
pub fn shelf_back_overhang(ctx: &RuleContext) -> RowOutcome {
    let type_col = &ctx.columns[0];
    let name_col = &ctx.columns[1];
    let back_col = &ctx.columns[2];
    let total = ctx.table.row_count();
    let mut out = RowOutcome::new(total);
    let mut shelf_count = 0usize;

    for row in 0..total {
        let kind = rendered(ctx, row, type_col).unwrap_or_default();
        if kind != "Shelf" {
            continue;
        }
        shelf_count += 1;
        let name = rendered(ctx, row, name_col).unwrap_or_default();
        let (expected, label) = if is_deck(&name) {
            (BACK_OVERHANG_DECK, "DECK Shelf")
        } else {
            (BACK_OVERHANG_STANDARD, "Non-DECK Shelf")
        };
        match num(ctx, row, back_col) {
            None => out.fail(
                row,
                format!("{}: {} is null or blank (expected {})", name, back_col, expected),
            ),
            Some(v) if (v - expected).abs() > ctx.tolerance => out.fail(
                row,
                format!("{}: {}: {} = {} (expected {})", name, label, back_col, v, expected),
            ),
            _ => {}
        }
    }

    if shelf_count == 0 {
        out.message = Some("No Shelves found (validation skipped)".to_string());
    } else {
        out.inspected = shelf_count;
        out.message = Some(if out.failures.is_empty() {
            format!(
                "All {} Shelves have correct {} values (DECK={}, Non-DECK={})",
                shelf_count, back_col, BACK_OVERHANG_DECK, BACK_OVERHANG_STANDARD
            )
        } else {
            format!(
                "{} of {} Shelves have incorrect {} values",
                out.failures.len(),
                shelf_count,
                back_col
            )
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CellValue, RecordType, Row, Table};
    use crate::extract::ExtractionStats;
    use crate::validate::rule::RuleContext;

    fn text(v: &str) -> CellValue {
        CellValue::Text(v.to_string())
    }

    fn number(v: f64) -> CellValue {
        CellValue::Number(v)
    }

    fn make_table(columns: &[&str], rows: Vec<Vec<CellValue>>) -> Table {
        let mut table = Table::new(
            RecordType::fixture(),
            columns.iter().map(|c| c.to_string()).collect(),
        );
        for (i, values) in rows.into_iter().enumerate() {
            table.push_row(Row {
                values,
                annotations: Vec::new(),
                source_line: i + 4,
            });
        }
        table
    }

    struct Harness {
        table: Table,
        reference: Option<Table>,
        stats: ExtractionStats,
        columns: Vec<String>,
    }

    impl Harness {
        fn new(table: Table, columns: &[&str]) -> Self {
            let stats = ExtractionStats {
                records_in: table.row_count(),
                rows_out: table.row_count(),
                expected_field_count: 166,
                mismatched_records: 0,
                annotated_cells: 0,
            };
            Harness {
                table,
                reference: None,
                stats,
                columns: columns.iter().map(|c| c.to_string()).collect(),
            }
        }

        fn with_reference(mut self, reference: Table) -> Self {
            self.reference = Some(reference);
            self
        }

        fn ctx(&self) -> RuleContext<'_> {
            RuleContext {
                table: &self.table,
                reference: self.reference.as_ref(),
                stats: &self.stats,
                tolerance: 0.01,
                columns: &self.columns,
            }
        }
    }

    fn failed_rows(out: &RowOutcome) -> Vec<usize> {
        out.failures.iter().map(|f| f.row).collect()
    }

    // ===== generic checks =====

    #[test]
    fn test_not_null_flags_blank_rows() {
        let table = make_table(
            &["Drawing_ID"],
            vec![vec![text("00123")], vec![CellValue::Null], vec![text("00456")]],
        );
        let h = Harness::new(table, &["Drawing_ID"]);
        let out = not_null(&h.ctx());
        assert_eq!(failed_rows(&out), vec![1]);
        assert_eq!(out.inspected, 3);
    }

    #[test]
    fn test_must_equal_one() {
        let table = make_table(
            &["Squeeze_High"],
            vec![
                vec![number(1.0)],
                vec![number(0.0)],
                vec![CellValue::Null],
                vec![number(2.0)],
            ],
        );
        let h = Harness::new(table, &["Squeeze_High"]);
        let out = must_equal_one(&h.ctx());
        assert_eq!(failed_rows(&out), vec![1, 2, 3]);
    }

    #[test]
    fn test_reference_membership_without_reference_notes_skip() {
        let table = make_table(&["Department"], vec![vec![text("014")], vec![CellValue::Null]]);
        let h = Harness::new(table, &["Department"]);
        let out = reference_membership(&h.ctx());
        // Null still fails the not-null half
        assert_eq!(failed_rows(&out), vec![1]);
        assert!(out.note.as_deref().unwrap().contains("reference not provided"));
    }

    #[test]
    fn test_reference_membership_strips_leading_zeros() {
        let table = make_table(
            &["Department"],
            vec![vec![text("014")], vec![text("99")]],
        );
        let reference = make_table(&["Department"], vec![vec![text("14")]]);
        let h = Harness::new(table, &["Department"]).with_reference(reference);
        let out = reference_membership(&h.ctx());
        assert_eq!(failed_rows(&out), vec![1]);
        assert!(out.failures[0].message.contains("'99'"));
    }

    // ===== product checks =====

    #[test]
    fn test_relay_uniformity_pass() {
        let table = make_table(&["Relay_ID"], vec![vec![text("R1")], vec![text("R1")]]);
        let h = Harness::new(table, &["Relay_ID"]);
        let out = relay_uniformity(&h.ctx());
        assert!(out.failures.is_empty());
        assert!(out.message.as_deref().unwrap().contains("uniform"));
    }

    #[test]
    fn test_relay_uniformity_flags_minority_and_nulls() {
        let table = make_table(
            &["Relay_ID"],
            vec![
                vec![text("R1")],
                vec![text("R1")],
                vec![text("R2")],
                vec![CellValue::Null],
            ],
        );
        let h = Harness::new(table, &["Relay_ID"]);
        let out = relay_uniformity(&h.ctx());
        assert_eq!(failed_rows(&out), vec![2, 3]);
    }

    #[test]
    fn test_relay_uniformity_all_null_is_warning() {
        let table = make_table(&["Relay_ID"], vec![vec![CellValue::Null], vec![CellValue::Null]]);
        let h = Harness::new(table, &["Relay_ID"]);
        let out = relay_uniformity(&h.ctx());
        assert!(out.failures.is_empty());
        assert!(out.warning.is_some());
    }

    #[test]
    fn test_upc_length() {
        let table = make_table(
            &["UPC"],
            vec![
                vec![text("0001234567890")],
                vec![text("12345")],
                vec![CellValue::Null],
            ],
        );
        let h = Harness::new(table, &["UPC"]);
        let out = upc_length(&h.ctx());
        assert_eq!(failed_rows(&out), vec![1, 2]);
    }

    #[test]
    fn test_order_type_invalid_exact_match() {
        let table = make_table(
            &["Order_Type"],
            vec![vec![text("43")], vec![text("40")], vec![text("3")]],
        );
        let h = Harness::new(table, &["Order_Type"]);
        let out = order_type_invalid(&h.ctx());
        assert_eq!(failed_rows(&out), vec![0, 2]);
    }

    #[test]
    fn test_peg_x_within_width() {
        let table = make_table(
            &["Peg_Hole_X", "Width_Inches"],
            vec![
                vec![number(5.0), number(4.0)],  // exceeds width
                vec![number(2.0), number(4.0)],  // fine
                vec![number(0.0), number(4.0)],  // zero: skipped
                vec![CellValue::Null, number(4.0)], // null: skipped
            ],
        );
        let h = Harness::new(table, &["Peg_Hole_X", "Width_Inches"]);
        let out = peg_x_within_width(&h.ctx());
        assert_eq!(failed_rows(&out), vec![0]);
    }

    #[test]
    fn test_peg_2x_between() {
        let table = make_table(
            &["Peg_Hole_2X", "Peg_Holes", "Width_Inches"],
            vec![
                vec![number(3.0), number(1.0), number(5.0)], // between
                vec![number(6.0), number(1.0), number(5.0)], // beyond width
                vec![number(3.0), CellValue::Null, number(5.0)], // missing first hole
                vec![number(0.0), number(1.0), number(5.0)], // zero: skipped
            ],
        );
        let h = Harness::new(table, &["Peg_Hole_2X", "Peg_Holes", "Width_Inches"]);
        let out = peg_2x_between(&h.ctx());
        assert_eq!(failed_rows(&out), vec![1, 2]);
    }

    #[test]
    fn test_dimension_invalid() {
        let columns = ["Height_Inches", "Width_Inches", "Depth_Inches"];
        let table = make_table(
            &columns,
            vec![
                vec![CellValue::Null, number(5.0), number(5.0)], // null
                vec![number(0.0), number(5.0), number(5.0)],     // zero
                vec![number(1.0), number(5.0), number(5.0)],     // one
                vec![number(2.0), number(2.0), number(2.0)],     // all dims 2
                vec![number(2.0), number(3.0), number(2.0)],     // 2 but not all
                vec![number(5.0), number(5.0), number(5.0)],     // valid
            ],
        );
        let h = Harness::new(table, &columns);
        let out = dimension_invalid(&h.ctx());
        assert_eq!(failed_rows(&out), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_overhang_less_than_one() {
        let table = make_table(
            &["Front_Overhang_Inches"],
            vec![vec![number(0.5)], vec![number(1.0)], vec![CellValue::Null]],
        );
        let h = Harness::new(table, &["Front_Overhang_Inches"]);
        let out = overhang_less_than_one(&h.ctx());
        assert_eq!(failed_rows(&out), vec![1, 2]);
    }

    #[test]
    fn test_peg_id_required() {
        let columns = ["Peg_ID", "Peg_Holes", "Peg_Hole_X"];
        let table = make_table(
            &columns,
            vec![
                vec![CellValue::Null, number(1.5), CellValue::Null], // holes, no id
                vec![text("PEG-1"), number(1.5), number(2.0)],       // holes with id
                vec![CellValue::Null, CellValue::Null, number(0.0)], // no holes
            ],
        );
        let h = Harness::new(table, &columns);
        let out = peg_id_required(&h.ctx());
        assert_eq!(failed_rows(&out), vec![0]);
    }

    #[test]
    fn test_alt_upc_must_be_null() {
        let table = make_table(&["Has_Alt_UPC"], vec![vec![CellValue::Null], vec![text("Y")]]);
        let h = Harness::new(table, &["Has_Alt_UPC"]);
        let out = alt_upc_must_be_null(&h.ctx());
        assert_eq!(failed_rows(&out), vec![1]);
        assert!(out.note.is_none());
    }

    #[test]
    fn test_alt_upc_reference_enriches_but_never_decides() {
        let table = make_table(&["Has_Alt_UPC"], vec![vec![text("Y")]]);
        let reference = make_table(&["Has_Alt_UPC"], vec![vec![text("Yes")]]);
        let h = Harness::new(table, &["Has_Alt_UPC"]).with_reference(reference);
        let out = alt_upc_must_be_null(&h.ctx());
        // Still a failure, with reference context attached
        assert_eq!(out.failures.len(), 1);
        assert!(out.note.as_deref().unwrap().contains("yes"));
    }

    // ===== planogram checks =====

    #[test]
    fn test_print_fields_populated() {
        let columns = ["Print_1", "Print_2", "Print_3", "Print_4"];
        let table = make_table(
            &columns,
            vec![
                vec![text("a"), text("b"), text("c"), text("d")],
                vec![text("a"), CellValue::Null, text("c"), CellValue::Null],
            ],
        );
        let h = Harness::new(table, &columns);
        let out = print_fields_populated(&h.ctx());
        assert_eq!(failed_rows(&out), vec![1]);
        assert!(out.failures[0].message.contains("Print_2, Print_4"));
    }

    #[test]
    fn test_footage_matches_width_feet_tolerance() {
        let table = make_table(
            &["Footage", "Width_Feet"],
            vec![
                vec![number(28.0), number(28.0)],
                vec![number(28.0), number(28.005)], // inside tolerance
                vec![number(28.0), number(28.02)],  // outside tolerance
                vec![CellValue::Null, number(28.0)],
            ],
        );
        let h = Harness::new(table, &["Footage", "Width_Feet"]);
        let out = footage_matches_width_feet(&h.ctx());
        assert_eq!(failed_rows(&out), vec![2, 3]);
    }

    #[test]
    fn test_alphanumeric_only() {
        let table = make_table(
            &["Modular_Description"],
            vec![
                vec![text("SEASONAL CANDY 12")],
                vec![text("SEAS@NAL #1")],
                vec![CellValue::Null], // nulls skipped
            ],
        );
        let h = Harness::new(table, &["Modular_Description"]);
        let out = alphanumeric_only(&h.ctx());
        assert_eq!(failed_rows(&out), vec![1]);
        assert!(out.failures[0].message.contains('@'));
    }

    // ===== fixture checks =====

    #[test]
    fn test_field_count_empty_group_fails() {
        let table = make_table(&["Name"], vec![]);
        let mut h = Harness::new(table, &[]);
        h.stats.records_in = 0;
        h.stats.rows_out = 0;
        let out = field_count(&h.ctx());
        assert!(!out.ok);
        assert_eq!(out.error_count, 1);
    }

    #[test]
    fn test_field_count_clean_extraction_passes() {
        let table = make_table(&["Name"], vec![vec![text("A")], vec![text("B")]]);
        let h = Harness::new(table, &[]);
        let out = field_count(&h.ctx());
        assert!(out.ok);
        assert_eq!(out.pass_count, 2);
    }

    #[test]
    fn test_unique_name_duplicates_and_blanks() {
        let table = make_table(
            &["Name"],
            vec![
                vec![text("SHELF 1")],
                vec![text("SHELF 1")],
                vec![CellValue::Null],
                vec![text("SHELF 2")],
            ],
        );
        let h = Harness::new(table, &["Name"]);
        let out = unique_name(&h.ctx());
        assert_eq!(failed_rows(&out), vec![0, 1, 2]);
    }

    #[test]
    fn test_type_dimensions() {
        let columns = ["Type", "Width", "Depth"];
        let table = make_table(
            &columns,
            vec![
                vec![text("Shelf"), number(48.0), number(24.0)], // exact
                vec![text("Shelf"), number(47.0), number(24.0)], // wrong width
                vec![text("Obstruction"), CellValue::Null, number(9.0)], // null fails any type
                vec![text("Obstruction"), number(99.0), number(99.0)], // no expectation
                vec![text("Pegboard"), number(46.0), number(0.25)], // exact
            ],
        );
        let h = Harness::new(table, &columns);
        let out = type_dimensions(&h.ctx());
        assert_eq!(failed_rows(&out), vec![1, 2]);
    }

    #[test]
    fn test_y_not_equal_notch_numeric_and_text() {
        let columns = ["Y", "Notch"];
        let table = make_table(
            &columns,
            vec![
                vec![number(4.0), text("4")],    // numerically equal
                vec![number(5.75), text("5.8")], // different
                vec![number(4.0), CellValue::Null], // null skipped
                vec![number(4.0), text("ABC")],  // text compare, different
            ],
        );
        let h = Harness::new(table, &columns);
        let out = y_not_equal_notch(&h.ctx());
        assert_eq!(failed_rows(&out), vec![0]);
    }

    #[test]
    fn test_deck_shelf_y_skips_when_no_decks() {
        let columns = ["Type", "Name", "Y"];
        let table = make_table(
            &columns,
            vec![vec![text("Shelf"), text("TOP SHELF"), number(60.0)]],
        );
        let h = Harness::new(table, &columns);
        let out = deck_shelf_y(&h.ctx());
        assert!(out.failures.is_empty());
        assert!(out.message.as_deref().unwrap().contains("skipped"));
        assert_eq!(out.inspected, 1);
    }

    #[test]
    fn test_deck_shelf_y_checks_deck_rows_only() {
        let columns = ["Type", "Name", "Y"];
        let table = make_table(
            &columns,
            vec![
                vec![text("Shelf"), text("DECK SHELF A"), number(5.75)],
                vec![text("Shelf"), text("deck shelf b"), number(6.0)],
                vec![text("Rod"), text("DECK ROD"), number(9.0)], // not a shelf
            ],
        );
        let h = Harness::new(table, &columns);
        let out = deck_shelf_y(&h.ctx());
        assert_eq!(failed_rows(&out), vec![1]);
        assert_eq!(out.inspected, 2);
    }

    #[test]
    fn test_shelf_z_deck_vs_standard() {
        let columns = ["Type", "Name", "Z"];
        let table = make_table(
            &columns,
            vec![
                vec![text("Shelf"), text("DECK SHELF"), number(0.25)],
                vec![text("Shelf"), text("TOP SHELF"), number(0.25)], // should be 1.25
                vec![text("Shelf"), text("MID SHELF"), number(1.25)],
            ],
        );
        let h = Harness::new(table, &columns);
        let out = shelf_z(&h.ctx());
        assert_eq!(failed_rows(&out), vec![1]);
        assert_eq!(out.inspected, 3);
    }

    #[test]
    fn test_shelf_overhangs() {
        let columns = ["Type", "Left_Overhang", "Right_Overhang", "Front_Overhang"];
        let table = make_table(
            &columns,
            vec![
                vec![text("Shelf"), number(0.0), number(0.0), number(0.0)],
                vec![text("Shelf"), number(0.5), number(0.0), CellValue::Null],
                vec![text("Rod"), number(9.0), number(9.0), number(9.0)], // not a shelf
            ],
        );
        let h = Harness::new(table, &columns);
        let out = shelf_overhangs(&h.ctx());
        assert_eq!(failed_rows(&out), vec![1]);
        assert!(out.failures[0].message.contains("Left_Overhang=0.5"));
        assert!(out.failures[0].message.contains("Front_Overhang is null"));
    }

    #[test]
    fn test_shelf_back_overhang() {
        let columns = ["Type", "Name", "Back_Overhang"];
        let table = make_table(
            &columns,
            vec![
                vec![text("Shelf"), text("DECK SHELF"), number(0.0)],
                vec![text("Shelf"), text("DECK SHELF 2"), number(1.25)], // deck expects 0
                vec![text("Shelf"), text("TOP SHELF"), number(1.25)],
            ],
        );
        let h = Harness::new(table, &columns);
        let out = shelf_back_overhang(&h.ctx());
        assert_eq!(failed_rows(&out), vec![1]);
    }
}
