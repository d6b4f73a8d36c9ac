// ==========================================
// PSA Extraction & Validation Engine - Derived Planogram Columns
// ==========================================
// Pure, null-propagating computations over already-mapped values.
// A missing input yields null, never an error.
// ==========================================

/// Width_Inches / 12. Null when the width is missing or zero.
pub fn width_feet(width_inches: Option<f64>) -> Option<f64> {
    match width_inches {
        Some(w) if w != 0.0 => Some(w / 12.0),
        _ => None,
    }
}

/// Width_Feet / 4. Null when the input is missing or zero.
pub fn segments(width_feet: Option<f64>) -> Option<f64> {
    match width_feet {
        Some(w) if w != 0.0 => Some(w / 4.0),
        _ => None,
    }
}

/// All digit characters of the file name in order, truncated to the
/// first five. Null when the name carries no digits.
pub fn drawing_id(file_name: Option<&str>) -> Option<String> {
    let digits: String = file_name?
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(5)
        .collect();
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}

/// Characters 5..8 of the file name, as a number, when the name is at
/// least 8 characters long.
pub fn footage(file_name: Option<&str>) -> Option<f64> {
    let chars: Vec<char> = file_name?.chars().collect();
    if chars.len() < 8 {
        return None;
    }
    let slice: String = chars[5..8].iter().collect();
    slice.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// The leading digit run immediately after the first underscore. Null
/// when there is no underscore or no digit directly follows it.
pub fn trait_number(file_name: Option<&str>) -> Option<String> {
    let name = file_name?;
    let after = &name[name.find('_')? + 1..];
    let run: String = after.chars().take_while(|c| c.is_ascii_digit()).collect();
    if run.is_empty() {
        None
    } else {
        Some(run)
    }
}
