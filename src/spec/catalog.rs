// ==========================================
// PSA Extraction & Validation Engine - Built-in Catalog
// ==========================================
// The fixed Product / Planogram / Fixture contracts: raw field
// counts, canonical column sets and rule sets. Positions are
// zero-based raw field indices with the marker at position 0.
// ==========================================

use crate::domain::RecordType;
use crate::spec::column::{ColumnSpec, ColumnType, DerivedColumn};
use crate::spec::content::ContentKind;
use crate::spec::record_spec::RecordTypeSpec;
use crate::validate::checks;
use crate::validate::rule::ValidationRule;

pub const PRODUCT_FIELD_COUNT: usize = 274;
pub const PLANOGRAM_FIELD_COUNT: usize = 274;
pub const FIXTURE_FIELD_COUNT: usize = 166;

/// Tolerance shared by all dimension comparisons.
pub const DIMENSION_TOLERANCE: f64 = 0.01;

pub fn standard_specs() -> Vec<RecordTypeSpec> {
    vec![product_spec(), planogram_spec(), fixture_spec()]
}

// ===== Product =====

pub fn product_spec() -> RecordTypeSpec {
    RecordTypeSpec::new(RecordType::product(), PRODUCT_FIELD_COUNT)
        .with_marker("Product")
        .with_columns(product_columns())
        .with_rules(product_rules())
}

fn product_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::text("Table_Name", 0),
        ColumnSpec::text("UPC", 1),
        ColumnSpec::text("Item_Number", 2),
        ColumnSpec::text("Item_1_Description", 3),
        ColumnSpec::number("Width_Inches", 5),
        ColumnSpec::number("Height_Inches", 6),
        ColumnSpec::number("Depth_Inches", 7),
        ColumnSpec::text("Color", 8),
        ColumnSpec::text("Manufacturer", 12),
        ColumnSpec::number("Y_Nesting", 17),
        ColumnSpec::number("Z_Nesting", 18),
        ColumnSpec::number("Peg_Holes", 19),
        ColumnSpec::number("Peg_Hole_X", 20),
        ColumnSpec::number("Peg_Hole_Y", 21),
        ColumnSpec::number("Peg_Hole_2X", 23),
        ColumnSpec::number("Peg_Hole_2Y", 24),
        ColumnSpec::text("Peg_ID", 30),
        ColumnSpec::text("Shape_ID", 44),
        ColumnSpec::text("Bitmap_ID_Override", 45),
        ColumnSpec::number("Tray_Width", 46),
        ColumnSpec::number("Tray_Height", 47),
        ColumnSpec::number("Tray_Depth", 48),
        ColumnSpec::number("Tray_Wide", 49),
        ColumnSpec::number("Tray_High", 50),
        ColumnSpec::number("Tray_Deep", 51),
        ColumnSpec::number("Tray_Total_#", 52),
        ColumnSpec::number("Case_Width", 54),
        ColumnSpec::number("Case_Height", 55),
        ColumnSpec::number("Case_Depth", 56),
        ColumnSpec::number("Case_Pack", 60),
        ColumnSpec::number("Display_Width", 62),
        ColumnSpec::number("Display_Height", 63),
        ColumnSpec::number("Display_Depth", 64),
        ColumnSpec::number("Alternate_Width", 70),
        ColumnSpec::number("Alternate_Height", 71),
        ColumnSpec::number("Alternate_Depth", 72),
        ColumnSpec::text("Order_Type", 118),
        ColumnSpec::text("Has_Alt_UPC", 130),
        ColumnSpec::text("Relay_ID", 206),
        ColumnSpec::number("Squeeze_Width", 224),
        ColumnSpec::number("Squeeze_High", 225),
        ColumnSpec::number("Squeeze_Deep", 226),
        ColumnSpec::number("Expand_Width", 227),
        ColumnSpec::number("Expand_High", 228),
        ColumnSpec::number("Expand_Deep", 229),
        ColumnSpec::number("Front_Overhang_Inches", 237),
    ]
}

fn product_rules() -> Vec<ValidationRule> {
    vec![
        ValidationRule::row("Relay_ID Uniformity", &["Relay_ID"], checks::relay_uniformity),
        ValidationRule::row("UPC Length (13 digits)", &["UPC"], checks::upc_length),
        ValidationRule::row(
            "Order_Type Invalid Values",
            &["Order_Type"],
            checks::order_type_invalid,
        ),
        ValidationRule::row(
            "Peg_Hole_X vs Width",
            &["Peg_Hole_X", "Width_Inches"],
            checks::peg_x_within_width,
        ),
        ValidationRule::row(
            "Peg_Hole_2X Position",
            &["Peg_Hole_2X", "Peg_Holes", "Width_Inches"],
            checks::peg_2x_between,
        ),
        ValidationRule::row(
            "Height_Inches Invalid Values",
            &["Height_Inches", "Width_Inches", "Depth_Inches"],
            checks::dimension_invalid,
        ),
        ValidationRule::row(
            "Width_Inches Invalid Values",
            &["Width_Inches", "Height_Inches", "Depth_Inches"],
            checks::dimension_invalid,
        ),
        ValidationRule::row(
            "Depth_Inches Invalid Values",
            &["Depth_Inches", "Width_Inches", "Height_Inches"],
            checks::dimension_invalid,
        ),
        ValidationRule::row("Squeeze_High Must Equal 1", &["Squeeze_High"], checks::must_equal_one),
        ValidationRule::row("Expand_Wide Must Equal 1", &["Expand_Width"], checks::must_equal_one),
        ValidationRule::row("Expand_High Must Equal 1", &["Expand_High"], checks::must_equal_one),
        ValidationRule::row("Squeeze_Deep Must Equal 1", &["Squeeze_Deep"], checks::must_equal_one),
        ValidationRule::row("Squeeze_Wide Must Equal 1", &["Squeeze_Width"], checks::must_equal_one),
        ValidationRule::row("Expand_Deep Must Equal 1", &["Expand_Deep"], checks::must_equal_one),
        ValidationRule::row(
            "Front_Overhang_Inches Less Than 1",
            &["Front_Overhang_Inches"],
            checks::overhang_less_than_one,
        ),
        ValidationRule::row(
            "Peg_ID Required When Peg Holes Exist",
            &[
                "Peg_ID",
                "Peg_Holes",
                "Peg_Hole_X",
                "Peg_Hole_Y",
                "Peg_Hole_2X",
                "Peg_Hole_2Y",
            ],
            checks::peg_id_required,
        ),
        ValidationRule::row(
            "Has_Alt_UPC Must Be Null",
            &["Has_Alt_UPC"],
            checks::alt_upc_must_be_null,
        ),
    ]
}

// ===== Planogram =====

pub fn planogram_spec() -> RecordTypeSpec {
    RecordTypeSpec::new(RecordType::planogram(), PLANOGRAM_FIELD_COUNT)
        .with_marker("Planogram")
        .with_smart_span(7, 10)
        .with_columns(planogram_columns())
        .with_rules(planogram_rules())
}

fn planogram_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::text("Table_Name", 0),
        ColumnSpec::text("Modular_Description", 1),
        ColumnSpec::text("Field_2", 2),
        ColumnSpec::number("Width_Inches", 3),
        ColumnSpec::number("Height_Inches", 4),
        ColumnSpec::number("Depth_Inches", 5),
        ColumnSpec::text("Field_6", 6),
        ColumnSpec::smart("Offset", ColumnType::Number, ContentKind::Numeric),
        ColumnSpec::smart("Notch_Bar_Width", ColumnType::Number, ContentKind::Numeric),
        ColumnSpec::smart("Department", ColumnType::Text, ContentKind::ShortCode),
        ColumnSpec::smart("Category", ColumnType::Text, ContentKind::ShortCode),
        ColumnSpec::date("Effective_Date", 11),
        ColumnSpec::text("Print_1", 12),
        ColumnSpec::text("Print_2", 13),
        ColumnSpec::text("Print_3", 14),
        ColumnSpec::text("Print_4", 15),
        ColumnSpec::text("File_Name", 16),
        ColumnSpec::derived("Width_Feet", ColumnType::Number, DerivedColumn::WidthFeet),
        ColumnSpec::derived("Segments", ColumnType::Number, DerivedColumn::Segments),
        ColumnSpec::derived("Drawing_ID", ColumnType::Text, DerivedColumn::DrawingId),
        ColumnSpec::derived("Footage", ColumnType::Number, DerivedColumn::Footage),
        ColumnSpec::derived("Trait_Number", ColumnType::Text, DerivedColumn::TraitNumber),
    ]
}

fn planogram_rules() -> Vec<ValidationRule> {
    vec![
        ValidationRule::row(
            "Print Fields Populated (ALL 4 Required)",
            &["Print_1", "Print_2", "Print_3", "Print_4"],
            checks::print_fields_populated,
        ),
        ValidationRule::row_with_tolerance(
            "Footage Equals Width_Feet",
            &["Footage", "Width_Feet"],
            DIMENSION_TOLERANCE,
            checks::footage_matches_width_feet,
        ),
        ValidationRule::row("Drawing_ID Not Null", &["Drawing_ID"], checks::not_null),
        ValidationRule::row("Effective_Date Not Null", &["Effective_Date"], checks::not_null),
        ValidationRule::row("Offset Not Null", &["Offset"], checks::not_null),
        ValidationRule::row("Notch_Bar_Width Not Null", &["Notch_Bar_Width"], checks::not_null),
        ValidationRule::row("Department_Valid", &["Department"], checks::reference_membership),
        ValidationRule::row("Category_Valid", &["Category"], checks::reference_membership),
        ValidationRule::row(
            "Modular_Description Alphanumeric Only",
            &["Modular_Description"],
            checks::alphanumeric_only,
        ),
    ]
}

// ===== Fixture =====

pub fn fixture_spec() -> RecordTypeSpec {
    RecordTypeSpec::new(RecordType::fixture(), FIXTURE_FIELD_COUNT)
        .with_columns(fixture_columns())
        .with_rules(fixture_rules())
}

fn fixture_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::mapped_code(
            "Type",
            1,
            &[
                ("0", "Shelf"),
                ("4", "Rod"),
                ("6", "Bar"),
                ("7", "Pegboard"),
                ("10", "Obstruction"),
            ],
        ),
        ColumnSpec::text("Name", 2),
        ColumnSpec::number("X", 4),
        ColumnSpec::number("Width", 5),
        ColumnSpec::number("Y", 6),
        ColumnSpec::number("Z", 8),
        ColumnSpec::number("Depth", 9),
        ColumnSpec::text("Color", 13),
        ColumnSpec::text("Merch", 23),
        ColumnSpec::number("Left_Overhang", 27),
        ColumnSpec::number("Right_Overhang", 28),
        ColumnSpec::number("Back_Overhang", 31),
        ColumnSpec::number("Front_Overhang", 32),
        ColumnSpec::text("Notch", 77),
        ColumnSpec::text("Proof_Notes", 105),
    ]
}

fn fixture_rules() -> Vec<ValidationRule> {
    vec![
        ValidationRule::table("Field_Count", &[], checks::field_count),
        ValidationRule::row("Unique_Name", &["Name"], checks::unique_name),
        ValidationRule::row_with_tolerance(
            "Type_Dimensions",
            &["Type", "Width", "Depth"],
            DIMENSION_TOLERANCE,
            checks::type_dimensions,
        ),
        ValidationRule::row("Y_Not_Equal_Notch", &["Y", "Notch"], checks::y_not_equal_notch),
        ValidationRule::row_with_tolerance(
            "Deck_Shelf_Y",
            &["Type", "Name", "Y"],
            DIMENSION_TOLERANCE,
            checks::deck_shelf_y,
        ),
        ValidationRule::row_with_tolerance(
            "Shelf_Z",
            &["Type", "Name", "Z"],
            DIMENSION_TOLERANCE,
            checks::shelf_z,
        ),
        ValidationRule::row_with_tolerance(
            "Shelf_Overhangs",
            &["Type", "Left_Overhang", "Right_Overhang", "Front_Overhang"],
            DIMENSION_TOLERANCE,
            checks::shelf_overhangs,
        ),
        ValidationRule::row_with_tolerance(
            "Shelf_Back_Overhang",
            &["Type", "Name", "Back_Overhang"],
            DIMENSION_TOLERANCE,
            checks::shelf_back_overhang,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::record_spec::{SmartSpan, SpecRegistry};

    #[test]
    fn test_standard_catalog_passes_registry_validation() {
        let registry = SpecRegistry::standard().unwrap();
        assert_eq!(registry.specs().len(), 3);
    }

    #[test]
    fn test_catalog_shapes() {
        let product = product_spec();
        assert_eq!(product.field_count, 274);
        assert_eq!(product.columns.len(), 46);
        assert_eq!(product.rules.len(), 17);

        let planogram = planogram_spec();
        assert_eq!(planogram.field_count, 274);
        assert_eq!(planogram.columns.len(), 22);
        assert_eq!(planogram.rules.len(), 9);
        assert_eq!(planogram.smart_span, Some(SmartSpan::new(7, 10)));
        assert_eq!(planogram.columns.iter().filter(|c| c.is_smart()).count(), 4);

        let fixture = fixture_spec();
        assert_eq!(fixture.field_count, 166);
        assert_eq!(fixture.columns.len(), 15);
        assert_eq!(fixture.rules.len(), 8);
    }

    #[test]
    fn test_shared_field_count_resolved_by_markers() {
        let product = product_spec();
        let planogram = planogram_spec();
        assert_eq!(product.field_count, planogram.field_count);
        assert!(product.matches_marker("Product"));
        assert!(planogram.matches_marker("Planogram"));
        assert!(!product.matches_marker("Planogram"));
    }

    #[test]
    fn test_product_column_positions() {
        let product = product_spec();
        let relay = product.columns.iter().find(|c| c.name == "Relay_ID").unwrap();
        assert_eq!(relay.position(), Some(206));
        let overhang = product
            .columns
            .iter()
            .find(|c| c.name == "Front_Overhang_Inches")
            .unwrap();
        assert_eq!(overhang.position(), Some(237));
        assert_eq!(product.columns[0].name, "Table_Name");
    }

    #[test]
    fn test_fixture_type_codes() {
        use crate::spec::column::ColumnSource;

        let fixture = fixture_spec();
        let kind = fixture.columns.iter().find(|c| c.name == "Type").unwrap();
        match &kind.source {
            ColumnSource::MappedCode { position, codes } => {
                assert_eq!(*position, 1);
                assert!(codes.contains(&("10".to_string(), "Obstruction".to_string())));
            }
            other => panic!("unexpected source: {:?}", other),
        }
    }
}
