use crate::models::UnitCode;

/// Ordered substring table; first matching pattern wins.
const UNIT_PATTERNS: &[(UnitCode, &[&str])] = &[
    (
        UnitCode::Sf,
        &["sq ft", "sq. ft", "square foot", "sqft", "/sf"],
    ),
    (
        UnitCode::Lf,
        &["lin ft", "lin. ft", "linear foot", "lf", "/lf"],
    ),
    (UnitCode::Cy, &["cu yd", "cubic yard", "cy"]),
    (UnitCode::Bag, &["bag", "/bag", "per bag"]),
    (UnitCode::Sht, &["sheet", "/sheet", "per sheet"]),
    (UnitCode::Gal, &["gallon", "gal", "/gal"]),
    (UnitCode::Box, &["box", "/box", "per box"]),
    (UnitCode::Cs, &["case", "/case", "per case"]),
    (UnitCode::Bdl, &["bundle", "/bundle", "per bundle"]),
];

/// Infer a unit code from free text (a unit string, an item title, or
/// both concatenated). Unmatched text defaults to [`UnitCode::Ea`].
pub fn infer_unit(text: &str) -> UnitCode {
    let haystack = text.to_lowercase();
    for (unit, patterns) in UNIT_PATTERNS {
        if patterns.iter().any(|p| haystack.contains(p)) {
            return *unit;
        }
    }
    UnitCode::Ea
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_patterns() {
        assert_eq!(infer_unit("Vinyl Plank Flooring per sq ft"), UnitCode::Sf);
        assert_eq!(infer_unit("Cedar Trim $3.99 /lf"), UnitCode::Lf);
        assert_eq!(infer_unit("Ready-Mix Concrete per cubic yard"), UnitCode::Cy);
        assert_eq!(infer_unit("Portland Cement 94 lb per bag"), UnitCode::Bag);
        assert_eq!(infer_unit("Drywall 4x8 sheet"), UnitCode::Sht);
        assert_eq!(infer_unit("Exterior Paint 1 gallon"), UnitCode::Gal);
    }

    #[test]
    fn test_unmatched_defaults_to_ea() {
        assert_eq!(infer_unit("Claw Hammer 16 oz"), UnitCode::Ea);
        assert_eq!(infer_unit(""), UnitCode::Ea);
    }

    #[test]
    fn test_order_is_first_match_wins() {
        // "sq ft" appears before the bag patterns in the table
        assert_eq!(infer_unit("underlayment sq ft per bag"), UnitCode::Sf);
    }

    #[test]
    fn test_result_always_in_closed_set() {
        for text in ["per bundle", "box of 50", "odd gizmo", "case", "1 gal"] {
            assert!(UnitCode::ALL.contains(&infer_unit(text)));
        }
    }
}
