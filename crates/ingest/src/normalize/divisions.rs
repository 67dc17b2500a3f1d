//! Construction "division" codes used by the cost-database source.
//!
//! Divisions are two-digit CSI-style codes ("03" = Concrete, "05" =
//! Steel, ...). The forward map is many-to-one (Steel and Metals both
//! live in "05"); the reverse map picks one canonical category per code
//! so that the round trip `category_to_division(division_to_category(c))`
//! holds for every known code.

/// Map a canonical category to its division code. Unknown categories map
/// to the empty string.
pub fn category_to_division(category: &str) -> &'static str {
    match category {
        "Concrete" => "03",
        "Masonry" => "04",
        "Metals" => "05",
        "Steel" => "05",
        "Wood" => "06",
        "Lumber" => "06",
        "Thermal" => "07",
        "Insulation" => "07",
        "Doors" => "08",
        "Windows" => "08",
        "Doors & Windows" => "08",
        "Finishes" => "09",
        "Drywall" => "09",
        "Specialties" => "10",
        "Equipment" => "11",
        "Furnishings" => "12",
        "Plumbing" => "22",
        "HVAC" => "23",
        "Electrical" => "26",
        "Communications" => "27",
        "Safety" => "28",
        "Earthwork" => "31",
        "Exterior" => "32",
        "Utilities" => "33",
        _ => "",
    }
}

/// Known division codes, in numeric order.
pub const KNOWN_DIVISIONS: &[&str] = &[
    "03", "04", "05", "06", "07", "08", "09", "10", "11", "12", "22", "23", "26", "27", "28",
    "31", "32", "33",
];

/// Map a division code to its canonical category. Only the first two
/// characters are significant (sources sometimes send "03 30 00").
/// Unknown or empty codes map to "General".
pub fn division_to_category(division: &str) -> &'static str {
    // byte-range get: codes are ASCII, anything else falls through
    let code = division.get(..2).unwrap_or(division);
    match code {
        "03" => "Concrete",
        "04" => "Masonry",
        "05" => "Steel",
        "06" => "Lumber",
        "07" => "Insulation",
        "08" => "Doors & Windows",
        "09" => "Finishes",
        "10" => "Specialties",
        "11" => "Equipment",
        "12" => "Furnishings",
        "22" => "Plumbing",
        "23" => "HVAC",
        "26" => "Electrical",
        "27" => "Communications",
        "28" => "Safety",
        "31" => "Earthwork",
        "32" => "Exterior",
        "33" => "Utilities",
        _ => "General",
    }
}
