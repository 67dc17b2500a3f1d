/// Ordered (category, keywords) table; the first category with any
/// substring hit wins, so Lumber outranks Hardware for "wood screw" etc.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Lumber",
        &[
            "lumber", "wood", "plywood", "osb", "2x4", "2x6", "2x8", "2x10", "2x12", "stud",
        ],
    ),
    ("Concrete", &["concrete", "cement", "mortar", "grout"]),
    ("Steel", &["steel", "rebar", "metal", "iron", "aluminum"]),
    ("Drywall", &["drywall", "sheetrock", "gypsum"]),
    ("Insulation", &["insulation", "foam", "fiberglass", "r-value"]),
    ("Roofing", &["shingle", "roofing", "roof", "underlayment"]),
    (
        "Flooring",
        &["flooring", "tile", "hardwood", "laminate", "vinyl"],
    ),
    (
        "Plumbing",
        &["pipe", "pvc", "fitting", "valve", "plumbing", "faucet"],
    ),
    (
        "Electrical",
        &["wire", "electrical", "outlet", "switch", "breaker", "conduit"],
    ),
    (
        "Hardware",
        &["nail", "screw", "bolt", "fastener", "hinge", "bracket"],
    ),
    ("Paint", &["paint", "primer", "stain", "sealer"]),
    ("Doors & Windows", &["door", "window", "frame"]),
];

/// Infer a canonical category from an item title. Unmatched titles map
/// to "General".
pub fn infer_category(title: &str) -> String {
    let haystack = title.to_lowercase();
    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|kw| haystack.contains(kw)) {
            return (*category).to_string();
        }
    }
    "General".to_string()
}
