use serde::{Deserialize, Serialize};

/// Closed set of unit-of-measure codes used across all adapters.
///
/// Free-text units from external sources are mapped into this set by
/// [`infer_unit`](crate::normalize::infer_unit); anything unrecognized
/// falls back to [`UnitCode::Ea`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UnitCode {
    /// Each
    Ea,
    /// Square foot
    Sf,
    /// Linear foot
    Lf,
    /// Cubic yard
    Cy,
    /// Bag
    Bag,
    /// Sheet
    Sht,
    /// Gallon
    Gal,
    /// Box
    Box,
    /// Case
    Cs,
    /// Bundle
    Bdl,
}

impl UnitCode {
    /// All codes in the closed set.
    pub const ALL: &'static [UnitCode] = &[
        UnitCode::Ea,
        UnitCode::Sf,
        UnitCode::Lf,
        UnitCode::Cy,
        UnitCode::Bag,
        UnitCode::Sht,
        UnitCode::Gal,
        UnitCode::Box,
        UnitCode::Cs,
        UnitCode::Bdl,
    ];

    /// The canonical code string ("EA", "SF", ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitCode::Ea => "EA",
            UnitCode::Sf => "SF",
            UnitCode::Lf => "LF",
            UnitCode::Cy => "CY",
            UnitCode::Bag => "BAG",
            UnitCode::Sht => "SHT",
            UnitCode::Gal => "GAL",
            UnitCode::Box => "BOX",
            UnitCode::Cs => "CS",
            UnitCode::Bdl => "BDL",
        }
    }

    /// Parse an exact code string (case-insensitive). Returns `None` for
    /// anything outside the closed set; use
    /// [`infer_unit`](crate::normalize::infer_unit) for free text.
    pub fn from_code(code: &str) -> Option<UnitCode> {
        match code.to_ascii_uppercase().as_str() {
            "EA" => Some(UnitCode::Ea),
            "SF" => Some(UnitCode::Sf),
            "LF" => Some(UnitCode::Lf),
            "CY" => Some(UnitCode::Cy),
            "BAG" => Some(UnitCode::Bag),
            "SHT" => Some(UnitCode::Sht),
            "GAL" => Some(UnitCode::Gal),
            "BOX" => Some(UnitCode::Box),
            "CS" => Some(UnitCode::Cs),
            "BDL" => Some(UnitCode::Bdl),
            _ => None,
        }
    }
}

impl std::fmt::Display for UnitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for UnitCode {
    fn default() -> Self {
        UnitCode::Ea
    }
}
