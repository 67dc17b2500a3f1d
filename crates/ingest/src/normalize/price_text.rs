use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

lazy_static! {
    static ref NON_PRICE_CHARS: Regex = Regex::new(r"[^\d.,]").unwrap();
    static ref FIRST_NUMBER: Regex = Regex::new(r"\d+\.?\d*").unwrap();
}

/// Parse a price out of scraped or aggregated free text.
///
/// Strips everything outside `[0-9.,]`, drops thousands separators, and
/// takes the first decimal-number substring. Text with no digit yields
/// `0.0`; this function never fails. Idempotent on clean numeric strings.
pub fn parse_price(text: &str) -> Decimal {
    let cleaned = NON_PRICE_CHARS.replace_all(text, "");
    let cleaned = cleaned.replace(',', "");

    FIRST_NUMBER
        .find(&cleaned)
        .and_then(|m| Decimal::from_str(m.as_str()).ok())
        .unwrap_or(Decimal::ZERO)
}
