//! Conversion of display-formatted amounts into numbers.

use crate::cell::CellValue;
use regex::Regex;

fn accounting_negative_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(([\d.,]+)\)").expect("valid regex"))
}

fn non_numeric_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\d.\-]").expect("valid regex"))
}

/// Parse a display-formatted amount.
///
/// `(D)` is read as `-D`, then everything except digits, the minus sign and
/// the decimal point is dropped. Returns `None` when what remains is not a
/// number.
///
/// ```
/// use orderbook_core::coerce_value;
///
/// assert_eq!(coerce_value("(1,234.50)"), Some(-1234.5));
/// assert_eq!(coerce_value("$2,000"), Some(2000.0));
/// assert_eq!(coerce_value("n/a"), None);
/// ```
#[must_use]
pub fn coerce_value(text: &str) -> Option<f64> {
    let signed = accounting_negative_regex().replace_all(text, "-$1");
    let stripped = non_numeric_regex().replace_all(&signed, "");
    stripped.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Convert one cell. Numbers pass through; anything unparseable becomes null.
#[must_use]
pub fn coerce_cell(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Number(n) => CellValue::Number(*n),
        CellValue::Text(s) => coerce_value(s).map_or(CellValue::Null, CellValue::Number),
        CellValue::Null => CellValue::Null,
    }
}

/// Convert a column in place.
///
/// Returns `false` and leaves the column untouched when every value is null.
pub fn coerce_column(values: &mut [CellValue]) -> bool {
    if values.iter().all(CellValue::is_null) {
        return false;
    }
    for value in values.iter_mut() {
        *value = coerce_cell(value);
    }
    true
}
