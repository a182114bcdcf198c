//! Label normalization used for every header comparison.

use regex::Regex;

fn separator_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\s_\-]+").expect("valid regex"))
}

fn punctuation_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w]").expect("valid regex"))
}

/// Normalize a header label for comparison.
///
/// Lower-cases and trims the label, removes runs of whitespace, underscores
/// and hyphens, then drops any remaining non-word character:
///
/// ```
/// use orderbook_core::normalize_label;
///
/// assert_eq!(normalize_label("Project Title"), "projecttitle");
/// assert_eq!(normalize_label("Project_Type"), "projecttype");
/// assert_eq!(
///     normalize_label("Gross Fee Yet To Be Earned (USD)"),
///     "grossfeeyettobeearnedusd"
/// );
/// ```
#[must_use]
pub fn normalize_label(label: &str) -> String {
    let lowered = label.trim().to_lowercase();
    let joined = separator_regex().replace_all(&lowered, "");
    punctuation_regex().replace_all(&joined, "").into_owned()
}

/// Normalize an optional grid scalar; absent input normalizes to "".
#[must_use]
pub fn normalize_cell(cell: Option<&str>) -> String {
    cell.map(normalize_label).unwrap_or_default()
}
