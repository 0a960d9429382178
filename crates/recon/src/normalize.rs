use once_cell::sync::Lazy;
use regex::Regex;

static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s.\-/;]").expect("valid disallowed-char regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Canonical comparison form of free text.
///
/// Lower-cases, drops everything except word characters, whitespace and
/// `. - / ;`, collapses whitespace runs to one space and trims. Lower-casing
/// happens first so the result is a fixed point: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let lower = text.to_lowercase();
    let kept = DISALLOWED.replace_all(&lower, "");
    WHITESPACE.replace_all(&kept, " ").trim().to_string()
}

/// `normalize` for a value that may be absent. Absent is `""`.
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}
