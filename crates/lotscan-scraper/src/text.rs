//! Whitespace and digit normalization shared by the extractors.

/// Collapses every whitespace run (including non-breaking spaces) to a single
/// space and trims the ends.
#[must_use]
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keeps only ASCII digits: `"$39,999"` becomes `"39999"`.
#[must_use]
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Trims punctuation a title token may carry (`"Camry,"`, `"(Hybrid)"`),
/// keeping inner characters such as `-` and `/`.
#[must_use]
pub fn trim_token(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric())
}

/// Character count bound check used to reject label fragments and page dumps.
#[must_use]
pub fn within_len(value: &str, min: usize, max: usize) -> bool {
    let len = value.chars().count();
    len >= min && len <= max
}
