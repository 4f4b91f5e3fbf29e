//! Coercion of the page's free text into typed values.

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static NON_KEY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}_]").unwrap());
static NON_DIGIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9]").unwrap());

/// Derives a column-safe key from a party's display name.
///
/// Every run of whitespace becomes a single underscore, then everything that
/// isn't a letter, a digit or an underscore is dropped. Letters include
/// accented ones, so "Frente Amplio" and "Partido Colorado" keep their
/// spelling. Applying this to its own output is a no-op.
pub fn party_key(name: &str) -> String {
    let underscored = WHITESPACE_RE.replace_all(name, "_");
    NON_KEY_RE.replace_all(&underscored, "").into_owned()
}

/// Parses text that must already be a clean base-10 integer ("150").
///
/// Anything else ("N/A", "+150", "1.234", "") gives `None`.
pub fn parse_clean_integer(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    text.parse().ok()
}

/// Parses a numeral after dropping every non-digit, so thousands separators
/// of either style ("1,234,567", "1.234.567") are accepted.
///
/// Text without a single digit gives `None`.
pub fn parse_digits(text: &str) -> Option<u64> {
    let digits = NON_DIGIT_RE.replace_all(text, "");

    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}
