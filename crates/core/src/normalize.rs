//! Text normalization used before keyword matching.

use std::sync::LazyLock;

use regex::Regex;

static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Lowercases `text`, replaces every character that is neither a word
/// character nor whitespace with a space, collapses whitespace runs and trims.
///
/// Word characters are Unicode aware, so Cyrillic (or any other script) passes
/// through untouched apart from case folding.
///
/// ```rust
/// use blockmap_core::normalize;
///
/// assert_eq!(normalize("  Наши  Тарифы!  "), "наши тарифы");
/// assert_eq!(normalize("Q&A / Support"), "q a support");
/// ```
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = PUNCTUATION.replace_all(&lowered, " ");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}
