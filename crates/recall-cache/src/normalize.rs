//! Cache key normalization for natural-language questions.

use std::sync::LazyLock;

use regex::Regex;

/// Sentence-terminal punctuation followed by whitespace or end of input.
/// Punctuation inside a token (`v1.2`, `a:b`) is kept.
static TERMINAL_PUNCTUATION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[?!.,;:？！。，；：]+(\s|$)").ok());

/// Canonicalize a question so that variants differing only by case,
/// sentence punctuation, or whitespace share one cache key.
pub fn normalize_key(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let stripped = match TERMINAL_PUNCTUATION.as_ref() {
        Some(re) => re.replace_all(&lowered, "$1").into_owned(),
        None => lowered,
    };
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
