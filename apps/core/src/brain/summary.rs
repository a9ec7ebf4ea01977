//! Title and summary derivation.

/// Maximum title length in characters, ellipsis included.
pub const TITLE_MAX_CHARS: usize = 60;

/// Maximum summary length in characters, ellipsis included.
pub const SUMMARY_MAX_CHARS: usize = 140;

/// Title used when the text has no sentence content.
pub const UNTITLED: &str = "Untitled dream";

const ELLIPSIS: &str = "...";

/// Splits text into trimmed, non-empty sentences on `.`, `!` and `?`.
pub fn sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// The first sentence of the text, if any.
pub fn first_sentence(text: &str) -> Option<&str> {
    sentences(text).into_iter().next()
}

/// Truncates on a character boundary, marking the cut with `...`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.truncate(out.trim_end().len());
    out.push_str(ELLIPSIS);
    out
}

/// Short title: the first sentence, cut to [`TITLE_MAX_CHARS`].
pub fn derive_title(text: &str) -> String {
    match first_sentence(text) {
        Some(sentence) => truncate_chars(sentence, TITLE_MAX_CHARS),
        None => UNTITLED.to_string(),
    }
}

/// Summary: the first sentence, cut to [`SUMMARY_MAX_CHARS`].
pub fn derive_summary(text: &str) -> String {
    first_sentence(text)
        .map(|sentence| truncate_chars(sentence, SUMMARY_MAX_CHARS))
        .unwrap_or_default()
}
