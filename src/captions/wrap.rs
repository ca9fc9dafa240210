use crate::captions::LINE_BREAK;

// @module: Caption text wrapping

// @const: Texts with this many words or fewer stay on one line
const SHORT_TEXT_WORDS: usize = 3;

// @const: How far from the midpoint a punctuation break may be taken
const BREAK_WINDOW: usize = 2;

// @const: Word endings that make a natural break point
const BREAK_PUNCTUATION: [char; 6] = [',', '.', '!', '?', ';', ':'];

/// Wrap caption text onto `max_lines` display lines at word boundaries.
///
/// Only two-line wrapping is supported; any other `max_lines` returns the
/// text unchanged. Blank text and texts of three words or fewer are never
/// wrapped. Longer texts break after the first punctuated word within two
/// words of the midpoint, or exactly at the midpoint.
pub fn wrap_text(text: &str, max_lines: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= SHORT_TEXT_WORDS || max_lines != 2 {
        return text.to_string();
    }

    let break_at = find_break(&words);
    format!("{}{}{}", words[..break_at].join(" "), LINE_BREAK, words[break_at..].join(" "))
}

// @returns: Index of the first word on the second line
fn find_break(words: &[&str]) -> usize {
    let mid = words.len() / 2;
    let lo = mid.saturating_sub(BREAK_WINDOW).max(1);
    let hi = (mid + BREAK_WINDOW + 1).min(words.len());

    (lo..hi)
        .find(|&i| words[i - 1].ends_with(BREAK_PUNCTUATION))
        .unwrap_or(mid)
}
