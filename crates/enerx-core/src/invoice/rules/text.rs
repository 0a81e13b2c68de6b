//! Character-safe text helpers.
//!
//! Invoice text is full of Romanian diacritics, so windows are measured in
//! characters and every slice lands on a char boundary.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Byte offset `n` characters before `idx`, clamped to the start.
pub fn back_chars(text: &str, idx: usize, n: usize) -> usize {
    if n == 0 {
        return idx;
    }
    text[..idx]
        .char_indices()
        .rev()
        .nth(n - 1)
        .map_or(0, |(i, _)| i)
}

/// Byte offset `n` characters after `idx`, clamped to the end.
pub fn forward_chars(text: &str, idx: usize, n: usize) -> usize {
    text[idx..]
        .char_indices()
        .nth(n)
        .map_or(text.len(), |(i, _)| idx + i)
}

/// Collapse whitespace runs to one space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}

/// The last `n` characters before `idx`.
pub fn preceding(text: &str, idx: usize, n: usize) -> &str {
    &text[back_chars(text, idx, n)..idx]
}
