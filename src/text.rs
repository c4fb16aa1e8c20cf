//! Char- and word-level text helpers. All limits in this crate count chars,
//! never bytes, so cutting never splits a code point.

use regex::Regex;
use std::sync::LazyLock;

static WORD_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").unwrap());

pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Cut `text` to at most `max_chars` chars.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Prefix of `text` holding its first `max_words` words, original spacing
/// kept, trailing whitespace dropped.
pub fn truncate_words(text: &str, max_words: usize) -> &str {
    if max_words == 0 {
        return "";
    }
    match WORD_REGEX.find_iter(text).nth(max_words - 1) {
        Some(word) => &text[..word.end()],
        None => text.trim_end(),
    }
}
