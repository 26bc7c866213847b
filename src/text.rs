//! Comment normalization and tokenization.
//!
//! Mirrors the cleaning the admin dashboard applies before counting words:
//! lower-case, punctuation to spaces, whitespace runs collapsed, trimmed.

use once_cell::sync::Lazy;
use regex::Regex;

// . , / # ! $ % ^ & * ; : { } = - _ ` ~ ( )
static PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.,/#!$%\^&*;:{}=\-_`~()]").expect("punctuation pattern is valid"));

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}").expect("whitespace pattern is valid"));

/// Normalizes a free-text comment for keyword lookup.
///
/// Arabic script has no case and is left untouched; diacritics are not
/// stripped, so a diacritized word will not match its bare lexicon form.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let lowered = text.to_lowercase();
    let spaced = PUNCTUATION.replace_all(&lowered, " ");
    let collapsed = WHITESPACE_RUN.replace_all(&spaced, " ");
    collapsed.trim().to_string()
}

/// Splits normalized text on single spaces.
///
/// Only `' '` is a boundary: a lone tab or newline survives normalization and
/// stays inside its token.
pub fn tokenize(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split(' ').filter(|token| !token.is_empty())
}

/// Token length in characters, not bytes.
pub fn char_len(token: &str) -> usize {
    token.chars().count()
}
