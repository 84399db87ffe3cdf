//! Character-level cleanup applied around the temporal stages:
//! Unicode folding, accent stripping, control characters, whitespace
//! and typographic punctuation.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::char::canonical_combining_class;
use unicode_normalization::UnicodeNormalization;

static BLANK_LINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));
static INLINE_SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("valid regex"));
static SPACE_BEFORE_PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" ([.,;:!?])").expect("valid regex"));
static DASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[\u{2013}\u{2014}]\s*").expect("valid regex"));

/// Canonical composition (NFC).
pub fn normalize_unicode(text: &str) -> String {
    text.nfc().collect()
}

/// Decompose (NFKD) and drop every combining mark: "Escritório" → "Escritorio".
pub fn strip_accents(text: &str) -> String {
    text.nfkd()
        .filter(|c| canonical_combining_class(*c) == 0)
        .collect()
}

/// Strip ASCII control characters. Tab, newline and carriage return survive.
pub fn remove_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| {
            !matches!(
                c,
                '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' | '\u{7F}'
            )
        })
        .collect()
}

/// Collapse blank-line runs to one empty line, squeeze spaces and tabs,
/// and glue punctuation to the preceding word.
pub fn fix_whitespace(text: &str) -> String {
    let text = BLANK_LINES_RE.replace_all(text, "\n\n");
    let text = INLINE_SPACE_RE.replace_all(&text, " ");
    SPACE_BEFORE_PUNCT_RE.replace_all(&text, "$1").into_owned()
}

/// Replace typographic quotes with ASCII ones and en/em dashes with " - ".
pub fn normalize_punctuation(text: &str) -> String {
    let quoted: String = text
        .chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' | '\u{201E}' => '"',
            '\u{2018}' | '\u{2019}' | '\u{201A}' => '\'',
            other => other,
        })
        .collect();
    DASH_RE.replace_all(&quoted, " - ").into_owned()
}
