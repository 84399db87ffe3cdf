//! Typo-tolerant lookup of a token in a small controlled vocabulary.
//!
//! Matching is Levenshtein-based with a threshold that grows with word
//! length. Two cheap pre-filters run before any distance is computed:
//! the candidate key must be within one character of the token's length
//! and must share its first character. Short vocabularies of everyday
//! words ("ontem", "maio") would otherwise match far too much.

use super::vocabulary::Vocabulary;

/// Find the vocabulary key closest to `token`.
///
/// An exact key wins immediately. Otherwise the first key with the
/// smallest qualifying distance is returned; later keys at the same
/// distance never replace it.
pub fn fuzzy_match<'v, V>(token: &str, vocabulary: &'v Vocabulary<V>) -> Option<&'v str> {
    if let Some(key) = vocabulary.key_of(token) {
        return Some(key);
    }

    let first = token.chars().next()?;
    let token_len = token.chars().count();

    let mut best_key: Option<&str> = None;
    let mut best_distance = usize::MAX;

    for key in vocabulary.keys() {
        let key_len = key.chars().count();
        if token_len.abs_diff(key_len) > 1 {
            continue;
        }

        if key.chars().next() != Some(first) {
            continue;
        }

        let threshold = max_distance(token_len.min(key_len));
        let distance = edit_distance(token, key);

        if distance <= threshold && distance < best_distance {
            best_distance = distance;
            best_key = Some(key);
        }
    }

    best_key
}

/// Maximum tolerated edit distance for a word of `len` characters.
fn max_distance(len: usize) -> usize {
    match len {
        0..=4 => 1,
        5..=7 => 2,
        _ => 3,
    }
}

/// Compute Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 { return n; }
    if n == 0 { return m; }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for (i, &a_ch) in a_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &b_ch) in b_chars.iter().enumerate() {
            let cost = if a_ch == b_ch { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1)
                .min(curr[j] + 1)
                .min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}
