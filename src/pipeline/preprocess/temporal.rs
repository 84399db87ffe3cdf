//! Temporal stages of the preprocessing pipeline.
//!
//! Each stage is a pure function over already-folded text (lowercase, no
//! accents) returning the rewritten text and the hint it produced, if any.
//! Relative dates resolve on the first hit only; clock times and written
//! dates report the last one seen.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDateTime};
use regex::{Captures, Regex};

use super::fuzzy::fuzzy_match;
use super::types::INVALID_SENTINEL;
use super::vocabulary::{MONTHS, RELATIVE_DAYS};

/// `14h30`, `9h`, `14 horas`, `7 hora 5`. Digits are any Unicode decimal
/// digit. Exclusions for a preceding digit or "por " are checked in code
/// since the regex crate has no lookbehind.
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})\s*[hH](?:oras?)?\s*(\d{0,2})\b").expect("valid regex")
});

static DECIMAL_DIGIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A\d\z").expect("valid regex"));

/// A normalized time or the sentinel, checked for a glued right neighbour.
static TIME_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"INVALIDO|\d{2}:\d{2}").expect("valid regex"));

/// `3 de abril de 2024`
static WRITTEN_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})\s+de\s+(\w+)\s+de\s+(\d{4})\b").expect("valid regex")
});

/// Replace the first relative day word with the absolute date it denotes.
///
/// Tokens are split on whitespace and re-joined with single spaces.
/// Punctuation around the word (`"(ontem),"`) is kept in place.
pub fn resolve_relative_dates(text: &str, reference: NaiveDateTime) -> (String, Option<String>) {
    let mut resolved: Option<String> = None;
    let mut tokens: Vec<String> = Vec::new();

    for token in text.split_whitespace() {
        if resolved.is_some() {
            tokens.push(token.to_string());
            continue;
        }

        let core = token.trim_matches(|c: char| !is_word_or_hyphen(c));
        let date = fuzzy_match(core, &RELATIVE_DAYS)
            .and_then(|key| RELATIVE_DAYS.get(key))
            .and_then(|days| reference.checked_add_signed(Duration::days(*days)))
            .map(|dt| dt.format("%Y-%m-%d").to_string());

        match date {
            Some(date) => {
                let start = token.len() - token.trim_start_matches(|c: char| !is_word_or_hyphen(c)).len();
                let end = start + core.len();
                tokens.push(format!("{}{}{}", &token[..start], date, &token[end..]));
                resolved = Some(date);
            }
            None => tokens.push(token.to_string()),
        }
    }

    (tokens.join(" "), resolved)
}

fn is_word_or_hyphen(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// Rewrite clock expressions as `HH:MM`, or the sentinel when the hour
/// exceeds 23 or the minute exceeds 59.
pub fn normalize_time_expressions(text: &str) -> (String, Option<String>) {
    let mut out = String::with_capacity(text.len() + 8);
    let mut hint: Option<String> = None;
    let mut copied = 0;
    let mut search_from = 0;

    while let Some(caps) = TIME_RE.captures_at(text, search_from) {
        let Some(whole) = caps.get(0) else { break };

        if is_excluded_time_prefix(&text[..whole.start()]) {
            let first_len = text[whole.start()..].chars().next().map_or(1, char::len_utf8);
            search_from = whole.start() + first_len;
            continue;
        }

        let Some(hour) = parse_decimal(&caps[1]) else {
            search_from = whole.end();
            continue;
        };
        let minute = caps
            .get(2)
            .and_then(|m| parse_decimal(m.as_str()))
            .unwrap_or(0);

        let replacement = if hour > 23 || minute > 59 {
            INVALID_SENTINEL.to_string()
        } else {
            format!("{hour:02}:{minute:02}")
        };

        out.push_str(&text[copied..whole.start()]);
        out.push_str(&replacement);
        copied = whole.end();
        search_from = whole.end();
        hint = Some(replacement);
    }

    out.push_str(&text[copied..]);

    (separate_time_tokens(&out), hint)
}

/// Time expressions directly after a digit or after "por " are not clock
/// times ("por 2 horas" is a duration).
fn is_excluded_time_prefix(before: &str) -> bool {
    match before.chars().next_back() {
        Some(c) if is_decimal_digit(c) => true,
        Some(c) if c.is_whitespace() => before[..before.len() - c.len_utf8()].ends_with("por"),
        _ => false,
    }
}

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    DECIMAL_DIGIT_RE.is_match(c.encode_utf8(&mut buf))
}

/// Value of a Unicode decimal digit (`٤` is 4). Decimal digits come in
/// contiguous runs of whole 0..=9 blocks, so the value is the distance
/// from the start of the run modulo 10.
fn decimal_value(c: char) -> Option<u32> {
    if let Some(value) = c.to_digit(10) {
        return Some(value);
    }
    if !is_decimal_digit(c) {
        return None;
    }

    let mut offset = 0u32;
    let mut code = c as u32;
    while let Some(prev) = code.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        offset += 1;
        code -= 1;
    }
    Some(offset % 10)
}

/// Parse a run of decimal digits in any script. `None` when empty.
fn parse_decimal(digits: &str) -> Option<u32> {
    if digits.is_empty() {
        return None;
    }
    digits
        .chars()
        .try_fold(0u32, |acc, c| Some(acc * 10 + decimal_value(c)?))
}

/// Insert a space after `HH:MM` / sentinel tokens glued to the next word.
fn separate_time_tokens(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    let mut copied = 0;

    for m in TIME_TOKEN_RE.find_iter(text) {
        out.push_str(&text[copied..m.end()]);
        copied = m.end();
        if text[m.end()..].chars().next().is_some_and(|c| !c.is_whitespace()) {
            out.push(' ');
        }
    }

    out.push_str(&text[copied..]);
    out
}

/// Rewrite `D de <mes> de AAAA` as `AAAA-MM-DD`. Month names are matched
/// fuzzily; an unknown month leaves the span as written.
pub fn normalize_written_dates(text: &str) -> (String, Option<String>) {
    let mut hint: Option<String> = None;

    let rewritten = WRITTEN_DATE_RE.replace_all(text, |caps: &Captures<'_>| {
        let raw_month = caps[2].to_lowercase();
        let month = fuzzy_match(&raw_month, &MONTHS).and_then(|key| MONTHS.get(key));

        match month {
            Some(month) => {
                let date = format!("{}-{:02}-{:0>2}", &caps[3], month, &caps[1]);
                hint = Some(date.clone());
                date
            }
            None => caps[0].to_string(),
        }
    });

    (rewritten.into_owned(), hint)
}
