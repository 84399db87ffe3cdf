use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::sanitize::{
    fix_whitespace, normalize_punctuation, normalize_unicode, remove_control_chars, strip_accents,
};
use super::temporal::{normalize_time_expressions, normalize_written_dates, resolve_relative_dates};
use super::types::{HintKind, Hints, NormalizationResult};

/// Deterministic text normalization run before the model sees a report:
/// fold → clean → resolve relative dates → clock times → written dates
/// → punctuation → whitespace.
///
/// The only configuration is the reference date relative words are
/// resolved against. It is fixed at construction, so two calls with the
/// same input always produce the same output.
#[derive(Debug, Clone)]
pub struct TextPreprocessor {
    reference_date: NaiveDateTime,
}

impl TextPreprocessor {
    pub fn new(reference_date: NaiveDateTime) -> Self {
        Self { reference_date }
    }

    /// Reference at midnight of `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.and_time(NaiveTime::MIN))
    }

    pub fn reference_date(&self) -> NaiveDateTime {
        self.reference_date
    }

    /// Run the full pipeline. Never fails: expressions that do not parse
    /// are left in the text and produce no hint.
    pub fn preprocess(&self, raw_text: &str) -> NormalizationResult {
        let text = normalize_unicode(raw_text);
        let text = strip_accents(&text);
        let text = text.to_lowercase();
        let text = remove_control_chars(&text);
        let text = fix_whitespace(&text);

        let mut hints = Hints::new();

        let (text, date_hint) = resolve_relative_dates(&text, self.reference_date);
        if let Some(date) = date_hint {
            hints.insert(HintKind::ReferenceDate, date);
        }

        let (text, time_hint) = normalize_time_expressions(&text);
        if let Some(time) = time_hint {
            hints.insert(HintKind::NormalizedTime, time);
        }

        let (text, written_hint) = normalize_written_dates(&text);
        if let Some(date) = written_hint {
            hints.insert(HintKind::NormalizedWrittenDate, date);
        }

        let text = normalize_punctuation(&text);
        let text = fix_whitespace(&text);

        tracing::debug!(
            input_chars = raw_text.chars().count(),
            hints = hints.len(),
            "Report text preprocessed"
        );

        NormalizationResult {
            cleaned_text: text.trim().to_string(),
            hints,
        }
    }
}
