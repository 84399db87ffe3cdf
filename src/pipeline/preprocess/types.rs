use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Literal written in place of a detected-but-impossible temporal value.
pub const INVALID_SENTINEL: &str = "INVALIDO";

/// Kind of temporal hint extracted during preprocessing.
///
/// Declaration order is the order hints are listed in prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintKind {
    /// Absolute date resolved from a relative word ("ontem", "amanha").
    ReferenceDate,
    /// Last clock time seen, as `HH:MM` or the invalid sentinel.
    NormalizedTime,
    /// Last written-out date seen ("3 de abril de 2024"), as `YYYY-MM-DD`.
    NormalizedWrittenDate,
}

impl HintKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReferenceDate => "reference_date",
            Self::NormalizedTime => "normalized_time",
            Self::NormalizedWrittenDate => "normalized_written_date",
        }
    }
}

impl fmt::Display for HintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hints keyed by kind; only stages that fired have an entry.
pub type Hints = BTreeMap<HintKind, String>;

/// Output of one preprocessing call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationResult {
    pub cleaned_text: String,
    pub hints: Hints,
}

impl NormalizationResult {
    pub fn hint(&self, kind: HintKind) -> Option<&str> {
        self.hints.get(&kind).map(String::as_str)
    }
}
