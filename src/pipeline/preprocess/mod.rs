//! Deterministic normalization of incident report text.
//!
//! Everything here is a pure function of the input text and the
//! reference date: no I/O, no shared mutable state, and no failure modes.
//! The model downstream is non-deterministic, so the dates, times and
//! validity flags produced here are the only guaranteed-correct signals.

pub mod types;
pub mod vocabulary;
pub mod fuzzy;
pub mod sanitize;
pub mod temporal;
pub mod preprocessor;

pub use types::*;
pub use vocabulary::{Vocabulary, MONTHS, RELATIVE_DAYS};
pub use fuzzy::fuzzy_match;
pub use preprocessor::TextPreprocessor;
