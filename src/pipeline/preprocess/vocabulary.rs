//! Controlled vocabularies for temporal expressions (pt-BR, accents stripped).

use std::sync::LazyLock;

/// Immutable keyword table. Iteration follows construction order, which
/// is what makes fuzzy tie-breaks reproducible.
#[derive(Debug, Clone)]
pub struct Vocabulary<V> {
    entries: Vec<(String, V)>,
}

impl<V> Vocabulary<V> {
    pub fn new<K: Into<String>>(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns the stored key equal to `key`, borrowed from the vocabulary.
    pub fn key_of(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(k, _)| k.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Relative day words → offset in days from the reference date.
pub static RELATIVE_DAYS: LazyLock<Vocabulary<i64>> = LazyLock::new(|| {
    Vocabulary::new([
        ("amanha", 1),
        ("hoje", 0),
        ("ontem", -1),
        ("anteontem", -2),
        ("ante-ontem", -2),
    ])
});

/// Month names → month number. "marco" is spelled without the cedilla
/// because accents are gone by the time months are matched.
pub static MONTHS: LazyLock<Vocabulary<u32>> = LazyLock::new(|| {
    Vocabulary::new([
        ("janeiro", 1),
        ("fevereiro", 2),
        ("marco", 3),
        ("abril", 4),
        ("maio", 5),
        ("junho", 6),
        ("julho", 7),
        ("agosto", 8),
        ("setembro", 9),
        ("outubro", 10),
        ("novembro", 11),
        ("dezembro", 12),
    ])
});
