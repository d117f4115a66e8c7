//! Spelling correction table.

use std::collections::BTreeMap;

/// Corrections known from the registry export.
///
/// Combination drugs appear in both orders and several casings; each row maps
/// a variant to the roster spelling.
pub const BUILTIN_CORRECTIONS: &[(&str, &str)] = &[
    ("Hydoxychloroquine", "Hydroxychloroquine"),
    ("Ritonavir/lopinavir", "Lopinavir/ritonavir"),
    ("Lopinavir/Ritonavir", "Lopinavir/ritonavir"),
    ("Interferon Beta-1A", "Interferon beta-1a"),
    ("Interferon beta-1A", "Interferon beta-1a"),
    ("Ascorbic Acid", "Ascorbic acid"),
    ("Interferon Beta-1B", "Interferon beta-1b"),
    ("Nitric Oxide", "Nitric oxide"),
];

/// Maps raw spellings to their corrected form.
///
/// Lookup tries the exact (trimmed) spelling first, then falls back to a
/// case-insensitive match. Later inserts override earlier ones, so an
/// external table layered over the built-in one wins.
#[derive(Debug, Clone, Default)]
pub struct CorrectionTable {
    exact: BTreeMap<String, String>,
    folded: BTreeMap<String, String>,
}

impl CorrectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table seeded with [`BUILTIN_CORRECTIONS`].
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_CORRECTIONS.iter().copied())
    }

    pub fn from_pairs<I, F, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (F, T)>,
        F: AsRef<str>,
        T: AsRef<str>,
    {
        let mut table = Self::new();
        table.extend(pairs);
        table
    }

    pub fn insert(&mut self, from: &str, to: &str) {
        let from = from.trim();
        let to = to.trim();
        if from.is_empty() || to.is_empty() {
            return;
        }
        self.exact.insert(from.to_string(), to.to_string());
        self.folded.insert(from.to_lowercase(), to.to_string());
    }

    pub fn extend<I, F, T>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (F, T)>,
        F: AsRef<str>,
        T: AsRef<str>,
    {
        for (from, to) in pairs {
            self.insert(from.as_ref(), to.as_ref());
        }
    }

    /// Returns the corrected spelling for `raw`, if the table knows one.
    pub fn correct(&self, raw: &str) -> Option<&str> {
        let trimmed = raw.trim();
        self.exact
            .get(trimmed)
            .or_else(|| self.folded.get(&trimmed.to_lowercase()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }

    /// Iterates `(from, to)` pairs in sorted order of `from`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.exact
            .iter()
            .map(|(from, to)| (from.as_str(), to.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_wins_over_folded() {
        let mut table = CorrectionTable::new();
        table.insert("ABC", "Alpha");
        table.insert("abc", "Beta");
        assert_eq!(table.correct("ABC"), Some("Alpha"));
        assert_eq!(table.correct("abc"), Some("Beta"));
        // Folded map holds the latest insert for "abc".
        assert_eq!(table.correct("Abc"), Some("Beta"));
    }

    #[test]
    fn later_insert_overrides() {
        let mut table = CorrectionTable::builtin();
        table.insert("Nitric Oxide", "NO");
        assert_eq!(table.correct("Nitric Oxide"), Some("NO"));
    }

    #[test]
    fn blank_pairs_are_ignored() {
        let table = CorrectionTable::from_pairs([("", "x"), ("y", " ")]);
        assert!(table.is_empty());
    }

    #[test]
    fn builtin_has_every_row() {
        assert_eq!(CorrectionTable::builtin().len(), BUILTIN_CORRECTIONS.len());
    }
}
