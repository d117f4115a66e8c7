//! Alias to compound index.
//!
//! Cardinality: many aliases map to one compound; an alias never maps to two.

use std::collections::HashMap;

use tracing::{debug, warn};

use dcr_model::{CanonicalCompound, ConflictKind, SynonymConflict};

/// Comparison key for an alias or a trial drug name.
pub fn alias_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Clone, Default)]
pub struct SynonymIndex {
    /// Alias key to position in the compound list the index was built from.
    entries: HashMap<String, usize>,
    names: Vec<String>,
}

impl SynonymIndex {
    /// Builds the index, returning every conflict met on the way.
    ///
    /// Compound names go in before any alias, so a compound always resolves
    /// to itself even when another row lists its name as an alias. Within
    /// each pass the first claimant wins.
    pub fn build(compounds: &[CanonicalCompound]) -> (Self, Vec<SynonymConflict>) {
        let mut index = Self {
            entries: HashMap::new(),
            names: compounds.iter().map(|c| c.compound_name.clone()).collect(),
        };
        let mut conflicts = Vec::new();

        for (position, compound) in compounds.iter().enumerate() {
            let key = alias_key(&compound.compound_name);
            if let Some(&existing) = index.entries.get(&key) {
                conflicts.push(SynonymConflict {
                    alias: compound.compound_name.clone(),
                    kept: index.names[existing].clone(),
                    rejected: compound.compound_name.clone(),
                    kind: ConflictKind::DuplicateCompound,
                });
                continue;
            }
            index.entries.insert(key, position);
        }

        for compound in compounds {
            // A duplicate row's aliases belong to the row holding its name.
            let Some(owner) = index.position(&compound.compound_name) else {
                continue;
            };
            for alias in compound.synonyms().into_iter().skip(1) {
                let key = alias_key(alias);
                match index.entries.get(&key) {
                    None => {
                        index.entries.insert(key, owner);
                    }
                    Some(&existing) if existing == owner => {}
                    Some(&existing) => conflicts.push(SynonymConflict {
                        alias: alias.to_string(),
                        kept: index.names[existing].clone(),
                        rejected: compound.compound_name.clone(),
                        kind: ConflictKind::Alias,
                    }),
                }
            }
        }

        for conflict in &conflicts {
            warn!(%conflict, "synonym conflict");
        }
        debug!(
            compounds = compounds.len(),
            aliases = index.entries.len(),
            conflicts = conflicts.len(),
            "built synonym index"
        );
        (index, conflicts)
    }

    /// Case-insensitive lookup of a name or alias.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.position(name).map(|position| self.names[position].as_str())
    }

    /// Position of the matching compound in the list the index was built from.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.get(&alias_key(name)).copied()
    }

    pub fn position_by_key(&self, key: &str) -> Option<usize> {
        self.entries.get(key).copied()
    }

    /// Number of distinct alias keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<CanonicalCompound> {
        vec![
            CanonicalCompound::new("Lopinavir/ritonavir")
                .with_clinical_names(["ABT-378/r"])
                .with_other_names(["Kaletra", "Aluvia"]),
            CanonicalCompound::new("Ritonavir").with_other_names(["Norvir", "Kaletra"]),
            CanonicalCompound::new("Chloroquine").with_other_names(["Ritonavir"]),
        ]
    }

    #[test]
    fn resolves_names_and_aliases_case_insensitively() {
        let (index, _) = SynonymIndex::build(&roster());
        assert_eq!(index.lookup("KALETRA"), Some("Lopinavir/ritonavir"));
        assert_eq!(index.lookup(" abt-378/r "), Some("Lopinavir/ritonavir"));
        assert_eq!(index.lookup("norvir"), Some("Ritonavir"));
        assert_eq!(index.lookup("Paracetamol"), None);
    }

    #[test]
    fn own_name_beats_foreign_alias() {
        let (index, conflicts) = SynonymIndex::build(&roster());
        assert_eq!(index.lookup("ritonavir"), Some("Ritonavir"));
        assert!(conflicts.iter().any(|c| c.alias == "Ritonavir"
            && c.kept == "Ritonavir"
            && c.rejected == "Chloroquine"
            && c.kind == ConflictKind::Alias));
    }

    #[test]
    fn alias_conflicts_are_first_wins_and_recorded() {
        let (index, conflicts) = SynonymIndex::build(&roster());
        assert_eq!(index.lookup("kaletra"), Some("Lopinavir/ritonavir"));
        let kaletra: Vec<_> = conflicts.iter().filter(|c| c.alias == "Kaletra").collect();
        assert_eq!(kaletra.len(), 1);
        assert_eq!(kaletra[0].kept, "Lopinavir/ritonavir");
        assert_eq!(kaletra[0].rejected, "Ritonavir");
    }

    #[test]
    fn duplicate_compound_rows_are_reported() {
        let compounds = vec![
            CanonicalCompound::new("Remdesivir").with_other_names(["GS-5734"]),
            CanonicalCompound::new("remdesivir").with_other_names(["GS-5734"]),
        ];
        let (index, conflicts) = SynonymIndex::build(&compounds);
        assert_eq!(index.position("REMDESIVIR"), Some(0));
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::DuplicateCompound);
        assert_eq!(conflicts[0].rejected, "remdesivir");
    }

    #[test]
    fn duplicate_row_aliases_route_to_first_row() {
        let compounds = vec![
            CanonicalCompound::new("Remdesivir"),
            CanonicalCompound::new("remdesivir").with_other_names(["GS-5734"]),
        ];
        let (index, conflicts) = SynonymIndex::build(&compounds);
        assert_eq!(index.position("gs-5734"), Some(0));
        assert_eq!(index.lookup("GS-5734"), Some("Remdesivir"));
        assert_eq!(conflicts.len(), 1);
    }
}
