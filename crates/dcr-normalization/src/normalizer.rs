//! Splitting, filtering and correcting raw drug fields.

use std::fmt;

use serde::Serialize;
use tracing::trace;

use dcr_model::{DrugMention, NormalizedName, TrialRecord};

use crate::corrections::CorrectionTable;

/// Prefixes marking non-pharmacological interventions in the registry.
pub const DEFAULT_NON_DRUG_PREFIXES: &[&str] = &["ND:"];

/// Why a token never reaches matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "prefix", rename_all = "snake_case")]
pub enum Rejection {
    Empty,
    NonDrug(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty name"),
            Self::NonDrug(prefix) => write!(f, "non-drug marker '{prefix}'"),
        }
    }
}

/// A token dropped during expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedToken {
    pub record: usize,
    pub raw: String,
    pub rejection: Rejection,
}

/// Result of expanding trial records into drug mentions.
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    pub mentions: Vec<DrugMention>,
    pub rejected: Vec<RejectedToken>,
}

/// Splits a combination field on commas, trimming each part.
///
/// Blank parts are kept so callers can count them as rejected.
pub fn split_combination(field: &str) -> Vec<&str> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return vec![""];
    }
    trimmed.split(',').map(str::trim).collect()
}

/// Canonicalizes free-text drug names for matching.
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    corrections: CorrectionTable,
    non_drug_prefixes: Vec<String>,
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::new(CorrectionTable::builtin())
    }
}

impl NameNormalizer {
    pub fn new(corrections: CorrectionTable) -> Self {
        Self {
            corrections,
            non_drug_prefixes: DEFAULT_NON_DRUG_PREFIXES
                .iter()
                .map(|prefix| (*prefix).to_string())
                .collect(),
        }
    }

    #[must_use]
    pub fn with_non_drug_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.non_drug_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn corrections(&self) -> &CorrectionTable {
        &self.corrections
    }

    /// Normalizes one drug token (already split from its field).
    pub fn normalize_token(&self, raw: &str) -> Result<NormalizedName, Rejection> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Rejection::Empty);
        }
        if let Some(prefix) = self
            .non_drug_prefixes
            .iter()
            .find(|prefix| trimmed.starts_with(prefix.as_str()))
        {
            return Err(Rejection::NonDrug(prefix.clone()));
        }
        let corrected = self.corrections.correct(trimmed).unwrap_or(trimmed);
        Ok(NormalizedName::new(corrected))
    }

    /// Normalizes a standalone name, such as an ignore-list row.
    pub fn normalize(&self, raw: &str) -> Option<NormalizedName> {
        self.normalize_token(raw).ok()
    }

    /// Splits and normalizes a raw drug field.
    pub fn normalize_field(&self, field: &str) -> Vec<Result<NormalizedName, Rejection>> {
        split_combination(field)
            .into_iter()
            .map(|token| self.normalize_token(token))
            .collect()
    }

    /// Expands trial records one-to-many into drug mentions.
    ///
    /// Each accepted token yields exactly one mention tied to its record
    /// index; rejected tokens are collected, not dropped silently.
    pub fn expand(&self, records: &[TrialRecord]) -> Expansion {
        let mut expansion = Expansion::default();
        for (index, record) in records.iter().enumerate() {
            for token in split_combination(&record.raw_drug_field) {
                match self.normalize_token(token) {
                    Ok(name) => expansion.mentions.push(DrugMention {
                        record: index,
                        raw: token.to_string(),
                        name,
                    }),
                    Err(rejection) => {
                        trace!(trial_id = %record.trial_id, token, %rejection, "token rejected");
                        expansion.rejected.push(RejectedToken {
                            record: index,
                            raw: token.to_string(),
                            rejection,
                        });
                    }
                }
            }
        }
        expansion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_combination_fields() {
        assert_eq!(
            split_combination("Ibuprofen, Paracetamol"),
            vec!["Ibuprofen", "Paracetamol"]
        );
        assert_eq!(split_combination(" A ,B,"), vec!["A", "B", ""]);
        assert_eq!(split_combination("   "), vec![""]);
    }

    #[test]
    fn slash_combinations_stay_whole() {
        assert_eq!(
            split_combination("Lopinavir/ritonavir"),
            vec!["Lopinavir/ritonavir"]
        );
    }

    #[test]
    fn rejects_empty_and_non_drug_tokens() {
        let normalizer = NameNormalizer::default();
        assert_eq!(normalizer.normalize_token("  "), Err(Rejection::Empty));
        assert_eq!(
            normalizer.normalize_token("ND: Placebo"),
            Err(Rejection::NonDrug("ND:".to_string()))
        );
    }

    #[test]
    fn applies_corrections_and_keeps_display_case() {
        let normalizer = NameNormalizer::default();
        let name = normalizer.normalize_token(" Hydoxychloroquine ").unwrap();
        assert_eq!(name.display, "Hydroxychloroquine");
        assert_eq!(name.key, "hydroxychloroquine");

        let plain = normalizer.normalize_token("Remdesivir").unwrap();
        assert_eq!(plain.display, "Remdesivir");
        assert_eq!(plain.key, "remdesivir");
    }

    #[test]
    fn custom_prefixes_replace_default() {
        let normalizer = NameNormalizer::default().with_non_drug_prefixes(["SC:"]);
        assert!(normalizer.normalize_token("ND: Placebo").is_ok());
        assert!(normalizer.normalize_token("SC: Oxygen").is_err());
    }

    #[test]
    fn expand_tracks_record_indices() {
        let normalizer = NameNormalizer::default();
        let records = vec![
            TrialRecord::new("NCT001", "Ibuprofen, Paracetamol"),
            TrialRecord::new("NCT002", "ND: Placebo, Ritonavir/lopinavir"),
        ];
        let expansion = normalizer.expand(&records);
        let names: Vec<(usize, &str)> = expansion
            .mentions
            .iter()
            .map(|mention| (mention.record, mention.name.display.as_str()))
            .collect();
        assert_eq!(
            names,
            vec![
                (0, "Ibuprofen"),
                (0, "Paracetamol"),
                (1, "Lopinavir/ritonavir"),
            ]
        );
        assert_eq!(expansion.rejected.len(), 1);
        assert_eq!(expansion.rejected[0].record, 1);
        assert_eq!(expansion.rejected[0].raw, "ND: Placebo");
    }
}
