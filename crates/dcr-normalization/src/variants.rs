//! Case-variant detection.
//!
//! Names differing only by case match the same compound, but they show up as
//! separate rows wherever display names are grouped. Listing them tells
//! curators which spellings still need a correction-table entry.

use std::collections::BTreeMap;

use serde::Serialize;

use dcr_model::DrugMention;

/// Several display spellings sharing one comparison key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseVariant {
    pub key: String,
    /// Spellings with their mention counts, most frequent first.
    pub spellings: Vec<(String, usize)>,
}

/// Finds keys reached by more than one display spelling.
///
/// Output is sorted by total mentions, highest first, then by key.
pub fn case_variants(mentions: &[DrugMention]) -> Vec<CaseVariant> {
    let mut by_key: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();
    for mention in mentions {
        *by_key
            .entry(mention.name.key.as_str())
            .or_default()
            .entry(mention.name.display.as_str())
            .or_insert(0) += 1;
    }
    let mut variants: Vec<CaseVariant> = by_key
        .into_iter()
        .filter(|(_, spellings)| spellings.len() > 1)
        .map(|(key, spellings)| {
            let mut spellings: Vec<(String, usize)> = spellings
                .into_iter()
                .map(|(spelling, count)| (spelling.to_string(), count))
                .collect();
            spellings.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            CaseVariant {
                key: key.to_string(),
                spellings,
            }
        })
        .collect();
    variants.sort_by(|a, b| total(b).cmp(&total(a)).then_with(|| a.key.cmp(&b.key)));
    variants
}

fn total(variant: &CaseVariant) -> usize {
    variant.spellings.iter().map(|(_, count)| count).sum()
}
