//! Property tests for name normalization.

use proptest::prelude::*;

use dcr_normalization::{BUILTIN_CORRECTIONS, CorrectionTable, NameNormalizer};

fn drug_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 /-]{0,14}[A-Za-z0-9]"
}

#[test]
fn builtin_variants_share_targets() {
    let normalizer = NameNormalizer::default();
    for (left_from, left_to) in BUILTIN_CORRECTIONS {
        for (right_from, right_to) in BUILTIN_CORRECTIONS {
            if left_to != right_to {
                continue;
            }
            assert_eq!(
                normalizer.normalize(left_from),
                normalizer.normalize(right_from),
                "{left_from} and {right_from} should normalize identically"
            );
        }
    }
}

#[test]
fn lopinavir_orderings_collapse() {
    let normalizer = NameNormalizer::default();
    let a = normalizer.normalize("Ritonavir/lopinavir").unwrap();
    let b = normalizer.normalize("Lopinavir/Ritonavir").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.display, "Lopinavir/ritonavir");
}

proptest! {
    #[test]
    fn variants_mapped_to_one_target_normalize_identically(
        first in drug_name(),
        second in drug_name(),
        target in drug_name(),
    ) {
        let table = CorrectionTable::from_pairs([(&first, &target), (&second, &target)]);
        let normalizer = NameNormalizer::new(table);
        let left = normalizer.normalize(&first);
        let right = normalizer.normalize(&second);
        prop_assert!(left.is_some());
        prop_assert_eq!(left, right);
    }

    #[test]
    fn key_is_lowercase_display(name in drug_name()) {
        let normalizer = NameNormalizer::new(CorrectionTable::new());
        let normalized = normalizer.normalize(&name).unwrap();
        prop_assert_eq!(normalized.key, normalized.display.to_lowercase());
    }

    #[test]
    fn expansion_never_yields_combined_tokens(parts in prop::collection::vec(drug_name(), 1..5)) {
        let normalizer = NameNormalizer::new(CorrectionTable::new());
        let field = parts.join(", ");
        let results = normalizer.normalize_field(&field);
        prop_assert_eq!(results.len(), parts.len());
        for result in results {
            let name = result.unwrap();
            prop_assert!(!name.display.contains(','));
        }
    }
}
