//! End-to-end reconciliation scenarios.

use dcr_core::{ReconcileOptions, Reconciliation, reconcile};
use dcr_model::{CanonicalCompound, IgnoredEntry, TrialRecord};
use dcr_normalization::{CorrectionTable, NameNormalizer};

fn run(
    compounds: Vec<CanonicalCompound>,
    trials: &[TrialRecord],
    ignored: &[IgnoredEntry],
) -> Reconciliation {
    reconcile(
        compounds,
        trials,
        ignored,
        &NameNormalizer::default(),
        &ReconcileOptions::default(),
    )
    .expect("reconcile")
}

#[test]
fn combination_field_matches_one_drug_and_leaves_the_other_missing() {
    let trials = vec![
        TrialRecord::new("NCT001", "Ibuprofen, Paracetamol").with_url("https://example.org/NCT001"),
    ];
    let result = run(vec![CanonicalCompound::new("Ibuprofen")], &trials, &[]);

    assert_eq!(result.stats.mentions, 2);
    let ibuprofen = &result.compounds[0];
    assert_eq!(ibuprofen.trials, vec!["NCT001"]);
    assert_eq!(
        ibuprofen.trial_display.as_deref(),
        Some("<a href=\"https://example.org/NCT001\">NCT001</a>")
    );
    assert!(ibuprofen.status.as_deref().unwrap().contains("Covid trial"));

    let missing: Vec<&str> = result.missing.iter().map(|m| m.drug_name.as_str()).collect();
    assert_eq!(missing, vec!["Paracetamol"]);
}

#[test]
fn misspelled_trial_name_matches_after_correction() {
    let trials = vec![TrialRecord::new("NCT010", "Hydoxychloroquine")];
    let result = run(
        vec![CanonicalCompound::new("Hydroxychloroquine")],
        &trials,
        &[],
    );
    assert_eq!(result.compounds[0].trials, vec!["NCT010"]);
    assert!(result.missing.is_empty());
}

#[test]
fn custom_correction_table_extends_matching() {
    let mut corrections = CorrectionTable::builtin();
    corrections.insert("Favipiravr", "Favipiravir");
    let normalizer = NameNormalizer::new(corrections);
    let trials = vec![TrialRecord::new("NCT011", "favipiravr")];
    let result = reconcile(
        vec![CanonicalCompound::new("Favipiravir")],
        &trials,
        &[],
        &normalizer,
        &ReconcileOptions::default(),
    )
    .unwrap();
    assert_eq!(result.compounds[0].trials, vec!["NCT011"]);
}

#[test]
fn ignored_names_never_reach_the_missing_list() {
    let trials = vec![TrialRecord::new("NCT020", "Saline, Remdesivir")];
    let result = run(
        Vec::new(),
        &trials,
        &[IgnoredEntry::new("saline").with_reason("Placebo")],
    );
    let missing: Vec<&str> = result.missing.iter().map(|m| m.drug_name.as_str()).collect();
    assert_eq!(missing, vec!["Remdesivir"]);
    assert_eq!(result.stats.ignored, 1);
}

#[test]
fn non_drug_tokens_are_rejected_everywhere() {
    let trials = vec![TrialRecord::new("NCT030", "ND: Placebo")];
    let result = run(vec![CanonicalCompound::new("Placebo")], &trials, &[]);
    assert_eq!(result.stats.rejected, 1);
    assert_eq!(result.stats.mentions, 0);
    assert!(result.compounds[0].trials.is_empty());
    assert!(result.missing.is_empty());
}

#[test]
fn aliases_route_trials_to_the_canonical_row() {
    let compounds = vec![
        CanonicalCompound::new("Lopinavir/ritonavir")
            .with_other_names(["Kaletra"])
            .with_status("Approved"),
        CanonicalCompound::new("Ibuprofen"),
    ];
    let trials = vec![
        TrialRecord::new("NCT040", "Kaletra"),
        TrialRecord::new("NCT041", "lopinavir/ritonavir, KALETRA"),
    ];
    let result = run(compounds, &trials, &[]);
    let lopinavir = &result.compounds[0];
    assert_eq!(lopinavir.trials, vec!["NCT040", "NCT041"]);
    assert_eq!(lopinavir.status.as_deref(), Some("Covid trial, Approved"));
    assert!(result.compounds[1].trials.is_empty());
    assert_eq!(result.compounds[1].status, None);
    assert_eq!(result.stats.compounds_with_trials, 1);
}

#[test]
fn second_run_on_its_own_output_changes_nothing() {
    let compounds = vec![
        CanonicalCompound::new("Ibuprofen").with_status("Approved"),
        CanonicalCompound::new("Remdesivir"),
    ];
    let trials = vec![
        TrialRecord::new("NCT050", "Ibuprofen, Abcxyz"),
        TrialRecord::new("NCT051", "Remdesivir"),
    ];
    let first = run(compounds, &trials, &[]);
    let second = run(first.compounds.clone(), &trials, &[]);

    assert_eq!(first.compounds, second.compounds);
    assert_eq!(first.missing, second.missing);
    assert_eq!(
        second.compounds[0].status.as_deref(),
        Some("Covid trial, Approved")
    );
}

#[test]
fn alias_on_case_variant_duplicate_row_reaches_the_first_row() {
    let compounds = vec![
        CanonicalCompound::new("Remdesivir"),
        CanonicalCompound::new("remdesivir").with_other_names(["GS-5734"]),
    ];
    let trials = vec![TrialRecord::new("NCT100", "GS-5734")];
    let result = run(compounds, &trials, &[]);

    assert_eq!(result.stats.matched, 1);
    assert_eq!(result.compounds[0].trials, vec!["NCT100"]);
    assert_eq!(result.compounds[0].status.as_deref(), Some("Covid trial"));
    assert!(result.compounds[1].trials.is_empty());
    assert_eq!(result.stats.compounds_with_trials, 1);
    assert_eq!(result.conflicts.len(), 1);
}
