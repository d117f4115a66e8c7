//! Tests for dcr-model types.

use dcr_model::{CanonicalCompound, LookupStatus, MissingEntry, NormalizedName};

#[test]
fn synonyms_include_own_name_first_and_dedupe_case_insensitively() {
    let compound = CanonicalCompound::new("Lopinavir/ritonavir")
        .with_clinical_names(["ABT-378/r", "lopinavir/Ritonavir"])
        .with_other_names(["Kaletra", " ", "KALETRA"]);

    assert_eq!(
        compound.synonyms(),
        vec!["Lopinavir/ritonavir", "ABT-378/r", "Kaletra"]
    );
}

#[test]
fn blank_status_is_none() {
    let compound = CanonicalCompound::new("Ibuprofen").with_status("  ");
    assert_eq!(compound.status, None);
}

#[test]
fn normalized_name_key_is_lowercase() {
    let name = NormalizedName::new("Interferon beta-1a");
    assert_eq!(name.display, "Interferon beta-1a");
    assert_eq!(name.key, "interferon beta-1a");
}

#[test]
fn lookup_status_labels_round_trip() {
    for status in [
        LookupStatus::Found,
        LookupStatus::NotFound,
        LookupStatus::Failed(String::new()),
        LookupStatus::Skipped,
    ] {
        assert_eq!(LookupStatus::from_label(status.label()), Some(status));
    }
    assert_eq!(LookupStatus::from_label(""), Some(LookupStatus::Skipped));
    assert_eq!(LookupStatus::from_label("maybe"), None);
}

#[test]
fn only_answered_lookups_are_settled() {
    assert!(LookupStatus::Found.is_settled());
    assert!(LookupStatus::NotFound.is_settled());
    assert!(!LookupStatus::Failed("timeout".to_string()).is_settled());
    assert!(!LookupStatus::Skipped.is_settled());
}

#[test]
fn missing_entry_serializes_status_with_reason() {
    let mut entry = MissingEntry::new("Saline");
    entry.lookup = LookupStatus::Failed("connection refused".to_string());
    let json = serde_json::to_value(&entry).expect("serialize entry");
    assert_eq!(json["key"], "saline");
    assert_eq!(json["lookup"]["status"], "failed");
    assert_eq!(json["lookup"]["reason"], "connection refused");
}
