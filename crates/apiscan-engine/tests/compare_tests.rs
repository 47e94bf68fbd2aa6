#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use apiscan_core::{compare, BuildOptions, ChangeKind, CompatibilityPolicy, Severity};
use apiscan_engine::commands::compare::{compare_snapshots, CompareReport};
use apiscan_engine::commands::scan::scan_artifact;
use common::{multi_package_input, public_class, public_method, snapshot};

fn versions() -> (apiscan_core::Snapshot, apiscan_core::Snapshot) {
    let options = BuildOptions::default();
    let old = scan_artifact(&multi_package_input("lib-1.0", 1), &options).unwrap();
    let new = scan_artifact(&multi_package_input("lib-2.0", 2), &options).unwrap();
    (old.snapshot, new.snapshot)
}

#[test]
fn test_partitioned_compare_equals_sequential_compare() {
    let (old, new) = versions();
    let policy = CompatibilityPolicy::default();

    let report = compare_snapshots(&old, &new, &policy).unwrap();
    assert_eq!(report.changes, compare(&old, &new, &policy));
}

#[test]
fn test_report_counts_and_highest() {
    let (old, new) = versions();
    let report = compare_snapshots(&old, &new, &CompatibilityPolicy::default()).unwrap();

    // Per package: legacy removed, fresh added, items narrowed
    assert_eq!(report.changes.len(), 12);
    assert_eq!(report.counts[&Severity::Breaking], 4);
    assert_eq!(report.counts[&Severity::Compatible], 8);
    assert_eq!(report.counts[&Severity::Informational], 0);
    assert_eq!(report.counts[&Severity::Unknown], 0);
    assert_eq!(report.counts.values().sum::<usize>(), report.changes.len());
    assert_eq!(report.highest, Some(Severity::Breaking));
    assert!(report.is_breaking());

    assert_eq!(report.of_kind(ChangeKind::Removed).count(), 4);
    assert_eq!(report.of_kind(ChangeKind::Added).count(), 4);
    assert_eq!(report.of_kind(ChangeKind::Modified).count(), 4);
    assert_eq!(report.old_artifact, "lib-1.0");
    assert_eq!(report.new_artifact, "lib-2.0");
}

#[test]
fn test_changes_are_in_key_order() {
    let (old, new) = versions();
    let report = compare_snapshots(&old, &new, &CompatibilityPolicy::default()).unwrap();
    let keys: Vec<_> = report.changes.iter().map(|c| c.key.clone()).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn test_identical_snapshots_produce_empty_report() {
    let (old, _) = versions();
    let report = compare_snapshots(&old, &old, &CompatibilityPolicy::default()).unwrap();
    assert!(report.changes.is_empty());
    assert_eq!(report.highest, None);
    assert!(!report.is_breaking());
    assert!(report.counts.values().all(|c| *c == 0));
    assert_eq!(report.counts.len(), Severity::ALL.len());
}

#[test]
fn test_report_is_repeatable_and_serializable() {
    let (old, new) = versions();
    let policy = CompatibilityPolicy::default();
    let first = compare_snapshots(&old, &new, &policy).unwrap();
    let second = compare_snapshots(&old, &new, &policy).unwrap();
    assert_eq!(first, second);

    let json = serde_json::to_string(&first).unwrap();
    let back: CompareReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, first);
}

#[test]
fn test_policy_changes_report_severities() {
    let old = snapshot(
        "1.0",
        vec![public_class("com.acme.Api"), public_method("com.acme.Api#load")],
    );
    let new = snapshot(
        "2.0",
        vec![
            public_class("com.acme.Api"),
            public_method("com.acme.Api#load").throwing("java/io/IOException"),
        ],
    );
    let strict = compare_snapshots(&old, &new, &CompatibilityPolicy::default()).unwrap();
    let binary =
        compare_snapshots(&old, &new, &CompatibilityPolicy::binary_compatibility()).unwrap();
    assert_eq!(strict.highest, Some(Severity::Breaking));
    assert_eq!(binary.highest, Some(Severity::Informational));
}
