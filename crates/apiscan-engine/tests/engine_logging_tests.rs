#![allow(clippy::unwrap_used, clippy::expect_used)]

// Operation names are fixed, so all boundary assertions live in one test to
// keep the shared capture free of interleaved runs.

mod common;

use apiscan_core::logging_facility::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_ARTIFACT, FIELD_ARTIFACT_COUNT,
    FIELD_CHANGE_COUNT, FIELD_DURATION_MS, FIELD_ENTITY_COUNT, FIELD_ERR_CODE, FIELD_HIGHEST,
    FIELD_REJECTED_COUNT,
};
use apiscan_core::logging_facility::test_capture::init_test_capture;
use apiscan_core::{BuildOptions, CompatibilityPolicy};
use apiscan_engine::commands::compare::compare_snapshots;
use apiscan_engine::commands::dependencies::classify_dependencies;
use apiscan_engine::commands::scan::{scan_artifact, scan_artifacts, ArtifactInput};
use common::{multi_package_input, public_class};

#[test]
fn test_engine_operations_own_their_boundary_events() {
    let capture = init_test_capture();
    let options = BuildOptions::default();

    // scan_artifacts: one start, one end, regardless of artifact count
    let inputs = vec![multi_package_input("lib-1.0", 1), multi_package_input("lib-2.0", 2)];
    let scans = scan_artifacts(&inputs, &options).unwrap();
    assert_eq!(capture.lifecycle("scan_artifacts"), vec![EVENT_START, EVENT_END]);
    let end = capture.find("scan_artifacts", EVENT_END).expect("scan end event");
    assert_eq!(end.field(FIELD_ARTIFACT_COUNT), Some("2"));
    assert_eq!(end.field(FIELD_REJECTED_COUNT), Some("0"));
    assert!(end.field(FIELD_DURATION_MS).is_some());

    // scan_artifact names its artifact on start and sizes the snapshot on end
    let single = scan_artifact(&inputs[0], &options).unwrap();
    let start = capture.find("scan_artifact", EVENT_START).expect("scan start event");
    assert_eq!(start.field(FIELD_ARTIFACT), Some("lib-1.0"));
    let end = capture.find("scan_artifact", EVENT_END).expect("scan end event");
    assert_eq!(
        end.field(FIELD_ENTITY_COUNT),
        Some(single.snapshot.len().to_string().as_str())
    );

    // compare_snapshots
    let report = compare_snapshots(
        &scans[0].snapshot,
        &scans[1].snapshot,
        &CompatibilityPolicy::default(),
    )
    .unwrap();
    assert_eq!(capture.lifecycle("compare_snapshots"), vec![EVENT_START, EVENT_END]);
    let compare_end = capture.find("compare_snapshots", EVENT_END).expect("compare end event");
    assert_eq!(
        compare_end.field(FIELD_CHANGE_COUNT),
        Some(report.changes.len().to_string().as_str())
    );
    assert_eq!(compare_end.field(FIELD_HIGHEST), Some("breaking"));

    // classify_dependencies
    classify_dependencies(&scans[1].snapshot, &[scans[0].snapshot.clone()], &options);
    assert_eq!(
        capture.lifecycle("classify_dependencies"),
        vec![EVENT_START, EVENT_END]
    );

    // Failed scans end with an error event instead of an end event
    capture.clear();
    let dupes = ArtifactInput::new(
        "dupes",
        vec![public_class("com.acme.A"), public_class("com.acme.A")],
    );
    assert!(scan_artifacts(&[dupes], &options).is_err());
    assert_eq!(
        capture.lifecycle("scan_artifacts"),
        vec![EVENT_START, EVENT_END_ERROR]
    );
    let error = capture.find("scan_artifacts", EVENT_END_ERROR).expect("scan error event");
    assert_eq!(error.field(FIELD_ERR_CODE), Some("ERR_DUPLICATE_ENTITY"));
}
