//! Partitioned parallel comparison of two snapshots.
//!
//! Entity pairs are grouped by package, partitions are diffed on the rayon
//! pool, and the merged records are stably re-sorted by signature key. The
//! result is identical to the sequential [`apiscan_core::diff::compare`].

#![allow(clippy::result_large_err)]

use apiscan_core::diff::{ChangeKind, ChangeRecord, DiffContext, Severity};
use apiscan_core::errors::{ExError, ExErrorKind};
use apiscan_core::matcher::{match_entities, EntityPair};
use apiscan_core::policy::CompatibilityPolicy;
use apiscan_core::snapshot::Snapshot;
use apiscan_core::{log_op_end, log_op_error, log_op_start};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Classified changes plus summary counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareReport {
    pub old_artifact: String,
    pub new_artifact: String,
    pub changes: Vec<ChangeRecord>,
    /// Number of change records per severity (every severity present)
    pub counts: BTreeMap<Severity, usize>,
    /// Highest record severity; `None` when nothing changed
    pub highest: Option<Severity>,
}

impl CompareReport {
    fn from_changes(old: &Snapshot, new: &Snapshot, changes: Vec<ChangeRecord>) -> Self {
        let mut counts: BTreeMap<Severity, usize> = Severity::ALL.iter().map(|s| (*s, 0)).collect();
        for change in &changes {
            *counts.entry(change.severity).or_default() += 1;
        }
        let highest = changes.iter().map(|c| c.severity).max();
        Self {
            old_artifact: old.artifact().to_string(),
            new_artifact: new.artifact().to_string(),
            changes,
            counts,
            highest,
        }
    }

    pub fn is_breaking(&self) -> bool {
        self.highest == Some(Severity::Breaking)
    }

    /// Records of one change kind, in report order.
    pub fn of_kind(&self, kind: ChangeKind) -> impl Iterator<Item = &ChangeRecord> {
        self.changes.iter().filter(move |c| c.kind == kind)
    }
}

/// Compare two snapshots with the given policy.
///
/// ## Errors
///
/// - `DeterminismViolation`: the report failed its serialization round-trip
///   check (should never occur in correct builds)
pub fn compare_snapshots(
    old: &Snapshot,
    new: &Snapshot,
    policy: &CompatibilityPolicy,
) -> Result<CompareReport, ExError> {
    log_op_start!(
        "compare_snapshots",
        old_artifact = old.artifact(),
        new_artifact = new.artifact()
    );
    let start = std::time::Instant::now();

    let report = compare_impl(old, new, policy).map_err(|e| {
        log_op_error!(
            "compare_snapshots",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "compare_snapshots",
        duration_ms = start.elapsed().as_millis() as u64,
        change_count = report.changes.len(),
        highest = report.highest.map(Severity::as_str).unwrap_or("none")
    );
    Ok(report)
}

fn compare_impl(
    old: &Snapshot,
    new: &Snapshot,
    policy: &CompatibilityPolicy,
) -> Result<CompareReport, ExError> {
    let ctx = DiffContext::new(old, new, policy);
    let partitions = partition_by_package(match_entities(old, new));
    tracing::debug!(partition_count = partitions.len(), "diffing partitions");

    let mut changes: Vec<ChangeRecord> = partitions
        .par_iter()
        .flat_map_iter(|(_, pairs)| pairs.iter().filter_map(|pair| ctx.diff_pair(pair)))
        .collect();
    changes.sort_by(|x, y| x.key.cmp(&y.key));

    let report = CompareReport::from_changes(old, new, changes);
    check_round_trip(&report)?;
    Ok(report)
}

/// Group pairs by the package of their top-level type, keeping key order
/// inside each group.
fn partition_by_package(pairs: Vec<EntityPair<'_>>) -> Vec<(String, Vec<EntityPair<'_>>)> {
    let mut groups: BTreeMap<String, Vec<EntityPair<'_>>> = BTreeMap::new();
    for pair in pairs {
        let package = pair
            .key
            .top_level_type()
            .rsplit_once('.')
            .map(|(package, _)| package)
            .unwrap_or("")
            .to_string();
        groups.entry(package).or_default().push(pair);
    }
    groups.into_iter().collect()
}

/// Determinism guard: round-trip through JSON must produce an equal report.
fn check_round_trip(report: &CompareReport) -> Result<(), ExError> {
    let serialized = serde_json::to_string(report).map_err(|e| {
        ExError::new(ExErrorKind::DeterminismViolation)
            .with_op("compare_snapshots")
            .with_message(format!("failed to serialize report: {}", e))
    })?;
    let reparsed: CompareReport = serde_json::from_str(&serialized).map_err(|e| {
        ExError::new(ExErrorKind::DeterminismViolation)
            .with_op("compare_snapshots")
            .with_message(format!("failed to re-parse report: {}", e))
    })?;
    if &reparsed != report {
        return Err(ExError::new(ExErrorKind::DeterminismViolation)
            .with_op("compare_snapshots")
            .with_message("report is not deterministic: round-trip produced different struct"));
    }
    Ok(())
}
