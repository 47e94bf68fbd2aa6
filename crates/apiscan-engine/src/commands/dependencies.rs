//! Dependency classification.
//!
//! A dependency is an *api* dependency when it declares a type the local
//! artifact's API consumes; consumers compiling against the local artifact
//! then need it too. Otherwise it is an *implementation* dependency.

use apiscan_core::builder::BuildOptions;
use apiscan_core::snapshot::Snapshot;
use apiscan_core::surface::{declared_types, external_references};
use apiscan_core::{log_op_end, log_op_start};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Classification of a local artifact's dependencies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyReport {
    /// Dependency artifact → consumed types it provides, sorted
    pub api: BTreeMap<String, Vec<String>>,
    /// Dependencies providing no consumed type, in input order
    pub implementation: Vec<String>,
    /// Consumed types no dependency declares (platform names excluded), sorted
    pub unresolved: Vec<String>,
}

/// Classify `dependencies` by what the API of `local` consumes.
///
/// `options.platform_prefixes` decides which names are never unresolved.
pub fn classify_dependencies(
    local: &Snapshot,
    dependencies: &[Snapshot],
    options: &BuildOptions,
) -> DependencyReport {
    log_op_start!(
        "classify_dependencies",
        artifact = local.artifact(),
        dependency_count = dependencies.len()
    );
    let start = std::time::Instant::now();

    let consumed = external_references(local);
    let provided: Vec<(String, BTreeSet<String>)> = dependencies
        .par_iter()
        .map(|dep| (dep.artifact().to_string(), declared_types(dep)))
        .collect();

    let mut report = DependencyReport::default();
    let mut covered: BTreeSet<&String> = BTreeSet::new();
    for (artifact, declared) in &provided {
        let used: Vec<String> = consumed.intersection(declared).cloned().collect();
        if used.is_empty() {
            report.implementation.push(artifact.clone());
        } else {
            report.api.entry(artifact.clone()).or_default().extend(used);
        }
        covered.extend(declared.iter());
    }
    report.unresolved = consumed
        .iter()
        .filter(|name| !covered.contains(name) && !options.is_platform(name))
        .cloned()
        .collect();
    for types in report.api.values_mut() {
        types.sort();
        types.dedup();
    }

    log_op_end!(
        "classify_dependencies",
        duration_ms = start.elapsed().as_millis() as u64,
        api_count = report.api.len(),
        implementation_count = report.implementation.len(),
        unresolved_count = report.unresolved.len()
    );
    report
}
