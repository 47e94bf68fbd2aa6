//! Multi-artifact snapshot builds.
//!
//! Artifacts are independent, so each one is built on the rayon pool. The
//! output keeps input order and is complete or nothing: a duplicate key in
//! any artifact fails the whole call.

#![allow(clippy::result_large_err)]

use apiscan_core::builder::{build, BuildOptions};
use apiscan_core::errors::{ApiScanError, ExError};
use apiscan_core::model::RawDeclaration;
use apiscan_core::snapshot::Snapshot;
use apiscan_core::{log_op_end, log_op_error, log_op_start};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Raw declarations of one artifact, as delivered by the symbol source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactInput {
    pub name: String,
    pub declarations: Vec<RawDeclaration>,
}

impl ArtifactInput {
    pub fn new(name: impl Into<String>, declarations: Vec<RawDeclaration>) -> Self {
        Self {
            name: name.into(),
            declarations,
        }
    }
}

/// Snapshot of one artifact plus its rejected declarations.
#[derive(Debug, Clone)]
pub struct ArtifactScan {
    pub artifact: String,
    pub snapshot: Snapshot,
    pub rejected: Vec<ApiScanError>,
}

/// Build the snapshot of a single artifact.
///
/// ## Errors
///
/// - `DuplicateEntity`: two declarations share one signature key
pub fn scan_artifact(
    input: &ArtifactInput,
    options: &BuildOptions,
) -> Result<ArtifactScan, ExError> {
    log_op_start!("scan_artifact", artifact = input.name.as_str());
    let start = std::time::Instant::now();

    let result = scan_one(input, options, "scan_artifact").map_err(|e| {
        log_op_error!(
            "scan_artifact",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "scan_artifact",
        duration_ms = start.elapsed().as_millis() as u64,
        entity_count = result.snapshot.len(),
        rejected_count = result.rejected.len()
    );
    Ok(result)
}

/// Build snapshots for many artifacts in parallel.
///
/// ## Returns
///
/// One [`ArtifactScan`] per input, in input order.
///
/// ## Errors
///
/// - `DuplicateEntity`: raised by any artifact; no partial result is returned
pub fn scan_artifacts(
    inputs: &[ArtifactInput],
    options: &BuildOptions,
) -> Result<Vec<ArtifactScan>, ExError> {
    log_op_start!("scan_artifacts", artifact_count = inputs.len());
    let start = std::time::Instant::now();

    let result = inputs
        .par_iter()
        .map(|input| scan_one(input, options, "scan_artifacts"))
        .collect::<Result<Vec<_>, ExError>>()
        .map_err(|e| {
            log_op_error!(
                "scan_artifacts",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

    let rejected_count: usize = result.iter().map(|scan| scan.rejected.len()).sum();
    log_op_end!(
        "scan_artifacts",
        duration_ms = start.elapsed().as_millis() as u64,
        artifact_count = result.len(),
        rejected_count = rejected_count
    );
    Ok(result)
}

fn scan_one(
    input: &ArtifactInput,
    options: &BuildOptions,
    op: &str,
) -> Result<ArtifactScan, ExError> {
    let output = build(&input.name, &input.declarations, options)
        .map_err(|e| ExError::from(e).with_op(op).with_artifact(&input.name))?;
    for rejected in &output.rejected {
        tracing::debug!(artifact = input.name.as_str(), error = %rejected, "declaration rejected");
    }
    Ok(ArtifactScan {
        artifact: input.name.clone(),
        snapshot: output.snapshot,
        rejected: output.rejected,
    })
}
