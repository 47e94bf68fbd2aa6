//! Engine-level commands as data, with a single dispatch entry point.

#![allow(clippy::result_large_err)]

use crate::commands::compare::{compare_snapshots, CompareReport};
use crate::commands::dependencies::{classify_dependencies, DependencyReport};
use crate::commands::scan::{scan_artifacts, ArtifactInput, ArtifactScan};
use apiscan_core::builder::BuildOptions;
use apiscan_core::errors::ExError;
use apiscan_core::policy::CompatibilityPolicy;
use apiscan_core::snapshot::Snapshot;

/// Engine-level commands.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Build snapshots for a set of artifacts.
    Scan {
        inputs: Vec<ArtifactInput>,
        options: BuildOptions,
    },
    /// Compare an old and a new snapshot.
    Compare {
        old: Snapshot,
        new: Snapshot,
        policy: CompatibilityPolicy,
    },
    /// Classify the dependencies of a local snapshot.
    ClassifyDependencies {
        local: Snapshot,
        dependencies: Vec<Snapshot>,
        options: BuildOptions,
    },
}

/// Result of applying an engine command.
#[derive(Debug, Clone)]
pub enum EngineCommandResult {
    Scan(Vec<ArtifactScan>),
    Compare(CompareReport),
    ClassifyDependencies(DependencyReport),
}

/// Apply an engine command.
pub fn apply_engine_command(cmd: EngineCommand) -> Result<EngineCommandResult, ExError> {
    match cmd {
        EngineCommand::Scan { inputs, options } => {
            scan_artifacts(&inputs, &options).map(EngineCommandResult::Scan)
        }
        EngineCommand::Compare { old, new, policy } => {
            compare_snapshots(&old, &new, &policy).map(EngineCommandResult::Compare)
        }
        EngineCommand::ClassifyDependencies {
            local,
            dependencies,
            options,
        } => Ok(EngineCommandResult::ClassifyDependencies(classify_dependencies(
            &local,
            &dependencies,
            &options,
        ))),
    }
}
