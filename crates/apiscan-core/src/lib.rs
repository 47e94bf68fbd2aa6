//! apiscan core - API surface model and compatibility diff
//!
//! This crate provides:
//! - the canonical API model (entities, normalized type references, signature keys)
//! - the signature normalizer for JVM descriptors and generic signatures
//! - the model builder producing immutable snapshots
//! - the identity matcher and the compatibility diff engine
//! - configurable compatibility policies
//! - the surface reference index used for dependency classification
//!
//! The core is pure and synchronous; orchestration lives in `apiscan-engine`.

pub mod builder;
pub mod diff;
pub mod errors;
pub mod hierarchy;
pub mod logging_facility;
pub mod matcher;
pub mod model;
pub mod policy;
pub mod signature;
pub mod snapshot;
pub mod surface;

// Re-export commonly used types
pub use builder::{build, BuildOptions, BuildOutput};
pub use diff::{compare, ChangeKind, ChangeRecord, DeltaKind, Severity};
pub use errors::{ApiScanError, ExError, ExErrorKind, Result};
pub use matcher::{match_entities, EntityPair};
pub use model::{Entity, EntityKind, RawDeclaration, SignatureKey, TypeRef, Visibility};
pub use policy::CompatibilityPolicy;
pub use snapshot::Snapshot;
