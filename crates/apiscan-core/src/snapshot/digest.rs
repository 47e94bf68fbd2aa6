//! Digest computation for snapshots.
//!
//! Provides deterministic SHA256 digests for baseline files:
//!
//! - **Snapshot Digest**: hash of the full snapshot, artifact name included
//! - **Semantic Digest**: hash of the entities only, so the same API published
//!   under another artifact name yields the same digest
//!
//! Both serialize through `BTreeMap`-backed structures, so equal snapshots
//! always produce equal canonical JSON.

use crate::errors::Result;
use crate::snapshot::Snapshot;
use sha2::{Digest, Sha256};

/// Compute the full snapshot digest (includes the artifact name).
///
/// ## Errors
///
/// Returns `ApiScanError::Serialization` if JSON serialization fails.
pub fn compute_snapshot_digest(snapshot: &Snapshot) -> Result<String> {
    let canonical = serde_json::to_string(snapshot)?;
    Ok(hash_string(&canonical))
}

/// Compute the semantic digest (excludes the artifact name).
///
/// ## Errors
///
/// Returns `ApiScanError::Serialization` if JSON serialization fails.
///
/// ## Idempotency Property
///
/// ```text
/// a.artifact() != b.artifact()
/// BUT
/// compute_semantic_digest(a) == compute_semantic_digest(b)
/// IF the entities are identical
/// ```
pub fn compute_semantic_digest(snapshot: &Snapshot) -> Result<String> {
    let entities: Vec<_> = snapshot.entities().collect();
    let canonical = serde_json::to_string(&entities)?;
    Ok(hash_string(&canonical))
}

fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
