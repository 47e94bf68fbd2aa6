//! Surface reference index: which type names a snapshot declares, and which
//! ones its API-visible declarations consume.

use crate::diff::effective_visibility;
use crate::snapshot::Snapshot;
use std::collections::BTreeSet;

/// Qualified names of every type declared in `snapshot`.
pub fn declared_types(snapshot: &Snapshot) -> BTreeSet<String> {
    snapshot
        .entities()
        .filter(|e| e.kind.is_type())
        .map(|e| e.key.qualified_name.clone())
        .collect()
}

/// Qualified names referenced by API-visible declarations: supertypes,
/// field, parameter and return types, thrown types, bounds, annotation types
/// and class or enum literals in annotation arguments.
pub fn consumed_types(snapshot: &Snapshot) -> BTreeSet<String> {
    snapshot
        .entities()
        .filter(|e| effective_visibility(e, snapshot).is_api())
        .flat_map(|e| e.referenced_type_names())
        .collect()
}

/// Consumed type names that `snapshot` does not declare itself.
pub fn external_references(snapshot: &Snapshot) -> BTreeSet<String> {
    let declared = declared_types(snapshot);
    consumed_types(snapshot)
        .into_iter()
        .filter(|name| !declared.contains(name))
        .collect()
}
