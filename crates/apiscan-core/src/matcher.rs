//! Identity matcher: pairs entities of two snapshots by signature key.

use crate::model::{Entity, SignatureKey};
use crate::snapshot::Snapshot;
use std::collections::BTreeMap;

/// Entities sharing one signature key; at least one side is present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityPair<'a> {
    pub key: &'a SignatureKey,
    pub old: Option<&'a Entity>,
    pub new: Option<&'a Entity>,
}

/// Pair every entity of `a` and `b`, ordered by signature key.
///
/// Each entity appears in exactly one pair. No severity judgement is made.
pub fn match_entities<'a>(a: &'a Snapshot, b: &'a Snapshot) -> Vec<EntityPair<'a>> {
    let mut pairs: BTreeMap<&'a SignatureKey, EntityPair<'a>> = BTreeMap::new();
    for entity in a.entities() {
        pairs.insert(
            &entity.key,
            EntityPair {
                key: &entity.key,
                old: Some(entity),
                new: None,
            },
        );
    }
    for entity in b.entities() {
        pairs
            .entry(&entity.key)
            .or_insert(EntityPair {
                key: &entity.key,
                old: None,
                new: None,
            })
            .new = Some(entity);
    }
    pairs.into_values().collect()
}
