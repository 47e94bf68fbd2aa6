//! Immutable API snapshot of one artifact.
//!
//! Entities are keyed by their rendered [`SignatureKey`]; members are indexed
//! by owning type. A snapshot is only constructed through
//! [`Snapshot::from_entities`], which rejects key collisions.

pub mod digest;

use crate::errors::{ApiScanError, Result};
use crate::model::{Entity, SignatureKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    artifact: String,
    entities: BTreeMap<String, Entity>,
    /// Owner qualified name → rendered keys of its members, in key order
    members: BTreeMap<String, Vec<String>>,
}

impl Snapshot {
    /// Assemble a snapshot, failing with `DuplicateEntity` on a key collision.
    pub fn from_entities(
        artifact: impl Into<String>,
        entities: impl IntoIterator<Item = Entity>,
    ) -> Result<Self> {
        let mut map = BTreeMap::new();
        for entity in entities {
            let rendered = entity.key.to_string();
            if map.contains_key(&rendered) {
                return Err(ApiScanError::DuplicateEntity { key: rendered });
            }
            map.insert(rendered, entity);
        }

        let mut members: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (rendered, entity) in &map {
            if let Some(owner) = &entity.owner {
                members.entry(owner.clone()).or_default().push(rendered.clone());
            }
        }

        Ok(Self {
            artifact: artifact.into(),
            entities: map,
            members,
        })
    }

    /// An artifact with no declarations.
    pub fn empty(artifact: impl Into<String>) -> Self {
        Self {
            artifact: artifact.into(),
            entities: BTreeMap::new(),
            members: BTreeMap::new(),
        }
    }

    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, key: &SignatureKey) -> Option<&Entity> {
        self.entities.get(&key.to_string())
    }

    /// Look up by rendered key (`pkg.Type#m(int)`).
    pub fn get_rendered(&self, rendered: &str) -> Option<&Entity> {
        self.entities.get(rendered)
    }

    /// Look up a type entity by qualified name.
    pub fn get_type(&self, qualified_name: &str) -> Option<&Entity> {
        self.entities
            .get(qualified_name)
            .filter(|e| e.kind.is_type())
    }

    /// Entities in rendered-key order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Direct members (fields, methods, nested types) of `owner`.
    pub fn members_of<'a>(&'a self, owner: &str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.members
            .get(owner)
            .into_iter()
            .flatten()
            .filter_map(move |rendered| self.entities.get(rendered))
    }
}
