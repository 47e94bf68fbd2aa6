//! Variance-aware relation between an old and a new type reference.

use crate::hierarchy::TypeHierarchy;
use crate::model::{BaseType, TypeRef, Wildcard, OBJECT};
use serde::{Deserialize, Serialize};

/// How the new type relates to the old one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRelation {
    Equal,
    /// New type accepts every value of the old type, and more
    Wider,
    /// New type is a proper subtype of the old type
    Narrower,
    Incompatible,
    /// The hierarchy cannot decide
    Unknown,
}

impl TypeRelation {
    fn reversed(self) -> Self {
        match self {
            TypeRelation::Wider => TypeRelation::Narrower,
            TypeRelation::Narrower => TypeRelation::Wider,
            other => other,
        }
    }

    /// Combine the relations of two independent components.
    pub fn and(self, other: TypeRelation) -> TypeRelation {
        use TypeRelation::*;
        match (self, other) {
            (Incompatible, _) | (_, Incompatible) => Incompatible,
            (Wider, Narrower) | (Narrower, Wider) => Incompatible,
            (Unknown, _) | (_, Unknown) => Unknown,
            (Equal, r) | (r, Equal) => r,
            (Wider, Wider) => Wider,
            (Narrower, Narrower) => Narrower,
        }
    }
}

/// Relation of `new` to `old` as plain (non-wildcard) types.
pub fn relate(old: &TypeRef, new: &TypeRef, hierarchy: &TypeHierarchy) -> TypeRelation {
    if old == new {
        return TypeRelation::Equal;
    }
    if old.array_depth != new.array_depth {
        return relate_array_depths(old, new);
    }
    match (&old.base, &new.base) {
        (BaseType::Primitive { .. }, _) | (_, BaseType::Primitive { .. }) => {
            TypeRelation::Incompatible
        }
        (BaseType::FreeVar { .. }, _) | (_, BaseType::FreeVar { .. }) => TypeRelation::Unknown,
        (BaseType::Var { .. }, BaseType::Var { .. }) => TypeRelation::Incompatible,
        (BaseType::Var { .. }, _) | (_, BaseType::Var { .. }) => TypeRelation::Unknown,
        (BaseType::Class { name: old_name }, BaseType::Class { name: new_name }) => {
            let base = relate_classes(old_name, new_name, hierarchy);
            if old.args.is_empty() && new.args.is_empty() {
                return base;
            }
            // A raw type on either side hides the generic detail.
            if old.args.is_empty() || new.args.is_empty() {
                return match base {
                    TypeRelation::Incompatible => TypeRelation::Incompatible,
                    _ => TypeRelation::Unknown,
                };
            }
            if old.args.len() != new.args.len() {
                return match base {
                    TypeRelation::Incompatible => TypeRelation::Incompatible,
                    _ => TypeRelation::Unknown,
                };
            }
            // Differing generic classes are compared positionally, which
            // holds for the common collection hierarchies.
            old.args
                .iter()
                .zip(new.args.iter())
                .map(|(o, n)| contain(o, n, hierarchy))
                .fold(base, TypeRelation::and)
        }
    }
}

/// Relation of `new` to `old` as type arguments, using wildcard containment:
/// an argument is wider when it contains more types.
pub fn contain(old: &TypeRef, new: &TypeRef, hierarchy: &TypeHierarchy) -> TypeRelation {
    use TypeRelation::*;
    if old == new {
        return Equal;
    }
    let old_bound = old.without_wildcard();
    let new_bound = new.without_wildcard();
    let bound = relate(&old_bound, &new_bound, hierarchy);
    let is_top = |t: &TypeRef| t.wildcard == Wildcard::Extends && is_object(&t.without_wildcard());

    match (old.wildcard, new.wildcard) {
        (Wildcard::None, Wildcard::None) => match bound {
            Equal => Equal,
            Unknown => Unknown,
            _ => Incompatible,
        },
        (Wildcard::Extends, Wildcard::Extends) => bound,
        (Wildcard::Super, Wildcard::Super) => bound.reversed(),
        (Wildcard::None, Wildcard::Extends) => match bound {
            Equal | Wider => Wider,
            Unknown => Unknown,
            _ => Incompatible,
        },
        (Wildcard::None, Wildcard::Super) => match bound {
            Equal | Narrower => Wider,
            Unknown => Unknown,
            _ => Incompatible,
        },
        (Wildcard::Extends, Wildcard::None) => match bound {
            Equal | Narrower => Narrower,
            Unknown => Unknown,
            _ => Incompatible,
        },
        (Wildcard::Super, Wildcard::None) => match bound {
            Equal | Wider => Narrower,
            Unknown => Unknown,
            _ => Incompatible,
        },
        (Wildcard::Super, Wildcard::Extends) if is_top(new) => Wider,
        (Wildcard::Extends, Wildcard::Super) if is_top(old) => Narrower,
        _ => Incompatible,
    }
}

fn is_object(t: &TypeRef) -> bool {
    t.array_depth == 0 && t.args.is_empty() && t.class_name() == Some(OBJECT)
}

fn relate_array_depths(old: &TypeRef, new: &TypeRef) -> TypeRelation {
    // Every array is an Object; nothing else relates across dimensions.
    if is_object(new) {
        TypeRelation::Wider
    } else if is_object(old) {
        TypeRelation::Narrower
    } else {
        TypeRelation::Incompatible
    }
}

fn relate_classes(old: &str, new: &str, hierarchy: &TypeHierarchy) -> TypeRelation {
    if old == new {
        TypeRelation::Equal
    } else if hierarchy.is_subtype(old, new) {
        TypeRelation::Wider
    } else if hierarchy.is_subtype(new, old) {
        TypeRelation::Narrower
    } else if hierarchy.is_closed(old) && hierarchy.is_closed(new) {
        TypeRelation::Incompatible
    } else {
        TypeRelation::Unknown
    }
}
