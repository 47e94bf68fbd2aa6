pub mod annotation;
pub mod entity;
pub mod key;
pub mod raw;
pub mod type_ref;

pub use annotation::{AnnotationArgs, AnnotationSet, AnnotationValue};
pub use entity::{Entity, EntityKind, EntityWarning, Modifier, Parameter, TypeParameter, Visibility};
pub use key::{KeyKind, SignatureKey};
pub use raw::{RawDeclaration, RawParameter};
pub use type_ref::{BaseType, TypeRef, VarScope, Wildcard, OBJECT};
