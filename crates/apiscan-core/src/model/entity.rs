use crate::model::annotation::AnnotationSet;
use crate::model::key::{KeyKind, SignatureKey};
use crate::model::type_ref::TypeRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Declared kind of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Class,
    Interface,
    Enum,
    /// Annotation type declaration
    Annotation,
    Field,
    Method,
}

impl EntityKind {
    pub fn key_kind(self) -> KeyKind {
        match self {
            EntityKind::Class
            | EntityKind::Interface
            | EntityKind::Enum
            | EntityKind::Annotation => KeyKind::Type,
            EntityKind::Field => KeyKind::Field,
            EntityKind::Method => KeyKind::Method,
        }
    }

    pub fn is_type(self) -> bool {
        self.key_kind() == KeyKind::Type
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Class => "class",
            EntityKind::Interface => "interface",
            EntityKind::Enum => "enum",
            EntityKind::Annotation => "annotation",
            EntityKind::Field => "field",
            EntityKind::Method => "method",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access level, ordered from narrowest to widest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Private,
    Package,
    Protected,
    Public,
}

impl Visibility {
    /// Whether consumers outside the artifact can bind to it.
    pub fn is_api(self) -> bool {
        matches!(self, Visibility::Protected | Visibility::Public)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Package => "package",
            Visibility::Protected => "protected",
            Visibility::Public => "public",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declaration modifiers as supplied by the symbol source.
///
/// Visibility, `varargs`, `synthetic` and `bridge` are consumed by the
/// builder; only the remaining ones are kept in [`Entity::modifiers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
    Synchronized,
    Native,
    Transient,
    Volatile,
    Varargs,
    Synthetic,
    Bridge,
}

impl Modifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Abstract => "abstract",
            Modifier::Synchronized => "synchronized",
            Modifier::Native => "native",
            Modifier::Transient => "transient",
            Modifier::Volatile => "volatile",
            Modifier::Varargs => "varargs",
            Modifier::Synthetic => "synthetic",
            Modifier::Bridge => "bridge",
        }
    }

    /// Modifiers that survive into the model.
    pub fn is_modeled(self) -> bool {
        !matches!(
            self,
            Modifier::Public
                | Modifier::Protected
                | Modifier::Private
                | Modifier::Varargs
                | Modifier::Synthetic
                | Modifier::Bridge
        )
    }
}

/// One declared type parameter; the name is dropped after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeParameter {
    /// Class bound first, then interface bounds; `[java.lang.Object]` when unbounded
    pub bounds: Vec<TypeRef>,
}

/// One method parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Normalized (generic) type
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Erased type name, part of the owning method's signature key
    pub erased: String,
    #[serde(default, skip_serializing_if = "AnnotationSet::is_empty")]
    pub annotations: AnnotationSet,
}

/// Non-fatal finding attached to an entity during model building.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityWarning {
    /// A referenced type or type variable is not part of the artifact
    UnresolvedReference { type_name: String },
}

/// A declared type, field, or method in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub key: SignatureKey,
    pub kind: EntityKind,
    pub visibility: Visibility,
    pub modifiers: BTreeSet<Modifier>,
    /// Declaring type (for members and nested types)
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<TypeParameter>,
    /// Superclass then interfaces (types only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supertypes: Vec<TypeRef>,
    #[serde(default, skip_serializing_if = "AnnotationSet::is_empty")]
    pub annotations: AnnotationSet,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Method return type, or the field's type
    pub return_type: Option<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exceptions: Vec<TypeRef>,
    #[serde(default)]
    pub varargs: bool,
    /// Supertype method this method overrides
    pub overrides: Option<SignatureKey>,
    /// Declaring supertype member, for members modeled via include-inherited
    pub inherited_from: Option<SignatureKey>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<EntityWarning>,
}

impl Entity {
    pub fn has(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn is_constructor(&self) -> bool {
        self.kind == EntityKind::Method && self.key.simple_member_name() == "<init>"
    }

    /// Members that a subtype inherits: visible to subclasses, not constructors
    /// or static initializers, not static.
    pub fn is_inheritable(&self) -> bool {
        !self.kind.is_type()
            && self.visibility.is_api()
            && !self.has(Modifier::Static)
            && !matches!(self.key.simple_member_name(), "<init>" | "<clinit>")
    }

    /// A type existing implementations could have subclassed or implemented.
    pub fn is_implementable(&self) -> bool {
        match self.kind {
            EntityKind::Interface => true,
            EntityKind::Class => self.has(Modifier::Abstract) && !self.has(Modifier::Final),
            _ => false,
        }
    }

    /// Every class name this entity's declaration refers to.
    pub fn referenced_type_names(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        let types = self
            .supertypes
            .iter()
            .chain(self.parameters.iter().map(|p| &p.ty))
            .chain(self.return_type.iter())
            .chain(self.exceptions.iter())
            .chain(self.type_parameters.iter().flat_map(|tp| tp.bounds.iter()));
        for ty in types {
            ty.collect_class_names(&mut out);
        }
        let annotation_sets = std::iter::once(&self.annotations)
            .chain(self.parameters.iter().map(|p| &p.annotations));
        for set in annotation_sets {
            for (name, args) in set {
                out.insert(name.clone());
                for value in args.values() {
                    value.collect_type_names(&mut out);
                }
            }
        }
        out
    }
}
