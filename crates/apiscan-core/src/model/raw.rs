//! Raw declaration records supplied by the symbol source.
//!
//! Type strings use JVM descriptor syntax (`I`, `[Ljava/lang/String;`) and
//! generic signatures use the JVM signature grammar. A field's type is
//! carried in `return_type`.

use crate::model::annotation::{AnnotationArgs, AnnotationSet};
use crate::model::entity::{EntityKind, Modifier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One raw declaration as produced by bytecode or reflection extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDeclaration {
    /// `pkg.Type` for types, `pkg.Type#member` (or `pkg.Type.member`) for members
    pub qualified_name: String,
    pub kind: EntityKind,
    /// Access flags as the class file reports them. Interface methods without
    /// a body must carry `Abstract`; a non-abstract, non-static interface
    /// method is a default method.
    #[serde(default)]
    pub modifiers: BTreeSet<Modifier>,
    #[serde(default)]
    pub generic_signature: Option<String>,
    #[serde(default)]
    pub annotations: AnnotationSet,
    #[serde(default)]
    pub parameters: Vec<RawParameter>,
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub exceptions: Vec<String>,
}

/// One raw method parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawParameter {
    /// Erased JVM descriptor of the parameter type
    pub descriptor: String,
    #[serde(default)]
    pub annotations: AnnotationSet,
}

impl RawDeclaration {
    pub fn new(qualified_name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            kind,
            modifiers: BTreeSet::new(),
            generic_signature: None,
            annotations: AnnotationSet::new(),
            parameters: Vec::new(),
            return_type: None,
            superclass: None,
            interfaces: Vec::new(),
            exceptions: Vec::new(),
        }
    }

    pub fn class(qualified_name: impl Into<String>) -> Self {
        Self::new(qualified_name, EntityKind::Class)
    }

    pub fn interface(qualified_name: impl Into<String>) -> Self {
        Self::new(qualified_name, EntityKind::Interface).with_modifiers([Modifier::Abstract])
    }

    pub fn field(qualified_name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self::new(qualified_name, EntityKind::Field).returning(descriptor)
    }

    /// A method returning `V` until [`returning`](Self::returning) says otherwise.
    pub fn method(qualified_name: impl Into<String>) -> Self {
        Self::new(qualified_name, EntityKind::Method).returning("V")
    }

    pub fn with_modifiers(mut self, modifiers: impl IntoIterator<Item = Modifier>) -> Self {
        self.modifiers.extend(modifiers);
        self
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.generic_signature = Some(signature.into());
        self
    }

    pub fn with_annotation(self, name: impl Into<String>) -> Self {
        self.with_annotation_args(name, AnnotationArgs::new())
    }

    pub fn with_annotation_args(mut self, name: impl Into<String>, args: AnnotationArgs) -> Self {
        self.annotations.insert(name.into(), args);
        self
    }

    pub fn with_param(self, descriptor: impl Into<String>) -> Self {
        self.with_annotated_param(descriptor, std::iter::empty::<String>())
    }

    pub fn with_annotated_param<I, S>(
        mut self,
        descriptor: impl Into<String>,
        annotations: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters.push(RawParameter {
            descriptor: descriptor.into(),
            annotations: annotations
                .into_iter()
                .map(|name| (name.into(), AnnotationArgs::new()))
                .collect(),
        });
        self
    }

    pub fn returning(mut self, descriptor: impl Into<String>) -> Self {
        self.return_type = Some(descriptor.into());
        self
    }

    pub fn extending(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn implementing(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn throwing(mut self, exception: impl Into<String>) -> Self {
        self.exceptions.push(exception.into());
        self
    }
}
