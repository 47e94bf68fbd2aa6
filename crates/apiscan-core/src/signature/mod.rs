//! Signature normalizer
//!
//! Turns JVM descriptors and generic signatures into [`TypeRef`] trees that
//! compare equal whenever two declarations mean the same type:
//!
//! - type variables become `(scope, index)` positions, so renaming `T` to `E`
//!   is invisible;
//! - an unbounded `?` becomes `? extends java.lang.Object`;
//! - internal names (`java/util/List`) become dotted names;
//! - inner-class suffixes (`Outer<A>.Inner<B>`) flatten to `Outer$Inner<A, B>`.

mod parser;

use crate::errors::Result;
use crate::model::{BaseType, TypeParameter, TypeRef, VarScope, Wildcard};
use parser::{SigArg, SigType, SigTypeParam};

/// Type-variable names visible at a point in a declaration.
///
/// Method type parameters shadow the declaring type's, which shadow those of
/// enclosing types. Levels count outward from the declaring type (level 0).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericScope {
    method: Vec<String>,
    types: Vec<Vec<String>>,
}

impl GenericScope {
    /// Scope with no type variables in sight.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Scope for a type nested in `self` that declares `params`.
    pub fn nested(&self, params: Vec<String>) -> Self {
        let mut types = Vec::with_capacity(self.types.len() + 1);
        types.push(params);
        types.extend(self.types.iter().cloned());
        Self {
            method: Vec::new(),
            types,
        }
    }

    /// Scope inside a method declaring `params`.
    pub fn with_method(&self, params: Vec<String>) -> Self {
        Self {
            method: params,
            types: self.types.clone(),
        }
    }

    fn resolve(&self, name: &str) -> Option<(VarScope, u32)> {
        if let Some(i) = self.method.iter().position(|n| n == name) {
            return Some((VarScope::Method, i as u32));
        }
        self.types.iter().enumerate().find_map(|(level, names)| {
            names
                .iter()
                .position(|n| n == name)
                .map(|i| (VarScope::Type(level as u32), i as u32))
        })
    }
}

/// Normalized class signature.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedClass {
    pub type_parameters: Vec<TypeParameter>,
    pub superclass: TypeRef,
    pub interfaces: Vec<TypeRef>,
    /// Scope for the class's own members
    pub scope: GenericScope,
}

/// Normalized method signature.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMethod {
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<TypeRef>,
    pub return_type: TypeRef,
    pub exceptions: Vec<TypeRef>,
}

/// Normalize a descriptor or field signature within `scope`.
pub fn normalize_type(signature: &str, scope: &GenericScope) -> Result<TypeRef> {
    let parsed = parser::parse_type(signature)?;
    Ok(convert(&parsed, scope))
}

/// Normalize a plain descriptor; any type variable in it stays free.
pub fn normalize_descriptor(descriptor: &str) -> Result<TypeRef> {
    normalize_type(descriptor, &GenericScope::empty())
}

/// Normalize a class signature declared inside `enclosing`.
pub fn normalize_class_signature(
    signature: &str,
    enclosing: &GenericScope,
) -> Result<NormalizedClass> {
    let parsed = parser::parse_class_signature(signature)?;
    let scope = enclosing.nested(param_names(&parsed.type_params));
    Ok(NormalizedClass {
        type_parameters: convert_params(&parsed.type_params, &scope),
        superclass: convert(&parsed.superclass, &scope),
        interfaces: parsed.interfaces.iter().map(|t| convert(t, &scope)).collect(),
        scope,
    })
}

/// Normalize a method signature declared in a type whose scope is `class_scope`.
pub fn normalize_method_signature(
    signature: &str,
    class_scope: &GenericScope,
) -> Result<NormalizedMethod> {
    let parsed = parser::parse_method_signature(signature)?;
    let scope = class_scope.with_method(param_names(&parsed.type_params));
    Ok(NormalizedMethod {
        type_parameters: convert_params(&parsed.type_params, &scope),
        parameters: parsed.params.iter().map(|t| convert(t, &scope)).collect(),
        return_type: convert(&parsed.result, &scope),
        exceptions: parsed.throws.iter().map(|t| convert(t, &scope)).collect(),
    })
}

/// Re-normalize an already normalized tree.
///
/// Fixed point of normalization: `canonicalize(&t) == t` for every tree the
/// normalizer produced.
pub fn canonicalize(ty: &TypeRef) -> TypeRef {
    let base = match &ty.base {
        BaseType::Class { name } => BaseType::Class {
            name: name.replace('/', "."),
        },
        other => other.clone(),
    };
    TypeRef {
        base,
        args: ty.args.iter().map(canonicalize).collect(),
        wildcard: ty.wildcard,
        array_depth: ty.array_depth,
    }
}

fn param_names(params: &[SigTypeParam]) -> Vec<String> {
    params.iter().map(|p| p.name.clone()).collect()
}

fn convert_params(params: &[SigTypeParam], scope: &GenericScope) -> Vec<TypeParameter> {
    params
        .iter()
        .map(|p| {
            let mut bounds: Vec<TypeRef> = p
                .class_bound
                .iter()
                .chain(p.interface_bounds.iter())
                .map(|b| convert(b, scope))
                .collect();
            if bounds.is_empty() {
                bounds.push(TypeRef::object());
            }
            TypeParameter { bounds }
        })
        .collect()
}

fn convert(sig: &SigType, scope: &GenericScope) -> TypeRef {
    match sig {
        SigType::Primitive(c) => TypeRef::primitive(primitive_name(*c)),
        SigType::Var(name) => match scope.resolve(name) {
            Some((var_scope, index)) => TypeRef::var(var_scope, index),
            None => TypeRef {
                base: BaseType::FreeVar { name: name.clone() },
                args: Vec::new(),
                wildcard: Wildcard::None,
                array_depth: 0,
            },
        },
        SigType::Array { dims, element } => convert(element, scope).array_of(*dims),
        SigType::Class(segments) => {
            let name = segments
                .iter()
                .map(|s| s.name.replace('/', "."))
                .collect::<Vec<_>>()
                .join("$");
            let args = segments
                .iter()
                .flat_map(|s| s.args.iter())
                .map(|a| convert_arg(a, scope))
                .collect();
            TypeRef::class(name).with_args(args)
        }
    }
}

fn convert_arg(arg: &SigArg, scope: &GenericScope) -> TypeRef {
    match arg {
        SigArg::Star => TypeRef::unbounded_wildcard(),
        SigArg::Exact(t) => convert(t, scope),
        SigArg::Extends(t) => convert(t, scope).bounded(Wildcard::Extends),
        SigArg::Super(t) => convert(t, scope).bounded(Wildcard::Super),
    }
}

fn primitive_name(c: char) -> &'static str {
    match c {
        'B' => "byte",
        'C' => "char",
        'D' => "double",
        'F' => "float",
        'I' => "int",
        'J' => "long",
        'S' => "short",
        'Z' => "boolean",
        _ => "void",
    }
}
