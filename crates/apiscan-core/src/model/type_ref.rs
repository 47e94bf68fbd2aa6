use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Qualified name of the top reference type.
pub const OBJECT: &str = "java.lang.Object";

/// Bound kind of a type argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Wildcard {
    /// Exact type argument (no wildcard)
    #[default]
    None,
    /// `? extends Bound` (an unbounded `?` is `? extends java.lang.Object`)
    Extends,
    /// `? super Bound`
    Super,
}

/// Generic scope a type variable was declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", content = "level", rename_all = "snake_case")]
pub enum VarScope {
    /// Declared by the method itself
    Method,
    /// Declared by a type; level 0 is the declaring type, 1 its enclosing type, ...
    Type(u32),
}

/// Base of a type reference.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BaseType {
    /// A primitive keyword (`int`, `boolean`, ..., `void`)
    Primitive { name: String },
    /// A class or interface, by dotted qualified name (`java.util.Map$Entry`)
    Class { name: String },
    /// A type variable, by position in its declaring scope
    Var { scope: VarScope, index: u32 },
    /// A type variable name that no enclosing scope declares
    FreeVar { name: String },
}

/// A normalized, possibly generic, type reference.
///
/// Type variables are positional, so `List<T>` in one class and `List<E>` in
/// another compare equal when `T` and `E` sit at the same position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    pub base: BaseType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<TypeRef>,
    #[serde(default)]
    pub wildcard: Wildcard,
    #[serde(default)]
    pub array_depth: u32,
}

impl TypeRef {
    pub fn class(name: impl Into<String>) -> Self {
        Self::from_base(BaseType::Class { name: name.into() })
    }

    pub fn primitive(name: impl Into<String>) -> Self {
        Self::from_base(BaseType::Primitive { name: name.into() })
    }

    pub fn var(scope: VarScope, index: u32) -> Self {
        Self::from_base(BaseType::Var { scope, index })
    }

    pub fn object() -> Self {
        Self::class(OBJECT)
    }

    /// The unbounded wildcard `?`, normalized to `? extends Object`.
    pub fn unbounded_wildcard() -> Self {
        Self::object().bounded(Wildcard::Extends)
    }

    fn from_base(base: BaseType) -> Self {
        Self {
            base,
            args: Vec::new(),
            wildcard: Wildcard::None,
            array_depth: 0,
        }
    }

    pub fn with_args(mut self, args: Vec<TypeRef>) -> Self {
        self.args = args;
        self
    }

    pub fn bounded(mut self, wildcard: Wildcard) -> Self {
        self.wildcard = wildcard;
        self
    }

    pub fn array_of(mut self, extra_dims: u32) -> Self {
        self.array_depth += extra_dims;
        self
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.base, BaseType::Primitive { .. })
    }

    pub fn is_void(&self) -> bool {
        self.array_depth == 0
            && matches!(&self.base, BaseType::Primitive { name } if name == "void")
    }

    pub fn is_type_var(&self) -> bool {
        matches!(self.base, BaseType::Var { .. } | BaseType::FreeVar { .. })
    }

    /// Qualified name when the base is a class.
    pub fn class_name(&self) -> Option<&str> {
        match &self.base {
            BaseType::Class { name } => Some(name),
            _ => None,
        }
    }

    /// Same reference with the wildcard stripped (the bound as a plain type).
    pub fn without_wildcard(&self) -> TypeRef {
        TypeRef {
            wildcard: Wildcard::None,
            ..self.clone()
        }
    }

    /// Erased form as a Java-style name, e.g. `java.util.List`, `int[][]`.
    ///
    /// Type variables erase to `java.lang.Object`.
    pub fn erased_name(&self) -> String {
        let base = match &self.base {
            BaseType::Primitive { name } | BaseType::Class { name } => name.as_str(),
            BaseType::Var { .. } | BaseType::FreeVar { .. } => OBJECT,
        };
        let mut out = String::with_capacity(base.len() + 2 * self.array_depth as usize);
        out.push_str(base);
        for _ in 0..self.array_depth {
            out.push_str("[]");
        }
        out
    }

    /// Collect every class name referenced anywhere in this tree.
    pub fn collect_class_names(&self, out: &mut BTreeSet<String>) {
        if let BaseType::Class { name } = &self.base {
            out.insert(name.clone());
        }
        for arg in &self.args {
            arg.collect_class_names(out);
        }
    }

    /// Collect the names of free (unresolvable) type variables.
    pub fn collect_free_vars(&self, out: &mut BTreeSet<String>) {
        if let BaseType::FreeVar { name } = &self.base {
            out.insert(name.clone());
        }
        for arg in &self.args {
            arg.collect_free_vars(out);
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.wildcard {
            Wildcard::Extends
                if self.args.is_empty()
                    && self.array_depth == 0
                    && self.class_name() == Some(OBJECT) =>
            {
                return write!(f, "?");
            }
            Wildcard::Extends => write!(f, "? extends ")?,
            Wildcard::Super => write!(f, "? super ")?,
            Wildcard::None => {}
        }
        match &self.base {
            BaseType::Primitive { name }
            | BaseType::Class { name }
            | BaseType::FreeVar { name } => write!(f, "{}", name)?,
            BaseType::Var {
                scope: VarScope::Method,
                index,
            } => write!(f, "$M{}", index)?,
            BaseType::Var {
                scope: VarScope::Type(0),
                index,
            } => write!(f, "$T{}", index)?,
            BaseType::Var {
                scope: VarScope::Type(level),
                index,
            } => write!(f, "$T{}.{}", level, index)?,
        }
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ">")?;
        }
        for _ in 0..self.array_depth {
            write!(f, "[]")?;
        }
        Ok(())
    }
}
