//! Declared annotations as opaque, comparable data.
//!
//! Annotations are captured once by the symbol source as a mapping from
//! annotation type name to literal arguments; the model never interprets
//! them beyond nullability recognition and reference collection.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Argument name → literal value for one annotation.
pub type AnnotationArgs = BTreeMap<String, AnnotationValue>;

/// Annotation type name → arguments.
pub type AnnotationSet = BTreeMap<String, AnnotationArgs>;

/// A literal annotation argument value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AnnotationValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    Str(String),
    /// Class literal, by qualified name
    Class(String),
    /// Enum constant
    Enum { type_name: String, constant: String },
    /// Nested annotation
    Annotation {
        type_name: String,
        #[serde(default)]
        arguments: AnnotationArgs,
    },
    Array(Vec<AnnotationValue>),
}

impl AnnotationValue {
    /// Collect type names this value refers to (class literals, enum types,
    /// nested annotation types).
    pub fn collect_type_names(&self, out: &mut BTreeSet<String>) {
        match self {
            AnnotationValue::Class(name) => {
                out.insert(name.clone());
            }
            AnnotationValue::Enum { type_name, .. } => {
                out.insert(type_name.clone());
            }
            AnnotationValue::Annotation {
                type_name,
                arguments,
            } => {
                out.insert(type_name.clone());
                for value in arguments.values() {
                    value.collect_type_names(out);
                }
            }
            AnnotationValue::Array(values) => {
                for value in values {
                    value.collect_type_names(out);
                }
            }
            _ => {}
        }
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Bool(v) => write!(f, "{}", v),
            AnnotationValue::Int(v) => write!(f, "{}", v),
            AnnotationValue::Float(v) => write!(f, "{}", v),
            AnnotationValue::Char(v) => write!(f, "'{}'", v),
            AnnotationValue::Str(v) => write!(f, "{:?}", v),
            AnnotationValue::Class(name) => write!(f, "{}.class", name),
            AnnotationValue::Enum {
                type_name,
                constant,
            } => write!(f, "{}.{}", type_name, constant),
            AnnotationValue::Annotation {
                type_name,
                arguments,
            } => write!(f, "@{}{}", type_name, render_args(arguments)),
            AnnotationValue::Array(values) => {
                write!(f, "{{")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Render an argument map as `(a = 1, b = "x")`, or nothing when empty.
pub fn render_args(args: &AnnotationArgs) -> String {
    if args.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = args.iter().map(|(k, v)| format!("{} = {}", k, v)).collect();
    format!("({})", parts.join(", "))
}

/// Canonical annotation/type name: accepts `Ljavax/annotation/Nonnull;`,
/// `javax/annotation/Nonnull` or `javax.annotation.Nonnull`.
pub fn canonical_type_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let inner = match (trimmed.strip_prefix('L'), trimmed.ends_with(';')) {
        (Some(rest), true) => &rest[..rest.len() - 1],
        _ => trimmed,
    };
    inner.replace('/', ".")
}

/// Simple name of a qualified type name (`javax.annotation.Nonnull` → `Nonnull`).
pub fn simple_name(qualified: &str) -> &str {
    qualified
        .rsplit(['.', '$'])
        .next()
        .unwrap_or(qualified)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_type_name_forms() {
        assert_eq!(
            canonical_type_name("Ljavax/annotation/Nonnull;"),
            "javax.annotation.Nonnull"
        );
        assert_eq!(canonical_type_name("java/lang/Object"), "java.lang.Object");
        assert_eq!(canonical_type_name("com.acme.Lenient"), "com.acme.Lenient");
    }

    #[test]
    fn test_simple_name() {
        assert_eq!(simple_name("javax.annotation.Nullable"), "Nullable");
        assert_eq!(simple_name("com.acme.Outer$Marker"), "Marker");
        assert_eq!(simple_name("Plain"), "Plain");
    }

    #[test]
    fn test_render_nested_values() {
        let mut args = AnnotationArgs::new();
        args.insert(
            "enumValue".to_string(),
            AnnotationValue::Enum {
                type_name: "com.acme.Level".to_string(),
                constant: "ONE".to_string(),
            },
        );
        args.insert(
            "tags".to_string(),
            AnnotationValue::Array(vec![AnnotationValue::Str("a".to_string())]),
        );
        assert_eq!(
            render_args(&args),
            "(enumValue = com.acme.Level.ONE, tags = {\"a\"})"
        );
    }
}
