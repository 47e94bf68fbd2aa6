use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between a type's qualified name and a member name.
pub const MEMBER_SEPARATOR: char = '#';

/// Coarse kind used for identity: a class turning into an interface keeps its
/// key (and is reported as a kind change), a field never matches a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyKind {
    Type,
    Field,
    Method,
}

/// Erasure-based identity used to match entities across snapshots.
///
/// Field order defines the report order: qualified name, then kind, then
/// erased parameter list.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SignatureKey {
    /// `pkg.Type` for types, `pkg.Type#member` for fields and methods
    pub qualified_name: String,
    pub kind: KeyKind,
    /// Erased parameter types (methods only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub erased_parameters: Vec<String>,
}

impl SignatureKey {
    pub fn for_type(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            kind: KeyKind::Type,
            erased_parameters: Vec::new(),
        }
    }

    pub fn for_field(owner: &str, name: &str) -> Self {
        Self {
            qualified_name: member_name(owner, name),
            kind: KeyKind::Field,
            erased_parameters: Vec::new(),
        }
    }

    pub fn for_method(owner: &str, name: &str, erased_parameters: Vec<String>) -> Self {
        Self {
            qualified_name: member_name(owner, name),
            kind: KeyKind::Method,
            erased_parameters,
        }
    }

    /// Owning type for members, `None` for types.
    pub fn owner(&self) -> Option<&str> {
        self.qualified_name
            .split_once(MEMBER_SEPARATOR)
            .map(|(owner, _)| owner)
    }

    /// Member name for members, the full name for types.
    pub fn simple_member_name(&self) -> &str {
        self.qualified_name
            .split_once(MEMBER_SEPARATOR)
            .map(|(_, member)| member)
            .unwrap_or(&self.qualified_name)
    }

    /// Qualified name of the top-level type this key belongs to
    /// (`pkg.Outer` for `pkg.Outer$Inner#run()`).
    pub fn top_level_type(&self) -> &str {
        let type_part = self.owner().unwrap_or(&self.qualified_name);
        type_part
            .split_once('$')
            .map(|(outer, _)| outer)
            .unwrap_or(type_part)
    }

    /// Same member signature re-homed on another owner type.
    pub fn rehomed(&self, owner: &str) -> Self {
        Self {
            qualified_name: member_name(owner, self.simple_member_name()),
            kind: self.kind,
            erased_parameters: self.erased_parameters.clone(),
        }
    }
}

fn member_name(owner: &str, name: &str) -> String {
    format!("{}{}{}", owner, MEMBER_SEPARATOR, name)
}

impl fmt::Display for SignatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name)?;
        if self.kind == KeyKind::Method {
            write!(f, "({})", self.erased_parameters.join(","))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendering_distinguishes_kinds() {
        let field = SignatureKey::for_field("com.acme.Widget", "size");
        let method = SignatureKey::for_method("com.acme.Widget", "size", vec![]);
        assert_eq!(field.to_string(), "com.acme.Widget#size");
        assert_eq!(method.to_string(), "com.acme.Widget#size()");
        assert_ne!(field, method);
    }

    #[test]
    fn test_owner_and_top_level() {
        let key = SignatureKey::for_method(
            "com.acme.Outer$Inner",
            "run",
            vec!["int[]".to_string(), "java.lang.String".to_string()],
        );
        assert_eq!(key.owner(), Some("com.acme.Outer$Inner"));
        assert_eq!(key.simple_member_name(), "run");
        assert_eq!(key.top_level_type(), "com.acme.Outer");
        assert_eq!(key.to_string(), "com.acme.Outer$Inner#run(int[],java.lang.String)");
        assert_eq!(SignatureKey::for_type("com.acme.Outer").owner(), None);
    }

    #[test]
    fn test_ordering_puts_type_before_its_members() {
        let ty = SignatureKey::for_type("com.acme.Widget");
        let member = SignatureKey::for_field("com.acme.Widget", "a");
        let nested = SignatureKey::for_type("com.acme.Widget$Part");
        assert!(ty < member);
        assert!(member < nested);
    }
}
