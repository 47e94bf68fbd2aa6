//! Compatibility policy
//!
//! Maps every [`DeltaKind`] to a [`Severity`]. A policy only stores the
//! entries that differ from the built-in table; kinds without a built-in
//! severity (undecidable type changes) use the policy fallback.
//!
//! Policies can be loaded from TOML:
//!
//! ```toml
//! fallback = "breaking"
//!
//! [severities]
//! annotation_arguments_changed = "breaking"
//!
//! [nullability]
//! not_null = ["NotNull", "Nonnull"]
//! nullable = ["Nullable"]
//! ```

use crate::diff::model::{DeltaKind, Severity};
use crate::errors::{ApiScanError, Result};
use crate::model::annotation::simple_name;
use crate::model::AnnotationSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Simple names of annotations that carry nullability meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NullabilityAnnotations {
    pub not_null: Vec<String>,
    pub nullable: Vec<String>,
}

impl Default for NullabilityAnnotations {
    fn default() -> Self {
        Self {
            not_null: vec!["NotNull".to_string(), "Nonnull".to_string(), "NonNull".to_string()],
            nullable: vec!["Nullable".to_string(), "CheckForNull".to_string()],
        }
    }
}

/// Nullability declared on one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nullability {
    Unspecified,
    NotNull,
    Nullable,
}

impl NullabilityAnnotations {
    /// Whether `annotation` (qualified name) is a recognized nullability marker.
    pub fn is_nullability(&self, annotation: &str) -> bool {
        let simple = simple_name(annotation);
        self.not_null.iter().chain(self.nullable.iter()).any(|n| n == simple)
    }

    /// Nullability declared by an annotation set. A set carrying both markers
    /// counts as nullable.
    pub fn classify(&self, annotations: &AnnotationSet) -> Nullability {
        let mut result = Nullability::Unspecified;
        for name in annotations.keys() {
            let simple = simple_name(name);
            if self.nullable.iter().any(|n| n == simple) {
                return Nullability::Nullable;
            }
            if self.not_null.iter().any(|n| n == simple) {
                result = Nullability::NotNull;
            }
        }
        result
    }
}

/// Severity assignment used by the diff engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatibilityPolicy {
    /// Overrides of the built-in severity table
    pub severities: BTreeMap<DeltaKind, Severity>,
    /// Severity of undecidable type changes
    pub fallback: Severity,
    pub nullability: NullabilityAnnotations,
}

impl Default for CompatibilityPolicy {
    /// Strict source compatibility.
    fn default() -> Self {
        Self {
            severities: BTreeMap::new(),
            fallback: Severity::Unknown,
            nullability: NullabilityAnnotations::default(),
        }
    }
}

impl CompatibilityPolicy {
    /// Binary (linkage) compatibility: changes visible only to the compiler
    /// are informational, and covariant return narrowing breaks because the
    /// erased method descriptor changes.
    ///
    /// # Example
    /// ```
    /// use apiscan_core::diff::model::{DeltaKind, Severity};
    /// use apiscan_core::policy::CompatibilityPolicy;
    ///
    /// let policy = CompatibilityPolicy::binary_compatibility();
    /// assert_eq!(policy.severity_for(DeltaKind::ExceptionAdded), Severity::Informational);
    /// assert_eq!(policy.severity_for(DeltaKind::ReturnTypeNarrowed), Severity::Breaking);
    /// ```
    pub fn binary_compatibility() -> Self {
        let source_only = [
            DeltaKind::ParameterTypeChanged,
            DeltaKind::ParameterTypeNarrowed,
            DeltaKind::TypeParametersChanged,
            DeltaKind::BoundNarrowed,
            DeltaKind::BoundChanged,
            DeltaKind::ExceptionAdded,
            DeltaKind::VarargsRemoved,
            DeltaKind::ParamNotNullAdded,
            DeltaKind::ParamNotNullRemoved,
            DeltaKind::ParamNullableRemoved,
            DeltaKind::ReturnNullableAdded,
            DeltaKind::ReturnNotNullRemoved,
            DeltaKind::FieldNullabilityChanged,
        ];
        let mut severities: BTreeMap<DeltaKind, Severity> = source_only
            .into_iter()
            .map(|kind| (kind, Severity::Informational))
            .collect();
        severities.insert(DeltaKind::ReturnTypeNarrowed, Severity::Breaking);
        Self {
            severities,
            ..Self::default()
        }
    }

    /// Parse a policy from TOML text; omitted sections keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ApiScanError::InvalidPolicy` for malformed TOML, unknown delta
    /// kinds, or unknown severity names.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ApiScanError::InvalidPolicy {
            message: e.to_string(),
        })
    }

    /// Override one entry.
    pub fn with_severity(mut self, kind: DeltaKind, severity: Severity) -> Self {
        self.severities.insert(kind, severity);
        self
    }

    /// Effective severity of `kind` under this policy.
    pub fn severity_for(&self, kind: DeltaKind) -> Severity {
        self.severities
            .get(&kind)
            .copied()
            .or_else(|| kind.default_severity())
            .unwrap_or(self.fallback)
    }
}
