//! Compatibility diff output types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! Records are emitted in signature-key order for deterministic serialization.

use crate::model::SignatureKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Compatibility impact of a change, ordered from harmless to breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// No effect on consumers (private detail, metadata)
    Informational,
    /// Existing consumers keep compiling and linking
    Compatible,
    /// Not decidable with the type knowledge available
    Unknown,
    /// Existing consumers may fail to compile or link
    Breaking,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Informational,
        Severity::Compatible,
        Severity::Unknown,
        Severity::Breaking,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Informational => "informational",
            Severity::Compatible => "compatible",
            Severity::Unknown => "unknown",
            Severity::Breaking => "breaking",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an entity appeared, disappeared, or changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

/// Every kind of delta the engine can emit; each maps to one policy entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaKind {
    EntityKindChanged,
    VisibilityNarrowed,
    VisibilityNarrowedNonApi,
    VisibilityWidened,
    FinalAdded,
    FinalRemoved,
    StaticToggled,
    AbstractAdded,
    AbstractRemoved,
    ModifierChanged,
    ParameterTypeChanged,
    ParameterTypeNarrowed,
    ParameterTypeWidened,
    ReturnTypeChanged,
    ReturnTypeWidened,
    ReturnTypeNarrowed,
    FieldTypeChanged,
    TypeParametersChanged,
    BoundNarrowed,
    BoundWidened,
    BoundChanged,
    SupertypeAdded,
    SupertypeRemoved,
    ExceptionAdded,
    ExceptionRemoved,
    VarargsAdded,
    VarargsRemoved,
    ParamNotNullAdded,
    ParamNotNullRemoved,
    ParamNullableAdded,
    ParamNullableRemoved,
    ReturnNullableAdded,
    ReturnNullableRemoved,
    ReturnNotNullAdded,
    ReturnNotNullRemoved,
    FieldNullabilityChanged,
    AnnotationAdded,
    AnnotationRemoved,
    AnnotationArgumentsChanged,
    /// A type comparison involved types outside the known hierarchy
    TypeChangeUnresolved,
    EntityRemoved,
    EntityAdded,
    /// Abstract method added to a type existing code may implement
    AbstractMethodAdded,
    NonApiEntityRemoved,
    NonApiEntityAdded,
    /// Removed method still reachable through the method it overrode
    OverrideRemoved,
}

impl DeltaKind {
    pub const ALL: [DeltaKind; 46] = [
        DeltaKind::EntityKindChanged,
        DeltaKind::VisibilityNarrowed,
        DeltaKind::VisibilityNarrowedNonApi,
        DeltaKind::VisibilityWidened,
        DeltaKind::FinalAdded,
        DeltaKind::FinalRemoved,
        DeltaKind::StaticToggled,
        DeltaKind::AbstractAdded,
        DeltaKind::AbstractRemoved,
        DeltaKind::ModifierChanged,
        DeltaKind::ParameterTypeChanged,
        DeltaKind::ParameterTypeNarrowed,
        DeltaKind::ParameterTypeWidened,
        DeltaKind::ReturnTypeChanged,
        DeltaKind::ReturnTypeWidened,
        DeltaKind::ReturnTypeNarrowed,
        DeltaKind::FieldTypeChanged,
        DeltaKind::TypeParametersChanged,
        DeltaKind::BoundNarrowed,
        DeltaKind::BoundWidened,
        DeltaKind::BoundChanged,
        DeltaKind::SupertypeAdded,
        DeltaKind::SupertypeRemoved,
        DeltaKind::ExceptionAdded,
        DeltaKind::ExceptionRemoved,
        DeltaKind::VarargsAdded,
        DeltaKind::VarargsRemoved,
        DeltaKind::ParamNotNullAdded,
        DeltaKind::ParamNotNullRemoved,
        DeltaKind::ParamNullableAdded,
        DeltaKind::ParamNullableRemoved,
        DeltaKind::ReturnNullableAdded,
        DeltaKind::ReturnNullableRemoved,
        DeltaKind::ReturnNotNullAdded,
        DeltaKind::ReturnNotNullRemoved,
        DeltaKind::FieldNullabilityChanged,
        DeltaKind::AnnotationAdded,
        DeltaKind::AnnotationRemoved,
        DeltaKind::AnnotationArgumentsChanged,
        DeltaKind::TypeChangeUnresolved,
        DeltaKind::EntityRemoved,
        DeltaKind::EntityAdded,
        DeltaKind::AbstractMethodAdded,
        DeltaKind::NonApiEntityRemoved,
        DeltaKind::NonApiEntityAdded,
        DeltaKind::OverrideRemoved,
    ];

    /// Severity under the default (strict source compatibility) policy.
    ///
    /// `None` means the policy fallback applies.
    pub fn default_severity(self) -> Option<Severity> {
        use DeltaKind::*;
        use Severity::*;
        let severity = match self {
            EntityKindChanged => Breaking,
            VisibilityNarrowed => Breaking,
            VisibilityNarrowedNonApi => Informational,
            VisibilityWidened => Compatible,
            FinalAdded => Breaking,
            FinalRemoved => Compatible,
            StaticToggled => Breaking,
            AbstractAdded => Breaking,
            AbstractRemoved => Compatible,
            ModifierChanged => Informational,
            ParameterTypeChanged | ParameterTypeNarrowed => Breaking,
            ParameterTypeWidened => Compatible,
            ReturnTypeChanged | ReturnTypeWidened => Breaking,
            ReturnTypeNarrowed => Compatible,
            FieldTypeChanged => Breaking,
            TypeParametersChanged => Breaking,
            BoundNarrowed => Breaking,
            BoundWidened => Compatible,
            BoundChanged => Breaking,
            SupertypeAdded => Compatible,
            SupertypeRemoved => Breaking,
            ExceptionAdded => Breaking,
            ExceptionRemoved => Compatible,
            VarargsAdded => Compatible,
            VarargsRemoved => Breaking,
            ParamNotNullAdded | ParamNotNullRemoved => Breaking,
            ParamNullableAdded => Compatible,
            ParamNullableRemoved => Breaking,
            ReturnNullableAdded => Breaking,
            ReturnNullableRemoved => Compatible,
            ReturnNotNullAdded => Compatible,
            ReturnNotNullRemoved => Breaking,
            FieldNullabilityChanged => Breaking,
            AnnotationAdded => Compatible,
            AnnotationRemoved => Informational,
            AnnotationArgumentsChanged => Informational,
            TypeChangeUnresolved => return None,
            EntityRemoved => Breaking,
            EntityAdded => Compatible,
            AbstractMethodAdded => Breaking,
            NonApiEntityRemoved | NonApiEntityAdded => Informational,
            OverrideRemoved => Compatible,
        };
        Some(severity)
    }
}

/// One attribute-level difference between two versions of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDelta {
    pub kind: DeltaKind,
    /// Dotted path of the attribute, e.g. `parameters[0].type`
    pub attribute: String,
    pub old: Option<String>,
    pub new: Option<String>,
    pub severity: Severity,
}

/// One classified change to one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub kind: ChangeKind,
    pub key: SignatureKey,
    pub deltas: Vec<AttributeDelta>,
    /// Maximum severity over `deltas`
    pub severity: Severity,
}

impl ChangeRecord {
    pub fn is_breaking(&self) -> bool {
        self.severity == Severity::Breaking
    }
}
