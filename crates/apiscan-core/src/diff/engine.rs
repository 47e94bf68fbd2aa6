//! Compatibility diff computation.
//!
//! The core entry point is [`compare`]; [`DiffContext`] exposes the per-pair
//! step so callers can partition the work.

use crate::diff::model::{AttributeDelta, ChangeKind, ChangeRecord, DeltaKind, Severity};
use crate::diff::relation::{relate, TypeRelation};
use crate::hierarchy::TypeHierarchy;
use crate::matcher::{match_entities, EntityPair};
use crate::model::annotation::render_args;
use crate::model::{AnnotationSet, Entity, EntityKind, Modifier, TypeParameter, TypeRef, Visibility};
use crate::policy::{CompatibilityPolicy, Nullability};
use crate::snapshot::Snapshot;
use std::collections::BTreeSet;

const UNCHECKED_ROOTS: &[&str] = &["java.lang.RuntimeException", "java.lang.Error"];

/// Everything needed to classify one entity pair.
///
/// Holds only shared references and immutable lookup tables, so one context
/// can serve many threads.
#[derive(Debug)]
pub struct DiffContext<'a> {
    a: &'a Snapshot,
    b: &'a Snapshot,
    policy: &'a CompatibilityPolicy,
    hierarchy_a: TypeHierarchy,
    /// Type relations are judged in the new snapshot, where callers compile
    hierarchy_b: TypeHierarchy,
}

/// Compare two snapshots and classify every change.
///
/// Records are ordered by signature key. Identical snapshots yield an empty
/// list.
pub fn compare(a: &Snapshot, b: &Snapshot, policy: &CompatibilityPolicy) -> Vec<ChangeRecord> {
    let ctx = DiffContext::new(a, b, policy);
    let records: Vec<ChangeRecord> = match_entities(a, b)
        .iter()
        .filter_map(|pair| ctx.diff_pair(pair))
        .collect();
    tracing::debug!(
        old = a.artifact(),
        new = b.artifact(),
        change_count = records.len(),
        "snapshots compared"
    );
    records
}

impl<'a> DiffContext<'a> {
    pub fn new(a: &'a Snapshot, b: &'a Snapshot, policy: &'a CompatibilityPolicy) -> Self {
        Self {
            a,
            b,
            policy,
            hierarchy_a: TypeHierarchy::for_snapshot(a),
            hierarchy_b: TypeHierarchy::for_snapshot(b),
        }
    }

    /// Classify one matched pair; `None` when nothing changed.
    pub fn diff_pair(&self, pair: &EntityPair<'_>) -> Option<ChangeRecord> {
        match (pair.old, pair.new) {
            (Some(old), None) => Some(self.removed(old)),
            (None, Some(new)) => Some(self.added(new)),
            (Some(old), Some(new)) => self.modified(old, new),
            (None, None) => None,
        }
    }

    fn delta(
        &self,
        kind: DeltaKind,
        attribute: impl Into<String>,
        old: Option<String>,
        new: Option<String>,
    ) -> AttributeDelta {
        AttributeDelta {
            kind,
            attribute: attribute.into(),
            old,
            new,
            severity: self.policy.severity_for(kind),
        }
    }

    fn removed(&self, old: &Entity) -> ChangeRecord {
        let kind = if !effective_visibility(old, self.a).is_api() {
            DeltaKind::NonApiEntityRemoved
        } else if self.override_target_survives(old) {
            DeltaKind::OverrideRemoved
        } else {
            DeltaKind::EntityRemoved
        };
        let delta = self.delta(kind, "entity", Some(old.kind.to_string()), None);
        record(ChangeKind::Removed, old, vec![delta])
    }

    /// The removed method overrode a method that consumers still bind to.
    fn override_target_survives(&self, old: &Entity) -> bool {
        old.overrides
            .as_ref()
            .and_then(|target| self.b.get(target))
            .map(|target| effective_visibility(target, self.b).is_api())
            .unwrap_or(false)
    }

    fn added(&self, new: &Entity) -> ChangeRecord {
        let kind = if !effective_visibility(new, self.b).is_api() {
            DeltaKind::NonApiEntityAdded
        } else if self.breaks_implementors(new) {
            DeltaKind::AbstractMethodAdded
        } else {
            DeltaKind::EntityAdded
        };
        let delta = self.delta(kind, "entity", None, Some(new.kind.to_string()));
        record(ChangeKind::Added, new, vec![delta])
    }

    /// An abstract method new to a type that existing code may implement.
    ///
    /// Relies on the `Abstract` flag; default methods never break
    /// implementors.
    fn breaks_implementors(&self, new: &Entity) -> bool {
        if new.kind != EntityKind::Method
            || !new.has(Modifier::Abstract)
            || new.overrides.is_some()
        {
            return false;
        }
        new.owner
            .as_deref()
            .and_then(|owner| self.a.get_type(owner))
            .map(|owner| owner.is_implementable() && effective_visibility(owner, self.a).is_api())
            .unwrap_or(false)
    }

    fn modified(&self, old: &Entity, new: &Entity) -> Option<ChangeRecord> {
        let mut deltas = Vec::new();
        self.compare_declaration(old, new, &mut deltas);
        self.compare_type_parameters(old, new, &mut deltas);
        match (old.kind, new.kind) {
            (EntityKind::Field, EntityKind::Field) => self.compare_field(old, new, &mut deltas),
            (EntityKind::Method, EntityKind::Method) => self.compare_method(old, new, &mut deltas),
            (o, n) if o.is_type() && n.is_type() => self.compare_supertypes(old, new, &mut deltas),
            _ => {}
        }
        let nullability_aware = !old.kind.is_type();
        self.compare_annotations(
            "annotations",
            &old.annotations,
            &new.annotations,
            nullability_aware,
            &mut deltas,
        );

        if deltas.is_empty() {
            return None;
        }
        if !effective_visibility(old, self.a).is_api()
            && !effective_visibility(new, self.b).is_api()
        {
            for delta in &mut deltas {
                delta.severity = delta.severity.min(Severity::Informational);
            }
        }
        Some(record(ChangeKind::Modified, new, deltas))
    }

    fn compare_declaration(&self, old: &Entity, new: &Entity, out: &mut Vec<AttributeDelta>) {
        if old.kind != new.kind {
            out.push(self.delta(
                DeltaKind::EntityKindChanged,
                "kind",
                Some(old.kind.to_string()),
                Some(new.kind.to_string()),
            ));
        }

        if new.visibility < old.visibility {
            let kind = if old.visibility.is_api() {
                DeltaKind::VisibilityNarrowed
            } else {
                DeltaKind::VisibilityNarrowedNonApi
            };
            out.push(self.delta(
                kind,
                "visibility",
                Some(old.visibility.to_string()),
                Some(new.visibility.to_string()),
            ));
        } else if new.visibility > old.visibility {
            out.push(self.delta(
                DeltaKind::VisibilityWidened,
                "visibility",
                Some(old.visibility.to_string()),
                Some(new.visibility.to_string()),
            ));
        }

        let toggled = old.modifiers.symmetric_difference(&new.modifiers);
        for modifier in toggled {
            let added = new.modifiers.contains(modifier);
            let kind = match (modifier, added) {
                (Modifier::Final, true) => DeltaKind::FinalAdded,
                (Modifier::Final, false) => DeltaKind::FinalRemoved,
                (Modifier::Static, _) => DeltaKind::StaticToggled,
                (Modifier::Abstract, true) => DeltaKind::AbstractAdded,
                (Modifier::Abstract, false) => DeltaKind::AbstractRemoved,
                _ => DeltaKind::ModifierChanged,
            };
            let (o, n) = if added {
                (None, Some(modifier.as_str().to_string()))
            } else {
                (Some(modifier.as_str().to_string()), None)
            };
            out.push(self.delta(kind, format!("modifiers.{}", modifier.as_str()), o, n));
        }
    }

    fn compare_type_parameters(&self, old: &Entity, new: &Entity, out: &mut Vec<AttributeDelta>) {
        if old.type_parameters == new.type_parameters {
            return;
        }
        if old.type_parameters.len() != new.type_parameters.len() {
            out.push(self.delta(
                DeltaKind::TypeParametersChanged,
                "type_parameters",
                Some(render_type_parameters(&old.type_parameters)),
                Some(render_type_parameters(&new.type_parameters)),
            ));
            return;
        }
        for (i, (o, n)) in old.type_parameters.iter().zip(&new.type_parameters).enumerate() {
            if o == n {
                continue;
            }
            let kind = match self.relate_bounds(&o.bounds, &n.bounds) {
                TypeRelation::Equal => continue,
                TypeRelation::Wider => DeltaKind::BoundWidened,
                TypeRelation::Narrower => DeltaKind::BoundNarrowed,
                TypeRelation::Incompatible => DeltaKind::BoundChanged,
                TypeRelation::Unknown => DeltaKind::TypeChangeUnresolved,
            };
            out.push(self.delta(
                kind,
                format!("type_parameters[{}].bounds", i),
                Some(render_bounds(&o.bounds)),
                Some(render_bounds(&n.bounds)),
            ));
        }
    }

    /// Extra bounds constrain more, so a longer list with an equal prefix is
    /// narrower.
    fn relate_bounds(&self, old: &[TypeRef], new: &[TypeRef]) -> TypeRelation {
        let shared = old.len().min(new.len());
        let prefix = old[..shared]
            .iter()
            .zip(&new[..shared])
            .map(|(o, n)| relate(o, n, &self.hierarchy_b))
            .fold(TypeRelation::Equal, TypeRelation::and);
        let length = match new.len().cmp(&old.len()) {
            std::cmp::Ordering::Equal => TypeRelation::Equal,
            std::cmp::Ordering::Greater => TypeRelation::Narrower,
            std::cmp::Ordering::Less => TypeRelation::Wider,
        };
        prefix.and(length)
    }

    fn compare_supertypes(&self, old: &Entity, new: &Entity, out: &mut Vec<AttributeDelta>) {
        let type_name = new.key.qualified_name.as_str();
        for o in &old.supertypes {
            let Some(name) = o.class_name() else {
                continue;
            };
            match new.supertypes.iter().find(|n| n.class_name() == Some(name)) {
                Some(n) if n == o => {}
                Some(n) => out.push(self.delta(
                    DeltaKind::SupertypeRemoved,
                    "supertypes",
                    Some(o.to_string()),
                    Some(n.to_string()),
                )),
                None if self.hierarchy_b.is_subtype(type_name, name) => {}
                None => out.push(self.delta(
                    DeltaKind::SupertypeRemoved,
                    "supertypes",
                    Some(o.to_string()),
                    None,
                )),
            }
        }
        let old_name = old.key.qualified_name.as_str();
        for n in &new.supertypes {
            let Some(name) = n.class_name() else {
                continue;
            };
            let direct = old.supertypes.iter().any(|o| o.class_name() == Some(name));
            if !direct && !self.hierarchy_a.is_subtype(old_name, name) {
                out.push(self.delta(
                    DeltaKind::SupertypeAdded,
                    "supertypes",
                    None,
                    Some(n.to_string()),
                ));
            }
        }
    }

    fn compare_field(&self, old: &Entity, new: &Entity, out: &mut Vec<AttributeDelta>) {
        if old.return_type != new.return_type {
            out.push(self.delta(
                DeltaKind::FieldTypeChanged,
                "type",
                old.return_type.as_ref().map(ToString::to_string),
                new.return_type.as_ref().map(ToString::to_string),
            ));
        }
        let nullability = &self.policy.nullability;
        let (o, n) = (
            nullability.classify(&old.annotations),
            nullability.classify(&new.annotations),
        );
        if o != n {
            out.push(self.delta(
                DeltaKind::FieldNullabilityChanged,
                "nullability",
                Some(nullability_name(o)),
                Some(nullability_name(n)),
            ));
        }
    }

    fn compare_method(&self, old: &Entity, new: &Entity, out: &mut Vec<AttributeDelta>) {
        if let (Some(o), Some(n)) = (&old.return_type, &new.return_type) {
            let kind = match relate(o, n, &self.hierarchy_b) {
                TypeRelation::Equal => None,
                TypeRelation::Narrower => Some(DeltaKind::ReturnTypeNarrowed),
                TypeRelation::Wider => Some(DeltaKind::ReturnTypeWidened),
                TypeRelation::Incompatible => Some(DeltaKind::ReturnTypeChanged),
                TypeRelation::Unknown if self.overridden_return_is(new, o) => {
                    Some(DeltaKind::ReturnTypeNarrowed)
                }
                TypeRelation::Unknown => Some(DeltaKind::TypeChangeUnresolved),
            };
            if let Some(kind) = kind {
                out.push(self.delta(kind, "return_type", Some(o.to_string()), Some(n.to_string())));
            }
        }

        for (i, (o, n)) in old.parameters.iter().zip(&new.parameters).enumerate() {
            let kind = match relate(&o.ty, &n.ty, &self.hierarchy_b) {
                TypeRelation::Equal => None,
                TypeRelation::Wider => Some(DeltaKind::ParameterTypeWidened),
                TypeRelation::Narrower => Some(DeltaKind::ParameterTypeNarrowed),
                TypeRelation::Incompatible => Some(DeltaKind::ParameterTypeChanged),
                TypeRelation::Unknown => Some(DeltaKind::TypeChangeUnresolved),
            };
            if let Some(kind) = kind {
                out.push(self.delta(
                    kind,
                    format!("parameters[{}].type", i),
                    Some(o.ty.to_string()),
                    Some(n.ty.to_string()),
                ));
            }

            let attribute = format!("parameters[{}].nullability", i);
            let nullability = &self.policy.nullability;
            let (from, to) = (
                nullability.classify(&o.annotations),
                nullability.classify(&n.annotations),
            );
            for kind in parameter_nullability_deltas(from, to) {
                out.push(self.delta(
                    kind,
                    attribute.as_str(),
                    Some(nullability_name(from)),
                    Some(nullability_name(to)),
                ));
            }

            self.compare_annotations(
                &format!("parameters[{}].annotations", i),
                &o.annotations,
                &n.annotations,
                true,
                out,
            );
        }

        if old.varargs != new.varargs {
            let kind = if new.varargs {
                DeltaKind::VarargsAdded
            } else {
                DeltaKind::VarargsRemoved
            };
            out.push(self.delta(
                kind,
                "varargs",
                Some(old.varargs.to_string()),
                Some(new.varargs.to_string()),
            ));
        }

        self.compare_exceptions(old, new, out);

        let nullability = &self.policy.nullability;
        let (from, to) = (
            nullability.classify(&old.annotations),
            nullability.classify(&new.annotations),
        );
        for kind in return_nullability_deltas(from, to) {
            out.push(self.delta(
                kind,
                "return_type.nullability",
                Some(nullability_name(from)),
                Some(nullability_name(to)),
            ));
        }
    }

    /// `new` overrides a method whose return type is `old_return`, so the new
    /// return type is a covariant refinement of it.
    fn overridden_return_is(&self, new: &Entity, old_return: &TypeRef) -> bool {
        new.overrides
            .as_ref()
            .and_then(|target| self.b.get(target).or_else(|| self.a.get(target)))
            .and_then(|target| target.return_type.as_ref())
            .map(|ret| ret == old_return)
            .unwrap_or(false)
    }

    fn is_unchecked(&self, exception: &TypeRef) -> bool {
        exception
            .class_name()
            .map(|name| UNCHECKED_ROOTS.iter().any(|root| self.hierarchy_b.is_subtype(name, root)))
            .unwrap_or(false)
    }

    fn compare_exceptions(&self, old: &Entity, new: &Entity, out: &mut Vec<AttributeDelta>) {
        let covered_by = |e: &TypeRef, pool: &[TypeRef]| {
            pool.iter().any(|p| {
                p == e
                    || matches!(
                        (e.class_name(), p.class_name()),
                        (Some(sub), Some(sup)) if self.hierarchy_b.is_subtype(sub, sup)
                    )
            })
        };
        for e in new.exceptions.iter().filter(|e| !self.is_unchecked(e)) {
            if !covered_by(e, old.exceptions.as_slice()) {
                out.push(self.delta(
                    DeltaKind::ExceptionAdded,
                    "exceptions",
                    None,
                    Some(e.to_string()),
                ));
            }
        }
        for e in old.exceptions.iter().filter(|e| !self.is_unchecked(e)) {
            if !new.exceptions.contains(e) {
                out.push(self.delta(
                    DeltaKind::ExceptionRemoved,
                    "exceptions",
                    Some(e.to_string()),
                    None,
                ));
            }
        }
    }

    fn compare_annotations(
        &self,
        attribute: &str,
        old: &AnnotationSet,
        new: &AnnotationSet,
        skip_nullability: bool,
        out: &mut Vec<AttributeDelta>,
    ) {
        let nullability = &self.policy.nullability;
        let names: BTreeSet<&String> = old.keys().chain(new.keys()).collect();
        for name in names {
            if skip_nullability && nullability.is_nullability(name) {
                continue;
            }
            let path = format!("{}.@{}", attribute, name);
            match (old.get(name), new.get(name)) {
                (None, Some(args)) => out.push(self.delta(
                    DeltaKind::AnnotationAdded,
                    path,
                    None,
                    Some(format!("@{}{}", name, render_args(args))),
                )),
                (Some(args), None) => out.push(self.delta(
                    DeltaKind::AnnotationRemoved,
                    path,
                    Some(format!("@{}{}", name, render_args(args))),
                    None,
                )),
                (Some(o), Some(n)) if o != n => out.push(self.delta(
                    DeltaKind::AnnotationArgumentsChanged,
                    path,
                    Some(render_args(o)),
                    Some(render_args(n)),
                )),
                _ => {}
            }
        }
    }
}

fn record(kind: ChangeKind, entity: &Entity, deltas: Vec<AttributeDelta>) -> ChangeRecord {
    let severity = deltas
        .iter()
        .map(|d| d.severity)
        .max()
        .unwrap_or(Severity::Informational);
    ChangeRecord {
        kind,
        key: entity.key.clone(),
        deltas,
        severity,
    }
}

/// Declared visibility capped by every enclosing type's visibility.
pub fn effective_visibility(entity: &Entity, snapshot: &Snapshot) -> Visibility {
    let mut visibility = entity.visibility;
    let mut owner = entity.owner.as_deref();
    let mut seen = BTreeSet::new();
    while let Some(name) = owner {
        if !seen.insert(name) {
            break;
        }
        match snapshot.get_type(name) {
            Some(enclosing) => {
                visibility = visibility.min(enclosing.visibility);
                owner = enclosing.owner.as_deref();
            }
            None => break,
        }
    }
    visibility
}

fn parameter_nullability_deltas(from: Nullability, to: Nullability) -> Vec<DeltaKind> {
    use Nullability::*;
    match (from, to) {
        (Unspecified, NotNull) => vec![DeltaKind::ParamNotNullAdded],
        (NotNull, Unspecified) => vec![DeltaKind::ParamNotNullRemoved],
        (Unspecified, Nullable) => vec![DeltaKind::ParamNullableAdded],
        (Nullable, Unspecified) => vec![DeltaKind::ParamNullableRemoved],
        (NotNull, Nullable) => vec![DeltaKind::ParamNotNullRemoved, DeltaKind::ParamNullableAdded],
        (Nullable, NotNull) => vec![DeltaKind::ParamNullableRemoved, DeltaKind::ParamNotNullAdded],
        _ => Vec::new(),
    }
}

fn return_nullability_deltas(from: Nullability, to: Nullability) -> Vec<DeltaKind> {
    use Nullability::*;
    match (from, to) {
        (Unspecified, NotNull) => vec![DeltaKind::ReturnNotNullAdded],
        (NotNull, Unspecified) => vec![DeltaKind::ReturnNotNullRemoved],
        (Unspecified, Nullable) => vec![DeltaKind::ReturnNullableAdded],
        (Nullable, Unspecified) => vec![DeltaKind::ReturnNullableRemoved],
        (NotNull, Nullable) => {
            vec![DeltaKind::ReturnNotNullRemoved, DeltaKind::ReturnNullableAdded]
        }
        (Nullable, NotNull) => {
            vec![DeltaKind::ReturnNullableRemoved, DeltaKind::ReturnNotNullAdded]
        }
        _ => Vec::new(),
    }
}

fn nullability_name(n: Nullability) -> String {
    match n {
        Nullability::Unspecified => "unspecified",
        Nullability::NotNull => "not_null",
        Nullability::Nullable => "nullable",
    }
    .to_string()
}

fn render_bounds(bounds: &[TypeRef]) -> String {
    bounds
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" & ")
}

fn render_type_parameters(params: &[TypeParameter]) -> String {
    let rendered: Vec<String> = params.iter().map(|p| render_bounds(&p.bounds)).collect();
    format!("<{}>", rendered.join(", "))
}
