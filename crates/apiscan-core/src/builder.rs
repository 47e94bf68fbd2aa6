//! API model builder
//!
//! Turns raw declarations into an immutable [`Snapshot`]:
//! owners are resolved, generic signatures normalized, override relations
//! tagged, and references to types outside the artifact recorded as
//! warnings. Signature errors reject only the offending declaration; a
//! signature-key collision rejects the whole build.

use crate::errors::{ApiScanError, Result};
use crate::model::annotation::canonical_type_name;
use crate::model::{
    AnnotationSet, BaseType, Entity, EntityKind, EntityWarning, Modifier, Parameter, RawDeclaration,
    SignatureKey, TypeParameter, TypeRef, VarScope, Visibility, OBJECT,
};
use crate::signature::{self, GenericScope};
use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Options controlling snapshot construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Model inherited, non-overridden API members as members of each subtype
    pub include_inherited: bool,
    /// Name prefixes never reported as unresolved references
    pub platform_prefixes: Vec<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            include_inherited: false,
            platform_prefixes: vec!["java.".to_string(), "javax.".to_string()],
        }
    }
}

impl BuildOptions {
    pub fn is_platform(&self, type_name: &str) -> bool {
        self.platform_prefixes.iter().any(|p| type_name.starts_with(p.as_str()))
    }
}

/// Result of a build: the snapshot plus declarations rejected with
/// `MalformedSignature`.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub snapshot: Snapshot,
    pub rejected: Vec<ApiScanError>,
}

/// Build the snapshot of one artifact.
///
/// # Errors
///
/// Returns `ApiScanError::DuplicateEntity` if two declarations produce the
/// same signature key. Malformed signatures never fail the build; they are
/// returned in [`BuildOutput::rejected`].
pub fn build(
    artifact: &str,
    declarations: &[RawDeclaration],
    options: &BuildOptions,
) -> Result<BuildOutput> {
    let live: Vec<&RawDeclaration> = declarations
        .iter()
        .filter(|d| {
            let skip = d.modifiers.contains(&Modifier::Synthetic)
                || d.modifiers.contains(&Modifier::Bridge)
                || member_parts(&d.qualified_name).map(|(_, m)| m) == Some("<clinit>");
            if skip {
                tracing::debug!(
                    qualified_name = %d.qualified_name,
                    "skipping compiler-generated declaration"
                );
            }
            !skip
        })
        .collect();

    let mut types: Vec<&RawDeclaration> =
        live.iter().copied().filter(|d| d.kind.is_type()).collect();
    // Outer types first so nested types see their enclosing scope.
    types.sort_by_key(|d| d.qualified_name.matches('$').count());

    let declared: BTreeSet<String> = types
        .iter()
        .map(|d| canonical_type_name(&d.qualified_name))
        .collect();

    let mut rejected = Vec::new();
    let mut scopes: BTreeMap<String, GenericScope> = BTreeMap::new();
    let mut type_entities: BTreeMap<String, Entity> = BTreeMap::new();
    let mut entities: Vec<Entity> = Vec::new();

    for decl in types {
        let name = canonical_type_name(&decl.qualified_name);
        let owner = nesting_owner(&name, &declared);
        let enclosing = match &owner {
            Some(outer) if !decl.modifiers.contains(&Modifier::Static) => {
                scopes.get(outer).cloned().unwrap_or_default()
            }
            _ => GenericScope::empty(),
        };
        match build_type(decl, &name, owner, &enclosing) {
            Ok((entity, scope)) => {
                scopes.insert(name.clone(), scope);
                type_entities.insert(name, entity.clone());
                entities.push(entity);
            }
            Err(err) => {
                tracing::warn!(qualified_name = %name, error = %err, "rejected type declaration");
                scopes.insert(name.clone(), enclosing.nested(Vec::new()));
                rejected.push(err.for_declaration(&name));
            }
        }
    }

    for decl in live.iter().copied().filter(|d| !d.kind.is_type()) {
        let Some((owner, member)) = member_parts(&decl.qualified_name) else {
            rejected.push(ApiScanError::MalformedSignature {
                qualified_name: decl.qualified_name.clone(),
                signature: String::new(),
                reason: "member name has no owning type".to_string(),
            });
            continue;
        };
        let owner = canonical_type_name(owner);
        let scope = scopes.get(&owner).cloned().unwrap_or_default();
        let type_params = type_parameter_chain(&owner, &type_entities);
        match build_member(decl, &owner, member, &scope, &type_params) {
            Ok(entity) => entities.push(entity),
            Err(err) => {
                tracing::warn!(
                    qualified_name = %decl.qualified_name,
                    error = %err,
                    "rejected member declaration"
                );
                rejected.push(err.for_declaration(&decl.qualified_name));
            }
        }
    }

    for entity in &mut entities {
        entity.warnings = unresolved_references(entity, &declared, options);
    }

    tag_overrides(&mut entities, &type_entities);

    if options.include_inherited {
        let inherited = inherited_members(&entities, &type_entities);
        entities.extend(inherited);
    }

    let declaration_count = declarations.len();
    let snapshot = Snapshot::from_entities(artifact, entities)?;
    tracing::debug!(
        artifact,
        declaration_count,
        entity_count = snapshot.len(),
        rejected_count = rejected.len(),
        "snapshot built"
    );
    Ok(BuildOutput { snapshot, rejected })
}

/// Split `Owner#member` (or the `Owner.member` fallback) into its parts.
fn member_parts(qualified_name: &str) -> Option<(&str, &str)> {
    qualified_name
        .split_once('#')
        .or_else(|| qualified_name.rsplit_once('.'))
        .filter(|(owner, member)| !owner.is_empty() && !member.is_empty())
}

/// `pkg.Outer` for `pkg.Outer$Inner` when the outer type is declared.
fn nesting_owner(name: &str, declared: &BTreeSet<String>) -> Option<String> {
    name.rsplit_once('$')
        .map(|(outer, _)| outer.to_string())
        .filter(|outer| declared.contains(outer))
}

fn visibility_of(decl: &RawDeclaration) -> Visibility {
    if decl.modifiers.contains(&Modifier::Public) {
        Visibility::Public
    } else if decl.modifiers.contains(&Modifier::Protected) {
        Visibility::Protected
    } else if decl.modifiers.contains(&Modifier::Private) {
        Visibility::Private
    } else {
        Visibility::Package
    }
}

fn canonical_annotations(set: &AnnotationSet) -> AnnotationSet {
    set.iter()
        .map(|(name, args)| (canonical_type_name(name), args.clone()))
        .collect()
}

fn skeleton(decl: &RawDeclaration, key: SignatureKey, owner: Option<String>) -> Entity {
    Entity {
        key,
        kind: decl.kind,
        visibility: visibility_of(decl),
        modifiers: decl.modifiers.iter().copied().filter(|m| m.is_modeled()).collect(),
        owner,
        type_parameters: Vec::new(),
        supertypes: Vec::new(),
        annotations: canonical_annotations(&decl.annotations),
        parameters: Vec::new(),
        return_type: None,
        exceptions: Vec::new(),
        varargs: false,
        overrides: None,
        inherited_from: None,
        warnings: Vec::new(),
    }
}

fn build_type(
    decl: &RawDeclaration,
    name: &str,
    owner: Option<String>,
    enclosing: &GenericScope,
) -> Result<(Entity, GenericScope)> {
    let mut entity = skeleton(decl, SignatureKey::for_type(name), owner);
    let scope = match &decl.generic_signature {
        Some(sig) => {
            let class = signature::normalize_class_signature(sig, enclosing)?;
            entity.type_parameters = class.type_parameters;
            entity.supertypes = std::iter::once(class.superclass)
                .chain(class.interfaces)
                .filter(|t| t.class_name() != Some(OBJECT))
                .collect();
            class.scope
        }
        None => {
            entity.supertypes = decl
                .superclass
                .iter()
                .chain(decl.interfaces.iter())
                .map(|s| TypeRef::class(canonical_type_name(s)))
                .filter(|t| t.class_name() != Some(OBJECT))
                .collect();
            enclosing.nested(Vec::new())
        }
    };
    Ok((entity, scope))
}

fn build_member(
    decl: &RawDeclaration,
    owner: &str,
    member: &str,
    scope: &GenericScope,
    type_params: &[&[TypeParameter]],
) -> Result<Entity> {
    match decl.kind {
        EntityKind::Field => {
            let ty = match (&decl.generic_signature, &decl.return_type) {
                (Some(sig), _) => signature::normalize_type(sig, scope)?,
                (None, Some(desc)) => signature::normalize_descriptor(desc)?,
                (None, None) => {
                    return Err(ApiScanError::MalformedSignature {
                        qualified_name: String::new(),
                        signature: String::new(),
                        reason: "field has no type".to_string(),
                    })
                }
            };
            let key = SignatureKey::for_field(owner, member);
            let mut entity = skeleton(decl, key, Some(owner.to_string()));
            entity.return_type = Some(ty);
            Ok(entity)
        }
        _ => build_method(decl, owner, member, scope, type_params),
    }
}

fn build_method(
    decl: &RawDeclaration,
    owner: &str,
    member: &str,
    scope: &GenericScope,
    type_params: &[&[TypeParameter]],
) -> Result<Entity> {
    let descriptor_types = decl
        .parameters
        .iter()
        .map(|p| signature::normalize_descriptor(&p.descriptor))
        .collect::<Result<Vec<_>>>()?;

    let generic = decl
        .generic_signature
        .as_deref()
        .map(|sig| signature::normalize_method_signature(sig, scope))
        .transpose()?;

    let (type_parameters, param_types, erased) = match &generic {
        // Descriptors are authoritative for erasure; the signature supplies
        // generic detail when it lines up parameter for parameter.
        Some(g) if !decl.parameters.is_empty() || g.parameters.is_empty() => {
            let erased: Vec<String> = descriptor_types.iter().map(TypeRef::erased_name).collect();
            let types = if g.parameters.len() == descriptor_types.len() {
                g.parameters.clone()
            } else {
                descriptor_types.clone()
            };
            (g.type_parameters.clone(), types, erased)
        }
        Some(g) => {
            let erased = g
                .parameters
                .iter()
                .map(|t| erase(t, &g.type_parameters, type_params, 0))
                .collect();
            (g.type_parameters.clone(), g.parameters.clone(), erased)
        }
        None => {
            let erased = descriptor_types.iter().map(TypeRef::erased_name).collect();
            (Vec::new(), descriptor_types.clone(), erased)
        }
    };

    let return_type = match (&generic, &decl.return_type) {
        (Some(g), _) => g.return_type.clone(),
        (None, Some(desc)) => signature::normalize_descriptor(desc)?,
        (None, None) => TypeRef::primitive("void"),
    };

    let exceptions = match &generic {
        Some(g) if !g.exceptions.is_empty() => g.exceptions.clone(),
        _ => decl
            .exceptions
            .iter()
            .map(|e| TypeRef::class(canonical_type_name(e)))
            .collect(),
    };

    let varargs = decl.modifiers.contains(&Modifier::Varargs);
    if varargs && param_types.last().map(|t| t.array_depth == 0).unwrap_or(true) {
        return Err(ApiScanError::MalformedSignature {
            qualified_name: String::new(),
            signature: decl.generic_signature.clone().unwrap_or_default(),
            reason: "varargs method without a trailing array parameter".to_string(),
        });
    }

    let annotation_sets = decl.parameters.iter().map(|p| canonical_annotations(&p.annotations));
    let parameters = param_types
        .into_iter()
        .zip(erased.iter().cloned())
        .zip(annotation_sets.chain(std::iter::repeat_with(AnnotationSet::new)))
        .map(|((ty, erased), annotations)| Parameter {
            ty,
            erased,
            annotations,
        })
        .collect();

    let mut entity = skeleton(
        decl,
        SignatureKey::for_method(owner, member, erased),
        Some(owner.to_string()),
    );
    entity.type_parameters = type_parameters;
    entity.parameters = parameters;
    entity.return_type = Some(return_type);
    entity.exceptions = exceptions;
    entity.varargs = varargs;
    Ok(entity)
}

/// Type parameters visible in `owner`, indexed by scope level: the owner
/// first, then each enclosing type up to the first static one.
fn type_parameter_chain<'e>(
    owner: &str,
    types: &'e BTreeMap<String, Entity>,
) -> Vec<&'e [TypeParameter]> {
    let mut chain = Vec::new();
    let mut current = types.get(owner);
    while let Some(entity) = current {
        chain.push(entity.type_parameters.as_slice());
        current = match &entity.owner {
            Some(outer) if !entity.has(Modifier::Static) => types.get(outer),
            _ => None,
        };
    }
    chain
}

/// Erasure of a normalized type: type variables erase to their first bound.
///
/// `type_params[level]` holds the parameters of the type at that scope level.
fn erase(
    ty: &TypeRef,
    method_params: &[TypeParameter],
    type_params: &[&[TypeParameter]],
    depth: u32,
) -> String {
    let base = match &ty.base {
        BaseType::Var {
            scope: VarScope::Method,
            index,
        } => method_params
            .get(*index as usize)
            .and_then(|p| p.bounds.first())
            .filter(|_| depth < 8)
            .map(|b| erase(&b.without_wildcard(), method_params, type_params, depth + 1)),
        BaseType::Var {
            scope: VarScope::Type(level),
            index,
        } => {
            let level = *level as usize;
            type_params
                .get(level)
                .and_then(|params| params.get(*index as usize))
                .and_then(|p| p.bounds.first())
                .filter(|_| depth < 8)
                // A bound is scoped to its own type, where that type is level 0
                .map(|b| erase(&b.without_wildcard(), &[], &type_params[level..], depth + 1))
        }
        _ => None,
    };
    let mut out = base.unwrap_or_else(|| {
        TypeRef {
            args: Vec::new(),
            wildcard: Default::default(),
            array_depth: 0,
            base: ty.base.clone(),
        }
        .erased_name()
    });
    for _ in 0..ty.array_depth {
        out.push_str("[]");
    }
    out
}

fn unresolved_references(
    entity: &Entity,
    declared: &BTreeSet<String>,
    options: &BuildOptions,
) -> Vec<EntityWarning> {
    let mut names: BTreeSet<String> = entity
        .referenced_type_names()
        .into_iter()
        .filter(|n| !declared.contains(n) && !options.is_platform(n))
        .collect();

    let mut free = BTreeSet::new();
    let types = entity
        .supertypes
        .iter()
        .chain(entity.parameters.iter().map(|p| &p.ty))
        .chain(entity.return_type.iter())
        .chain(entity.exceptions.iter())
        .chain(entity.type_parameters.iter().flat_map(|tp| tp.bounds.iter()));
    for ty in types {
        ty.collect_free_vars(&mut free);
    }
    names.extend(free);

    names
        .into_iter()
        .map(|type_name| EntityWarning::UnresolvedReference { type_name })
        .collect()
}

/// In-snapshot supertypes of `type_name`, breadth first, superclass before
/// interfaces.
fn supertype_chain(type_name: &str, types: &BTreeMap<String, Entity>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut order = Vec::new();
    let mut queue = VecDeque::from([type_name.to_string()]);
    while let Some(current) = queue.pop_front() {
        let Some(entity) = types.get(&current) else {
            continue;
        };
        for sup in entity.supertypes.iter().filter_map(TypeRef::class_name) {
            if sup != type_name && types.contains_key(sup) && seen.insert(sup.to_string()) {
                order.push(sup.to_string());
                queue.push_back(sup.to_string());
            }
        }
    }
    order
}

fn overridable(entity: &Entity) -> bool {
    entity.kind == EntityKind::Method
        && entity.visibility != Visibility::Private
        && !entity.has(Modifier::Static)
        && !entity.is_constructor()
}

fn tag_overrides(entities: &mut [Entity], types: &BTreeMap<String, Entity>) {
    let methods: BTreeMap<String, bool> = entities
        .iter()
        .filter(|e| e.kind == EntityKind::Method)
        .map(|e| (e.key.to_string(), overridable(e)))
        .collect();

    for entity in entities.iter_mut().filter(|e| overridable(e)) {
        let Some(owner) = entity.owner.clone() else {
            continue;
        };
        entity.overrides = supertype_chain(&owner, types)
            .iter()
            .map(|sup| entity.key.rehomed(sup))
            .find(|candidate| methods.get(&candidate.to_string()).copied().unwrap_or(false));
    }
}

fn inherited_members(entities: &[Entity], types: &BTreeMap<String, Entity>) -> Vec<Entity> {
    let by_owner: BTreeMap<&str, Vec<&Entity>> =
        entities.iter().fold(BTreeMap::new(), |mut acc, e| {
            if let Some(owner) = e.owner.as_deref() {
                acc.entry(owner).or_default().push(e);
            }
            acc
        });
    let existing: BTreeSet<String> = entities.iter().map(|e| e.key.to_string()).collect();

    let mut out = Vec::new();
    for type_name in types.keys() {
        let mut present: BTreeSet<String> = BTreeSet::new();
        for sup in supertype_chain(type_name, types) {
            for member in by_owner.get(sup.as_str()).into_iter().flatten() {
                if !member.is_inheritable() {
                    continue;
                }
                let key = member.key.rehomed(type_name);
                let rendered = key.to_string();
                if existing.contains(&rendered) || !present.insert(rendered) {
                    continue;
                }
                let mut copy = (*member).clone();
                copy.key = key;
                copy.owner = Some(type_name.clone());
                copy.overrides = None;
                copy.inherited_from = Some(member.key.clone());
                out.push(copy);
            }
        }
    }
    tracing::debug!(inherited_count = out.len(), "inherited members modeled");
    out
}
