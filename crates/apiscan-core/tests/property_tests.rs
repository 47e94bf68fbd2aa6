#![allow(clippy::unwrap_used, clippy::expect_used)]

// Property tests: normalization idempotence and alpha-invariance, matcher
// totality, diff determinism and severity monotonicity.

use apiscan_core::hierarchy::TypeHierarchy;
use apiscan_core::model::{Modifier, RawDeclaration, Visibility};
use apiscan_core::signature::{
    canonicalize, normalize_method_signature, normalize_type, GenericScope,
};
use apiscan_core::{
    build, compare, match_entities, BuildOptions, CompatibilityPolicy, Severity, Snapshot,
};
use proptest::prelude::*;

const CLASSES: &[&str] = &[
    "java/lang/String",
    "java/lang/Integer",
    "java/lang/Number",
    "java/lang/CharSequence",
    "java/util/List",
    "java/util/Map",
    "com/acme/Widget",
];

/// Reference type signatures over a fixed class pool and the variables `T`, `U`.
fn reference_signature() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        prop::sample::select(CLASSES).prop_map(|c| format!("L{};", c)),
        prop::sample::select(&["TT;", "TU;", "[I", "[[J"][..]).prop_map(str::to_string),
    ];
    leaf.prop_recursive(3, 16, 3, |inner| {
        let argument = prop_oneof![
            inner.clone(),
            inner.clone().prop_map(|t| format!("+{}", t)),
            inner.clone().prop_map(|t| format!("-{}", t)),
            Just("*".to_string()),
        ];
        prop_oneof![
            inner.clone().prop_map(|t| format!("[{}", t)),
            (prop::sample::select(CLASSES), prop::collection::vec(argument, 1..3))
                .prop_map(|(c, args)| format!("L{}<{}>;", c, args.concat())),
        ]
    })
}

fn type_signature() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(&["I", "J", "Z"][..]).prop_map(str::to_string),
        reference_signature(),
    ]
}

/// Replace the variable names `T`, `U` by fresh names in a method signature.
fn rename_vars(sig: &str, t: &str, u: &str) -> String {
    sig.replace("TT;", &format!("T{};", t))
        .replace("TU;", &format!("T{};", u))
        .replace("<T:", &format!("<{}:", t))
        .replace(";U:", &format!(";{}:", u))
}

fn method_scope_signature(param: &str) -> String {
    format!("<T:Ljava/lang/Object;U:Ljava/lang/Object;>({})V", param)
}

/// Small class with a subset of methods, each present or absent.
fn api_snapshot(artifact: &str, methods: &[(String, bool, bool)]) -> Snapshot {
    let mut decls = vec![RawDeclaration::class("com.acme.Api").with_modifiers([Modifier::Public])];
    for (name, public, is_final) in methods {
        let mut modifiers = vec![if *public { Modifier::Public } else { Modifier::Private }];
        if *is_final {
            modifiers.push(Modifier::Final);
        }
        decls.push(
            RawDeclaration::method(format!("com.acme.Api#{}", name)).with_modifiers(modifiers),
        );
    }
    build(artifact, &decls, &BuildOptions::default()).unwrap().snapshot
}

const VISIBILITIES: [Visibility; 4] = [
    Visibility::Private,
    Visibility::Package,
    Visibility::Protected,
    Visibility::Public,
];

/// Bound candidates related through the platform hierarchy.
const BOUNDS: &[&str] = &[
    "java.lang.Integer",
    "java.lang.Number",
    "java.lang.Comparable",
    "java.lang.String",
    "java.lang.CharSequence",
    "java.lang.Object",
];

fn visibility_snapshot(artifact: &str, visibility: Visibility) -> Snapshot {
    let modifiers = match visibility {
        Visibility::Private => vec![Modifier::Private],
        Visibility::Package => vec![],
        Visibility::Protected => vec![Modifier::Protected],
        Visibility::Public => vec![Modifier::Public],
    };
    let decls = vec![
        RawDeclaration::class("com.acme.Api").with_modifiers([Modifier::Public]),
        RawDeclaration::method("com.acme.Api#run").with_modifiers(modifiers),
    ];
    build(artifact, &decls, &BuildOptions::default()).unwrap().snapshot
}

fn bound_snapshot(artifact: &str, bound: &str) -> Snapshot {
    let signature = format!("<T:L{};>Ljava/lang/Object;", bound.replace('.', "/"));
    let decls = vec![RawDeclaration::class("com.acme.Box")
        .with_modifiers([Modifier::Public])
        .with_signature(signature)];
    build(artifact, &decls, &BuildOptions::default()).unwrap().snapshot
}

fn highest(a: &Snapshot, b: &Snapshot) -> Option<Severity> {
    compare(a, b, &CompatibilityPolicy::default())
        .iter()
        .map(|r| r.severity)
        .max()
}

fn methods() -> impl Strategy<Value = Vec<(String, bool, bool)>> {
    prop::collection::btree_map("[a-e]", (any::<bool>(), any::<bool>()), 0..5)
        .prop_map(|m| m.into_iter().map(|(n, (p, f))| (n, p, f)).collect())
}

proptest! {
    #[test]
    fn prop_normalization_is_idempotent(sig in type_signature()) {
        let scope = GenericScope::empty();
        let once = normalize_type(&sig, &scope).unwrap();
        prop_assert_eq!(canonicalize(&once), once.clone());
        prop_assert_eq!(normalize_type(&sig, &scope).unwrap(), once);
    }

    #[test]
    fn prop_renaming_type_variables_is_invisible(sig in type_signature()) {
        let scope = GenericScope::empty();
        let original = method_scope_signature(&sig);
        let renamed = rename_vars(&original, "Key", "Value");
        prop_assert_eq!(
            normalize_method_signature(&original, &scope).unwrap(),
            normalize_method_signature(&renamed, &scope).unwrap()
        );
    }

    #[test]
    fn prop_matching_is_total(a in methods(), b in methods()) {
        let (sa, sb) = (api_snapshot("a", &a), api_snapshot("b", &b));
        let pairs = match_entities(&sa, &sb);
        prop_assert_eq!(pairs.iter().filter(|p| p.old.is_some()).count(), sa.len());
        prop_assert_eq!(pairs.iter().filter(|p| p.new.is_some()).count(), sb.len());
        let keys: Vec<_> = pairs.iter().map(|p| p.key.clone()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(keys, sorted);
    }

    #[test]
    fn prop_compare_is_deterministic(a in methods(), b in methods()) {
        let (sa, sb) = (api_snapshot("a", &a), api_snapshot("b", &b));
        let policy = CompatibilityPolicy::default();
        prop_assert_eq!(compare(&sa, &sb, &policy), compare(&sa, &sb, &policy));
        prop_assert!(compare(&sa, &sa, &policy).is_empty());
    }

    /// Making a method less visible never lowers the severity of its removal
    /// or modification.
    #[test]
    fn prop_narrowing_visibility_is_monotone(name in "[a-e]", is_final in any::<bool>()) {
        let policy = CompatibilityPolicy::default();
        let base = api_snapshot("a", &[(name.clone(), true, false)]);
        let severity_against = |public: bool| {
            let b = api_snapshot("b", &[(name.clone(), public, is_final)]);
            compare(&base, &b, &policy)
                .iter()
                .map(|r| r.severity)
                .max()
                .unwrap_or(Severity::Informational)
        };
        prop_assert!(severity_against(false) >= severity_against(true));
        prop_assert_eq!(severity_against(false), Severity::Breaking);
    }

    /// Widening visibility is never Breaking; narrowing it is never
    /// Compatible, and is Breaking whenever the old member was API.
    #[test]
    fn prop_visibility_severity_follows_direction(
        old in prop::sample::select(VISIBILITIES.to_vec()),
        new in prop::sample::select(VISIBILITIES.to_vec()),
    ) {
        let severity = highest(&visibility_snapshot("a", old), &visibility_snapshot("b", new));
        if new > old {
            prop_assert_ne!(severity, Some(Severity::Breaking));
        } else if new < old {
            prop_assert_ne!(severity, Some(Severity::Compatible));
            if old.is_api() {
                prop_assert_eq!(severity, Some(Severity::Breaking));
            }
        } else {
            prop_assert_eq!(severity, None);
        }
    }

    /// A bound replaced by one of its supertypes is never Breaking; one
    /// replaced by a proper subtype is never Compatible.
    #[test]
    fn prop_bound_severity_follows_direction(
        old in prop::sample::select(BOUNDS),
        new in prop::sample::select(BOUNDS),
    ) {
        let hierarchy = TypeHierarchy::platform();
        let severity = highest(&bound_snapshot("a", old), &bound_snapshot("b", new));
        if old == new {
            prop_assert_eq!(severity, None);
        } else if hierarchy.is_subtype(old, new) {
            prop_assert_eq!(severity, Some(Severity::Compatible));
        } else if hierarchy.is_subtype(new, old) {
            prop_assert_eq!(severity, Some(Severity::Breaking));
        } else {
            prop_assert_ne!(severity, Some(Severity::Compatible));
        }
    }
}
