#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use apiscan_core::model::{AnnotationArgs, AnnotationValue, Modifier, RawDeclaration};
use apiscan_core::surface::{consumed_types, declared_types, external_references};
use common::{public_class, public_method, snapshot};
use std::collections::BTreeSet;

fn names(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn service() -> apiscan_core::Snapshot {
    let mut args = AnnotationArgs::new();
    args.insert(
        "codec".to_string(),
        AnnotationValue::Class("com.codec.JsonCodec".to_string()),
    );
    snapshot(
        "service-1.0",
        vec![
            public_class("com.acme.Service")
                .implementing("com/vendor/Lifecycle")
                .with_annotation_args("com.meta.Exported", args),
            public_method("com.acme.Service#fetch")
                .with_signature("(Lcom/acme/Request;)Ljava/util/List<Lcom/model/Item;>;")
                .with_param("Lcom/acme/Request;")
                .returning("Ljava/util/List;")
                .throwing("com/net/NetException"),
            public_class("com.acme.Request"),
            RawDeclaration::method("com.acme.Service#cache")
                .with_modifiers([Modifier::Private])
                .returning("Lcom/cache/Store;"),
            RawDeclaration::class("com.acme.Internal"),
            public_method("com.acme.Internal#leak").returning("Lcom/hidden/Thing;"),
        ],
    )
}

#[test]
fn test_declared_types_lists_types_only() {
    assert_eq!(
        declared_types(&service()),
        names(&["com.acme.Internal", "com.acme.Request", "com.acme.Service"])
    );
}

#[test]
fn test_consumed_types_cover_api_visible_declarations_only() {
    let consumed = consumed_types(&service());
    for expected in [
        "com.vendor.Lifecycle",
        "com.meta.Exported",
        "com.codec.JsonCodec",
        "com.acme.Request",
        "com.model.Item",
        "java.util.List",
        "com.net.NetException",
    ] {
        assert!(consumed.contains(expected), "missing {}", expected);
    }
    // Private member and member of a package-private type
    assert!(!consumed.contains("com.cache.Store"));
    assert!(!consumed.contains("com.hidden.Thing"));
}

#[test]
fn test_external_references_exclude_own_types() {
    let external = external_references(&service());
    assert!(!external.contains("com.acme.Request"));
    assert!(external.contains("com.model.Item"));
    assert!(external.contains("java.util.List"), "platform filtering is the caller's concern");
}
