#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use apiscan_core::match_entities;
use apiscan_core::model::{RawDeclaration, SignatureKey};
use apiscan_core::Snapshot;
use common::{public_class, public_method, snapshot};

fn version_one() -> Snapshot {
    snapshot(
        "lib-1.0",
        vec![
            public_class("com.acme.Widget"),
            public_method("com.acme.Widget#resize").with_param("I"),
            public_method("com.acme.Widget#render"),
            RawDeclaration::field("com.acme.Widget#size", "I"),
        ],
    )
}

fn version_two() -> Snapshot {
    snapshot(
        "lib-2.0",
        vec![
            public_class("com.acme.Widget"),
            // Same name, different erased parameters: a different entity
            public_method("com.acme.Widget#resize").with_param("J"),
            public_method("com.acme.Widget#render").returning("Z"),
            public_class("com.acme.Gadget"),
        ],
    )
}

#[test]
fn test_every_entity_appears_in_exactly_one_pair() {
    let (a, b) = (version_one(), version_two());
    let pairs = match_entities(&a, &b);

    let olds: Vec<&SignatureKey> = pairs.iter().filter_map(|p| p.old.map(|e| &e.key)).collect();
    let news: Vec<&SignatureKey> = pairs.iter().filter_map(|p| p.new.map(|e| &e.key)).collect();
    assert_eq!(olds.len(), a.len());
    assert_eq!(news.len(), b.len());
    assert!(pairs.iter().all(|p| p.old.is_some() || p.new.is_some()));
}

#[test]
fn test_pairs_are_keyed_and_ordered() {
    let (a, b) = (version_one(), version_two());
    let pairs = match_entities(&a, &b);
    let rendered: Vec<String> = pairs.iter().map(|p| p.key.to_string()).collect();
    assert_eq!(
        rendered,
        vec![
            "com.acme.Gadget",
            "com.acme.Widget",
            "com.acme.Widget#render()",
            "com.acme.Widget#resize(int)",
            "com.acme.Widget#resize(long)",
            "com.acme.Widget#size",
        ]
    );

    let render = pairs.iter().find(|p| p.key.to_string() == "com.acme.Widget#render()").unwrap();
    assert!(render.old.is_some() && render.new.is_some());
    let old_resize = pairs
        .iter()
        .find(|p| p.key.to_string() == "com.acme.Widget#resize(int)")
        .unwrap();
    assert!(old_resize.old.is_some() && old_resize.new.is_none());
    let gadget = pairs.iter().find(|p| p.key.to_string() == "com.acme.Gadget").unwrap();
    assert!(gadget.old.is_none() && gadget.new.is_some());
}

#[test]
fn test_pair_key_matches_present_side() {
    let (a, b) = (version_one(), version_two());
    for pair in match_entities(&a, &b) {
        let entity = pair.old.or(pair.new).unwrap();
        assert_eq!(pair.key, &entity.key);
    }
}

#[test]
fn test_empty_snapshots_produce_no_pairs() {
    let empty = Snapshot::empty("nothing");
    assert!(match_entities(&empty, &empty).is_empty());

    let a = version_one();
    let pairs = match_entities(&a, &empty);
    assert_eq!(pairs.len(), a.len());
    assert!(pairs.iter().all(|p| p.new.is_none()));
}
