//! Subtype knowledge used by the diff engine.
//!
//! Combines a small table of platform relations with the supertypes declared
//! in the snapshots being compared. `java.lang.Object` is the top type.

use crate::model::{TypeRef, OBJECT};
use crate::snapshot::Snapshot;
use std::collections::{BTreeMap, BTreeSet};

/// Direct supertypes of common `java.lang`, `java.util` and `java.io` types.
const PLATFORM_EDGES: &[(&str, &[&str])] = &[
    ("java.lang.Iterable", &[]),
    ("java.lang.CharSequence", &[]),
    ("java.lang.Comparable", &[]),
    ("java.lang.Number", &["java.io.Serializable"]),
    ("java.io.Serializable", &[]),
    ("java.lang.AutoCloseable", &[]),
    ("java.io.Closeable", &["java.lang.AutoCloseable"]),
    ("java.lang.Runnable", &[]),
    ("java.lang.Cloneable", &[]),
    (
        "java.lang.String",
        &["java.io.Serializable", "java.lang.Comparable", "java.lang.CharSequence"],
    ),
    ("java.lang.StringBuilder", &["java.lang.CharSequence", "java.io.Serializable"]),
    ("java.lang.StringBuffer", &["java.lang.CharSequence", "java.io.Serializable"]),
    ("java.lang.Integer", &["java.lang.Number", "java.lang.Comparable"]),
    ("java.lang.Long", &["java.lang.Number", "java.lang.Comparable"]),
    ("java.lang.Short", &["java.lang.Number", "java.lang.Comparable"]),
    ("java.lang.Byte", &["java.lang.Number", "java.lang.Comparable"]),
    ("java.lang.Double", &["java.lang.Number", "java.lang.Comparable"]),
    ("java.lang.Float", &["java.lang.Number", "java.lang.Comparable"]),
    ("java.lang.Boolean", &["java.io.Serializable", "java.lang.Comparable"]),
    ("java.lang.Character", &["java.io.Serializable", "java.lang.Comparable"]),
    ("java.lang.Throwable", &["java.io.Serializable"]),
    ("java.lang.Exception", &["java.lang.Throwable"]),
    ("java.lang.Error", &["java.lang.Throwable"]),
    ("java.lang.RuntimeException", &["java.lang.Exception"]),
    ("java.lang.IllegalArgumentException", &["java.lang.RuntimeException"]),
    ("java.lang.IllegalStateException", &["java.lang.RuntimeException"]),
    ("java.lang.UnsupportedOperationException", &["java.lang.RuntimeException"]),
    ("java.lang.NullPointerException", &["java.lang.RuntimeException"]),
    ("java.io.IOException", &["java.lang.Exception"]),
    ("java.io.UncheckedIOException", &["java.lang.RuntimeException"]),
    ("java.io.FileNotFoundException", &["java.io.IOException"]),
    ("java.io.InputStream", &["java.io.Closeable"]),
    ("java.io.OutputStream", &["java.io.Closeable", "java.io.Flushable"]),
    ("java.io.Flushable", &[]),
    ("java.io.Reader", &["java.lang.Readable", "java.io.Closeable"]),
    ("java.lang.Readable", &[]),
    ("java.io.Writer", &["java.lang.Appendable", "java.io.Closeable", "java.io.Flushable"]),
    ("java.lang.Appendable", &[]),
    ("java.util.Collection", &["java.lang.Iterable"]),
    ("java.util.List", &["java.util.Collection"]),
    ("java.util.Set", &["java.util.Collection"]),
    ("java.util.SortedSet", &["java.util.Set"]),
    ("java.util.NavigableSet", &["java.util.SortedSet"]),
    ("java.util.Queue", &["java.util.Collection"]),
    ("java.util.Deque", &["java.util.Queue"]),
    ("java.util.Map", &[]),
    ("java.util.SortedMap", &["java.util.Map"]),
    ("java.util.NavigableMap", &["java.util.SortedMap"]),
    ("java.util.concurrent.ConcurrentMap", &["java.util.Map"]),
    ("java.util.RandomAccess", &[]),
    ("java.util.AbstractCollection", &["java.util.Collection"]),
    ("java.util.AbstractList", &["java.util.AbstractCollection", "java.util.List"]),
    (
        "java.util.ArrayList",
        &[
            "java.util.AbstractList",
            "java.util.List",
            "java.util.RandomAccess",
            "java.lang.Cloneable",
            "java.io.Serializable",
        ],
    ),
    (
        "java.util.LinkedList",
        &[
            "java.util.AbstractList",
            "java.util.List",
            "java.util.Deque",
            "java.lang.Cloneable",
            "java.io.Serializable",
        ],
    ),
    ("java.util.ArrayDeque", &["java.util.AbstractCollection", "java.util.Deque"]),
    ("java.util.AbstractSet", &["java.util.AbstractCollection", "java.util.Set"]),
    ("java.util.HashSet", &["java.util.AbstractSet", "java.util.Set"]),
    ("java.util.LinkedHashSet", &["java.util.HashSet", "java.util.Set"]),
    ("java.util.TreeSet", &["java.util.AbstractSet", "java.util.NavigableSet"]),
    ("java.util.AbstractMap", &["java.util.Map"]),
    ("java.util.HashMap", &["java.util.AbstractMap", "java.util.Map"]),
    ("java.util.LinkedHashMap", &["java.util.HashMap", "java.util.Map"]),
    ("java.util.TreeMap", &["java.util.AbstractMap", "java.util.NavigableMap"]),
    (
        "java.util.concurrent.ConcurrentHashMap",
        &["java.util.AbstractMap", "java.util.concurrent.ConcurrentMap"],
    ),
    ("java.util.Optional", &[]),
];

/// Direct-supertype graph over qualified class names.
#[derive(Debug, Clone, Default)]
pub struct TypeHierarchy {
    parents: BTreeMap<String, BTreeSet<String>>,
}

impl TypeHierarchy {
    /// Hierarchy with the platform table only.
    pub fn platform() -> Self {
        let mut hierarchy = Self::default();
        for (sub, supers) in PLATFORM_EDGES {
            hierarchy.declare(sub, supers.iter().map(|s| s.to_string()));
        }
        hierarchy
    }

    /// Platform table plus every supertype declared in `snapshot`.
    pub fn for_snapshot(snapshot: &Snapshot) -> Self {
        let mut hierarchy = Self::platform();
        for entity in snapshot.entities().filter(|e| e.kind.is_type()) {
            let supers = entity
                .supertypes
                .iter()
                .filter_map(TypeRef::class_name)
                .map(str::to_string);
            hierarchy.declare(&entity.key.qualified_name, supers);
        }
        hierarchy
    }

    /// Record `name` as a type with a fully known list of direct supertypes.
    ///
    /// Declaring the same name again merges the supertype lists.
    pub fn declare(&mut self, name: &str, supers: impl IntoIterator<Item = String>) {
        self.parents
            .entry(name.to_string())
            .or_default()
            .extend(supers.into_iter().filter(|s| s != OBJECT));
    }

    /// Whether the direct supertypes of `name` are known.
    pub fn knows(&self, name: &str) -> bool {
        name == OBJECT || self.parents.contains_key(name)
    }

    /// Whether every ancestor of `name` is known, so the absence of a path
    /// proves two types unrelated.
    pub fn is_closed(&self, name: &str) -> bool {
        self.ancestors(name).iter().all(|a| self.knows(a)) && self.knows(name)
    }

    /// Reflexive, transitive subtype test. Every class is a subtype of Object.
    pub fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        sub == sup || sup == OBJECT || self.ancestors(sub).contains(sup)
    }

    /// All transitive supertypes of `name` (excluding `name` and Object).
    pub fn ancestors(&self, name: &str) -> BTreeSet<String> {
        let mut seen = BTreeSet::new();
        let mut stack = vec![name.to_string()];
        while let Some(current) = stack.pop() {
            if let Some(supers) = self.parents.get(&current) {
                for s in supers {
                    if seen.insert(s.clone()) {
                        stack.push(s.clone());
                    }
                }
            }
        }
        seen.remove(name);
        seen
    }
}
