//! Compatibility diff engine.
//!
//! Compares two snapshots and produces an ordered list of classified
//! [`ChangeRecord`]s.
//!
//! ## Entry point
//!
//! ```ignore
//! use apiscan_core::diff::compare;
//! use apiscan_core::policy::CompatibilityPolicy;
//!
//! let changes = compare(&old_snapshot, &new_snapshot, &CompatibilityPolicy::default());
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical output, in signature-key order.
//! - **Totality**: every entity of either snapshot is accounted for.
//! - **No failure mode**: well-formed snapshots always compare.

pub mod engine;
pub mod model;
pub mod relation;

pub use engine::{compare, effective_visibility, DiffContext};
pub use model::{AttributeDelta, ChangeKind, ChangeRecord, DeltaKind, Severity};
pub use relation::TypeRelation;
