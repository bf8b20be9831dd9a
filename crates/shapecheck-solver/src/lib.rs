//! Structural Type-Equivalence Engine
//!
//! Analyses the object shapes a runtime tracer observed (type name → field
//! name → observed field types) and reports fields that were genuinely seen
//! with inconsistent types.
//!
//! - **Equivalence**: type names with identical structure up to renaming are
//!   merged into classes (`ena` union-find over canonical representations)
//! - **Subtyping**: a field seen with a type and a consistent refinement of it
//!   is not reported
//! - **Type diff**: conflicting types are explained by the access paths on
//!   which they differ
//!
//! The entry points are [`analyze_snapshot`] and [`analyze_types`].
pub mod analyze;
pub mod beliefs;
pub mod canonicalize;
pub mod equivalence;
mod format;
mod intern;
pub mod pipeline;
pub mod snapshot;
pub mod subtype;
pub mod table;
pub mod type_diff;
pub mod types;
pub mod union_find;
pub mod warnings;

pub use analyze::WarningGenerator;
pub use beliefs::Beliefs;
pub use canonicalize::{Canonicalizer, canonical_representation};
pub use equivalence::{EquivalenceSolver, compute_equivalence, quick_compare};
pub use format::{DescriptionDisplay, WarningDisplay, diff_lines};
pub use intern::TypeInterner;
pub use pipeline::{
    AnalysisOptions, AnalysisReport, KeepAll, TypeGraph, VisualizationSink, WarningFilter,
    analyze_snapshot, analyze_types,
};
pub use snapshot::EngineSnapshot;
pub use subtype::SubtypeChecker;
pub use table::{FieldShape, TableError, TypeSet, TypeTable, TypeTableBuilder};
pub use type_diff::{TypeDiff, compute_diff};
pub use types::{TypeId, TypeKind, TypeName, TypeNameError};
pub use union_find::{EquivalenceTable, UnionFind};
pub use warnings::{
    InconsistentTypeWarning, ObservedType, Origin, TypeDescription, UndefinedFieldWarning, Warning,
    WarningId, WarningIds,
};

#[cfg(test)]
#[path = "../tests/testable_properties.rs"]
mod testable_properties;

#[cfg(test)]
#[path = "../tests/belief_tests.rs"]
mod belief_tests;

#[cfg(test)]
#[path = "../tests/snapshot_analysis_tests.rs"]
mod snapshot_analysis_tests;
