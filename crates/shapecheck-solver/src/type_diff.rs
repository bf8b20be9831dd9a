//! Field-access paths on which conflicting types actually differ.
//!
//! Each observed type is expanded into a map from access path (`""`, `.a`,
//! `.a.b`, ...) to the leaf type reached along it. A path leads to a leaf when
//! the type reached has no fields, or when it is a type already visited on the
//! way down from the same observed type. Paths that resolve to the same leaf
//! in every observed type are common; everything else makes up the diff.

use rustc_hash::FxHashSet;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use crate::table::{FxIndexMap, TypeTable};
use crate::types::TypeId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeDiff {
    /// Path → leaf type shared by all observed types.
    pub common: BTreeMap<String, TypeId>,
    /// Path → every leaf type seen there, for paths that are not common.
    pub diff: BTreeMap<String, BTreeSet<TypeId>>,
}

impl TypeDiff {
    pub fn is_empty(&self) -> bool {
        self.diff.is_empty()
    }
}

struct WorkItem {
    prefix: String,
    visited: FxHashSet<TypeId>,
    ty: TypeId,
}

/// Every access path reachable from `root` and its leaf type.
///
/// Returns `None` once more than `max_work_items` items were processed.
pub fn access_paths(
    table: &TypeTable,
    root: TypeId,
    max_work_items: usize,
) -> Option<FxIndexMap<String, TypeId>> {
    let mut paths = FxIndexMap::default();
    let mut worklist = vec![WorkItem {
        prefix: String::new(),
        visited: FxHashSet::from_iter([root]),
        ty: root,
    }];
    let mut processed = 0usize;

    while let Some(item) = worklist.pop() {
        processed += 1;
        if processed > max_work_items {
            return None;
        }
        let Some(shape) = table.shape(item.ty).filter(|shape| !shape.is_empty()) else {
            paths.insert(item.prefix, item.ty);
            continue;
        };
        for (field, types) in shape.iter() {
            let prefix = format!("{}.{}", item.prefix, field);
            for ty in types.types() {
                if item.visited.contains(&ty) {
                    paths.insert(prefix.clone(), ty);
                } else {
                    let mut visited = item.visited.clone();
                    visited.insert(ty);
                    worklist.push(WorkItem {
                        prefix: prefix.clone(),
                        visited,
                        ty,
                    });
                }
            }
        }
    }
    Some(paths)
}

/// Diff of the given observed types, or `None` when there is nothing to
/// compare (fewer than two types) or the expansion exceeds its budget.
pub fn compute_diff(
    table: &TypeTable,
    observed: &[TypeId],
    max_work_items: usize,
) -> Option<TypeDiff> {
    let mut distinct: Vec<TypeId> = Vec::with_capacity(observed.len());
    for &ty in observed {
        if !distinct.contains(&ty) {
            distinct.push(ty);
        }
    }
    if distinct.len() < 2 {
        return None;
    }

    let mut expanded = Vec::with_capacity(distinct.len());
    for &ty in &distinct {
        match access_paths(table, ty, max_work_items) {
            Some(paths) => expanded.push(paths),
            None => {
                warn!(
                    ty = table.resolve(ty),
                    max_work_items, "type diff skipped: expansion exceeds work budget"
                );
                return None;
            }
        }
    }

    let mut diff = TypeDiff::default();
    let (first, others) = expanded.split_first()?;
    for (path, leaf) in first {
        if others.iter().all(|paths| paths.get(path) == Some(leaf)) {
            diff.common.insert(path.clone(), *leaf);
        }
    }
    for paths in &expanded {
        for (path, leaf) in paths {
            if !diff.common.contains_key(path) {
                diff.diff.entry(path.clone()).or_default().insert(*leaf);
            }
        }
    }

    debug!(
        types = distinct.len(),
        common = diff.common.len(),
        differing = diff.diff.len(),
        "computed type diff"
    );
    Some(diff)
}

#[cfg(test)]
#[path = "tests/type_diff_tests.rs"]
mod tests;
