//! Fixpoint computation of structurally equivalent type names.
//!
//! Every unordered pair of traced types `(a, b)` with `a < b` by name is
//! compared on each pass: pairs already in one class are skipped, pairs that
//! [`quick_compare`] rules out are skipped without canonicalizing, and the
//! remaining pairs are merged when their canonical representations match.
//! Passes repeat until one pass produces no merge.

use shapecheck_common::limits::MAX_NODES_IN_CANONICAL_REPR;
use tracing::{debug, trace};

use crate::canonicalize::{CanonicalStats, Canonicalizer};
use crate::table::TypeTable;
use crate::types::TypeId;
use crate::union_find::{EquivalenceTable, UnionFind};

/// Cheap pre-filter: `false` means the canonical forms certainly differ.
///
/// Types without fields (no shape, or an empty one) only match each other;
/// otherwise both kinds and the sorted field names must agree.
pub fn quick_compare(table: &TypeTable, a: TypeId, b: TypeId) -> bool {
    if table.name(a).kind().label() != table.name(b).kind().label() {
        return false;
    }
    let shape_a = table.shape(a).filter(|shape| !shape.is_empty());
    let shape_b = table.shape(b).filter(|shape| !shape.is_empty());
    match (shape_a, shape_b) {
        (None, None) => true,
        (Some(shape_a), Some(shape_b)) => {
            shape_a.len() == shape_b.len()
                && shape_a.sorted_field_names() == shape_b.sorted_field_names()
        }
        _ => false,
    }
}

/// Counters for one equivalence computation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EquivalenceStats {
    pub passes: usize,
    pub merges: usize,
    pub quick_rejections: usize,
    pub canonical: CanonicalStats,
}

pub struct EquivalenceSolver<'a> {
    table: &'a TypeTable,
    canonicalizer: Canonicalizer<'a>,
    stats: EquivalenceStats,
}

impl<'a> EquivalenceSolver<'a> {
    pub fn new(table: &'a TypeTable) -> Self {
        Self::with_max_nodes(table, MAX_NODES_IN_CANONICAL_REPR)
    }

    pub fn with_max_nodes(table: &'a TypeTable, max_nodes: usize) -> Self {
        EquivalenceSolver {
            table,
            canonicalizer: Canonicalizer::with_max_nodes(table, max_nodes),
            stats: EquivalenceStats::default(),
        }
    }

    pub fn solve(&mut self) -> EquivalenceTable {
        let names = self.table.sorted_type_ids();
        let mut classes = UnionFind::new(self.table);

        loop {
            self.stats.passes += 1;
            let mut changed = false;
            for (i, &a) in names.iter().enumerate() {
                for &b in &names[i + 1..] {
                    if classes.same_class(a, b) {
                        continue;
                    }
                    if !quick_compare(self.table, a, b) {
                        self.stats.quick_rejections += 1;
                        continue;
                    }
                    if self.canonicalizer.canonicalize(a) == self.canonicalizer.canonicalize(b) {
                        trace!(
                            a = self.table.resolve(a),
                            b = self.table.resolve(b),
                            "merging structurally equivalent types"
                        );
                        classes.union(a, b);
                        self.stats.merges += 1;
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }

        self.stats.canonical = self.canonicalizer.stats();
        let equivalence = classes.freeze(self.table);
        debug!(
            types = names.len(),
            classes = equivalence.roots().len(),
            passes = self.stats.passes,
            merges = self.stats.merges,
            "computed type equivalence"
        );
        equivalence
    }

    pub fn stats(&self) -> EquivalenceStats {
        self.stats
    }
}

/// Equivalence classes of all traced types, with the default node budget.
pub fn compute_equivalence(table: &TypeTable) -> EquivalenceTable {
    EquivalenceSolver::new(table).solve()
}

#[cfg(test)]
#[path = "tests/equivalence_tests.rs"]
mod tests;
