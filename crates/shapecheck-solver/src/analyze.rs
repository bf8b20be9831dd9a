//! Warning generation over the equivalence-class representatives.
//!
//! For each root type and each of its fields, the observed types are scanned
//! pairwise (sorted by name). The first pair with different roots that is
//! neither structurally related nor a pair of possibly compatible closures
//! turns the field into an inconsistency warning; at most one warning is
//! produced per (type, field). Fields named `undefined` record reads of
//! missing fields and produce an undefined-field warning instead.

use rustc_hash::FxHashSet;
use shapecheck_common::LocationId;
use tracing::{debug, trace};

use crate::subtype::SubtypeChecker;
use crate::table::{FxIndexMap, FxIndexSet, LocationSet, TypeSet, TypeTable, UNDEFINED_FIELD};
use crate::types::TypeId;
use crate::union_find::EquivalenceTable;
use crate::warnings::{
    InconsistentTypeWarning, ObservedType, TypeDescription, UndefinedFieldWarning, Warning,
    WarningIds,
};

pub struct WarningGenerator<'a> {
    table: &'a TypeTable,
    equivalence: &'a EquivalenceTable,
    subtypes: SubtypeChecker<'a>,
}

impl<'a> WarningGenerator<'a> {
    pub fn new(table: &'a TypeTable, equivalence: &'a EquivalenceTable) -> Self {
        WarningGenerator {
            table,
            equivalence,
            subtypes: SubtypeChecker::new(table, equivalence),
        }
    }

    /// All warnings for the table, roots in enumeration order.
    pub fn generate(&self, ids: &mut WarningIds) -> Vec<Warning> {
        let mut warnings = Vec::new();
        let mut done = FxHashSet::default();

        for ty in self.table.type_ids() {
            let root = self.equivalence.find(ty);
            if !done.insert(root) {
                continue;
            }
            let Some(shape) = self.table.shape(root) else {
                continue;
            };

            if let Some(types) = shape.get(UNDEFINED_FIELD) {
                warnings.push(Warning::UndefinedField(UndefinedFieldWarning {
                    id: ids.next_id(),
                    owner: TypeDescription::of(self.table, root),
                    locations: merged_locations(types.iter().map(|(_, sites)| sites)),
                    highlighted: highlight(root),
                }));
            }

            for (field, types) in shape.iter() {
                if field == UNDEFINED_FIELD || types.len() < 2 {
                    continue;
                }
                if let Some((a, b)) = self.first_conflict(types) {
                    trace!(
                        owner = self.table.resolve(root),
                        field,
                        a = self.table.resolve(a),
                        b = self.table.resolve(b),
                        "inconsistent field types"
                    );
                    warnings.push(Warning::Inconsistent(InconsistentTypeWarning {
                        id: ids.next_id(),
                        owner: TypeDescription::of(self.table, root),
                        field: field.into(),
                        observed: self.observed_types(types),
                        type_diff: None,
                        highlighted: highlight(root),
                        suppressed_by_belief: false,
                    }));
                }
            }
        }

        debug!(
            roots = done.len(),
            warnings = warnings.len(),
            "generated type warnings"
        );
        warnings
    }

    /// First pair of the field's types, sorted by name, that conflicts.
    fn first_conflict(&self, types: &TypeSet) -> Option<(TypeId, TypeId)> {
        let mut candidates: Vec<TypeId> = types
            .types()
            .filter(|&ty| self.is_comparable(ty))
            .collect();
        candidates.sort_unstable_by(|a, b| self.table.resolve(*a).cmp(self.table.resolve(*b)));

        for (i, &a) in candidates.iter().enumerate() {
            for &b in &candidates[i + 1..] {
                if self.equivalence.same_class(a, b) {
                    continue;
                }
                if self.subtypes.structural_subtypes(a, b)
                    || self.subtypes.potentially_compatible_functions(a, b)
                {
                    continue;
                }
                return Some((a, b));
            }
        }
        None
    }

    /// Traced types, primitives and closures take part in conflict scanning.
    ///
    /// Other untraced names carry no shape information to compare.
    fn is_comparable(&self, ty: TypeId) -> bool {
        ty.is_primitive() || self.table.has_shape(ty) || self.table.name(ty).kind().is_function()
    }

    /// One entry per distinct root, in name order, with merged locations.
    fn observed_types(&self, types: &TypeSet) -> Vec<ObservedType> {
        let mut members: Vec<TypeId> = types.types().collect();
        members.sort_unstable_by(|a, b| self.table.resolve(*a).cmp(self.table.resolve(*b)));

        let mut by_root: FxIndexMap<TypeId, (TypeId, Vec<&LocationSet>)> = FxIndexMap::default();
        for ty in members {
            let sites = types.locations(ty);
            let entry = by_root
                .entry(self.equivalence.find(ty))
                .or_insert_with(|| (ty, Vec::new()));
            entry.1.extend(sites);
        }

        by_root
            .into_values()
            .map(|(first, sites)| ObservedType {
                description: TypeDescription::of(self.table, first),
                locations: merged_locations(sites.into_iter()),
            })
            .collect()
    }
}

fn highlight(ty: TypeId) -> FxIndexSet<TypeId> {
    FxIndexSet::from_iter([ty])
}

fn merged_locations<'s>(sets: impl Iterator<Item = &'s LocationSet>) -> Vec<LocationId> {
    let mut merged = LocationSet::default();
    for set in sets {
        merged.extend(set.iter().cloned());
    }
    merged.into_iter().collect()
}

#[cfg(test)]
#[path = "tests/analyze_tests.rs"]
mod tests;
