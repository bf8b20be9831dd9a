//! Structural sub-typing between traced types.
//!
//! A type is a structural supertype of another when every one of its fields
//! exists in the other type and, field by field, all observed types of both
//! sides fall into a single equivalence class. The check is used to suppress
//! inconsistency warnings for fields that were observed with a type and a
//! consistent refinement of it.

use crate::table::{TypeSet, TypeTable};
use crate::types::TypeId;
use crate::union_find::EquivalenceTable;

/// Read-only subtype queries over a solved table.
pub struct SubtypeChecker<'a> {
    table: &'a TypeTable,
    equivalence: &'a EquivalenceTable,
}

impl<'a> SubtypeChecker<'a> {
    pub fn new(table: &'a TypeTable, equivalence: &'a EquivalenceTable) -> Self {
        SubtypeChecker { table, equivalence }
    }

    /// Whether `super_ty` is a structural supertype of (or the same shape as) `sub_ty`.
    ///
    /// Types without a field shape are never structurally related.
    pub fn is_subtype_of(&self, super_ty: TypeId, sub_ty: TypeId) -> bool {
        let (Some(super_shape), Some(sub_shape)) =
            (self.table.shape(super_ty), self.table.shape(sub_ty))
        else {
            return false;
        };
        if super_shape.len() > sub_shape.len() {
            return false;
        }
        super_shape.iter().all(|(field, super_types)| {
            sub_shape
                .get(field)
                .is_some_and(|sub_types| self.have_single_root(super_types, sub_types))
        })
    }

    /// Whether `a` and `b` are structurally related in either direction.
    pub fn structural_subtypes(&self, a: TypeId, b: TypeId) -> bool {
        self.is_subtype_of(a, b) || self.is_subtype_of(b, a)
    }

    /// Whether both are closures and at least one signature was never traced.
    ///
    /// Unknown signatures are assumed compatible rather than conflicting.
    pub fn potentially_compatible_functions(&self, a: TypeId, b: TypeId) -> bool {
        self.table.name(a).kind().is_function()
            && self.table.name(b).kind().is_function()
            && (!self.table.has_shape(a) || !self.table.has_shape(b))
    }

    /// All types of both sets resolve to one equivalence class.
    fn have_single_root(&self, left: &TypeSet, right: &TypeSet) -> bool {
        let mut roots = left.types().chain(right.types()).map(|ty| self.equivalence.find(ty));
        match roots.next() {
            Some(first) => roots.all(|root| root == first),
            None => true,
        }
    }
}

#[cfg(test)]
#[path = "tests/subtype_tests.rs"]
mod tests;
