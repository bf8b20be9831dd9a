//! Equivalence classes of type names.
//!
//! Classes are maintained with `ena`'s union-find. Each class carries the
//! lexicographically smallest name among its members as its value, so the
//! representative of a class does not depend on the order in which unions
//! happen: when two classes merge, the smaller of their two roots survives.

use ena::unify::{InPlaceUnificationTable, NoError, UnifyKey, UnifyValue};
use std::sync::Arc;

use crate::table::{FxIndexSet, TypeTable};
use crate::types::TypeId;

/// Union-find key; one per interned type name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct ClassKey(u32);

/// Representative of an equivalence class.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ClassRoot {
    id: TypeId,
    name: Arc<str>,
}

impl UnifyKey for ClassKey {
    type Value = ClassRoot;

    fn index(&self) -> u32 {
        self.0
    }

    fn from_index(u: u32) -> Self {
        ClassKey(u)
    }

    fn tag() -> &'static str {
        "ClassKey"
    }
}

impl UnifyValue for ClassRoot {
    type Error = NoError;

    fn unify_values(a: &Self, b: &Self) -> Result<Self, Self::Error> {
        if a.name <= b.name {
            Ok(a.clone())
        } else {
            Ok(b.clone())
        }
    }
}

/// Mutable union-find over all names interned in a [`TypeTable`].
pub struct UnionFind {
    table: InPlaceUnificationTable<ClassKey>,
}

impl UnionFind {
    /// Every interned name starts as its own root.
    pub fn new(types: &TypeTable) -> Self {
        let mut table = InPlaceUnificationTable::<ClassKey>::new();
        for id in types.interner().ids() {
            let key = table.new_key(ClassRoot {
                id,
                name: types.name(id).text().clone(),
            });
            debug_assert_eq!(key.0, id.0);
        }
        UnionFind { table }
    }

    /// Representative of the class containing `ty`.
    pub fn find(&mut self, ty: TypeId) -> TypeId {
        self.table.probe_value(ClassKey(ty.0)).id
    }

    pub fn same_class(&mut self, a: TypeId, b: TypeId) -> bool {
        self.table.unioned(ClassKey(a.0), ClassKey(b.0))
    }

    /// Merge the classes of `a` and `b`. Returns `false` if they already were one.
    pub fn union(&mut self, a: TypeId, b: TypeId) -> bool {
        if self.same_class(a, b) {
            return false;
        }
        self.table.union(ClassKey(a.0), ClassKey(b.0));
        true
    }

    /// Snapshot the classes into an immutable [`EquivalenceTable`].
    pub fn freeze(mut self, types: &TypeTable) -> EquivalenceTable {
        let root_of: Vec<TypeId> = types.interner().ids().map(|id| self.find(id)).collect();
        let roots = types
            .type_ids()
            .filter(|id| root_of[id.index()] == *id)
            .collect();
        EquivalenceTable { root_of, roots }
    }
}

/// Frozen result of the equivalence computation.
///
/// Maps every interned type to the root of its class. A type maps to itself
/// iff it is a root; the primitives are always roots of their own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EquivalenceTable {
    root_of: Vec<TypeId>,
    /// Traced types (those with a field shape) that are class roots.
    roots: FxIndexSet<TypeId>,
}

impl EquivalenceTable {
    #[inline]
    pub fn find(&self, ty: TypeId) -> TypeId {
        self.root_of[ty.index()]
    }

    #[inline]
    pub fn same_class(&self, a: TypeId, b: TypeId) -> bool {
        self.find(a) == self.find(b)
    }

    #[inline]
    pub fn is_root(&self, ty: TypeId) -> bool {
        self.find(ty) == ty
    }

    pub fn roots(&self) -> &FxIndexSet<TypeId> {
        &self.roots
    }

    /// Members of the class rooted at `root`, in id order.
    pub fn members(&self, root: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        self.root_of
            .iter()
            .enumerate()
            .filter(move |(_, r)| **r == root)
            .map(|(index, _)| TypeId(index as u32))
    }

    /// Number of interned types covered by the table.
    pub fn len(&self) -> usize {
        self.root_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root_of.is_empty()
    }
}
