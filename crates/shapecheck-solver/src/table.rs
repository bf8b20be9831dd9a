//! The frozen input of an analysis run.
//!
//! A [`TypeTable`] maps each traced type to its [`FieldShape`]: for every
//! field name, the set of types observed at that field ([`TypeSet`]) and for
//! each of those types the locations where the combination was seen.
//! Types without an entry are primitive (they have no fields).
//!
//! All maps keep insertion order, which is the natural enumeration order of
//! the tracer's output.

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;
use shapecheck_common::LocationId;
use std::fmt;
use std::sync::Arc;

use crate::intern::TypeInterner;
use crate::types::{TypeId, TypeName, TypeNameError};

pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
pub type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

/// Locations at which one (field, type) combination was observed.
pub type LocationSet = FxIndexSet<LocationId>;

/// Field name recorded when a type was read with a missing field.
pub const UNDEFINED_FIELD: &str = "undefined";

/// Types observed at one field, each with its observation sites.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeSet {
    entries: FxIndexMap<TypeId, LocationSet>,
}

impl TypeSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, ty: TypeId) -> bool {
        self.entries.contains_key(&ty)
    }

    /// Observed types in enumeration order.
    pub fn types(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &LocationSet)> + '_ {
        self.entries.iter().map(|(ty, locations)| (*ty, locations))
    }

    pub fn locations(&self, ty: TypeId) -> Option<&LocationSet> {
        self.entries.get(&ty)
    }

    fn record(&mut self, ty: TypeId, location: Option<LocationId>) {
        let locations = self.entries.entry(ty).or_default();
        if let Some(location) = location {
            locations.insert(location);
        }
    }
}

/// Field name → observed types for one traced type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldShape {
    fields: FxIndexMap<Arc<str>, TypeSet>,
}

impl FieldShape {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&TypeSet> {
        self.fields.get(field)
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Fields in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeSet)> + '_ {
        self.fields.iter().map(|(name, types)| (&**name, types))
    }

    /// Field names in lexicographic order.
    pub fn sorted_field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(|name| &**name).collect();
        names.sort_unstable();
        names
    }
}

/// Invariant violations in a traced type table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableError {
    InvalidTypeName { name: String, error: TypeNameError },
    /// One of the five primitive names was given a field shape.
    PrimitiveWithShape(String),
    /// A field was recorded without any observed type.
    EmptyTypeSet { owner: String, field: String },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::InvalidTypeName { error, .. } => write!(f, "{error}"),
            TableError::PrimitiveWithShape(name) => {
                write!(f, "primitive type '{name}' must not have fields")
            }
            TableError::EmptyTypeSet { owner, field } => {
                write!(f, "field '{field}' of '{owner}' has no observed types")
            }
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TableError::InvalidTypeName { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Type name → field shape, plus the interner owning every name.
#[derive(Clone, Debug, Default)]
pub struct TypeTable {
    interner: TypeInterner,
    shapes: FxIndexMap<TypeId, FieldShape>,
}

impl TypeTable {
    pub fn builder() -> TypeTableBuilder {
        TypeTableBuilder::default()
    }

    pub fn interner(&self) -> &TypeInterner {
        &self.interner
    }

    #[inline]
    pub fn name(&self, id: TypeId) -> &TypeName {
        self.interner.name(id)
    }

    #[inline]
    pub fn resolve(&self, id: TypeId) -> &str {
        self.interner.resolve(id)
    }

    /// Id of an interned name, if the table mentions it anywhere.
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.interner.get(name)
    }

    #[inline]
    pub fn shape(&self, id: TypeId) -> Option<&FieldShape> {
        self.shapes.get(&id)
    }

    #[inline]
    pub fn has_shape(&self, id: TypeId) -> bool {
        self.shapes.contains_key(&id)
    }

    /// Types with a field shape, in enumeration order.
    pub fn type_ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.shapes.keys().copied()
    }

    /// Types with a field shape, sorted by name.
    pub fn sorted_type_ids(&self) -> Vec<TypeId> {
        let mut ids: Vec<TypeId> = self.type_ids().collect();
        ids.sort_unstable_by(|a, b| self.resolve(*a).cmp(self.resolve(*b)));
        ids
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &FieldShape)> + '_ {
        self.shapes.iter().map(|(id, shape)| (*id, shape))
    }

    /// Number of types with a field shape.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Incremental construction of a [`TypeTable`].
#[derive(Clone, Debug, Default)]
pub struct TypeTableBuilder {
    table: TypeTable,
}

impl TypeTableBuilder {
    pub fn intern(&mut self, name: &str) -> Result<TypeId, TableError> {
        self.table
            .interner
            .intern(name)
            .map_err(|error| TableError::InvalidTypeName {
                name: name.to_string(),
                error,
            })
    }

    /// Register a traced type, with no fields yet.
    pub fn declare(&mut self, owner: &str) -> Result<TypeId, TableError> {
        let id = self.intern(owner)?;
        if id.is_primitive() {
            return Err(TableError::PrimitiveWithShape(owner.to_string()));
        }
        self.table.shapes.entry(id).or_default();
        Ok(id)
    }

    /// Record that `field` of `owner` held a value of type `ty` at `locations`.
    pub fn observe(
        &mut self,
        owner: &str,
        field: &str,
        ty: &str,
        locations: &[&str],
    ) -> Result<&mut Self, TableError> {
        let owner_id = self.declare(owner)?;
        let ty_id = self.intern(ty)?;
        let types = self
            .table
            .shapes
            .entry(owner_id)
            .or_default()
            .fields
            .entry(Arc::from(field))
            .or_default();
        if locations.is_empty() {
            types.record(ty_id, None);
        }
        for location in locations {
            types.record(ty_id, Some(LocationId::new(location)));
        }
        Ok(self)
    }

    /// Record an empty type set for a field; rejected by [`build`](Self::build).
    pub(crate) fn declare_field(&mut self, owner: &str, field: &str) -> Result<(), TableError> {
        let owner_id = self.declare(owner)?;
        self.table
            .shapes
            .entry(owner_id)
            .or_default()
            .fields
            .entry(Arc::from(field))
            .or_default();
        Ok(())
    }

    pub fn build(self) -> Result<TypeTable, TableError> {
        for (owner, shape) in &self.table.shapes {
            for (field, types) in shape.iter() {
                if types.is_empty() {
                    return Err(TableError::EmptyTypeSet {
                        owner: self.table.resolve(*owner).to_string(),
                        field: field.to_string(),
                    });
                }
            }
        }
        Ok(self.table)
    }
}

#[cfg(test)]
#[path = "tests/table_tests.rs"]
mod tests;
