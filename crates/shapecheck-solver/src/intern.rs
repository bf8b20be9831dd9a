//! Type name interner.
//!
//! Every type name seen in a snapshot is decoded once and stored here; the
//! rest of the analysis passes around [`TypeId`]s. The five primitive names
//! are pre-interned at the fixed ids [`TypeId::NUMBER`] .. [`TypeId::NULL`].

use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::types::{TypeId, TypeName, TypeNameError, primitive_names};

#[derive(Clone, Debug)]
pub struct TypeInterner {
    /// Map from name text to id
    map: FxHashMap<Arc<str>, TypeId>,
    /// All interned names, indexed by id
    names: Vec<TypeName>,
}

impl TypeInterner {
    pub fn new() -> Self {
        let mut interner = TypeInterner {
            map: FxHashMap::default(),
            names: Vec::with_capacity(64),
        };
        for name in primitive_names() {
            // Primitive spellings always decode.
            if let Ok(parsed) = TypeName::parse(name) {
                interner.push(parsed);
            }
        }
        debug_assert_eq!(interner.names.len() as u32, TypeId::PRIMITIVE_COUNT);
        interner
    }

    /// Intern a type name, decoding it on first sight.
    pub fn intern(&mut self, name: &str) -> Result<TypeId, TypeNameError> {
        if let Some(&id) = self.map.get(name) {
            return Ok(id);
        }
        // `null` is an alias of `object(null)`.
        if name == "null" {
            return Ok(TypeId::NULL);
        }
        let parsed = TypeName::parse(name)?;
        Ok(self.push(parsed))
    }

    fn push(&mut self, name: TypeName) -> TypeId {
        let id = TypeId(self.names.len() as u32);
        self.map.insert(name.text().clone(), id);
        self.names.push(name);
        id
    }

    /// Look up an already interned name.
    pub fn get(&self, name: &str) -> Option<TypeId> {
        if name == "null" {
            return Some(TypeId::NULL);
        }
        self.map.get(name).copied()
    }

    #[inline]
    pub fn name(&self, id: TypeId) -> &TypeName {
        &self.names[id.index()]
    }

    #[inline]
    pub fn resolve(&self, id: TypeId) -> &str {
        self.names[id.index()].as_str()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        (0..self.names.len() as u32).map(TypeId)
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}
