//! Decoding of the tracer's result document.
//!
//! The tracer writes one JSON object per program execution:
//!
//! ```json
//! {
//!   "typeNameToFieldTypes": {
//!     "object(12)": { "x": { "number": ["31"], "string": { "40": true } } }
//!   },
//!   "frameToBeliefs": { "frame(3)": { "x": ["number"] } },
//!   "iidToLocation": { "12": "app.js:3:9" }
//! }
//! ```
//!
//! Sets are accepted either as arrays or as objects whose keys are the
//! members, the latter being what older tracer versions emit.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use shapecheck_common::LocationMap;

use crate::beliefs::Beliefs;
use crate::table::{TableError, TypeTable};

/// A set of strings, accepting both `["a", "b"]` and `{"a": true, "b": true}`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameSet(pub Vec<String>);

impl NameSet {
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for NameSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum ListOrMap {
            List(Vec<String>),
            Map(IndexMap<String, serde_json::Value>),
        }

        match ListOrMap::deserialize(deserializer)? {
            ListOrMap::List(names) => Ok(NameSet(names)),
            ListOrMap::Map(map) => Ok(NameSet(map.into_keys().collect())),
        }
    }
}

/// Field name → observed type name → observation sites.
pub type RawFieldShape = IndexMap<String, IndexMap<String, NameSet>>;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSnapshot {
    #[serde(default)]
    pub type_name_to_field_types: IndexMap<String, RawFieldShape>,
    /// Frame or type name → variable/field name → believed type names.
    #[serde(default)]
    pub frame_to_beliefs: IndexMap<String, IndexMap<String, NameSet>>,
    #[serde(default)]
    pub iid_to_location: IndexMap<String, String>,
}

impl EngineSnapshot {
    pub fn from_json(json: &str) -> Result<EngineSnapshot, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Build the frozen type table, rejecting malformed names and shapes.
    pub fn to_table(&self) -> Result<TypeTable, TableError> {
        let mut builder = TypeTable::builder();
        for (owner, fields) in &self.type_name_to_field_types {
            builder.declare(owner)?;
            for (field, types) in fields {
                if types.is_empty() {
                    builder.declare_field(owner, field)?;
                }
                for (ty, locations) in types {
                    let locations: Vec<&str> = locations.iter().collect();
                    builder.observe(owner, field, ty, &locations)?;
                }
            }
        }
        builder.build()
    }

    /// Beliefs expressed against the names of `table`.
    pub fn beliefs(&self, table: &TypeTable) -> Beliefs {
        let mut beliefs = Beliefs::new();
        for (frame, fields) in &self.frame_to_beliefs {
            for (field, types) in fields {
                beliefs.believe(table, frame, field, types.iter());
            }
        }
        beliefs
    }

    pub fn locations(&self) -> LocationMap {
        self.iid_to_location.iter().collect()
    }
}

#[cfg(test)]
#[path = "tests/snapshot_tests.rs"]
mod tests;
