//! Opaque source locations.
//!
//! The tracer records *where* a field was observed with a given type as an
//! instruction id (IID). Ids stay opaque during analysis and are only turned
//! into human-readable text when a warning is rendered, through a
//! [`LocationResolver`].

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// An opaque instruction/location identifier.
///
/// Cheap to clone; ordering and equality are on the raw id text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(Arc<str>);

impl LocationId {
    pub fn new(raw: &str) -> Self {
        LocationId(Arc::from(raw))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LocationId {
    fn from(raw: &str) -> Self {
        LocationId::new(raw)
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves location ids to source positions for reporting.
///
/// Implementations are only consulted while rendering, never during analysis.
pub trait LocationResolver {
    fn resolve<'a>(&'a self, id: &'a LocationId) -> Cow<'a, str>;
}

/// Resolver that prints ids as they are.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnresolvedLocations;

impl LocationResolver for UnresolvedLocations {
    fn resolve<'a>(&'a self, id: &'a LocationId) -> Cow<'a, str> {
        Cow::Borrowed(id.as_str())
    }
}

/// Resolver backed by the tracer's `iidToLocation` table.
///
/// Unknown ids fall back to `<unknown location IID>`.
#[derive(Clone, Debug, Default)]
pub struct LocationMap {
    locations: FxHashMap<LocationId, String>,
}

impl LocationMap {
    pub fn new() -> Self {
        LocationMap {
            locations: FxHashMap::default(),
        }
    }

    pub fn insert(&mut self, id: LocationId, location: impl Into<String>) {
        self.locations.insert(id, location.into());
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for LocationMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = LocationMap::new();
        for (id, location) in iter {
            map.insert(LocationId::new(id.as_ref()), location);
        }
        map
    }
}

impl LocationResolver for LocationMap {
    fn resolve<'a>(&'a self, id: &'a LocationId) -> Cow<'a, str> {
        match self.locations.get(id) {
            Some(location) => Cow::Borrowed(location.as_str()),
            None => Cow::Owned(format!("<unknown location {id}>")),
        }
    }
}
