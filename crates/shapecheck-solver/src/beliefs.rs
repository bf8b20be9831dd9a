//! Programmer-declared expectations used to suppress warnings.
//!
//! A belief states that a variable or field of a frame/type may legitimately
//! hold a given set of types. An inconsistency warning is suppressed when, after
//! discarding every believed type from its observed types, at most one type is
//! left.

use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use tracing::trace;

use crate::table::TypeTable;
use crate::types::TypeId;
use crate::warnings::Warning;

#[derive(Clone, Debug, Default)]
pub struct Beliefs {
    by_owner: FxHashMap<TypeId, FxHashMap<Arc<str>, FxHashSet<TypeId>>>,
}

impl Beliefs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `field` of `owner` may hold any of `names`.
    ///
    /// Names the table never mentions cannot be observed and are dropped, as
    /// are owners that are not part of the table.
    pub fn believe<'n>(
        &mut self,
        table: &TypeTable,
        owner: &str,
        field: &str,
        names: impl IntoIterator<Item = &'n str>,
    ) {
        let Some(owner_id) = table.lookup(owner) else {
            trace!(owner, "ignoring beliefs for unknown owner");
            return;
        };
        let believed = self
            .by_owner
            .entry(owner_id)
            .or_default()
            .entry(Arc::from(field))
            .or_default();
        believed.extend(names.into_iter().filter_map(|name| table.lookup(name)));
    }

    pub fn believed(&self, owner: TypeId, field: &str) -> Option<&FxHashSet<TypeId>> {
        self.by_owner.get(&owner)?.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.by_owner.is_empty()
    }

    /// Flag every inconsistency warning that the beliefs explain away.
    ///
    /// Returns the number of newly flagged warnings.
    pub fn mark_suppressed(&self, warnings: &mut [Warning]) -> usize {
        let mut marked = 0;
        for warning in warnings.iter_mut() {
            let Warning::Inconsistent(warning) = warning else {
                continue;
            };
            let Some(believed) = self.believed(warning.owner.ty(), &warning.field) else {
                continue;
            };
            let remaining = warning
                .observed
                .iter()
                .filter(|observed| !believed.contains(&observed.description.ty()))
                .count();
            if remaining <= 1 && !warning.suppressed_by_belief {
                warning.suppressed_by_belief = true;
                marked += 1;
            }
        }
        marked
    }
}

/// Drop warnings flagged by [`Beliefs::mark_suppressed`].
pub fn retain_unsuppressed(warnings: &mut Vec<Warning>) {
    warnings.retain(|warning| !warning.is_suppressed_by_belief());
}
