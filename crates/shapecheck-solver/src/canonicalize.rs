//! Canonical representation of a type's structural shape.
//!
//! Two types whose field structure is identical up to renaming, including
//! identical cyclic back-references, get byte-identical canonical strings.
//! The string is used as the equality proxy when computing equivalence
//! classes.
//!
//! ## Algorithm
//!
//! The type graph is explored breadth-first from the root type. Every newly
//! reached type receives the next integer id (the root is `0`) and becomes a
//! node `{id, kind, fields}`; reaching a type that already has an id in the
//! current context records a back-reference to that id instead, which is
//! what makes cyclic graphs terminate. Fields are visited in sorted name
//! order. The alternatives of a field are ordered by a depth-bounded
//! structural fingerprint, so renaming types never changes which alternative
//! stays in the current context; the type name only breaks ties.
//!
//! A field with several alternative types forks the context for every
//! alternative after the first, so sibling alternatives never share
//! back-reference numbering. Each context ("canonical path") owns its nodes
//! in a flat arena; forking copies the arena, and pending work addresses
//! nodes by `(path, node index)`. The final representation is the sorted,
//! `" -- "`-joined list of every path's serialized root node.
//!
//! ## Cutoff
//!
//! Once a path holds more than `max_nodes` nodes (or a field has more than
//! `max_nodes` alternatives) the type gets a placeholder derived from its own
//! name. The number of paths is bounded separately by
//! [`MAX_CANONICAL_PATHS`], since every alternative opens a new path. The
//! placeholder never equals the representation of any other type, so
//! oversized types are never merged.

use rustc_hash::{FxHashMap, FxHasher};
use shapecheck_common::limits::{MAX_CANONICAL_PATHS, MAX_NODES_IN_CANONICAL_REPR};
use std::collections::VecDeque;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::table::TypeTable;
use crate::types::TypeId;

/// Prefix of the placeholder given to types over the node budget.
pub const OVERFLOW_PLACEHOLDER_PREFIX: &str = "very_complex_canonical_representation_";

const PATH_SEPARATOR: &str = " -- ";

/// Levels of field structure folded into an alternative's ordering key.
const ALTERNATIVE_ORDER_DEPTH: usize = 3;

type NodeIndex = usize;

#[derive(Clone, Copy, Debug)]
enum Child {
    Node(NodeIndex),
    BackRef(u32),
}

#[derive(Clone, Debug)]
struct CanonicalNode<'a> {
    id: u32,
    kind: &'a str,
    fields: Vec<(&'a str, Child)>,
}

/// One id-numbering context; its root node sits at index 0.
#[derive(Clone, Debug)]
struct CanonicalPath<'a> {
    nodes: Vec<CanonicalNode<'a>>,
    type_to_id: FxHashMap<TypeId, u32>,
    last_id: u32,
}

impl<'a> CanonicalPath<'a> {
    fn new(root: TypeId, kind: &'a str) -> Self {
        let mut type_to_id = FxHashMap::default();
        type_to_id.insert(root, 0);
        CanonicalPath {
            nodes: vec![CanonicalNode {
                id: 0,
                kind,
                fields: Vec::new(),
            }],
            type_to_id,
            last_id: 0,
        }
    }

    fn push_node(&mut self, ty: TypeId, kind: &'a str) -> NodeIndex {
        self.last_id += 1;
        self.type_to_id.insert(ty, self.last_id);
        self.nodes.push(CanonicalNode {
            id: self.last_id,
            kind,
            fields: Vec::new(),
        });
        self.nodes.len() - 1
    }

    fn root(&self) -> NodeView<'_, 'a> {
        NodeView {
            path: self,
            node: 0,
        }
    }
}

/// Serializes a node and its explored children as a nested record.
struct NodeView<'p, 'a> {
    path: &'p CanonicalPath<'a>,
    node: NodeIndex,
}

impl fmt::Display for NodeView<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = &self.path.nodes[self.node];
        write!(f, "{{\"id\":{},\"kind\":{:?},\"fields\":[", node.id, node.kind)?;
        for (i, (name, child)) in node.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "[{name:?},")?;
            match child {
                Child::BackRef(id) => write!(f, "{id}")?,
                Child::Node(index) => write!(
                    f,
                    "{}",
                    NodeView {
                        path: self.path,
                        node: *index,
                    }
                )?,
            }
            f.write_str("]")?;
        }
        f.write_str("]}")
    }
}

struct WorkItem {
    path: usize,
    node: NodeIndex,
    ty: TypeId,
}

/// Hash of `ty`'s kind and field structure down to `depth` levels.
///
/// Only kinds and field names go in, never type names, so the value is the
/// same for any renaming of the types involved.
fn structural_fingerprint(
    table: &TypeTable,
    ty: TypeId,
    depth: usize,
    memo: &mut FxHashMap<(TypeId, usize), u64>,
) -> u64 {
    if let Some(&hash) = memo.get(&(ty, depth)) {
        return hash;
    }
    let mut hasher = FxHasher::default();
    table.name(ty).kind().label().hash(&mut hasher);
    if let Some(shape) = table.shape(ty).filter(|_| depth > 0) {
        for field in shape.sorted_field_names() {
            field.hash(&mut hasher);
            let mut children: Vec<u64> = shape
                .get(field)
                .into_iter()
                .flat_map(|types| types.types())
                .map(|child| structural_fingerprint(table, child, depth - 1, memo))
                .collect();
            children.sort_unstable();
            children.hash(&mut hasher);
        }
    }
    let hash = hasher.finish();
    memo.insert((ty, depth), hash);
    hash
}

/// Compute the canonical representation of `ty`, or `None` when the type
/// exceeds the node budget or the path budget.
pub fn canonical_representation(table: &TypeTable, ty: TypeId, max_nodes: usize) -> Option<String> {
    let mut paths = vec![CanonicalPath::new(ty, table.name(ty).kind().label())];
    let mut worklist = VecDeque::new();
    worklist.push_back(WorkItem {
        path: 0,
        node: 0,
        ty,
    });
    let mut fingerprints = FxHashMap::default();

    while let Some(item) = worklist.pop_front() {
        if paths[item.path].nodes.len() > max_nodes || paths.len() > MAX_CANONICAL_PATHS {
            return None;
        }
        let Some(shape) = table.shape(item.ty) else {
            // primitive type; stop exploring
            continue;
        };
        for field in shape.sorted_field_names() {
            let Some(types) = shape.get(field) else {
                continue;
            };
            if types.len() > max_nodes {
                return None;
            }
            let mut alternatives: Vec<TypeId> = types.types().collect();
            alternatives.sort_by_cached_key(|&alternative| {
                (
                    structural_fingerprint(
                        table,
                        alternative,
                        ALTERNATIVE_ORDER_DEPTH,
                        &mut fingerprints,
                    ),
                    table.resolve(alternative),
                )
            });

            for (alternative, field_ty) in alternatives.into_iter().enumerate() {
                let path = &mut paths[item.path];
                if let Some(&id) = path.type_to_id.get(&field_ty) {
                    path.nodes[item.node].fields.push((field, Child::BackRef(id)));
                    continue;
                }
                let child = path.push_node(field_ty, table.name(field_ty).kind().label());
                path.nodes[item.node].fields.push((field, Child::Node(child)));

                let target = if alternative == 0 {
                    item.path
                } else {
                    let forked = paths[item.path].clone();
                    paths.push(forked);
                    paths.len() - 1
                };
                worklist.push_back(WorkItem {
                    path: target,
                    node: child,
                    ty: field_ty,
                });
            }
        }
    }

    let mut serialized: Vec<String> = paths.iter().map(|p| p.root().to_string()).collect();
    serialized.sort_unstable();
    Some(serialized.join(PATH_SEPARATOR))
}

/// Placeholder representation for a type over the node budget.
pub fn overflow_placeholder(table: &TypeTable, ty: TypeId) -> String {
    format!("{OVERFLOW_PLACEHOLDER_PREFIX}{}", table.resolve(ty))
}

pub fn is_overflow_placeholder(repr: &str) -> bool {
    repr.starts_with(OVERFLOW_PLACEHOLDER_PREFIX)
}

/// Counters for one canonicalizer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CanonicalStats {
    pub computed: usize,
    pub cache_hits: usize,
    pub overflows: usize,
}

/// Caching canonicalizer over one frozen table.
///
/// Canonical forms depend only on the table, never on the current
/// equivalence classes, so a cached entry stays valid for the whole run.
pub struct Canonicalizer<'a> {
    table: &'a TypeTable,
    max_nodes: usize,
    cache: FxHashMap<TypeId, Arc<str>>,
    stats: CanonicalStats,
}

impl<'a> Canonicalizer<'a> {
    pub fn new(table: &'a TypeTable) -> Self {
        Self::with_max_nodes(table, MAX_NODES_IN_CANONICAL_REPR)
    }

    pub fn with_max_nodes(table: &'a TypeTable, max_nodes: usize) -> Self {
        Canonicalizer {
            table,
            max_nodes,
            cache: FxHashMap::default(),
            stats: CanonicalStats::default(),
        }
    }

    pub fn canonicalize(&mut self, ty: TypeId) -> Arc<str> {
        if let Some(repr) = self.cache.get(&ty) {
            self.stats.cache_hits += 1;
            return repr.clone();
        }
        self.stats.computed += 1;
        let repr: Arc<str> = match canonical_representation(self.table, ty, self.max_nodes) {
            Some(repr) => {
                trace!(ty = self.table.resolve(ty), repr = %repr, "canonicalized");
                Arc::from(repr)
            }
            None => {
                self.stats.overflows += 1;
                debug!(
                    ty = self.table.resolve(ty),
                    max_nodes = self.max_nodes,
                    "canonical representation too complex; type will not be merged"
                );
                Arc::from(overflow_placeholder(self.table, ty))
            }
        };
        self.cache.insert(ty, repr.clone());
        repr
    }

    pub fn stats(&self) -> CanonicalStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "tests/canonicalize_tests.rs"]
mod tests;
