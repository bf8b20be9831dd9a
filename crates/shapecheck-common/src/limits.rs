//! Centralized limits and thresholds for the type-consistency analysis.
//!
//! Every bound on analysis work lives here so the solver, the CLI defaults
//! and the tests agree on one value.
//!
//! # Categories
//!
//! - **Canonicalization**: node and path budgets for the structural fingerprint of one type
//! - **Type diffing**: which warnings get a diff, and how much work one diff may do

// =============================================================================
// Canonicalization
// =============================================================================

/// Maximum number of nodes in one canonical path of a type.
///
/// Canonicalization explores the type graph breadth-first and numbers every
/// newly reached type. Once a path holds more nodes than this, the type is
/// given a placeholder representation that compares unequal to everything,
/// so pathological types are never merged with anything else.
///
/// The same bound applies to the number of alternative types recorded at a
/// single field.
///
/// # Example
///
/// ```text
/// // A DOM-like object graph where every node references dozens of
/// // distinct prototypes and closures:
/// object(1) { parentNode: object(2), firstChild: object(3), ... }
/// object(2) { parentNode: object(4), childNodes: array(5), ... }
/// // ... well over 100 distinct reachable types ...
/// ```
pub const MAX_NODES_IN_CANONICAL_REPR: usize = 100;

/// Maximum number of canonical paths explored for one type.
///
/// Every field with several alternative types forks one path per extra
/// alternative, so a polymorphic type can open exponentially many paths while
/// each path stays small. Past this bound the type gets the same placeholder
/// as one over [`MAX_NODES_IN_CANONICAL_REPR`].
///
/// ```text
/// // A polymorphic binary tree of depth 13: every inner node forks once,
/// // giving 2^13 paths of about 27 nodes each.
/// object(1) { f: object(2) | object(3) }
/// object(2) { f: object(4) | object(5) }
/// ```
pub const MAX_CANONICAL_PATHS: usize = 4096;

// =============================================================================
// Type diffing
// =============================================================================

/// Maximum number of distinct observed types for which a type diff is computed.
///
/// The diff expands every observed type into all of its access paths, which
/// grows quickly with the number of types involved. Warnings with more
/// observed types are reported without a diff.
pub const MAX_TYPES_FOR_TYPE_DIFF: usize = 5;

/// Maximum number of work items processed while expanding one observed type
/// into access paths.
///
/// Fields with several alternative types fan out into one path per
/// alternative, so a wide type graph can produce exponentially many paths.
/// When the budget is exhausted the diff for that warning is skipped.
pub const MAX_TYPE_DIFF_WORK_ITEMS: usize = 50_000;

/// Maximum number of differing access paths printed per warning.
pub const MAX_REPORTED_DIFF_PATHS: usize = 4;
