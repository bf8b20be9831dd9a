//! Common types and utilities shared by the shapecheck crates.
//!
//! This crate provides:
//! - Analysis limits and thresholds (`limits`)
//! - Opaque source-location ids and the location lookup used when
//!   warnings are rendered (`location`)

// Centralized limits and thresholds
pub mod limits;

// Source locations (instruction ids resolved lazily at report time)
pub mod location;
pub use location::{LocationId, LocationMap, LocationResolver, UnresolvedLocations};
