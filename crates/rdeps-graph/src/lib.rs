//! Dependency graph algorithms for package indices.
//!
//! - [`DependencyGraph`]: package → directly required packages, built from
//!   the `Depends` and `Imports` fields of an [`rdeps_index::Index`].
//! - [`closure`] / [`resolve`]: breadth-first reachability from one or more
//!   seed packages.
//!
//! Edges may point at packages the index doesn't know (`R` itself, base
//! packages). Those are ordinary leaves, not errors.

mod closure;
mod graph;

pub use closure::{Resolution, closure, resolve};
pub use graph::{DEPENDENCY_FIELDS, DependencyGraph, dependency_names};
