//! Resolve and download the dependency closure of CRAN packages.
//!
//! Ties together index loading ([`rdeps_index`]), graph resolution
//! ([`rdeps_graph`]) and archive downloads ([`fetch`]).
//!
//! # Example
//!
//! ```no_run
//! use rdeps_graph::{DependencyGraph, resolve};
//! use rdeps_index::source::{DEFAULT_INDEX_PATH, fetch_index};
//!
//! let index = fetch_index("https://cloud.r-project.org/", DEFAULT_INDEX_PATH).unwrap();
//! let graph = DependencyGraph::from_index(&index);
//! let packages = resolve(&graph, &["ggplot2"]);
//! println!("{} packages", packages.len());
//! ```

pub mod commands;
pub mod config;
pub mod fetch;
pub mod logging;

use fetch::FetchError;
use rdeps_index::IndexError;

/// Error type for a resolve run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}
