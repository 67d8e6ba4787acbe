//! CRAN package index ingestion.
//!
//! Turns a `PACKAGES` document (Debian control format with indented
//! continuation lines) into an [`Index`] of per-package [`Record`]s.
//!
//! The pipeline has two pure stages, exposed separately so each can be
//! inspected on its own:
//!
//! 1. [`normalize`] folds continuation lines into their field and drops
//!    version constraints such as `(>= 2.10)`.
//! 2. [`parse`] splits the normalized text into records and fields.
//!
//! [`source`] fetches the raw document from a repository or reads it from
//! disk.
//!
//! # Example
//!
//! ```
//! let index = rdeps_index::load("Package: A\nVersion: 1.0\nDepends: B (>= 2.0)\n").unwrap();
//! let a = index.get("A").unwrap();
//! assert_eq!(a.version(), Some("1.0"));
//! assert_eq!(a.get("Depends"), Some("B"));
//! ```

mod error;
pub mod normalize;
pub mod parse;
mod record;
pub mod source;

pub use error::{FormatError, IndexError};
pub use normalize::normalize;
pub use parse::parse;
pub use record::{Index, Record};

/// Normalize and parse raw index text in one step.
pub fn load(raw: &str) -> Result<Index, FormatError> {
    parse(&normalize(raw)?)
}
