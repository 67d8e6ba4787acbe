use std::path::PathBuf;

/// The index text violates the record/field structure.
///
/// Line and record numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("line {line}: continuation line has no preceding field")]
    OrphanContinuation { line: usize },

    #[error("record {record}: missing `Package` field")]
    MissingPackage { record: usize },

    #[error("record {record}: empty `Package` field")]
    EmptyPackage { record: usize },

    #[error("record {record}: package `{name}` is already defined by record {first}")]
    DuplicatePackage {
        name: String,
        record: usize,
        first: usize,
    },
}

/// Error type for loading an index from a repository or file.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("malformed index: {0}")]
    Format(#[from] FormatError),

    #[error("failed to fetch {url}: {message}")]
    Network { url: String, message: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
