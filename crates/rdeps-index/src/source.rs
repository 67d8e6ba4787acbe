//! Loading the raw index document.
//!
//! The index is fetched with a plain unauthenticated GET; nothing is cached
//! and failures are not retried. Mirrors serve both `PACKAGES` and
//! `PACKAGES.gz`, so gzip bodies are detected by their magic bytes and
//! decompressed transparently.

use crate::{Index, IndexError};
use flate2::read::GzDecoder;
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::{debug, info};

/// Repository-relative path of the index document.
pub const DEFAULT_INDEX_PATH: &str = "src/contrib/PACKAGES";

/// Join a base URL and a relative path with exactly one `/` between them.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn is_gzip(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b
}

/// Decode raw index bytes, decompressing gzip if needed.
///
/// Invalid UTF-8 (some older descriptions are Latin-1) is replaced rather
/// than rejected; package names and versions are ASCII.
fn decode(data: Vec<u8>) -> std::io::Result<String> {
    let bytes = if is_gzip(&data) {
        let mut out = Vec::new();
        GzDecoder::new(Cursor::new(data)).read_to_end(&mut out)?;
        out
    } else {
        data
    };

    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

/// Fetch the raw index text from `<base_url>/<index_path>`.
pub fn fetch_text(base_url: &str, index_path: &str) -> Result<String, IndexError> {
    let url = join_url(base_url, index_path);
    info!(url = %url, "fetching package index");

    let network = |message: String| IndexError::Network {
        url: url.clone(),
        message,
    };

    let response = ureq::get(&url).call().map_err(|e| network(e.to_string()))?;

    let mut data = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut data)
        .map_err(|e| network(e.to_string()))?;
    debug!(bytes = data.len(), "downloaded package index");

    decode(data).map_err(|e| network(e.to_string()))
}

/// Fetch and parse the index from a repository.
pub fn fetch_index(base_url: &str, index_path: &str) -> Result<Index, IndexError> {
    let text = fetch_text(base_url, index_path)?;
    Ok(crate::load(&text)?)
}

/// Read and parse an index stored on disk (plain or gzip).
pub fn read_index_file(path: &Path) -> Result<Index, IndexError> {
    let io_err = |source: std::io::Error| IndexError::Io {
        path: path.to_path_buf(),
        source,
    };

    info!(path = %path.display(), "reading package index");
    let data = std::fs::read(path).map_err(io_err)?;
    let text = decode(data).map_err(io_err)?;
    Ok(crate::load(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FormatError;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;
    use tempfile::TempDir;

    const INDEX: &str = "Package: A\nVersion: 1.0\nDepends: B (>= 2.0)\n\nPackage: B\nVersion: 2.0\n";

    #[test]
    fn test_join_url() {
        let expected = "http://cran.example.org/src/contrib/PACKAGES";
        assert_eq!(
            join_url("http://cran.example.org/", "src/contrib/PACKAGES"),
            expected
        );
        assert_eq!(
            join_url("http://cran.example.org", "/src/contrib/PACKAGES"),
            expected
        );
        assert_eq!(
            join_url("http://cran.example.org//", "src/contrib/PACKAGES"),
            expected
        );
    }

    #[test]
    fn test_decode_plain() {
        assert_eq!(decode(INDEX.as_bytes().to_vec()).unwrap(), INDEX);
    }

    #[test]
    fn test_decode_gzip() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(INDEX.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();
        assert!(is_gzip(&compressed));
        assert_eq!(decode(compressed).unwrap(), INDEX);
    }

    #[test]
    fn test_decode_invalid_utf8_is_lossy() {
        let mut data = b"Package: A\nAuthor: Fran".to_vec();
        data.push(0xe7);
        data.extend_from_slice(b"ois\n");
        let text = decode(data).unwrap();
        assert!(text.starts_with("Package: A\n"));
        assert!(text.contains('\u{fffd}'));
    }

    #[test]
    fn test_read_index_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("PACKAGES");
        std::fs::write(&path, INDEX).unwrap();

        let index = read_index_file(&path).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("A").unwrap().get("Depends"), Some("B"));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_index_file(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, IndexError::Io { .. }));
    }

    #[test]
    fn test_read_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("PACKAGES");
        std::fs::write(&path, "Version: 1.0\n").unwrap();

        let err = read_index_file(&path).unwrap_err();
        assert!(matches!(
            err,
            IndexError::Format(FormatError::MissingPackage { record: 1 })
        ));
    }

    #[test]
    fn test_unreachable_repository() {
        let err = fetch_index("http://127.0.0.1:9", DEFAULT_INDEX_PATH).unwrap_err();
        match err {
            IndexError::Network { url, .. } => {
                assert_eq!(url, "http://127.0.0.1:9/src/contrib/PACKAGES");
            }
            other => panic!("expected network error, got {other:?}"),
        }
    }

    #[cfg(feature = "test-network")]
    #[test]
    fn test_fetch_cran() {
        let index = fetch_index("https://cloud.r-project.org/", DEFAULT_INDEX_PATH).unwrap();
        assert!(index.contains("Rcpp"));
    }
}
