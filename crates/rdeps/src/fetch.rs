//! Archive downloads for resolved packages.
//!
//! Each package present in the index is fetched from
//! `<base>/src/contrib/<name>_<version>.tar.gz` and written verbatim to
//! `<dest>/<name>_<version>.tar.gz`. Resolved names missing from the index
//! (`R`, base packages) are skipped without an error.
//!
//! A failing package doesn't stop the others: every package is attempted
//! and failures are collected in the [`DownloadReport`].

use rdeps_graph::Resolution;
use rdeps_index::source::join_url;
use rdeps_index::{Index, Record};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Error type for a single archive download.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to fetch {url}: {message}")]
    Network { url: String, message: String },

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("package `{package}` has no `Version` field")]
    MissingVersion { package: String },
}

/// Where archive bytes come from.
pub trait ArchiveSource {
    /// Open a byte stream for `url`.
    fn open(&self, url: &str) -> Result<Box<dyn Read + Send>, FetchError>;
}

/// Streams archives over HTTP.
pub struct HttpSource;

impl ArchiveSource for HttpSource {
    fn open(&self, url: &str) -> Result<Box<dyn Read + Send>, FetchError> {
        let response = ureq::get(url).call().map_err(|e| FetchError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        Ok(Box::new(response.into_reader()))
    }
}

/// `<name>_<version>.tar.gz`
pub fn archive_name(name: &str, version: &str) -> String {
    format!("{}_{}.tar.gz", name, version)
}

/// Download URL of a package archive.
pub fn archive_url(base_url: &str, name: &str, version: &str) -> String {
    join_url(base_url, &format!("src/contrib/{}", archive_name(name, version)))
}

/// A package whose archive could not be downloaded.
#[derive(Debug)]
pub struct DownloadFailure {
    pub package: String,
    pub error: FetchError,
}

/// A successfully written archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Downloaded {
    pub package: String,
    pub url: String,
    pub path: PathBuf,
}

/// Outcome of downloading a whole resolution.
#[derive(Debug, Default)]
pub struct DownloadReport {
    pub downloaded: Vec<Downloaded>,
    pub failed: Vec<DownloadFailure>,
    /// Resolved names with no index record.
    pub skipped: Vec<String>,
}

impl DownloadReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Downloads archives for resolved packages into a directory.
pub struct Fetcher<'a, S> {
    source: S,
    base_url: &'a str,
    dest: &'a Path,
}

impl<'a> Fetcher<'a, HttpSource> {
    pub fn http(base_url: &'a str, dest: &'a Path) -> Self {
        Self::new(HttpSource, base_url, dest)
    }
}

impl<'a, S: ArchiveSource> Fetcher<'a, S> {
    pub fn new(source: S, base_url: &'a str, dest: &'a Path) -> Self {
        Self {
            source,
            base_url,
            dest,
        }
    }

    /// Download every package of `resolution` that `index` knows.
    ///
    /// Only failing to create the destination directory aborts; per-package
    /// failures end up in the report.
    pub fn download_all(
        &self,
        index: &Index,
        resolution: &Resolution,
    ) -> Result<DownloadReport, FetchError> {
        std::fs::create_dir_all(self.dest).map_err(|source| FetchError::Io {
            path: self.dest.to_path_buf(),
            source,
        })?;

        let mut report = DownloadReport::default();
        for name in resolution.iter() {
            let Some(record) = index.get(name) else {
                debug!(package = name, "not in index, skipping download");
                report.skipped.push(name.to_string());
                continue;
            };

            match self.download(record) {
                Ok(downloaded) => report.downloaded.push(downloaded),
                Err(error) => {
                    warn!(package = name, error = %error, "download failed");
                    report.failed.push(DownloadFailure {
                        package: name.to_string(),
                        error,
                    });
                }
            }
        }

        Ok(report)
    }

    /// Download one package's archive.
    pub fn download(&self, record: &Record) -> Result<Downloaded, FetchError> {
        let name = record.name();
        let version = record.version().ok_or_else(|| FetchError::MissingVersion {
            package: name.to_string(),
        })?;

        let url = archive_url(self.base_url, name, version);
        let path = self.dest.join(archive_name(name, version));
        info!(url = %url, "downloading");

        let mut reader = self.source.open(&url)?;
        if let Err(source) = write_stream(&mut reader, &path) {
            // Don't leave a truncated archive behind.
            let _ = std::fs::remove_file(&path);
            return Err(FetchError::Io { path, source });
        }

        Ok(Downloaded {
            package: name.to_string(),
            url,
            path,
        })
    }
}

fn write_stream(reader: &mut dyn Read, path: &Path) -> std::io::Result<u64> {
    let mut writer = BufWriter::new(File::create(path)?);
    let written = std::io::copy(reader, &mut writer)?;
    writer.flush()?;
    Ok(written)
}
