//! Configuration system for rdeps.
//!
//! Loads config from:
//! 1. Global: ~/.config/rdeps/config.toml
//! 2. Per-project: .rdeps/config.toml (overrides global)
//!
//! Example config.toml:
//! ```toml
//! [repository]
//! base_url = "https://cloud.r-project.org/"
//!
//! [download]
//! enabled = true
//! dest = "vendor/packages"
//! ```
//!
//! Command-line flags override both files.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Repository used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://cran.univ-paris1.fr/";

/// Download directory used when none is configured.
pub const DEFAULT_DEST: &str = "./packages";

/// Repository configuration.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Base URL of the CRAN-style repository.
    pub base_url: Option<String>,
    /// Index location relative to `base_url`.
    pub index_path: Option<String>,
}

/// Archive download configuration.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DownloadConfig {
    /// Download archives without passing `--download`.
    pub enabled: Option<bool>,
    /// Directory archives are written to.
    pub dest: Option<PathBuf>,
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RdepsConfig {
    pub repository: RepositoryConfig,
    pub download: DownloadConfig,
}

impl RdepsConfig {
    /// Load configuration for a project.
    ///
    /// Loads global config from ~/.config/rdeps/config.toml,
    /// then merges with per-project config from .rdeps/config.toml.
    pub fn load(root: &Path) -> Self {
        let mut config = Self::default();

        if let Some(global) = Self::global_config_path().and_then(|p| Self::load_file(&p)) {
            config = config.merge(global);
        }

        let project_path = root.join(".rdeps").join("config.toml");
        if let Some(project) = Self::load_file(&project_path) {
            config = config.merge(project);
        }

        config
    }

    /// Get the global config path.
    fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("rdeps").join("config.toml"))
    }

    /// Load config from a file path. Missing files are silently skipped,
    /// unparsable ones with a warning.
    fn load_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring invalid config file");
                None
            }
        }
    }

    /// Merge another config into this one; values set in `other` win.
    pub fn merge(self, other: Self) -> Self {
        Self {
            repository: RepositoryConfig {
                base_url: other.repository.base_url.or(self.repository.base_url),
                index_path: other.repository.index_path.or(self.repository.index_path),
            },
            download: DownloadConfig {
                enabled: other.download.enabled.or(self.download.enabled),
                dest: other.download.dest.or(self.download.dest),
            },
        }
    }

    pub fn base_url(&self) -> &str {
        self.repository
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn index_path(&self) -> &str {
        self.repository
            .index_path
            .as_deref()
            .unwrap_or(rdeps_index::source::DEFAULT_INDEX_PATH)
    }

    pub fn download_enabled(&self) -> bool {
        self.download.enabled.unwrap_or(false)
    }

    pub fn dest(&self) -> &Path {
        self.download
            .dest
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_DEST))
    }
}
