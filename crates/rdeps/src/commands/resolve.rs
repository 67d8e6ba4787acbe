//! Resolve a dependency closure and optionally download it.

use crate::Error;
use crate::config::RdepsConfig;
use crate::fetch::{DownloadReport, Fetcher};
use clap::Args;
use clap::builder::NonEmptyStringValueParser;
use rdeps_graph::{DependencyGraph, Resolution, resolve};
use rdeps_index::Index;
use rdeps_index::source::{fetch_index, read_index_file};
use std::path::PathBuf;
use tracing::debug;

#[derive(Args, Debug, Clone, Default)]
pub struct ResolveArgs {
    /// Packages whose dependency closure is resolved
    #[arg(value_name = "PACKAGE", value_parser = NonEmptyStringValueParser::new())]
    pub packages: Vec<String>,

    /// Download the archive of every resolved package
    #[arg(short, long)]
    pub download: bool,

    /// Directory archives are written to [default: ./packages]
    #[arg(long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Repository base URL [default: http://cran.univ-paris1.fr/]
    #[arg(long, value_name = "URL")]
    pub repo: Option<String>,

    /// Read the package index from a local file instead of the repository
    #[arg(long, value_name = "PATH")]
    pub index_file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a resolve run.
#[derive(Debug, Default)]
pub struct ResolveOutput {
    pub seeds: Vec<String>,
    pub resolution: Resolution,
    /// Present when downloads were requested.
    pub downloads: Option<DownloadReport>,
}

impl ResolveOutput {
    pub fn to_json(&self) -> serde_json::Value {
        let mut value = serde_json::json!({
            "seeds": self.seeds,
            "packages": self.resolution.iter().collect::<Vec<_>>(),
            "count": self.resolution.len(),
        });

        if let Some(report) = &self.downloads {
            value["downloaded"] = report
                .downloaded
                .iter()
                .map(|d| {
                    serde_json::json!({
                        "package": d.package,
                        "url": d.url,
                        "path": d.path.display().to_string(),
                    })
                })
                .collect();
            value["skipped"] = serde_json::json!(report.skipped);
            value["failed"] = report
                .failed
                .iter()
                .map(|f| serde_json::json!({"package": f.package, "error": f.error.to_string()}))
                .collect();
        }

        value
    }

    pub fn format_text(&self) -> String {
        let mut lines: Vec<String> = self.resolution.iter().map(String::from).collect();
        lines.push(format!("{} packages", self.resolution.len()));

        if let Some(report) = &self.downloads {
            for d in &report.downloaded {
                lines.push(format!("Downloaded {}", d.path.display()));
            }
            lines.push(format!(
                "{} downloaded, {} failed, {} not in index",
                report.downloaded.len(),
                report.failed.len(),
                report.skipped.len()
            ));
        }

        lines.join("\n")
    }
}

fn load_index(args: &ResolveArgs, config: &RdepsConfig) -> Result<Index, Error> {
    let index = match &args.index_file {
        Some(path) => read_index_file(path)?,
        None => {
            let base_url = args.repo.as_deref().unwrap_or(config.base_url());
            fetch_index(base_url, config.index_path())?
        }
    };
    Ok(index)
}

/// Load the index, resolve the seeds and download if requested.
///
/// Command-line values take precedence over `config`.
pub fn run(args: &ResolveArgs, config: &RdepsConfig) -> Result<ResolveOutput, Error> {
    if args.packages.is_empty() {
        debug!("no packages requested");
        return Ok(ResolveOutput::default());
    }

    let index = load_index(args, config)?;
    let graph = DependencyGraph::from_index(&index);
    let resolution = resolve(&graph, &args.packages);

    let downloads = if args.download || config.download_enabled() {
        let base_url = args.repo.as_deref().unwrap_or(config.base_url());
        let dest = args.dest.as_deref().unwrap_or(config.dest());
        Some(Fetcher::http(base_url, dest).download_all(&index, &resolution)?)
    } else {
        None
    };

    Ok(ResolveOutput {
        seeds: args.packages.clone(),
        resolution,
        downloads,
    })
}

/// Run the command and print its output. Returns the process exit code.
pub fn cmd_resolve(args: &ResolveArgs, config: &RdepsConfig) -> i32 {
    let output = match run(args, config) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("error: {}", e);
            return 1;
        }
    };

    if args.json {
        println!("{}", output.to_json());
    } else {
        println!("{}", output.format_text());
    }

    match &output.downloads {
        Some(report) if !report.is_success() => {
            for failure in &report.failed {
                eprintln!("error: {}: {}", failure.package, failure.error);
            }
            eprintln!(
                "error: {} of {} downloads failed",
                report.failed.len(),
                report.failed.len() + report.downloaded.len()
            );
            1
        }
        _ => 0,
    }
}
