use clap::Parser;
use rdeps::commands::resolve::{ResolveArgs, cmd_resolve};
use rdeps::config::RdepsConfig;
use rdeps::logging::{Level, setup_logging};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Resolve the dependency closure of CRAN packages and optionally download
/// their source archives.
#[derive(Parser)]
#[command(name = "rdeps", version)]
struct Cli {
    #[command(flatten)]
    resolve: ResolveArgs,

    /// Show debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    setup_logging(if cli.verbose {
        Level::Verbose
    } else {
        Level::Default
    });

    let start = Instant::now();
    let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = RdepsConfig::load(&root);

    let code = cmd_resolve(&cli.resolve, &config);
    info!(elapsed = ?start.elapsed(), "running time");
    std::process::exit(code);
}
