use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::uptime;

/// Progress (index source, downloads, running time) plus warnings.
const DEFAULT_DIRECTIVES: &str = "warn,rdeps=info,rdeps_index=info";

/// Targets shown at `DEBUG` in verbose mode.
const VERBOSE_DIRECTIVES: &str = "rdeps=debug,rdeps_index=debug,rdeps_graph=debug";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Show progress and warnings (overrideable by `RUST_LOG`).
    #[default]
    Default,
    /// Show debug messages from rdeps crates (overrideable by `RUST_LOG`).
    Verbose,
}

/// Configure `tracing` for the given [`Level`], honouring `RUST_LOG`.
///
/// Logs go to stderr so stdout carries only results. Verbose output adds
/// the uptime and target to each message.
pub fn setup_logging(level: Level) {
    let default_directives = match level {
        Level::Default => DEFAULT_DIRECTIVES,
        Level::Verbose => VERBOSE_DIRECTIVES,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    // `try_init` fails only if a subscriber is already installed.
    let _ = match level {
        Level::Default => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .try_init(),
        Level::Verbose => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_timer(uptime())
            .try_init(),
    };
}
