//! Tracing setup. Logs go to stderr so `--json` output on stdout stays
//! machine readable.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "homeboard=info,tower_http=info";
const VERBOSE_FILTER: &str = "homeboard=debug,tower_http=debug";

/// Install the global subscriber. `RUST_LOG` wins over `verbose`.
pub fn init(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
