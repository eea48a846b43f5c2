//! Tracing subscriber setup for the binary
//!
//! `RUST_LOG` wins when set. Otherwise the crate logs at info, or debug
//! with `--verbose`. Logs go to stderr so they never mix with exports
//! written to stdout.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for a verbosity level
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "budget_wizard=debug,info"
    } else {
        "budget_wizard=info,warn"
    }
}

/// Install the global subscriber; `json` switches to one JSON object per line
pub fn init_logger(verbose: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .json(),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .init();
    }
}
