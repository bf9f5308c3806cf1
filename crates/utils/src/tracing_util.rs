//! Helpers related to tracing, used by main entrypoints

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Initialize tracing, logging at `level` and above unless `RUST_LOG` says otherwise.
pub fn initialize_tracing(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .without_time()
        .with_target(false)
        .compact();

    // RUST_LOG still wins so the existing debugging workflow keeps working
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .event_format(format)
        .with_writer(std::io::stderr)
        .with_filter(filter);

    tracing_subscriber::registry().with(fmt_layer).init();
}
