//! Logging bootstrap.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
///
/// Safe to call more than once; only the first call installs the subscriber.
/// Respects `RUST_LOG`, defaulting the `tally` crates to `info`.
pub fn init() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let filter = EnvFilter::from_default_env()
            .add_directive("tally=info".parse().expect("static directive parses"));

        fmt().with_env_filter(filter).init();
    });
}
