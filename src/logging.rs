//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "SCANGATE_LOG";

/// Initialize the scangate tracing subscriber.
///
/// Reads `SCANGATE_LOG` for filter directives, e.g.
/// `SCANGATE_LOG=scangate::interpret=debug,scangate::config=info`.
/// Falls back to `scangate=warn` when unset or invalid. Events go to stderr
/// so JSON output on stdout stays machine-readable.
///
/// Safe to call more than once.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("scangate=warn"));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .without_time(),
            )
            .with(filter)
            .init();
    });
}
