//! Diagnostic output.
//!
//! Warnings and errors go to stderr so they never mix with the merged
//! document on stdout. `RUST_LOG` takes precedence over `-v`.

use std::io::IsTerminal as _;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber.
///
/// Calling this more than once keeps the first subscriber.
pub fn init(verbosity: u8) {
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false)
                .without_time(),
        )
        .try_init();
}

fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
