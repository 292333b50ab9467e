//! Diagnostic logging to stderr via tracing
//!
//! User-facing output goes through `styling`; this is for `RUST_LOG` /
//! `-v` troubleshooting of collaborator calls.

use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count when `RUST_LOG` is unset.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "error",
        1 => "warn,smartterm=info",
        2 => "info,smartterm=debug",
        _ => "debug,smartterm=trace",
    }
}

/// Install the global subscriber. Safe to call once per process.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
