// src/logging.rs
// =============================================================================
// Diagnostic logging with `tracing`.
//
// Logs go to stderr so stdout only ever carries command output (markup,
// tables, JSON) and can be piped safely.
//
// Level selection:
// - RUST_LOG, when set, always wins (e.g. RUST_LOG=repo_pages=trace)
// - otherwise "warn", or "debug" with --verbose
// =============================================================================

use tracing_subscriber::EnvFilter;

/// Default filter directive for the given verbosity
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Installs the global subscriber. Call once, before anything logs.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    // try_init: a second call (or a test harness subscriber) is not fatal
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
