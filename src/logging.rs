// ==========================================
// Humidor Hub - Logging setup
// ==========================================
// tracing + tracing-subscriber
// Level comes from RUST_LOG, falling back to the caller's default
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging with the default "info" level
///
/// # Environment
/// - RUST_LOG: filter directive (default: info)
///   e.g. RUST_LOG=debug or RUST_LOG=humidor_hub=trace
///
/// # Example
/// ```no_run
/// use humidor_hub::logging;
/// logging::init();
/// ```
pub fn init() {
    init_with_default("info");
}

/// Initialize logging, `default_directive` applies when RUST_LOG is unset
pub fn init_with_default(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    // stdout carries export output, so logs go to stderr
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Test logging: debug level, captured by the test harness
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
