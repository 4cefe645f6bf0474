//! Logging initialization
//!
//! Browser builds write to the developer console; native builds (tests,
//! tooling) log to stderr filtered by `RUST_LOG`.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber
///
/// Calling it again is harmless: the first installed subscriber stays.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(tracing_web::MakeWebConsoleWriter::new());

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(DEFAULT_FILTER))
        .with(fmt_layer)
        .try_init();
}

/// Install the global subscriber
///
/// Calling it again is harmless: the first installed subscriber stays.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
