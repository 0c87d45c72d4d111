//! Tracing subscriber setup shared by the peermon binaries and test suites.

use std::env::var;

use tracing::{level_filters::LevelFilter, warn};
use tracing_subscriber::{
    Layer, filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
    util::TryInitError,
};

/// Install the global subscriber at `INFO`, overridable through `RUST_LOG`.
///
/// Panics if a subscriber is already installed; use [`try_init`] when that
/// can happen (tests).
pub fn init() {
    init_with_level(LevelFilter::INFO);
}

/// Install the global subscriber with the given default level.
pub fn init_with_level(level: LevelFilter) {
    if let Err(error) = install(level, false) {
        panic!("failed to install tracing subscriber: {error}");
    }
}

/// Test-friendly install at `DEBUG` through the test writer. Returns an
/// error instead of panicking when a subscriber is already set.
pub fn try_init() -> Result<(), TryInitError> {
    install(LevelFilter::DEBUG, true)
}

fn install(level: LevelFilter, test_writer: bool) -> Result<(), TryInitError> {
    let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

    let log_format = var("RUST_LOG_FORMAT")
        .inspect_err(|error| {
            warn!("Failed to read RUST_LOG_FORMAT, falling back to default: {error}")
        })
        .unwrap_or_default();

    let log_layer = match (log_format.as_str(), test_writer) {
        ("json", _) => tracing_subscriber::fmt::layer().json().with_filter(env_filter).boxed(),
        (_, true) => tracing_subscriber::fmt::layer()
            .compact()
            .with_test_writer()
            .with_filter(env_filter)
            .boxed(),
        (_, false) => tracing_subscriber::fmt::layer()
            .compact()
            .without_time()
            .with_filter(env_filter)
            .boxed(),
    };

    tracing_subscriber::registry().with(log_layer).try_init()
}
