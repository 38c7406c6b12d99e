//! Structured logging.
//!
//! # Responsibilities
//! - Initialize a tracing subscriber for test binaries
//! - Honor `RUST_LOG`, falling back to a caller supplied filter
//!
//! # Design Decisions
//! - Output goes through the test writer so `cargo test` captures it
//! - Safe to call from every test; only the first call installs

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a fmt subscriber. Later calls are ignored.
pub fn init_logging(default_filter: &str) {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
