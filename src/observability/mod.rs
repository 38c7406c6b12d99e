//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! dispatcher / stream pump produce:
//!     → tracing events (method, path, status, outcome)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → logging.rs test subscriber (RUST_LOG filtered)
//!     → whatever metrics recorder the test installs (none by default)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event, no formatted messages
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
