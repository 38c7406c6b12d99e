//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or ClientConfig::default()
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → copied into the client and its dispatcher
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so tests rarely need a config at all
//! - Validation separates syntactic (serde) from semantic checks
//! - Timeouts and redirect policy are per-request and never live here

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::ClientConfig;
