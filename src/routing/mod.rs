//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Test setup (once):
//!     RouteTable::builder()
//!     → .route(method, path, handler) in precedence order
//!     → .fallback(handler) appended last
//!     → Freeze as immutable RouteTable (shared via Arc)
//!
//! Per dispatch:
//!     (method, path)
//!     → router.rs (ordered scan)
//!     → matcher.rs (evaluate method AND path)
//!     → Return: matched Route or None
//! ```
//!
//! # Design Decisions
//! - Routes are immutable after build
//! - Deterministic: same input always matches same route
//! - First match wins (declaration order)

pub mod matcher;
pub mod router;

pub use matcher::{Matcher, MethodMatcher, PathMatcher};
pub use router::{Handler, Route, RouteTable, RouteTableBuilder};
