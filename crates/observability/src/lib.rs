//! Logging setup shared by the binary and tests.

/// Tracing subscriber configuration.
pub mod tracing;

pub use crate::tracing::init;
