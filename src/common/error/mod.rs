//! Unified error types for the markrev library.
//!
//! This module provides a single error type for the resolver and every
//! document session, so host-call failures reach the caller unchanged.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
