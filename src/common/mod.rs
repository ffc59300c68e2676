//! Common types shared by the resolver and the document sessions.

// Submodule declarations
pub mod error;

// Re-exports for convenience
pub use error::{Error, Result};
