//! Unified error types for the markrev library.
use thiserror::Error;

/// Main error type for markrev operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid file format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Stream or part not found
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    XmlError(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// A revision index outside the live revision list.
    ///
    /// Indices are 1-based and shift whenever a revision is accepted or
    /// rejected, so stale indices surface here.
    #[error("Revision {index} out of range (document has {count} revisions)")]
    RevisionOutOfRange { index: usize, count: usize },

    /// Operation the session cannot perform for this revision
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Invalid resolution policy
    #[error("Invalid policy: {0}")]
    Policy(String),

    /// Failure reported by an external document session
    #[error("Session error: {0}")]
    Session(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wrap a failure from an external host session.
    pub fn session<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Session(err.into())
    }
}

/// Result type for markrev operations.
pub type Result<T> = std::result::Result<T, Error>;
