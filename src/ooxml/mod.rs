//! Office Open XML (OOXML) format implementation.
//!
//! This module resolves tracked changes directly inside Word (.docx)
//! packages, without a running Office application.
//!
//! # Architecture
//!
//! The module is organized into two layers:
//!
//! 1. **OPC Layer** (`opc`): Low-level package handling (ZIP, relationships)
//! 2. **Format-Specific Modules**:
//!    - `docx`: Word documents, revisions and settings
//!
//! # Example: Listing tracked changes
//!
//! ```rust,no_run
//! use markrev::ooxml::docx::DocxSession;
//! use markrev::revision::DocumentSession;
//!
//! let doc = DocxSession::open("document.docx")?;
//! for revision in doc.revisions()? {
//!     println!("{} by {}: {}", revision.kind(), revision.author(), revision.text());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod docx;
pub mod error;
pub mod opc;

pub use docx::DocxSession;
pub use error::{OoxmlError, Result};
