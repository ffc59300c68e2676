//! Markrev - convert tracked changes into marked revisions
//!
//! This library walks the tracked changes (revisions) of a word-processing
//! document and resolves them according to a policy: insertions are colored
//! and accepted, deletions are accepted or struck through and rejected, and
//! every change that has no safe generic resolution is reported and left in
//! place.
//!
//! # Features
//!
//! - **Resolver**: lazy, step-per-revision traversal suitable for progress bars
//! - **Scoped tracking**: the document's track-changes flag is restored on
//!   every exit path, including early termination
//! - **Any source**: works against the `DocumentSession` trait
//! - **DOCX support**: reads and rewrites WordprocessingML tracked changes
//!   (`ooxml` feature, enabled by default)
//!
//! # Example - Marking revisions in a DOCX file
//!
//! ```no_run
//! use markrev::ooxml::docx::DocxSession;
//! use markrev::revision::{resolve, ResolutionPolicy};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut doc = DocxSession::open("input.docx")?;
//! let policy = ResolutionPolicy::new().with_strike_deletions(true);
//!
//! let mut resolver = resolve(&mut doc, &policy)?;
//! let total = resolver.total();
//! for step in resolver.by_ref() {
//!     let done = step?;
//!     print!("\rMarking... {:.0}%", 100.0 * done as f64 / total as f64);
//! }
//! drop(resolver);
//!
//! doc.save("output.docx")?;
//! # Ok(())
//! # }
//! ```

/// Common types shared across the crate
pub mod common;

/// Revision resolution: policy, resolver and the session trait
pub mod revision;

/// OOXML (Office Open XML) document sessions
///
/// This module provides a `DocumentSession` over Word (.docx) files.
#[cfg(feature = "ooxml")]
pub mod ooxml;

pub use common::{Error, Result};
pub use revision::{DocumentSession, ResolutionPolicy, Resolver, resolve};
