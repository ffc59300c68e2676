/// Revision resolution.
///
/// This module converts tracked changes into marked revisions: insertions
/// are colored and accepted, deletions are either accepted or struck through
/// and rejected, and every other kind of change is left in place with a
/// diagnostic line.
///
/// # Architecture
///
/// - `DocumentSession`: the host document and its live revision list
/// - `ResolutionPolicy`: which author's changes to resolve and how to mark them
/// - `plan`: pure decision for one revision
/// - `Resolver`: lazy traversal applying the decisions, one step per revision
/// - `TrackingGuard`: keeps the track-changes flag off during traversal and
///   restores it afterwards
/// - `MemoryDocument`: session backed by a plain vector
///
/// # Example
///
/// ```rust
/// use markrev::revision::{MemoryDocument, ResolutionPolicy, Resolver, WdRevisionType};
///
/// let mut doc = MemoryDocument::new()
///     .with_revision(WdRevisionType::Insert, "Alice", "added")
///     .with_revision(WdRevisionType::Style, "Alice", "");
///
/// let mut diagnostics = Vec::new();
/// let policy = ResolutionPolicy::new().with_strike_deletions(true);
/// for step in Resolver::with_sink(&mut doc, &policy, &mut diagnostics)? {
///     let done = step?;
///     println!("processed {}", done);
/// }
/// assert_eq!(diagnostics[0].to_string(), "Unhandled revision: Style");
/// # Ok::<(), markrev::Error>(())
/// ```
pub mod color;
pub mod diagnostic;
pub mod kind;
pub mod memory;
pub mod policy;
pub mod resolver;
pub mod session;

pub use color::WdColorIndex;
pub use diagnostic::{Diagnostic, DiagnosticSink, StderrSink};
pub use kind::{RevisionKind, WdRevisionType};
pub use memory::{MemoryDocument, MemoryRevision, Resolution};
pub use policy::{Action, ResolutionPolicy, plan};
pub use resolver::{Resolver, TrackingGuard, resolve};
pub use session::{DocumentSession, RevisionRecord};
