/// In-memory document session.
///
/// Holds a plain list of revisions with the same live-list semantics as a
/// real document: resolving a revision takes it out of the pending list and
/// shifts later indices down by one. Useful for revision lists parsed from
/// other formats and for exercising resolvers.
use super::color::WdColorIndex;
use super::kind::RevisionKind;
use super::session::{DocumentSession, RevisionRecord};
use crate::common::error::{Error, Result};

/// How a revision was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The change was made permanent.
    Accepted,
    /// The change was undone.
    Rejected,
}

/// A revision held by a [`MemoryDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRevision {
    author: String,
    text: String,
    kind: RevisionKind,
    color: Option<WdColorIndex>,
    strikethrough: bool,
    resolution: Option<Resolution>,
}

impl MemoryRevision {
    /// Get the revision kind.
    #[inline]
    pub fn kind(&self) -> RevisionKind {
        self.kind
    }

    /// Get the author who made the change.
    #[inline]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Get the affected text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Font color applied to the text, if any.
    #[inline]
    pub fn color(&self) -> Option<WdColorIndex> {
        self.color
    }

    /// Whether the text is struck through.
    #[inline]
    pub fn strikethrough(&self) -> bool {
        self.strikethrough
    }

    /// How the revision was resolved, or `None` while pending.
    #[inline]
    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    /// Whether the affected text is still part of the document.
    ///
    /// Pending revisions keep their text; resolved insertions keep it only
    /// when accepted, resolved deletions only when rejected.
    pub fn is_retained(&self) -> bool {
        use super::kind::WdRevisionType::{Delete, Insert};

        match (self.kind, self.resolution) {
            (_, None) => true,
            (RevisionKind::Known(Insert), Some(r)) => r == Resolution::Accepted,
            (RevisionKind::Known(Delete), Some(r)) => r == Resolution::Rejected,
            (_, Some(_)) => true,
        }
    }
}

/// A document session backed by a vector of revisions.
///
/// # Examples
///
/// ```rust
/// use markrev::revision::{DocumentSession, MemoryDocument, WdRevisionType};
///
/// let mut doc = MemoryDocument::new()
///     .with_revision(WdRevisionType::Insert, "Alice", "hello")
///     .with_revision(WdRevisionType::Delete, "Bob", "world");
///
/// doc.accept(1)?;
/// assert_eq!(doc.revision_count()?, 1);
/// assert_eq!(doc.revision(1)?.author(), "Bob");
/// # Ok::<(), markrev::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    revisions: Vec<MemoryRevision>,
    track_revisions: bool,
    mutation_calls: usize,
}

impl MemoryDocument {
    /// Create an empty document with tracking off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial track-changes flag.
    pub fn with_track_revisions(mut self, enabled: bool) -> Self {
        self.track_revisions = enabled;
        self
    }

    /// Append a revision.
    pub fn with_revision(
        self,
        kind: impl Into<RevisionKind>,
        author: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.push_revision(kind.into(), author.into(), text.into())
    }

    /// Append a revision by raw `WdRevisionType` code.
    pub fn with_raw_revision(self, raw: i32, author: impl Into<String>, text: impl Into<String>) -> Self {
        self.push_revision(RevisionKind::from_raw(raw), author.into(), text.into())
    }

    fn push_revision(mut self, kind: RevisionKind, author: String, text: String) -> Self {
        self.revisions.push(MemoryRevision {
            author,
            text,
            kind,
            color: None,
            strikethrough: false,
            resolution: None,
        });
        self
    }

    /// Revisions still pending, in document order.
    pub fn pending(&self) -> Vec<&MemoryRevision> {
        self.revisions.iter().filter(|r| r.resolution.is_none()).collect()
    }

    /// Revisions that have been accepted or rejected, in document order.
    pub fn resolved(&self) -> Vec<&MemoryRevision> {
        self.revisions.iter().filter(|r| r.resolution.is_some()).collect()
    }

    /// Text that is still part of the document, in document order.
    pub fn retained_text(&self) -> String {
        self.revisions
            .iter()
            .filter(|r| r.is_retained())
            .map(|r| r.text.as_str())
            .collect()
    }

    /// Number of accept, reject, color and strikethrough calls made so far.
    #[inline]
    pub fn mutation_calls(&self) -> usize {
        self.mutation_calls
    }

    /// Position in `revisions` of the pending revision at live `index`.
    fn slot(&self, index: usize) -> Result<usize> {
        let count = self.revision_count()?;
        if index == 0 || index > count {
            return Err(Error::RevisionOutOfRange { index, count });
        }
        self.revisions
            .iter()
            .enumerate()
            .filter(|(_, r)| r.resolution.is_none())
            .nth(index - 1)
            .map(|(slot, _)| slot)
            .ok_or(Error::RevisionOutOfRange { index, count })
    }

    fn pending_mut(&mut self, index: usize) -> Result<&mut MemoryRevision> {
        let slot = self.slot(index)?;
        self.mutation_calls += 1;
        Ok(&mut self.revisions[slot])
    }
}

impl DocumentSession for MemoryDocument {
    fn revision_count(&self) -> Result<usize> {
        Ok(self.revisions.iter().filter(|r| r.resolution.is_none()).count())
    }

    fn revision(&self, index: usize) -> Result<RevisionRecord> {
        let r = &self.revisions[self.slot(index)?];
        Ok(RevisionRecord::new(index, r.kind, r.author.as_str()).with_text(r.text.as_str()))
    }

    fn accept(&mut self, index: usize) -> Result<()> {
        self.pending_mut(index)?.resolution = Some(Resolution::Accepted);
        Ok(())
    }

    fn reject(&mut self, index: usize) -> Result<()> {
        self.pending_mut(index)?.resolution = Some(Resolution::Rejected);
        Ok(())
    }

    fn set_font_color(&mut self, index: usize, color: WdColorIndex) -> Result<()> {
        self.pending_mut(index)?.color = Some(color);
        Ok(())
    }

    fn set_strikethrough(&mut self, index: usize, enabled: bool) -> Result<()> {
        self.pending_mut(index)?.strikethrough = enabled;
        Ok(())
    }

    fn track_revisions(&self) -> Result<bool> {
        Ok(self.track_revisions)
    }

    fn set_track_revisions(&mut self, enabled: bool) -> Result<()> {
        self.track_revisions = enabled;
        Ok(())
    }
}
