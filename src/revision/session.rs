/// The host document a resolver works against.
///
/// A session owns the live revision list. Accepting or rejecting a revision
/// removes it from that list, which shifts the index of every later
/// revision, so indices are only valid until the next mutation.
use super::color::WdColorIndex;
use super::kind::RevisionKind;
use crate::common::error::Result;
use chrono::{DateTime, NaiveDateTime, Utc};

/// A tracked change (revision) as reported by a session.
///
/// Records are snapshots: they are built by the session on request and do
/// not follow the live list when it changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionRecord {
    /// Author who made the change
    author: String,

    /// Date/time of the change (ISO 8601 format)
    date: Option<String>,

    /// Text content affected by this revision
    text: String,

    /// 1-based position in the live revision list
    index: usize,

    /// Type of revision
    kind: RevisionKind,
}

impl RevisionRecord {
    /// Create a new RevisionRecord.
    #[inline]
    pub fn new(index: usize, kind: impl Into<RevisionKind>, author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            date: None,
            text: String::new(),
            index,
            kind: kind.into(),
        }
    }

    /// Attach the date of the change.
    #[inline]
    pub fn with_date(mut self, date: Option<String>) -> Self {
        self.date = date;
        self
    }

    /// Attach the affected text.
    #[inline]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Get the 1-based position in the live revision list.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

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

    /// Get the date/time of the change.
    #[inline]
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    /// Date/time of the change, if present and in ISO 8601 form.
    ///
    /// Word writes dates without an offset (`2024-11-05T10:30:00Z` or
    /// `2024-11-05T10:30:00`); the latter is read as UTC.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let date = self.date.as_deref()?;
        DateTime::parse_from_rfc3339(date)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.and_utc()))
            .ok()
    }

    /// Get the text content affected by this revision.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A document whose tracked changes can be inspected and resolved.
///
/// All indices are 1-based positions in the live revision list. Failures
/// are host-call failures and are fatal for the current traversal.
pub trait DocumentSession {
    /// Number of revisions currently pending.
    fn revision_count(&self) -> Result<usize>;

    /// Snapshot of the revision at `index`.
    fn revision(&self, index: usize) -> Result<RevisionRecord>;

    /// Accept the revision at `index`, removing it from the live list.
    fn accept(&mut self, index: usize) -> Result<()>;

    /// Reject the revision at `index`, removing it from the live list.
    fn reject(&mut self, index: usize) -> Result<()>;

    /// Set the font color of the text covered by the revision at `index`.
    fn set_font_color(&mut self, index: usize, color: WdColorIndex) -> Result<()>;

    /// Enable or disable strikethrough on the text covered by the revision at
    /// `index`.
    fn set_strikethrough(&mut self, index: usize, enabled: bool) -> Result<()>;

    /// Whether edits are currently recorded as revisions.
    fn track_revisions(&self) -> Result<bool>;

    /// Turn revision tracking on or off.
    fn set_track_revisions(&mut self, enabled: bool) -> Result<()>;

    /// Snapshot of every pending revision, in document order.
    fn revisions(&self) -> Result<Vec<RevisionRecord>> {
        (1..=self.revision_count()?).map(|i| self.revision(i)).collect()
    }
}
