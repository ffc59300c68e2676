/// Track changes (revisions) markup in DOCX documents.
///
/// This module finds tracked changes in the main document part and describes
/// what accepting or rejecting each one means for the markup. Tracked changes
/// record insertions, deletions, moves, and formatting changes made by
/// document editors.
///
/// # Architecture
///
/// - `RevisionMarkup`: the WordprocessingML element a change is stored in
/// - `RevisionSpan`: one change located in the part's event list
/// - `Finalize`: how the markup is rewritten when a change is resolved
///
/// # Example XML Structure
///
/// ```xml
/// <w:p>
///   <w:r>
///     <w:t>Normal text</w:t>
///   </w:r>
///   <w:ins w:id="0" w:author="John Doe" w:date="2024-11-05T10:30:00Z">
///     <w:r>
///       <w:t>inserted text</w:t>
///     </w:r>
///   </w:ins>
///   <w:del w:id="1" w:author="Jane Smith" w:date="2024-11-05T11:00:00Z">
///     <w:r>
///       <w:delText>deleted text</w:delText>
///     </w:r>
///   </w:del>
/// </w:p>
/// ```
use super::xml_part::XmlPart;
use crate::ooxml::error::Result;
use crate::revision::WdRevisionType;
use std::fmt;

/// Element holding a tracked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionMarkup {
    /// `w:ins`: inserted runs, paragraph mark or table row
    Insert,
    /// `w:del`: deleted runs, paragraph mark or table row
    Delete,
    /// `w:moveFrom`: source of moved content
    MoveFrom,
    /// `w:moveTo`: destination of moved content
    MoveTo,
    /// `w:rPrChange`: run formatting change
    RunPropertyChange,
    /// `w:pPrChange`: paragraph formatting change
    ParagraphPropertyChange,
    /// `w:sectPrChange`: section formatting change
    SectionPropertyChange,
    /// `w:tblPrChange`, `w:tblPrExChange`, `w:tblGridChange`, `w:trPrChange`
    /// or `w:tcPrChange`: table formatting change
    TablePropertyChange,
    /// `w:cellIns`: inserted table cell
    CellInsert,
    /// `w:cellDel`: deleted table cell
    CellDelete,
    /// `w:cellMerge`: merged table cells
    CellMerge,
    /// `w:numberingChange`: paragraph numbering change
    NumberingChange,
}

/// How the markup of a change is rewritten when it is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finalize {
    /// Keep the changed content, dropping the revision element's tags.
    KeepContent,
    /// Drop the revision element together with its content.
    DropContent,
    /// Drop the revision marker, keeping the current formatting.
    DropMarker,
    /// No faithful rewrite exists.
    Unsupported,
}

impl RevisionMarkup {
    /// Classify an element by local name.
    pub fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"ins" => Some(Self::Insert),
            b"del" => Some(Self::Delete),
            b"moveFrom" => Some(Self::MoveFrom),
            b"moveTo" => Some(Self::MoveTo),
            b"rPrChange" => Some(Self::RunPropertyChange),
            b"pPrChange" => Some(Self::ParagraphPropertyChange),
            b"sectPrChange" => Some(Self::SectionPropertyChange),
            b"tblPrChange" | b"tblPrExChange" | b"tblGridChange" | b"trPrChange"
            | b"tcPrChange" => Some(Self::TablePropertyChange),
            b"cellIns" => Some(Self::CellInsert),
            b"cellDel" => Some(Self::CellDelete),
            b"cellMerge" => Some(Self::CellMerge),
            b"numberingChange" => Some(Self::NumberingChange),
            _ => None,
        }
    }

    /// The revision type Word reports for this markup.
    pub const fn kind(self) -> WdRevisionType {
        match self {
            Self::Insert => WdRevisionType::Insert,
            Self::Delete => WdRevisionType::Delete,
            Self::MoveFrom => WdRevisionType::MovedFrom,
            Self::MoveTo => WdRevisionType::MovedTo,
            Self::RunPropertyChange => WdRevisionType::Property,
            Self::ParagraphPropertyChange => WdRevisionType::ParagraphProperty,
            Self::SectionPropertyChange => WdRevisionType::SectionProperty,
            Self::TablePropertyChange => WdRevisionType::TableProperty,
            Self::CellInsert => WdRevisionType::CellInsertion,
            Self::CellDelete => WdRevisionType::CellDeletion,
            Self::CellMerge => WdRevisionType::CellMerge,
            Self::NumberingChange => WdRevisionType::ParagraphNumber,
        }
    }

    /// Rewrite applied when the change is accepted.
    pub const fn on_accept(self) -> Finalize {
        match self {
            Self::Insert | Self::MoveTo => Finalize::KeepContent,
            Self::Delete | Self::MoveFrom => Finalize::DropContent,
            Self::RunPropertyChange
            | Self::ParagraphPropertyChange
            | Self::SectionPropertyChange
            | Self::TablePropertyChange
            | Self::NumberingChange
            | Self::CellInsert => Finalize::DropMarker,
            Self::CellDelete | Self::CellMerge => Finalize::Unsupported,
        }
    }

    /// Rewrite applied when the change is rejected.
    pub const fn on_reject(self) -> Finalize {
        match self {
            Self::Insert | Self::MoveTo => Finalize::DropContent,
            Self::Delete | Self::MoveFrom => Finalize::KeepContent,
            _ => Finalize::Unsupported,
        }
    }

    /// Whether the content of this markup is deleted text (`w:delText`).
    #[inline]
    pub const fn holds_deleted_text(self) -> bool {
        matches!(self, Self::Delete | Self::MoveFrom)
    }
}

impl fmt::Display for RevisionMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => write!(f, "Insert"),
            Self::Delete => write!(f, "Delete"),
            Self::MoveFrom => write!(f, "Move From"),
            Self::MoveTo => write!(f, "Move To"),
            Self::RunPropertyChange => write!(f, "Run Property Change"),
            Self::ParagraphPropertyChange => write!(f, "Paragraph Property Change"),
            Self::SectionPropertyChange => write!(f, "Section Property Change"),
            Self::TablePropertyChange => write!(f, "Table Property Change"),
            Self::CellInsert => write!(f, "Cell Insert"),
            Self::CellDelete => write!(f, "Cell Delete"),
            Self::CellMerge => write!(f, "Cell Merge"),
            Self::NumberingChange => write!(f, "Numbering Change"),
        }
    }
}

/// A tracked change located in an [`XmlPart`].
///
/// # Field Ordering
///
/// Fields are ordered to maximize CPU cache line utilization:
/// - Strings (24 bytes each on 64-bit systems)
/// - Indices, enums and smaller types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionSpan {
    /// Author who made the change
    pub author: String,
    /// Revision ID
    pub id: String,
    /// Date/time of the change (ISO 8601 format)
    pub date: Option<String>,
    /// Index of the revision element's start event
    pub start: usize,
    /// Index of the revision element's end event (equal to `start` for
    /// empty markers)
    pub end: usize,
    /// Element holding the change
    pub markup: RevisionMarkup,
}

impl RevisionSpan {
    /// Whether the change is an empty marker (paragraph mark, table row or
    /// cell) rather than a container of runs.
    #[inline]
    pub fn is_marker(&self) -> bool {
        self.start == self.end
    }

    /// Text affected by the change, including deleted text.
    pub fn text(&self, part: &XmlPart) -> String {
        part.text_between(self.start, self.end, &[b"t", b"delText"])
    }
}

/// Find every tracked change in a part, in document order.
///
/// Changes nested in other changes (text inserted by one author and
/// deleted by another) are listed after their container.
pub(crate) fn scan_revisions(part: &XmlPart) -> Result<Vec<RevisionSpan>> {
    let mut spans = Vec::new();

    for i in 0..part.len() {
        let Some(element) = part.element(i) else {
            continue;
        };
        let Some(markup) = RevisionMarkup::from_local_name(element.local_name().as_ref()) else {
            continue;
        };

        let mut author = String::new();
        let mut date = None;
        let mut id = String::new();

        for attr in element.attributes().flatten() {
            match attr.key.local_name().as_ref() {
                b"author" => author = attr.unescape_value()?.into_owned(),
                b"date" => date = Some(attr.unescape_value()?.into_owned()),
                b"id" => id = attr.unescape_value()?.into_owned(),
                _ => {},
            }
        }

        spans.push(RevisionSpan {
            author,
            id,
            date,
            start: i,
            end: part.matching_end(i)?,
            markup,
        });
    }

    Ok(spans)
}
