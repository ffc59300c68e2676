/// Revision type enumerations.
///
/// The numeric codes match the VBA `WdRevisionType` enumeration, so raw
/// values read from any Word-compatible source classify the same way.
use std::fmt;

/// Specifies the type of a tracked change.
///
/// Corresponds to the VBA `WdRevisionType` enumeration.
///
/// # Examples
///
/// ```rust
/// use markrev::revision::WdRevisionType;
///
/// assert_eq!(WdRevisionType::from_raw(8), Some(WdRevisionType::Style));
/// assert_eq!(WdRevisionType::Style.name(), "Style");
/// assert_eq!(WdRevisionType::from_raw(99), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum WdRevisionType {
    /// No revision.
    NoRevision = 0,
    /// Insertion.
    Insert = 1,
    /// Deletion.
    Delete = 2,
    /// Property changed.
    Property = 3,
    /// Paragraph number changed.
    ParagraphNumber = 4,
    /// Field display changed.
    DisplayField = 5,
    /// Revision marked as reconciled conflict.
    Reconcile = 6,
    /// Revision marked as a conflict.
    Conflict = 7,
    /// Style changed.
    Style = 8,
    /// Replaced.
    Replace = 9,
    /// Paragraph property changed.
    ParagraphProperty = 10,
    /// Table property changed.
    TableProperty = 11,
    /// Section property changed.
    SectionProperty = 12,
    /// Style definition changed.
    StyleDefinition = 13,
    /// Content moved from.
    MovedFrom = 14,
    /// Content moved to.
    MovedTo = 15,
    /// Table cell inserted.
    CellInsertion = 16,
    /// Table cell deleted.
    CellDeletion = 17,
    /// Table cells merged.
    CellMerge = 18,
    /// Table cells split.
    CellSplit = 19,
    /// Conflicting insertion.
    ConflictInsert = 20,
    /// Conflicting deletion.
    ConflictDelete = 21,
}

impl WdRevisionType {
    /// All revision types, in code order.
    pub const ALL: [Self; 22] = [
        Self::NoRevision,
        Self::Insert,
        Self::Delete,
        Self::Property,
        Self::ParagraphNumber,
        Self::DisplayField,
        Self::Reconcile,
        Self::Conflict,
        Self::Style,
        Self::Replace,
        Self::ParagraphProperty,
        Self::TableProperty,
        Self::SectionProperty,
        Self::StyleDefinition,
        Self::MovedFrom,
        Self::MovedTo,
        Self::CellInsertion,
        Self::CellDeletion,
        Self::CellMerge,
        Self::CellSplit,
        Self::ConflictInsert,
        Self::ConflictDelete,
    ];

    /// Look up a revision type by its `WdRevisionType` code.
    ///
    /// Returns `None` if the value is not recognized.
    #[inline]
    pub fn from_raw(raw: i32) -> Option<Self> {
        usize::try_from(raw)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Get the `WdRevisionType` code.
    #[inline]
    pub const fn raw(self) -> i32 {
        self as i32
    }

    /// Human-readable name used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::NoRevision => "No Revision",
            Self::Insert => "Insert",
            Self::Delete => "Delete",
            Self::Property => "Property",
            Self::ParagraphNumber => "Paragraph Number",
            Self::DisplayField => "Display Field",
            Self::Reconcile => "Reconcile",
            Self::Conflict => "Conflict",
            Self::Style => "Style",
            Self::Replace => "Replace",
            Self::ParagraphProperty => "Paragraph Property",
            Self::TableProperty => "Table Property",
            Self::SectionProperty => "Section Property",
            Self::StyleDefinition => "Style Definition",
            Self::MovedFrom => "Moved From",
            Self::MovedTo => "Moved To",
            Self::CellInsertion => "Cell Insertion",
            Self::CellDeletion => "Cell Deletion",
            Self::CellMerge => "Cell Merge",
            Self::CellSplit => "Cell Split",
            Self::ConflictInsert => "Conflict Insert",
            Self::ConflictDelete => "Conflict Delete",
        }
    }
}

impl fmt::Display for WdRevisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of a revision record as reported by a host document.
///
/// Hosts may report type codes this crate does not know about; those are
/// kept verbatim so they can be reported rather than guessed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevisionKind {
    /// A known `WdRevisionType`.
    Known(WdRevisionType),
    /// A raw type code outside `WdRevisionType`.
    Unrecognized(i32),
}

impl RevisionKind {
    /// Classify a raw type code.
    #[inline]
    pub fn from_raw(raw: i32) -> Self {
        WdRevisionType::from_raw(raw).map_or(Self::Unrecognized(raw), Self::Known)
    }

    /// Get the raw type code.
    #[inline]
    pub const fn raw(self) -> i32 {
        match self {
            Self::Known(t) => t.raw(),
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Get the known revision type, if any.
    #[inline]
    pub const fn known(self) -> Option<WdRevisionType> {
        match self {
            Self::Known(t) => Some(t),
            Self::Unrecognized(_) => None,
        }
    }
}

impl From<WdRevisionType> for RevisionKind {
    #[inline]
    fn from(t: WdRevisionType) -> Self {
        Self::Known(t)
    }
}

impl fmt::Display for RevisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(t) => write!(f, "{}", t),
            Self::Unrecognized(raw) => write!(f, "{}", raw),
        }
    }
}
