/// Resolution policy and the per-record decision it implies.
///
/// The decision is a pure function of the record's kind and author and the
/// policy, so it can be tested without any document at all.
use super::color::WdColorIndex;
use super::kind::{RevisionKind, WdRevisionType};
use crate::common::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration controlling which revisions are resolved and how they are
/// marked.
///
/// # Examples
///
/// ```rust
/// use markrev::revision::{ResolutionPolicy, WdColorIndex};
///
/// // Resolve everyone's changes, marking them blue
/// let policy = ResolutionPolicy::default();
///
/// // Or restrict to one author, strike deletions in red
/// let policy = ResolutionPolicy::new()
///     .with_target_author("Alice")
///     .with_color(WdColorIndex::Red)
///     .with_strike_deletions(true);
/// assert_eq!(policy.mark_color(), WdColorIndex::Red);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolutionPolicy {
    /// Only resolve revisions made by this author
    pub target_author: Option<String>,
    /// Color for accepted insertions and struck deletions (blue if unset)
    pub color_override: Option<WdColorIndex>,
    /// Strike deletions through and reject them instead of accepting them
    pub strike_deletions: bool,
}

impl ResolutionPolicy {
    /// Create a policy with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict resolution to revisions by `author`.
    #[inline]
    pub fn with_target_author(mut self, author: impl Into<String>) -> Self {
        self.target_author = Some(author.into());
        self
    }

    /// Set the marking color.
    #[inline]
    pub fn with_color(mut self, color: WdColorIndex) -> Self {
        self.color_override = Some(color);
        self
    }

    /// Set whether deletions are struck through and rejected.
    #[inline]
    pub fn with_strike_deletions(mut self, strike: bool) -> Self {
        self.strike_deletions = strike;
        self
    }

    /// Color applied to resolved text.
    #[inline]
    pub fn mark_color(&self) -> WdColorIndex {
        self.color_override.unwrap_or_default()
    }

    /// Whether a revision by `author` is in scope for this policy.
    #[inline]
    pub fn covers(&self, author: &str) -> bool {
        self.target_author.as_deref().is_none_or(|target| target == author)
    }

    /// Parse a policy from YAML.
    ///
    /// Missing fields take their default values; unknown fields are an error.
    ///
    /// ```rust
    /// use markrev::revision::{ResolutionPolicy, WdColorIndex};
    ///
    /// let policy = ResolutionPolicy::from_yaml("color_override: dark_red\n").unwrap();
    /// assert_eq!(policy.mark_color(), WdColorIndex::DarkRed);
    /// assert!(!policy.strike_deletions);
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_saphyr::from_str(yaml).map_err(|e| Error::Policy(e.to_string()))
    }

    /// Load a policy from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Serialize the policy to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self)
            .map_err(|e| Error::Policy(format!("Failed to serialize policy to YAML: {}", e)))
    }
}

/// What the resolver does with one revision record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Out of scope for the policy: leave it alone, report nothing.
    Skip,
    /// Accept the revision as is (finalizes a deletion).
    Accept,
    /// Color the text, then accept (finalizes an insertion).
    ColorAndAccept(WdColorIndex),
    /// Color the text, strike it through, then reject (restores a deletion
    /// as visibly struck text).
    StrikeAndReject(WdColorIndex),
    /// Known kind with no safe generic resolution.
    Unhandled(WdRevisionType),
    /// Type code outside `WdRevisionType`.
    Unexpected(i32),
}

impl Action {
    /// Whether this action mutates the document.
    #[inline]
    pub fn mutates(self) -> bool {
        matches!(
            self,
            Self::Accept | Self::ColorAndAccept(_) | Self::StrikeAndReject(_)
        )
    }
}

/// Decide how to handle one revision.
///
/// ```rust
/// use markrev::revision::{plan, Action, ResolutionPolicy, RevisionKind, WdColorIndex, WdRevisionType};
///
/// let policy = ResolutionPolicy::default();
/// let kind = RevisionKind::Known(WdRevisionType::Insert);
/// assert_eq!(plan(kind, "Bob", &policy), Action::ColorAndAccept(WdColorIndex::Blue));
/// ```
pub fn plan(kind: RevisionKind, author: &str, policy: &ResolutionPolicy) -> Action {
    if !policy.covers(author) {
        return Action::Skip;
    }

    match kind {
        RevisionKind::Known(WdRevisionType::Delete) if policy.strike_deletions => {
            Action::StrikeAndReject(policy.mark_color())
        },
        RevisionKind::Known(WdRevisionType::Delete) => Action::Accept,
        RevisionKind::Known(WdRevisionType::Insert) => Action::ColorAndAccept(policy.mark_color()),
        RevisionKind::Known(other) => Action::Unhandled(other),
        RevisionKind::Unrecognized(raw) => Action::Unexpected(raw),
    }
}
