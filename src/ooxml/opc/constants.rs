/// Constant values related to the Open Packaging Convention.
///
/// This module contains the relationship types and well-known member names
/// needed to find the parts of a WordprocessingML package.

/// Open XML relationship types
pub mod relationship_type {
    /// Package-level relationship to the main document part
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

    /// Strict Open XML variant of `OFFICE_DOCUMENT`
    pub const OFFICE_DOCUMENT_STRICT: &str =
        "http://purl.oclc.org/ooxml/officeDocument/relationships/officeDocument";

    /// Document-level relationship to the settings part
    pub const SETTINGS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings";

    /// Strict Open XML variant of `SETTINGS`
    pub const SETTINGS_STRICT: &str =
        "http://purl.oclc.org/ooxml/officeDocument/relationships/settings";
}

/// Relationship target modes
pub mod target_mode {
    /// External relationship target mode (e.g., hyperlinks to external URLs)
    pub const EXTERNAL: &str = "External";
}

/// Member names inside the ZIP container
pub mod member {
    /// Package relationships
    pub const PACKAGE_RELS: &str = "_rels/.rels";

    /// Conventional location of the main document part
    pub const DEFAULT_DOCUMENT: &str = "word/document.xml";

    /// Conventional location of the settings part
    pub const DEFAULT_SETTINGS: &str = "word/settings.xml";
}
