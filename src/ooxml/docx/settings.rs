/// Document settings support.
///
/// This module reads and writes the track-changes flag
/// (`w:trackRevisions`) of a settings.xml part, leaving every other setting
/// untouched.
use super::xml_part::{XmlPart, empty_element};
use crate::ooxml::error::{OoxmlError, Result};

/// `CT_Settings` children that must precede `w:trackRevisions`.
const PRECEDING: &[&[u8]] = &[
    b"writeProtection",
    b"view",
    b"zoom",
    b"removePersonalInformation",
    b"removeDateAndTime",
    b"doNotDisplayPageBoundaries",
    b"displayBackgroundShape",
    b"printPostScriptOverText",
    b"printFractionalCharacterWidth",
    b"printFormsData",
    b"embedTrueTypeFonts",
    b"embedSystemFonts",
    b"saveSubsetFonts",
    b"saveFormsData",
    b"mirrorMargins",
    b"alignBordersAndEdges",
    b"bordersDoNotSurroundHeader",
    b"bordersDoNotSurroundFooter",
    b"gutterAtTop",
    b"hideSpellingErrors",
    b"hideGrammaticalErrors",
    b"activeWritingStyle",
    b"proofState",
    b"formsDesign",
    b"attachedTemplate",
    b"linkStyles",
    b"stylePaneFormatFilter",
    b"stylePaneSortMethod",
    b"documentType",
    b"mailMerge",
    b"revisionView",
];

/// An editable settings.xml part.
///
/// # Examples
///
/// ```rust
/// use markrev::ooxml::docx::SettingsPart;
///
/// let mut settings = SettingsPart::parse(br#"<w:settings><w:zoom w:percent="100"/></w:settings>"#)?;
/// assert!(!settings.track_revisions()?);
///
/// settings.set_track_revisions(true)?;
/// assert!(settings.track_revisions()?);
/// # Ok::<(), markrev::ooxml::OoxmlError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SettingsPart {
    xml: XmlPart,
}

impl SettingsPart {
    /// Parse a settings.xml part.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let xml = XmlPart::parse(xml)?;
        if xml.find(b"settings").is_none() {
            return Err(OoxmlError::InvalidFormat(
                "settings part has no settings element".to_string(),
            ));
        }
        Ok(Self { xml })
    }

    /// Serialize the part.
    #[inline]
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.xml.to_bytes()
    }

    fn root(&self) -> Result<usize> {
        self.xml
            .find(b"settings")
            .ok_or_else(|| OoxmlError::InvalidFormat("settings part has no settings element".to_string()))
    }

    /// Check if track revisions is enabled.
    ///
    /// The element alone means enabled; `w:val` may turn it off.
    pub fn track_revisions(&self) -> Result<bool> {
        let Some((start, _)) = self.xml.child(self.root()?, b"trackRevisions")? else {
            return Ok(false);
        };
        let Some(element) = self.xml.element(start) else {
            return Ok(false);
        };

        for attr in element.attributes().flatten() {
            if attr.key.local_name().as_ref() == b"val" {
                let val = attr.unescape_value()?;
                return Ok(matches!(val.as_ref(), "true" | "1" | "on"));
            }
        }
        Ok(true)
    }

    /// Turn track revisions on or off. Returns whether the part changed.
    pub fn set_track_revisions(&mut self, enabled: bool) -> Result<bool> {
        if self.track_revisions()? == enabled {
            return Ok(false);
        }

        let root = self.root()?;
        let existing: Vec<(usize, usize)> = self
            .xml
            .children(root)?
            .into_iter()
            .filter(|&(s, _)| self.xml.local_name(s) == Some(b"trackRevisions".as_slice()))
            .collect();
        for &(start, end) in existing.iter().rev() {
            self.xml.remove(start, end);
        }

        if enabled {
            let root_end = self.xml.expand(root)?;
            let at = self
                .xml
                .children(root)?
                .into_iter()
                .find(|&(s, _)| {
                    self.xml
                        .local_name(s)
                        .is_some_and(|name| !PRECEDING.contains(&name))
                })
                .map_or(root_end, |(s, _)| s);

            let element = match self.xml.element(root) {
                Some(like) => empty_element(like, "trackRevisions", &[]),
                None => return Err(OoxmlError::InvalidFormat("settings element lost".to_string())),
            };
            self.xml.insert(at, [element]);
        }

        Ok(true)
    }
}
