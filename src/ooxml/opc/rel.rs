/// Relationship parsing for OPC packages.
///
/// Relationships connect a source (the package or a part) to target parts.
/// They are stored in `_rels/*.rels` members next to their source.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::target_mode;
use quick_xml::Reader;
use quick_xml::events::Event;
use smallvec::SmallVec;

/// A single relationship from a `.rels` member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub r_id: String,
    /// Relationship type URI
    pub reltype: String,
    /// Target reference, relative to the source's directory
    pub target_ref: String,
    /// Whether the target lives outside the package
    pub external: bool,
}

impl Relationship {
    /// Resolve the target to a member name, relative to `base_dir` (the
    /// source's directory without leading slash, empty for the package).
    ///
    /// Returns `None` for external targets.
    pub fn target_member(&self, base_dir: &str) -> Option<String> {
        if self.external {
            return None;
        }
        Some(resolve_target(base_dir, &self.target_ref))
    }
}

/// Name of the relationships member for a source member.
///
/// For example, `word/_rels/document.xml.rels` for `word/document.xml`.
pub fn rels_member_for(source: &str) -> String {
    match source.rfind('/') {
        Some(pos) => format!("{}/_rels/{}.rels", &source[..pos], &source[pos + 1..]),
        None => format!("_rels/{}.rels", source),
    }
}

/// Directory portion of a member name, without trailing slash.
pub fn base_dir(member: &str) -> &str {
    member.rfind('/').map_or("", |pos| &member[..pos])
}

/// Resolve a relationship target against a base directory.
///
/// Absolute targets (leading slash) ignore the base; `.` and `..` segments
/// are normalized away.
pub fn resolve_target(base_dir: &str, target: &str) -> String {
    let joined = match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None if base_dir.is_empty() => target.to_string(),
        None => format!("{}/{}", base_dir, target),
    };

    let mut segments: SmallVec<[&str; 8]> = SmallVec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                segments.pop();
            },
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// Parse relationships XML.
pub fn parse_rels_xml(rels_xml: &[u8]) -> Result<SmallVec<[Relationship; 8]>> {
    let mut rels = SmallVec::new();
    let mut reader = Reader::from_reader(rels_xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"Relationship" {
                    let mut r_id = None;
                    let mut reltype = None;
                    let mut target_ref = None;
                    let mut external = false;

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => r_id = Some(attr.unescape_value()?.to_string()),
                            b"Type" => reltype = Some(attr.unescape_value()?.to_string()),
                            b"Target" => target_ref = Some(attr.unescape_value()?.to_string()),
                            b"TargetMode" => {
                                external = attr.unescape_value()? == target_mode::EXTERNAL;
                            },
                            _ => {},
                        }
                    }

                    if let (Some(r_id), Some(reltype), Some(target_ref)) = (r_id, reltype, target_ref) {
                        rels.push(Relationship {
                            r_id,
                            reltype,
                            target_ref,
                            external,
                        });
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(format!("Rels parse error: {}", e))),
            _ => {},
        }
        buf.clear();
    }

    Ok(rels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rels_member_for() {
        assert_eq!(rels_member_for("word/document.xml"), "word/_rels/document.xml.rels");
        assert_eq!(rels_member_for("document.xml"), "_rels/document.xml.rels");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("", "word/document.xml"), "word/document.xml");
        assert_eq!(resolve_target("word", "settings.xml"), "word/settings.xml");
        assert_eq!(resolve_target("word", "../customXml/item1.xml"), "customXml/item1.xml");
        assert_eq!(resolve_target("word", "/word/settings.xml"), "word/settings.xml");
        assert_eq!(resolve_target("word", "./theme/theme1.xml"), "word/theme/theme1.xml");
    }

    #[test]
    fn test_base_dir() {
        assert_eq!(base_dir("word/document.xml"), "word");
        assert_eq!(base_dir("document.xml"), "");
    }

    #[test]
    fn test_parse_rels() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings" Target="settings.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/?a=1&amp;b=2" TargetMode="External"/>
</Relationships>"#;

        let rels = parse_rels_xml(xml).unwrap();
        assert_eq!(rels.len(), 2);
        assert_eq!(rels[0].r_id, "rId1");
        assert_eq!(rels[0].target_member("word").as_deref(), Some("word/settings.xml"));
        assert!(rels[1].external);
        assert_eq!(rels[1].target_ref, "https://example.com/?a=1&b=2");
        assert_eq!(rels[1].target_member("word"), None);
    }
}
