/// Word document session.
///
/// `DocxSession` loads a .docx package, exposes the tracked changes of its
/// main document part as a live revision list, and writes the edited parts
/// back into the package.
use super::package::{main_document_member, settings_member};
use super::revision::{Finalize, RevisionSpan, scan_revisions};
use super::run_props::{ensure_rpr, set_child};
use super::settings::SettingsPart;
use super::xml_part::XmlPart;
use crate::common::error::Result as SessionResult;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::PhysPkg;
use crate::revision::{DocumentSession, RevisionRecord, WdColorIndex};
use std::io::Read;
use std::path::Path;

/// A Word (.docx) document opened for revision resolution.
///
/// Revisions are numbered from 1 in document order. Resolving a revision
/// rewrites the document markup and renumbers the revisions after it.
///
/// # Examples
///
/// ```rust,no_run
/// use markrev::ooxml::docx::DocxSession;
/// use markrev::revision::{ResolutionPolicy, resolve};
///
/// let mut doc = DocxSession::open("draft.docx")?;
/// let processed = resolve(&mut doc, &ResolutionPolicy::default())?.run()?;
/// println!("{} revisions processed", processed);
/// doc.save("final.docx")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct DocxSession {
    package: PhysPkg,
    document_member: String,
    settings_member: String,
    document: XmlPart,
    settings: Option<SettingsPart>,
    /// Live revision list, rebuilt after every edit
    spans: Vec<RevisionSpan>,
}

impl DocxSession {
    /// Open a .docx file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_package(PhysPkg::open(path)?)
    }

    /// Read a .docx package from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_package(PhysPkg::from_reader(reader)?)
    }

    /// Read a .docx package from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_package(PhysPkg::from_bytes(data)?)
    }

    /// Wrap an already loaded package.
    pub fn from_package(package: PhysPkg) -> Result<Self> {
        let document_member = main_document_member(&package)?;
        let settings_member = settings_member(&package, &document_member)?;

        let document = XmlPart::parse(package.blob_for(&document_member)?)?;
        let settings = package
            .get(&settings_member)
            .map(SettingsPart::parse)
            .transpose()?;
        let spans = scan_revisions(&document)?;

        tracing::debug!(
            document = %document_member,
            settings = settings.is_some(),
            revisions = spans.len(),
            "docx session opened"
        );

        Ok(Self {
            package,
            document_member,
            settings_member,
            document,
            settings,
            spans,
        })
    }

    /// Member name of the main document part.
    #[inline]
    pub fn document_member(&self) -> &str {
        &self.document_member
    }

    /// Document text as currently shown with deletions hidden, one line per
    /// paragraph.
    pub fn visible_text(&self) -> String {
        self.document.text_lines(b"p", &[b"t"])
    }

    /// The package with the edited parts written back.
    pub fn to_package(&self) -> Result<PhysPkg> {
        let mut package = self.package.clone();
        package.insert(self.document_member.clone(), self.document.to_bytes()?);
        if let Some(settings) = &self.settings {
            package.insert(self.settings_member.clone(), settings.to_bytes()?);
        }
        Ok(package)
    }

    /// Serialize the edited package.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_package()?.to_bytes()
    }

    /// Write the edited package to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_package()?.save(path)
    }

    fn span(&self, index: usize) -> Result<&RevisionSpan> {
        let count = self.spans.len();
        if index == 0 || index > count {
            return Err(OoxmlError::RevisionOutOfRange { index, count });
        }
        Ok(&self.spans[index - 1])
    }

    fn rescan(&mut self) -> Result<()> {
        self.spans = scan_revisions(&self.document)?;
        Ok(())
    }

    /// `(start, end)` of the table row whose properties hold the marker at
    /// `marker`.
    fn enclosing_row(&self, marker: usize) -> Result<Option<(usize, usize)>> {
        let Some(tr_pr) = self.document.enclosing(marker) else {
            return Ok(None);
        };
        if self.document.local_name(tr_pr) != Some(b"trPr".as_slice()) {
            return Ok(None);
        }
        match self.document.enclosing(tr_pr) {
            Some(tr) if self.document.local_name(tr) == Some(b"tr".as_slice()) => {
                Ok(Some((tr, self.document.matching_end(tr)?)))
            },
            _ => Ok(None),
        }
    }

    /// Turn the deleted text of `span` back into ordinary text, leaving text
    /// of nested deletions alone.
    fn restore_deleted_text(&mut self, span: &RevisionSpan) -> Result<()> {
        let nested: Vec<(usize, usize)> = self
            .spans
            .iter()
            .filter(|s| s.start > span.start && s.end < span.end && s.markup.holds_deleted_text())
            .map(|s| (s.start, s.end))
            .collect();

        let targets: Vec<(usize, &'static str)> = (span.start + 1..span.end)
            .filter(|&i| !nested.iter().any(|&(s, e)| s < i && i < e))
            .filter_map(|i| match self.document.local_name(i) {
                Some(b"delText") => Some((i, "t")),
                Some(b"delInstrText") => Some((i, "instrText")),
                _ => None,
            })
            .collect();

        for (i, local) in targets {
            self.document.rename(i, local)?;
        }
        Ok(())
    }

    fn finalize(&mut self, index: usize, accept: bool) -> Result<()> {
        let span = self.span(index)?.clone();
        let rule = if accept {
            span.markup.on_accept()
        } else {
            span.markup.on_reject()
        };

        match rule {
            Finalize::Unsupported => {
                return Err(OoxmlError::Unsupported(format!(
                    "{} a {} revision",
                    if accept { "accepting" } else { "rejecting" },
                    span.markup
                )));
            },
            Finalize::DropMarker => self.document.remove(span.start, span.end),
            Finalize::KeepContent if span.is_marker() => self.document.remove(span.start, span.end),
            Finalize::KeepContent => {
                if span.markup.holds_deleted_text() {
                    self.restore_deleted_text(&span)?;
                }
                self.document.unwrap_element(span.start)?;
            },
            Finalize::DropContent => {
                let row = if span.is_marker() {
                    self.enclosing_row(span.start)?
                } else {
                    None
                };
                match row {
                    Some((start, end)) => self.document.remove(start, end),
                    None => self.document.remove(span.start, span.end),
                }
            },
        }

        tracing::debug!(index, accept, markup = %span.markup, ?rule, "revision finalized");
        self.rescan()
    }

    /// Apply `edit` to the run properties of the text covered by the
    /// revision at `index`.
    ///
    /// Runs inside the revision get their own `w:rPr`; markers and property
    /// changes edit the `w:rPr` they sit in.
    fn edit_run_properties<F>(&mut self, index: usize, edit: F) -> Result<()>
    where
        F: Fn(&mut XmlPart, usize) -> Result<()>,
    {
        let span = self.span(index)?.clone();
        let runs = if span.is_marker() {
            Vec::new()
        } else {
            self.document.descendants(span.start, b"r")?
        };

        if runs.is_empty() {
            if let Some(parent) = self.document.enclosing(span.start) {
                if self.document.local_name(parent) == Some(b"rPr".as_slice()) {
                    edit(&mut self.document, parent)?;
                }
            }
        }

        // Back to front, so new rPr elements do not shift runs still to visit
        for &run in runs.iter().rev() {
            let rpr = ensure_rpr(&mut self.document, run)?;
            edit(&mut self.document, rpr)?;
        }

        self.rescan()
    }
}

impl DocumentSession for DocxSession {
    fn revision_count(&self) -> SessionResult<usize> {
        Ok(self.spans.len())
    }

    fn revision(&self, index: usize) -> SessionResult<RevisionRecord> {
        let span = self.span(index)?;
        Ok(RevisionRecord::new(index, span.markup.kind(), span.author.clone())
            .with_date(span.date.clone())
            .with_text(span.text(&self.document)))
    }

    fn accept(&mut self, index: usize) -> SessionResult<()> {
        Ok(self.finalize(index, true)?)
    }

    fn reject(&mut self, index: usize) -> SessionResult<()> {
        Ok(self.finalize(index, false)?)
    }

    fn set_font_color(&mut self, index: usize, color: WdColorIndex) -> SessionResult<()> {
        let val = color.to_xml();
        Ok(self.edit_run_properties(index, |part, rpr| set_child(part, rpr, "color", &[("val", val)]))?)
    }

    fn set_strikethrough(&mut self, index: usize, enabled: bool) -> SessionResult<()> {
        let attrs: &[(&str, &str)] = if enabled { &[] } else { &[("val", "0")] };
        Ok(self.edit_run_properties(index, |part, rpr| set_child(part, rpr, "strike", attrs))?)
    }

    fn track_revisions(&self) -> SessionResult<bool> {
        match &self.settings {
            Some(settings) => Ok(settings.track_revisions()?),
            None => Ok(false),
        }
    }

    fn set_track_revisions(&mut self, enabled: bool) -> SessionResult<()> {
        match &mut self.settings {
            Some(settings) => {
                if settings.set_track_revisions(enabled)? {
                    tracing::debug!(enabled, member = %self.settings_member, "track revisions updated");
                }
                Ok(())
            },
            None if !enabled => Ok(()),
            None => Err(OoxmlError::PartNotFound(self.settings_member.clone()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::Error;
    use crate::revision::{Diagnostic, ResolutionPolicy, Resolver, WdRevisionType};

    const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/settings.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml"/></Types>"#;

    const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

    const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings" Target="settings.xml"/></Relationships>"#;

    const BODY: &str = concat!(
        r#"<w:p><w:r><w:t xml:space="preserve">Keep </w:t></w:r>"#,
        r#"<w:ins w:id="1" w:author="Alice" w:date="2024-11-05T10:30:00Z"><w:r><w:t xml:space="preserve">added </w:t></w:r></w:ins>"#,
        r#"<w:del w:id="2" w:author="Bob"><w:r><w:rPr><w:b/></w:rPr><w:delText>removed</w:delText></w:r></w:del>"#,
        r#"<w:r><w:rPr><w:b/><w:rPrChange w:id="3" w:author="Alice"><w:rPr/></w:rPrChange></w:rPr><w:t>bold</w:t></w:r>"#,
        r#"</w:p>"#,
    );

    fn package(body: &str, track: Option<bool>) -> PhysPkg {
        let mut pkg = PhysPkg::new();
        pkg.insert("[Content_Types].xml", CONTENT_TYPES.as_bytes().to_vec());
        pkg.insert("_rels/.rels", PACKAGE_RELS.as_bytes().to_vec());
        pkg.insert(
            "word/document.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
                body
            )
            .into_bytes(),
        );
        if let Some(track) = track {
            pkg.insert("word/_rels/document.xml.rels", DOCUMENT_RELS.as_bytes().to_vec());
            let flag = if track { "<w:trackRevisions/>" } else { "" };
            pkg.insert(
                "word/settings.xml",
                format!(
                    r#"<w:settings xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:zoom w:percent="100"/>{}<w:defaultTabStop w:val="720"/></w:settings>"#,
                    flag
                )
                .into_bytes(),
            );
        }
        pkg
    }

    fn session(body: &str) -> DocxSession {
        DocxSession::from_package(package(body, Some(true))).unwrap()
    }

    fn document_xml(doc: &DocxSession) -> String {
        String::from_utf8(doc.document.to_bytes().unwrap()).unwrap()
    }

    fn run(doc: &mut DocxSession, policy: &ResolutionPolicy) -> (Vec<usize>, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let progress = Resolver::with_sink(doc, policy, &mut diagnostics)
            .unwrap()
            .collect::<SessionResult<Vec<_>>>()
            .unwrap();
        (progress, diagnostics)
    }

    #[test]
    fn test_revisions_listed_in_document_order() {
        let doc = session(BODY);
        let revisions = doc.revisions().unwrap();

        assert_eq!(revisions.len(), 3);
        assert_eq!(revisions[0].kind().known(), Some(WdRevisionType::Insert));
        assert_eq!(revisions[0].author(), "Alice");
        assert_eq!(revisions[0].date(), Some("2024-11-05T10:30:00Z"));
        assert_eq!(revisions[0].text(), "added ");
        assert_eq!(revisions[1].kind().known(), Some(WdRevisionType::Delete));
        assert_eq!(revisions[1].text(), "removed");
        assert_eq!(revisions[2].kind().known(), Some(WdRevisionType::Property));
        assert_eq!(revisions[2].index(), 3);
        assert_eq!(doc.visible_text(), "Keep added bold\n");
    }

    #[test]
    fn test_resolve_accepting_deletions() {
        let mut doc = session(BODY);
        let (progress, diagnostics) = run(&mut doc, &ResolutionPolicy::default());

        assert_eq!(progress, vec![1, 2, 3]);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::Unhandled {
                position: 3,
                kind: WdRevisionType::Property
            }]
        );
        assert_eq!(doc.revision_count().unwrap(), 1);
        assert_eq!(doc.visible_text(), "Keep added bold\n");

        let xml = document_xml(&doc);
        assert!(xml.contains(r#"<w:r><w:rPr><w:color w:val="0000FF"/></w:rPr><w:t xml:space="preserve">added </w:t></w:r>"#));
        assert!(!xml.contains("<w:ins"));
        assert!(!xml.contains("removed"));
        assert!(doc.track_revisions().unwrap());
    }

    #[test]
    fn test_resolve_striking_deletions() {
        let mut doc = session(BODY);
        let policy = ResolutionPolicy::new()
            .with_strike_deletions(true)
            .with_color(WdColorIndex::Red);
        let (progress, _) = run(&mut doc, &policy);

        assert_eq!(progress, vec![1, 2, 3]);
        assert_eq!(doc.visible_text(), "Keep added removedbold\n");

        let xml = document_xml(&doc);
        assert!(xml.contains(
            r#"<w:r><w:rPr><w:b/><w:strike/><w:color w:val="FF0000"/></w:rPr><w:t>removed</w:t></w:r>"#
        ));
        assert!(!xml.contains("<w:del "));
    }

    #[test]
    fn test_resolve_only_target_author() {
        let mut doc = session(BODY);
        let policy = ResolutionPolicy::new().with_target_author("Bob");
        let (progress, diagnostics) = run(&mut doc, &policy);

        assert_eq!(progress, vec![1, 2, 3]);
        assert!(diagnostics.is_empty());

        let remaining: Vec<String> = doc
            .revisions()
            .unwrap()
            .iter()
            .map(|r| r.author().to_string())
            .collect();
        assert_eq!(remaining, vec!["Alice", "Alice"]);
        assert_eq!(doc.revision(1).unwrap().kind().known(), Some(WdRevisionType::Insert));
    }

    #[test]
    fn test_tracking_disabled_during_run_and_saved() {
        let mut doc = session(BODY);
        {
            let mut resolver = Resolver::with_sink(&mut doc, &ResolutionPolicy::default(), Vec::new()).unwrap();
            assert_eq!(resolver.next().unwrap().unwrap(), 1);
        }
        assert!(doc.track_revisions().unwrap());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resolved.docx");
        doc.save(&path).unwrap();

        let reopened = DocxSession::open(&path).unwrap();
        assert!(reopened.track_revisions().unwrap());
        assert_eq!(reopened.revision_count().unwrap(), 2);
        assert_eq!(reopened.visible_text(), "Keep added bold\n");

        let names: Vec<String> = reopened.package.member_names().map(str::to_string).collect();
        assert_eq!(names[0], "[Content_Types].xml");
    }

    #[test]
    fn test_reject_insertion_and_unsupported_reject() {
        let mut doc = session(BODY);
        doc.reject(1).unwrap();
        assert_eq!(doc.visible_text(), "Keep bold\n");
        assert_eq!(doc.revision_count().unwrap(), 2);

        let err = doc.reject(2).unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
        assert_eq!(doc.revision_count().unwrap(), 2);

        doc.accept(2).unwrap();
        assert!(!document_xml(&doc).contains("rPrChange"));
        assert_eq!(doc.revision_count().unwrap(), 1);
    }

    #[test]
    fn test_deleted_table_row_removed_on_accept() {
        let mut doc = session(concat!(
            r#"<w:tbl><w:tr><w:trPr><w:del w:id="5" w:author="Ann"/></w:trPr><w:tc><w:p><w:r><w:t>gone</w:t></w:r></w:p></w:tc></w:tr>"#,
            r#"<w:tr><w:tc><w:p><w:r><w:t>stays</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
        ));

        assert_eq!(doc.revision(1).unwrap().kind().known(), Some(WdRevisionType::Delete));
        doc.accept(1).unwrap();
        assert_eq!(doc.visible_text(), "stays\n");
        assert_eq!(doc.revision_count().unwrap(), 0);
    }

    #[test]
    fn test_deleted_row_counts_its_cell_changes() {
        let mut doc = session(concat!(
            r#"<w:tbl><w:tr><w:trPr><w:del w:id="1" w:author="Ann"/></w:trPr><w:tc><w:p>"#,
            r#"<w:del w:id="2" w:author="Ann"><w:r><w:delText>gone</w:delText></w:r></w:del>"#,
            r#"</w:p></w:tc></w:tr></w:tbl>"#,
            r#"<w:p><w:ins w:id="3" w:author="Ann"><w:r><w:t>new</w:t></w:r></w:ins></w:p>"#,
        ));
        assert_eq!(doc.revision_count().unwrap(), 3);

        let (progress, diagnostics) = run(&mut doc, &ResolutionPolicy::default());

        assert_eq!(progress, vec![1, 2, 3]);
        assert!(diagnostics.is_empty());
        assert_eq!(doc.revision_count().unwrap(), 0);
        assert_eq!(doc.visible_text(), "new\n");
        assert!(document_xml(&doc).contains(r#"<w:color w:val="0000FF"/>"#));
    }

    #[test]
    fn test_paragraph_mark_marker_colored() {
        let mut doc = session(
            r#"<w:p><w:pPr><w:rPr><w:ins w:id="7" w:author="Ann"/></w:rPr></w:pPr><w:r><w:t>mark</w:t></w:r></w:p>"#,
        );

        doc.set_font_color(1, WdColorIndex::Green).unwrap();
        doc.accept(1).unwrap();
        assert!(document_xml(&doc).contains(r#"<w:pPr><w:rPr><w:color w:val="008000"/></w:rPr></w:pPr>"#));
        assert_eq!(doc.revision_count().unwrap(), 0);
    }

    #[test]
    fn test_nested_deletion_inside_insertion() {
        let mut doc = session(concat!(
            r#"<w:p><w:ins w:id="1" w:author="Ann"><w:del w:id="2" w:author="Ben">"#,
            r#"<w:r><w:delText>typo</w:delText></w:r></w:del></w:ins></w:p>"#,
        ));

        assert_eq!(doc.revision_count().unwrap(), 2);
        doc.accept(1).unwrap();
        assert_eq!(doc.revision_count().unwrap(), 1);
        assert_eq!(doc.visible_text(), "\n");

        doc.reject(1).unwrap();
        assert_eq!(doc.visible_text(), "typo\n");
        assert_eq!(doc.revision_count().unwrap(), 0);
    }

    #[test]
    fn test_out_of_range_index() {
        let mut doc = session(BODY);
        assert!(matches!(
            doc.accept(4),
            Err(Error::RevisionOutOfRange { index: 4, count: 3 })
        ));
        assert!(matches!(
            doc.revision(0),
            Err(Error::RevisionOutOfRange { index: 0, count: 3 })
        ));
    }

    #[test]
    fn test_settings_part_missing() {
        let mut doc = DocxSession::from_package(package(BODY, None)).unwrap();
        assert!(!doc.track_revisions().unwrap());
        doc.set_track_revisions(false).unwrap();
        assert!(matches!(
            doc.set_track_revisions(true),
            Err(Error::ComponentNotFound(_))
        ));

        let progress = Resolver::with_sink(&mut doc, &ResolutionPolicy::default(), Vec::new())
            .unwrap()
            .collect::<SessionResult<Vec<_>>>()
            .unwrap();
        assert_eq!(progress, vec![1, 2, 3]);
    }

    #[test]
    fn test_round_trip_through_bytes() {
        let mut doc = DocxSession::from_package(package(BODY, Some(false))).unwrap();
        doc.set_track_revisions(true).unwrap();
        let reopened = DocxSession::from_bytes(doc.to_bytes().unwrap()).unwrap();
        assert!(reopened.track_revisions().unwrap());
        assert_eq!(reopened.document_member(), "word/document.xml");

        let reread = DocxSession::from_reader(std::io::Cursor::new(reopened.to_bytes().unwrap())).unwrap();
        assert_eq!(reread.revision_count().unwrap(), 3);
    }
}
