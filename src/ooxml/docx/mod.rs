/// Word (.docx) document support.
///
/// This module edits the tracked changes of Microsoft Word documents in the
/// Office Open XML (OOXML) format (.docx files).
///
/// # Architecture
///
/// The module is organized around these key types:
/// - `DocxSession`: a loaded package whose revisions can be resolved
/// - `XmlPart`: an XML part held as an editable event list
/// - `RevisionSpan`: one tracked change located in the document part
/// - `SettingsPart`: the settings part and its track-changes flag
///
/// # Example
///
/// ```rust,no_run
/// use markrev::ooxml::docx::DocxSession;
/// use markrev::revision::{DocumentSession, ResolutionPolicy, resolve};
///
/// let mut doc = DocxSession::open("document.docx")?;
///
/// // List tracked changes
/// for revision in doc.revisions()? {
///     println!("{}: {} ({})", revision.index(), revision.kind(), revision.author());
/// }
///
/// // Accept everything, coloring insertions
/// for step in resolve(&mut doc, &ResolutionPolicy::default())? {
///     step?;
/// }
/// doc.save("document-final.docx")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
mod package;
pub mod revision;
mod run_props;
pub mod session;
pub mod settings;
pub mod xml_part;

pub use revision::{Finalize, RevisionMarkup, RevisionSpan};
pub use session::DocxSession;
pub use settings::SettingsPart;
pub use xml_part::XmlPart;
