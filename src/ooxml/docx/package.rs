/// Part lookup for Word packages.
///
/// Parts are found through package and document relationships, falling back
/// to the conventional member names when a package has no usable
/// relationship.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::{member, relationship_type as rt};
use crate::ooxml::opc::{PhysPkg, parse_rels_xml, rels_member_for};
use crate::ooxml::opc::rel::base_dir;

/// Target member of the first relationship of `source` with one of the
/// given types.
fn related_member(pkg: &PhysPkg, rels_member: &str, source_dir: &str, reltypes: &[&str]) -> Result<Option<String>> {
    let Some(rels_xml) = pkg.get(rels_member) else {
        return Ok(None);
    };

    Ok(parse_rels_xml(rels_xml)?
        .iter()
        .filter(|rel| reltypes.contains(&rel.reltype.as_str()))
        .find_map(|rel| rel.target_member(source_dir)))
}

/// Member name of the main document part.
pub(crate) fn main_document_member(pkg: &PhysPkg) -> Result<String> {
    let related = related_member(
        pkg,
        member::PACKAGE_RELS,
        "",
        &[rt::OFFICE_DOCUMENT, rt::OFFICE_DOCUMENT_STRICT],
    )?;

    match related {
        Some(name) if pkg.contains(&name) => Ok(name),
        _ if pkg.contains(member::DEFAULT_DOCUMENT) => Ok(member::DEFAULT_DOCUMENT.to_string()),
        _ => Err(OoxmlError::PartNotFound("main document part".to_string())),
    }
}

/// Member name of the settings part for the document at `document`.
///
/// The member may not exist in the package.
pub(crate) fn settings_member(pkg: &PhysPkg, document: &str) -> Result<String> {
    let related = related_member(
        pkg,
        &rels_member_for(document),
        base_dir(document),
        &[rt::SETTINGS, rt::SETTINGS_STRICT],
    )?;

    Ok(related.unwrap_or_else(|| member::DEFAULT_SETTINGS.to_string()))
}
