/// Run property (`w:rPr`) editing.
///
/// Children of `w:rPr` follow a fixed schema order. New properties are
/// inserted at their schema position so Word accepts the result.
use super::xml_part::{XmlPart, element_pair, empty_element};
use crate::ooxml::error::{OoxmlError, Result};

/// Schema order of `CT_RPr` children.
const RPR_ORDER: &[&[u8]] = &[
    b"ins",
    b"del",
    b"moveFrom",
    b"moveTo",
    b"rStyle",
    b"rFonts",
    b"b",
    b"bCs",
    b"i",
    b"iCs",
    b"caps",
    b"smallCaps",
    b"strike",
    b"dstrike",
    b"outline",
    b"shadow",
    b"emboss",
    b"imprint",
    b"noProof",
    b"snapToGrid",
    b"vanish",
    b"webHidden",
    b"color",
    b"spacing",
    b"w",
    b"kern",
    b"position",
    b"sz",
    b"szCs",
    b"highlight",
    b"u",
    b"effect",
    b"bdr",
    b"shd",
    b"fitText",
    b"vertAlign",
    b"rtl",
    b"cs",
    b"em",
    b"lang",
    b"eastAsianLayout",
    b"specVanish",
    b"oMath",
    b"rPrChange",
];

#[inline]
fn rank(local: &[u8]) -> usize {
    RPR_ORDER
        .iter()
        .position(|name| *name == local)
        .unwrap_or(RPR_ORDER.len())
}

/// Index of the `w:rPr` of the run opened at `run`, creating it if needed.
pub(crate) fn ensure_rpr(part: &mut XmlPart, run: usize) -> Result<usize> {
    if part.local_name(run) != Some(b"r".as_slice()) {
        return Err(OoxmlError::InvalidFormat(format!("event {} is not a run", run)));
    }
    part.expand(run)?;

    if let Some((rpr, _)) = part.child(run, b"rPr")? {
        part.expand(rpr)?;
        return Ok(rpr);
    }

    // rPr is always the first child of a run
    let pair = match part.element(run) {
        Some(like) => element_pair(like, "rPr"),
        None => return Err(OoxmlError::InvalidFormat(format!("event {} is not a run", run))),
    };
    part.insert(run + 1, pair);
    Ok(run + 1)
}

/// Replace the `local` property of the properties element at `parent` with
/// `<w:local attrs/>`.
pub(crate) fn set_child(
    part: &mut XmlPart,
    parent: usize,
    local: &str,
    attrs: &[(&str, &str)],
) -> Result<()> {
    remove_child(part, parent, local)?;
    let parent_end = part.expand(parent)?;

    let new_rank = rank(local.as_bytes());
    let at = part
        .children(parent)?
        .into_iter()
        .find(|&(s, _)| part.local_name(s).map(rank).unwrap_or(usize::MAX) > new_rank)
        .map_or(parent_end, |(s, _)| s);

    let element = match part.element(parent) {
        Some(like) => empty_element(like, local, attrs),
        None => return Err(OoxmlError::InvalidFormat(format!("event {} is not an element", parent))),
    };
    part.insert(at, [element]);
    Ok(())
}

/// Remove every `local` child of the element at `parent`. Returns whether
/// anything was removed.
pub(crate) fn remove_child(part: &mut XmlPart, parent: usize, local: &str) -> Result<bool> {
    let found: Vec<(usize, usize)> = part
        .children(parent)?
        .into_iter()
        .filter(|&(s, _)| part.local_name(s) == Some(local.as_bytes()))
        .collect();

    for &(start, end) in found.iter().rev() {
        part.remove(start, end);
    }
    Ok(!found.is_empty())
}
