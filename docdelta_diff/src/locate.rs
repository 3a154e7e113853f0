use docdelta_ir::{Document, ElementKind, Node, NodeId};

use crate::flatten::{DocumentView, LeafSpan};
use crate::model::{DiffLocation, SummaryLimits};
use crate::normalize::excerpt;

/// Resolve a token offset to its enclosing block and nearest preceding heading.
///
/// Offsets past the end of the sequence are clamped. Returns `None` when the
/// document has no text leaves or neither a block nor a heading is found.
pub fn locate(view: &DocumentView, start: usize, limits: &SummaryLimits) -> Option<DiffLocation> {
    let leaf = leaf_for_offset(view.leaves(), start.min(view.token_count()))?;
    let doc = view.document();

    let block = doc.ancestors(leaf.node).find(|id| is_block_like(doc, *id));
    let block_summary = block.and_then(|id| excerpt(&doc.text_content(id), limits.block_chars));

    let heading = match block {
        Some(id) if heading_rank(doc, id).is_some() => Some(id),
        _ => leaf.heading,
    };
    let section_title = heading.and_then(|id| excerpt(&doc.text_content(id), limits.title_chars));

    if section_title.is_none() && block_summary.is_none() {
        return None;
    }

    Some(DiffLocation {
        section_title,
        block_summary,
    })
}

fn leaf_for_offset(leaves: &[LeafSpan], offset: usize) -> Option<&LeafSpan> {
    leaves
        .iter()
        .find(|leaf| leaf.contains(offset))
        .or_else(|| leaves.iter().find(|leaf| leaf.end == offset))
        .or_else(|| leaves.iter().rev().find(|leaf| leaf.start <= offset))
}

fn is_block_like(doc: &Document, id: NodeId) -> bool {
    matches!(
        doc.node(id).and_then(Node::as_element).map(|el| el.kind()),
        Some(ElementKind::Block | ElementKind::Heading(_))
    )
}

fn heading_rank(doc: &Document, id: NodeId) -> Option<u8> {
    match doc.node(id).and_then(Node::as_element)?.kind() {
        ElementKind::Heading(rank) => Some(rank),
        _ => None,
    }
}
