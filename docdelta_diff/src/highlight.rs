use std::collections::BTreeMap;

use docdelta_ir::{Document, ElementNode, Node, NodeId, TextNode};
use tracing::{debug, trace};

use crate::flatten::{DocumentView, LeafSpan};
use crate::model::{HighlightEntry, MarkInfo, MarkerStyle};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Fragment<'a> {
    Text(String),
    Marked { mark: &'a MarkInfo, text: String },
    Placeholder(&'a MarkInfo),
}

/// Replacement fragments for one text leaf.
#[derive(Debug)]
struct LeafPatch<'a> {
    node: NodeId,
    fragments: Vec<Fragment<'a>>,
}

/// Buffered run of consecutive tokens sharing the same active span.
#[derive(Debug, Default)]
struct RunState<'a> {
    buffer: String,
    active: Option<&'a MarkInfo>,
}

impl<'a> RunState<'a> {
    fn push(&mut self, token: &str, mark: Option<&'a MarkInfo>, out: &mut Vec<Fragment<'a>>) {
        if !same_mark(self.active, mark) {
            self.flush(out);
            self.active = mark;
        }
        self.buffer.push_str(token);
    }

    fn flush(&mut self, out: &mut Vec<Fragment<'a>>) {
        if self.buffer.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.buffer);
        out.push(match self.active {
            Some(mark) => Fragment::Marked { mark, text },
            None => Fragment::Text(text),
        });
    }
}

fn same_mark(a: Option<&MarkInfo>, b: Option<&MarkInfo>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => std::ptr::eq(a, b),
        _ => false,
    }
}

/// Pending boundaries keyed by token offset; each renders at most once.
#[derive(Debug, Default)]
struct Boundaries<'a> {
    by_offset: BTreeMap<usize, Vec<&'a MarkInfo>>,
}

impl<'a> Boundaries<'a> {
    fn emit_at(&mut self, offset: usize, out: &mut Vec<Fragment<'a>>) {
        if let Some(marks) = self.by_offset.remove(&offset) {
            out.extend(marks.into_iter().map(Fragment::Placeholder));
        }
    }

    fn has(&self, offset: usize) -> bool {
        self.by_offset.contains_key(&offset)
    }

    fn into_remaining(self) -> Vec<&'a MarkInfo> {
        self.by_offset.into_values().flatten().collect()
    }
}

/// Inject highlight markers into the document behind `view`.
///
/// Each text leaf touched by a span or boundary is replaced, in place, by a
/// sequence of plain text nodes, marker elements, and empty placeholder
/// elements. Untouched leaves are left as they are. The document's text
/// content is unchanged by injection.
pub fn apply_highlights(
    view: DocumentView,
    entries: &[HighlightEntry],
    style: &MarkerStyle,
) -> Document {
    let (patches, leftovers) = plan(&view, entries);
    let trailing_parent = view
        .leaves()
        .last()
        .and_then(|leaf| view.document().parent(leaf.node));
    let patch_count = patches.len();

    let mut doc = view.into_document();
    for patch in &patches {
        let ids = patch
            .fragments
            .iter()
            .map(|fragment| insert_fragment(&mut doc, fragment, style))
            .collect::<Vec<_>>();
        if !doc.splice(patch.node, &ids) {
            trace!(node = patch.node.0, "leaf detached before injection");
        }
    }

    for mark in &leftovers {
        let id = insert_marker(&mut doc, mark, style, true, None);
        doc.append(trailing_parent, id);
    }

    debug!(
        patched_leaves = patch_count,
        leftover_boundaries = leftovers.len(),
        "applied highlights"
    );

    doc
}

fn plan<'a>(
    view: &DocumentView,
    entries: &'a [HighlightEntry],
) -> (Vec<LeafPatch<'a>>, Vec<&'a MarkInfo>) {
    let mut spans: Vec<Option<&'a MarkInfo>> = vec![None; view.token_count()];
    let mut boundaries = Boundaries::default();

    for entry in entries {
        match entry {
            HighlightEntry::Span { mark, start, end } => {
                let end = (*end).min(spans.len());
                for slot in spans.iter_mut().take(end).skip(*start) {
                    *slot = Some(mark);
                }
            }
            HighlightEntry::Boundary { mark, at } => {
                boundaries.by_offset.entry(*at).or_default().push(mark);
            }
        }
    }

    let mut patches = Vec::new();
    for leaf in view.leaves() {
        let fragments = leaf_fragments(view, leaf, &spans, &mut boundaries);
        if fragments
            .iter()
            .all(|fragment| matches!(fragment, Fragment::Text(_)))
        {
            continue;
        }
        trace!(
            node = leaf.node.0,
            start = leaf.start,
            end = leaf.end,
            fragments = fragments.len(),
            "planned leaf patch"
        );
        patches.push(LeafPatch {
            node: leaf.node,
            fragments,
        });
    }

    (patches, boundaries.into_remaining())
}

fn leaf_fragments<'a>(
    view: &DocumentView,
    leaf: &LeafSpan,
    spans: &[Option<&'a MarkInfo>],
    boundaries: &mut Boundaries<'a>,
) -> Vec<Fragment<'a>> {
    let mut out = Vec::new();
    let mut run = RunState::default();

    boundaries.emit_at(leaf.start, &mut out);

    for (offset, token) in (leaf.start..leaf.end).zip(view.leaf_tokens(leaf)) {
        run.push(token.as_str(), spans[offset], &mut out);
        if boundaries.has(offset + 1) {
            run.flush(&mut out);
            boundaries.emit_at(offset + 1, &mut out);
        }
    }
    run.flush(&mut out);

    out
}

fn insert_fragment(doc: &mut Document, fragment: &Fragment<'_>, style: &MarkerStyle) -> NodeId {
    match fragment {
        Fragment::Text(text) => insert_text(doc, text),
        Fragment::Marked { mark, text } => {
            let text_id = insert_text(doc, text);
            insert_marker(doc, mark, style, false, Some(text_id))
        }
        Fragment::Placeholder(mark) => insert_marker(doc, mark, style, true, None),
    }
}

fn insert_text(doc: &mut Document, text: &str) -> NodeId {
    doc.insert_node(Node::Text(TextNode {
        text: text.to_string(),
        parent: None,
    }))
}

fn insert_marker(
    doc: &mut Document,
    mark: &MarkInfo,
    style: &MarkerStyle,
    placeholder: bool,
    child: Option<NodeId>,
) -> NodeId {
    let id = doc.insert_node(Node::Element(ElementNode {
        tag: style.tag.clone(),
        attrs: marker_attrs(mark, style, placeholder),
        children: Vec::new(),
        parent: None,
    }));
    if let Some(child) = child {
        doc.add_child(id, child);
    }
    id
}

fn marker_attrs(mark: &MarkInfo, style: &MarkerStyle, placeholder: bool) -> Vec<(String, String)> {
    let class = if placeholder {
        &style.placeholder_class
    } else {
        &style.mark_class
    };
    let mut attrs = vec![
        ("class".to_string(), format!("{class} diff-{}", mark.kind.as_str())),
        ("data-diff-id".to_string(), mark.id.clone()),
        ("data-diff-type".to_string(), mark.kind.as_str().to_string()),
        ("data-diff-role".to_string(), mark.role.as_str().to_string()),
    ];
    if placeholder {
        attrs.push(("data-diff-placeholder".to_string(), "true".to_string()));
    }
    if let Some(title) = mark.tooltip() {
        attrs.push(("title".to_string(), title));
    }
    attrs
}
