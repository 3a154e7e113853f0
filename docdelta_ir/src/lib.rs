//! Arena-backed document model for rendered HTML bodies.
//!
//! This crate provides:
//! - a tree model (`Document`, `Node`, `ElementNode`, `TextNode`)
//! - a lenient parser (`parse_html`)
//! - a serializer (`Document::render`)
//! - tree queries used by diffing (`ancestors`, `text_content`, `document_order`)
//! - structure-preserving replacement of one node by a fragment (`Document::splice`)
//!
//! The parser never fails:
//! - stray end tags are dropped and recorded as parse findings
//! - unclosed elements are closed at end of input
//! - a small set of implied end tags (`p`, `li`, `td`, ...) is honored
//!
//! # Example
//!
//! ```rust
//! use docdelta_ir::parse_html;
//!
//! let input = "<h2>Clause 3</h2><p>Fixed <b>text</b></p>";
//! let doc = parse_html(input);
//! assert_eq!(doc.render(), input);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

mod parse;

pub use parse::parse_html;

/// Stable arena identifier for a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// Element node with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementNode {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

/// Text leaf holding decoded character data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNode {
    pub text: String,
    pub parent: Option<NodeId>,
}

/// Comment leaf, kept so rendering preserves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentNode {
    pub text: String,
    pub parent: Option<NodeId>,
}

/// Arena node variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    Element(ElementNode),
    Text(TextNode),
    Comment(CommentNode),
}

impl Node {
    /// Parent element, or `None` for roots and detached nodes.
    pub fn parent(&self) -> Option<NodeId> {
        match self {
            Node::Element(el) => el.parent,
            Node::Text(text) => text.parent,
            Node::Comment(comment) => comment.parent,
        }
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        match self {
            Node::Element(el) => el.parent = parent,
            Node::Text(text) => text.parent = parent,
            Node::Comment(comment) => comment.parent = parent,
        }
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Lightweight element classification used by the parser, renderer, and diff views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// `h1` through `h6`, carrying the rank.
    Heading(u8),
    /// Block container that groups text for human review (paragraph, list item, cell, ...).
    Block,
    /// Element whose content is raw text rather than document content.
    RawText,
    /// Element that never has children.
    Void,
    Inline,
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

const BLOCK_ELEMENTS: &[&str] = &[
    "p",
    "li",
    "td",
    "th",
    "blockquote",
    "pre",
    "code",
    "div",
    "section",
    "article",
    "dt",
    "dd",
    "caption",
    "figcaption",
];

/// Classify an element tag name (expected lowercase).
pub fn element_kind(tag: &str) -> ElementKind {
    if let Some(rank) = tag.strip_prefix('h').and_then(|rest| rest.parse::<u8>().ok())
        && (1..=6).contains(&rank)
        && tag.len() == 2
    {
        return ElementKind::Heading(rank);
    }
    if VOID_ELEMENTS.contains(&tag) {
        ElementKind::Void
    } else if RAW_TEXT_ELEMENTS.contains(&tag) {
        ElementKind::RawText
    } else if BLOCK_ELEMENTS.contains(&tag) {
        ElementKind::Block
    } else {
        ElementKind::Inline
    }
}

impl ElementNode {
    pub fn kind(&self) -> ElementKind {
        element_kind(&self.tag)
    }

    /// Attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Document metadata attached during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub source_name: Option<String>,
    pub doctype: Option<String>,
    pub original_bytes: usize,
    pub parse_findings: Vec<ParseFinding>,
}

/// Parser-level uncertainty note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseFinding {
    pub code: String,
    pub message: String,
    pub tag: Option<String>,
}

/// Parsed document backed by an arena and root node list.
///
/// Nodes are never removed from the arena. [`Document::splice`] detaches the
/// replaced node, which keeps its id but is no longer reachable from `roots`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Document {
    pub metadata: DocumentMetadata,
    pub roots: Vec<NodeId>,
    pub arena: Vec<Node>,
}

impl Document {
    /// Create an empty document with caller-supplied metadata.
    pub fn new(metadata: DocumentMetadata) -> Self {
        Self {
            metadata,
            roots: Vec::new(),
            arena: Vec::new(),
        }
    }

    /// Insert a node and register it as a root.
    pub fn insert_root(&mut self, node: Node) -> NodeId {
        let id = self.insert_node(node);
        self.roots.push(id);
        id
    }

    /// Insert a detached node into the arena and return its stable [`NodeId`].
    pub fn insert_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.arena.len());
        self.arena.push(node);
        id
    }

    /// Borrow a node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id.0)
    }

    /// Mutably borrow a node by id.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.arena.get_mut(id.0)
    }

    /// Append `child` to `parent` if parent is an element.
    ///
    /// Returns `true` when attached, `false` when `parent` is not an element.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        match self.arena.get_mut(parent.0) {
            Some(Node::Element(el)) => {
                el.children.push(child);
            }
            _ => return false,
        }
        if let Some(node) = self.arena.get_mut(child.0) {
            node.set_parent(Some(parent));
        }
        true
    }

    /// Append `child` under `parent`, or as a root when `parent` is `None`.
    pub fn append(&mut self, parent: Option<NodeId>, child: NodeId) {
        match parent {
            Some(parent_id) if self.add_child(parent_id, child) => {}
            _ => {
                if let Some(node) = self.arena.get_mut(child.0) {
                    node.set_parent(None);
                }
                self.roots.push(child);
            }
        }
    }

    /// Children of an element, or roots when `parent` is `None`.
    pub fn children(&self, parent: Option<NodeId>) -> &[NodeId] {
        match parent {
            None => &self.roots,
            Some(id) => match self.node(id) {
                Some(Node::Element(el)) => &el.children,
                _ => &[],
            },
        }
    }

    /// Parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Node::parent)
    }

    /// Iterate the ancestors of `id`, nearest first (the node itself is excluded).
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.parent(id),
        }
    }

    /// Replace `target` with `replacement` at the same sibling position.
    ///
    /// The replacement nodes must already be in the arena; they are re-parented.
    /// Returns `false` when `target` is not attached to the tree.
    pub fn splice(&mut self, target: NodeId, replacement: &[NodeId]) -> bool {
        let parent = self.parent(target);
        let siblings = match parent {
            None => &mut self.roots,
            Some(parent_id) => match self.arena.get_mut(parent_id.0) {
                Some(Node::Element(el)) => &mut el.children,
                _ => return false,
            },
        };
        let Some(pos) = siblings.iter().position(|id| *id == target) else {
            return false;
        };
        siblings.splice(pos..=pos, replacement.iter().copied());

        for id in replacement {
            if let Some(node) = self.arena.get_mut(id.0) {
                node.set_parent(parent);
            }
        }
        if let Some(node) = self.arena.get_mut(target.0) {
            node.set_parent(None);
        }
        true
    }

    /// Node ids reachable from the roots, in pre-order (serializer order).
    pub fn document_order(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(Node::Element(el)) = self.node(id) {
                stack.extend(el.children.iter().rev().copied());
            }
        }
        out
    }

    /// Concatenated text of `id` and its descendants. Comments are excluded.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    /// Concatenated text of the whole document.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for root in &self.roots {
            self.collect_text(*root, &mut out);
        }
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.node(id) {
            Some(Node::Text(text)) => out.push_str(&text.text),
            Some(Node::Element(el)) => {
                for child in &el.children {
                    self.collect_text(*child, out);
                }
            }
            _ => {}
        }
    }

    /// Serialize the document as HTML.
    ///
    /// Documents parsed from canonical markup (lowercase tags, double-quoted
    /// attributes, escaped text) render back byte-for-byte.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(doctype) = &self.metadata.doctype {
            out.push_str("<!DOCTYPE ");
            out.push_str(doctype);
            out.push('>');
        }
        for root in &self.roots {
            self.render_node(*root, false, &mut out);
        }
        out
    }

    fn render_node(&self, id: NodeId, raw_text: bool, out: &mut String) {
        let Some(node) = self.arena.get(id.0) else {
            return;
        };
        match node {
            Node::Text(text) => {
                if raw_text {
                    out.push_str(&text.text);
                } else {
                    escape_text(&text.text, out);
                }
            }
            Node::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(&comment.text);
                out.push_str("-->");
            }
            Node::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (name, value) in &el.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_attr(value, out);
                    out.push('"');
                }
                out.push('>');

                let kind = el.kind();
                if kind == ElementKind::Void {
                    return;
                }
                for child in &el.children {
                    self.render_node(*child, kind == ElementKind::RawText, out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }
}

/// Iterator over a node's ancestors, nearest first.
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}

/// Escape character data for an HTML text context.
pub fn escape_text(raw: &str, out: &mut String) {
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(raw: &str, out: &mut String) {
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
