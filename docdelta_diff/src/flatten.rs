use docdelta_ir::{Document, ElementKind, Node, NodeId};
use tracing::debug;

use crate::model::Token;
use crate::tokenize::tokenize;

/// A text node's half-open range in its document's flat token sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafSpan {
    pub node: NodeId,
    pub start: usize,
    pub end: usize,
    /// Last heading element opened before this leaf in document order.
    pub heading: Option<NodeId>,
}

impl LeafSpan {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// A document together with its flat token sequence and leaf spans.
///
/// The view owns its document. Highlight injection consumes the view, so leaf
/// spans cannot outlive the tree they point into.
#[derive(Debug, Clone)]
pub struct DocumentView {
    document: Document,
    tokens: Vec<Token>,
    leaves: Vec<LeafSpan>,
}

impl DocumentView {
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn leaves(&self) -> &[LeafSpan] {
        &self.leaves
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Tokens owned by one leaf.
    pub fn leaf_tokens(&self, leaf: &LeafSpan) -> &[Token] {
        &self.tokens[leaf.start..leaf.end]
    }

    pub(crate) fn into_document(self) -> Document {
        self.document
    }
}

/// Build a flattened token view from a parsed document.
///
/// Text leaves are visited in serializer order. Empty text nodes, text inside
/// raw-text elements (`script`, `style`) and `template` content are skipped.
pub fn flatten(document: Document) -> DocumentView {
    let mut walk = Walk::default();
    for root in document.roots.iter().copied() {
        walk.visit(&document, root);
    }

    debug!(
        tokens = walk.tokens.len(),
        leaves = walk.leaves.len(),
        "flattened document"
    );

    DocumentView {
        document,
        tokens: walk.tokens,
        leaves: walk.leaves,
    }
}

#[derive(Default)]
struct Walk {
    tokens: Vec<Token>,
    leaves: Vec<LeafSpan>,
    heading: Option<NodeId>,
}

impl Walk {
    fn visit(&mut self, doc: &Document, node_id: NodeId) {
        let Some(node) = doc.node(node_id) else {
            return;
        };

        match node {
            Node::Text(text) => {
                if text.text.is_empty() {
                    return;
                }
                let start = self.tokens.len();
                self.tokens.extend(tokenize(&text.text));
                self.leaves.push(LeafSpan {
                    node: node_id,
                    start,
                    end: self.tokens.len(),
                    heading: self.heading,
                });
            }
            Node::Element(el) => match el.kind() {
                ElementKind::RawText => {}
                _ if el.tag == "template" => {}
                kind => {
                    if matches!(kind, ElementKind::Heading(_)) {
                        self.heading = Some(node_id);
                    }
                    for child in el.children.iter().copied() {
                        self.visit(doc, child);
                    }
                }
            },
            Node::Comment(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use docdelta_ir::parse_html;

    use super::*;

    #[test]
    fn leaves_partition_the_token_sequence() {
        let view = flatten(parse_html("<p>Hello <b>brave</b> world</p><p>合同</p>"));

        let ranges = view
            .leaves()
            .iter()
            .map(|leaf| (leaf.start, leaf.end))
            .collect::<Vec<_>>();
        assert_eq!(ranges, vec![(0, 2), (2, 3), (3, 5), (5, 7)]);
        assert_eq!(view.token_count(), 7);

        let texts = view
            .leaves()
            .iter()
            .map(|leaf| {
                view.leaf_tokens(leaf)
                    .iter()
                    .map(Token::as_str)
                    .collect::<String>()
            })
            .collect::<Vec<_>>();
        assert_eq!(texts, vec!["Hello ", "brave", " world", "合同"]);
    }

    #[test]
    fn raw_text_and_comments_are_not_leaves() {
        let view = flatten(parse_html(
            "<style>p { color: red }</style><!-- hidden --><p>shown</p>",
        ));
        assert_eq!(view.leaves().len(), 1);
        assert_eq!(view.tokens(), &[Token::from("shown")]);
    }

    #[test]
    fn template_content_is_skipped() {
        let view = flatten(parse_html(
            "<template><p>hidden &lt;b&gt;</p></template><p>shown</p>",
        ));
        assert_eq!(view.leaves().len(), 1);
        assert_eq!(view.tokens(), &[Token::from("shown")]);
    }

    #[test]
    fn leaves_record_the_last_opened_heading() {
        let view = flatten(parse_html(
            "<p>lead</p><h1>A</h1><p>x</p><section><h2>B</h2></section><p>y</p>",
        ));
        let doc = view.document();
        let headings = view
            .leaves()
            .iter()
            .map(|leaf| {
                leaf.heading
                    .and_then(|id| doc.node(id))
                    .and_then(Node::as_element)
                    .map(|el| el.tag.as_str())
            })
            .collect::<Vec<_>>();
        assert_eq!(
            headings,
            vec![None, Some("h1"), Some("h1"), Some("h2"), Some("h2")]
        );
    }

    #[test]
    fn document_without_text_has_no_leaves() {
        let view = flatten(parse_html("<div><img src=\"a.png\"><br></div>"));
        assert!(view.leaves().is_empty());
        assert_eq!(view.token_count(), 0);
    }
}
