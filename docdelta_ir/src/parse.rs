use html5gum::{State, Token, Tokenizer};
use tracing::debug;

use crate::{
    CommentNode, Document, DocumentMetadata, ElementKind, ElementNode, Node, NodeId,
    ParseFinding, TextNode, element_kind,
};

/// Tags whose start closes an open `<p>`.
const CLOSES_PARAGRAPH: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "div",
    "dl",
    "fieldset",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "ul",
];

/// Parse an HTML body (or full page) into an arena [`Document`].
///
/// Parsing is lenient and total:
/// - text outside any element is kept as a root text node
/// - adjacent character data is merged into one text node
/// - stray end tags are ignored and reported in `metadata.parse_findings`
/// - tokenizer errors are reported as findings; structure built so far is kept
pub fn parse_html(input: &str) -> Document {
    let mut doc = Document::new(DocumentMetadata {
        source_name: None,
        doctype: None,
        original_bytes: input.len(),
        parse_findings: Vec::new(),
    });

    let mut tokenizer = Tokenizer::new(input);
    let mut open: Vec<NodeId> = Vec::new();

    while let Some(token_result) = tokenizer.next() {
        let token = match token_result {
            Ok(token) => token,
            Err(_) => {
                doc.metadata.parse_findings.push(ParseFinding {
                    code: "tokenizer-failure".to_string(),
                    message: "tokenizer stopped early; remaining input was not parsed"
                        .to_string(),
                    tag: None,
                });
                break;
            }
        };

        match token {
            Token::StartTag(tag) => {
                let name = String::from_utf8_lossy(&tag.name).to_ascii_lowercase();
                let attrs: Vec<(String, String)> = tag
                    .attributes
                    .iter()
                    .map(|(k, v)| {
                        (
                            String::from_utf8_lossy(k).into_owned(),
                            String::from_utf8_lossy(v).into_owned(),
                        )
                    })
                    .collect();

                close_implied(&doc, &mut open, &name);

                let id = doc.insert_node(Node::Element(ElementNode {
                    tag: name.clone(),
                    attrs,
                    children: Vec::new(),
                    parent: None,
                }));
                doc.append(open.last().copied(), id);

                let kind = element_kind(&name);
                if !tag.self_closing && kind != ElementKind::Void {
                    match name.as_str() {
                        "script" | "style" => tokenizer.set_state(State::ScriptData),
                        "textarea" | "title" => tokenizer.set_state(State::RcData),
                        _ => {}
                    }
                    open.push(id);
                }
            }
            Token::EndTag(tag) => {
                let name = String::from_utf8_lossy(&tag.name).to_ascii_lowercase();
                let matching = open
                    .iter()
                    .rposition(|id| tag_of(&doc, *id) == Some(name.as_str()));

                match matching {
                    Some(idx) => open.truncate(idx),
                    None if element_kind(&name) == ElementKind::Void => {}
                    None => doc.metadata.parse_findings.push(ParseFinding {
                        code: "stray-end-tag".to_string(),
                        message: format!("end tag </{name}> has no open element; ignored"),
                        tag: Some(name),
                    }),
                }
            }
            Token::String(text) => {
                let text = String::from_utf8_lossy(&text);
                push_text(&mut doc, open.last().copied(), &text);
            }
            Token::Comment(text) => {
                let id = doc.insert_node(Node::Comment(CommentNode {
                    text: String::from_utf8_lossy(&text).into_owned(),
                    parent: None,
                }));
                doc.append(open.last().copied(), id);
            }
            Token::Doctype(doctype) => {
                let name = String::from_utf8_lossy(&doctype.name).to_ascii_lowercase();
                if !name.is_empty() {
                    doc.metadata.doctype = Some(name);
                }
            }
            Token::Error(err) => {
                doc.metadata.parse_findings.push(ParseFinding {
                    code: "html-syntax".to_string(),
                    message: format!("{err:?}"),
                    tag: open
                        .last()
                        .and_then(|id| tag_of(&doc, *id))
                        .map(ToString::to_string),
                });
            }
        }
    }

    debug!(
        nodes = doc.arena.len(),
        roots = doc.roots.len(),
        findings = doc.metadata.parse_findings.len(),
        "parsed html document"
    );

    doc
}

/// Pop open elements that the incoming start tag closes implicitly.
fn close_implied(doc: &Document, open: &mut Vec<NodeId>, incoming: &str) {
    while let Some(top) = open.last().copied() {
        let Some(current) = tag_of(doc, top) else {
            break;
        };
        if closes_implicitly(current, incoming) {
            open.pop();
        } else {
            break;
        }
    }
}

fn closes_implicitly(open: &str, incoming: &str) -> bool {
    match open {
        "p" => CLOSES_PARAGRAPH.contains(&incoming),
        "li" => incoming == "li",
        "dt" | "dd" => matches!(incoming, "dt" | "dd"),
        "tr" => incoming == "tr",
        "td" | "th" => matches!(incoming, "td" | "th" | "tr"),
        "option" => incoming == "option",
        _ => false,
    }
}

fn tag_of(doc: &Document, id: NodeId) -> Option<&str> {
    doc.node(id)
        .and_then(Node::as_element)
        .map(|el| el.tag.as_str())
}

fn push_text(doc: &mut Document, parent: Option<NodeId>, text: &str) {
    if text.is_empty() {
        return;
    }

    // Merge into the previous sibling when it is already a text node.
    if let Some(last) = doc.children(parent).last().copied()
        && let Some(Node::Text(existing)) = doc.node_mut(last)
    {
        existing.text.push_str(text);
        return;
    }

    let id = doc.insert_node(Node::Text(TextNode {
        text: text.to_string(),
        parent: None,
    }));
    doc.append(parent, id);
}
