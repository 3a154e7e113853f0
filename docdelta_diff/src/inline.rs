use docdelta_ir::escape_text;

use crate::classify::join_tokens;
use crate::model::{DiffOpcode, OpKind, Token};

/// Render both token streams as one escaped text view with `<del>`/`<ins>` markup.
///
/// Equal runs are taken from the modified side. Replacements render the
/// deleted text first. Opcodes must already be validated against both sides.
pub(crate) fn render_inline(opcodes: &[DiffOpcode], original: &[Token], modified: &[Token]) -> String {
    let mut out = String::new();

    for op in opcodes {
        let removed = &original[op.i1..op.i2];
        let added = &modified[op.j1..op.j2];
        match op.kind {
            OpKind::Equal => escape_text(&join_tokens(added), &mut out),
            OpKind::Delete => wrap("del", removed, &mut out),
            OpKind::Insert => wrap("ins", added, &mut out),
            OpKind::Replace => {
                wrap("del", removed, &mut out);
                wrap("ins", added, &mut out);
            }
        }
    }

    out
}

fn wrap(tag: &str, tokens: &[Token], out: &mut String) {
    if tokens.is_empty() {
        return;
    }
    out.push('<');
    out.push_str(tag);
    out.push('>');
    escape_text(&join_tokens(tokens), out);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::align;
    use crate::tokenize::tokenize;

    fn inline(a: &str, b: &str) -> String {
        let a = tokenize(a);
        let b = tokenize(b);
        render_inline(&align(&a, &b).expect("align"), &a, &b)
    }

    #[test]
    fn insert_and_replace_markup() {
        assert_eq!(
            inline("Hello world", "Hello brave world"),
            "Hello <ins>brave </ins>world"
        );
        assert_eq!(inline("A B C", "A X C"), "A <del>B</del><ins>X</ins> C");
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(inline("a < b", "a < b & c"), "a &lt; b<ins> &amp; c</ins>");
    }
}
