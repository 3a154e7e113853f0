use std::sync::LazyLock;

use regex::Regex;

use crate::model::Token;

static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{P}$").expect("static punctuation pattern"));

/// Split text into diff tokens.
///
/// - each whitespace character is its own token
/// - each CJK ideograph and each punctuation mark is its own token
/// - everything else accumulates into runs (words, numbers)
///
/// CJK text therefore diffs per character while Latin prose diffs per word.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut run = String::new();

    for ch in text.chars() {
        if ch.is_whitespace() || is_cjk(ch) || is_punctuation(ch) {
            if !run.is_empty() {
                tokens.push(Token::from(std::mem::take(&mut run)));
            }
            tokens.push(Token::from(ch.to_string()));
        } else {
            run.push(ch);
        }
    }

    if !run.is_empty() {
        tokens.push(Token::from(run));
    }

    tokens
}

/// CJK unified ideographs (including extensions A-E) and compatibility ideographs.
pub fn is_cjk(ch: char) -> bool {
    matches!(
        ch,
        '\u{3400}'..='\u{4DBF}'
            | '\u{4E00}'..='\u{9FFF}'
            | '\u{F900}'..='\u{FAFF}'
            | '\u{20000}'..='\u{2A6DF}'
            | '\u{2A700}'..='\u{2B73F}'
            | '\u{2B740}'..='\u{2B81F}'
            | '\u{2B820}'..='\u{2CEAF}'
            | '\u{2F800}'..='\u{2FA1F}'
    )
}

/// Unicode general category `P*`.
pub fn is_punctuation(ch: char) -> bool {
    if ch.is_ascii_alphanumeric() {
        return false;
    }
    PUNCTUATION.is_match(ch.encode_utf8(&mut [0; 4]))
}
