/// Collapse every whitespace run to one space and trim both ends.
pub(crate) fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep the first `limit` characters, appending `…` when anything was cut.
pub(crate) fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte, _)) => format!("{}…", &text[..byte]),
        None => text.to_string(),
    }
}

/// Collapsed and truncated excerpt, or `None` when nothing visible remains.
pub(crate) fn excerpt(raw: &str, limit: usize) -> Option<String> {
    let collapsed = collapse_whitespace(raw);
    if collapsed.is_empty() {
        return None;
    }
    Some(truncate_chars(&collapsed, limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(collapse_whitespace("  a\n\tb   c "), "a b c");
        assert_eq!(collapse_whitespace(" \n "), "");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("合同条款", 2), "合同…");
        assert_eq!(truncate_chars("short", 5), "short");
        assert_eq!(truncate_chars("longer", 3), "lon…");
    }

    #[test]
    fn blank_excerpt_is_none() {
        assert_eq!(excerpt("   ", 10), None);
        assert_eq!(excerpt(" Clause  3 ", 60).as_deref(), Some("Clause 3"));
    }
}
