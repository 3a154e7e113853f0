use crate::model::{DiffItem, DiffKind, DiffResult};

/// Format a markdown-oriented human report from a diff result.
pub fn format_markdown_report(result: &DiffResult, left_label: &str, right_label: &str) -> String {
    let mut out = String::new();
    out.push_str("# Document Diff Report\n\n");
    out.push_str(&format!("- Original: `{left_label}`\n"));
    out.push_str(&format!("- Modified: `{right_label}`\n\n"));

    out.push_str("## Stats\n\n");
    out.push_str(&format!(
        "- Inserted tokens: {}\n",
        result.stats.inserted_tokens
    ));
    out.push_str(&format!("- Deleted tokens: {}\n", result.stats.deleted_tokens));
    out.push_str(&format!(
        "- Replaced tokens: {}\n\n",
        result.stats.replaced_tokens
    ));

    out.push_str("## Changes\n\n");
    if result.diff_items.is_empty() {
        out.push_str("No changes detected.\n");
    } else {
        for (idx, item) in result.diff_items.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", idx + 1, describe_item(item)));
        }
    }

    if !result.findings.is_empty() {
        out.push_str("\n## Findings\n\n");
        for finding in &result.findings {
            out.push_str(&format!(
                "- {:?} [{}]: {}\n",
                finding.level, finding.code, finding.message
            ));
        }
    }

    out
}

fn describe_item(item: &DiffItem) -> String {
    let what = match item.kind {
        DiffKind::Insert => format!("Inserted {}", quote(&item.modified_text)),
        DiffKind::Delete => format!("Deleted {}", quote(&item.original_text)),
        DiffKind::Replace => format!(
            "Replaced {} with {}",
            quote(&item.original_text),
            quote(&item.modified_text)
        ),
    };

    let section = item
        .modified_location
        .as_ref()
        .and_then(|loc| loc.section_title.as_deref())
        .or_else(|| {
            item.original_location
                .as_ref()
                .and_then(|loc| loc.section_title.as_deref())
        });

    match section {
        Some(title) => format!("`{}` {what} in section \"{title}\"", item.id),
        None => format!("`{}` {what}", item.id),
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\n', " "))
}
