use docdelta_diff::{DiffOptions, diff_html, format_markdown_report};

#[test]
fn markdown_report_lists_changes_with_sections() {
    let result = diff_html(
        "<h2>Clause 3</h2><p>Payment is due monthly.</p>",
        "<h2>Clause 3</h2><p>Payment is due weekly.</p>",
        &DiffOptions::default(),
    )
    .expect("diff");
    let report = format_markdown_report(&result, "v1.html", "v2.html");

    assert!(report.contains("# Document Diff Report"));
    assert!(report.contains("- Original: `v1.html`"));
    assert!(report.contains("- Replaced tokens: 1"));
    assert!(report.contains(
        "1. `diff-1` Replaced \"monthly\" with \"weekly\" in section \"Clause 3\""
    ));
    assert!(!report.contains("## Findings"));
}

#[test]
fn unchanged_documents_report_no_changes() {
    let html = "<p>same</p>";
    let result = diff_html(html, html, &DiffOptions::default()).expect("diff");
    let report = format_markdown_report(&result, "a", "b");

    assert!(report.contains("No changes detected."));
}

#[test]
fn findings_section_is_rendered() {
    let result = diff_html("<p>a</p></div>", "<p>a</p>", &DiffOptions::default()).expect("diff");
    let report = format_markdown_report(&result, "a", "b");

    assert!(report.contains("## Findings"));
    assert!(report.contains("Warning [html_parse_uncertainty]"));
}
