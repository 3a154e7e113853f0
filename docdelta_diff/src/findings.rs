use tracing::warn;

use crate::flatten::DocumentView;
use crate::model::{Finding, FindingLevel, Role};

pub(crate) fn collect_findings(original: &DocumentView, modified: &DocumentView) -> Vec<Finding> {
    let mut findings = Vec::new();
    collect_parse_findings(original, Role::Original, &mut findings);
    collect_parse_findings(modified, Role::Modified, &mut findings);
    collect_empty_findings(original, Role::Original, &mut findings);
    collect_empty_findings(modified, Role::Modified, &mut findings);

    if original.leaves().is_empty() && modified.leaves().is_empty() {
        findings.push(Finding {
            code: "no_text_content".to_string(),
            level: FindingLevel::Info,
            message: "neither document contains text to compare".to_string(),
            side: None,
        });
    }

    findings
}

fn collect_parse_findings(view: &DocumentView, side: Role, out: &mut Vec<Finding>) {
    for pf in &view.document().metadata.parse_findings {
        warn!(side = %side, code = %pf.code, "html parse uncertainty");
        let message = match &pf.tag {
            Some(tag) => format!("{} document: {} (`{}`)", side, pf.message, tag),
            None => format!("{} document: {}", side, pf.message),
        };
        out.push(Finding {
            code: "html_parse_uncertainty".to_string(),
            level: FindingLevel::Warning,
            message,
            side: Some(side),
        });
    }
}

fn collect_empty_findings(view: &DocumentView, side: Role, out: &mut Vec<Finding>) {
    if !view.leaves().is_empty() {
        return;
    }
    out.push(Finding {
        code: "empty_document".to_string(),
        level: FindingLevel::Info,
        message: format!("{side} document has no text content"),
        side: Some(side),
    });
}

#[cfg(test)]
mod tests {
    use docdelta_ir::parse_html;

    use super::*;
    use crate::flatten::flatten;

    fn codes(findings: &[Finding]) -> Vec<&str> {
        findings.iter().map(|f| f.code.as_str()).collect()
    }

    #[test]
    fn clean_documents_have_no_findings() {
        let a = flatten(parse_html("<p>a</p>"));
        let b = flatten(parse_html("<p>b</p>"));
        assert!(collect_findings(&a, &b).is_empty());
    }

    #[test]
    fn stray_end_tag_is_reported_for_its_side() {
        let a = flatten(parse_html("<p>a</p>"));
        let b = flatten(parse_html("<p>b</p></span>"));
        let findings = collect_findings(&a, &b);
        assert_eq!(codes(&findings), vec!["html_parse_uncertainty"]);
        assert_eq!(findings[0].side, Some(Role::Modified));
        assert_eq!(findings[0].level, FindingLevel::Warning);
    }

    #[test]
    fn empty_sides_are_reported() {
        let a = flatten(parse_html(""));
        let b = flatten(parse_html("<p>text</p>"));
        assert_eq!(codes(&collect_findings(&a, &b)), vec!["empty_document"]);

        let both = collect_findings(&a, &flatten(parse_html("<br>")));
        assert_eq!(
            codes(&both),
            vec!["empty_document", "empty_document", "no_text_content"]
        );
    }
}
