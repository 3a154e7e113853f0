use docdelta_diff::{DiffOptions, diff_html};
use serde_json::Value;

#[test]
fn diff_json_shape_contract() {
    let result = diff_html(
        "<h2>Clause 1</h2><p>The fee is fixed.</p>",
        "<h2>Clause 1</h2><p>The fee is variable.</p>",
        &DiffOptions::default(),
    )
    .expect("diff");
    let value = serde_json::to_value(&result).expect("serialize result");

    let obj = value.as_object().expect("result should be object");
    for key in [
        "diffHtml",
        "hasChanges",
        "stats",
        "diffItems",
        "highlightedOriginal",
        "highlightedModified",
        "findings",
    ] {
        assert!(obj.contains_key(key), "missing key {key}");
    }
    assert!(!obj.contains_key("diff_items"));

    let stats = obj
        .get("stats")
        .and_then(Value::as_object)
        .expect("stats object");
    assert_eq!(stats["insertedTokens"], 0);
    assert_eq!(stats["deletedTokens"], 0);
    assert_eq!(stats["replacedTokens"], 1);

    let items = obj
        .get("diffItems")
        .and_then(Value::as_array)
        .expect("diffItems should be array");
    assert_eq!(items.len(), 1);
    let item = items[0].as_object().expect("item object");
    assert_eq!(item["id"], "diff-1");
    assert_eq!(item["type"], "replace");
    assert_eq!(item["originalText"], "fixed");
    assert_eq!(item["modifiedText"], "variable");
    assert_eq!(item["originalLocation"]["sectionTitle"], "Clause 1");
    assert_eq!(
        item["modifiedLocation"]["blockSummary"],
        "The fee is variable."
    );
}

#[test]
fn absent_locations_are_omitted() {
    let result = diff_html("loose text", "loose words", &DiffOptions::default()).expect("diff");
    let value = serde_json::to_value(&result).expect("serialize result");
    let item = value["diffItems"][0].as_object().expect("item object");

    assert!(!item.contains_key("originalLocation"));
    assert!(!item.contains_key("modifiedLocation"));
}

#[test]
fn findings_carry_code_level_and_side() {
    let result = diff_html("", "<p>text</p>", &DiffOptions::default()).expect("diff");
    let value = serde_json::to_value(&result).expect("serialize result");
    let finding = value["findings"][0].as_object().expect("finding object");

    assert_eq!(finding["code"], "empty_document");
    assert_eq!(finding["level"], "info");
    assert_eq!(finding["side"], "original");
    assert!(finding.contains_key("message"));
}

#[test]
fn options_deserialize_with_defaults() {
    let options: DiffOptions =
        serde_json::from_str(r#"{"delete_anchor": "clamp-to-last-token"}"#).expect("options");
    assert_eq!(
        options,
        DiffOptions::default().with_delete_anchor(docdelta_diff::DeleteAnchor::ClampToLastToken)
    );
}
