use docdelta_ir::parse_html;
use proptest::prelude::*;

fn paragraph_strategy() -> impl Strategy<Value = String> {
    let text = prop::string::string_regex("[a-zA-Z0-9 ,.]{0,30}").expect("valid regex");
    prop::collection::vec(text, 0..12).prop_map(|paras| {
        paras
            .into_iter()
            .map(|p| format!("<p>{p}</p>"))
            .collect::<String>()
    })
}

proptest! {
    #[test]
    fn canonical_paragraphs_round_trip(input in paragraph_strategy()) {
        let doc = parse_html(&input);
        prop_assert_eq!(doc.render(), input);
    }

    #[test]
    fn parser_is_total_on_arbitrary_text(input in "\\PC{0,80}") {
        let doc = parse_html(&input);
        let _ = doc.render();
    }
}
