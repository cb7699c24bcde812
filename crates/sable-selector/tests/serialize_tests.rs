//! Integration tests for selector serialization.

mod common;

use common::{list, simple};
use sable_selector::{Combinator, ComplexSelector, ComplexSelectorItem, SelectorList};

#[test]
fn test_display_round_trips_through_parser() {
    for text in [
        ".a",
        "a.b#c",
        ".a > .b + .c ~ .d .e",
        "svg|rect, *|*, |a",
        "[href]",
        "[lang|=en]",
        "[data-x^=foo i]",
        "a:hover::before",
        ":not(.a, .b)",
        ":nth-child(2n+1 of .a)",
        ":nth-child(odd)",
        "%placeholder",
        "&-suffix .a",
        "> .a",
        ".a +",
    ] {
        let parsed = list(text);
        assert_eq!(parsed.to_string(), text);
        assert_eq!(list(&parsed.to_string()), parsed, "{text}");
    }
}

#[test]
fn test_line_breaks_are_preserved() {
    let selector = list(".a,\n.b, .c");
    assert!(!selector.components()[0].line_break());
    assert!(selector.components()[1].line_break());
    assert!(!selector.components()[2].line_break());
    assert_eq!(selector.to_string(), ".a,\n.b, .c");
}

#[test]
fn test_attribute_values_are_quoted_when_needed() {
    assert_eq!(simple("[title=\"a b\"]").to_string(), "[title=\"a b\"]");
    assert_eq!(simple("[title='plain']").to_string(), "[title=plain]");
    assert_eq!(simple("[x*=\"1st\"]").to_string(), "[x*=\"1st\"]");
}

#[test]
fn test_combinators_are_spaced() {
    let complex = ComplexSelector::new(
        vec![
            ComplexSelectorItem::Comb(Combinator::Child),
            ComplexSelectorItem::Comb(Combinator::NextSibling),
        ],
        false,
    );
    assert_eq!(complex.to_string(), "> +");
}

#[test]
fn test_json_round_trip() {
    let selector = list(".a > b:not(#c),\n[d~=e] %f::after");
    let json = serde_json::to_string(&selector).unwrap();
    let decoded: SelectorList = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, selector);
    assert_eq!(decoded.to_string(), selector.to_string());
}

#[test]
fn test_json_rejects_empty_selectors() {
    assert!(serde_json::from_str::<SelectorList>("[]").is_err());
    assert!(serde_json::from_str::<SelectorList>(r#"[{"components": []}]"#).is_err());
}
