//! Integration tests for parent selector resolution.
//!
//! [CSS Nesting § 3.1](https://www.w3.org/TR/css-nesting-1/#nest-selector)

mod common;

use common::{list, simple};
use sable_selector::{SelectorError, SelectorList};

fn resolve(child: &str, parent: &str) -> Result<String, SelectorError> {
    list(child)
        .resolve_parent_selectors(Some(&list(parent)), true)
        .map(|resolved| resolved.to_string())
}

#[test]
fn test_implicit_parent_is_a_descendant() {
    assert_eq!(resolve("e", "c, d").unwrap(), "c e, d e");
}

#[test]
fn test_lists_nest_as_a_cross_product() {
    assert_eq!(resolve("c, d", "e, f").unwrap(), "e c, e d, f c, f d");
}

#[test]
fn test_lone_parent_is_replaced() {
    assert_eq!(resolve("&", ".a > .b").unwrap(), ".a > .b");
    assert_eq!(resolve("& .c", ".a, .b").unwrap(), ".a .c, .b .c");
    assert_eq!(resolve(".c &", ".a").unwrap(), ".c .a");
}

#[test]
fn test_parent_merges_with_compound() {
    assert_eq!(resolve("&.c", ".a .b").unwrap(), ".a .b.c");
    assert_eq!(resolve("&:hover", "a").unwrap(), "a:hover");
}

#[test]
fn test_suffix_extends_last_simple_selector() {
    assert_eq!(resolve("&-title", ".card").unwrap(), ".card-title");
    assert_eq!(resolve("&__item", ".a #list").unwrap(), ".a #list__item");
    assert_eq!(resolve("&-x.y", "div").unwrap(), "div-x.y");
    assert_eq!(resolve("&-b", "%a").unwrap(), "%a-b");
    assert_eq!(resolve("&-b", ":hover").unwrap(), ":hover-b");
}

#[test]
fn test_suffix_on_unsuffixable_parent_fails() {
    assert!(matches!(
        resolve("&-x", "*"),
        Err(SelectorError::InvalidSuffix { .. })
    ));
    assert!(matches!(
        resolve("&-x", "[href]"),
        Err(SelectorError::InvalidSuffix { .. })
    ));
    assert!(matches!(
        resolve("&-x", ":not(.a)"),
        Err(SelectorError::InvalidSuffix { .. })
    ));
}

#[test]
fn test_suffix_on_parent_ending_in_combinator_fails() {
    assert!(matches!(
        resolve("&-x", ".a >"),
        Err(SelectorError::IncompatibleParent { .. })
    ));
}

#[test]
fn test_parent_inside_selector_pseudo() {
    assert_eq!(resolve(":not(&)", ".a").unwrap(), ":not(.a)");
    assert_eq!(resolve(".b :not(&)", ".a").unwrap(), ".b :not(.a)");
    assert_eq!(resolve("&:is(& .b)", ".a").unwrap(), ".a:is(.a .b)");
}

#[test]
fn test_top_level_parent_fails() {
    let error = list("& .a").resolve_parent_selectors(None, true).unwrap_err();
    assert_eq!(error, SelectorError::TopLevelParent);
}

#[test]
fn test_top_level_without_parent_is_unchanged() {
    let selector = list(".a .b");
    assert_eq!(
        selector.resolve_parent_selectors(None, true).unwrap(),
        selector
    );
}

#[test]
fn test_no_implicit_parent_leaves_selector_alone() {
    let resolved = list(".c")
        .resolve_parent_selectors(Some(&list(".a")), false)
        .unwrap();
    assert_eq!(resolved.to_string(), ".c");
}

#[test]
fn test_contains_parent_selector() {
    assert!(list("& .a").contains_parent_selector());
    assert!(list(".a :not(&)").contains_parent_selector());
    assert!(!list(".a .b").contains_parent_selector());
}

#[test]
fn test_add_suffix() {
    assert_eq!(simple(".a").add_suffix("-b").unwrap().to_string(), ".a-b");
    assert_eq!(simple("#a").add_suffix("2").unwrap().to_string(), "#a2");
    assert!(simple("*").add_suffix("-b").is_err());
    assert!(simple(":nth-child(2n)").add_suffix("-b").is_err());
}

#[test]
fn test_resolved_selector_has_no_parent() {
    let resolved: SelectorList = list("& > &-b, .c &")
        .resolve_parent_selectors(Some(&list(".x, .y")), true)
        .unwrap();
    assert!(!resolved.contains_parent_selector());
    assert_eq!(resolved.components().len(), 6);
}
