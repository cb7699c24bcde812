//! Integration tests for one-shot `extend` and `replace`.

mod common;

use common::{list, span};
use sable_selector::{SelectorError, extend, replace};

fn extend_text(selector: &str, source: &str, targets: &str) -> String {
    extend(&list(selector), &list(source), &list(targets), &span())
        .unwrap()
        .to_string()
}

fn replace_text(selector: &str, source: &str, targets: &str) -> String {
    replace(&list(selector), &list(source), &list(targets), &span())
        .unwrap()
        .to_string()
}

#[test]
fn test_extend_adds_source_after_original() {
    assert_eq!(extend_text(".c", ".e", ".c"), ".c, .e");
    assert_eq!(extend_text(".a .b", ".x", ".b"), ".a .b, .a .x");
}

#[test]
fn test_extend_keeps_list_order() {
    assert_eq!(extend_text(".a, .b", ".x", ".a"), ".a, .x, .b");
}

#[test]
fn test_extend_source_repeating_an_original_is_not_duplicated() {
    assert_eq!(extend_text(".a, .c", ".x, .a", ".c"), ".a, .c, .x");
}

#[test]
fn test_extend_weaves_complex_sources() {
    assert_eq!(
        extend_text(".a .b", ".x .y", ".b"),
        ".a .b, .a .x .y, .x .a .y"
    );
}

#[test]
fn test_extend_unifies_with_rest_of_compound() {
    assert_eq!(extend_text(".a.b", ".x", ".a"), ".a.b, .b.x");
}

#[test]
fn test_extend_with_compound_target_needs_every_simple() {
    assert_eq!(extend_text(".a.b", ".x", ".a.b"), ".a.b, .x");
    assert_eq!(extend_text(".a", ".x", ".a.b"), ".a");
}

#[test]
fn test_unmatched_target_leaves_selector_alone() {
    assert_eq!(extend_text(".a .b", ".x", ".c"), ".a .b");
    assert_eq!(replace_text(".a .b", ".x", ".c"), ".a .b");
}

#[test]
fn test_replace_drops_original() {
    assert_eq!(replace_text("c", "d", "c"), "d");
    assert_eq!(replace_text(".a.b", ".x", ".a"), ".b.x");
    assert_eq!(replace_text(".a .b", ".x", ".b"), ".a .x");
}

#[test]
fn test_complex_target_is_rejected() {
    let error = extend(&list(".a"), &list(".x"), &list(".a .b"), &span()).unwrap_err();
    assert_eq!(
        error,
        SelectorError::ComplexTarget {
            selector: ".a .b".to_string()
        }
    );
    assert!(replace(&list(".a"), &list(".x"), &list(".a > .b"), &span()).is_err());
}

#[test]
fn test_not_is_split_per_extender() {
    assert_eq!(extend_text(":not(.a)", ".x", ".a"), ":not(.a):not(.x)");
}

#[test]
fn test_not_drops_complex_extenders() {
    assert_eq!(extend_text(":not(.a)", ".x .y", ".a"), ":not(.a)");
}

#[test]
fn test_is_argument_gains_extender() {
    assert_eq!(extend_text(":is(.a)", ".x", ".a"), ":is(.a, .x)");
}

#[test]
fn test_extend_is_idempotent() {
    let once = extend(&list(".a .b"), &list(".x"), &list(".b"), &span()).unwrap();
    let twice = extend(&once, &list(".x"), &list(".b"), &span()).unwrap();
    assert_eq!(once, twice);
}
