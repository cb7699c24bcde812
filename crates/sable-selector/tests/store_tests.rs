//! Integration tests for the extension store.

mod common;

use common::{list, simple, span, span_at};
use sable_selector::{ExtendMode, ExtensionStore, MediaQuery, SelectorError};

fn print() -> Option<Vec<MediaQuery>> {
    Some(vec![MediaQuery::new("print")])
}

/// Register `extender {@extend target}` with a mandatory extension.
fn add_extension(store: &mut ExtensionStore, extender: &str, target: &str) {
    store
        .add_extension(&list(extender), &span(), &simple(target), &span(), None, false)
        .unwrap();
}

#[test]
fn test_extension_applies_to_existing_selector() {
    let mut store = ExtensionStore::new();
    let id = store.add_selector(list(".a"), span(), None).unwrap();
    add_extension(&mut store, ".b", ".a");
    assert_eq!(store.selector(id).to_string(), ".a, .b");
}

#[test]
fn test_extension_applies_to_later_selector() {
    let mut store = ExtensionStore::new();
    add_extension(&mut store, ".b", ".a");
    let id = store.add_selector(list(".x .a"), span(), None).unwrap();
    assert_eq!(store.selector(id).to_string(), ".x .a, .x .b");
}

#[test]
fn test_selector_ids_are_stable() {
    let mut store = ExtensionStore::new();
    let first = store.add_selector(list(".a"), span(), None).unwrap();
    let second = store.add_selector(list(".b"), span(), None).unwrap();
    add_extension(&mut store, ".c", ".a");
    assert_eq!(first.index(), 0);
    assert_eq!(second.index(), 1);
    assert_eq!(store.selector_count(), 2);
    assert_eq!(store.selector(second).to_string(), ".b");
}

#[test]
fn test_extensions_chain_through_living_selectors() {
    // .a {}  .b {@extend .a}  .c {@extend .b}
    let mut store = ExtensionStore::new();
    let a = store.add_selector(list(".a"), span(), None).unwrap();
    let b = store.add_selector(list(".b"), span(), None).unwrap();
    let c = store.add_selector(list(".c"), span(), None).unwrap();

    let extender = store.selector(b).clone();
    store
        .add_extension(&extender, &span_at(10), &simple(".a"), &span_at(11), None, false)
        .unwrap();
    let extender = store.selector(c).clone();
    store
        .add_extension(&extender, &span_at(20), &simple(".b"), &span_at(21), None, false)
        .unwrap();

    assert_eq!(store.selector(a).to_string(), ".a, .b, .c");
    assert_eq!(store.selector(b).to_string(), ".b, .c");
    assert_eq!(store.selector(c).to_string(), ".c");
}

#[test]
fn test_extension_cycle_does_not_repeat_original() {
    // .a {}  .b {@extend .a}  .a {@extend .b}
    let mut store = ExtensionStore::new();
    let id = store.add_selector(list(".a"), span(), None).unwrap();
    add_extension(&mut store, ".b", ".a");
    add_extension(&mut store, ".a", ".b");
    assert_eq!(store.selector(id).to_string(), ".a, .b");
}

#[test]
fn test_chained_extensions_reach_later_selectors() {
    let mut store = ExtensionStore::new();
    add_extension(&mut store, ".b", ".a");
    add_extension(&mut store, ".c", ".b");
    let id = store.add_selector(list(".a"), span(), None).unwrap();
    assert_eq!(store.selector(id).to_string(), ".a, .b, .c");
}

#[test]
fn test_repeated_extension_does_not_grow_selector() {
    let mut store = ExtensionStore::new();
    let id = store.add_selector(list(".a"), span(), None).unwrap();
    add_extension(&mut store, ".b", ".a");
    add_extension(&mut store, ".b", ".a");
    assert_eq!(store.selector(id).to_string(), ".a, .b");
}

#[test]
fn test_new_selectors_are_registered_under_their_simples() {
    let mut store = ExtensionStore::new();
    let _ = store.add_selector(list(".a"), span(), None).unwrap();
    add_extension(&mut store, ".b:hover", ".a");
    let simples: Vec<String> = store.simple_selectors().map(ToString::to_string).collect();
    assert!(simples.contains(&".b".to_string()), "{simples:?}");
    assert!(simples.contains(&":hover".to_string()), "{simples:?}");
}

#[test]
fn test_extension_across_media_queries_fails() {
    let mut store = ExtensionStore::new();
    let _ = store.add_selector(list(".a"), span(), None).unwrap();
    let error = store
        .add_extension(&list(".b"), &span(), &simple(".a"), &span(), print(), false)
        .unwrap_err();
    assert!(matches!(error, SelectorError::Nested { .. }));
    assert!(matches!(
        error.root_cause(),
        SelectorError::CrossMediaExtend { .. }
    ));
}

#[test]
fn test_extension_within_same_media_query_applies() {
    let mut store = ExtensionStore::new();
    let id = store.add_selector(list(".a"), span(), print()).unwrap();
    store
        .add_extension(&list(".b"), &span(), &simple(".a"), &span(), print(), false)
        .unwrap();
    assert_eq!(store.selector(id).to_string(), ".a, .b");
}

#[test]
fn test_media_extension_applied_to_later_plain_selector_fails() {
    let mut store = ExtensionStore::new();
    store
        .add_extension(&list(".b"), &span(), &simple(".a"), &span(), print(), false)
        .unwrap();
    let error = store.add_selector(list(".a"), span_at(5), None).unwrap_err();
    assert_eq!(error.span(), Some(&span_at(5)));
    assert!(matches!(
        error.root_cause(),
        SelectorError::CrossMediaExtend { .. }
    ));
}

#[test]
fn test_same_extension_in_different_media_queries_fails() {
    let mut store = ExtensionStore::new();
    store
        .add_extension(&list(".b"), &span(), &simple(".a"), &span_at(1), print(), false)
        .unwrap();
    let screen = Some(vec![MediaQuery::new("screen")]);
    let error = store
        .add_extension(&list(".b"), &span(), &simple(".a"), &span_at(2), screen, false)
        .unwrap_err();
    assert!(matches!(
        error.root_cause(),
        SelectorError::ConflictingMediaContexts { .. }
    ));
}

#[test]
fn test_unsatisfied_mandatory_extension_is_reported() {
    let mut store = ExtensionStore::new();
    let _ = store.add_selector(list(".a"), span(), None).unwrap();
    store
        .add_extension(&list(".b"), &span(), &simple(".missing"), &span_at(7), None, false)
        .unwrap();
    assert_eq!(
        store.check_unsatisfied_extensions(),
        Err(SelectorError::TargetNotFound {
            target: ".missing".to_string(),
            span: span_at(7),
        })
    );
}

#[test]
fn test_optional_extension_may_go_unsatisfied() {
    let mut store = ExtensionStore::new();
    store
        .add_extension(&list(".b"), &span(), &simple(".missing"), &span(), None, true)
        .unwrap();
    assert!(store.check_unsatisfied_extensions().is_ok());

    add_extension(&mut store, ".c", ".a");
    let _ = store.add_selector(list(".a"), span(), None).unwrap();
    assert!(store.check_unsatisfied_extensions().is_ok());
}

#[test]
fn test_extensions_where_target_reports_each_rule() {
    let mut store = ExtensionStore::new();
    store
        .add_extension(&list(".b"), &span(), &simple(".a"), &span_at(1), None, false)
        .unwrap();
    store
        .add_extension(&list(".b"), &span(), &simple(".a"), &span_at(2), None, false)
        .unwrap();
    store
        .add_extension(&list(".c"), &span(), &simple(".a"), &span_at(3), None, true)
        .unwrap();
    store
        .add_extension(&list(".d"), &span(), &simple(".x"), &span_at(4), None, false)
        .unwrap();

    let target = simple(".a");
    let extensions = store.extensions_where_target(|simple| *simple == target);
    let spans: Vec<_> = extensions.iter().map(|extension| extension.span.clone()).collect();
    assert_eq!(spans, [span_at(1), span_at(2)]);
}

#[test]
fn test_useless_extenders_are_ignored() {
    let mut store = ExtensionStore::new();
    let id = store.add_selector(list(".a"), span(), None).unwrap();
    add_extension(&mut store, ".b > > .c", ".a");
    assert_eq!(store.selector(id).to_string(), ".a");
}

#[test]
fn test_placeholder_target_is_extended() {
    let mut store = ExtensionStore::new();
    let id = store.add_selector(list("%p"), span(), None).unwrap();
    add_extension(&mut store, ".b", "%p");
    assert_eq!(store.selector(id).to_string(), "%p, .b");
}

#[test]
fn test_upstream_extensions_apply() {
    let mut upstream = ExtensionStore::new();
    add_extension(&mut upstream, ".e", ".a");
    add_extension(&mut upstream, ".d", "%-private");

    let mut store = ExtensionStore::new();
    let a = store.add_selector(list(".a"), span(), None).unwrap();
    let private = store.add_selector(list("%-private.x"), span(), None).unwrap();
    store.add_extensions([&upstream]).unwrap();

    assert_eq!(store.selector(a).to_string(), ".a, .e");
    assert_eq!(store.selector(private).to_string(), "%-private.x");
}

#[test]
fn test_empty_upstream_is_a_no_op() {
    let upstream = ExtensionStore::new();
    let mut store = ExtensionStore::new();
    let id = store.add_selector(list(".a"), span(), None).unwrap();
    store.add_extensions([&upstream]).unwrap();
    assert_eq!(store.selector(id).to_string(), ".a");
    assert!(store.is_empty());
}

#[test]
fn test_replace_mode_store_drops_originals() {
    let mut store = ExtensionStore::with_mode(ExtendMode::Replace);
    assert_eq!(store.mode(), ExtendMode::Replace);
    let id = store.add_selector(list(".x .a"), span(), None).unwrap();
    add_extension(&mut store, ".b", ".a");
    assert_eq!(store.selector(id).to_string(), ".x .b");
}
