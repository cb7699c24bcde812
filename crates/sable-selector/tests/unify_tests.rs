//! Integration tests for unification and weaving.

mod common;

use common::{complex, compound, list, simple};
use sable_selector::ComplexSelectorItem;
use sable_selector::weave::weave;

fn unify(a: &str, b: &str) -> Option<String> {
    list(a).unify(&list(b)).map(|unified| unified.to_string())
}

fn unify_compounds(a: &str, b: &str) -> Option<String> {
    compound(a)
        .unify(&compound(b))
        .map(|unified| unified.to_string())
}

/// Whether `a` and `b` match exactly the same elements.
fn equivalent(a: &str, b: &str) -> bool {
    let (a, b) = (list(a), list(b));
    a.is_superselector(&b) && b.is_superselector(&a)
}

// Compound unification

#[test]
fn test_distinct_ids_are_disjoint() {
    assert_eq!(unify("#c", "#d"), None);
    assert_eq!(unify("#c", "#c").as_deref(), Some("#c"));
    assert_eq!(unify_compounds("#c.a", "#c.b").as_deref(), Some("#c.b.a"));
}

#[test]
fn test_type_selectors_go_first() {
    assert_eq!(unify_compounds("a", ".b").as_deref(), Some("a.b"));
    assert_eq!(unify_compounds(".b", "a").as_deref(), Some("a.b"));
    assert_eq!(unify_compounds("*", "a").as_deref(), Some("a"));
    assert_eq!(unify_compounds("a", "*").as_deref(), Some("a"));
    assert_eq!(unify_compounds("a", "b"), None);
}

#[test]
fn test_namespaces_must_agree() {
    assert_eq!(unify_compounds("ns|a", "|a"), None);
    assert_eq!(unify_compounds("*|a", "ns|a").as_deref(), Some("ns|a"));
    assert_eq!(unify_compounds("ns|*", "a"), None);
    assert_eq!(unify_compounds("*|*", ".b").as_deref(), Some(".b"));
}

#[test]
fn test_duplicates_are_merged() {
    assert_eq!(unify_compounds(".a", ".a").as_deref(), Some(".a"));
    assert_eq!(unify_compounds(".a.b", ".b").as_deref(), Some(".b.a"));
}

#[test]
fn test_only_one_pseudo_element() {
    assert_eq!(unify_compounds(".a::before", ".b::after"), None);
    assert!(equivalent(
        &unify_compounds(".a::before", ".b").unwrap(),
        ".a.b::before"
    ));
}

#[test]
fn test_pseudo_classes_stay_before_pseudo_elements() {
    let unified = unify_compounds(":hover", ".a::before").unwrap();
    assert_eq!(unified, ".a:hover::before");
}

#[test]
fn test_host_only_unifies_with_selector_pseudos() {
    assert_eq!(unify_compounds(":host", ".a"), None);
    assert!(unify_compounds(":host", ":is(.a)").is_some());
}

#[test]
fn test_simple_unify_adds_to_compound() {
    let compound = compound(".a:hover");
    let unified = simple(".b").unify(compound.components()).unwrap();
    let texts: Vec<String> = unified.iter().map(ToString::to_string).collect();
    assert_eq!(texts, [".a", ".b", ":hover"]);
}

// Complex unification

#[test]
fn test_child_and_descendant_weave() {
    assert_eq!(unify(".c > .d", ".e .f").as_deref(), Some(".e .c > .d.f"));
}

#[test]
fn test_weaving_order_depends_on_argument_order() {
    let forward = unify(".c > .d", ".e .f").unwrap();
    let backward = unify(".e .f", ".c > .d").unwrap();
    assert_eq!(backward, ".e .c > .f.d");
    assert!(equivalent(&forward, &backward));
}

#[test]
fn test_unified_selector_keeps_every_ancestor() {
    let unified = list(".e .f").unify(&list(".c > .d")).unwrap();
    assert!(list(".e .f").is_superselector(&unified));
    // Dropping the `.e` ancestor would match elements outside `.e .f`.
    assert!(!list(".e .f").is_superselector(&list(".c > .d.f")));
}

#[test]
fn test_independent_parents_give_alternatives() {
    assert_eq!(
        unify(".a .b", ".c .d").as_deref(),
        Some(".a .c .b.d, .c .a .b.d")
    );
}

#[test]
fn test_shared_parent_is_not_duplicated() {
    assert_eq!(unify(".a .b", ".a .c").as_deref(), Some(".a .b.c"));
}

#[test]
fn test_root_appears_once() {
    assert_eq!(unify(":root .a", ":root .b").as_deref(), Some(":root .a.b"));
}

#[test]
fn test_disjoint_bases_fail() {
    assert_eq!(unify(".a #b", ".c #d"), None);
}

#[test]
fn test_trailing_combinator_fails() {
    assert_eq!(unify(".a >", ".b"), None);
}

#[test]
fn test_list_unification_is_a_cross_product() {
    assert_eq!(unify(".a, .b", ".c").as_deref(), Some(".a.c, .b.c"));
    assert_eq!(unify("#a, #b", "#c"), None);
    assert_eq!(unify("#a, .b", "#c").as_deref(), Some(".b#c"));
}

#[test]
fn test_complex_unify_returns_alternatives() {
    let unified = complex(".a .b").unify(&complex(".c .d")).unwrap();
    assert_eq!(unified.len(), 2);
    assert_eq!(unified[0].to_string(), ".a .c .b.d");
}

// Weaving

fn items(text: &str) -> Vec<ComplexSelectorItem> {
    complex(text).into_components()
}

fn render(woven: Vec<Vec<ComplexSelectorItem>>) -> Vec<String> {
    woven
        .into_iter()
        .map(|items| sable_selector::ComplexSelector::new(items, false).to_string())
        .collect()
}

#[test]
fn test_weave_single_selector_is_unchanged() {
    assert_eq!(render(weave(vec![items(".a > .b")])), [".a > .b"]);
}

#[test]
fn test_weave_nests_each_selector_under_the_previous() {
    assert_eq!(render(weave(vec![items(".a"), items(".b")])), [".a .b"]);
    assert_eq!(
        render(weave(vec![items(".a .b"), items(".c .d")])),
        [".a .b .c .d", ".c .a .b .d"]
    );
}

#[test]
fn test_weave_merges_superselector_parents() {
    assert_eq!(
        render(weave(vec![items(".a .b"), items(".a.x .d")])),
        [".a.x .b .d"]
    );
}
