//! Integration tests for specificity ranges.
//!
//! [§ 17 Calculating a selector's specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)

mod common;

use common::{complex, list, simple};
use sable_selector::Specificity;

#[test]
fn test_universal_has_no_specificity() {
    assert_eq!(simple("*").specificity(), Specificity::ZERO);
    assert_eq!(simple("*|*").specificity(), Specificity::ZERO);
}

#[test]
fn test_each_simple_selector_counts_once() {
    assert_eq!(complex("a.b.c").specificity(), Specificity::exact(3000));
    assert_eq!(complex("#a[href]::before").specificity(), Specificity::exact(3000));
    assert_eq!(complex("%placeholder").specificity(), Specificity::exact(1000));
}

#[test]
fn test_compounds_add_up_across_combinators() {
    assert_eq!(complex(".a > .b ~ c").specificity(), Specificity::exact(3000));
    assert_eq!(complex("* .a").specificity(), Specificity::exact(1000));
}

#[test]
fn test_selector_pseudo_takes_its_argument_range() {
    assert_eq!(
        simple(":not(.a, #b .c)").specificity(),
        Specificity::new(1000, 2000)
    );
    assert_eq!(
        complex("a:is(.x, .y.z)").specificity(),
        Specificity::new(2000, 3000)
    );
}

#[test]
fn test_nested_selector_pseudos() {
    let specificity = simple(":is(.a, :not(.b, .c.d))").specificity();
    assert_eq!(specificity, Specificity::new(1000, 2000));
}

#[test]
fn test_text_argument_pseudo_counts_once() {
    assert_eq!(simple(":nth-child(2n+1)").specificity(), Specificity::SIMPLE);
    assert_eq!(simple(":lang(en)").specificity(), Specificity::SIMPLE);
}

#[test]
fn test_list_spans_its_members() {
    let specificity = list(".a, #b.c .d, *").specificity();
    assert_eq!(specificity, Specificity::new(0, 3000));
}

#[test]
fn test_min_never_exceeds_max() {
    for text in [
        "*",
        ".a",
        ":is(.a, #b .c)",
        ".x :not(.a.b, c) > d",
        ":where(*, .a .b .c)",
        ":nth-child(2n of .a, .b.c)",
    ] {
        let complex = complex(text);
        assert!(complex.min_specificity() <= complex.max_specificity(), "{text}");
    }
}
