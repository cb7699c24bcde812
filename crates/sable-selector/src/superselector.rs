//! The superselector relation.
//!
//! `a` is a superselector of `b` when every element `b` matches is also
//! matched by `a`. The relation is conservative: `false` means "not provably
//! a superselector", never an error.
//!
//! The checks work on item slices rather than on [`ComplexSelector`] so that
//! weaving and extension can ask about partial sequences without building
//! intermediate selectors.

use crate::ast::{
    Combinator, ComplexSelector, ComplexSelectorItem, CompoundSelector, PseudoSelector,
    SelectorList, SimpleSelector,
};

/// Pseudo-classes whose selector argument may match ordinary selectors, so
/// that `.a` is a superselector of `:is(.a.b)`.
const SUBSELECTOR_PSEUDOS: [&str; 5] = ["is", "matches", "any", "nth-child", "nth-last-child"];

impl SelectorList {
    /// Whether this list matches every element that `other` matches.
    #[must_use]
    pub fn is_superselector(&self, other: &Self) -> bool {
        list_is_superselector(self.components(), other.components())
    }
}

impl ComplexSelector {
    /// Whether this selector matches every element that `other` matches.
    #[must_use]
    pub fn is_superselector(&self, other: &Self) -> bool {
        complex_is_superselector(self.components(), other.components())
    }
}

impl CompoundSelector {
    /// Whether this compound matches every element that `other` matches.
    #[must_use]
    pub fn is_superselector(&self, other: &Self) -> bool {
        compound_is_superselector(self, other, None)
    }
}

/// Whether `list1` is a superselector of `list2`: every complex selector in
/// `list2` has a superselector in `list1`.
#[must_use]
pub fn list_is_superselector(list1: &[ComplexSelector], list2: &[ComplexSelector]) -> bool {
    list2.iter().all(|complex2| {
        list1
            .iter()
            .any(|complex1| complex_is_superselector(complex1.components(), complex2.components()))
    })
}

/// Like [`complex_is_superselector`], but compares `complex1` and `complex2`
/// as the parents of some shared child.
///
/// This differs from the plain check in that `.foo` is not a parent
/// superselector of `.foo > .bar`: as parents, the trailing `.bar` would
/// be a descendant of `.foo` rather than `.foo` itself.
#[must_use]
pub fn complex_is_parent_superselector(
    complex1: &[ComplexSelectorItem],
    complex2: &[ComplexSelectorItem],
) -> bool {
    if complex1.first().is_some_and(ComplexSelectorItem::is_combinator)
        || complex2.first().is_some_and(ComplexSelectorItem::is_combinator)
    {
        return false;
    }
    if complex1.len() > complex2.len() {
        return false;
    }

    let base = ComplexSelectorItem::Compound(CompoundSelector::single(
        SimpleSelector::placeholder("<temp>"),
    ));
    let mut with_base1 = complex1.to_vec();
    with_base1.push(base.clone());
    let mut with_base2 = complex2.to_vec();
    with_base2.push(base);
    complex_is_superselector(&with_base1, &with_base2)
}

/// Whether the complex selector made of `complex1` is a superselector of the
/// one made of `complex2`.
///
/// Selectors that begin or end with a combinator are never superselectors
/// or subselectors of anything.
#[must_use]
pub fn complex_is_superselector(
    complex1: &[ComplexSelectorItem],
    complex2: &[ComplexSelectorItem],
) -> bool {
    if complex1.last().is_none_or(ComplexSelectorItem::is_combinator)
        || complex2.last().is_none_or(ComplexSelectorItem::is_combinator)
    {
        return false;
    }

    let mut i1 = 0;
    let mut i2 = 0;
    loop {
        let remaining1 = complex1.len() - i1;
        let remaining2 = complex2.len() - i2;
        if remaining1 == 0 || remaining2 == 0 {
            return false;
        }

        // A longer selector is never a superselector of a shorter one.
        if remaining1 > remaining2 {
            return false;
        }

        let ComplexSelectorItem::Compound(compound1) = &complex1[i1] else {
            return false;
        };
        if complex2[i2].is_combinator() {
            return false;
        }

        if remaining1 == 1 {
            let parents = &complex2[i2..complex2.len() - 1];
            if has_consecutive_combinators(parents) {
                return false;
            }
            let Some(ComplexSelectorItem::Compound(last2)) = complex2.last() else {
                return false;
            };
            return compound_is_superselector(compound1, last2, Some(parents));
        }

        // Find the first index where `complex2[i2..after]` is a subselector
        // of `compound1`. Stop one short of the end, because `complex1` has
        // more items left to match after this one.
        let mut after = i2 + 1;
        while after < complex2.len() {
            if let ComplexSelectorItem::Compound(compound2) = &complex2[after - 1] {
                let parents = &complex2[i2..after - 1];
                if compound_is_superselector(compound1, compound2, Some(parents)) {
                    break;
                }
            }
            after += 1;
        }
        if after == complex2.len() {
            return false;
        }

        let combinator1 = complex1[i1 + 1].as_combinator();
        let combinator2 = complex2[after].as_combinator();
        match (combinator1, combinator2) {
            (Some(combinator1), combinator2) => {
                let Some(combinator2) = combinator2 else {
                    return false;
                };

                // `.a ~ .b` is a superselector of `.a + .b`; otherwise the
                // combinators have to match.
                if combinator1 == Combinator::FollowingSibling {
                    if combinator2 == Combinator::Child {
                        return false;
                    }
                } else if combinator2 != combinator1 {
                    return false;
                }

                // `.a > .c` is not a superselector of `.a > .b > .c` or
                // `.a > .b .c`, even though `.c` is a superselector of
                // `.b > .c` and `.b .c`. Same for `+` and `~`.
                if remaining1 == 3 && remaining2 > 3 {
                    return false;
                }

                i1 += 2;
                i2 = after + 1;
            }
            (None, Some(combinator2)) => {
                if combinator2 != Combinator::Child {
                    return false;
                }
                i1 += 1;
                i2 = after + 1;
            }
            (None, None) => {
                i1 += 1;
                i2 = after;
            }
        }
    }
}

fn has_consecutive_combinators(items: &[ComplexSelectorItem]) -> bool {
    items
        .windows(2)
        .any(|pair| pair[0].is_combinator() && pair[1].is_combinator())
}

/// Whether `compound1` is a superselector of `compound2`.
///
/// `parents`, if given, are the items that precede `compound2` in its
/// complex selector. They let `:is(.a .b)` count as a superselector of
/// `.b` when `.b` is known to sit inside `.a`.
#[must_use]
pub fn compound_is_superselector(
    compound1: &CompoundSelector,
    compound2: &CompoundSelector,
    parents: Option<&[ComplexSelectorItem]>,
) -> bool {
    // Every simple selector in `compound1` needs a match in `compound2`.
    for simple1 in compound1.components() {
        let covered = match simple1 {
            SimpleSelector::Pseudo(pseudo1) if pseudo1.selector().is_some() => {
                selector_pseudo_is_superselector(pseudo1, compound2, parents)
            }
            _ => simple_is_superselector_of_compound(simple1, compound2),
        };
        if !covered {
            return false;
        }
    }

    // `compound1` can't be a superselector of a selector with plain
    // pseudo-elements that `compound1` doesn't share.
    compound2.components().iter().all(|simple2| match simple2 {
        SimpleSelector::Pseudo(pseudo2) if pseudo2.is_element() && pseudo2.selector().is_none() => {
            simple_is_superselector_of_compound(simple2, compound1)
        }
        _ => true,
    })
}

/// Whether `simple` is a superselector of `compound`.
fn simple_is_superselector_of_compound(simple: &SimpleSelector, compound: &CompoundSelector) -> bool {
    compound.components().iter().any(|their_simple| {
        if simple == their_simple {
            return true;
        }

        // Some selector pseudo-classes can match ordinary selectors.
        let SimpleSelector::Pseudo(pseudo) = their_simple else {
            return false;
        };
        let Some(selector) = pseudo.selector() else {
            return false;
        };
        if !SUBSELECTOR_PSEUDOS.contains(&pseudo.normalized_name()) {
            return false;
        }

        selector.components().iter().all(|complex| {
            complex
                .as_single_compound()
                .is_some_and(|compound| compound.components().contains(simple))
        })
    })
}

/// Whether `pseudo1`, which has a selector argument, is a superselector of
/// `compound2`.
fn selector_pseudo_is_superselector(
    pseudo1: &PseudoSelector,
    compound2: &CompoundSelector,
    parents: Option<&[ComplexSelectorItem]>,
) -> bool {
    let Some(selector1) = pseudo1.selector() else {
        return simple_is_superselector_of_compound(
            &SimpleSelector::Pseudo(pseudo1.clone()),
            compound2,
        );
    };

    match pseudo1.normalized_name() {
        "is" | "matches" | "any" | "where" => {
            selector_pseudo_args(compound2, pseudo1.name(), true)
                .any(|selector2| selector1.is_superselector(selector2))
                || {
                    let mut complex2 = parents.map(<[_]>::to_vec).unwrap_or_default();
                    complex2.push(ComplexSelectorItem::Compound(compound2.clone()));
                    selector1
                        .components()
                        .iter()
                        .any(|complex1| complex_is_superselector(complex1.components(), &complex2))
                }
        }

        "has" | "host" | "host-context" => selector_pseudo_args(compound2, pseudo1.name(), true)
            .any(|selector2| selector1.is_superselector(selector2)),

        "slotted" => selector_pseudo_args(compound2, pseudo1.name(), false)
            .any(|selector2| selector1.is_superselector(selector2)),

        "not" => selector1.components().iter().all(|complex| {
            compound2
                .components()
                .iter()
                .any(|simple2| not_branch_is_cancelled(pseudo1, complex, simple2))
        }),

        "current" => selector_pseudo_args(compound2, pseudo1.name(), true)
            .any(|selector2| selector1 == selector2),

        "nth-child" | "nth-last-child" => compound2.components().iter().any(|simple2| {
            let SimpleSelector::Pseudo(pseudo2) = simple2 else {
                return false;
            };
            pseudo2.name() == pseudo1.name()
                && pseudo2.argument() == pseudo1.argument()
                && pseudo2
                    .selector()
                    .is_some_and(|selector2| selector1.is_superselector(selector2))
        }),

        _ => simple_is_superselector_of_compound(
            &SimpleSelector::Pseudo(pseudo1.clone()),
            compound2,
        ),
    }
}

/// Whether `simple2` rules out every element matched by `complex`, a branch
/// of the `:not()` selector `not`.
fn not_branch_is_cancelled(
    not: &PseudoSelector,
    complex: &ComplexSelector,
    simple2: &SimpleSelector,
) -> bool {
    match simple2 {
        SimpleSelector::Type(_) => complex.last_compound().is_some_and(|compound1| {
            compound1
                .components()
                .iter()
                .any(|simple1| matches!(simple1, SimpleSelector::Type(_)) && simple1 != simple2)
        }),
        SimpleSelector::Id(_) => complex.last_compound().is_some_and(|compound1| {
            compound1
                .components()
                .iter()
                .any(|simple1| matches!(simple1, SimpleSelector::Id(_)) && simple1 != simple2)
        }),
        SimpleSelector::Pseudo(pseudo2) if pseudo2.name() == not.name() => {
            pseudo2.selector().is_some_and(|selector2| {
                list_is_superselector(selector2.components(), std::slice::from_ref(complex))
            })
        }
        _ => false,
    }
}

/// The selector arguments of the pseudos named `name` in `compound`.
fn selector_pseudo_args<'a>(
    compound: &'a CompoundSelector,
    name: &'a str,
    is_class: bool,
) -> impl Iterator<Item = &'a SelectorList> + 'a {
    compound.components().iter().filter_map(move |simple| match simple {
        SimpleSelector::Pseudo(pseudo) if pseudo.is_class() == is_class && pseudo.name() == name => {
            pseudo.selector()
        }
        _ => None,
    })
}
