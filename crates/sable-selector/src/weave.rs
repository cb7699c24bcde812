//! Weaving: interleaving the parents of complex selectors.
//!
//! When `.a .b` and `.c .d` are unified, the result must keep `.a` above
//! `.b` and `.c` above `.d`, but nothing fixes the order of `.a` and `.c`.
//! Weaving enumerates every order that respects both selectors'
//! combinators, merging compounds that must describe the same element.
//! Orders that another order already covers are left out.

use std::collections::VecDeque;

use crate::ast::{Combinator, ComplexSelectorItem, CompoundSelector, SimpleSelector};
use crate::superselector::complex_is_parent_superselector;
use crate::unify::{unify_complex, unify_compound};
use crate::utils::{longest_common_subsequence, paths};

type Items = Vec<ComplexSelectorItem>;

/// Expand "parenthesized selectors" in `complexes`.
///
/// Each complex selector is treated as the parent of the next, so
/// `[[.a, .b], [.c, .d]]` means "`.d` inside `.c` inside an element that is
/// itself `.b` inside `.a`", and expands to every complex selector matching
/// that. The final compound of each input is kept in place; only the
/// parents are interleaved. Returns no selectors when the parents can't be
/// merged.
#[must_use]
pub fn weave(complexes: Vec<Items>) -> Vec<Items> {
    let mut complexes = complexes.into_iter();
    let Some(first) = complexes.next() else {
        return Vec::new();
    };
    let mut prefixes = vec![first];

    for mut complex in complexes {
        let Some(target) = complex.pop() else {
            continue;
        };
        if complex.is_empty() {
            for prefix in &mut prefixes {
                prefix.push(target.clone());
            }
            continue;
        }

        let parents = complex;
        let mut new_prefixes = Vec::new();
        for prefix in &prefixes {
            let Some(parent_prefixes) = weave_parents(prefix, &parents) else {
                continue;
            };
            for mut parent_prefix in parent_prefixes {
                parent_prefix.push(target.clone());
                new_prefixes.push(parent_prefix);
            }
        }
        prefixes = new_prefixes;
    }

    prefixes
}

/// Interleave `parents1` and `parents2` as parents of the same element.
///
/// Returns every sequence that matches only elements that both sequences
/// would match as parents, without redundant duplicates. Returns `None`
/// if the sequences can't be merged, for example because their leading or
/// trailing combinators conflict.
fn weave_parents(parents1: &[ComplexSelectorItem], parents2: &[ComplexSelectorItem]) -> Option<Vec<Items>> {
    let mut queue1: VecDeque<ComplexSelectorItem> = parents1.iter().cloned().collect();
    let mut queue2: VecDeque<ComplexSelectorItem> = parents2.iter().cloned().collect();

    let initial_combinators = merge_initial_combinators(&mut queue1, &mut queue2)?;
    let final_combinators = merge_final_combinators(&mut queue1, &mut queue2)?;

    // At most one :root may appear in the output.
    let root1 = first_if_root(&mut queue1);
    let root2 = first_if_root(&mut queue2);
    match (root1, root2) {
        (Some(root1), Some(root2)) => {
            let root = unify_compound(root1.components(), root2.components())?;
            queue1.push_front(ComplexSelectorItem::Compound(root.clone()));
            queue2.push_front(ComplexSelectorItem::Compound(root));
        }
        (Some(root1), None) => queue2.push_front(ComplexSelectorItem::Compound(root1)),
        (None, Some(root2)) => queue1.push_front(ComplexSelectorItem::Compound(root2)),
        (None, None) => {}
    }

    let mut groups1 = group_selectors(queue1);
    let mut groups2 = group_selectors(queue2);
    let lcs = longest_common_subsequence(
        groups2.make_contiguous(),
        groups1.make_contiguous(),
        |group1, group2| {
            if group1 == group2 {
                return Some(group1.clone());
            }
            if !starts_with_compound(group1) || !starts_with_compound(group2) {
                return None;
            }
            if complex_is_parent_superselector(group1, group2) {
                return Some(group2.clone());
            }
            if complex_is_parent_superselector(group2, group1) {
                return Some(group1.clone());
            }
            if !must_unify(group1, group2) {
                return None;
            }

            let unified = unify_complex(&[group1.clone(), group2.clone()])?;
            if unified.len() > 1 {
                return None;
            }
            unified.into_iter().next()
        },
    );

    let mut choices: Vec<Vec<Items>> = vec![vec![
        initial_combinators
            .into_iter()
            .map(ComplexSelectorItem::Comb)
            .collect(),
    ]];
    for group in lcs {
        choices.push(flatten_chunks(chunks(&mut groups1, &mut groups2, |queue| {
            queue
                .front()
                .is_none_or(|first| complex_is_parent_superselector(first, &group))
        })));
        choices.push(vec![group]);
        let _ = groups1.pop_front();
        let _ = groups2.pop_front();
    }
    choices.push(flatten_chunks(chunks(&mut groups1, &mut groups2, VecDeque::is_empty)));
    choices.extend(final_combinators);

    choices.retain(|choice| !choice.is_empty());
    Some(
        paths(&choices)
            .into_iter()
            .map(|path| path.concat())
            .collect(),
    )
}

/// Pop the leading combinators off both queues and merge them.
///
/// Returns `None` unless one sequence of combinators is a subsequence of
/// the other, in which case the longer one wins.
fn merge_initial_combinators(
    queue1: &mut VecDeque<ComplexSelectorItem>,
    queue2: &mut VecDeque<ComplexSelectorItem>,
) -> Option<Vec<Combinator>> {
    let combinators1 = pop_leading_combinators(queue1);
    let combinators2 = pop_leading_combinators(queue2);

    let lcs = longest_common_subsequence(&combinators1, &combinators2, |a, b| (a == b).then_some(*a));
    if lcs == combinators1 {
        Some(combinators2)
    } else if lcs == combinators2 {
        Some(combinators1)
    } else {
        None
    }
}

fn pop_leading_combinators(queue: &mut VecDeque<ComplexSelectorItem>) -> Vec<Combinator> {
    let mut combinators = Vec::new();
    while let Some(combinator) = queue.front().and_then(ComplexSelectorItem::as_combinator) {
        combinators.push(combinator);
        let _ = queue.pop_front();
    }
    combinators
}

/// Pop the trailing combinators off both queues, along with the compounds
/// they apply to, and merge them.
///
/// The result is a list of choices in source order. Each choice is a list
/// of alternative item sequences, any one of which may appear at that
/// position. Returns `None` if the combinators can't be merged.
fn merge_final_combinators(
    queue1: &mut VecDeque<ComplexSelectorItem>,
    queue2: &mut VecDeque<ComplexSelectorItem>,
) -> Option<VecDeque<Vec<Items>>> {
    let mut result: VecDeque<Vec<Items>> = VecDeque::new();
    loop {
        let ends_in_combinator =
            |queue: &VecDeque<ComplexSelectorItem>| queue.back().is_some_and(ComplexSelectorItem::is_combinator);
        if !ends_in_combinator(queue1) && !ends_in_combinator(queue2) {
            return Some(result);
        }

        // Collected back to front.
        let combinators1 = pop_trailing_combinators(queue1);
        let combinators2 = pop_trailing_combinators(queue2);

        if combinators1.len() > 1 || combinators2.len() > 1 {
            // Several combinators in a row only come from bogus selectors.
            // Use whichever sequence contains the other, or give up.
            let lcs =
                longest_common_subsequence(&combinators1, &combinators2, |a, b| (a == b).then_some(*a));
            let kept = if lcs == combinators1 {
                combinators2
            } else if lcs == combinators2 {
                combinators1
            } else {
                return None;
            };
            result.push_front(vec![
                kept.into_iter().rev().map(ComplexSelectorItem::Comb).collect(),
            ]);
            return Some(result);
        }

        match (combinators1.first().copied(), combinators2.first().copied()) {
            (Some(combinator1), Some(combinator2)) => {
                let compound1 = pop_compound(queue1)?;
                let compound2 = pop_compound(queue2)?;
                let choice = merge_final_pair(
                    queue1,
                    queue2,
                    (compound1, combinator1),
                    (compound2, combinator2),
                )?;
                result.push_front(choice);
            }
            (Some(combinator1), None) => {
                let compound1 = pop_compound(queue1)?;
                if combinator1 == Combinator::Child
                    && back_compound(queue2).is_some_and(|last2| last2.is_superselector(&compound1))
                {
                    let _ = queue2.pop_back();
                }
                result.push_front(vec![sequence(&[(compound1, combinator1)])]);
            }
            (None, Some(combinator2)) => {
                let compound2 = pop_compound(queue2)?;
                if combinator2 == Combinator::Child
                    && back_compound(queue1).is_some_and(|last1| last1.is_superselector(&compound2))
                {
                    let _ = queue1.pop_back();
                }
                result.push_front(vec![sequence(&[(compound2, combinator2)])]);
            }
            (None, None) => return Some(result),
        }
    }
}

/// Merge one trailing `compound combinator` pair from each side.
///
/// May push items back onto a queue when only one side's pair can be
/// placed at this position.
fn merge_final_pair(
    queue1: &mut VecDeque<ComplexSelectorItem>,
    queue2: &mut VecDeque<ComplexSelectorItem>,
    (compound1, combinator1): (CompoundSelector, Combinator),
    (compound2, combinator2): (CompoundSelector, Combinator),
) -> Option<Vec<Items>> {
    use Combinator::{Child, FollowingSibling, NextSibling};

    match (combinator1, combinator2) {
        (FollowingSibling, FollowingSibling) => {
            if compound1.is_superselector(&compound2) {
                Some(vec![sequence(&[(compound2, FollowingSibling)])])
            } else if compound2.is_superselector(&compound1) {
                Some(vec![sequence(&[(compound1, FollowingSibling)])])
            } else {
                let unified = unify_compound(compound1.components(), compound2.components());
                let mut choices = vec![
                    sequence(&[
                        (compound1.clone(), FollowingSibling),
                        (compound2.clone(), FollowingSibling),
                    ]),
                    sequence(&[(compound2, FollowingSibling), (compound1, FollowingSibling)]),
                ];
                if let Some(unified) = unified {
                    choices.push(sequence(&[(unified, FollowingSibling)]));
                }
                Some(choices)
            }
        }
        (FollowingSibling, NextSibling) | (NextSibling, FollowingSibling) => {
            let (following, next) = if combinator1 == FollowingSibling {
                (compound1, compound2)
            } else {
                (compound2, compound1)
            };
            if following.is_superselector(&next) {
                Some(vec![sequence(&[(next, NextSibling)])])
            } else {
                let unified = unify_compound(following.components(), next.components());
                let mut choices = vec![sequence(&[(following, FollowingSibling), (next, NextSibling)])];
                if let Some(unified) = unified {
                    choices.push(sequence(&[(unified, NextSibling)]));
                }
                Some(choices)
            }
        }
        (Child, NextSibling | FollowingSibling) => {
            queue1.push_back(ComplexSelectorItem::Compound(compound1));
            queue1.push_back(ComplexSelectorItem::Comb(Child));
            Some(vec![sequence(&[(compound2, combinator2)])])
        }
        (NextSibling | FollowingSibling, Child) => {
            queue2.push_back(ComplexSelectorItem::Compound(compound2));
            queue2.push_back(ComplexSelectorItem::Comb(Child));
            Some(vec![sequence(&[(compound1, combinator1)])])
        }
        _ if combinator1 == combinator2 => {
            let unified = unify_compound(compound1.components(), compound2.components())?;
            Some(vec![sequence(&[(unified, combinator1)])])
        }
        _ => None,
    }
}

fn pop_trailing_combinators(queue: &mut VecDeque<ComplexSelectorItem>) -> Vec<Combinator> {
    let mut combinators = Vec::new();
    while let Some(combinator) = queue.back().and_then(ComplexSelectorItem::as_combinator) {
        combinators.push(combinator);
        let _ = queue.pop_back();
    }
    combinators
}

fn pop_compound(queue: &mut VecDeque<ComplexSelectorItem>) -> Option<CompoundSelector> {
    match queue.pop_back()? {
        ComplexSelectorItem::Compound(compound) => Some(compound),
        ComplexSelectorItem::Comb(_) => None,
    }
}

fn back_compound(queue: &VecDeque<ComplexSelectorItem>) -> Option<&CompoundSelector> {
    queue.back().and_then(ComplexSelectorItem::as_compound)
}

fn sequence(pairs: &[(CompoundSelector, Combinator)]) -> Items {
    pairs
        .iter()
        .flat_map(|(compound, combinator)| {
            [
                ComplexSelectorItem::Compound(compound.clone()),
                ComplexSelectorItem::Comb(*combinator),
            ]
        })
        .collect()
}

/// If the first item in `queue` is a compound containing `:root`, remove
/// and return it.
fn first_if_root(queue: &mut VecDeque<ComplexSelectorItem>) -> Option<CompoundSelector> {
    let is_root = queue.front().and_then(ComplexSelectorItem::as_compound).is_some_and(|compound| {
        compound.components().iter().any(|simple| {
            simple
                .as_pseudo()
                .is_some_and(|pseudo| pseudo.is_class() && pseudo.normalized_name() == "root")
        })
    });
    if !is_root {
        return None;
    }
    match queue.pop_front()? {
        ComplexSelectorItem::Compound(compound) => Some(compound),
        ComplexSelectorItem::Comb(_) => None,
    }
}

/// Split a sequence into groups that must stay together: runs of items
/// joined by explicit combinators.
///
/// `[a, b, >, c, d, ~, e]` groups as `[a] [b > c] [d ~ e]`.
fn group_selectors(items: VecDeque<ComplexSelectorItem>) -> VecDeque<Items> {
    let mut groups: VecDeque<Items> = VecDeque::new();
    for item in items {
        let joins_previous = item.is_combinator()
            || groups
                .back()
                .and_then(|group| group.last())
                .is_some_and(ComplexSelectorItem::is_combinator);
        match groups.back_mut() {
            Some(group) if joins_previous => group.push(item),
            _ => groups.push_back(vec![item]),
        }
    }
    groups
}

fn starts_with_compound(group: &[ComplexSelectorItem]) -> bool {
    matches!(group.first(), Some(ComplexSelectorItem::Compound(_)))
}

/// Whether `group1` and `group2` share a simple selector that can only match
/// one element, which means they have to be unified into one compound.
fn must_unify(group1: &[ComplexSelectorItem], group2: &[ComplexSelectorItem]) -> bool {
    let unique1: Vec<&SimpleSelector> = group1
        .iter()
        .filter_map(ComplexSelectorItem::as_compound)
        .flat_map(CompoundSelector::components)
        .filter(|simple| is_unique(simple))
        .collect();
    if unique1.is_empty() {
        return false;
    }

    group2
        .iter()
        .filter_map(ComplexSelectorItem::as_compound)
        .flat_map(CompoundSelector::components)
        .any(|simple| is_unique(simple) && unique1.contains(&simple))
}

/// IDs and pseudo-elements match at most one element in a given context.
fn is_unique(simple: &SimpleSelector) -> bool {
    matches!(simple, SimpleSelector::Id(_)) || simple.is_pseudo_element()
}

/// Pop elements from the fronts of both queues until `done` holds for each,
/// and return every order in which the two popped runs can be combined.
///
/// If both runs are non-empty, the result is `[run1 + run2, run2 + run1]`.
fn chunks<T: Clone>(
    queue1: &mut VecDeque<T>,
    queue2: &mut VecDeque<T>,
    done: impl Fn(&VecDeque<T>) -> bool,
) -> Vec<Vec<T>> {
    let take_run = |queue: &mut VecDeque<T>| {
        let mut run = Vec::new();
        while !done(queue) {
            match queue.pop_front() {
                Some(item) => run.push(item),
                None => break,
            }
        }
        run
    };
    let chunk1 = take_run(queue1);
    let chunk2 = take_run(queue2);

    match (chunk1.is_empty(), chunk2.is_empty()) {
        (true, true) => Vec::new(),
        (true, false) => vec![chunk2],
        (false, true) => vec![chunk1],
        (false, false) => {
            let mut forward = chunk1.clone();
            forward.extend(chunk2.iter().cloned());
            let mut backward = chunk2;
            backward.extend(chunk1);
            vec![forward, backward]
        }
    }
}

fn flatten_chunks(chunks: Vec<Vec<Items>>) -> Vec<Items> {
    chunks.into_iter().map(|chunk| chunk.concat()).collect()
}
