//! Selector unification.
//!
//! Unifying two selectors produces a selector that matches exactly the
//! elements both of them match, or `None` when no element can match both.
//! Compounds are merged simple selector by simple selector; complex
//! selectors unify their final compounds and weave the rest together (see
//! [`crate::weave`]).

use crate::ast::{
    ComplexSelector, ComplexSelectorItem, CompoundSelector, NamespaceSpec, QualifiedName,
    SelectorList, SimpleSelector,
};
use crate::weave::weave;

impl SimpleSelector {
    /// Add this selector to the simple selectors in `compound`.
    ///
    /// Returns `None` if no element can match both, such as `#a` and `#b`.
    /// Pseudo selectors stay at the end of the result and pseudo-elements
    /// after pseudo-classes.
    #[must_use]
    pub fn unify(&self, compound: &[Self]) -> Option<Vec<Self>> {
        match self {
            Self::Universal { namespace } => unify_universal(self, namespace.as_ref(), compound),
            Self::Type(_) => unify_type(self, compound),
            Self::Id(_) => {
                if compound
                    .iter()
                    .any(|simple| matches!(simple, Self::Id(_)) && simple != self)
                {
                    return None;
                }
                self.unify_default(compound)
            }
            Self::Pseudo(pseudo) => {
                if pseudo.is_host() || pseudo.is_host_context() {
                    // :host only unifies with other selector pseudos.
                    let only_selector_pseudos = compound.iter().all(|simple| {
                        simple
                            .as_pseudo()
                            .is_some_and(|other| other.is_host() || other.selector().is_some())
                    });
                    if !only_selector_pseudos {
                        return None;
                    }
                } else if let Some(delegated) = self.delegate_to_single(compound) {
                    return delegated;
                }
                if compound.contains(self) {
                    return Some(compound.to_vec());
                }

                let mut result = Vec::with_capacity(compound.len() + 1);
                let mut added_self = false;
                for simple in compound {
                    if simple.is_pseudo_element() {
                        // A compound may contain only one pseudo-element.
                        if pseudo.is_element() {
                            return None;
                        }
                        result.push(self.clone());
                        added_self = true;
                    }
                    result.push(simple.clone());
                }
                if !added_self {
                    result.push(self.clone());
                }
                Some(result)
            }
            Self::Class(_) | Self::Attribute(_) | Self::Placeholder(_) | Self::Parent { .. } => {
                self.unify_default(compound)
            }
        }
    }

    /// The unification shared by most simple selectors: add `self` before
    /// the first pseudo selector unless `compound` already contains it.
    fn unify_default(&self, compound: &[Self]) -> Option<Vec<Self>> {
        if let Some(delegated) = self.delegate_to_single(compound) {
            return delegated;
        }
        if compound.contains(self) {
            return Some(compound.to_vec());
        }

        let mut result = Vec::with_capacity(compound.len() + 1);
        let mut added_self = false;
        for simple in compound {
            if !added_self && matches!(simple, Self::Pseudo(_)) {
                result.push(self.clone());
                added_self = true;
            }
            result.push(simple.clone());
        }
        if !added_self {
            result.push(self.clone());
        }
        Some(result)
    }

    /// A lone universal or `:host` selector knows best how to absorb
    /// `self`, so let it do the unifying.
    fn delegate_to_single(&self, compound: &[Self]) -> Option<Option<Vec<Self>>> {
        let [other] = compound else {
            return None;
        };
        let absorbs = match other {
            Self::Universal { .. } => true,
            Self::Pseudo(pseudo) => pseudo.is_host() || pseudo.is_host_context(),
            _ => false,
        };
        absorbs.then(|| other.unify(std::slice::from_ref(self)))
    }
}

fn unify_universal(
    universal: &SimpleSelector,
    namespace: Option<&NamespaceSpec>,
    compound: &[SimpleSelector],
) -> Option<Vec<SimpleSelector>> {
    let Some(first) = compound.first() else {
        return Some(vec![universal.clone()]);
    };
    if first.is_universal_or_type() {
        let unified = unify_universal_and_element(universal, first)?;
        let mut result = vec![unified];
        result.extend_from_slice(&compound[1..]);
        return Some(result);
    }
    if matches!(
        compound,
        [SimpleSelector::Pseudo(pseudo)] if pseudo.is_host() || pseudo.is_host_context()
    ) {
        return None;
    }

    if namespace.is_some_and(|namespace| *namespace != NamespaceSpec::Any) {
        let mut result = vec![universal.clone()];
        result.extend_from_slice(compound);
        return Some(result);
    }
    Some(compound.to_vec())
}

fn unify_type(selector: &SimpleSelector, compound: &[SimpleSelector]) -> Option<Vec<SimpleSelector>> {
    match compound.first() {
        Some(first) if first.is_universal_or_type() => {
            let unified = unify_universal_and_element(selector, first)?;
            let mut result = vec![unified];
            result.extend_from_slice(&compound[1..]);
            Some(result)
        }
        _ => {
            let mut result = vec![selector.clone()];
            result.extend_from_slice(compound);
            Some(result)
        }
    }
}

/// Unify two universal or type selectors.
///
/// Namespaces must agree unless one side is `*|`. Names must agree unless
/// one side is universal. Returns `None` for other selector kinds.
#[must_use]
pub fn unify_universal_and_element(
    selector1: &SimpleSelector,
    selector2: &SimpleSelector,
) -> Option<SimpleSelector> {
    let (namespace1, name1) = namespace_and_name(selector1)?;
    let (namespace2, name2) = namespace_and_name(selector2)?;

    let namespace = if namespace1 == namespace2 || namespace2 == Some(&NamespaceSpec::Any) {
        namespace1
    } else if namespace1 == Some(&NamespaceSpec::Any) {
        namespace2
    } else {
        return None;
    };

    let name = if name1 == name2 || name2.is_none() {
        name1
    } else if name1.is_none() {
        name2
    } else {
        return None;
    };

    let namespace = namespace.cloned();
    Some(match name {
        None => SimpleSelector::Universal { namespace },
        Some(name) => SimpleSelector::Type(QualifiedName {
            name: name.to_string(),
            namespace,
        }),
    })
}

fn namespace_and_name(selector: &SimpleSelector) -> Option<(Option<&NamespaceSpec>, Option<&str>)> {
    match selector {
        SimpleSelector::Universal { namespace } => Some((namespace.as_ref(), None)),
        SimpleSelector::Type(name) => Some((name.namespace.as_ref(), Some(name.name.as_str()))),
        _ => None,
    }
}

/// Unify two compound selectors given as their simple selectors.
///
/// Each simple selector of `compound1` is added to `compound2` in turn.
#[must_use]
pub fn unify_compound(
    compound1: &[SimpleSelector],
    compound2: &[SimpleSelector],
) -> Option<CompoundSelector> {
    let mut result = compound2.to_vec();
    for simple in compound1 {
        result = simple.unify(&result)?;
    }
    Some(CompoundSelector::new(result))
}

/// Unify a group of complex selectors given as their items.
///
/// The final compounds are unified into one base, and everything before
/// them is woven together. The result is a list of alternatives, each of
/// which matches only elements matched by every input. Returns `None` if
/// the selectors can't be unified, including when any of them ends in a
/// combinator.
#[must_use]
pub fn unify_complex(complexes: &[Vec<ComplexSelectorItem>]) -> Option<Vec<Vec<ComplexSelectorItem>>> {
    if complexes.len() == 1 {
        return Some(complexes.to_vec());
    }

    let mut unified_base: Option<Vec<SimpleSelector>> = None;
    for complex in complexes {
        let Some(ComplexSelectorItem::Compound(base)) = complex.last() else {
            return None;
        };
        unified_base = Some(match unified_base {
            None => base.components().to_vec(),
            Some(mut unified) => {
                for simple in base.components() {
                    unified = simple.unify(&unified)?;
                }
                unified
            }
        });
    }
    let unified_base = CompoundSelector::new(unified_base?);

    let mut without_bases: Vec<Vec<ComplexSelectorItem>> = complexes
        .iter()
        .map(|complex| complex[..complex.len() - 1].to_vec())
        .collect();
    if let Some(last) = without_bases.last_mut() {
        last.push(ComplexSelectorItem::Compound(unified_base));
    }
    Some(weave(without_bases))
}

impl CompoundSelector {
    /// Unify this compound with `other`, or `None` if no element can match
    /// both.
    #[must_use]
    pub fn unify(&self, other: &Self) -> Option<Self> {
        unify_compound(self.components(), other.components())
    }
}

impl ComplexSelector {
    /// Unify this selector with `other`.
    ///
    /// The intersection can't always be written as one complex selector, so
    /// the result is a list of alternatives. `None` means nothing matches
    /// both.
    #[must_use]
    pub fn unify(&self, other: &Self) -> Option<Vec<Self>> {
        let unified = unify_complex(&[self.components().to_vec(), other.components().to_vec()])?;
        let complexes: Vec<Self> = unified
            .into_iter()
            .filter(|items| !items.is_empty())
            .map(|items| Self::new(items, false))
            .collect();
        (!complexes.is_empty()).then_some(complexes)
    }
}

impl SelectorList {
    /// Unify this list with `other`: the union of every pairwise
    /// unification of their complex selectors.
    ///
    /// Returns `None` if every pair is disjoint.
    #[must_use]
    pub fn unify(&self, other: &Self) -> Option<Self> {
        let contents: Vec<ComplexSelector> = self
            .components()
            .iter()
            .flat_map(|complex1| {
                other
                    .components()
                    .iter()
                    .filter_map(move |complex2| complex1.unify(complex2))
                    .flatten()
            })
            .collect();
        (!contents.is_empty()).then(|| Self::new(contents))
    }
}
