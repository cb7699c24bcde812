//! Parent selector resolution.
//!
//! [CSS Nesting § 3.1](https://www.w3.org/TR/css-nesting-1/#nest-selector)
//!
//! A nested rule's selector refers to its parent rule with `&`. Resolving
//! replaces each `&` with the parent selector list. Selectors without `&`
//! become descendants of the parent. Sass additionally allows a suffix on
//! `&` (`&-title`), which is glued onto the parent's last simple selector.

use crate::ast::{
    ComplexSelector, ComplexSelectorItem, CompoundSelector, PseudoSelector, QualifiedName,
    SelectorList, SimpleSelector, complex_contains_parent_selector,
};
use crate::error::{SelectorError, SelectorResult};
use crate::utils::flatten_vertically;

impl SelectorList {
    /// Replace every `&` in this list with `parent`.
    ///
    /// With `implicit_parent`, complex selectors that contain no `&` are
    /// nested under every member of `parent` as descendants. Without it they
    /// are left alone, which is how `&` inside selector pseudos such as
    /// `:not(&)` is handled.
    ///
    /// Members are produced in vertical order: all resolutions of the first
    /// parent first, so `c, d` under `e, f` gives `e c, e d, f c, f d`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::TopLevelParent`] if this list contains `&`
    /// and `parent` is `None`, and propagates suffix errors from
    /// [`SimpleSelector::add_suffix`] or [`SelectorError::IncompatibleParent`]
    /// when a suffix meets a parent that ends in a combinator.
    pub fn resolve_parent_selectors(
        &self,
        parent: Option<&Self>,
        implicit_parent: bool,
    ) -> SelectorResult<Self> {
        let Some(parent) = parent else {
            if self.contains_parent_selector() {
                return Err(SelectorError::TopLevelParent);
            }
            return Ok(self.clone());
        };

        let mut resolved = Vec::with_capacity(self.components().len());
        for complex in self.components() {
            resolved.push(resolve_complex(complex, parent, implicit_parent)?);
        }
        Ok(Self::new(flatten_vertically(resolved)))
    }
}

fn resolve_complex(
    complex: &ComplexSelector,
    parent: &SelectorList,
    implicit_parent: bool,
) -> SelectorResult<Vec<ComplexSelector>> {
    if !complex_contains_parent_selector(complex) {
        if !implicit_parent {
            return Ok(vec![complex.clone()]);
        }
        return Ok(parent
            .components()
            .iter()
            .map(|parent_complex| {
                let mut items = parent_complex.components().to_vec();
                items.extend_from_slice(complex.components());
                ComplexSelector::new(items, complex.line_break() || parent_complex.line_break())
            })
            .collect());
    }

    // Each partial result carries whether it needs a line break.
    let mut new_complexes: Vec<(Vec<ComplexSelectorItem>, bool)> = vec![(Vec::new(), false)];
    for item in complex.components() {
        let resolved = match item {
            ComplexSelectorItem::Compound(compound) => resolve_compound(compound, parent)?,
            ComplexSelectorItem::Comb(_) => None,
        };
        let Some(resolved) = resolved else {
            for (new_complex, _) in &mut new_complexes {
                new_complex.push(item.clone());
            }
            continue;
        };

        new_complexes = new_complexes
            .iter()
            .flat_map(|(new_complex, line_break)| {
                resolved.iter().map(move |resolved_complex| {
                    let mut items = new_complex.clone();
                    items.extend_from_slice(resolved_complex.components());
                    (items, *line_break || resolved_complex.line_break())
                })
            })
            .collect();
    }

    Ok(new_complexes
        .into_iter()
        .map(|(items, line_break)| ComplexSelector::new(items, line_break))
        .collect())
}

/// Resolve the parent selectors in one compound.
///
/// Returns `Ok(None)` if the compound contains no `&` that needs
/// resolving. Otherwise returns the complex selectors that replace it.
fn resolve_compound(
    compound: &CompoundSelector,
    parent: &SelectorList,
) -> SelectorResult<Option<Vec<ComplexSelector>>> {
    let contains_selector_pseudo = compound.components().iter().any(|simple| {
        simple
            .as_pseudo()
            .and_then(PseudoSelector::selector)
            .is_some_and(SelectorList::contains_parent_selector)
    });
    let first = &compound.components()[0];
    let leading_parent = match first {
        SimpleSelector::Parent { suffix } => Some(suffix.as_deref()),
        _ => None,
    };
    if !contains_selector_pseudo && leading_parent.is_none() {
        return Ok(None);
    }

    let resolved_members = if contains_selector_pseudo {
        let mut members = Vec::with_capacity(compound.components().len());
        for simple in compound.components() {
            members.push(resolve_pseudo_argument(simple, parent)?);
        }
        members
    } else {
        compound.components().to_vec()
    };

    let Some(suffix) = leading_parent else {
        return Ok(Some(vec![ComplexSelector::from_compound(
            CompoundSelector::new(resolved_members),
        )]));
    };
    if compound.components().len() == 1 && suffix.is_none() {
        return Ok(Some(parent.components().to_vec()));
    }

    let mut complexes = Vec::with_capacity(parent.components().len());
    for parent_complex in parent.components() {
        let Some((last_simple, init)) = parent_complex
            .last_compound()
            .and_then(|last| last.components().split_last())
        else {
            return Err(SelectorError::IncompatibleParent {
                parent: parent_complex.to_string(),
            });
        };
        let mut simples = init.to_vec();
        simples.push(match suffix {
            Some(suffix) => last_simple.add_suffix(suffix)?,
            None => last_simple.clone(),
        });
        simples.extend_from_slice(&resolved_members[1..]);

        let items = parent_complex.components();
        let mut new_items = items[..items.len() - 1].to_vec();
        new_items.push(ComplexSelectorItem::Compound(CompoundSelector::new(simples)));
        complexes.push(ComplexSelector::new(new_items, parent_complex.line_break()));
    }
    Ok(Some(complexes))
}

/// Resolve `&` inside the selector argument of `simple`, if it has one.
fn resolve_pseudo_argument(
    simple: &SimpleSelector,
    parent: &SelectorList,
) -> SelectorResult<SimpleSelector> {
    let SimpleSelector::Pseudo(pseudo) = simple else {
        return Ok(simple.clone());
    };
    match pseudo.selector() {
        Some(selector) if selector.contains_parent_selector() => Ok(SimpleSelector::Pseudo(
            pseudo.with_selector(selector.resolve_parent_selectors(Some(parent), false)?),
        )),
        _ => Ok(simple.clone()),
    }
}

impl SimpleSelector {
    /// Append `suffix` to the name of this selector, for `&suffix`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::InvalidSuffix`] for selectors whose syntax
    /// doesn't end in an identifier: universal, attribute and parent
    /// selectors, and pseudo selectors with an argument.
    pub fn add_suffix(&self, suffix: &str) -> SelectorResult<Self> {
        match self {
            Self::Type(name) => Ok(Self::Type(QualifiedName {
                name: format!("{}{suffix}", name.name),
                namespace: name.namespace.clone(),
            })),
            Self::Class(name) => Ok(Self::Class(format!("{name}{suffix}"))),
            Self::Id(name) => Ok(Self::Id(format!("{name}{suffix}"))),
            Self::Placeholder(name) => Ok(Self::Placeholder(format!("{name}{suffix}"))),
            Self::Pseudo(pseudo) if pseudo.argument().is_none() && pseudo.selector().is_none() => {
                Ok(Self::Pseudo(PseudoSelector::new(
                    format!("{}{suffix}", pseudo.name()),
                    pseudo.is_syntactic_element(),
                    None,
                    None,
                )))
            }
            Self::Universal { .. } | Self::Attribute(_) | Self::Parent { .. } | Self::Pseudo(_) => {
                Err(SelectorError::InvalidSuffix {
                    selector: self.to_string(),
                })
            }
        }
    }
}
