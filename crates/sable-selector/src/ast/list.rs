//! Selector lists.

use serde::{Deserialize, Serialize};

use super::{ComplexSelector, ComplexSelectorItem, SimpleSelector};
use crate::specificity::Specificity;

/// [§ 4.4 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
///
/// "A comma-separated list of selectors represents the union of all elements
/// selected by each of the individual selectors in the list."
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<ComplexSelector>", into = "Vec<ComplexSelector>")]
pub struct SelectorList {
    components: Vec<ComplexSelector>,
}

impl SelectorList {
    /// Create a selector list.
    ///
    /// # Panics
    ///
    /// Panics if `components` is empty.
    #[must_use]
    pub fn new(components: Vec<ComplexSelector>) -> Self {
        assert!(
            !components.is_empty(),
            "selector list components may not be empty"
        );
        Self { components }
    }

    /// A list with a single complex selector.
    #[must_use]
    pub fn single(complex: ComplexSelector) -> Self {
        Self::new(vec![complex])
    }

    /// The complex selectors in this list. Never empty.
    #[must_use]
    pub fn components(&self) -> &[ComplexSelector] {
        &self.components
    }

    /// Consume the list and return its complex selectors.
    #[must_use]
    pub fn into_components(self) -> Vec<ComplexSelector> {
        self.components
    }

    /// The range spanned by the specificities of the members: the lowest
    /// minimum and the highest maximum.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        let mut components = self.components.iter().map(ComplexSelector::specificity);
        let first = components.next().unwrap_or_default();
        components.fold(first, Specificity::widen)
    }

    /// Whether every complex selector in this list is invisible.
    #[must_use]
    pub fn is_invisible(&self) -> bool {
        self.components.iter().all(ComplexSelector::is_invisible)
    }

    /// Whether this list contains a parent selector `&`, including inside
    /// selector pseudo arguments.
    #[must_use]
    pub fn contains_parent_selector(&self) -> bool {
        self.components.iter().any(complex_contains_parent_selector)
    }
}

/// Whether `complex` contains `&` anywhere, including inside selector pseudos.
pub(crate) fn complex_contains_parent_selector(complex: &ComplexSelector) -> bool {
    complex.components().iter().any(|item| match item {
        ComplexSelectorItem::Compound(compound) => {
            compound.components().iter().any(|simple| match simple {
                SimpleSelector::Parent { .. } => true,
                SimpleSelector::Pseudo(pseudo) => pseudo
                    .selector()
                    .is_some_and(SelectorList::contains_parent_selector),
                _ => false,
            })
        }
        ComplexSelectorItem::Comb(_) => false,
    })
}

impl TryFrom<Vec<ComplexSelector>> for SelectorList {
    type Error = String;

    fn try_from(components: Vec<ComplexSelector>) -> Result<Self, Self::Error> {
        if components.is_empty() {
            return Err("selector list must have at least one complex selector".to_string());
        }
        Ok(Self::new(components))
    }
}

impl From<SelectorList> for Vec<ComplexSelector> {
    fn from(list: SelectorList) -> Self {
        list.components
    }
}
