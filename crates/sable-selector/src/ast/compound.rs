//! Compound selectors.

use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::SimpleSelector;
use crate::specificity::Specificity;

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
///
/// The order of the components only matters for serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<SimpleSelector>", into = "Vec<SimpleSelector>")]
pub struct CompoundSelector {
    components: Vec<SimpleSelector>,
    specificity: OnceLock<Specificity>,
}

impl CompoundSelector {
    /// Create a compound selector.
    ///
    /// # Panics
    ///
    /// Panics if `components` is empty.
    #[must_use]
    pub fn new(components: Vec<SimpleSelector>) -> Self {
        assert!(
            !components.is_empty(),
            "compound selector components may not be empty"
        );
        Self {
            components,
            specificity: OnceLock::new(),
        }
    }

    /// A compound selector with a single component.
    #[must_use]
    pub fn single(simple: SimpleSelector) -> Self {
        Self::new(vec![simple])
    }

    /// The simple selectors in this compound. Never empty.
    #[must_use]
    pub fn components(&self) -> &[SimpleSelector] {
        &self.components
    }

    /// Consume the compound and return its simple selectors.
    #[must_use]
    pub fn into_components(self) -> Vec<SimpleSelector> {
        self.components
    }

    /// The specificity range of this compound: the sum of its components'
    /// ranges. Computed once and cached.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        *self.specificity.get_or_init(|| {
            self.components
                .iter()
                .map(SimpleSelector::specificity)
                .sum()
        })
    }

    /// The lowest specificity this compound can have.
    #[must_use]
    pub fn min_specificity(&self) -> u32 {
        self.specificity().min
    }

    /// The highest specificity this compound can have.
    #[must_use]
    pub fn max_specificity(&self) -> u32 {
        self.specificity().max
    }

    /// Whether any component is a placeholder (or an invisible selector pseudo).
    #[must_use]
    pub fn is_invisible(&self) -> bool {
        self.components.iter().any(SimpleSelector::is_invisible)
    }

    /// Whether this compound contains a pseudo-element.
    #[must_use]
    pub fn has_pseudo_element(&self) -> bool {
        self.components.iter().any(SimpleSelector::is_pseudo_element)
    }
}

impl PartialEq for CompoundSelector {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Eq for CompoundSelector {}

impl Hash for CompoundSelector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.components.hash(state);
    }
}

impl TryFrom<Vec<SimpleSelector>> for CompoundSelector {
    type Error = String;

    fn try_from(components: Vec<SimpleSelector>) -> Result<Self, Self::Error> {
        if components.is_empty() {
            return Err("compound selector must have at least one component".to_string());
        }
        Ok(Self::new(components))
    }
}

impl From<CompoundSelector> for Vec<SimpleSelector> {
    fn from(compound: CompoundSelector) -> Self {
        compound.components
    }
}
