//! Complex selectors and combinators.

use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use super::CompoundSelector;
use crate::specificity::Specificity;

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// "A combinator is punctuation that represents a particular kind of
/// relationship between the selectors on either side."
///
/// The descendant combinator has no variant: it is implied by two adjacent
/// compounds in a [`ComplexSelector`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum Combinator {
    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// "A selector of the form 'A > B' represents an element B that is a
    /// direct child of element A."
    #[strum(serialize = ">")]
    Child,

    /// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    /// "A selector of the form 'A + B' represents an element B that
    /// immediately follows element A, where A and B share the same parent."
    #[strum(serialize = "+")]
    NextSibling,

    /// [§ 16.4 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
    /// "A selector of the form 'A ~ B' represents an element B that
    /// follows element A (not necessarily immediately), where A and B share
    /// the same parent."
    #[strum(serialize = "~")]
    FollowingSibling,
}

/// One item in a [`ComplexSelector`]: either a compound selector or an
/// explicit combinator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplexSelectorItem {
    /// A compound selector.
    Compound(CompoundSelector),
    /// An explicit combinator.
    Comb(Combinator),
}

impl ComplexSelectorItem {
    /// The compound selector, if this item is one.
    #[must_use]
    pub const fn as_compound(&self) -> Option<&CompoundSelector> {
        match self {
            Self::Compound(compound) => Some(compound),
            Self::Comb(_) => None,
        }
    }

    /// The combinator, if this item is one.
    #[must_use]
    pub const fn as_combinator(&self) -> Option<Combinator> {
        match self {
            Self::Comb(combinator) => Some(*combinator),
            Self::Compound(_) => None,
        }
    }

    /// Whether this item is a combinator.
    #[must_use]
    pub const fn is_combinator(&self) -> bool {
        matches!(self, Self::Comb(_))
    }
}

impl From<CompoundSelector> for ComplexSelectorItem {
    fn from(compound: CompoundSelector) -> Self {
        Self::Compound(compound)
    }
}

impl From<Combinator> for ComplexSelectorItem {
    fn from(combinator: Combinator) -> Self {
        Self::Comb(combinator)
    }
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// "A complex selector is a chain of one or more compound selectors separated
/// by combinators."
///
/// Items are stored left to right. Two adjacent compounds are joined by the
/// descendant combinator. Leading, trailing and repeated combinators are
/// legal here (see [`crate::bogus`]) because older stylesheets rely on them.
///
/// Example: `div.container > ul.nav li`
/// ```text
/// [Compound(div.container), Comb(>), Compound(ul.nav), Compound(li)]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ComplexData", into = "ComplexData")]
pub struct ComplexSelector {
    components: Vec<ComplexSelectorItem>,
    line_break: bool,
    specificity: OnceLock<Specificity>,
}

impl ComplexSelector {
    /// Create a complex selector.
    ///
    /// `line_break` records whether the selector was preceded by a newline
    /// in its list, which the serializer preserves.
    ///
    /// # Panics
    ///
    /// Panics if `components` is empty.
    #[must_use]
    pub fn new(components: Vec<ComplexSelectorItem>, line_break: bool) -> Self {
        assert!(
            !components.is_empty(),
            "complex selector components may not be empty"
        );
        Self {
            components,
            line_break,
            specificity: OnceLock::new(),
        }
    }

    /// A complex selector consisting of a single compound.
    #[must_use]
    pub fn from_compound(compound: CompoundSelector) -> Self {
        Self::new(vec![ComplexSelectorItem::Compound(compound)], false)
    }

    /// The items of this selector, left to right. Never empty.
    #[must_use]
    pub fn components(&self) -> &[ComplexSelectorItem] {
        &self.components
    }

    /// Consume the selector and return its items.
    #[must_use]
    pub fn into_components(self) -> Vec<ComplexSelectorItem> {
        self.components
    }

    /// Whether a line break preceded this selector in its list.
    #[must_use]
    pub const fn line_break(&self) -> bool {
        self.line_break
    }

    /// The specificity range: the sum over the compound items. Combinators
    /// contribute nothing. Computed once and cached.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        *self.specificity.get_or_init(|| {
            self.components
                .iter()
                .filter_map(ComplexSelectorItem::as_compound)
                .map(CompoundSelector::specificity)
                .sum()
        })
    }

    /// The lowest specificity this selector can have.
    #[must_use]
    pub fn min_specificity(&self) -> u32 {
        self.specificity().min
    }

    /// The highest specificity this selector can have.
    #[must_use]
    pub fn max_specificity(&self) -> u32 {
        self.specificity().max
    }

    /// Whether any compound in this selector is invisible.
    #[must_use]
    pub fn is_invisible(&self) -> bool {
        self.compounds().any(CompoundSelector::is_invisible)
    }

    /// The compound selectors in this selector, left to right.
    pub fn compounds(&self) -> impl Iterator<Item = &CompoundSelector> {
        self.components
            .iter()
            .filter_map(ComplexSelectorItem::as_compound)
    }

    /// The last item if it is a compound.
    #[must_use]
    pub fn last_compound(&self) -> Option<&CompoundSelector> {
        self.components.last().and_then(ComplexSelectorItem::as_compound)
    }

    /// If this selector is exactly one compound, that compound.
    #[must_use]
    pub fn as_single_compound(&self) -> Option<&CompoundSelector> {
        match self.components.as_slice() {
            [ComplexSelectorItem::Compound(compound)] => Some(compound),
            _ => None,
        }
    }

    /// The combinators before the first compound.
    #[must_use]
    pub fn leading_combinators(&self) -> &[ComplexSelectorItem] {
        let end = self
            .components
            .iter()
            .position(|item| !item.is_combinator())
            .unwrap_or(self.components.len());
        &self.components[..end]
    }

    /// The combinators after the last compound.
    #[must_use]
    pub fn trailing_combinators(&self) -> &[ComplexSelectorItem] {
        let start = self
            .components
            .iter()
            .rposition(|item| !item.is_combinator())
            .map_or(0, |i| i + 1);
        &self.components[start..]
    }
}

impl PartialEq for ComplexSelector {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Eq for ComplexSelector {}

impl Hash for ComplexSelector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.components.hash(state);
    }
}

/// Wire form of a [`ComplexSelector`] without the specificity cache.
#[derive(Clone, Serialize, Deserialize)]
struct ComplexData {
    components: Vec<ComplexSelectorItem>,
    #[serde(default)]
    line_break: bool,
}

impl TryFrom<ComplexData> for ComplexSelector {
    type Error = String;

    fn try_from(data: ComplexData) -> Result<Self, Self::Error> {
        if data.components.is_empty() {
            return Err("complex selector must have at least one component".to_string());
        }
        Ok(Self::new(data.components, data.line_break))
    }
}

impl From<ComplexSelector> for ComplexData {
    fn from(complex: ComplexSelector) -> Self {
        Self {
            components: complex.components,
            line_break: complex.line_break,
        }
    }
}
