//! Pseudo-class and pseudo-element selectors.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::SelectorList;

/// Pseudo-elements that may be written with a single colon for
/// compatibility with CSS2.
///
/// [§ 11 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
const FAKE_PSEUDO_ELEMENTS: [&str; 4] = ["after", "before", "first-line", "first-letter"];

/// [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
/// [§ 11 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
///
/// A pseudo-class or pseudo-element, with an optional text argument
/// (`:nth-child(2n+1)`) and an optional selector argument
/// (`:not(.a)`, `:nth-child(2n+1 of .b)`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "PseudoData", into = "PseudoData")]
pub struct PseudoSelector {
    name: String,
    /// `name` lowercased with any vendor prefix removed.
    normalized_name: String,
    is_class: bool,
    /// Whether this was written with one colon.
    is_syntactic_class: bool,
    argument: Option<String>,
    selector: Option<Box<SelectorList>>,
}

impl PseudoSelector {
    /// Create a pseudo selector.
    ///
    /// `element` is true when the selector was written with two colons.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        element: bool,
        argument: Option<String>,
        selector: Option<SelectorList>,
    ) -> Self {
        let name = name.into();
        let normalized_name = unvendor(&name).to_ascii_lowercase();
        let is_class = !element && !FAKE_PSEUDO_ELEMENTS.contains(&normalized_name.as_str());
        Self {
            name,
            normalized_name,
            is_class,
            is_syntactic_class: !element,
            argument,
            selector: selector.map(Box::new),
        }
    }

    /// A pseudo-class with no argument, such as `:hover`.
    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, false, None, None)
    }

    /// A pseudo-element with no argument, such as `::before`.
    #[must_use]
    pub fn element(name: impl Into<String>) -> Self {
        Self::new(name, true, None, None)
    }

    /// A pseudo-class with a selector argument, such as `:not(.a)`.
    #[must_use]
    pub fn with_selector_argument(name: impl Into<String>, selector: SelectorList) -> Self {
        Self::new(name, false, None, Some(selector))
    }

    /// The name as written, without colons.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name without vendor prefix, used for semantic comparisons.
    #[must_use]
    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }

    /// Whether this is semantically a pseudo-class.
    #[must_use]
    pub const fn is_class(&self) -> bool {
        self.is_class
    }

    /// Whether this is semantically a pseudo-element, including `:before`
    /// and friends written with one colon.
    #[must_use]
    pub const fn is_element(&self) -> bool {
        !self.is_class
    }

    /// Whether this was written with a single colon.
    #[must_use]
    pub const fn is_syntactic_class(&self) -> bool {
        self.is_syntactic_class
    }

    /// Whether this was written with two colons.
    #[must_use]
    pub const fn is_syntactic_element(&self) -> bool {
        !self.is_syntactic_class
    }

    /// The non-selector argument, such as `2n+1` in `:nth-child(2n+1 of .a)`.
    #[must_use]
    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }

    /// The selector argument, such as `.a` in `:not(.a)`.
    #[must_use]
    pub fn selector(&self) -> Option<&SelectorList> {
        self.selector.as_deref()
    }

    /// Whether this is `:host`.
    #[must_use]
    pub fn is_host(&self) -> bool {
        self.is_class && self.name == "host"
    }

    /// Whether this is `:host-context`.
    #[must_use]
    pub fn is_host_context(&self) -> bool {
        self.is_class && self.name == "host-context"
    }

    /// A copy of this selector with its selector argument replaced.
    #[must_use]
    pub fn with_selector(&self, selector: SelectorList) -> Self {
        Self {
            name: self.name.clone(),
            normalized_name: self.normalized_name.clone(),
            is_class: self.is_class,
            is_syntactic_class: self.is_syntactic_class,
            argument: self.argument.clone(),
            selector: Some(Box::new(selector)),
        }
    }
}

impl PartialEq for PseudoSelector {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.is_class == other.is_class
            && self.argument == other.argument
            && self.selector == other.selector
    }
}

impl Eq for PseudoSelector {}

impl Hash for PseudoSelector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.is_class.hash(state);
        self.argument.hash(state);
        self.selector.hash(state);
    }
}

/// Strips a vendor prefix such as `-moz-` from `name`.
///
/// Custom identifiers starting with `--` are left alone.
fn unvendor(name: &str) -> &str {
    let bytes = name.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'-' || bytes[1] == b'-' {
        return name;
    }
    match name.get(2..).and_then(|rest| rest.find('-')) {
        Some(i) => &name[i + 3..],
        None => name,
    }
}

/// Wire form of a [`PseudoSelector`]; the derived fields are recomputed on
/// the way in.
#[derive(Clone, Serialize, Deserialize)]
struct PseudoData {
    name: String,
    #[serde(default)]
    element: bool,
    #[serde(default)]
    argument: Option<String>,
    #[serde(default)]
    selector: Option<SelectorList>,
}

impl From<PseudoData> for PseudoSelector {
    fn from(data: PseudoData) -> Self {
        Self::new(data.name, data.element, data.argument, data.selector)
    }
}

impl From<PseudoSelector> for PseudoData {
    fn from(pseudo: PseudoSelector) -> Self {
        Self {
            name: pseudo.name,
            element: !pseudo.is_syntactic_class,
            argument: pseudo.argument,
            selector: pseudo.selector.map(|selector| *selector),
        }
    }
}
