//! Simple selectors.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use super::PseudoSelector;

/// [§ 6.1 Namespaces](https://www.w3.org/TR/selectors-4/#type-nmsp)
///
/// The namespace prefix of a type, universal or attribute selector.
/// A missing prefix (`div`) is represented by `None` on the owning selector,
/// not by a variant here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamespaceSpec {
    /// `*|`: any namespace, including none.
    Any,
    /// `|`: elements without a namespace.
    Empty,
    /// `ns|`: the namespace bound to the given prefix.
    Named(String),
}

/// A possibly namespaced name, as used by type and attribute selectors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    /// The local name.
    pub name: String,
    /// The namespace prefix, if one was written.
    pub namespace: Option<NamespaceSpec>,
}

impl QualifiedName {
    /// A name with no namespace prefix.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
        }
    }

    /// A name with an explicit namespace prefix.
    #[must_use]
    pub fn with_namespace(name: impl Into<String>, namespace: NamespaceSpec) -> Self {
        Self {
            name: name.into(),
            namespace: Some(namespace),
        }
    }
}

/// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// The operator of an attribute selector with a value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum AttributeOperator {
    /// `[attr=value]`: "exactly 'val'"
    #[strum(serialize = "=")]
    Equals,
    /// `[attr~=value]`: "a whitespace-separated list of words, one of which is exactly 'val'"
    #[strum(serialize = "~=")]
    Includes,
    /// `[attr|=value]`: "exactly 'val' or beginning with 'val' immediately followed by '-'"
    #[strum(serialize = "|=")]
    DashMatch,
    /// `[attr^=value]`: "begins with the prefix 'val'"
    #[strum(serialize = "^=")]
    PrefixMatch,
    /// `[attr$=value]`: "ends with the suffix 'val'"
    #[strum(serialize = "$=")]
    SuffixMatch,
    /// `[attr*=value]`: "contains at least one instance of the substring 'val'"
    #[strum(serialize = "*=")]
    SubstringMatch,
}

/// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// Examples: `[href]`, `[type=text]`, `[lang|=en]`, `[data-x="a b" i]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeSelector {
    /// The attribute name.
    pub name: QualifiedName,
    /// The matching operator; `None` for a bare `[attr]`.
    pub operator: Option<AttributeOperator>,
    /// The value to match; present exactly when `operator` is.
    pub value: Option<String>,
    /// The case modifier after the value, such as `i` or `s`.
    pub modifier: Option<String>,
}

impl AttributeSelector {
    /// `[name]`
    #[must_use]
    pub const fn exists(name: QualifiedName) -> Self {
        Self {
            name,
            operator: None,
            value: None,
            modifier: None,
        }
    }

    /// `[name<op>value modifier]`
    #[must_use]
    pub fn with_value(
        name: QualifiedName,
        operator: AttributeOperator,
        value: impl Into<String>,
        modifier: Option<String>,
    ) -> Self {
        Self {
            name,
            operator: Some(operator),
            value: Some(value.into()),
            modifier,
        }
    }
}

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// A simple selector is a single condition on an element. Sass adds two
/// build-time-only kinds: placeholders and the parent selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimpleSelector {
    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    ///
    /// Examples: `*`, `ns|*`, `*|*`
    Universal {
        /// The namespace prefix, if any.
        namespace: Option<NamespaceSpec>,
    },

    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    ///
    /// Examples: `div`, `svg|rect`
    Type(QualifiedName),

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    ///
    /// Examples: `.highlight`, `.btn`
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    ///
    /// Examples: `#main`, `#nav-bar`
    Id(String),

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    Attribute(AttributeSelector),

    /// A placeholder selector, `%name`. Only meaningful as an `@extend`
    /// target; selectors containing one are never emitted.
    Placeholder(String),

    /// The parent selector `&`, optionally followed by a suffix (`&-title`).
    /// Only present before nesting is resolved.
    Parent {
        /// Identifier text glued onto the end of the parent, if any.
        suffix: Option<String>,
    },

    /// [§ 3.5 Pseudo-classes and pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    ///
    /// Examples: `:hover`, `::before`, `:nth-child(2n+1)`, `:not(.a, .b)`
    Pseudo(PseudoSelector),
}

impl SimpleSelector {
    /// `*`
    #[must_use]
    pub const fn universal() -> Self {
        Self::Universal { namespace: None }
    }

    /// A type selector without a namespace.
    #[must_use]
    pub fn type_selector(name: impl Into<String>) -> Self {
        Self::Type(QualifiedName::new(name))
    }

    /// `.name`
    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        Self::Class(name.into())
    }

    /// `#name`
    #[must_use]
    pub fn id(name: impl Into<String>) -> Self {
        Self::Id(name.into())
    }

    /// `%name`
    #[must_use]
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self::Placeholder(name.into())
    }

    /// `&`, or `&suffix` when `suffix` is given.
    #[must_use]
    pub fn parent(suffix: Option<&str>) -> Self {
        Self::Parent {
            suffix: suffix.map(str::to_string),
        }
    }

    /// The pseudo selector inside this simple selector, if it is one.
    #[must_use]
    pub const fn as_pseudo(&self) -> Option<&PseudoSelector> {
        match self {
            Self::Pseudo(pseudo) => Some(pseudo),
            _ => None,
        }
    }

    /// Whether this is a pseudo-element such as `::before`.
    #[must_use]
    pub fn is_pseudo_element(&self) -> bool {
        self.as_pseudo().is_some_and(PseudoSelector::is_element)
    }

    /// Whether this is a universal or type selector.
    #[must_use]
    pub const fn is_universal_or_type(&self) -> bool {
        matches!(self, Self::Universal { .. } | Self::Type(_))
    }

    /// Whether this selector can never match an element that is emitted to CSS.
    ///
    /// Placeholders are invisible. A selector pseudo is invisible when its
    /// argument is, except for `:not()`, which matches everything when its
    /// argument matches nothing.
    #[must_use]
    pub fn is_invisible(&self) -> bool {
        match self {
            Self::Placeholder(_) => true,
            Self::Pseudo(pseudo) => pseudo
                .selector()
                .is_some_and(|selector| pseudo.name() != "not" && selector.is_invisible()),
            _ => false,
        }
    }

    /// Whether this is a private placeholder (`%-name` or `%_name`), which
    /// can't be extended from another module.
    #[must_use]
    pub fn is_private_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(name) if name.starts_with('-') || name.starts_with('_'))
    }
}
