//! The visitor contract for selector ASTs.
//!
//! Serialization and other whole-tree walks live outside the AST types.
//! They implement [`SelectorVisitor`] and drive it through the `accept`
//! methods on each node, so a new output format never has to touch the AST.

use crate::ast::{
    AttributeSelector, Combinator, ComplexSelector, ComplexSelectorItem, CompoundSelector,
    NamespaceSpec, PseudoSelector, QualifiedName, SelectorList, SimpleSelector,
};

/// A walk over a selector tree that produces an `Output` per node.
pub trait SelectorVisitor {
    /// The value produced for each visited node.
    type Output;

    /// Visit a selector list.
    fn visit_selector_list(&mut self, list: &SelectorList) -> Self::Output;

    /// Visit a complex selector.
    fn visit_complex_selector(&mut self, complex: &ComplexSelector) -> Self::Output;

    /// Visit a compound selector.
    fn visit_compound_selector(&mut self, compound: &CompoundSelector) -> Self::Output;

    /// Visit a combinator inside a complex selector.
    fn visit_combinator(&mut self, combinator: Combinator) -> Self::Output;

    /// Visit `*` or `ns|*`.
    fn visit_universal_selector(&mut self, namespace: Option<&NamespaceSpec>) -> Self::Output;

    /// Visit a type selector.
    fn visit_type_selector(&mut self, name: &QualifiedName) -> Self::Output;

    /// Visit `.name`.
    fn visit_class_selector(&mut self, name: &str) -> Self::Output;

    /// Visit `#name`.
    fn visit_id_selector(&mut self, name: &str) -> Self::Output;

    /// Visit an attribute selector.
    fn visit_attribute_selector(&mut self, attribute: &AttributeSelector) -> Self::Output;

    /// Visit `%name`.
    fn visit_placeholder_selector(&mut self, name: &str) -> Self::Output;

    /// Visit `&` or `&suffix`.
    fn visit_parent_selector(&mut self, suffix: Option<&str>) -> Self::Output;

    /// Visit a pseudo-class or pseudo-element.
    fn visit_pseudo_selector(&mut self, pseudo: &PseudoSelector) -> Self::Output;
}

impl SelectorList {
    /// Run `visitor` over this list.
    pub fn accept<V: SelectorVisitor>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_selector_list(self)
    }
}

impl ComplexSelector {
    /// Run `visitor` over this complex selector.
    pub fn accept<V: SelectorVisitor>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_complex_selector(self)
    }
}

impl ComplexSelectorItem {
    /// Run `visitor` over this item.
    pub fn accept<V: SelectorVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Self::Compound(compound) => visitor.visit_compound_selector(compound),
            Self::Comb(combinator) => visitor.visit_combinator(*combinator),
        }
    }
}

impl CompoundSelector {
    /// Run `visitor` over this compound selector.
    pub fn accept<V: SelectorVisitor>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_compound_selector(self)
    }
}

impl SimpleSelector {
    /// Run `visitor` over this simple selector.
    pub fn accept<V: SelectorVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Self::Universal { namespace } => visitor.visit_universal_selector(namespace.as_ref()),
            Self::Type(name) => visitor.visit_type_selector(name),
            Self::Class(name) => visitor.visit_class_selector(name),
            Self::Id(name) => visitor.visit_id_selector(name),
            Self::Attribute(attribute) => visitor.visit_attribute_selector(attribute),
            Self::Placeholder(name) => visitor.visit_placeholder_selector(name),
            Self::Parent { suffix } => visitor.visit_parent_selector(suffix.as_deref()),
            Self::Pseudo(pseudo) => visitor.visit_pseudo_selector(pseudo),
        }
    }
}
