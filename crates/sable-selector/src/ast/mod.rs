//! The selector AST.
//!
//! Every node is an immutable value with structural equality: two selectors
//! are equal when their component trees are equal. Nodes are never mutated
//! after construction; unification, extension and parent resolution always
//! build new trees.
//!
//! The hierarchy, from the leaves up:
//!
//! ```text
//! SimpleSelector      .a  #b  c  [d]  :e  ::f  %g  &  *
//! CompoundSelector    a.b#c                  (AND of simple selectors)
//! ComplexSelector     a.b > c ~ d e          (compounds joined by combinators)
//! SelectorList        a, b c                 (OR of complex selectors)
//! ```

mod complex;
mod compound;
mod list;
mod pseudo;
mod simple;

pub use complex::{Combinator, ComplexSelector, ComplexSelectorItem};
pub use compound::CompoundSelector;
pub use list::SelectorList;
pub(crate) use list::complex_contains_parent_selector;
pub use pseudo::PseudoSelector;
pub use simple::{
    AttributeOperator, AttributeSelector, NamespaceSpec, QualifiedName, SimpleSelector,
};
