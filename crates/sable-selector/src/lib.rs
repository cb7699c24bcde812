//! The selector algebra of the Sable stylesheet compiler.
//!
//! # Scope
//!
//! This crate implements:
//! - **Selector AST** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Simple, compound and complex selectors and selector lists
//!   - Sass additions: placeholders (`%name`) and the parent selector (`&`)
//!   - Tolerated "bogus" combinator sequences
//!
//! - **Specificity** ([§ 17](https://www.w3.org/TR/selectors-4/#specificity-rules))
//!   - `[min, max]` ranges in base 1000, cached per node
//!
//! - **Selector relations**
//!   - Superselector checks at every level
//!   - Unification and weaving of complex selectors
//!
//! - **Nesting** ([CSS Nesting](https://www.w3.org/TR/css-nesting-1/))
//!   - Resolution of `&` against a parent selector list
//!
//! - **`@extend`**
//!   - The extension store, with fixed-point application and trimming
//!   - One-shot `extend` and `replace`
//!
//! # Not Implemented
//!
//! - Parsing selector text
//! - Matching selectors against a document

/// Selector AST types.
pub mod ast;
/// Detection and reporting of selectors that aren't valid plain CSS.
pub mod bogus;
/// Errors surfaced to stylesheet authors.
pub mod error;
/// The `@extend` engine.
pub mod extend;
/// Parent selector resolution per [CSS Nesting](https://www.w3.org/TR/css-nesting-1/).
pub mod resolve;
/// Reference serializer.
pub mod serialize;
/// Specificity per [§ 17](https://www.w3.org/TR/selectors-4/#specificity-rules).
pub mod specificity;
/// Superselector relation.
pub mod superselector;
/// Selector unification.
pub mod unify;
/// The visitor contract.
pub mod visitor;
/// Interleaving of complex selectors.
pub mod weave;

mod utils;

pub use ast::{
    AttributeOperator, AttributeSelector, Combinator, ComplexSelector, ComplexSelectorItem,
    CompoundSelector, NamespaceSpec, PseudoSelector, QualifiedName, SelectorList, SimpleSelector,
};
pub use error::{SelectorError, SelectorResult};
pub use extend::{ExtendMode, Extension, ExtensionStore, MediaQuery, SelectorId, extend, replace};
pub use specificity::{SPECIFICITY_BASE, Specificity};
