//! Errors surfaced to stylesheet authors.
//!
//! Only misuse that a Sass author can cause is reported here. Queries such
//! as superselector checks and unification never fail; they answer `false`
//! or `None`. Broken internal invariants panic.

use sable_common::SourceSpan;
use thiserror::Error;

/// An error caused by the stylesheet being compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// A selector with `&` was resolved with no parent.
    #[error("Top-level selectors may not contain the parent selector \"&\".")]
    TopLevelParent,

    /// `&suffix` was used under a parent that ends in a combinator.
    #[error("Parent \"{parent}\" is incompatible with this selector.")]
    IncompatibleParent {
        /// The offending parent complex selector.
        parent: String,
    },

    /// `&suffix` was used under a parent whose last simple selector can't
    /// take a suffix, such as `*` or `[attr]`.
    #[error("Invalid parent selector \"{selector}\"")]
    InvalidSuffix {
        /// The simple selector that refused the suffix.
        selector: String,
    },

    /// A one-shot extend or replace was asked to target more than one compound.
    #[error("Can't extend complex selector {selector}.")]
    ComplexTarget {
        /// The offending target.
        selector: String,
    },

    /// An `@extend` inside a media query was applied to a selector outside it.
    #[error("You may not @extend selectors across media queries.")]
    CrossMediaExtend {
        /// The `@extend` rule.
        span: SourceSpan,
    },

    /// The same `@extend` was written in two different media queries.
    #[error("You may not @extend the same selector from within different media queries.")]
    ConflictingMediaContexts {
        /// The later of the two `@extend` rules.
        span: SourceSpan,
    },

    /// A mandatory `@extend` target never appeared in any style rule.
    #[error(
        "The target selector was not found.\nUse \"@extend {target} !optional\" to avoid this error."
    )]
    TargetNotFound {
        /// The target that was never found.
        target: String,
        /// The `@extend` rule.
        span: SourceSpan,
    },

    /// An error raised while extending the selector at `span`.
    #[error("From {span}\n{source}")]
    Nested {
        /// The selector whose extension failed.
        span: SourceSpan,
        /// The underlying failure.
        #[source]
        source: Box<SelectorError>,
    },
}

impl SelectorError {
    /// The source span this error points at, if it carries one.
    #[must_use]
    pub const fn span(&self) -> Option<&SourceSpan> {
        match self {
            Self::CrossMediaExtend { span }
            | Self::ConflictingMediaContexts { span }
            | Self::TargetNotFound { span, .. }
            | Self::Nested { span, .. } => Some(span),
            Self::TopLevelParent
            | Self::IncompatibleParent { .. }
            | Self::InvalidSuffix { .. }
            | Self::ComplexTarget { .. } => None,
        }
    }

    /// Wrap this error with the span of the selector being extended.
    #[must_use]
    pub fn nested_in(self, span: &SourceSpan) -> Self {
        Self::Nested {
            span: span.clone(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with all [`SelectorError::Nested`] layers removed.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Nested { source, .. } => source.root_cause(),
            _ => self,
        }
    }
}

/// Result alias for fallible selector operations.
pub type SelectorResult<T> = Result<T, SelectorError>;
