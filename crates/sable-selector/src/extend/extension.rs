//! Extension records.

use std::fmt;

use sable_common::SourceSpan;
use serde::{Deserialize, Serialize};

use crate::ast::{ComplexSelector, SimpleSelector};
use crate::error::{SelectorError, SelectorResult};

/// One media query from the `@media` context of a rule, as written.
///
/// Queries are only ever compared for equality here, so they're kept as
/// normalized text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaQuery(String);

impl MediaQuery {
    /// Wrap the text of a media query.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The query text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single `extender {@extend target}` edge in the extension graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    /// The selector that extends `target`.
    pub extender: ComplexSelector,
    /// The simple selector being extended.
    pub target: SimpleSelector,
    /// The `@extend` rule.
    pub span: SourceSpan,
    /// The style rule selector `extender` came from.
    pub extender_span: SourceSpan,
    /// The `@media` context of the `@extend` rule, if it's inside one.
    pub media_context: Option<Vec<MediaQuery>>,
    /// Whether the rule was marked `!optional`.
    pub is_optional: bool,
    /// Whether `extender` is part of the selector being extended rather
    /// than something added by an `@extend`.
    pub is_original: bool,
    /// The specificity of the selector `extender` was written in. Extending
    /// doesn't change this.
    pub specificity: u32,
    merged: Option<Box<(Self, Self)>>,
}

impl Extension {
    /// An extension registered by an `@extend` rule.
    #[must_use]
    pub fn new(
        extender: ComplexSelector,
        extender_span: SourceSpan,
        target: SimpleSelector,
        span: SourceSpan,
        media_context: Option<Vec<MediaQuery>>,
        is_optional: bool,
    ) -> Self {
        let specificity = extender.max_specificity();
        Self {
            extender,
            target,
            span,
            extender_span,
            media_context,
            is_optional,
            is_original: false,
            specificity,
            merged: None,
        }
    }

    /// An extension that isn't backed by an `@extend` rule, used for
    /// one-shot extension and to stand in for the unextended parts of a
    /// selector.
    #[must_use]
    pub fn one_off(
        extender: ComplexSelector,
        target: SimpleSelector,
        span: SourceSpan,
        specificity: u32,
        is_original: bool,
    ) -> Self {
        Self {
            extender,
            target,
            extender_span: span.clone(),
            span,
            media_context: None,
            is_optional: true,
            is_original,
            specificity,
            merged: None,
        }
    }

    /// A copy of this extension with its extender replaced by `extender`,
    /// the result of extending the original extender.
    #[must_use]
    pub fn with_extender(&self, extender: ComplexSelector) -> Self {
        Self {
            extender,
            target: self.target.clone(),
            span: self.span.clone(),
            extender_span: self.extender_span.clone(),
            media_context: self.media_context.clone(),
            is_optional: self.is_optional,
            is_original: self.is_original,
            specificity: self.specificity,
            merged: None,
        }
    }

    /// Check that this extension may apply to a selector in `media_context`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::CrossMediaExtend`] if this extension was
    /// registered in a media query and `media_context` is a different one.
    pub fn assert_compatible_media_context(
        &self,
        media_context: Option<&[MediaQuery]>,
    ) -> SelectorResult<()> {
        let Some(own) = &self.media_context else {
            return Ok(());
        };
        if media_context.is_some_and(|context| context == own.as_slice()) {
            return Ok(());
        }
        Err(SelectorError::CrossMediaExtend {
            span: self.span.clone(),
        })
    }

    /// Combine two extensions with the same extender and target.
    ///
    /// If one of them is optional and has no media context, the other is
    /// returned unchanged. Otherwise the result remembers both so that
    /// [`Extension::unmerge`] can report each one.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::ConflictingMediaContexts`] if both have
    /// different media contexts.
    ///
    /// # Panics
    ///
    /// Panics if the extensions have different extenders or targets.
    pub fn merge(left: Self, right: Self) -> SelectorResult<Self> {
        assert!(
            left.extender == right.extender && left.target == right.target,
            "{} and {} aren't the same extension",
            left.extender,
            right.extender
        );

        let conflicting = matches!(
            (&left.media_context, &right.media_context),
            (Some(left_context), Some(right_context)) if left_context != right_context
        );
        if conflicting {
            return Err(SelectorError::ConflictingMediaContexts {
                span: right.span.clone(),
            }
            .nested_in(&left.span));
        }

        if right.is_optional && right.media_context.is_none() {
            return Ok(left);
        }
        if left.is_optional && left.media_context.is_none() {
            return Ok(right);
        }

        Ok(Self {
            extender: left.extender.clone(),
            target: left.target.clone(),
            span: left.span.clone(),
            extender_span: left.extender_span.clone(),
            media_context: left.media_context.clone().or_else(|| right.media_context.clone()),
            is_optional: true,
            is_original: left.is_original,
            specificity: left.specificity,
            merged: Some(Box::new((left, right))),
        })
    }

    /// Whether this extension combines several `@extend` rules.
    #[must_use]
    pub const fn is_merged(&self) -> bool {
        self.merged.is_some()
    }

    /// The individual extensions this one was merged from, or itself if it
    /// wasn't merged.
    #[must_use]
    pub fn unmerge(&self) -> Vec<&Self> {
        match &self.merged {
            None => vec![self],
            Some(pair) => {
                let (left, right) = &**pair;
                let mut result = left.unmerge();
                result.extend(right.unmerge());
                result
            }
        }
    }
}
