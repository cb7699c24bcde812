//! Source locations.
//!
//! Spans are opaque to the selector engine: they are carried alongside
//! selectors and extensions so that diagnostics can point back at the
//! stylesheet text that produced them.

use std::fmt;
use std::sync::Arc;

/// A range of source text in a stylesheet.
///
/// Equality is structural, so two spans covering the same range of the same
/// file compare equal regardless of where they were created.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceSpan {
    /// The URL or path of the stylesheet.
    url: Arc<str>,
    /// Byte offset of the first character.
    start: usize,
    /// Byte offset one past the last character.
    end: usize,
    /// 1-based line of `start`.
    line: usize,
    /// 1-based column of `start`.
    column: usize,
}

impl SourceSpan {
    /// Create a span covering `start..end` in `url`, located at line 1 column 1.
    ///
    /// # Panics
    ///
    /// Panics if `end < start`.
    #[must_use]
    pub fn new(url: impl Into<Arc<str>>, start: usize, end: usize) -> Self {
        assert!(start <= end, "span end {end} precedes start {start}");
        Self {
            url: url.into(),
            start,
            end,
            line: 1,
            column: 1,
        }
    }

    /// A zero-width span for selectors that did not come from source text,
    /// such as those built by built-in functions.
    #[must_use]
    pub fn synthetic(label: &str) -> Self {
        Self::new(format!("<{label}>"), 0, 0)
    }

    /// Attach a human-readable line and column to this span.
    #[must_use]
    pub fn with_location(mut self, line: usize, column: usize) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    /// The URL or path of the stylesheet.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Byte offset of the first character.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Byte offset one past the last character.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no text.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// 1-based line of the start of the span.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// 1-based column of the start of the span.
    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.url, self.line, self.column)
    }
}
