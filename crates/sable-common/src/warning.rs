//! Compiler warnings with colored terminal output.
//!
//! The selector engine never prints anything itself. Callers hand it a
//! [`Logger`] and it reports bogus selectors and similar deprecations through
//! that. [`TerminalLogger`] is the default implementation and deduplicates
//! repeated messages so a selector used in a loop only warns once.

use std::cell::RefCell;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

use crate::span::SourceSpan;

/// A single diagnostic produced while compiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// The human-readable message.
    pub message: String,
    /// Where in the stylesheet the problem was found, if known.
    pub span: Option<SourceSpan>,
    /// Whether this warns about behavior that will become an error.
    pub deprecation: bool,
}

/// Sink for warnings emitted by the compiler.
///
/// Implementations decide how (and whether) to surface warnings. One logger
/// is used per compilation.
pub trait Logger {
    /// Report a warning, optionally attributed to a source span.
    fn warn(&self, message: &str, span: Option<&SourceSpan>, deprecation: bool);
}

/// Writes warnings to stderr in yellow, printing each distinct message once.
#[derive(Debug, Default)]
pub struct TerminalLogger {
    seen: Mutex<HashSet<String>>,
}

impl TerminalLogger {
    /// Create a logger with an empty deduplication set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Logger for TerminalLogger {
    fn warn(&self, message: &str, span: Option<&SourceSpan>, deprecation: bool) {
        let label = if deprecation {
            "Deprecation Warning"
        } else {
            "Warning"
        };
        let text = match span {
            Some(span) => format!("{label}: {message}\n    {span}"),
            None => format!("{label}: {message}"),
        };
        let should_print = self
            .seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(text.clone());
        if should_print {
            eprintln!("{}", text.yellow());
        }
    }
}

/// Collects warnings in memory instead of printing them.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    warnings: RefCell<Vec<Warning>>,
}

impl RecordingLogger {
    /// Create an empty recording logger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All warnings recorded so far, in emission order.
    #[must_use]
    pub fn warnings(&self) -> Vec<Warning> {
        self.warnings.borrow().clone()
    }

    /// Number of warnings recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.warnings.borrow().len()
    }

    /// Whether no warnings have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warnings.borrow().is_empty()
    }
}

impl Logger for RecordingLogger {
    fn warn(&self, message: &str, span: Option<&SourceSpan>, deprecation: bool) {
        self.warnings.borrow_mut().push(Warning {
            message: message.to_string(),
            span: span.cloned(),
            deprecation,
        });
    }
}
