//! Common utilities for the Sable selector engine.
//!
//! This crate provides shared infrastructure used by all Sable components:
//! - **Source spans** - locations attached to selectors, extensions and errors
//! - **Warning System** - the injected [`warning::Logger`] and colored,
//!   deduplicated terminal output

pub mod span;
pub mod warning;

pub use span::SourceSpan;
pub use warning::{Logger, RecordingLogger, TerminalLogger, Warning};
