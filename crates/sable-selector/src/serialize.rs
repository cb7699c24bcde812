//! Reference serializer.
//!
//! Renders selectors the way expanded-style CSS output does. This is what
//! `Display` uses, so error messages and tests see the same text the
//! compiler would emit.

use std::fmt;

use crate::ast::{
    AttributeSelector, Combinator, ComplexSelector, ComplexSelectorItem, CompoundSelector,
    NamespaceSpec, PseudoSelector, QualifiedName, SelectorList, SimpleSelector,
};
use crate::visitor::SelectorVisitor;

/// Accumulates selector text in a buffer.
#[derive(Debug, Default)]
pub struct Serializer {
    buffer: String,
}

impl Serializer {
    /// Create an empty serializer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The text written so far.
    #[must_use]
    pub fn finish(self) -> String {
        self.buffer
    }

    fn write_namespace(&mut self, namespace: &NamespaceSpec) {
        match namespace {
            NamespaceSpec::Any => self.buffer.push('*'),
            NamespaceSpec::Empty => {}
            NamespaceSpec::Named(prefix) => self.buffer.push_str(prefix),
        }
        self.buffer.push('|');
    }
}

impl SelectorVisitor for Serializer {
    type Output = ();

    fn visit_selector_list(&mut self, list: &SelectorList) {
        for (i, complex) in list.components().iter().enumerate() {
            if i > 0 {
                self.buffer.push(',');
                self.buffer
                    .push(if complex.line_break() { '\n' } else { ' ' });
            }
            complex.accept(self);
        }
    }

    fn visit_complex_selector(&mut self, complex: &ComplexSelector) {
        for (i, item) in complex.components().iter().enumerate() {
            if i > 0 {
                self.buffer.push(' ');
            }
            item.accept(self);
        }
    }

    fn visit_compound_selector(&mut self, compound: &CompoundSelector) {
        for simple in compound.components() {
            simple.accept(self);
        }
    }

    fn visit_combinator(&mut self, combinator: Combinator) {
        self.buffer.push_str(&combinator.to_string());
    }

    fn visit_universal_selector(&mut self, namespace: Option<&NamespaceSpec>) {
        if let Some(namespace) = namespace {
            self.write_namespace(namespace);
        }
        self.buffer.push('*');
    }

    fn visit_type_selector(&mut self, name: &QualifiedName) {
        if let Some(namespace) = &name.namespace {
            self.write_namespace(namespace);
        }
        self.buffer.push_str(&name.name);
    }

    fn visit_class_selector(&mut self, name: &str) {
        self.buffer.push('.');
        self.buffer.push_str(name);
    }

    fn visit_id_selector(&mut self, name: &str) {
        self.buffer.push('#');
        self.buffer.push_str(name);
    }

    fn visit_attribute_selector(&mut self, attribute: &AttributeSelector) {
        self.buffer.push('[');
        self.visit_type_selector(&attribute.name);
        if let (Some(operator), Some(value)) = (attribute.operator, &attribute.value) {
            self.buffer.push_str(&operator.to_string());
            if is_identifier(value) {
                self.buffer.push_str(value);
            } else {
                write_quoted(&mut self.buffer, value);
            }
            if let Some(modifier) = &attribute.modifier {
                self.buffer.push(' ');
                self.buffer.push_str(modifier);
            }
        }
        self.buffer.push(']');
    }

    fn visit_placeholder_selector(&mut self, name: &str) {
        self.buffer.push('%');
        self.buffer.push_str(name);
    }

    fn visit_parent_selector(&mut self, suffix: Option<&str>) {
        self.buffer.push('&');
        if let Some(suffix) = suffix {
            self.buffer.push_str(suffix);
        }
    }

    fn visit_pseudo_selector(&mut self, pseudo: &PseudoSelector) {
        self.buffer.push(':');
        if pseudo.is_syntactic_element() {
            self.buffer.push(':');
        }
        self.buffer.push_str(pseudo.name());
        if pseudo.argument().is_none() && pseudo.selector().is_none() {
            return;
        }

        self.buffer.push('(');
        if let Some(argument) = pseudo.argument() {
            self.buffer.push_str(argument);
        }
        if let Some(selector) = pseudo.selector() {
            if pseudo.argument().is_some() {
                self.buffer.push(' ');
            }
            selector.accept(self);
        }
        self.buffer.push(')');
    }
}

/// [§ 4.3.9 ident code points](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
///
/// Whether `text` can be written as a bare identifier.
fn is_identifier(text: &str) -> bool {
    fn is_name_start(c: char) -> bool {
        c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
    }
    fn is_name(c: char) -> bool {
        is_name_start(c) || c.is_ascii_digit() || c == '-'
    }

    let rest = text.strip_prefix('-').unwrap_or(text);
    let mut chars = rest.chars();
    match chars.next() {
        Some('-') => chars.all(is_name),
        Some(c) if is_name_start(c) => chars.all(is_name),
        _ => false,
    }
}

/// Write `text` as a double-quoted CSS string.
fn write_quoted(buffer: &mut String, text: &str) {
    buffer.push('"');
    for c in text.chars() {
        if matches!(c, '"' | '\\') {
            buffer.push('\\');
        }
        buffer.push(c);
    }
    buffer.push('"');
}

/// Render a node with a fresh [`Serializer`].
fn render(f: &mut fmt::Formatter<'_>, accept: impl FnOnce(&mut Serializer)) -> fmt::Result {
    let mut serializer = Serializer::new();
    accept(&mut serializer);
    f.write_str(&serializer.finish())
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(f, |serializer| self.accept(serializer))
    }
}

impl fmt::Display for ComplexSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(f, |serializer| self.accept(serializer))
    }
}

impl fmt::Display for ComplexSelectorItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(f, |serializer| self.accept(serializer))
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(f, |serializer| self.accept(serializer))
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(f, |serializer| self.accept(serializer))
    }
}

impl fmt::Display for PseudoSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(f, |serializer| serializer.visit_pseudo_selector(self))
    }
}
