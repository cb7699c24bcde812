//! A small selector parser for tests.
//!
//! [§ 4 Selector syntax](https://www.w3.org/TR/selectors-4/#syntax)
//!
//! Covers what the tests need: compounds, combinators (including the bogus
//! leading, trailing and repeated ones Sass tolerates), attributes,
//! namespaces, pseudo-classes and pseudo-elements with text or selector
//! arguments, placeholders and `&suffix`. It panics on anything else.

#![allow(dead_code)]

use sable_common::SourceSpan;
use sable_selector::{
    AttributeOperator, AttributeSelector, Combinator, ComplexSelector, ComplexSelectorItem,
    CompoundSelector, NamespaceSpec, PseudoSelector, QualifiedName, SelectorList, SimpleSelector,
};

/// Pseudo-classes whose argument is a selector list.
const SELECTOR_PSEUDOS: [&str; 10] = [
    "not",
    "is",
    "matches",
    "where",
    "any",
    "current",
    "has",
    "host",
    "host-context",
    "slotted",
];

/// Parse a selector list, panicking on malformed input.
pub fn list(text: &str) -> SelectorList {
    let mut parser = Parser::new(text);
    let list = parser.parse_list();
    let _ = parser.skip_whitespace();
    assert!(
        parser.peek().is_none(),
        "unexpected {:?} at {} in {text:?}",
        parser.peek(),
        parser.pos
    );
    list
}

/// Parse a single complex selector.
pub fn complex(text: &str) -> ComplexSelector {
    let list = list(text);
    assert_eq!(list.components().len(), 1, "{text:?} is a list");
    list.into_components().remove(0)
}

/// Parse a single compound selector.
pub fn compound(text: &str) -> CompoundSelector {
    complex(text)
        .as_single_compound()
        .unwrap_or_else(|| panic!("{text:?} isn't a compound selector"))
        .clone()
}

/// Parse a single simple selector.
pub fn simple(text: &str) -> SimpleSelector {
    let compound = compound(text);
    assert_eq!(compound.components().len(), 1, "{text:?} isn't simple");
    compound.into_components().remove(0)
}

/// A span for selectors that came from nowhere in particular.
pub fn span() -> SourceSpan {
    SourceSpan::new("test.scss", 0, 0)
}

/// A span at a distinct offset, for telling extensions apart.
pub fn span_at(offset: usize) -> SourceSpan {
    SourceSpan::new("test.scss", offset, offset + 1)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek();
        self.pos += 1;
        c
    }

    fn expect(&mut self, expected: char) {
        let found = self.next();
        assert_eq!(found, Some(expected), "at {}", self.pos - 1);
    }

    /// Skip whitespace, returning whether it included a newline.
    fn skip_whitespace(&mut self) -> bool {
        let mut newline = false;
        while let Some(c) = self.peek().filter(char::is_ascii_whitespace) {
            newline |= c == '\n';
            self.pos += 1;
        }
        newline
    }

    fn parse_list(&mut self) -> SelectorList {
        let mut components = Vec::new();
        let mut line_break = false;
        loop {
            let _ = self.skip_whitespace();
            components.push(self.parse_complex(line_break));
            let _ = self.skip_whitespace();
            if self.peek() != Some(',') {
                break;
            }
            self.pos += 1;
            line_break = self.skip_whitespace();
        }
        SelectorList::new(components)
    }

    // [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
    // Whitespace between compounds is the descendant combinator, which the
    // AST represents by adjacency.
    fn parse_complex(&mut self, line_break: bool) -> ComplexSelector {
        let mut items = Vec::new();
        loop {
            let _ = self.skip_whitespace();
            let item = match self.peek() {
                None | Some(',' | ')') => break,
                Some('>') => ComplexSelectorItem::Comb(Combinator::Child),
                Some('+') => ComplexSelectorItem::Comb(Combinator::NextSibling),
                Some('~') => ComplexSelectorItem::Comb(Combinator::FollowingSibling),
                Some(_) => {
                    items.push(ComplexSelectorItem::Compound(self.parse_compound()));
                    continue;
                }
            };
            self.pos += 1;
            items.push(item);
        }
        ComplexSelector::new(items, line_break)
    }

    fn parse_compound(&mut self) -> CompoundSelector {
        let mut simples = Vec::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() || matches!(c, ',' | ')' | '>' | '+' | '~') {
                break;
            }
            simples.push(self.parse_simple());
        }
        CompoundSelector::new(simples)
    }

    fn parse_simple(&mut self) -> SimpleSelector {
        match self.peek() {
            Some('.') => {
                self.pos += 1;
                SimpleSelector::Class(self.ident())
            }
            Some('#') => {
                self.pos += 1;
                SimpleSelector::Id(self.ident())
            }
            Some('%') => {
                self.pos += 1;
                SimpleSelector::Placeholder(self.ident())
            }
            Some('&') => {
                self.pos += 1;
                let suffix = self.ident_chars();
                SimpleSelector::Parent {
                    suffix: (!suffix.is_empty()).then_some(suffix),
                }
            }
            Some('[') => SimpleSelector::Attribute(self.parse_attribute()),
            Some(':') => SimpleSelector::Pseudo(self.parse_pseudo()),
            Some('*') => {
                self.pos += 1;
                if self.peek() == Some('|') {
                    self.pos += 1;
                    self.element_name(Some(NamespaceSpec::Any))
                } else {
                    SimpleSelector::universal()
                }
            }
            Some('|') => {
                self.pos += 1;
                self.element_name(Some(NamespaceSpec::Empty))
            }
            Some(_) => {
                let name = self.ident();
                if self.peek() == Some('|') && self.peek_at(1) != Some('=') {
                    self.pos += 1;
                    self.element_name(Some(NamespaceSpec::Named(name)))
                } else {
                    SimpleSelector::type_selector(name)
                }
            }
            None => panic!("expected a simple selector"),
        }
    }

    /// The `*` or name after a namespace prefix.
    fn element_name(&mut self, namespace: Option<NamespaceSpec>) -> SimpleSelector {
        if self.peek() == Some('*') {
            self.pos += 1;
            return SimpleSelector::Universal { namespace };
        }
        SimpleSelector::Type(QualifiedName {
            name: self.ident(),
            namespace,
        })
    }

    // [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    fn parse_attribute(&mut self) -> AttributeSelector {
        self.expect('[');
        let _ = self.skip_whitespace();
        let name = self.attribute_name();
        let _ = self.skip_whitespace();
        if self.peek() == Some(']') {
            self.pos += 1;
            return AttributeSelector::exists(name);
        }

        let mut operator = String::new();
        while let Some(c) = self.next() {
            operator.push(c);
            if c == '=' {
                break;
            }
        }
        let operator: AttributeOperator = operator
            .parse()
            .unwrap_or_else(|_| panic!("unknown attribute operator {operator:?}"));

        let _ = self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let mut value = String::new();
                while let Some(c) = self.next() {
                    if c == quote {
                        break;
                    }
                    value.push(c);
                }
                value
            }
            _ => self.ident(),
        };
        let _ = self.skip_whitespace();
        let modifier = (self.peek() != Some(']')).then(|| self.ident());
        let _ = self.skip_whitespace();
        self.expect(']');
        AttributeSelector::with_value(name, operator, value, modifier)
    }

    fn attribute_name(&mut self) -> QualifiedName {
        let namespace = match self.peek() {
            Some('*') if self.peek_at(1) == Some('|') => {
                self.pos += 2;
                Some(NamespaceSpec::Any)
            }
            Some('|') => {
                self.pos += 1;
                Some(NamespaceSpec::Empty)
            }
            _ => None,
        };
        let name = self.ident();
        if namespace.is_none() && self.peek() == Some('|') && self.peek_at(1) != Some('=') {
            self.pos += 1;
            return QualifiedName::with_namespace(self.ident(), NamespaceSpec::Named(name));
        }
        QualifiedName {
            name,
            namespace,
        }
    }

    // [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    fn parse_pseudo(&mut self) -> PseudoSelector {
        self.expect(':');
        let element = self.peek() == Some(':');
        if element {
            self.pos += 1;
        }
        let name = self.ident();
        if self.peek() != Some('(') {
            return PseudoSelector::new(name, element, None, None);
        }
        self.pos += 1;

        let normalized = unvendor(&name).to_ascii_lowercase();
        let (argument, selector) = if SELECTOR_PSEUDOS.contains(&normalized.as_str()) && !element
        {
            (None, Some(self.parse_list()))
        } else if matches!(normalized.as_str(), "nth-child" | "nth-last-child") {
            let raw = self.raw_argument();
            match raw.split_once(" of ") {
                Some((formula, rest)) => (Some(format!("{} of", formula.trim())), Some(list(rest))),
                None => (Some(raw.trim().to_string()), None),
            }
        } else {
            (Some(self.raw_argument().trim().to_string()), None)
        };
        let _ = self.skip_whitespace();
        self.expect(')');
        PseudoSelector::new(name, element, argument, selector)
    }

    /// Text up to the `)` that closes the current argument.
    fn raw_argument(&mut self) -> String {
        let mut depth = 0;
        let mut raw = String::new();
        while let Some(c) = self.peek() {
            match c {
                '(' => depth += 1,
                ')' if depth == 0 => break,
                ')' => depth -= 1,
                _ => {}
            }
            raw.push(c);
            self.pos += 1;
        }
        raw
    }

    fn ident(&mut self) -> String {
        let ident = self.ident_chars();
        assert!(!ident.is_empty(), "expected an identifier at {}", self.pos);
        ident
    }

    // [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
    fn ident_chars(&mut self) -> String {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                ident.push(c);
                self.pos += 1;
                if let Some(escaped) = self.next() {
                    ident.push(escaped);
                }
                continue;
            }
            if !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()) {
                break;
            }
            ident.push(c);
            self.pos += 1;
        }
        ident
    }
}

fn unvendor(name: &str) -> &str {
    let Some(rest) = name.strip_prefix('-') else {
        return name;
    };
    if rest.starts_with('-') {
        return name;
    }
    rest.find('-').map_or(name, |i| &rest[i + 1..])
}
