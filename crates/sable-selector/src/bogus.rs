//! Bogus selectors.
//!
//! Sass has always accepted combinators in places plain CSS doesn't: at the
//! start of a nested selector (`> .a`), at the end (`.a +`), or several in a
//! row (`.a > > .b`). These still compile, but callers warn about them
//! through [`report_bogus_selectors`] because they'll eventually be errors.

use sable_common::{Logger, SourceSpan};

use crate::ast::{
    AttributeSelector, Combinator, ComplexSelector, ComplexSelectorItem, CompoundSelector,
    NamespaceSpec, PseudoSelector, QualifiedName, SelectorList,
};
use crate::visitor::SelectorVisitor;

impl ComplexSelector {
    /// Whether this selector is not valid CSS.
    ///
    /// That includes a leading combinator, which is allowed in nested Sass
    /// but not in CSS output.
    #[must_use]
    pub fn is_bogus(&self) -> bool {
        self.accept(&mut IsBogus {
            include_leading_combinator: true,
        })
    }

    /// Like [`ComplexSelector::is_bogus`], but allows a single leading
    /// combinator.
    #[must_use]
    pub fn is_bogus_other_than_leading_combinator(&self) -> bool {
        self.accept(&mut IsBogus {
            include_leading_combinator: false,
        })
    }

    /// Whether this selector is bogus even for nesting, such as `.a > > .b`.
    /// Useless selectors are dropped from the output.
    #[must_use]
    pub fn is_useless(&self) -> bool {
        self.accept(&mut IsUseless)
    }

    fn leading_combinator_count(&self) -> usize {
        self.leading_combinators().len()
    }
}

impl SelectorList {
    /// Whether any member of this list is bogus.
    #[must_use]
    pub fn is_bogus(&self) -> bool {
        self.components().iter().any(ComplexSelector::is_bogus)
    }

    /// Whether any member is bogus other than for a single leading combinator.
    #[must_use]
    pub fn is_bogus_other_than_leading_combinator(&self) -> bool {
        self.components()
            .iter()
            .any(ComplexSelector::is_bogus_other_than_leading_combinator)
    }

    /// Whether any member of this list is useless.
    #[must_use]
    pub fn is_useless(&self) -> bool {
        self.components().iter().any(ComplexSelector::is_useless)
    }
}

/// Whether `items` contains two combinators in a row.
fn has_repeated_combinator(items: &[ComplexSelectorItem]) -> bool {
    items
        .windows(2)
        .any(|pair| pair[0].is_combinator() && pair[1].is_combinator())
}

/// Finds selectors that aren't valid CSS.
struct IsBogus {
    include_leading_combinator: bool,
}

impl SelectorVisitor for IsBogus {
    type Output = bool;

    fn visit_selector_list(&mut self, list: &SelectorList) -> bool {
        list.components().iter().any(|complex| complex.accept(self))
    }

    fn visit_complex_selector(&mut self, complex: &ComplexSelector) -> bool {
        let leading = complex.leading_combinator_count();
        if leading == complex.components().len() {
            return true;
        }
        let allowed = usize::from(!self.include_leading_combinator);
        if leading > allowed
            || !complex.trailing_combinators().is_empty()
            || has_repeated_combinator(&complex.components()[leading..])
        {
            return true;
        }
        complex.components().iter().any(|item| item.accept(self))
    }

    fn visit_compound_selector(&mut self, compound: &CompoundSelector) -> bool {
        compound.components().iter().any(|simple| simple.accept(self))
    }

    fn visit_combinator(&mut self, _: Combinator) -> bool {
        false
    }

    fn visit_universal_selector(&mut self, _: Option<&NamespaceSpec>) -> bool {
        false
    }

    fn visit_type_selector(&mut self, _: &QualifiedName) -> bool {
        false
    }

    fn visit_class_selector(&mut self, _: &str) -> bool {
        false
    }

    fn visit_id_selector(&mut self, _: &str) -> bool {
        false
    }

    fn visit_attribute_selector(&mut self, _: &AttributeSelector) -> bool {
        false
    }

    fn visit_placeholder_selector(&mut self, _: &str) -> bool {
        false
    }

    fn visit_parent_selector(&mut self, _: Option<&str>) -> bool {
        false
    }

    fn visit_pseudo_selector(&mut self, pseudo: &PseudoSelector) -> bool {
        pseudo.selector().is_some_and(|selector| {
            // :has() takes relative selectors, so a leading combinator is fine.
            if pseudo.name() == "has" {
                selector.is_bogus_other_than_leading_combinator()
            } else {
                selector.is_bogus()
            }
        })
    }
}

/// Finds selectors that are bogus even as nesting parents.
struct IsUseless;

impl SelectorVisitor for IsUseless {
    type Output = bool;

    fn visit_selector_list(&mut self, list: &SelectorList) -> bool {
        list.components().iter().any(|complex| complex.accept(self))
    }

    fn visit_complex_selector(&mut self, complex: &ComplexSelector) -> bool {
        has_repeated_combinator(complex.components())
            || complex.components().iter().any(|item| item.accept(self))
    }

    fn visit_compound_selector(&mut self, compound: &CompoundSelector) -> bool {
        compound.components().iter().any(|simple| simple.accept(self))
    }

    fn visit_combinator(&mut self, _: Combinator) -> bool {
        false
    }

    fn visit_universal_selector(&mut self, _: Option<&NamespaceSpec>) -> bool {
        false
    }

    fn visit_type_selector(&mut self, _: &QualifiedName) -> bool {
        false
    }

    fn visit_class_selector(&mut self, _: &str) -> bool {
        false
    }

    fn visit_id_selector(&mut self, _: &str) -> bool {
        false
    }

    fn visit_attribute_selector(&mut self, _: &AttributeSelector) -> bool {
        false
    }

    fn visit_placeholder_selector(&mut self, _: &str) -> bool {
        false
    }

    fn visit_parent_selector(&mut self, _: Option<&str>) -> bool {
        false
    }

    fn visit_pseudo_selector(&mut self, pseudo: &PseudoSelector) -> bool {
        let mut is_bogus = IsBogus {
            include_leading_combinator: pseudo.name() != "has",
        };
        pseudo
            .selector()
            .is_some_and(|selector| selector.accept(&mut is_bogus))
    }
}

/// Warn through `logger` about every bogus member of `list`, a style rule's
/// selector found at `span`.
///
/// Returns the number of warnings emitted.
#[must_use = "the count says whether any selector was bogus"]
pub fn report_bogus_selectors(list: &SelectorList, span: &SourceSpan, logger: &dyn Logger) -> usize {
    let mut count = 0;
    for complex in list.components() {
        if !complex.is_bogus() {
            continue;
        }

        let text = complex.to_string();
        let text = text.trim();
        let message = if complex.is_useless() {
            format!(
                "The selector \"{text}\" is invalid CSS. It will be omitted from the generated CSS.\n\
                 This will be an error in a future release."
            )
        } else if complex.leading_combinator_count() > 0 {
            format!(
                "The selector \"{text}\" is invalid CSS.\n\
                 This will be an error in a future release."
            )
        } else {
            let omitted = if complex.is_bogus_other_than_leading_combinator() {
                " It will be omitted from the generated CSS."
            } else {
                ""
            };
            format!(
                "The selector \"{text}\" is only valid for nesting and shouldn't\n\
                 have children other than style rules.{omitted}\n\
                 This will be an error in a future release."
            )
        };
        logger.warn(&message, Some(span), true);
        count += 1;
    }
    count
}
