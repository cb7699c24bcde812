//! `@extend` and the one-shot `selector-extend()`/`selector-replace()`
//! operations.
//!
//! An extension `.x {@extend .a}` means that everything matching `.a`
//! should also be styled as if it matched `.x`. Each selector containing
//! `.a` gains a copy with `.a` replaced by `.x`, unified with whatever else
//! the compound required. Redundant results are then trimmed.

mod extender;
mod extension;
mod store;

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use sable_common::SourceSpan;
use strum_macros::{Display, EnumString};

use crate::ast::SelectorList;
use crate::error::{SelectorError, SelectorResult};
use extender::{Extender, ExtensionMap};

pub use extension::{Extension, MediaQuery};
pub use store::{ExtensionStore, SelectorId};

/// How extensions are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ExtendMode {
    /// `@extend`: each target extends independently and the original
    /// selector is kept.
    #[default]
    Normal,

    /// `selector-replace()`: every target must match and the original
    /// selector is dropped.
    Replace,

    /// `selector-extend()`: every target must match and the original
    /// selector is kept.
    AllTargets,
}

/// Extend `selector` as though `source {@extend targets}` were written.
///
/// Every compound in `targets` must match for a compound of `selector` to
/// be extended. The original selectors are kept, so
/// `extend(".c", ".e", ".c")` is `.c, .e`.
///
/// # Errors
///
/// Returns [`SelectorError::ComplexTarget`] if a member of `targets` isn't
/// a single compound selector.
pub fn extend(
    selector: &SelectorList,
    source: &SelectorList,
    targets: &SelectorList,
    span: &SourceSpan,
) -> SelectorResult<SelectorList> {
    extend_or_replace(selector, source, targets, span, ExtendMode::AllTargets)
}

/// Replace `targets` in `selector` with `source`.
///
/// Like [`extend`], but selectors that were extended don't keep their
/// original form, so `replace("c", "d", "c")` is `d`.
///
/// # Errors
///
/// Returns [`SelectorError::ComplexTarget`] if a member of `targets` isn't
/// a single compound selector.
pub fn replace(
    selector: &SelectorList,
    source: &SelectorList,
    targets: &SelectorList,
    span: &SourceSpan,
) -> SelectorResult<SelectorList> {
    extend_or_replace(selector, source, targets, span, ExtendMode::Replace)
}

fn extend_or_replace(
    selector: &SelectorList,
    source: &SelectorList,
    targets: &SelectorList,
    span: &SourceSpan,
    mode: ExtendMode,
) -> SelectorResult<SelectorList> {
    let mut compound_targets = Vec::with_capacity(targets.components().len());
    for complex in targets.components() {
        let Some(compound) = complex.as_single_compound() else {
            return Err(SelectorError::ComplexTarget {
                selector: complex.to_string(),
            });
        };
        compound_targets.push(compound);
    }

    let mut originals = IndexSet::new();
    if !selector.is_invisible() {
        originals.extend(selector.components().iter().cloned());
    }
    let source_specificity = HashMap::new();

    let mut result = selector.clone();
    for compound in compound_targets {
        let mut extensions = ExtensionMap::new();
        for simple in compound.components() {
            let sources: IndexMap<_, _> = source
                .components()
                .iter()
                .map(|complex| {
                    let extension = Extension::one_off(
                        complex.clone(),
                        simple.clone(),
                        span.clone(),
                        complex.max_specificity(),
                        false,
                    );
                    (complex.clone(), extension)
                })
                .collect();
            let _ = extensions.insert(simple.clone(), sources);
        }

        let mut extender = Extender {
            originals: &mut originals,
            source_specificity: &source_specificity,
            mode,
        };
        if let Some(extended) = extender.extend_list(&result, span, &extensions, None)? {
            result = extended;
        }
    }
    Ok(result)
}
