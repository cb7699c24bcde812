//! Applying extensions to selectors.
//!
//! [`Extender`] holds the parts of an [`super::ExtensionStore`] that
//! extending reads or writes, so the store can keep mutating its extension
//! graph while selectors are being extended.

use std::collections::{HashMap, VecDeque};

use indexmap::{IndexMap, IndexSet};
use sable_common::SourceSpan;

use super::{ExtendMode, Extension, MediaQuery};
use crate::ast::{
    ComplexSelector, ComplexSelectorItem, CompoundSelector, PseudoSelector, SelectorList,
    SimpleSelector,
};
use crate::error::SelectorResult;
use crate::unify::unify_complex;
use crate::utils::paths;
use crate::weave::weave;

/// Extensions keyed by target, then by extender.
pub(crate) type ExtensionMap = IndexMap<SimpleSelector, IndexMap<ComplexSelector, Extension>>;

/// Past this many candidates, trimming is skipped to avoid quadratic blowup.
const TRIM_LIMIT: usize = 100;

/// Applies an [`ExtensionMap`] to selectors.
pub(crate) struct Extender<'a> {
    /// Complex selectors that were written in the stylesheet rather than
    /// generated by extension. They're never trimmed.
    pub(crate) originals: &'a mut IndexSet<ComplexSelector>,
    /// The specificity of the selector each extender's simple selectors
    /// were written in.
    pub(crate) source_specificity: &'a HashMap<SimpleSelector, u32>,
    pub(crate) mode: ExtendMode,
}

impl Extender<'_> {
    /// Extend every complex selector in `list`.
    ///
    /// Returns `None` if no extension applied.
    pub(crate) fn extend_list(
        &mut self,
        list: &SelectorList,
        span: &SourceSpan,
        extensions: &ExtensionMap,
        media_context: Option<&[MediaQuery]>,
    ) -> SelectorResult<Option<SelectorList>> {
        let mut extended: Option<Vec<ComplexSelector>> = None;
        for (i, complex) in list.components().iter().enumerate() {
            match self.extend_complex(complex, span, extensions, media_context)? {
                None => {
                    if let Some(extended) = &mut extended {
                        extended.push(complex.clone());
                    }
                }
                Some(result) => {
                    extended
                        .get_or_insert_with(|| list.components()[..i].to_vec())
                        .extend(result);
                }
            }
        }
        let Some(extended) = extended else {
            return Ok(None);
        };

        let originals = &*self.originals;
        let trimmed = trim(extended, self.source_specificity, |complex| {
            originals.contains(complex)
        });
        Ok((!trimmed.is_empty()).then(|| SelectorList::new(trimmed)))
    }

    /// Extend `complex`, returning every selector it expands to.
    ///
    /// Returns `None` if no extension applied.
    pub(crate) fn extend_complex(
        &mut self,
        complex: &ComplexSelector,
        span: &SourceSpan,
        extensions: &ExtensionMap,
        media_context: Option<&[MediaQuery]>,
    ) -> SelectorResult<Option<Vec<ComplexSelector>>> {
        // The complex selectors each item of `complex` can expand to. Given
        //
        //     .a .b {...}
        //     .x .y {@extend .b}
        //
        // this is `[[.a], [.b, .x .y]]`.
        let mut extended_not_expanded: Option<Vec<Vec<ComplexSelector>>> = None;
        let is_original = self.originals.contains(complex);
        for (i, item) in complex.components().iter().enumerate() {
            let extended = match item {
                ComplexSelectorItem::Compound(compound) => {
                    self.extend_compound(compound, span, extensions, media_context, is_original)?
                }
                ComplexSelectorItem::Comb(_) => None,
            };
            match extended {
                None => {
                    if let Some(expanded) = &mut extended_not_expanded {
                        expanded.push(vec![ComplexSelector::new(vec![item.clone()], false)]);
                    }
                }
                Some(extended) => {
                    extended_not_expanded
                        .get_or_insert_with(|| {
                            complex.components()[..i]
                                .iter()
                                .map(|item| {
                                    vec![ComplexSelector::new(vec![item.clone()], complex.line_break())]
                                })
                                .collect()
                        })
                        .push(extended);
                }
            }
        }
        let Some(extended_not_expanded) = extended_not_expanded else {
            return Ok(None);
        };

        let mut first = true;
        let mut result = Vec::new();
        for path in paths(&extended_not_expanded) {
            let line_break = complex.line_break() || path.iter().any(ComplexSelector::line_break);
            let woven = weave(path.iter().map(|complex| complex.components().to_vec()).collect());
            for items in woven {
                if items.is_empty() {
                    continue;
                }
                let output = ComplexSelector::new(items, line_break);

                // Copies of an original selector stay original, including
                // ones whose :not() was extended into.
                if first && is_original {
                    let _ = self.originals.insert(output.clone());
                }
                first = false;
                result.push(output);
            }
        }
        Ok(Some(result))
    }

    /// Extend `compound`, returning the complex selectors it expands to.
    ///
    /// `in_original` is whether `compound` is part of an original selector.
    /// Returns `None` if no extension applied.
    fn extend_compound(
        &mut self,
        compound: &CompoundSelector,
        span: &SourceSpan,
        extensions: &ExtensionMap,
        media_context: Option<&[MediaQuery]>,
        in_original: bool,
    ) -> SelectorResult<Option<Vec<ComplexSelector>>> {
        // Outside of @extend, every target has to match, so track which did.
        let mut targets_used: Option<IndexSet<SimpleSelector>> =
            (self.mode != ExtendMode::Normal && extensions.len() >= 2).then(IndexSet::new);

        // The extensions each simple selector in `compound` can become.
        let mut options: Option<Vec<Vec<Extension>>> = None;
        for (i, simple) in compound.components().iter().enumerate() {
            match self.extend_simple(simple, span, extensions, media_context, targets_used.as_mut())? {
                None => {
                    if let Some(options) = &mut options {
                        options.push(vec![self.extension_for_simple(simple, span)]);
                    }
                }
                Some(extended) => {
                    let options = options.get_or_insert_with(|| {
                        if i == 0 {
                            Vec::new()
                        } else {
                            vec![vec![self.extension_for_compound(
                                &compound.components()[..i],
                                span,
                            )]]
                        }
                    });
                    options.extend(extended);
                }
            }
        }
        let Some(options) = options else {
            return Ok(None);
        };

        if targets_used.is_some_and(|used| used.len() != extensions.len()) {
            return Ok(None);
        }

        // A single simple selector needs no unification.
        if let [only] = options.as_slice() {
            let mut result = Vec::with_capacity(only.len());
            for extension in only {
                extension.assert_compatible_media_context(media_context)?;
                result.push(extension.extender.clone());
            }
            return Ok(Some(result));
        }

        // Each path through `options` is a different unification of the
        // base selector. Given
        //
        //     .a.b {...}
        //     .w .x {@extend .a}
        //     .y .z {@extend .b}
        //
        // the paths are `[.a, .b]`, `[.w .x, .b]`, `[.a, .y .z]` and
        // `[.w .x, .y .z]`, which unify to `.a.b`, `.w .x.b`, `.y .a.z` and
        // `.w .y .x.z, .y .w .x.z`.
        let mut first = self.mode != ExtendMode::Replace;
        let mut unified_paths: Vec<Option<Vec<ComplexSelector>>> = Vec::new();
        for path in paths(&options) {
            let complexes = if first {
                // The first path is always the original selector. Its pseudo
                // selectors may have been extended, but it needs no
                // unification.
                first = false;
                let simples: Vec<SimpleSelector> = path
                    .iter()
                    .filter_map(|extension| extension.extender.last_compound())
                    .flat_map(|compound| compound.components().iter().cloned())
                    .collect();
                Some(vec![vec![ComplexSelectorItem::Compound(CompoundSelector::new(simples))]])
            } else {
                let mut to_unify: Vec<Vec<ComplexSelectorItem>> = Vec::new();
                let mut originals: Vec<SimpleSelector> = Vec::new();
                for extension in &path {
                    if extension.is_original {
                        if let Some(compound) = extension.extender.last_compound() {
                            originals.extend(compound.components().iter().cloned());
                        }
                    } else {
                        to_unify.push(extension.extender.components().to_vec());
                    }
                }
                if !originals.is_empty() {
                    to_unify.insert(
                        0,
                        vec![ComplexSelectorItem::Compound(CompoundSelector::new(originals))],
                    );
                }
                unify_complex(&to_unify)
            };

            let Some(complexes) = complexes else {
                unified_paths.push(None);
                continue;
            };

            let mut line_break = false;
            for extension in &path {
                extension.assert_compatible_media_context(media_context)?;
                line_break = line_break || extension.extender.line_break();
            }
            unified_paths.push(Some(
                complexes
                    .into_iter()
                    .filter(|items| !items.is_empty())
                    .map(|items| ComplexSelector::new(items, line_break))
                    .collect(),
            ));
        }

        // When the original selector is kept, mark its first unification so
        // trimming doesn't drop it.
        let original = if in_original && self.mode != ExtendMode::Replace {
            unified_paths
                .first()
                .and_then(Option::as_ref)
                .and_then(|complexes| complexes.first())
                .cloned()
        } else {
            None
        };

        let candidates: Vec<ComplexSelector> = unified_paths.into_iter().flatten().flatten().collect();
        Ok(Some(trim(candidates, self.source_specificity, |complex| {
            original.as_ref() == Some(complex)
        })))
    }

    /// Extend `simple`, returning one list of alternatives per simple
    /// selector it expands to. Selector pseudos expand to several simple
    /// selectors when their argument is split up.
    ///
    /// Returns `None` if no extension applied.
    fn extend_simple(
        &mut self,
        simple: &SimpleSelector,
        span: &SourceSpan,
        extensions: &ExtensionMap,
        media_context: Option<&[MediaQuery]>,
        mut targets_used: Option<&mut IndexSet<SimpleSelector>>,
    ) -> SelectorResult<Option<Vec<Vec<Extension>>>> {
        let extended_pseudo = match simple {
            SimpleSelector::Pseudo(pseudo) if pseudo.selector().is_some() => {
                self.extend_pseudo(pseudo, span, extensions, media_context)?
            }
            _ => None,
        };
        if let Some(extended) = extended_pseudo {
            return Ok(Some(
                extended
                    .into_iter()
                    .map(|pseudo| {
                        let simple = SimpleSelector::Pseudo(pseudo);
                        self.without_pseudo(&simple, span, extensions, targets_used.as_deref_mut())
                            .unwrap_or_else(|| vec![self.extension_for_simple(&simple, span)])
                    })
                    .collect(),
            ));
        }

        Ok(self
            .without_pseudo(simple, span, extensions, targets_used)
            .map(|result| vec![result]))
    }

    /// Extend `simple` without extending the contents of any selector
    /// pseudo it contains.
    fn without_pseudo(
        &self,
        simple: &SimpleSelector,
        span: &SourceSpan,
        extensions: &ExtensionMap,
        targets_used: Option<&mut IndexSet<SimpleSelector>>,
    ) -> Option<Vec<Extension>> {
        let extensions_for_simple = extensions.get(simple)?;
        if let Some(targets_used) = targets_used {
            let _ = targets_used.insert(simple.clone());
        }
        if self.mode == ExtendMode::Replace {
            return Some(extensions_for_simple.values().cloned().collect());
        }

        let mut result = Vec::with_capacity(extensions_for_simple.len() + 1);
        result.push(self.extension_for_simple(simple, span));
        result.extend(extensions_for_simple.values().cloned());
        Some(result)
    }

    /// Extend the selector argument of `pseudo`.
    ///
    /// Returns `None` if nothing was extended or nothing usable was left.
    fn extend_pseudo(
        &mut self,
        pseudo: &PseudoSelector,
        span: &SourceSpan,
        extensions: &ExtensionMap,
        media_context: Option<&[MediaQuery]>,
    ) -> SelectorResult<Option<Vec<PseudoSelector>>> {
        let Some(selector) = pseudo.selector() else {
            return Ok(None);
        };
        let Some(extended) = self.extend_list(selector, span, extensions, media_context)? else {
            return Ok(None);
        };

        // Complex selectors inside :not() break older browsers. Drop them
        // unless the original already had one, or nothing else is left.
        let is_not = pseudo.normalized_name() == "not";
        let mut complexes: Vec<&ComplexSelector> = extended.components().iter().collect();
        if is_not
            && !selector
                .components()
                .iter()
                .any(|complex| complex.components().len() > 1)
            && complexes.iter().any(|complex| complex.components().len() == 1)
        {
            complexes.retain(|complex| complex.components().len() <= 1);
        }

        let complexes: Vec<ComplexSelector> = complexes
            .into_iter()
            .flat_map(|complex| expand_nested_pseudo(pseudo, complex))
            .collect();
        if complexes.is_empty() {
            return Ok(None);
        }

        // Older browsers only support a single complex selector in :not(),
        // so split it up unless it was written as a list.
        if is_not && selector.components().len() == 1 {
            return Ok(Some(
                complexes
                    .into_iter()
                    .map(|complex| pseudo.with_selector(SelectorList::single(complex)))
                    .collect(),
            ));
        }
        Ok(Some(vec![pseudo.with_selector(SelectorList::new(complexes))]))
    }

    /// An extension standing in for `simple` itself.
    fn extension_for_simple(&self, simple: &SimpleSelector, span: &SourceSpan) -> Extension {
        Extension::one_off(
            ComplexSelector::from_compound(CompoundSelector::single(simple.clone())),
            simple.clone(),
            span.clone(),
            self.source_specificity.get(simple).copied().unwrap_or(0),
            true,
        )
    }

    /// An extension standing in for the unextended simple selectors at the
    /// start of a compound.
    fn extension_for_compound(&self, simples: &[SimpleSelector], span: &SourceSpan) -> Extension {
        let compound = CompoundSelector::new(simples.to_vec());
        let specificity = source_specificity_for(self.source_specificity, &compound);
        Extension::one_off(
            ComplexSelector::from_compound(compound),
            simples[0].clone(),
            span.clone(),
            specificity,
            true,
        )
    }
}

/// Simplify a selector pseudo nested directly inside `pseudo`, such as the
/// `:is(.a)` in `:is(:is(.a))`, and return what should replace `complex`.
fn expand_nested_pseudo(pseudo: &PseudoSelector, complex: &ComplexSelector) -> Vec<ComplexSelector> {
    let inner = complex
        .as_single_compound()
        .and_then(|compound| match compound.components() {
            [SimpleSelector::Pseudo(inner)] => inner.selector().map(|selector| (inner, selector)),
            _ => None,
        });
    let Some((inner, inner_selector)) = inner else {
        return vec![complex.clone()];
    };

    match pseudo.normalized_name() {
        // Nested :not() would need the outer result unified in, which isn't
        // supported. :is() and :matches() flatten into the outer :not().
        "not" => {
            if matches!(inner.normalized_name(), "is" | "matches") {
                inner_selector.components().to_vec()
            } else {
                Vec::new()
            }
        }
        "is" | "matches" | "where" | "any" | "current" | "nth-child" | "nth-last-child" => {
            if inner.name() == pseudo.name() && inner.argument() == pseudo.argument() {
                inner_selector.components().to_vec()
            } else {
                Vec::new()
            }
        }
        // Each layer of these adds meaning: `:has(:has(img))` doesn't match
        // `<div><img></div>` but `:has(img)` does.
        "has" | "host" | "host-context" | "slotted" => vec![complex.clone()],
        _ => Vec::new(),
    }
}

/// The highest source specificity of any simple selector in `compound`.
pub(crate) fn source_specificity_for(
    source_specificity: &HashMap<SimpleSelector, u32>,
    compound: &CompoundSelector,
) -> u32 {
    compound
        .components()
        .iter()
        .filter_map(|simple| source_specificity.get(simple).copied())
        .max()
        .unwrap_or(0)
}

/// Remove selectors that a superselector elsewhere in `selectors` already
/// covers, unless `is_original` says they were written in the stylesheet.
///
/// A selector is only removed in favor of one whose minimum specificity is
/// at least the source specificity of the removed one, so extending never
/// makes a rule less specific. Of two identical selectors, the first is
/// kept.
pub(crate) fn trim(
    selectors: Vec<ComplexSelector>,
    source_specificity: &HashMap<SimpleSelector, u32>,
    is_original: impl Fn(&ComplexSelector) -> bool,
) -> Vec<ComplexSelector> {
    if selectors.len() > TRIM_LIMIT {
        tracing::trace!(count = selectors.len(), "skipping selector trimming");
        return selectors;
    }

    // Walk backwards and prepend, so that of two identical selectors the
    // first one survives.
    let mut result: VecDeque<ComplexSelector> = VecDeque::new();
    for (i, complex1) in selectors.iter().enumerate().rev() {
        if is_original(complex1) {
            // A rule that extends part of its own selector, or an extension
            // cycle, can produce the same original twice. Generated
            // selectors may already sit in front of the later copy, so the
            // whole of `result` is searched.
            let duplicate = result.iter().position(|complex2| complex2 == complex1);
            if let Some(j) = duplicate {
                result.make_contiguous()[..=j].rotate_right(1);
                continue;
            }
            result.push_front(complex1.clone());
            continue;
        }

        // Only a superselector at least as specific as the sources that
        // generated `complex1` may replace it.
        let max_specificity = complex1
            .compounds()
            .map(|compound| source_specificity_for(source_specificity, compound))
            .max()
            .unwrap_or(0);
        let dominated_by = |complex2: &ComplexSelector| {
            complex2.min_specificity() >= max_specificity && complex2.is_superselector(complex1)
        };

        // Selectors after `i` are checked in `result`, which has already
        // been trimmed, so only one of two identical selectors is dropped.
        if result.iter().any(dominated_by) || selectors[..i].iter().any(dominated_by) {
            continue;
        }
        result.push_front(complex1.clone());
    }
    result.into()
}
