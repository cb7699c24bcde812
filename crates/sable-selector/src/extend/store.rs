//! The `@extend` graph for one stylesheet compilation.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use sable_common::SourceSpan;

use super::extender::{Extender, ExtensionMap};
use super::{ExtendMode, Extension, MediaQuery};
use crate::ast::{
    ComplexSelector, ComplexSelectorItem, PseudoSelector, SelectorList, SimpleSelector,
};
use crate::error::{SelectorError, SelectorResult};

/// A stable handle to a selector owned by an [`ExtensionStore`].
///
/// The store rewrites the selector behind a handle whenever a later
/// `@extend` applies to it, so style rules keep the handle and read the
/// current value through [`ExtensionStore::selector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelectorId(usize);

impl SelectorId {
    /// The position of this selector in registration order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A selector owned by the store, with the context it was written in.
#[derive(Debug, Clone)]
struct SelectorSlot {
    value: SelectorList,
    span: SourceSpan,
    media_context: Option<Vec<MediaQuery>>,
}

/// Tracks style rule selectors and the `@extend` rules that apply to them.
///
/// Selectors and extensions may be added in any order. Adding either one
/// applies every relevant extension right away, so [`ExtensionStore::selector`]
/// always returns the fully extended selector.
///
/// A store belongs to a single compilation. It is not meant to be shared
/// between threads.
#[derive(Debug, Default)]
pub struct ExtensionStore {
    /// Every registered selector, indexed by [`SelectorId`].
    selectors: Vec<SelectorSlot>,

    /// The selectors that contain each simple selector, including inside
    /// selector pseudos.
    selectors_by_simple: IndexMap<SimpleSelector, IndexSet<SelectorId>>,

    /// Target simple selectors to the extensions that apply to them.
    extensions: ExtensionMap,

    /// Simple selectors to the extensions whose extenders contain them.
    ///
    /// When a new extension targets one of these simple selectors, the
    /// extensions listed here are extended by it as well.
    extensions_by_extender: IndexMap<SimpleSelector, Vec<Extension>>,

    /// The specificity of the complex selector each simple selector in an
    /// extender was originally written in.
    source_specificity: HashMap<SimpleSelector, u32>,

    /// Complex selectors written directly in the stylesheet. These are
    /// never trimmed away.
    originals: IndexSet<ComplexSelector>,

    mode: ExtendMode,
}

impl ExtensionStore {
    /// Create an empty store for `@extend`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that applies extensions in `mode`.
    #[must_use]
    pub fn with_mode(mode: ExtendMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// The mode extensions are applied in.
    #[must_use]
    pub const fn mode(&self) -> ExtendMode {
        self.mode
    }

    /// Whether no extensions have been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// The number of registered selectors.
    #[must_use]
    pub fn selector_count(&self) -> usize {
        self.selectors.len()
    }

    /// The current value of the selector behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` came from a different store.
    #[must_use]
    pub fn selector(&self, id: SelectorId) -> &SelectorList {
        &self.selectors[id.0].value
    }

    /// Every simple selector that appears in a registered selector.
    pub fn simple_selectors(&self) -> impl Iterator<Item = &SimpleSelector> {
        self.selectors_by_simple.keys()
    }

    /// Register the selector of a style rule at `span`, extending it with
    /// every extension added so far.
    ///
    /// `media_context` is the `@media` context of the style rule, if any.
    ///
    /// # Errors
    ///
    /// Returns an error nested in `span` if an extension from a different
    /// media query would apply.
    pub fn add_selector(
        &mut self,
        list: SelectorList,
        span: SourceSpan,
        media_context: Option<Vec<MediaQuery>>,
    ) -> SelectorResult<SelectorId> {
        if !list.is_invisible() {
            self.originals.extend(list.components().iter().cloned());
        }

        let value = if self.extensions.is_empty() {
            list
        } else {
            let mut extender = Extender {
                originals: &mut self.originals,
                source_specificity: &self.source_specificity,
                mode: self.mode,
            };
            extender
                .extend_list(&list, &span, &self.extensions, media_context.as_deref())
                .map_err(|error| error.nested_in(&span))?
                .unwrap_or(list)
        };

        let id = SelectorId(self.selectors.len());
        register_selector(&mut self.selectors_by_simple, &value, id);
        tracing::trace!(id = id.0, selector = %value, "registered selector");
        self.selectors.push(SelectorSlot {
            value,
            span,
            media_context,
        });
        Ok(id)
    }

    /// Register `extender {@extend target}`, written at `extend_span` in a
    /// style rule whose selector is at `extender_span`.
    ///
    /// `extender` should be the current value of that style rule's
    /// selector, so extensions that already applied to it carry over to
    /// `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the same extension was already registered in a
    /// different media query, or if applying it to an existing selector
    /// crosses media queries.
    pub fn add_extension(
        &mut self,
        extender: &SelectorList,
        extender_span: &SourceSpan,
        target: &SimpleSelector,
        extend_span: &SourceSpan,
        media_context: Option<Vec<MediaQuery>>,
        is_optional: bool,
    ) -> SelectorResult<()> {
        let has_selectors = self.selectors_by_simple.contains_key(target);
        let existing_extensions = self.extensions_by_extender.get(target).cloned();
        let has_extensions = existing_extensions.is_some();

        let mut new_extensions: IndexMap<ComplexSelector, Extension> = IndexMap::new();
        let sources = self.extensions.entry(target.clone()).or_default();
        for complex in extender.components() {
            if complex.is_useless() {
                continue;
            }

            let extension = Extension::new(
                complex.clone(),
                extender_span.clone(),
                target.clone(),
                extend_span.clone(),
                media_context.clone(),
                is_optional,
            );
            if let Some(existing) = sources.get_mut(complex) {
                *existing = Extension::merge(existing.clone(), extension)?;
                continue;
            }
            let _ = sources.insert(complex.clone(), extension.clone());

            for simple in simple_selectors_in(complex) {
                self.extensions_by_extender
                    .entry(simple.clone())
                    .or_default()
                    .push(extension.clone());
                let _ = self
                    .source_specificity
                    .entry(simple)
                    .or_insert_with(|| complex.max_specificity());
            }

            if has_selectors || has_extensions {
                let _ = new_extensions.insert(complex.clone(), extension);
            }
        }
        tracing::debug!(
            %target,
            extender = %extender,
            new = new_extensions.len(),
            "added extension"
        );
        if new_extensions.is_empty() {
            return Ok(());
        }

        let mut new_extensions_by_target = ExtensionMap::new();
        let _ = new_extensions_by_target.insert(target.clone(), new_extensions);
        if let Some(existing_extensions) = existing_extensions {
            self.extend_existing_extensions(existing_extensions, &mut new_extensions_by_target)?;
        }
        if let Some(ids) = self.selectors_by_simple.get(target).cloned() {
            self.extend_existing_selectors(&ids, &new_extensions_by_target)?;
        }
        Ok(())
    }

    /// Add the extensions from other stores, such as those of modules this
    /// stylesheet uses, and apply them to this store's selectors.
    ///
    /// Private placeholder targets such as `%-name` don't cross stores.
    ///
    /// # Errors
    ///
    /// Returns an error if an imported extension conflicts with a local one
    /// or crosses media queries.
    pub fn add_extensions<'a>(
        &mut self,
        stores: impl IntoIterator<Item = &'a Self>,
    ) -> SelectorResult<()> {
        let mut new_extensions = ExtensionMap::new();
        let mut selectors_to_extend: IndexSet<SelectorId> = IndexSet::new();
        let mut extensions_to_extend: Vec<Extension> = Vec::new();

        for store in stores {
            if store.is_empty() {
                continue;
            }
            self.source_specificity.extend(
                store
                    .source_specificity
                    .iter()
                    .map(|(simple, specificity)| (simple.clone(), *specificity)),
            );

            for (target, new_sources) in &store.extensions {
                if target.is_private_placeholder() {
                    continue;
                }

                let extensions_for_target = self.extensions_by_extender.get(target);
                if let Some(extensions) = extensions_for_target {
                    extensions_to_extend.extend(extensions.iter().cloned());
                }
                let selectors_for_target = self.selectors_by_simple.get(target);
                if let Some(ids) = selectors_for_target {
                    selectors_to_extend.extend(ids.iter().copied());
                }
                let affects_existing =
                    extensions_for_target.is_some() || selectors_for_target.is_some();

                let existing_sources = self.extensions.entry(target.clone()).or_default();
                for (extender, extension) in new_sources {
                    let extension = match existing_sources.get(extender) {
                        Some(existing) => Extension::merge(existing.clone(), extension.clone())?,
                        None => extension.clone(),
                    };
                    let _ = existing_sources.insert(extender.clone(), extension.clone());
                    if affects_existing {
                        let _ = new_extensions
                            .entry(target.clone())
                            .or_default()
                            .insert(extender.clone(), extension);
                    }
                }
            }
        }

        if new_extensions.is_empty() {
            return Ok(());
        }
        if !extensions_to_extend.is_empty() {
            self.extend_existing_extensions(extensions_to_extend, &mut new_extensions)?;
        }
        if !selectors_to_extend.is_empty() {
            self.extend_existing_selectors(&selectors_to_extend, &new_extensions)?;
        }
        Ok(())
    }

    /// Every mandatory extension whose target matches `predicate`. Merged
    /// extensions are reported once per `@extend` rule.
    #[must_use]
    pub fn extensions_where_target(
        &self,
        mut predicate: impl FnMut(&SimpleSelector) -> bool,
    ) -> Vec<&Extension> {
        self.extensions
            .iter()
            .filter(|(target, _)| predicate(target))
            .flat_map(|(_, sources)| sources.values())
            .flat_map(Extension::unmerge)
            .filter(|extension| !extension.is_optional)
            .collect()
    }

    /// Check that every mandatory extension found its target in some
    /// registered selector.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::TargetNotFound`] for the first mandatory
    /// extension whose target never appeared.
    pub fn check_unsatisfied_extensions(&self) -> SelectorResult<()> {
        let unsatisfied = self
            .extensions_where_target(|target| !self.selectors_by_simple.contains_key(target))
            .into_iter()
            .next();
        match unsatisfied {
            Some(extension) => Err(SelectorError::TargetNotFound {
                target: extension.target.to_string(),
                span: extension.span.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Extend the extenders of `extensions` with `new_extensions`, then
    /// repeat with whatever that produces until nothing new appears.
    ///
    /// Given `.a {@extend .b}` followed by `.c {@extend .a}`, the extender of
    /// `.a {@extend .b}` becomes `.a, .c`, which adds `.c {@extend .b}`.
    /// Extensions produced for a target that `new_extensions` already
    /// extends are added to it, and feed the next round.
    fn extend_existing_extensions(
        &mut self,
        mut extensions: Vec<Extension>,
        new_extensions: &mut ExtensionMap,
    ) -> SelectorResult<()> {
        let mut pending = new_extensions.clone();
        let mut rounds = 0;
        while !extensions.is_empty() {
            rounds += 1;
            let additional = self.extend_extensions_once(&extensions, &pending)?;
            if additional.is_empty() {
                break;
            }

            for (target, extenders) in &additional {
                new_extensions.entry(target.clone()).or_default().extend(
                    extenders
                        .iter()
                        .map(|(complex, extension)| (complex.clone(), extension.clone())),
                );
            }

            // Only extensions that existed before this round need to see the
            // ones it produced.
            extensions = additional
                .keys()
                .filter_map(|target| self.extensions_by_extender.get(target))
                .flatten()
                .filter(|extension| {
                    !additional
                        .get(&extension.target)
                        .is_some_and(|sources| sources.contains_key(&extension.extender))
                })
                .cloned()
                .collect();
            pending = additional;
        }
        tracing::trace!(rounds, "extension graph closed");
        Ok(())
    }

    /// One round of [`ExtensionStore::extend_existing_extensions`]. Returns
    /// the extensions that didn't exist before.
    fn extend_extensions_once(
        &mut self,
        extensions: &[Extension],
        pending: &ExtensionMap,
    ) -> SelectorResult<ExtensionMap> {
        let mut additional = ExtensionMap::new();
        for extension in extensions {
            let mut extender = Extender {
                originals: &mut self.originals,
                source_specificity: &self.source_specificity,
                mode: self.mode,
            };
            let Some(selectors) = extender
                .extend_complex(
                    &extension.extender,
                    &extension.extender_span,
                    pending,
                    extension.media_context.as_deref(),
                )
                .map_err(|error| error.nested_in(&extension.extender_span))?
            else {
                continue;
            };

            let contains_extension = selectors.first() == Some(&extension.extender);
            let Some(sources) = self.extensions.get_mut(&extension.target) else {
                continue;
            };
            for complex in selectors.into_iter().skip(usize::from(contains_extension)) {
                let with_extender = extension.with_extender(complex.clone());
                let known = sources
                    .get(&complex)
                    .map(|existing| existing.unmerge().contains(&&with_extender));
                match known {
                    // Derived the same way in an earlier round.
                    Some(true) => {}
                    Some(false) => {
                        if let Some(existing) = sources.get_mut(&complex) {
                            *existing = Extension::merge(existing.clone(), with_extender)?;
                        }
                    }
                    None => {
                        for simple in complex
                            .compounds()
                            .flat_map(|compound| compound.components().iter())
                        {
                            self.extensions_by_extender
                                .entry(simple.clone())
                                .or_default()
                                .push(with_extender.clone());
                        }
                        let _ = sources.insert(complex.clone(), with_extender.clone());
                        // Selectors containing a target outside `pending`
                        // already reach the new extender through the
                        // extender's own simple selectors.
                        if pending.contains_key(&extension.target) {
                            let _ = additional
                                .entry(extension.target.clone())
                                .or_default()
                                .insert(complex, with_extender);
                        }
                    }
                }
            }

            // The extender may have been rewritten, for example by :not()
            // expansion, so the old version no longer applies.
            if !contains_extension {
                let _ = sources.shift_remove(&extension.extender);
            }
        }
        Ok(additional)
    }

    /// Extend the selectors behind `ids` with `new_extensions`.
    fn extend_existing_selectors(
        &mut self,
        ids: &IndexSet<SelectorId>,
        new_extensions: &ExtensionMap,
    ) -> SelectorResult<()> {
        for &id in ids {
            let slot = &mut self.selectors[id.0];
            let mut extender = Extender {
                originals: &mut self.originals,
                source_specificity: &self.source_specificity,
                mode: self.mode,
            };
            let extended = extender
                .extend_list(
                    &slot.value,
                    &slot.span,
                    new_extensions,
                    slot.media_context.as_deref(),
                )
                .map_err(|error| error.nested_in(&slot.span))?;

            // Unification can fail for every candidate, in which case the
            // selector needs no re-registration.
            let Some(extended) = extended else {
                continue;
            };
            if extended == slot.value {
                continue;
            }
            tracing::debug!(id = id.0, from = %slot.value, to = %extended, "extended selector");
            slot.value = extended;
            register_selector(&mut self.selectors_by_simple, &slot.value, id);
        }
        Ok(())
    }
}

/// Record that every simple selector in `list`, including those inside
/// selector pseudos, appears in the selector behind `id`.
fn register_selector(
    selectors_by_simple: &mut IndexMap<SimpleSelector, IndexSet<SelectorId>>,
    list: &SelectorList,
    id: SelectorId,
) {
    for complex in list.components() {
        for simple in complex
            .compounds()
            .flat_map(|compound| compound.components().iter())
        {
            let _ = selectors_by_simple
                .entry(simple.clone())
                .or_default()
                .insert(id);
            if let Some(selector) = simple.as_pseudo().and_then(PseudoSelector::selector) {
                register_selector(selectors_by_simple, selector, id);
            }
        }
    }
}

/// Every simple selector in `complex`, including inside selector pseudos.
fn simple_selectors_in(complex: &ComplexSelector) -> Vec<SimpleSelector> {
    let mut result = Vec::new();
    for item in complex.components() {
        let ComplexSelectorItem::Compound(compound) = item else {
            continue;
        };
        for simple in compound.components() {
            result.push(simple.clone());
            if let Some(selector) = simple.as_pseudo().and_then(PseudoSelector::selector) {
                for complex in selector.components() {
                    result.extend(simple_selectors_in(complex));
                }
            }
        }
    }
    result
}
