//! Specificity ranges.
//!
//! [§ 17 Calculating a selector's specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
//!
//! Sass only needs specificity to decide whether a selector generated by
//! `@extend` is redundant, so it uses a single number in base 1000 instead
//! of the (A, B, C) triple. Selector pseudos such as `:is()` take the
//! specificity of their argument, which may vary between branches, so every
//! selector has a `[min, max]` range rather than one value.

use std::iter::Sum;
use std::ops::Add;

use crate::ast::SimpleSelector;

/// The weight of one ordinary simple selector.
pub const SPECIFICITY_BASE: u32 = 1000;

/// A `[min, max]` specificity range.
///
/// Invariant: `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Specificity {
    /// The lowest specificity the selector can have.
    pub min: u32,
    /// The highest specificity the selector can have.
    pub max: u32,
}

impl Specificity {
    /// The range of the universal selector.
    pub const ZERO: Self = Self { min: 0, max: 0 };

    /// The range of an ordinary simple selector.
    pub const SIMPLE: Self = Self::exact(SPECIFICITY_BASE);

    /// Create a range.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        assert!(min <= max, "specificity min must not exceed max");
        Self { min, max }
    }

    /// A range containing a single value.
    #[must_use]
    pub const fn exact(value: u32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// The smallest range containing both `self` and `other`.
    #[must_use]
    pub fn widen(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

impl Add for Specificity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            min: self.min.saturating_add(rhs.min),
            max: self.max.saturating_add(rhs.max),
        }
    }
}

impl Sum for Specificity {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl SimpleSelector {
    /// The specificity range this simple selector contributes.
    ///
    /// The universal selector contributes nothing. A pseudo with a selector
    /// argument spans the range of that argument. Everything else counts
    /// as one [`SPECIFICITY_BASE`].
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        match self {
            Self::Universal { .. } => Specificity::ZERO,
            Self::Pseudo(pseudo) => pseudo
                .selector()
                .map_or(Specificity::SIMPLE, |selector| selector.specificity()),
            _ => Specificity::SIMPLE,
        }
    }

    /// The lowest specificity this selector can have.
    #[must_use]
    pub fn min_specificity(&self) -> u32 {
        self.specificity().min
    }

    /// The highest specificity this selector can have.
    #[must_use]
    pub fn max_specificity(&self) -> u32 {
        self.specificity().max
    }
}
