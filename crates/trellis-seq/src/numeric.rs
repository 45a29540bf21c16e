#![forbid(unsafe_code)]

//! Zero-argument aggregates for sequences of numbers.
//!
//! [`NumericSequence`] is `Sequence<f64>`; the aggregate operators here work
//! directly on the elements, where the generic forms
//! ([`sum_by`](Sequence::sum_by) and friends) require a selector.

use crate::sequence::Sequence;

/// A sequence of numbers.
pub type NumericSequence = Sequence<f64>;

impl Sequence<f64> {
    /// Materializes `source` into a numeric sequence.
    pub fn numeric(source: impl IntoIterator<Item = f64>) -> NumericSequence {
        Sequence::new(source)
    }

    /// Sum of the elements; `0.0` for an empty sequence.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.sum_by(|n| *n)
    }

    /// Arithmetic mean of the elements.
    ///
    /// An empty sequence yields `NaN` (division by zero), not an error.
    #[must_use]
    pub fn average(&self) -> f64 {
        self.average_by(|n| *n)
    }

    /// Smallest element; `+inf` for an empty sequence.
    #[must_use]
    pub fn minimum(&self) -> f64 {
        self.minimum_by(|n| *n)
    }

    /// Largest element; `-inf` for an empty sequence.
    #[must_use]
    pub fn maximum(&self) -> f64 {
        self.maximum_by(|n| *n)
    }
}
