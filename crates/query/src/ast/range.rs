//! Exclusive ranges.

use core::ops::{Add, Sub};

/// Milliseconds in one day, the usual margin for widening a date range.
pub const ONE_DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// An exclusive range: matches values strictly between `lower` and `upper`.
///
/// Callers that need inclusive bounds widen them first, e.g. with
/// [`Range::around`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Range<T> {
    pub lower: T,
    pub upper: T,
}

impl<T> Range<T> {
    pub const fn new(lower: T, upper: T) -> Self {
        Self { lower, upper }
    }
}

impl<T: Copy> Range<T> {
    /// The range `(centre - margin, centre + margin)`.
    pub fn around<M: Copy>(centre: T, margin: M) -> Self
    where
        T: Add<M, Output = T> + Sub<M, Output = T>,
    {
        Self {
            lower: centre - margin,
            upper: centre + margin,
        }
    }
}

impl<T: PartialOrd> Range<T> {
    /// Returns true if `value` lies strictly inside the range.
    pub fn contains(&self, value: &T) -> bool {
        *value > self.lower && *value < self.upper
    }
}
