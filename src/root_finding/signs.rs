//! Sign utilities for the bracket update.
//! - [`Sign`]          : three-way classification, zero is its own class
//! - `same_sign`      : `true` if both values are strictly positive or strictly negative
//!
//! `-0.0` classifies as [`Sign::Zero`], so the sign bit of a rounded zero never
//! decides which endpoint is replaced.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

impl Sign {
    /// NaN has no sign; it is classified as [`Sign::Zero`]. Engine values are
    /// checked for finiteness before they reach a sign comparison.
    #[inline]
    pub fn of(x: f64) -> Self {
        if x > 0.0 {
            Sign::Positive
        } else if x < 0.0 {
            Sign::Negative
        } else {
            Sign::Zero
        }
    }
}


/// Returns `true` if `x` and `y` are both strictly positive or both strictly negative.
#[inline]
pub(crate) fn same_sign(x: f64, y: f64) -> bool {
    let (sx, sy) = (Sign::of(x), Sign::of(y));
    sx == sy && sx != Sign::Zero
}
