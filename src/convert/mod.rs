//! Frequency scale conversions (Hz, Mel, FFT bins).
//!
//! Every conversion exists as a scalar function and as an element-wise
//! array function over any `ndarray` dimensionality.

mod frequency;
mod scales;

pub use frequency::*;
pub use scales::*;
