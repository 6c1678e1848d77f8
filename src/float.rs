use std::fmt::{Debug, Display};

use num_traits::Float as NumFloat;

/// Marker trait for base floating-point types (`f32`, `f64`).
///
/// Bundles the numeric and utility traits the recorder and the sweep
/// drivers need. Only primitive float types implement this — tapes carry
/// plain reals, never AD wrapper types.
pub trait Float:
    NumFloat + Copy + Send + Sync + Default + Debug + Display + 'static
{
}

impl Float for f32 {}
impl Float for f64 {}
