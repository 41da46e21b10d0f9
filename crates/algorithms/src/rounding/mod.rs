//! Sum-preserving rounding
//!
//! Rounds a series to fixed precision such that the rounded series sums
//! exactly to the rounded sum of the original series ("bucket rounding").

mod preserve_sum;

pub use preserve_sum::round_preserve_sum;
