//! # Areal Algorithms
//!
//! Invariant-preserving value reapportionment for geographic statistics.
//!
//! ## Available Algorithm Categories
//!
//! - **rounding**: Sum-preserving ("bucket") rounding to fixed precision
//! - **share**: Group sums, group shares, control-total scaling
//! - **apportion**: Area-weighted reapportionment between polygon partitions
//! - **measure**: Geometric measurements on zone geometries

pub mod apportion;
pub mod measure;
pub mod rounding;
pub mod share;

pub(crate) mod maybe_rayon;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::apportion::{
        apportion_by_area, ApportionByArea, ApportionOutput, ApportionParams,
        CoverageStrategy, IntersectionCell, QualityWarning, SummaryMode,
    };
    pub use crate::rounding::round_preserve_sum;
    pub use crate::share::{
        control_variable_to_group, controlled_values, group_share, group_sum,
        ControlParams, ControlToGroup,
    };
    pub use areal_core::prelude::*;
}
