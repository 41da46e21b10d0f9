//! Area-weighted reapportionment between two polygon partitions
//!
//! Values originate on a source layer and are redistributed onto a target
//! layer in proportion to the areas of the pairwise geometric intersections:
//!
//! - [`overlay`]: intersect every source/target pair into cells carrying
//!   both area shares
//! - [`apportion_by_area`]: validate coverage, dispatch the configured
//!   edge-case strategies and redistribute attribute columns
//! - [`coverage_summary`]: audit-side share-sum report per source/target

mod diagnostics;
mod engine;
mod overlay;
mod strategy;

pub use diagnostics::{coverage_summary, CoverageSummary, QualityWarning};
pub use engine::{apportion_by_area, ApportionByArea, ApportionOutput, ApportionParams};
pub use overlay::{overlay, IntersectionCell};
pub use strategy::{CoverageStrategy, SummaryMode};
