//! # Areal Core
//!
//! Core types for the Areal geographic-statistics toolkit.
//!
//! This crate provides:
//! - `ValueTable`: Ordered record table with numeric and label columns
//! - `ControlTotal`: Externally authoritative totals, scalar or per-group
//! - `Zone` / `ZoneLayer`: Polygon features carrying numeric attributes
//! - `CRS`: Coordinate Reference System handling
//! - Algorithm trait for a consistent API

pub mod crs;
pub mod error;
pub mod table;
pub mod vector;

pub use crs::CRS;
pub use error::{Error, Result};
pub use table::{ControlTotal, ValueTable};
pub use vector::{Zone, ZoneLayer};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::CRS;
    pub use crate::error::{Error, Result};
    pub use crate::table::{ControlTotal, ValueTable};
    pub use crate::vector::{Zone, ZoneLayer};
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in Areal.
///
/// Algorithms are pure functions that transform input data according to
/// parameters; inputs are never mutated.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
