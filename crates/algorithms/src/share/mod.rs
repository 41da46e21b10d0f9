//! Group shares and control totals
//!
//! A three-stage pipeline over a [`ValueTable`], each stage independently
//! callable and each returning a new table with one derived column appended:
//!
//! - [`group_sum`]: per-record group total (grand total when ungrouped)
//! - [`group_share`]: each record's share of its group total
//! - [`controlled_values`]: shares rescaled against an external control
//!   total, optionally bucket-rounded per group
//!
//! [`control_variable_to_group`] chains all three.
//!
//! [`ValueTable`]: areal_core::ValueTable

mod control;
mod stages;

pub use control::{control_variable_to_group, ControlParams, ControlToGroup};
pub use stages::{controlled_values, group_share, group_sum};
