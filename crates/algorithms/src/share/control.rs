//! Composite pipeline: value column straight to controlled values.

use areal_core::{Algorithm, ControlTotal, Error, Result, ValueTable};

use super::stages::{controlled_values, group_share, group_sum};

/// Derive group sums, shares and controlled values in one call.
///
/// Appends `<value_field>_sum`, `<value_field>_share` and
/// `<value_field>_controlled`. See the stage functions for the individual
/// contracts; the control-total shape check happens before any column is
/// derived, so a mismatch never returns a partially derived table.
pub fn control_variable_to_group(
    table: &ValueTable,
    control: &ControlTotal,
    value_field: &str,
    group_field: Option<&str>,
    round_digits: Option<u32>,
) -> Result<ValueTable> {
    match (control.is_scalar(), group_field) {
        (true, Some(_)) => {
            return Err(Error::ControlShapeMismatch(
                "grouped records require a per-group control total, got a scalar",
            ))
        }
        (false, None) => {
            return Err(Error::ControlShapeMismatch(
                "ungrouped records require a scalar control total, got a per-group mapping",
            ))
        }
        _ => {}
    }

    let summed = group_sum(table, value_field, group_field)?;
    let shared = group_share(&summed, value_field, &format!("{value_field}_sum"))?;
    controlled_values(
        &shared,
        control,
        &format!("{value_field}_share"),
        group_field,
        round_digits,
    )
}

/// Parameters for [`ControlToGroup`]
#[derive(Debug, Clone)]
pub struct ControlParams {
    /// External control total(s)
    pub control: ControlTotal,
    /// Numeric column to control
    pub value_field: String,
    /// Optional label column partitioning the records
    pub group_field: Option<String>,
    /// Optional sum-preserving rounding precision
    pub round_digits: Option<u32>,
}

impl Default for ControlParams {
    fn default() -> Self {
        Self {
            control: ControlTotal::Scalar(0.0),
            value_field: "value".to_string(),
            group_field: None,
            round_digits: None,
        }
    }
}

/// Control-total scaling as an [`Algorithm`]
#[derive(Debug, Clone, Default)]
pub struct ControlToGroup;

impl Algorithm for ControlToGroup {
    type Input = ValueTable;
    type Output = ValueTable;
    type Params = ControlParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "ControlToGroup"
    }

    fn description(&self) -> &'static str {
        "Rescale a value column to match external control totals, by group"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        control_variable_to_group(
            &input,
            &params.control,
            &params.value_field,
            params.group_field.as_deref(),
            params.round_digits,
        )
    }
}
