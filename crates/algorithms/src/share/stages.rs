//! The three pipeline stages: group sums, group shares, controlled values.

use std::collections::HashMap;

use areal_core::{ControlTotal, Error, Result, ValueTable};

use crate::maybe_rayon::*;
use crate::rounding::round_preserve_sum;

/// Resolve each record's group label. `None` means one implicit group
/// containing every record, represented by the empty label.
fn record_groups<'a>(table: &'a ValueTable, group_field: Option<&str>) -> Result<Vec<&'a str>> {
    match group_field {
        Some(field) => Ok(table.label(field)?.iter().map(String::as_str).collect()),
        None => Ok(vec![""; table.len()]),
    }
}

/// Group memberships as (label, record indices), in first-appearance order.
///
/// First-appearance order keeps derived columns deterministic; HashMap
/// iteration order would not.
fn group_members<'a>(groups: &[&'a str]) -> Vec<(&'a str, Vec<usize>)> {
    let mut members: Vec<(&str, Vec<usize>)> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();

    for (i, g) in groups.iter().enumerate() {
        let at = *slot.entry(g).or_insert_with(|| {
            members.push((g, Vec::new()));
            members.len() - 1
        });
        members[at].1.push(i);
    }
    members
}

/// Append each record's group total as `<value_field>_sum`.
///
/// With `group_field = None` every record receives the grand total.
///
/// # Arguments
/// * `table` - Input records
/// * `value_field` - Numeric column to total
/// * `group_field` - Optional label column partitioning the records
///
/// # Returns
/// New table with the totals column appended
pub fn group_sum(table: &ValueTable, value_field: &str, group_field: Option<&str>) -> Result<ValueTable> {
    let values = table.numeric(value_field)?;
    let groups = record_groups(table, group_field)?;

    let mut totals: HashMap<&str, f64> = HashMap::new();
    for (g, v) in groups.iter().zip(values) {
        *totals.entry(g).or_insert(0.0) += v;
    }

    let column: Vec<f64> = groups.iter().map(|g| totals[g]).collect();
    table.with_numeric(format!("{value_field}_sum"), column)
}

/// Append each record's share of its group total as `<value_field>_share`.
///
/// A group total of zero yields a share of zero, never NaN.
///
/// # Arguments
/// * `table` - Input records
/// * `value_field` - Numeric column holding the raw values
/// * `sum_field` - Numeric column holding the group totals
///
/// # Returns
/// New table with the shares column appended
pub fn group_share(table: &ValueTable, value_field: &str, sum_field: &str) -> Result<ValueTable> {
    let values = table.numeric(value_field)?;
    let sums = table.numeric(sum_field)?;

    let column: Vec<f64> = values
        .iter()
        .zip(sums)
        .map(|(v, s)| if *s == 0.0 { 0.0 } else { v / s })
        .collect();
    table.with_numeric(format!("{value_field}_share"), column)
}

/// Rescale shares against a control total, appending `<stem>_controlled`
/// (where `stem` is `share_field` with a trailing `_share` stripped).
///
/// The control total shape must match the grouping mode: a scalar for an
/// ungrouped table, a per-group mapping when `group_field` is given.
/// Anything else fails fast; the mismatch is never silently coerced.
///
/// With `round_digits = Some(d)` each group is sum-preserving-rounded
/// independently, so a group's rounded values sum exactly to its own
/// control total rather than to the grand total.
///
/// # Arguments
/// * `table` - Input records
/// * `control` - External control total(s)
/// * `share_field` - Numeric column holding group shares
/// * `group_field` - Optional label column partitioning the records
/// * `round_digits` - Optional sum-preserving rounding precision
///
/// # Returns
/// New table with the controlled-values column appended
pub fn controlled_values(
    table: &ValueTable,
    control: &ControlTotal,
    share_field: &str,
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

    let shares = table.numeric(share_field)?;
    let groups = record_groups(table, group_field)?;
    let members = group_members(&groups);

    // Every group must have a control entry before any math runs
    let controls: Vec<f64> = members
        .iter()
        .map(|(g, _)| control.for_group(g))
        .collect::<Result<_>>()?;

    let scaled: Vec<(Vec<usize>, Vec<f64>)> = members
        .into_par_iter()
        .zip(controls)
        .map(|((_, indices), total)| {
            let mut values: Vec<f64> = indices.iter().map(|&i| shares[i] * total).collect();
            if let Some(digits) = round_digits {
                values = round_preserve_sum(&values, digits);
            }
            (indices, values)
        })
        .collect();

    let mut column = vec![0.0; table.len()];
    for (indices, values) in scaled {
        for (i, v) in indices.into_iter().zip(values) {
            column[i] = v;
        }
    }

    let stem = share_field.strip_suffix("_share").unwrap_or(share_field);
    table.with_numeric(format!("{stem}_controlled"), column)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grouped_table() -> ValueTable {
        let ids = vec!["r0", "r1", "r2", "r3"].into_iter().map(String::from).collect();
        ValueTable::new(ids)
            .with_numeric("pop", vec![10.0, 20.0, 30.0, 40.0])
            .unwrap()
            .with_label(
                "county",
                vec!["a", "a", "b", "b"].into_iter().map(String::from).collect(),
            )
            .unwrap()
    }

    fn per_group(entries: &[(&str, f64)]) -> ControlTotal {
        ControlTotal::PerGroup(entries.iter().map(|(k, v)| (k.to_string(), *v)).collect())
    }

    #[test]
    fn test_group_sum_grouped() {
        let out = group_sum(&grouped_table(), "pop", Some("county")).unwrap();
        assert_eq!(out.numeric("pop_sum").unwrap(), &[30.0, 30.0, 70.0, 70.0]);
    }

    #[test]
    fn test_group_sum_grand_total() {
        let out = group_sum(&grouped_table(), "pop", None).unwrap();
        assert_eq!(out.numeric("pop_sum").unwrap(), &[100.0; 4]);
    }

    #[test]
    fn test_group_share_sums_to_one() {
        let out = group_sum(&grouped_table(), "pop", Some("county")).unwrap();
        let out = group_share(&out, "pop", "pop_sum").unwrap();
        let shares = out.numeric("pop_share").unwrap();

        let a: f64 = shares[0] + shares[1];
        let b: f64 = shares[2] + shares[3];
        assert!((a - 1.0).abs() < 1e-9);
        assert!((b - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_group_share_zero_total_is_zero() {
        let ids = vec!["r0".to_string(), "r1".to_string()];
        let table = ValueTable::new(ids)
            .with_numeric("pop", vec![0.0, 0.0])
            .unwrap()
            .with_numeric("pop_sum", vec![0.0, 0.0])
            .unwrap();

        let out = group_share(&table, "pop", "pop_sum").unwrap();
        assert_eq!(out.numeric("pop_share").unwrap(), &[0.0, 0.0]);
    }

    #[test]
    fn test_controlled_values_fidelity() {
        let out = group_sum(&grouped_table(), "pop", Some("county")).unwrap();
        let out = group_share(&out, "pop", "pop_sum").unwrap();
        let control = per_group(&[("a", 60.0), ("b", 140.0)]);
        let out = controlled_values(&out, &control, "pop_share", Some("county"), None).unwrap();

        let controlled = out.numeric("pop_controlled").unwrap();
        assert!((controlled[0] + controlled[1] - 60.0).abs() < 1e-9);
        assert!((controlled[2] + controlled[3] - 140.0).abs() < 1e-9);
    }

    #[test]
    fn test_controlled_values_rounded_per_group() {
        let ids = (0..6).map(|i| format!("r{}", i)).collect();
        let table = ValueTable::new(ids)
            .with_numeric("pop", vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0])
            .unwrap()
            .with_label(
                "county",
                vec!["a", "a", "a", "b", "b", "b"].into_iter().map(String::from).collect(),
            )
            .unwrap();

        let out = group_sum(&table, "pop", Some("county")).unwrap();
        let out = group_share(&out, "pop", "pop_sum").unwrap();
        let control = per_group(&[("a", 100.0), ("b", 50.0)]);
        let out = controlled_values(&out, &control, "pop_share", Some("county"), Some(0)).unwrap();

        let controlled = out.numeric("pop_controlled").unwrap();
        // Each group's rounded values sum exactly to its own control total
        assert_eq!(controlled[..3].iter().sum::<f64>(), 100.0);
        assert_eq!(controlled[3..].iter().sum::<f64>(), 50.0);
        for v in controlled {
            assert_eq!(v.fract(), 0.0);
        }
    }

    #[test]
    fn test_scalar_control_ungrouped() {
        let ids = vec!["r0".to_string(), "r1".to_string()];
        let table = ValueTable::new(ids)
            .with_numeric("jobs", vec![1.0, 3.0])
            .unwrap();
        let out = group_sum(&table, "jobs", None).unwrap();
        let out = group_share(&out, "jobs", "jobs_sum").unwrap();
        let out = controlled_values(&out, &ControlTotal::Scalar(200.0), "jobs_share", None, None).unwrap();

        assert_eq!(out.numeric("jobs_controlled").unwrap(), &[50.0, 150.0]);
    }

    #[test]
    fn test_control_shape_mismatch_fails_fast() {
        let out = group_sum(&grouped_table(), "pop", Some("county")).unwrap();
        let out = group_share(&out, "pop", "pop_sum").unwrap();

        let err = controlled_values(&out, &ControlTotal::Scalar(1.0), "pop_share", Some("county"), None)
            .unwrap_err();
        assert!(matches!(err, Error::ControlShapeMismatch(_)));

        let err = controlled_values(&out, &per_group(&[("a", 1.0)]), "pop_share", None, None).unwrap_err();
        assert!(matches!(err, Error::ControlShapeMismatch(_)));
    }

    #[test]
    fn test_missing_control_group_fails_fast() {
        let out = group_sum(&grouped_table(), "pop", Some("county")).unwrap();
        let out = group_share(&out, "pop", "pop_sum").unwrap();

        let err = controlled_values(&out, &per_group(&[("a", 60.0)]), "pop_share", Some("county"), None)
            .unwrap_err();
        assert!(matches!(err, Error::MissingControlGroup(g) if g == "b"));
    }
}
