//! Largest-remainder rounding with an aggregate-derived reallocation count.

use std::cmp::Ordering;

/// Round a series to `digits` decimal places, preserving its sum.
///
/// Every value is truncated toward negative infinity at the target
/// precision, then the whole units lost to truncation are handed back one
/// each to the records with the largest fractional remainders. The number
/// of units to hand back is derived from the *aggregate* remainder, not
/// from per-record rounding, which is what makes the output sum exactly
/// equal the rounded input sum regardless of per-record float error:
///
/// `sum(round_preserve_sum(v, d)) == round(sum(v), d)`
///
/// Floor-based truncation keeps every remainder in `[0, 1)` for negative
/// values too, so signed series (net migration, net change) round under the
/// same invariant.
///
/// Ties between equal remainders are broken by original record order.
///
/// # Arguments
/// * `values` - Input series; every value must be finite
/// * `digits` - Decimal places to round to
///
/// # Returns
/// Rounded series, aligned with the input order
pub fn round_preserve_sum(values: &[f64], digits: u32) -> Vec<f64> {
    let scale = 10f64.powi(digits as i32);

    let inflated: Vec<f64> = values.iter().map(|v| v * scale).collect();
    let mut rounded: Vec<f64> = inflated.iter().map(|v| v.floor()).collect();

    let lost: f64 = inflated.iter().sum::<f64>() - rounded.iter().sum::<f64>();
    let units = lost.round() as usize;

    if units > 0 {
        let mut order: Vec<usize> = (0..values.len()).collect();
        // Stable sort: among equal remainders, earlier records win
        order.sort_by(|&a, &b| {
            let ra = inflated[a] - rounded[a];
            let rb = inflated[b] - rounded[b];
            rb.partial_cmp(&ra).unwrap_or(Ordering::Equal)
        });
        for &i in order.iter().take(units) {
            rounded[i] += 1.0;
        }
    }

    rounded.iter().map(|v| v / scale).collect()
}
