//! The reapportionment engine
//!
//! Redistributes attribute values from a source zone layer onto a target
//! zone layer in proportion to intersection areas. Coverage is validated
//! between the overlay and the redistribution, so a fatal condition aborts
//! before any value moves: the call either returns a fully redistributed
//! layer or an error, never a partial result.

use tracing::{debug, warn};

use areal_core::{Algorithm, Error, Result, ZoneLayer};

use super::diagnostics::QualityWarning;
use super::overlay::{overlay, IntersectionCell};
use super::strategy::{CoverageStrategy, SummaryMode};
use crate::rounding::round_preserve_sum;

/// Parameters for [`apportion_by_area`]
#[derive(Debug, Clone)]
pub struct ApportionParams {
    /// Source attribute columns to redistribute
    pub columns: Vec<String>,
    /// Redistribute totals, or compute area-weighted means
    pub summary: SummaryMode,
    /// Sum-preserving rounding precision for the per-target results
    /// (totals only; not applicable to means)
    pub round_preserve_sum: Option<u32>,
    /// Policy for source zones only partially covered by targets
    pub partial_coverage: CoverageStrategy,
    /// Policy for source zones with no overlapping target at all
    pub zero_coverage: CoverageStrategy,
    /// Decimal places at which a source share sum is compared to 1;
    /// `None` requires exact equality
    pub source_share_tolerance: Option<u32>,
    /// Decimal places at which a target share sum is compared to 1;
    /// `None` requires exact equality
    pub target_share_tolerance: Option<u32>,
    /// Return the intersection cells for auditing
    pub keep_cells: bool,
}

impl Default for ApportionParams {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            summary: SummaryMode::Sum,
            round_preserve_sum: None,
            partial_coverage: CoverageStrategy::Error,
            zero_coverage: CoverageStrategy::Error,
            source_share_tolerance: Some(6),
            target_share_tolerance: Some(6),
            keep_cells: false,
        }
    }
}

/// Result of [`apportion_by_area`]
#[derive(Debug, Clone)]
pub struct ApportionOutput {
    /// The target layer with apportioned columns appended, original
    /// attributes and column order preserved
    pub targets: ZoneLayer,
    /// Intersection cells, when requested via `keep_cells`
    pub cells: Option<Vec<IntersectionCell>>,
    /// Non-fatal data-quality findings, in detection order
    pub warnings: Vec<QualityWarning>,
}

fn round_tol(x: f64, digits: Option<u32>) -> f64 {
    match digits {
        Some(d) => {
            let scale = 10f64.powi(d as i32);
            (x * scale).round() / scale
        }
        None => x,
    }
}

/// Redistribute source attribute values onto a target layer by intersection
/// area.
///
/// Pipeline: CRS and parameter checks, overlay, coverage validation (zero
/// coverage, then partial coverage, then target coverage), redistribution,
/// optional sum-preserving rounding, recombination.
///
/// With `SummaryMode::Sum` each cell receives `source value × source
/// share`; cells are summed per target, so the grand total is preserved up
/// to coverage losses the caller opted into. With `SummaryMode::Mean` each
/// cell receives `source value × target share`, yielding the area-weighted
/// mean per target; the `Distribute` compensations and sum-preserving
/// rounding do not apply to means.
///
/// # Arguments
/// * `targets` - Layer receiving values; must share the sources' CRS
/// * `sources` - Layer contributing values
/// * `params` - Columns, summary mode, edge-case policies
///
/// # Returns
/// Updated target layer, optional cell audit table, quality warnings
pub fn apportion_by_area(
    targets: &ZoneLayer,
    sources: &ZoneLayer,
    params: &ApportionParams,
) -> Result<ApportionOutput> {
    if !targets.crs().is_equivalent(sources.crs()) {
        return Err(Error::CrsMismatch(
            sources.crs().identifier(),
            targets.crs().identifier(),
        ));
    }
    if params.columns.is_empty() {
        return Err(Error::InvalidParameter {
            name: "columns",
            value: "[]".to_string(),
            reason: "at least one apportion column is required".to_string(),
        });
    }
    for column in &params.columns {
        if !sources.has_column(column) {
            return Err(Error::UnknownColumn(column.clone()));
        }
        if targets.has_column(column) {
            return Err(Error::DuplicateColumn(column.clone()));
        }
    }
    let sum_mode = params.summary == SummaryMode::Sum;
    if !sum_mode && params.round_preserve_sum.is_some() {
        return Err(Error::InvalidParameter {
            name: "round_preserve_sum",
            value: format!("{:?}", params.round_preserve_sum),
            reason: "sum-preserving rounding does not apply to area-weighted means".to_string(),
        });
    }

    let cells = overlay(sources, targets)?;

    let mut source_share_sums = vec![0.0f64; sources.len()];
    let mut source_cell_counts = vec![0usize; sources.len()];
    let mut target_share_sums = vec![0.0f64; targets.len()];
    for cell in &cells {
        source_share_sums[cell.source_index] += cell.source_share;
        source_cell_counts[cell.source_index] += 1;
        target_share_sums[cell.target_index] += cell.target_share;
    }

    let mut warnings = Vec::new();

    // Zero coverage: sources no target touches at all
    let uncovered: Vec<usize> = (0..sources.len())
        .filter(|&si| source_cell_counts[si] == 0)
        .collect();
    let distribute_zero = sum_mode && params.zero_coverage == CoverageStrategy::Distribute;
    if !uncovered.is_empty() {
        match params.zero_coverage {
            CoverageStrategy::Error => {
                return Err(Error::ZeroCoverage {
                    id: sources.zones()[uncovered[0]].id.clone(),
                })
            }
            CoverageStrategy::Distribute if distribute_zero => {
                debug!(
                    "distributing {} uncovered source zone(s) across the target totals",
                    uncovered.len()
                );
            }
            _ => {
                for &si in &uncovered {
                    let w = QualityWarning::UnapportionedSource {
                        id: sources.zones()[si].id.clone(),
                    };
                    warn!("{}", w);
                    warnings.push(w);
                }
            }
        }
    }

    // Partial coverage and overlap, per covered source
    let mut scale = vec![1.0f64; sources.len()];
    let distribute_partial = sum_mode && params.partial_coverage == CoverageStrategy::Distribute;
    for si in 0..sources.len() {
        if source_cell_counts[si] == 0 {
            continue;
        }
        let share_sum = source_share_sums[si];
        let compared = round_tol(share_sum, params.source_share_tolerance);
        if compared > 1.0 {
            // Overlapping zones in one of the layers; flagged, never corrected
            let w = QualityWarning::SourceOverlap {
                id: sources.zones()[si].id.clone(),
                share_sum,
            };
            warn!("{}", w);
            warnings.push(w);
        } else if compared < 1.0 {
            match params.partial_coverage {
                CoverageStrategy::Error => {
                    return Err(Error::PartialCoverage {
                        id: sources.zones()[si].id.clone(),
                        share_sum,
                    })
                }
                CoverageStrategy::Distribute if distribute_partial => {
                    // Inflate this source's cells to compensate for the
                    // uncovered remainder
                    scale[si] = 1.0 / share_sum;
                    debug!(
                        "inflating source zone {} by 1/{} to cover its remainder",
                        sources.zones()[si].id, share_sum
                    );
                }
                _ => {
                    let w = QualityWarning::PartialSourceCoverage {
                        id: sources.zones()[si].id.clone(),
                        share_sum,
                    };
                    warn!("{}", w);
                    warnings.push(w);
                }
            }
        }
    }

    // Target coverage is a data-quality signal, never fatal
    for (ti, zone) in targets.iter().enumerate() {
        let share_sum = target_share_sums[ti];
        if round_tol(share_sum, params.target_share_tolerance) != 1.0 {
            let w = QualityWarning::TargetCoverageGap {
                id: zone.id.clone(),
                share_sum,
            };
            warn!("{}", w);
            warnings.push(w);
        }
    }

    // Redistribution; validation is complete, nothing can fail from here on
    // except recombination length/name checks
    let mut appended: Vec<(String, Vec<f64>)> = Vec::with_capacity(params.columns.len());
    for column in &params.columns {
        let source_values: Vec<f64> = sources.iter().map(|z| z.value(column)).collect();
        let mut totals = vec![0.0f64; targets.len()];

        if sum_mode {
            for cell in &cells {
                totals[cell.target_index] +=
                    source_values[cell.source_index] * cell.source_share * scale[cell.source_index];
            }
        } else {
            for cell in &cells {
                totals[cell.target_index] +=
                    source_values[cell.source_index] * cell.target_share;
            }
        }

        if distribute_zero && !uncovered.is_empty() {
            // Spread each uncovered source's value across all targets in
            // proportion to the totals apportioned from covered sources,
            // preserving the column's relative distribution
            let base = totals.clone();
            let grand: f64 = base.iter().sum();
            for &si in &uncovered {
                let value = source_values[si];
                if value == 0.0 {
                    continue;
                }
                if grand == 0.0 {
                    let w = QualityWarning::UndistributableValue {
                        id: sources.zones()[si].id.clone(),
                        column: column.clone(),
                    };
                    warn!("{}", w);
                    warnings.push(w);
                    continue;
                }
                for (total, b) in totals.iter_mut().zip(&base) {
                    *total += value * (b / grand);
                }
            }
        }

        let totals = match params.round_preserve_sum {
            Some(digits) if sum_mode => round_preserve_sum(&totals, digits),
            _ => totals,
        };
        appended.push((column.clone(), totals));
    }

    let mut updated = targets.clone();
    for (name, values) in appended {
        updated = updated.with_numeric_column(name, values)?;
    }

    Ok(ApportionOutput {
        targets: updated,
        cells: params.keep_cells.then_some(cells),
        warnings,
    })
}

/// Area-weighted reapportionment as an [`Algorithm`].
///
/// Input is `(targets, sources)`.
#[derive(Debug, Clone, Default)]
pub struct ApportionByArea;

impl Algorithm for ApportionByArea {
    type Input = (ZoneLayer, ZoneLayer);
    type Output = ApportionOutput;
    type Params = ApportionParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "ApportionByArea"
    }

    fn description(&self) -> &'static str {
        "Redistribute attribute values between polygon partitions by intersection area"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        apportion_by_area(&input.0, &input.1, &params)
    }
}
