//! Data-quality findings and audit summaries
//!
//! Findings here are non-fatal: the engine reports them and proceeds.
//! Conditions that abort the computation live in `areal_core::Error`.

use std::fmt;

use serde::Serialize;

use areal_core::ZoneLayer;

use super::overlay::IntersectionCell;

/// A non-fatal data-quality finding raised during apportionment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum QualityWarning {
    /// A source zone's shares sum above 1: zones overlap in one of the
    /// two layers. Never auto-corrected.
    SourceOverlap { id: String, share_sum: f64 },
    /// A source zone's shares sum below 1 and the configured strategy
    /// left the shortfall uncompensated
    PartialSourceCoverage { id: String, share_sum: f64 },
    /// A source zone with no overlapping target; its value was dropped
    UnapportionedSource { id: String },
    /// Distribution was requested for an uncovered zone, but every target
    /// total for the column is zero, so there is no distribution to follow
    UndistributableValue { id: String, column: String },
    /// A target zone's shares do not sum to 1: it is not fully covered by
    /// source zones (or source zones overlap it more than once)
    TargetCoverageGap { id: String, share_sum: f64 },
}

impl fmt::Display for QualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityWarning::SourceOverlap { id, share_sum } => {
                write!(f, "source zone {id}: share sum {share_sum} exceeds 1, overlapping zones")
            }
            QualityWarning::PartialSourceCoverage { id, share_sum } => {
                write!(f, "source zone {id}: only {share_sum} of its area is covered by targets")
            }
            QualityWarning::UnapportionedSource { id } => {
                write!(f, "source zone {id}: no overlapping target, value not apportioned")
            }
            QualityWarning::UndistributableValue { id, column } => {
                write!(f, "source zone {id}: column {column} has no target distribution to follow")
            }
            QualityWarning::TargetCoverageGap { id, share_sum } => {
                write!(f, "target zone {id}: share sum {share_sum}, not fully covered by sources")
            }
        }
    }
}

/// Share-sum summary for one zone, from the audit side of the overlay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageSummary {
    /// Zone identifier
    pub id: String,
    /// Number of intersection cells the zone participates in
    pub cells: usize,
    /// Sum of the zone's shares across those cells
    pub share_sum: f64,
}

/// Per-source and per-target share sums for a computed cell set.
///
/// A fully covered, non-overlapped zone sums to 1; zones with no cells
/// appear with a share sum of 0.
///
/// # Returns
/// `(source summaries, target summaries)`, each in layer order
pub fn coverage_summary(
    cells: &[IntersectionCell],
    sources: &ZoneLayer,
    targets: &ZoneLayer,
) -> (Vec<CoverageSummary>, Vec<CoverageSummary>) {
    let mut source_sums = vec![(0usize, 0.0f64); sources.len()];
    let mut target_sums = vec![(0usize, 0.0f64); targets.len()];

    for cell in cells {
        source_sums[cell.source_index].0 += 1;
        source_sums[cell.source_index].1 += cell.source_share;
        target_sums[cell.target_index].0 += 1;
        target_sums[cell.target_index].1 += cell.target_share;
    }

    let summarize = |layer: &ZoneLayer, sums: Vec<(usize, f64)>| {
        layer
            .iter()
            .zip(sums)
            .map(|(zone, (cells, share_sum))| CoverageSummary {
                id: zone.id.clone(),
                cells,
                share_sum,
            })
            .collect()
    };

    (summarize(sources, source_sums), summarize(targets, target_sums))
}
