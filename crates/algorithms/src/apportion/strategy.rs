//! Closed enumerations for the engine's edge-case policies
//!
//! Strategy dispatch happens once per call, not per record, so the
//! redistribution loop stays branch-free.

use serde::{Deserialize, Serialize};

/// How redistributed cell values are summarized per target zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMode {
    /// Redistribute totals: cells weighted by their share of the source
    /// zone, summed per target. The grand total is preserved.
    #[default]
    Sum,
    /// Area-weighted mean: cells weighted by their share of the target
    /// zone, summed per target.
    Mean,
}

/// What to do when a source zone is not (fully) covered by target zones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageStrategy {
    /// Abort before redistributing anything
    #[default]
    Error,
    /// Leave the affected value unapportioned (lost), with a warning
    Ignore,
    /// Compensate: spread a fully uncovered zone's value across all targets
    /// in proportion to their already-apportioned totals, or inflate a
    /// partially covered zone's cells by the reciprocal of its share sum
    Distribute,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(SummaryMode::default(), SummaryMode::Sum);
        assert_eq!(CoverageStrategy::default(), CoverageStrategy::Error);
    }

    #[test]
    fn test_serde_names_are_lowercase() {
        assert_eq!(serde_json::to_string(&SummaryMode::Mean).unwrap(), "\"mean\"");
        assert_eq!(
            serde_json::to_string(&CoverageStrategy::Distribute).unwrap(),
            "\"distribute\""
        );
    }
}
