//! Error types for Areal

use thiserror::Error;

/// Main error type for Areal operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("CRS mismatch: {0} vs {1}")]
    CrsMismatch(String, String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Column already exists: {0}")]
    DuplicateColumn(String),

    #[error("Column length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Zone {id} has a non-polygonal geometry ({kind})")]
    NonPolygonalGeometry { id: String, kind: &'static str },

    #[error("Control total shape mismatch: {0}")]
    ControlShapeMismatch(&'static str),

    #[error("No control total supplied for group {0:?}")]
    MissingControlGroup(String),

    #[error("Source zone {id} is not covered by any target zone")]
    ZeroCoverage { id: String },

    #[error("Source zone {id} is only partially covered (share sum {share_sum})")]
    PartialCoverage { id: String, share_sum: f64 },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Result type alias for Areal operations
pub type Result<T> = std::result::Result<T, Error>;
