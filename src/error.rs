//! Error kinds surfaced by the analytical engine.

use thiserror::Error;

/// Fatal problems while reading the results sheet. Nothing is derived from a
/// source that fails to load.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column: {column}")]
    MissingColumn { column: String },

    #[error("row {row}, column '{column}': expected a count between 0 and 1000000, got {value:?}")]
    InvalidCount {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: unknown district {value:?} (expected MOYO or ADJUMANI)")]
    UnknownDistrict { row: usize, value: String },
}

/// A centre where every candidate was absent has no examined denominator, so
/// its rate metrics are undefined. Recovered locally at derivation time: the
/// record keeps `None` rates and rate aggregates skip it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("all {total} candidates were absent; rate metrics are undefined")]
pub struct UndefinedRateError {
    pub total: u32,
}

/// Correlation over fewer than two usable observations has no defined
/// coefficient. Surfaced to the caller instead of a silent 0 or NaN.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("correlation needs at least {required} records with defined values, got {found}")]
pub struct InsufficientDataError {
    pub required: usize,
    pub found: usize,
}
