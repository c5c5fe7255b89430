//! Error types for the pricecast library.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while testing, fitting, or forecasting a series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input series is empty at the pipeline boundary.
    #[error("empty input series")]
    NoData,

    /// Series too short for the requested test or order.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Caller-supplied order is out of its valid range.
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    /// Forecast horizon must be a positive integer.
    #[error("invalid horizon: must be a positive integer")]
    InvalidHorizon,

    /// Zero-variance or otherwise unfittable series.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Optimizer did not converge within its iteration budget.
    #[error("optimizer failed to converge within {iterations} iterations")]
    Convergence { iterations: usize },

    /// Timestamp invariant violated (ordering, duplicates).
    #[error("timestamp error: {0}")]
    Timestamp(String),

    /// Series contains NaN or infinite values.
    #[error("series contains non-finite values")]
    NonFinite,
}
