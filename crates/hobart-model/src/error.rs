//! Error taxonomy for the VaR engine.
//!
//! Validation errors are raised before any computation begins. Numerical
//! errors carry diagnostic context naming the instrument or step that
//! produced them. A failed backtest is never an error: it is a valid result
//! with `model_accurate = false`.

use thiserror::Error;

/// Errors that can occur during a VaR calculation.
#[derive(Debug, Error)]
pub enum RiskError {
    /// Confidence level outside the supported table (95, 99, 99.9).
    #[error("Unsupported confidence level: {0} (supported: 95, 99, 99.9)")]
    UnsupportedConfidenceLevel(f64),

    /// Time horizon outside the supported table (1D, 1W, 2W, 1M, 3M, 6M, 1Y).
    #[error("Unsupported time horizon: {0}")]
    UnsupportedHorizon(String),

    /// Portfolio has zero or non-finite total market value.
    #[error("Invalid portfolio value: total market value must be non-zero and finite")]
    InvalidPortfolioValue,

    /// Return history too short for the requested calculation.
    #[error("Incomplete market data: need at least {required} observations, got {actual}")]
    IncompleteMarketData {
        /// Required number of observations
        required: usize,
        /// Actual number of observations
        actual: usize,
    },

    /// Position count and return matrix width disagree.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// Numerical failure (non-PSD covariance, degenerate weights, ...).
    #[error("Numerical instability: {context}")]
    NumericalInstability {
        /// Which instrument or step produced the failure
        context: String,
    },

    /// The caller-configured time budget was exceeded; no partial result.
    #[error("Calculation timed out after {budget_ms} ms")]
    CalculationTimeout {
        /// Budget in milliseconds
        budget_ms: u64,
    },

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
