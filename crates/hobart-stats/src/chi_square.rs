//! Chi-square CDF for backtest p-values.
//!
//! The Kupiec statistic is chi-square with 1 degree of freedom and the
//! Christoffersen conditional-coverage statistic with 2; both tests report
//! `P(chi2_df > LR)` alongside the critical-value comparison.

use hobart_model::RiskError;
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// `P(X <= x)` for a chi-square distribution with `degrees_of_freedom` df.
///
/// # Errors
/// `InvalidParameter` for non-positive degrees of freedom or negative `x`.
pub fn chi_square_cdf(x: f64, degrees_of_freedom: f64) -> Result<f64, RiskError> {
    if x < 0.0 || !x.is_finite() {
        return Err(RiskError::InvalidParameter(format!(
            "chi-square CDF requires finite x >= 0, got {x}"
        )));
    }
    let dist = ChiSquared::new(degrees_of_freedom).map_err(|_| {
        RiskError::InvalidParameter(format!(
            "chi-square degrees of freedom must be positive, got {degrees_of_freedom}"
        ))
    })?;
    Ok(dist.cdf(x))
}
