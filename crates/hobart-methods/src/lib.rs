#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod historical;
pub mod monte_carlo;
pub mod parametric;

// Re-export main types
pub use historical::HistoricalSimulationCalculator;
pub use monte_carlo::{MonteCarloCalculator, MonteCarloConfig};
pub use parametric::ParametricCalculator;

use hobart_model::{BaseVar, ReturnMatrix, RiskError, VarMethod, VarParams};

/// Shared contract of the three methodology calculators.
///
/// `base_var` must be a pure function of its inputs (Monte Carlo given a
/// fixed seed), which is what lets the decomposition engine re-evaluate
/// sub-portfolios with identical randomness.
pub trait VarCalculator: Send + Sync {
    /// The methodology this calculator implements.
    fn method(&self) -> VarMethod;

    /// Compute total VaR, undiversified VaR and the diversification benefit
    /// for the given position values and aligned return history.
    fn base_var(
        &self,
        values: &[f64],
        returns: &ReturnMatrix,
        params: &VarParams,
    ) -> Result<BaseVar, RiskError>;
}

/// Build the calculator for a method, using the given Monte Carlo
/// configuration when the method needs one.
pub fn calculator_for(
    method: VarMethod,
    monte_carlo: MonteCarloConfig,
) -> Box<dyn VarCalculator> {
    match method {
        VarMethod::Parametric => Box::new(ParametricCalculator),
        VarMethod::HistoricalSimulation => Box::new(HistoricalSimulationCalculator),
        VarMethod::MonteCarlo => Box::new(MonteCarloCalculator::new(monte_carlo)),
    }
}

/// Value weights and total portfolio value, validated.
///
/// # Errors
/// `DimensionMismatch` when position count and matrix width disagree;
/// `InvalidPortfolioValue` when the net market value is zero or non-finite
/// (weight normalization would divide by zero).
pub(crate) fn portfolio_weights(
    values: &[f64],
    returns: &ReturnMatrix,
) -> Result<(Vec<f64>, f64), RiskError> {
    if values.len() != returns.n_instruments() {
        return Err(RiskError::DimensionMismatch {
            expected: returns.n_instruments(),
            actual: values.len(),
        });
    }
    let total: f64 = values.iter().sum();
    if total == 0.0 || !total.is_finite() {
        return Err(RiskError::InvalidPortfolioValue);
    }
    let weights = values.iter().map(|v| v / total).collect();
    Ok((weights, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn two_asset_returns() -> ReturnMatrix {
        let data = Array2::from_shape_fn((40, 2), |(t, j)| {
            0.01 * ((t + j) as f64 * 0.7).sin()
        });
        ReturnMatrix::new(data, vec!["A".to_string(), "B".to_string()]).unwrap()
    }

    #[test]
    fn test_zero_value_portfolio_rejected() {
        let returns = two_asset_returns();
        let err = portfolio_weights(&[100.0, -100.0], &returns).unwrap_err();
        assert!(matches!(err, RiskError::InvalidPortfolioValue));
    }

    #[test]
    fn test_position_count_must_match_matrix() {
        let returns = two_asset_returns();
        let err = portfolio_weights(&[100.0], &returns).unwrap_err();
        assert!(matches!(err, RiskError::DimensionMismatch { expected: 2, actual: 1 }));
    }

    #[test]
    fn test_weights_sum_to_one() {
        let returns = two_asset_returns();
        let (weights, total) = portfolio_weights(&[300_000.0, 100_000.0], &returns).unwrap();
        assert_eq!(total, 400_000.0);
        assert_eq!(weights, vec![0.75, 0.25]);
    }

    #[test]
    fn test_dispatch_covers_all_methods() {
        for method in [
            VarMethod::Parametric,
            VarMethod::HistoricalSimulation,
            VarMethod::MonteCarlo,
        ] {
            let calculator = calculator_for(method, MonteCarloConfig::default());
            assert_eq!(calculator.method(), method);
        }
    }
}
