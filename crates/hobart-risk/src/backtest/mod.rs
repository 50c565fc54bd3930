//! VaR model backtesting.
//!
//! Compares realized portfolio returns against the model's one-day VaR and
//! runs two hypothesis tests over the exception series:
//! - Kupiec unconditional coverage: is the exception *rate* consistent with
//!   the confidence level?
//! - Christoffersen conditional coverage: do exceptions *cluster* in time?
//!
//! Both statistics are likelihood ratios compared against chi-square
//! critical values (1 and 2 degrees of freedom). Rejection means the model
//! needs recalibration; it is reported, never raised as an error, and never
//! silently suppressed.

pub mod christoffersen;
pub mod kupiec;

pub use christoffersen::christoffersen_test;
pub use kupiec::kupiec_test;

use hobart_methods::VarCalculator;
use hobart_model::{
    BacktestResult, ConfidenceLevel, ReturnMatrix, RiskError, TimeHorizon, VarParams,
};

/// Probability clamp keeping binomial log-likelihoods finite at 0 and 1.
pub(crate) const PROB_FLOOR: f64 = 1.0e-12;

pub(crate) fn clamp_probability(p: f64) -> f64 {
    p.clamp(PROB_FLOOR, 1.0 - PROB_FLOOR)
}

/// Binomial log-likelihood of `exceptions` hits in `observations` trials at
/// hit probability `p`.
pub(crate) fn binomial_log_likelihood(exceptions: usize, observations: usize, p: f64) -> f64 {
    let p = clamp_probability(p);
    (observations - exceptions) as f64 * (1.0 - p).ln() + exceptions as f64 * p.ln()
}

/// Backtest a calculator against the historical window it was fitted on.
///
/// The model's one-day VaR is expressed as a return threshold and compared
/// with each day's realized portfolio return; a day whose loss exceeds the
/// threshold is an exception.
pub fn run_backtest(
    calculator: &dyn VarCalculator,
    values: &[f64],
    returns: &ReturnMatrix,
    confidence: ConfidenceLevel,
) -> Result<BacktestResult, RiskError> {
    let params = VarParams {
        confidence,
        horizon: TimeHorizon::OneDay,
    };
    let one_day_var = calculator.base_var(values, returns, &params)?.total_var;

    let total_value: f64 = values.iter().sum();
    if total_value == 0.0 || !total_value.is_finite() {
        return Err(RiskError::InvalidPortfolioValue);
    }
    let threshold = one_day_var / total_value.abs();

    let data = returns.data();
    let hits: Vec<bool> = (0..returns.n_days())
        .map(|t| {
            let realized: f64 = values
                .iter()
                .enumerate()
                .map(|(j, v)| (v / total_value) * data[[t, j]])
                .sum();
            -realized > threshold
        })
        .collect();

    backtest_from_hits(&hits, confidence)
}

/// Run both tests over an exception indicator series.
pub fn backtest_from_hits(
    hits: &[bool],
    confidence: ConfidenceLevel,
) -> Result<BacktestResult, RiskError> {
    let observations = hits.len();
    let exceptions = hits.iter().filter(|&&h| h).count();
    let expected_rate = confidence.tail_probability();

    let kupiec = kupiec_test(exceptions, observations, expected_rate)?;
    let christoffersen = christoffersen_test(hits, expected_rate)?;
    let model_accurate = !kupiec.reject_null && !christoffersen.reject_null;

    Ok(BacktestResult {
        test_period_days: observations,
        exceptions,
        exception_rate: exceptions as f64 / observations as f64,
        expected_exception_rate: expected_rate,
        kupiec,
        christoffersen,
        model_accurate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hobart_methods::ParametricCalculator;
    use ndarray::Array2;

    #[test]
    fn test_well_calibrated_series_passes() {
        // ~5% of days are exceptions, spread out evenly.
        let hits: Vec<bool> = (0..250).map(|t| t % 20 == 7).collect();
        let result = backtest_from_hits(&hits, ConfidenceLevel::P95).unwrap();
        assert_eq!(result.exceptions, 13);
        assert!(!result.kupiec.reject_null);
        assert!(!result.christoffersen.reject_null);
        assert!(result.model_accurate);
    }

    #[test]
    fn test_failing_backtest_is_a_result_not_an_error() {
        // Every day an exception: grossly miscalibrated, but still Ok(..).
        let hits = vec![true; 250];
        let result = backtest_from_hits(&hits, ConfidenceLevel::P95).unwrap();
        assert!(result.kupiec.reject_null);
        assert!(!result.model_accurate);
    }

    #[test]
    fn test_end_to_end_against_calculator() {
        let data = Array2::from_shape_fn((250, 2), |(t, j)| {
            0.01 * ((t as f64 + 1.0) * (0.7 + 0.3 * j as f64)).sin()
        });
        let returns = ReturnMatrix::new(data, vec!["A".into(), "B".into()]).unwrap();
        let result = run_backtest(
            &ParametricCalculator,
            &[500_000.0, 500_000.0],
            &returns,
            ConfidenceLevel::P95,
        )
        .unwrap();
        assert_eq!(result.test_period_days, 250);
        assert_eq!(result.expected_exception_rate, 0.05);
        assert!(result.exception_rate <= 1.0);
    }
}
