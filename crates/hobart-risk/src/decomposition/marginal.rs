//! Euler marginal contributions.
//!
//! `contribution_i` is estimated by bump-and-revalue: scale position i's
//! market value by (1 + delta) with delta = 1%, recompute total VaR through
//! the same calculator (identical randomness for Monte Carlo), and take
//! (bumped - base) / delta. Because VaR is positively homogeneous in the
//! position values, these contributions sum to total VaR up to
//! finite-difference error, which is the additivity the report documents as
//! approximate rather than exact.
//!
//! The record identity `contribution == value_share * marginal_var` holds
//! exactly: `marginal_var` is defined as the contribution scaled back by the
//! position's value share.

use crate::deadline::{Deadline, check_deadline};
use crate::decomposition::position_values;
use hobart_methods::VarCalculator;
use hobart_model::{MarginalVar, Position, ReturnMatrix, RiskError, VarParams};
use rayon::prelude::*;

/// Relative bump applied to one position's market value.
const BUMP: f64 = 0.01;

/// Compute per-position Euler contributions against the baseline total VaR.
pub fn marginal_var(
    calculator: &dyn VarCalculator,
    positions: &[Position],
    returns: &ReturnMatrix,
    params: &VarParams,
    total_var: f64,
    deadline: Option<&Deadline>,
) -> Result<Vec<MarginalVar>, RiskError> {
    let values = position_values(positions);
    let portfolio_value: f64 = values.iter().sum();

    (0..positions.len())
        .into_par_iter()
        .map(|i| {
            check_deadline(deadline)?;

            let mut bumped = values.clone();
            bumped[i] *= 1.0 + BUMP;
            let bumped_var = calculator.base_var(&bumped, returns, params)?.total_var;
            let contribution = (bumped_var - total_var) / BUMP;

            let value_share = values[i] / portfolio_value;
            let marginal = if value_share.abs() > f64::EPSILON {
                contribution / value_share
            } else {
                0.0
            };
            let percent_contribution = if total_var.abs() > f64::EPSILON {
                100.0 * contribution / total_var
            } else {
                0.0
            };

            Ok(MarginalVar {
                position_id: positions[i].position_id.clone(),
                marginal_var: marginal,
                contribution,
                percent_contribution,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hobart_methods::{ParametricCalculator, VarCalculator};
    use hobart_model::{AssetClass, ConfidenceLevel, TimeHorizon};
    use ndarray::Array2;

    fn params() -> VarParams {
        VarParams {
            confidence: ConfidenceLevel::P95,
            horizon: TimeHorizon::OneDay,
        }
    }

    fn multi_asset() -> (Vec<Position>, ReturnMatrix) {
        let positions = vec![
            Position::new("p1", "s1", "AAPL", 300_000.0, AssetClass::Equity, "Tech"),
            Position::new("p2", "s2", "MSFT", 250_000.0, AssetClass::Equity, "Tech"),
            Position::new("p3", "s3", "TLT", 250_000.0, AssetClass::FixedIncome, "Rates"),
            Position::new("p4", "s4", "GLD", 200_000.0, AssetClass::Commodity, "Metals"),
        ];
        let data = Array2::from_shape_fn((252, 4), |(t, j)| {
            let common = 0.008 * ((t as f64) * 0.37).sin();
            let own = 0.006 * ((t as f64 + 3.0) * (0.53 + 0.19 * j as f64)).cos();
            common + own
        });
        let returns = ReturnMatrix::new(
            data,
            vec!["AAPL".into(), "MSFT".into(), "TLT".into(), "GLD".into()],
        )
        .unwrap();
        (positions, returns)
    }

    #[test]
    fn test_contributions_approximately_additive() {
        let (positions, returns) = multi_asset();
        let values: Vec<f64> = positions.iter().map(|p| p.market_value).collect();
        let total = ParametricCalculator
            .base_var(&values, &returns, &params())
            .unwrap()
            .total_var;

        let marginals =
            marginal_var(&ParametricCalculator, &positions, &returns, &params(), total, None)
                .unwrap();
        let contribution_sum: f64 = marginals.iter().map(|m| m.contribution).sum();
        assert!(
            (contribution_sum - total).abs() / total < 0.05,
            "Euler contributions should sum close to total VaR: sum={contribution_sum}, total={total}"
        );
    }

    #[test]
    fn test_contribution_identity_holds_exactly() {
        let (positions, returns) = multi_asset();
        let values: Vec<f64> = positions.iter().map(|p| p.market_value).collect();
        let portfolio_value: f64 = values.iter().sum();
        let total = ParametricCalculator
            .base_var(&values, &returns, &params())
            .unwrap()
            .total_var;

        let marginals =
            marginal_var(&ParametricCalculator, &positions, &returns, &params(), total, None)
                .unwrap();
        for (m, v) in marginals.iter().zip(values.iter()) {
            let value_share = v / portfolio_value;
            assert_relative_eq!(
                m.contribution,
                value_share * m.marginal_var,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_expired_deadline_aborts() {
        let (positions, returns) = multi_asset();
        let deadline = Deadline::new(std::time::Duration::ZERO);
        std::thread::sleep(std::time::Duration::from_millis(2));
        let err = marginal_var(
            &ParametricCalculator,
            &positions,
            &returns,
            &params(),
            10_000.0,
            Some(&deadline),
        )
        .unwrap_err();
        assert!(matches!(err, RiskError::CalculationTimeout { .. }));
    }
}
