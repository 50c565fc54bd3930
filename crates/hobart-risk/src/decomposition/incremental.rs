//! Leave-one-out incremental VaR.
//!
//! `incremental = var_with - var_without` where `var_with` is the full
//! portfolio VaR and `var_without` the VaR of the portfolio with the
//! position removed entirely. Reported directly, without the value-share
//! reallocation marginal VaR applies; conflating the two measures is a
//! classic implementation error and they coincide only in special cases.

use crate::deadline::{Deadline, check_deadline};
use crate::decomposition::position_values;
use hobart_methods::VarCalculator;
use hobart_model::{IncrementalVar, Position, ReturnMatrix, RiskError, VarParams};
use rayon::prelude::*;

/// Compute per-position leave-one-out deltas against the baseline total VaR.
///
/// N positions cost N sub-portfolio evaluations on top of the baseline; the
/// evaluations are independent and run as a rayon parallel map.
pub fn incremental_var(
    calculator: &dyn VarCalculator,
    positions: &[Position],
    returns: &ReturnMatrix,
    params: &VarParams,
    total_var: f64,
    deadline: Option<&Deadline>,
) -> Result<Vec<IncrementalVar>, RiskError> {
    let values = position_values(positions);

    (0..positions.len())
        .into_par_iter()
        .map(|i| {
            check_deadline(deadline)?;

            // Removing the only position leaves an empty portfolio.
            let var_without = if positions.len() == 1 {
                0.0
            } else {
                let rest: Vec<usize> =
                    (0..positions.len()).filter(|&j| j != i).collect();
                let sub_returns = returns.select_columns(&rest)?;
                let sub_values: Vec<f64> = rest.iter().map(|&j| values[j]).collect();
                calculator.base_var(&sub_values, &sub_returns, params)?.total_var
            };

            Ok(IncrementalVar {
                position_id: positions[i].position_id.clone(),
                incremental_var: total_var - var_without,
                var_without,
                var_with: total_var,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decomposition::marginal::marginal_var;
    use approx::assert_relative_eq;
    use hobart_methods::{ParametricCalculator, VarCalculator};
    use hobart_model::{AssetClass, ConfidenceLevel, TimeHorizon};
    use ndarray::array;

    fn params() -> VarParams {
        VarParams {
            confidence: ConfidenceLevel::P95,
            horizon: TimeHorizon::OneDay,
        }
    }

    /// Two equal positions with zero sample correlation: instrument A moves
    /// on even days, instrument B on odd days.
    fn uncorrelated_pair() -> (Vec<Position>, ReturnMatrix) {
        let positions = vec![
            Position::new("p1", "s1", "A", 500_000.0, AssetClass::Equity, "Tech"),
            Position::new("p2", "s2", "B", 500_000.0, AssetClass::Commodity, "Metals"),
        ];
        let data = array![
            [0.02, 0.0],
            [0.0, 0.02],
            [-0.02, 0.0],
            [0.0, -0.02],
            [0.02, 0.0],
            [0.0, 0.02],
            [-0.02, 0.0],
            [0.0, -0.02]
        ];
        let returns = ReturnMatrix::new(data, vec!["A".into(), "B".into()]).unwrap();
        (positions, returns)
    }

    #[test]
    fn test_leave_one_out_arithmetic() {
        let (positions, returns) = uncorrelated_pair();
        let values: Vec<f64> = positions.iter().map(|p| p.market_value).collect();
        let total = ParametricCalculator
            .base_var(&values, &returns, &params())
            .unwrap()
            .total_var;

        let incrementals =
            incremental_var(&ParametricCalculator, &positions, &returns, &params(), total, None)
                .unwrap();
        assert_eq!(incrementals.len(), 2);
        for inc in &incrementals {
            assert_eq!(inc.var_with, total);
            assert_relative_eq!(
                inc.incremental_var,
                inc.var_with - inc.var_without,
                max_relative = 1e-12
            );
            assert!(inc.var_without > 0.0);
        }
    }

    #[test]
    fn test_incremental_differs_from_marginal() {
        // Zero correlation makes the leave-one-out delta and the Euler
        // marginal clearly different figures; equality here would indicate
        // the two measures were conflated.
        let (positions, returns) = uncorrelated_pair();
        let values: Vec<f64> = positions.iter().map(|p| p.market_value).collect();
        let total = ParametricCalculator
            .base_var(&values, &returns, &params())
            .unwrap()
            .total_var;

        let incrementals =
            incremental_var(&ParametricCalculator, &positions, &returns, &params(), total, None)
                .unwrap();
        let marginals =
            marginal_var(&ParametricCalculator, &positions, &returns, &params(), total, None)
                .unwrap();

        for (inc, marg) in incrementals.iter().zip(marginals.iter()) {
            let gap = (inc.incremental_var - marg.marginal_var).abs();
            assert!(
                gap / total > 0.01,
                "incremental ({}) and marginal ({}) should differ for uncorrelated assets",
                inc.incremental_var,
                marg.marginal_var
            );
        }
    }

    #[test]
    fn test_single_position_portfolio() {
        let positions = vec![Position::new(
            "p1",
            "s1",
            "A",
            500_000.0,
            AssetClass::Equity,
            "Tech",
        )];
        let data = array![[0.01], [0.02], [-0.01], [-0.02], [0.015], [-0.015]];
        let returns = ReturnMatrix::new(data, vec!["A".into()]).unwrap();
        let total = ParametricCalculator
            .base_var(&[500_000.0], &returns, &params())
            .unwrap()
            .total_var;

        let incrementals =
            incremental_var(&ParametricCalculator, &positions, &returns, &params(), total, None)
                .unwrap();
        assert_eq!(incrementals[0].var_without, 0.0);
        assert_relative_eq!(incrementals[0].incremental_var, total, max_relative = 1e-12);
    }
}
