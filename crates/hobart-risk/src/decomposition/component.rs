//! Component VaR by position group.
//!
//! Each group's sub-portfolio VaR is computed independently through the same
//! calculator, not taken as a value-weighted share of the total. Group VaRs
//! are reported next to `percent_of_total` without reconciliation:
//! cross-group diversification means their sum normally exceeds total VaR.

use crate::deadline::{Deadline, check_deadline};
use crate::decomposition::position_values;
use hobart_methods::VarCalculator;
use hobart_model::{ComponentVar, Position, ReturnMatrix, RiskError, VarParams};
use hobart_stats::{correlation_from_covariance, sample_covariance};
use std::collections::BTreeMap;

/// Default grouping key: the position's asset class label.
pub fn group_by_asset_class(position: &Position) -> String {
    position.asset_class.to_string()
}

/// Compute per-group sub-portfolio VaR.
///
/// Groups are keyed by `group_by` and evaluated in key order, so the output
/// is deterministic.
pub fn component_var<F>(
    calculator: &dyn VarCalculator,
    positions: &[Position],
    returns: &ReturnMatrix,
    params: &VarParams,
    total_var: f64,
    group_by: F,
    deadline: Option<&Deadline>,
) -> Result<Vec<ComponentVar>, RiskError>
where
    F: Fn(&Position) -> String,
{
    let values = position_values(positions);

    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (i, position) in positions.iter().enumerate() {
        groups.entry(group_by(position)).or_default().push(i);
    }

    let mut components = Vec::with_capacity(groups.len());
    for (group_key, indices) in groups {
        check_deadline(deadline)?;

        let sub_returns = returns.select_columns(&indices)?;
        let sub_values: Vec<f64> = indices.iter().map(|&i| values[i]).collect();
        let sub_var = calculator
            .base_var(&sub_values, &sub_returns, params)?
            .total_var;

        let percent_of_total = if total_var.abs() > f64::EPSILON {
            100.0 * sub_var / total_var
        } else {
            0.0
        };

        components.push(ComponentVar {
            group_key,
            var_amount: sub_var,
            percent_of_total,
            intra_group_correlation: average_intra_correlation(&sub_returns)?,
        });
    }

    Ok(components)
}

/// Average pairwise correlation inside a group, derived from the group's own
/// return history rather than a fixed placeholder. Single-instrument groups
/// report 1.0.
fn average_intra_correlation(returns: &ReturnMatrix) -> Result<f64, RiskError> {
    let n = returns.n_instruments();
    if n < 2 {
        return Ok(1.0);
    }
    let corr = correlation_from_covariance(&sample_covariance(returns.data())?)?;
    let mut acc = 0.0;
    let mut count = 0usize;
    for i in 0..n {
        for j in (i + 1)..n {
            acc += corr[[i, j]];
            count += 1;
        }
    }
    Ok(acc / count as f64)
}
