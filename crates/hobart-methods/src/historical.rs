//! Historical simulation VaR.
//!
//! Applies today's weights to each historical day's instrument returns to
//! build an empirical portfolio return distribution, then reads the loss
//! quantile straight out of the sorted sample. No distributional assumption
//! is made anywhere: this is the defining difference from the parametric
//! method and must not be shortcut through a normal approximation.

use crate::{VarCalculator, portfolio_weights};
use hobart_model::{BaseVar, ReturnMatrix, RiskError, VarMethod, VarParams};
use hobart_stats::{sorted_tail_value, time_scaling_factor};

/// Empirical-percentile calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoricalSimulationCalculator;

impl VarCalculator for HistoricalSimulationCalculator {
    fn method(&self) -> VarMethod {
        VarMethod::HistoricalSimulation
    }

    fn base_var(
        &self,
        values: &[f64],
        returns: &ReturnMatrix,
        params: &VarParams,
    ) -> Result<BaseVar, RiskError> {
        let (weights, total_value) = portfolio_weights(values, returns)?;
        if returns.n_days() < 2 {
            return Err(RiskError::IncompleteMarketData {
                required: 2,
                actual: returns.n_days(),
            });
        }

        let scale = time_scaling_factor(params.horizon);
        let data = returns.data();

        // Re-price the current portfolio through every historical day.
        let mut portfolio_returns: Vec<f64> = (0..returns.n_days())
            .map(|t| {
                weights
                    .iter()
                    .enumerate()
                    .map(|(j, w)| w * data[[t, j]])
                    .sum()
            })
            .collect();
        let tail = sorted_tail_value(&mut portfolio_returns, params.confidence)?;
        let total_var = (total_value * tail * scale).abs();

        // Standalone VaR per position from its own empirical tail.
        let mut undiversified_var = 0.0;
        for (j, value) in values.iter().enumerate() {
            let mut series: Vec<f64> = data.column(j).to_vec();
            let own_tail = sorted_tail_value(&mut series, params.confidence)?;
            undiversified_var += (value * own_tail * scale).abs();
        }

        Ok(BaseVar::new(total_var, undiversified_var))
    }
}
