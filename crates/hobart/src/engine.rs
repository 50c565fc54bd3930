//! Calculation orchestration and result assembly.
//!
//! A request flows through four phases: validation, base VaR through the
//! selected methodology calculator, decomposition against the same position
//! set, and (when requested) backtesting. The assembler then freezes
//! everything into an immutable `VarResult` with a fresh id.
//!
//! The engine holds no mutable state: `calculate` takes `&self` and
//! independent requests can run concurrently without coordination. The
//! caller's time budget is checked between phases and inside the
//! decomposition map; on expiry the whole calculation fails with
//! `CalculationTimeout` rather than returning a partial result.

use chrono::Utc;
use hobart_methods::{MonteCarloConfig, calculator_for};
use hobart_model::{Position, ReturnMatrix, RiskError, VarRequest, VarResult};
use hobart_risk::decomposition::DecompositionEngine;
use hobart_risk::{Deadline, run_backtest};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Engine configuration.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Minimum return history accepted for any calculation (default: 30).
    pub min_history: usize,
    /// Optional wall-clock budget for one calculation.
    pub timeout: Option<Duration>,
    /// Monte Carlo settings used when the request selects that method.
    pub monte_carlo: MonteCarloConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_history: 30,
            timeout: None,
            monte_carlo: MonteCarloConfig::default(),
        }
    }
}

/// The portfolio VaR engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct VarEngine {
    config: EngineConfig,
}

impl VarEngine {
    /// Create an engine with the given configuration.
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one VaR calculation over an immutable snapshot.
    ///
    /// Pure given a fixed Monte Carlo seed: the same request, positions and
    /// returns always produce the same figures (ids and timestamps aside).
    ///
    /// # Errors
    /// Validation errors before any computation; `NumericalInstability` from
    /// the numerical kernel; `CalculationTimeout` when the configured budget
    /// is exceeded.
    pub fn calculate(
        &self,
        request: &VarRequest,
        positions: &[Position],
        returns: &ReturnMatrix,
    ) -> Result<VarResult, RiskError> {
        let started = Instant::now();
        self.validate(positions, returns)?;

        let deadline = self.config.timeout.map(Deadline::new);
        let values: Vec<f64> = positions.iter().map(|p| p.market_value).collect();
        let params = request.params();
        let calculator = calculator_for(request.method, self.config.monte_carlo);

        let base = calculator.base_var(&values, returns, &params)?;
        check(deadline.as_ref())?;

        let decomposition = DecompositionEngine::new(calculator.as_ref(), params).decompose(
            positions,
            returns,
            base.total_var,
            deadline.as_ref(),
        )?;
        check(deadline.as_ref())?;

        let backtest = if request.include_backtest {
            Some(run_backtest(
                calculator.as_ref(),
                &values,
                returns,
                request.confidence,
            )?)
        } else {
            None
        };
        check(deadline.as_ref())?;

        let model_accurate = backtest.as_ref().map(|b| b.model_accurate);
        Ok(VarResult {
            id: Uuid::new_v4(),
            request: request.clone(),
            total_var: base.total_var,
            diversified_var: base.total_var,
            undiversified_var: base.undiversified_var,
            diversification_benefit: base.diversification_benefit,
            component_var: decomposition.component,
            marginal_var: decomposition.marginal,
            incremental_var: decomposition.incremental,
            backtest,
            model_accurate,
            calculation_time_ms: started.elapsed().as_millis() as u64,
            created_at: Utc::now(),
        })
    }

    /// Fail fast on malformed input, before any numerical work.
    fn validate(&self, positions: &[Position], returns: &ReturnMatrix) -> Result<(), RiskError> {
        if positions.len() != returns.n_instruments() {
            return Err(RiskError::DimensionMismatch {
                expected: positions.len(),
                actual: returns.n_instruments(),
            });
        }
        let total: f64 = positions.iter().map(|p| p.market_value).sum();
        if positions.is_empty() || total == 0.0 || !total.is_finite() {
            return Err(RiskError::InvalidPortfolioValue);
        }
        if returns.n_days() < self.config.min_history {
            return Err(RiskError::IncompleteMarketData {
                required: self.config.min_history,
                actual: returns.n_days(),
            });
        }
        Ok(())
    }
}

fn check(deadline: Option<&Deadline>) -> Result<(), RiskError> {
    deadline.map_or(Ok(()), Deadline::check)
}
