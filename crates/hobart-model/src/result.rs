//! Result records assembled by the engine.
//!
//! Every record here is immutable once created. A new calculation produces a
//! new `VarResult` with a new id, preserving the audit trail required for
//! model-risk review.

use crate::request::VarRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Output of a methodology calculator before decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseVar {
    /// Diversified (portfolio-level) VaR.
    pub total_var: f64,
    /// VaR under perfect correlation: sum of standalone position VaRs.
    pub undiversified_var: f64,
    /// `undiversified_var - total_var`.
    pub diversification_benefit: f64,
}

impl BaseVar {
    /// Build from total and undiversified figures.
    pub fn new(total_var: f64, undiversified_var: f64) -> Self {
        Self {
            total_var,
            undiversified_var,
            diversification_benefit: undiversified_var - total_var,
        }
    }
}

/// VaR attributed to one position group (asset class by default).
///
/// Group VaRs are computed independently per sub-portfolio and are not
/// reconciled to the total: cross-group diversification means their sum
/// usually exceeds the portfolio VaR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentVar {
    /// Grouping key (asset class label by default).
    pub group_key: String,
    /// Sub-portfolio VaR of the group.
    pub var_amount: f64,
    /// `var_amount` as a percentage of total VaR.
    pub percent_of_total: f64,
    /// Average pairwise return correlation inside the group, derived from
    /// the sub-portfolio correlation matrix (1.0 for single-instrument
    /// groups).
    pub intra_group_correlation: f64,
}

/// Euler marginal contribution of one position.
///
/// `contribution` approximates the position's share of total VaR; the sum of
/// contributions across positions is close to total VaR but not exactly equal
/// to it (finite-difference and non-linearity effects).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginalVar {
    /// Position identifier.
    pub position_id: String,
    /// Marginal VaR: `contribution / value_share`.
    pub marginal_var: f64,
    /// Euler contribution, `value_share * marginal_var`.
    pub contribution: f64,
    /// `contribution` as a percentage of total VaR.
    pub percent_contribution: f64,
}

/// Change in total VaR from removing one position entirely.
///
/// Reported directly, without the value-share reallocation marginal VaR
/// applies. The two measures coincide only in special cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncrementalVar {
    /// Position identifier.
    pub position_id: String,
    /// `var_with - var_without`.
    pub incremental_var: f64,
    /// Total VaR of the portfolio without this position.
    pub var_without: f64,
    /// Total VaR of the full portfolio.
    pub var_with: f64,
}

/// Terminal state of a single backtest.
///
/// The tests run synchronously inside the calculation, so only terminal
/// states are ever observable on a result record. A backtest that was not
/// requested is represented by `VarResult::backtest` being `None`, not by a
/// status variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestStatus {
    /// Null hypothesis not rejected: the model looks calibrated.
    Passed,
    /// Null hypothesis rejected: the model needs recalibration.
    Failed,
}

/// Kupiec unconditional coverage (proportion-of-failures) test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KupiecTest {
    /// Lifecycle state.
    pub status: TestStatus,
    /// Likelihood-ratio statistic (chi-square, 1 df).
    pub lr_statistic: f64,
    /// Critical value the statistic is compared against (3.841 at 95%).
    pub critical_value: f64,
    /// `P(chi2_1 > lr_statistic)`.
    pub p_value: f64,
    /// Whether the null (correct coverage) is rejected.
    pub reject_null: bool,
}

/// Christoffersen independence test for exception clustering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChristoffersenTest {
    /// Lifecycle state.
    pub status: TestStatus,
    /// Conditional-coverage likelihood-ratio statistic (chi-square, 2 df).
    pub lr_statistic: f64,
    /// Critical value the statistic is compared against (5.991 at 95%).
    pub critical_value: f64,
    /// `P(chi2_2 > lr_statistic)`.
    pub p_value: f64,
    /// Whether the null (independent exceptions) is rejected.
    pub reject_null: bool,
}

/// Backtest of the VaR model against realized portfolio returns.
///
/// A failing backtest is a valid, reportable finding, not an engine error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Number of trading days in the test window.
    pub test_period_days: usize,
    /// Days where the realized loss exceeded the predicted VaR.
    pub exceptions: usize,
    /// `exceptions / test_period_days`.
    pub exception_rate: f64,
    /// `1 - confidence` as a fraction.
    pub expected_exception_rate: f64,
    /// Unconditional coverage test.
    pub kupiec: KupiecTest,
    /// Independence / conditional coverage test.
    pub christoffersen: ChristoffersenTest,
    /// `!kupiec.reject_null && !christoffersen.reject_null`.
    pub model_accurate: bool,
}

/// The immutable aggregate returned by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarResult {
    /// Unique id of this calculation.
    pub id: Uuid,
    /// Echo of the request that produced this result.
    pub request: VarRequest,
    /// Diversified portfolio VaR (same figure as `diversified_var`).
    pub total_var: f64,
    /// Diversified portfolio VaR.
    pub diversified_var: f64,
    /// Sum of standalone position VaRs.
    pub undiversified_var: f64,
    /// `undiversified_var - diversified_var`.
    pub diversification_benefit: f64,
    /// Per-group VaR breakdown.
    pub component_var: Vec<ComponentVar>,
    /// Per-position Euler contributions.
    pub marginal_var: Vec<MarginalVar>,
    /// Per-position leave-one-out deltas.
    pub incremental_var: Vec<IncrementalVar>,
    /// Backtest findings, when requested.
    pub backtest: Option<BacktestResult>,
    /// Convenience mirror of `backtest.model_accurate`.
    pub model_accurate: Option<bool>,
    /// Wall-clock calculation time in milliseconds.
    pub calculation_time_ms: u64,
    /// Assembly timestamp.
    pub created_at: DateTime<Utc>,
}
