//! Risk decomposition.
//!
//! Attributes total portfolio VaR three ways:
//! - component VaR per position group (asset class by default),
//! - Euler marginal contributions per position,
//! - leave-one-out incremental VaR per position.
//!
//! Marginal and incremental answer different questions and are reported
//! separately: marginal allocates the standing portfolio's risk across
//! positions (approximately additive), incremental prices the removal of a
//! whole position (not additive at all).
//!
//! The sub-portfolio re-evaluations behind marginal and incremental are
//! independent; they run as a rayon parallel map with the caller's deadline
//! checked before each evaluation.

pub mod component;
pub mod incremental;
pub mod marginal;

pub use component::group_by_asset_class;

use crate::deadline::Deadline;
use hobart_methods::VarCalculator;
use hobart_model::{
    ComponentVar, IncrementalVar, MarginalVar, Position, ReturnMatrix, RiskError, VarParams,
};

/// Decomposition results for one calculation.
#[derive(Debug, Clone)]
pub struct Decomposition {
    /// Per-group VaR breakdown.
    pub component: Vec<ComponentVar>,
    /// Per-position Euler contributions.
    pub marginal: Vec<MarginalVar>,
    /// Per-position leave-one-out deltas.
    pub incremental: Vec<IncrementalVar>,
}

/// Runs the three decompositions through a methodology calculator.
pub struct DecompositionEngine<'a> {
    calculator: &'a dyn VarCalculator,
    params: VarParams,
}

impl std::fmt::Debug for DecompositionEngine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecompositionEngine")
            .field("method", &self.calculator.method())
            .field("params", &self.params)
            .finish()
    }
}

impl<'a> DecompositionEngine<'a> {
    /// Create a decomposition engine over a calculator and parameter pair.
    ///
    /// The calculator must be the one that produced the base VaR so that
    /// sub-portfolio evaluations use the same methodology (and, for Monte
    /// Carlo, the same seed).
    pub const fn new(calculator: &'a dyn VarCalculator, params: VarParams) -> Self {
        Self { calculator, params }
    }

    /// Compute all three decompositions against the full position set.
    ///
    /// `total_var` is the already-computed base VaR of the full portfolio;
    /// it is reused as the baseline for every breakdown rather than
    /// recomputed.
    pub fn decompose(
        &self,
        positions: &[Position],
        returns: &ReturnMatrix,
        total_var: f64,
        deadline: Option<&Deadline>,
    ) -> Result<Decomposition, RiskError> {
        let component = component::component_var(
            self.calculator,
            positions,
            returns,
            &self.params,
            total_var,
            group_by_asset_class,
            deadline,
        )?;
        let marginal = marginal::marginal_var(
            self.calculator,
            positions,
            returns,
            &self.params,
            total_var,
            deadline,
        )?;
        let incremental = incremental::incremental_var(
            self.calculator,
            positions,
            returns,
            &self.params,
            total_var,
            deadline,
        )?;
        Ok(Decomposition {
            component,
            marginal,
            incremental,
        })
    }
}

/// Market values in position order.
pub(crate) fn position_values(positions: &[Position]) -> Vec<f64> {
    positions.iter().map(|p| p.market_value).collect()
}
