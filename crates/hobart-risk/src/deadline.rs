//! Caller-driven time budget.
//!
//! The engine performs no blocking I/O, so cancellation is cooperative: the
//! deadline is checked between phases and before each sub-portfolio
//! re-evaluation. On expiry the whole calculation fails with
//! `CalculationTimeout`; no partial result is ever returned.

use hobart_model::RiskError;
use std::time::{Duration, Instant};

/// A started time budget.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Duration,
}

impl Deadline {
    /// Start a budget now.
    pub fn new(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    /// Elapsed time since the budget started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Fail with `CalculationTimeout` if the budget is spent.
    pub fn check(&self) -> Result<(), RiskError> {
        if self.started.elapsed() > self.budget {
            Err(RiskError::CalculationTimeout {
                budget_ms: self.budget.as_millis() as u64,
            })
        } else {
            Ok(())
        }
    }
}

/// Check an optional deadline.
pub(crate) fn check_deadline(deadline: Option<&Deadline>) -> Result<(), RiskError> {
    deadline.map_or(Ok(()), Deadline::check)
}
