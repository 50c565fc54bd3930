//! Calculation request types.
//!
//! Confidence levels and time horizons are closed enums: any value outside
//! the supported tables is rejected at parse time with a validation error,
//! never silently defaulted. The z-score and trading-day tables themselves
//! live in `hobart-stats`.

use crate::error::RiskError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// VaR calculation methodology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VarMethod {
    /// Variance-covariance under a normal return assumption
    Parametric,
    /// Empirical percentile of the historical portfolio return series
    HistoricalSimulation,
    /// Correlated stochastic simulation
    MonteCarlo,
}

impl fmt::Display for VarMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parametric => write!(f, "PARAMETRIC"),
            Self::HistoricalSimulation => write!(f, "HISTORICAL_SIMULATION"),
            Self::MonteCarlo => write!(f, "MONTE_CARLO"),
        }
    }
}

/// Supported confidence levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    /// 95%
    P95,
    /// 99%
    P99,
    /// 99.9%
    P999,
}

impl ConfidenceLevel {
    /// Parse a percentage figure against the supported table.
    ///
    /// # Errors
    /// `UnsupportedConfidenceLevel` for anything other than 95, 99 or 99.9.
    pub fn try_from_percent(percent: f64) -> Result<Self, RiskError> {
        if (percent - 95.0).abs() < 1e-9 {
            Ok(Self::P95)
        } else if (percent - 99.0).abs() < 1e-9 {
            Ok(Self::P99)
        } else if (percent - 99.9).abs() < 1e-9 {
            Ok(Self::P999)
        } else {
            Err(RiskError::UnsupportedConfidenceLevel(percent))
        }
    }

    /// Confidence level as a percentage (95.0, 99.0, 99.9).
    pub const fn percent(self) -> f64 {
        match self {
            Self::P95 => 95.0,
            Self::P99 => 99.0,
            Self::P999 => 99.9,
        }
    }

    /// Tail probability `1 - confidence` (0.05, 0.01, 0.001).
    pub const fn tail_probability(self) -> f64 {
        match self {
            Self::P95 => 0.05,
            Self::P99 => 0.01,
            Self::P999 => 0.001,
        }
    }
}

/// Supported VaR horizons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeHorizon {
    /// One trading day
    OneDay,
    /// One week (5 trading days)
    OneWeek,
    /// Two weeks (10 trading days)
    TwoWeeks,
    /// One month (21 trading days)
    OneMonth,
    /// Three months (63 trading days)
    ThreeMonths,
    /// Six months (126 trading days)
    SixMonths,
    /// One year (252 trading days)
    OneYear,
}

impl TimeHorizon {
    /// Parse a horizon code against the supported table.
    ///
    /// # Errors
    /// `UnsupportedHorizon` for anything outside {1D, 1W, 2W, 1M, 3M, 6M, 1Y}.
    pub fn parse(code: &str) -> Result<Self, RiskError> {
        match code {
            "1D" => Ok(Self::OneDay),
            "1W" => Ok(Self::OneWeek),
            "2W" => Ok(Self::TwoWeeks),
            "1M" => Ok(Self::OneMonth),
            "3M" => Ok(Self::ThreeMonths),
            "6M" => Ok(Self::SixMonths),
            "1Y" => Ok(Self::OneYear),
            other => Err(RiskError::UnsupportedHorizon(other.to_string())),
        }
    }
}

impl fmt::Display for TimeHorizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::OneDay => "1D",
            Self::OneWeek => "1W",
            Self::TwoWeeks => "2W",
            Self::OneMonth => "1M",
            Self::ThreeMonths => "3M",
            Self::SixMonths => "6M",
            Self::OneYear => "1Y",
        };
        write!(f, "{code}")
    }
}

/// Confidence/horizon pair shared by all calculators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarParams {
    /// Confidence level of the loss quantile.
    pub confidence: ConfidenceLevel,
    /// Holding period the one-day figure is scaled to.
    pub horizon: TimeHorizon,
}

/// A VaR calculation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarRequest {
    /// Portfolio being analyzed.
    pub portfolio_id: String,
    /// Owning tenant (passthrough; isolation is enforced upstream).
    pub tenant_id: String,
    /// Calculation date the position snapshot was resolved for.
    pub as_of_date: NaiveDate,
    /// Selected methodology.
    pub method: VarMethod,
    /// Confidence level.
    pub confidence: ConfidenceLevel,
    /// Time horizon.
    pub horizon: TimeHorizon,
    /// Whether to run the backtesting engine on the same window.
    pub include_backtest: bool,
}

impl VarRequest {
    /// The confidence/horizon pair for the calculators.
    pub const fn params(&self) -> VarParams {
        VarParams {
            confidence: self.confidence,
            horizon: self.horizon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(95.0, ConfidenceLevel::P95)]
    #[case(99.0, ConfidenceLevel::P99)]
    #[case(99.9, ConfidenceLevel::P999)]
    fn test_confidence_parse(#[case] percent: f64, #[case] expected: ConfidenceLevel) {
        assert_eq!(ConfidenceLevel::try_from_percent(percent).unwrap(), expected);
    }

    #[test]
    fn test_confidence_97_rejected() {
        let err = ConfidenceLevel::try_from_percent(97.0).unwrap_err();
        assert!(matches!(err, RiskError::UnsupportedConfidenceLevel(p) if p == 97.0));
    }

    #[rstest]
    #[case("1D", TimeHorizon::OneDay)]
    #[case("1W", TimeHorizon::OneWeek)]
    #[case("2W", TimeHorizon::TwoWeeks)]
    #[case("1M", TimeHorizon::OneMonth)]
    #[case("3M", TimeHorizon::ThreeMonths)]
    #[case("6M", TimeHorizon::SixMonths)]
    #[case("1Y", TimeHorizon::OneYear)]
    fn test_horizon_parse(#[case] code: &str, #[case] expected: TimeHorizon) {
        assert_eq!(TimeHorizon::parse(code).unwrap(), expected);
        assert_eq!(expected.to_string(), code);
    }

    #[test]
    fn test_horizon_5d_rejected() {
        let err = TimeHorizon::parse("5D").unwrap_err();
        assert!(matches!(err, RiskError::UnsupportedHorizon(code) if code == "5D"));
    }

    #[test]
    fn test_tail_probability() {
        assert_eq!(ConfidenceLevel::P95.tail_probability(), 0.05);
        assert_eq!(ConfidenceLevel::P999.tail_probability(), 0.001);
    }
}
