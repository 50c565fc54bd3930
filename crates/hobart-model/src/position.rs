//! Position snapshot types.
//!
//! Positions are owned by the external portfolio collaborator and enter the
//! engine as an immutable snapshot resolved for the calculation date. The
//! engine only reads them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Asset class of a position, used as the default grouping key for
/// component VaR.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    /// Listed equity
    Equity,
    /// Government and corporate bonds
    FixedIncome,
    /// Commodity exposure
    Commodity,
    /// FX exposure
    Currency,
    /// Hedge fund, private and other alternative exposure
    Alternative,
    /// Anything outside the closed set, keyed by label
    Other(String),
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equity => write!(f, "EQUITY"),
            Self::FixedIncome => write!(f, "FIXED_INCOME"),
            Self::Commodity => write!(f, "COMMODITY"),
            Self::Currency => write!(f, "CURRENCY"),
            Self::Alternative => write!(f, "ALTERNATIVE"),
            Self::Other(label) => write!(f, "{label}"),
        }
    }
}

/// A single portfolio position as of the calculation date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Identifier of the position row in the owning portfolio system.
    pub position_id: String,
    /// Identifier of the instrument.
    pub security_id: String,
    /// Ticker symbol, aligned with the return matrix column labels.
    pub symbol: String,
    /// Signed market value in portfolio currency (negative = short).
    pub market_value: f64,
    /// Asset class, the default component VaR grouping.
    pub asset_class: AssetClass,
    /// GICS-style sector label.
    pub sector: String,
}

impl Position {
    /// Create a position snapshot.
    pub fn new(
        position_id: impl Into<String>,
        security_id: impl Into<String>,
        symbol: impl Into<String>,
        market_value: f64,
        asset_class: AssetClass,
        sector: impl Into<String>,
    ) -> Self {
        Self {
            position_id: position_id.into(),
            security_id: security_id.into(),
            symbol: symbol.into(),
            market_value,
            asset_class,
            sector: sector.into(),
        }
    }
}

/// Sum of signed market values across positions.
pub fn total_market_value(positions: &[Position]) -> f64 {
    positions.iter().map(|p| p.market_value).sum()
}
