//! Aligned historical return matrix.
//!
//! Rows are trading days in ascending date order, columns are instruments in
//! position order. The matrix is dense by contract: gaps must be resolved
//! (forward-filled or excluded) by the market data collaborator before the
//! engine sees it.

use crate::error::RiskError;
use ndarray::Array2;

/// An N-day by M-instrument matrix of daily returns, with instrument labels.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnMatrix {
    data: Array2<f64>,
    symbols: Vec<String>,
}

impl ReturnMatrix {
    /// Wrap an aligned return matrix.
    ///
    /// # Errors
    /// `DimensionMismatch` when the label count does not match the column
    /// count; `NumericalInstability` when any cell is non-finite.
    pub fn new(data: Array2<f64>, symbols: Vec<String>) -> Result<Self, RiskError> {
        if symbols.len() != data.ncols() {
            return Err(RiskError::DimensionMismatch {
                expected: data.ncols(),
                actual: symbols.len(),
            });
        }
        for (j, column) in data.columns().into_iter().enumerate() {
            if column.iter().any(|v| !v.is_finite()) {
                return Err(RiskError::NumericalInstability {
                    context: format!("non-finite return in series for {}", symbols[j]),
                });
            }
        }
        Ok(Self { data, symbols })
    }

    /// Number of trading days (rows).
    pub fn n_days(&self) -> usize {
        self.data.nrows()
    }

    /// Number of instruments (columns).
    pub fn n_instruments(&self) -> usize {
        self.data.ncols()
    }

    /// The underlying N x M array.
    pub const fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// Instrument labels in column order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Select a subset of columns (instruments) preserving order.
    ///
    /// Used by the decomposition engine to build sub-portfolio views.
    ///
    /// # Errors
    /// `DimensionMismatch` when an index is out of range.
    pub fn select_columns(&self, indices: &[usize]) -> Result<Self, RiskError> {
        let mut data = Array2::<f64>::zeros((self.n_days(), indices.len()));
        let mut symbols = Vec::with_capacity(indices.len());
        for (k, &j) in indices.iter().enumerate() {
            if j >= self.n_instruments() {
                return Err(RiskError::DimensionMismatch {
                    expected: self.n_instruments(),
                    actual: j,
                });
            }
            data.column_mut(k).assign(&self.data.column(j));
            symbols.push(self.symbols[j].clone());
        }
        Self::new(data, symbols)
    }
}
