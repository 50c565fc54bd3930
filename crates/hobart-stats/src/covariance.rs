//! Sample covariance and correlation estimation.
//!
//! The covariance between instruments i and j over N observations is:
//! Cov(i,j) = sum_t (r_{i,t} - mean_i)(r_{j,t} - mean_j) / (N - 1)
//!
//! The unbiased (N-1) estimator is used throughout. Floating-point
//! accumulation can leave the result very slightly asymmetric, so the matrix
//! is symmetrized by averaging with its transpose before it is returned.

use hobart_model::RiskError;
use ndarray::Array2;

/// Average a square matrix with its transpose.
///
/// Covariance matrices are symmetric by definition; this removes the
/// asymmetry introduced by floating-point accumulation order.
pub fn symmetrize(matrix: &Array2<f64>) -> Array2<f64> {
    let n = matrix.nrows();
    let mut out = matrix.clone();
    for i in 0..n {
        for j in (i + 1)..n {
            let avg = 0.5 * (matrix[[i, j]] + matrix[[j, i]]);
            out[[i, j]] = avg;
            out[[j, i]] = avg;
        }
    }
    out
}

/// Unbiased sample covariance of a returns matrix (rows = days, columns =
/// instruments).
///
/// # Errors
/// `IncompleteMarketData` with fewer than 2 observations.
pub fn sample_covariance(returns: &Array2<f64>) -> Result<Array2<f64>, RiskError> {
    let (n_days, n_instruments) = returns.dim();
    if n_days < 2 {
        return Err(RiskError::IncompleteMarketData {
            required: 2,
            actual: n_days,
        });
    }

    let means: Vec<f64> = (0..n_instruments)
        .map(|j| returns.column(j).sum() / n_days as f64)
        .collect();

    let mut cov = Array2::<f64>::zeros((n_instruments, n_instruments));
    for i in 0..n_instruments {
        for j in i..n_instruments {
            let mut acc = 0.0;
            for t in 0..n_days {
                acc += (returns[[t, i]] - means[i]) * (returns[[t, j]] - means[j]);
            }
            let value = acc / (n_days - 1) as f64;
            cov[[i, j]] = value;
            cov[[j, i]] = value;
        }
    }

    Ok(symmetrize(&cov))
}

/// Correlation matrix derived from a covariance matrix.
///
/// # Errors
/// `NumericalInstability` when a diagonal variance is not strictly positive
/// (the instrument has a degenerate return series).
pub fn correlation_from_covariance(cov: &Array2<f64>) -> Result<Array2<f64>, RiskError> {
    let n = cov.nrows();
    if n != cov.ncols() {
        return Err(RiskError::DimensionMismatch {
            expected: n,
            actual: cov.ncols(),
        });
    }

    let mut vols = Vec::with_capacity(n);
    for i in 0..n {
        let variance = cov[[i, i]];
        if variance <= 0.0 || !variance.is_finite() {
            return Err(RiskError::NumericalInstability {
                context: format!("non-positive variance for instrument {i} in correlation"),
            });
        }
        vols.push(variance.sqrt());
    }

    let mut corr = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            corr[[i, j]] = cov[[i, j]] / (vols[i] * vols[j]);
        }
        corr[[i, i]] = 1.0;
    }

    Ok(corr)
}
