//! Cholesky factorization for correlated scenario generation.
//!
//! Monte Carlo simulation needs a lower-triangular factor L with L * L^T =
//! Sigma so independent standard normals can be mapped into correlated
//! instrument returns. A covariance matrix that fails to factor is reported
//! as a numerical error naming the offending pivot, never silently repaired.

use hobart_model::RiskError;
use ndarray::Array2;

/// Tolerance below which a pivot is treated as exactly zero rather than
/// negative. Absorbs rounding on rank-deficient but valid covariances
/// (e.g. duplicated return series).
const PIVOT_TOLERANCE: f64 = 1e-10;

/// Lower-triangular Cholesky factor of a symmetric positive semi-definite
/// matrix.
///
/// # Errors
/// `DimensionMismatch` for non-square input; `NumericalInstability` when a
/// pivot is negative beyond tolerance (the matrix is not positive
/// semi-definite).
pub fn cholesky(matrix: &Array2<f64>) -> Result<Array2<f64>, RiskError> {
    let n = matrix.nrows();
    if n != matrix.ncols() {
        return Err(RiskError::DimensionMismatch {
            expected: n,
            actual: matrix.ncols(),
        });
    }

    let mut lower = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in 0..=i {
            let mut acc = matrix[[i, j]];
            for k in 0..j {
                acc -= lower[[i, k]] * lower[[j, k]];
            }

            if i == j {
                if acc < -PIVOT_TOLERANCE {
                    return Err(RiskError::NumericalInstability {
                        context: format!(
                            "covariance matrix not positive semi-definite at pivot {i} (value {acc:e})"
                        ),
                    });
                }
                lower[[i, j]] = acc.max(0.0).sqrt();
            } else if lower[[j, j]] > 0.0 {
                lower[[i, j]] = acc / lower[[j, j]];
            }
            // A zero pivot leaves the column zero: the degenerate direction
            // contributes nothing to the simulated scenarios.
        }
    }

    Ok(lower)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_factor_reconstructs_matrix() {
        let sigma = array![[0.0004, 0.00024], [0.00024, 0.0004]];
        let lower = cholesky(&sigma).unwrap();
        let reconstructed = lower.dot(&lower.t());
        for i in 0..2 {
            for j in 0..2 {
                assert_relative_eq!(reconstructed[[i, j]], sigma[[i, j]], max_relative = 1e-12);
            }
        }
        // Upper triangle is zero
        assert_eq!(lower[[0, 1]], 0.0);
    }

    #[test]
    fn test_identity_factors_to_identity() {
        let identity = Array2::<f64>::eye(3);
        let lower = cholesky(&identity).unwrap();
        assert_eq!(lower, identity);
    }

    #[test]
    fn test_rank_deficient_is_accepted() {
        // Two perfectly correlated instruments: PSD but singular.
        let sigma = array![[0.0001, 0.0001], [0.0001, 0.0001]];
        let lower = cholesky(&sigma).unwrap();
        let reconstructed = lower.dot(&lower.t());
        assert_relative_eq!(reconstructed[[1, 1]], 0.0001, max_relative = 1e-9);
    }

    #[test]
    fn test_indefinite_matrix_rejected() {
        let not_psd = array![[1.0, 2.0], [2.0, 1.0]];
        assert!(matches!(
            cholesky(&not_psd).unwrap_err(),
            RiskError::NumericalInstability { context } if context.contains("pivot 1")
        ));
    }
}
