//! Kupiec unconditional coverage (proportion-of-failures) test.
//!
//! Under the null the exception count is binomial with the expected rate
//! p = 1 - confidence. The likelihood ratio
//!
//! LR = -2 * (ln L(p) - ln L(pi_observed))
//!
//! is chi-square with 1 degree of freedom; rejection (LR above the 95%
//! critical value 3.841) means the model is miscalibrated in either
//! direction: too many exceptions or too few.

use super::binomial_log_likelihood;
use hobart_model::{KupiecTest, RiskError, TestStatus};
use hobart_stats::chi_square_cdf;

/// Chi-square critical value at 95%, 1 degree of freedom.
pub const CHI2_CRITICAL_1DF: f64 = 3.841;

/// Run the Kupiec test on an exception count.
///
/// # Errors
/// `InvalidParameter` for an empty window, exception count above the window
/// length, or an expected rate outside (0, 1).
pub fn kupiec_test(
    exceptions: usize,
    observations: usize,
    expected_rate: f64,
) -> Result<KupiecTest, RiskError> {
    if observations == 0 {
        return Err(RiskError::InvalidParameter(
            "Kupiec test requires at least one observation".to_string(),
        ));
    }
    if exceptions > observations {
        return Err(RiskError::InvalidParameter(format!(
            "exception count {exceptions} exceeds observation count {observations}"
        )));
    }
    if expected_rate <= 0.0 || expected_rate >= 1.0 {
        return Err(RiskError::InvalidParameter(format!(
            "expected exception rate must be in (0, 1), got {expected_rate}"
        )));
    }

    let observed_rate = exceptions as f64 / observations as f64;
    let ln_l0 = binomial_log_likelihood(exceptions, observations, expected_rate);
    let ln_l1 = binomial_log_likelihood(exceptions, observations, observed_rate);
    let lr = (-2.0 * (ln_l0 - ln_l1)).max(0.0);

    let p_value = 1.0 - chi_square_cdf(lr, 1.0)?;
    let reject_null = lr > CHI2_CRITICAL_1DF;
    let status = if reject_null {
        TestStatus::Failed
    } else {
        TestStatus::Passed
    };

    Ok(KupiecTest {
        status,
        lr_statistic: lr,
        critical_value: CHI2_CRITICAL_1DF,
        p_value,
        reject_null,
    })
}
