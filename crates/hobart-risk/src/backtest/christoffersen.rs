//! Christoffersen independence and conditional coverage test.
//!
//! Models the exception indicator as a first-order Markov chain. Under the
//! null, the probability of an exception does not depend on whether
//! yesterday was one; volatility clustering the model fails to capture shows
//! up as a significantly higher post-exception probability. The
//! conditional-coverage statistic adds the Kupiec coverage term and is
//! chi-square with 2 degrees of freedom (95% critical value 5.991).

use super::{binomial_log_likelihood, clamp_probability};
use hobart_model::{ChristoffersenTest, RiskError, TestStatus};
use hobart_stats::chi_square_cdf;

/// Chi-square critical value at 95%, 2 degrees of freedom.
pub const CHI2_CRITICAL_2DF: f64 = 5.991;

fn safe_probability(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        clamp_probability(0.0)
    } else {
        clamp_probability(numerator as f64 / denominator as f64)
    }
}

/// Run the Christoffersen conditional-coverage test on an exception
/// indicator series.
///
/// # Errors
/// `InvalidParameter` with fewer than two observations or an expected rate
/// outside (0, 1).
pub fn christoffersen_test(
    hits: &[bool],
    expected_rate: f64,
) -> Result<ChristoffersenTest, RiskError> {
    if hits.len() < 2 {
        return Err(RiskError::InvalidParameter(
            "Christoffersen test requires at least two observations".to_string(),
        ));
    }
    if expected_rate <= 0.0 || expected_rate >= 1.0 {
        return Err(RiskError::InvalidParameter(format!(
            "expected exception rate must be in (0, 1), got {expected_rate}"
        )));
    }

    // First-order Markov transition counts over consecutive days.
    let mut n00 = 0usize;
    let mut n01 = 0usize;
    let mut n10 = 0usize;
    let mut n11 = 0usize;
    for t in 1..hits.len() {
        match (hits[t - 1], hits[t]) {
            (false, false) => n00 += 1,
            (false, true) => n01 += 1,
            (true, false) => n10 += 1,
            (true, true) => n11 += 1,
        }
    }

    let p01 = safe_probability(n01, n00 + n01);
    let p11 = safe_probability(n11, n10 + n11);
    let p_pooled = safe_probability(n01 + n11, n00 + n01 + n10 + n11);

    let ln_l0 = (n00 + n10) as f64 * (1.0 - p_pooled).ln()
        + (n01 + n11) as f64 * p_pooled.ln();
    let ln_l1 = n00 as f64 * (1.0 - p01).ln()
        + n01 as f64 * p01.ln()
        + n10 as f64 * (1.0 - p11).ln()
        + n11 as f64 * p11.ln();
    let lr_independence = (2.0 * (ln_l1 - ln_l0)).max(0.0);

    // Conditional coverage adds the Kupiec coverage term.
    let exceptions = hits.iter().filter(|&&h| h).count();
    let observed_rate = exceptions as f64 / hits.len() as f64;
    let lr_coverage = (-2.0
        * (binomial_log_likelihood(exceptions, hits.len(), expected_rate)
            - binomial_log_likelihood(exceptions, hits.len(), observed_rate)))
    .max(0.0);
    let lr = lr_coverage + lr_independence;

    let p_value = 1.0 - chi_square_cdf(lr, 2.0)?;
    let reject_null = lr > CHI2_CRITICAL_2DF;
    let status = if reject_null {
        TestStatus::Failed
    } else {
        TestStatus::Passed
    };

    Ok(ChristoffersenTest {
        status,
        lr_statistic: lr,
        critical_value: CHI2_CRITICAL_2DF,
        p_value,
        reject_null,
    })
}
