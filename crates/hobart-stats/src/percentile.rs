//! Loss-tail percentile extraction.
//!
//! Historical simulation and Monte Carlo both pick the return at
//! `floor((1 - confidence) * n)` in the ascending-sorted sample: the worst
//! 5% boundary at 95%, and so on.

use hobart_model::{ConfidenceLevel, RiskError};

/// Index of the loss-tail quantile in an ascending-sorted sample of size
/// `sample_size`: `floor((1 - confidence/100) * sample_size)`, clamped to the
/// last element.
pub fn percentile_index(confidence: ConfidenceLevel, sample_size: usize) -> usize {
    let raw = (confidence.tail_probability() * sample_size as f64).floor() as usize;
    raw.min(sample_size.saturating_sub(1))
}

/// Sort a sample ascending and return the loss-tail value for a confidence
/// level.
///
/// # Errors
/// `InvalidParameter` on an empty sample.
pub fn sorted_tail_value(sample: &mut [f64], confidence: ConfidenceLevel) -> Result<f64, RiskError> {
    if sample.is_empty() {
        return Err(RiskError::InvalidParameter(
            "percentile of an empty sample".to_string(),
        ));
    }
    sample.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Ok(sample[percentile_index(confidence, sample.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ConfidenceLevel::P95, 500, 25)]
    #[case(ConfidenceLevel::P99, 500, 5)]
    #[case(ConfidenceLevel::P999, 500, 0)]
    #[case(ConfidenceLevel::P95, 252, 12)]
    #[case(ConfidenceLevel::P99, 10_000, 100)]
    fn test_percentile_index(
        #[case] confidence: ConfidenceLevel,
        #[case] n: usize,
        #[case] expected: usize,
    ) {
        assert_eq!(percentile_index(confidence, n), expected);
    }

    #[test]
    fn test_index_clamped_for_tiny_samples() {
        // floor(0.05 * 10) = 0, fine; floor of a huge tail never exceeds n-1
        assert_eq!(percentile_index(ConfidenceLevel::P95, 1), 0);
    }

    #[test]
    fn test_tail_value_picks_sorted_element() {
        let mut sample = vec![0.03, -0.05, 0.01, -0.02, 0.00, 0.02, -0.01, 0.04, -0.03, 0.05];
        // n = 10, index = floor(0.05 * 10) = 0 -> worst return
        let value = sorted_tail_value(&mut sample, ConfidenceLevel::P95).unwrap();
        assert_eq!(value, -0.05);
    }

    #[test]
    fn test_empty_sample_rejected() {
        let mut sample: Vec<f64> = Vec::new();
        assert!(sorted_tail_value(&mut sample, ConfidenceLevel::P95).is_err());
    }
}
