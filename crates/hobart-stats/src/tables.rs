//! Confidence and horizon lookup tables.
//!
//! Both tables are exact: the supported confidence levels and horizons are
//! closed enums, so unsupported values are rejected when a request is parsed
//! and the lookups themselves are infallible. There is no interpolation
//! between table entries.

use hobart_model::{ConfidenceLevel, TimeHorizon};

/// One-sided standard normal quantile for a confidence level.
///
/// Fixed table: 95 -> 1.645, 99 -> 2.326, 99.9 -> 3.09.
pub const fn z_score(confidence: ConfidenceLevel) -> f64 {
    match confidence {
        ConfidenceLevel::P95 => 1.645,
        ConfidenceLevel::P99 => 2.326,
        ConfidenceLevel::P999 => 3.09,
    }
}

/// Trading-day count for a horizon.
///
/// Fixed table: 1D -> 1, 1W -> 5, 2W -> 10, 1M -> 21, 3M -> 63, 6M -> 126,
/// 1Y -> 252.
pub const fn trading_days(horizon: TimeHorizon) -> u32 {
    match horizon {
        TimeHorizon::OneDay => 1,
        TimeHorizon::OneWeek => 5,
        TimeHorizon::TwoWeeks => 10,
        TimeHorizon::OneMonth => 21,
        TimeHorizon::ThreeMonths => 63,
        TimeHorizon::SixMonths => 126,
        TimeHorizon::OneYear => 252,
    }
}

/// Square-root-of-time scaling factor for a horizon.
pub fn time_scaling_factor(horizon: TimeHorizon) -> f64 {
    f64::from(trading_days(horizon)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(ConfidenceLevel::P95, 1.645)]
    #[case(ConfidenceLevel::P99, 2.326)]
    #[case(ConfidenceLevel::P999, 3.09)]
    fn test_z_score_table(#[case] confidence: ConfidenceLevel, #[case] expected: f64) {
        assert_eq!(z_score(confidence), expected);
    }

    #[rstest]
    #[case(TimeHorizon::OneDay, 1)]
    #[case(TimeHorizon::OneWeek, 5)]
    #[case(TimeHorizon::TwoWeeks, 10)]
    #[case(TimeHorizon::OneMonth, 21)]
    #[case(TimeHorizon::ThreeMonths, 63)]
    #[case(TimeHorizon::SixMonths, 126)]
    #[case(TimeHorizon::OneYear, 252)]
    fn test_trading_day_table(#[case] horizon: TimeHorizon, #[case] expected: u32) {
        assert_eq!(trading_days(horizon), expected);
    }

    #[test]
    fn test_scaling_is_sqrt_of_days() {
        assert_relative_eq!(
            time_scaling_factor(TimeHorizon::OneMonth),
            21.0_f64.sqrt(),
            max_relative = 1e-15
        );
        assert_eq!(time_scaling_factor(TimeHorizon::OneDay), 1.0);
    }
}
