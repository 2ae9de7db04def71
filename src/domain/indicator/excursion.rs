//! Drawdown and run-up of the last close within a lookback window.
//!
//! drawdown = (last - max) / max * 100   (<= 0)
//! run-up   = (last - min) / min * 100   (>= 0)
//! A non-positive reference price yields 0.

/// Last `lookback` closes, or the whole series when shorter. A lookback of
/// 0 selects the whole series.
fn window(closes: &[f64], lookback: usize) -> &[f64] {
    if lookback == 0 || lookback >= closes.len() {
        closes
    } else {
        &closes[closes.len() - lookback..]
    }
}

pub fn drawdown_pct(closes: &[f64], lookback: usize) -> f64 {
    let window = window(closes, lookback);
    let Some(&last) = window.last() else {
        return 0.0;
    };
    let high = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if high <= 0.0 {
        return 0.0;
    }
    (last - high) / high * 100.0
}

pub fn runup_pct(closes: &[f64], lookback: usize) -> f64 {
    let window = window(closes, lookback);
    let Some(&last) = window.last() else {
        return 0.0;
    };
    let low = window.iter().copied().fold(f64::INFINITY, f64::min);
    if low <= 0.0 {
        return 0.0;
    }
    (last - low) / low * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn empty_series_is_neutral() {
        assert_eq!(drawdown_pct(&[], 20), 0.0);
        assert_eq!(runup_pct(&[], 20), 0.0);
    }

    #[test]
    fn drawdown_full_window() {
        let closes = [100.0, 98.0, 95.0, 90.0, 85.0, 80.0, 78.0, 75.0];
        assert_relative_eq!(drawdown_pct(&closes, 120), -25.0);
    }

    #[test]
    fn drawdown_respects_lookback() {
        // peak of 200 falls outside the last three closes
        let closes = [200.0, 100.0, 110.0, 99.0];
        assert_relative_eq!(drawdown_pct(&closes, 3), -10.0);
        assert_relative_eq!(drawdown_pct(&closes, 0), -50.5);
    }

    #[test]
    fn drawdown_zero_at_new_high() {
        assert_eq!(drawdown_pct(&[10.0, 11.0, 12.0], 10), 0.0);
    }

    #[test]
    fn runup_from_window_low() {
        let closes = [50.0, 40.0, 44.0, 48.0];
        assert_relative_eq!(runup_pct(&closes, 10), 20.0);
    }

    #[test]
    fn non_positive_reference_is_zero() {
        assert_eq!(drawdown_pct(&[0.0, -1.0, -2.0], 10), 0.0);
        assert_eq!(runup_pct(&[0.0, 5.0, 10.0], 10), 0.0);
    }

    proptest! {
        #[test]
        fn drawdown_never_positive_runup_never_negative(
            closes in prop::collection::vec(0.01f64..10_000.0, 1..80),
            lookback in 0usize..100,
        ) {
            prop_assert!(drawdown_pct(&closes, lookback) <= 0.0);
            prop_assert!(runup_pct(&closes, lookback) >= 0.0);
        }
    }
}
