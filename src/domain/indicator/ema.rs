//! Exponentially weighted moving average over closing prices, by span.
//!
//! alpha = 2/(span+1). Every close from the first one counts, weighted by
//! (1-alpha)^age and normalised by the sum of the weights:
//!
//! EWM[t] = sum(w^i * C[t-i]) / sum(w^i), w = 1 - alpha, i = 0..=t
//!
//! There is no warmup and no SMA seed.

pub fn calculate_ewm(closes: &[f64], span: usize) -> Vec<f64> {
    if span == 0 {
        return Vec::new();
    }

    let decay = 1.0 - 2.0 / (span as f64 + 1.0);
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;

    closes
        .iter()
        .map(|&close| {
            weighted_sum = close + decay * weighted_sum;
            weight_total = 1.0 + decay * weight_total;
            weighted_sum / weight_total
        })
        .collect()
}

/// Most recent EWM value, `None` for an empty series or zero span.
pub fn latest_ewm(closes: &[f64], span: usize) -> Option<f64> {
    calculate_ewm(closes, span).last().copied()
}
