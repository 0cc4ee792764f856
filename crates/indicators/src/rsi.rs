/// Wilder's relative strength index aligned with `prices`.
///
/// The first `period` rows are `None`: the first value needs `period` price
/// changes, i.e. `period + 1` prices. Average gain and loss are seeded with a
/// simple mean and then smoothed with `alpha = 1 / period`.
///
/// A window with neither gains nor losses reads 50; one with gains but no
/// losses reads 100. Output is always within [0, 100].
pub fn rsi(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; prices.len()];
    if period == 0 || prices.len() <= period {
        return result;
    }

    let changes: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let gain = |c: f64| c.max(0.0);
    let loss = |c: f64| (-c).max(0.0);

    let period_f = period as f64;
    let mut avg_gain = changes[..period].iter().map(|&c| gain(c)).sum::<f64>() / period_f;
    let mut avg_loss = changes[..period].iter().map(|&c| loss(c)).sum::<f64>() / period_f;
    result[period] = Some(strength_index(avg_gain, avg_loss));

    for (i, &change) in changes.iter().enumerate().skip(period) {
        avg_gain = (avg_gain * (period_f - 1.0) + gain(change)) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss(change)) / period_f;
        result[i + 1] = Some(strength_index(avg_gain, avg_loss));
    }

    result
}

fn strength_index(avg_gain: f64, avg_loss: f64) -> f64 {
    let value = if avg_loss <= f64::EPSILON {
        if avg_gain <= f64::EPSILON { 50.0 } else { 100.0 }
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    };
    value.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_period_rows_are_absent() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64 * 0.9).sin() * 5.0).collect();
        let out = rsi(&prices, 14);
        assert!(out[..14].iter().all(Option::is_none));
        assert!(out[14..].iter().all(Option::is_some));
    }

    #[test]
    fn values_are_bounded() {
        let prices: Vec<f64> = (0..200)
            .map(|i| 50.0 + ((i * 37 % 17) as f64 - 8.0) * 1.3 + i as f64 * 0.05)
            .collect();
        for value in rsi(&prices, 14).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn monotonic_series_hit_the_bounds() {
        let rising: Vec<f64> = (0..20).map(f64::from).collect();
        let falling: Vec<f64> = rising.iter().rev().copied().collect();
        assert_eq!(rsi(&rising, 14)[19], Some(100.0));
        assert_eq!(rsi(&falling, 14)[19], Some(0.0));
        assert_eq!(rsi(&[5.0; 20], 14)[19], Some(50.0));
    }

    #[test]
    fn textbook_seed_value() {
        // 7 gains of 1 and 7 losses of 1 in the seed window -> RS = 1 -> RSI = 50.
        let mut prices = vec![10.0];
        for i in 0..14 {
            let last = *prices.last().unwrap();
            prices.push(if i % 2 == 0 { last + 1.0 } else { last - 1.0 });
        }
        let out = rsi(&prices, 14);
        assert!((out[14].unwrap() - 50.0).abs() < 1e-12);
    }

    #[test]
    fn short_input_is_all_absent() {
        assert!(rsi(&[1.0, 2.0, 3.0], 14).iter().all(Option::is_none));
    }
}
