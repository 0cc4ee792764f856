use crate::error::IndicatorError;
use ta::Next;
use ta::indicators::MovingAverageConvergenceDivergence as Macd;

/// The three MACD output columns, aligned with the input prices.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdColumns {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

/// MACD line (fast EMA - slow EMA), its signal EMA and the histogram.
///
/// The MACD line is absent until the slow EMA has seen `slow` prices; the
/// signal and histogram until the signal EMA has seen `signal` MACD values,
/// i.e. for the first `slow + signal - 2` rows.
pub fn macd(prices: &[f64], fast: usize, slow: usize, signal: usize) -> Result<MacdColumns, IndicatorError> {
    if fast >= slow {
        return Err(IndicatorError::InvalidParameters(format!(
            "MACD fast period ({fast}) must be below slow period ({slow})"
        )));
    }
    let mut indicator = Macd::new(fast, slow, signal)
        .map_err(|e| IndicatorError::InvalidParameters(format!("MACD({fast}, {slow}, {signal}): {e:?}")))?;

    let line_ready = slow.saturating_sub(1);
    let signal_ready = (slow + signal).saturating_sub(2);

    let mut columns = MacdColumns {
        macd: Vec::with_capacity(prices.len()),
        signal: Vec::with_capacity(prices.len()),
        histogram: Vec::with_capacity(prices.len()),
    };
    for (i, &price) in prices.iter().enumerate() {
        let out = indicator.next(price);
        columns.macd.push((i >= line_ready).then_some(out.macd));
        columns.signal.push((i >= signal_ready).then_some(out.signal));
        columns.histogram.push((i >= signal_ready).then_some(out.histogram));
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + (i as f64 * 0.3).sin() * 4.0 + i as f64 * 0.2).collect()
    }

    #[test]
    fn lookback_rows_are_absent() {
        let out = macd(&prices(80), 12, 26, 9).unwrap();
        assert!(out.macd[..25].iter().all(Option::is_none));
        assert!(out.macd[25..].iter().all(Option::is_some));
        assert!(out.signal[..33].iter().all(Option::is_none));
        assert!(out.signal[33..].iter().all(Option::is_some));
        assert!(out.histogram[..33].iter().all(Option::is_none));
    }

    #[test]
    fn histogram_is_macd_minus_signal() {
        let out = macd(&prices(80), 12, 26, 9).unwrap();
        for i in 33..80 {
            let expected = out.macd[i].unwrap() - out.signal[i].unwrap();
            assert!((out.histogram[i].unwrap() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn constant_prices_have_zero_macd() {
        let out = macd(&[42.0; 60], 12, 26, 9).unwrap();
        for value in out.macd.into_iter().flatten() {
            assert!(value.abs() < 1e-12);
        }
    }

    #[test]
    fn fast_must_be_below_slow() {
        assert!(macd(&prices(10), 26, 12, 9).is_err());
    }
}
