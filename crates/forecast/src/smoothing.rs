use crate::error::ForecastError;
use chrono::NaiveDate;
use core_types::PriceSeries;
use serde::Serialize;

/// A date-indexed series of smoothed closes.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SmoothedSeries {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

impl SmoothedSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}

/// Trailing mean of `window` values. The first `window - 1` positions have no
/// full window and are dropped, so the output is `window - 1` shorter.
pub fn rolling_mean(values: &[f64], window: usize) -> Result<Vec<f64>, ForecastError> {
    if window == 0 {
        return Err(ForecastError::InvalidParameters("rolling window must be at least 1".to_string()));
    }
    if values.len() < window {
        return Ok(Vec::new());
    }

    let mut sum: f64 = values[..window].iter().sum();
    let mut means = Vec::with_capacity(values.len() - window + 1);
    means.push(sum / window as f64);
    for i in window..values.len() {
        sum += values[i] - values[i - window];
        means.push(sum / window as f64);
    }
    Ok(means)
}

/// Rolling mean of a price series' closes, keeping the dates of each full window's last row.
pub fn get_rolling_mean(series: &PriceSeries, window: usize) -> Result<SmoothedSeries, ForecastError> {
    let closes = series.closes();
    if closes.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::InvalidData(format!("{} has non-finite closes", series.symbol())));
    }
    let values = rolling_mean(&closes, window)?;
    let dates = series.dates()[series.len() - values.len()..].to_vec();
    Ok(SmoothedSeries { dates, values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    #[test]
    fn drops_incomplete_leading_windows() {
        let means = rolling_mean(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
        assert_eq!(means, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn short_input_gives_nothing() {
        assert!(rolling_mean(&[1.0, 2.0], 7).unwrap().is_empty());
        assert!(rolling_mean(&[1.0], 0).is_err());
    }

    #[test]
    fn keeps_dates_aligned_to_window_end() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let series = PriceSeries::from_closes(
            "MSFT",
            (0..10).map(|i| (start + Days::new(i), i as f64)),
        )
        .unwrap();

        let smoothed = get_rolling_mean(&series, 7).unwrap();

        assert_eq!(smoothed.len(), 4);
        assert_eq!(smoothed.dates[0], start + Days::new(6));
        assert_eq!(smoothed.values[0], 3.0);
        assert_eq!(smoothed.last_date(), series.last_date());
    }
}
