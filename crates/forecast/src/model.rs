use crate::arima::Arima;
use crate::error::ForecastError;
use chrono::{Days, NaiveDate};
use configuration::ForecastConfig;
use core_types::ForecastPoint;

/// Root mean squared error over the paired values.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return f64::NAN;
    }
    let sum: f64 = actual.iter().zip(predicted).map(|(a, p)| (a - p).powi(2)).sum();
    (sum / n as f64).sqrt()
}

/// Scores ARIMA(p, `order`, q) on the trailing `holdout` values of `scaled`.
///
/// The model is fitted on everything before the holdout, forecasts the
/// holdout horizon, and the RMSE is returned in scaled units.
pub fn evaluate_model(scaled: &[f64], order: usize, config: &ForecastConfig) -> Result<f64, ForecastError> {
    if config.holdout == 0 {
        return Err(ForecastError::InvalidParameters("holdout must be at least 1".to_string()));
    }
    let model = Arima::new(config.ar_order, order, config.ma_order)?;
    let required = config.holdout + model.min_observations();
    if scaled.len() < required {
        return Err(ForecastError::InsufficientHistory { required, available: scaled.len() });
    }

    let split = scaled.len() - config.holdout;
    let predicted = model.fit(&scaled[..split])?.forecast(config.holdout);
    let score = rmse(&scaled[split..], &predicted);
    tracing::info!(rmse = score, holdout = config.holdout, "Evaluated forecast model");
    Ok(score)
}

/// Refits on the whole series and forecasts `horizon` values, dated on the
/// consecutive calendar days after `last_date`.
pub fn get_forecast(
    scaled: &[f64],
    last_date: NaiveDate,
    order: usize,
    config: &ForecastConfig,
) -> Result<Vec<ForecastPoint>, ForecastError> {
    let model = Arima::new(config.ar_order, order, config.ma_order)?;
    let values = model.fit(scaled)?.forecast(config.horizon);
    let dates = forecast_dates(last_date, config.horizon)?;
    Ok(dates
        .into_iter()
        .zip(values)
        .map(|(date, value)| ForecastPoint { date, value })
        .collect())
}

/// The `horizon` calendar days following `last_date`.
pub fn forecast_dates(last_date: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>, ForecastError> {
    (1..=horizon as u64)
        .map(|offset| {
            last_date
                .checked_add_days(Days::new(offset))
                .ok_or_else(|| ForecastError::InvalidData(format!("forecast date {offset} days after {last_date}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rmse_of_known_errors() {
        assert_eq!(rmse(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]), 0.0);
        assert!((rmse(&[0.0, 0.0], &[3.0, 4.0]) - 12.5f64.sqrt()).abs() < 1e-12);
        assert!(rmse(&[], &[]).is_nan());
    }

    #[test]
    fn forecast_covers_the_next_thirty_days() {
        let last = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();
        let scaled: Vec<f64> = (0..200).map(|i| (i as f64 * 0.1).sin() * 0.4 + 0.5).collect();

        let points = get_forecast(&scaled, last, 0, &ForecastConfig::default()).unwrap();

        assert_eq!(points.len(), 30);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 2, 21).unwrap());
        assert!(points.iter().any(|p| p.date == NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        assert!(points.windows(2).all(|w| w[1].date == w[0].date.succ_opt().unwrap()));
        assert!(points.iter().all(|p| p.value.is_finite()));
    }

    #[test]
    fn evaluation_needs_holdout_plus_model_history() {
        let config = ForecastConfig::default();
        let err = evaluate_model(&[0.5; 40], 1, &config).unwrap_err();
        assert_eq!(err, ForecastError::InsufficientHistory { required: 47, available: 40 });
    }

    #[test]
    fn evaluation_of_a_flat_series_is_exact() {
        let score = evaluate_model(&[0.25; 120], 0, &ForecastConfig::default()).unwrap();
        assert!(score.abs() < 1e-12);
    }
}
