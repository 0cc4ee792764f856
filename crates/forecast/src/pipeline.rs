use crate::arima::Arima;
use crate::error::ForecastError;
use crate::model::{evaluate_model, get_forecast};
use crate::scaler::{inverse_scaling, scaling, MinMaxScaler};
use crate::smoothing::{get_rolling_mean, SmoothedSeries};
use crate::stationarity::get_differencing_order;
use configuration::ForecastConfig;
use core_types::{ForecastPoint, ForecastResult, PriceSeries};
use serde::Serialize;

/// Everything a prediction view needs: the forecast and the smoothed history it continues.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastOutput {
    pub result: ForecastResult,
    pub history: SmoothedSeries,
    pub scaler: MinMaxScaler,
}

/// Smoothing, differencing-order search, scaling, holdout evaluation and a
/// price-unit forecast, in that order.
#[derive(Debug, Clone)]
pub struct ForecastPipeline {
    config: ForecastConfig,
}

impl ForecastPipeline {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Fewest raw closes `run` accepts with the current configuration.
    pub fn required_history(&self) -> usize {
        let c = &self.config;
        c.rolling_window.saturating_sub(1) + c.holdout + c.ar_order + c.ma_order + c.max_differencing_order + 10
    }

    pub fn run(&self, series: &PriceSeries) -> Result<ForecastOutput, ForecastError> {
        let config = &self.config;
        // Reject unsupported orders before doing any work.
        Arima::new(config.ar_order, config.max_differencing_order, config.ma_order)?;

        let required = self.required_history();
        if series.len() < required {
            return Err(ForecastError::InsufficientHistory { required, available: series.len() });
        }

        let history = get_rolling_mean(series, config.rolling_window)?;
        let last_date = history
            .last_date()
            .ok_or(ForecastError::InsufficientHistory { required, available: series.len() })?;

        let differencing = get_differencing_order(&history.values, config)?;
        if differencing.exhausted {
            tracing::warn!(
                symbol = series.symbol(),
                order = differencing.order,
                "Series did not become stationary; forecast is low confidence"
            );
        }

        let (scaled, scaler) = scaling(&history.values)?;
        let rmse = evaluate_model(&scaled, differencing.order, config)?;
        let scaled_points = get_forecast(&scaled, last_date, differencing.order, config)?;

        let scaled_values: Vec<f64> = scaled_points.iter().map(|p| p.value).collect();
        let points = scaled_points
            .iter()
            .zip(inverse_scaling(&scaler, &scaled_values))
            .map(|(p, value)| ForecastPoint { date: p.date, value })
            .collect();

        tracing::info!(
            symbol = series.symbol(),
            order = differencing.order,
            rmse,
            horizon = config.horizon,
            "Forecast complete"
        );
        Ok(ForecastOutput {
            result: ForecastResult {
                points,
                rmse,
                differencing_order: differencing.order,
                low_confidence: differencing.exhausted,
            },
            history,
            scaler,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn series(closes: Vec<f64>) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        PriceSeries::from_closes(
            "NVDA",
            closes.into_iter().enumerate().map(|(i, c)| (start + Days::new(i as u64), c)),
        )
        .unwrap()
    }

    fn trending(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut price = 120.0;
        (0..n)
            .map(|_| {
                price += 0.2 + rng.gen_range(-1.5..1.5);
                price
            })
            .collect()
    }

    #[test]
    fn constant_prices_forecast_themselves() {
        let output = ForecastPipeline::new(ForecastConfig::default()).run(&series(vec![100.0; 300])).unwrap();

        assert_eq!(output.result.differencing_order, 0);
        assert!(!output.result.low_confidence);
        assert_eq!(output.result.points.len(), 30);
        for point in &output.result.points {
            assert!((point.value - 100.0).abs() < 1e-6);
        }
        assert!(output.result.rmse.abs() < 1e-9);
    }

    #[test]
    fn forecast_starts_the_day_after_the_last_close() {
        let input = series(trending(400, 17));
        let output = ForecastPipeline::new(ForecastConfig::default()).run(&input).unwrap();

        let last = input.last_date().unwrap();
        assert_eq!(output.history.last_date(), Some(last));
        assert_eq!(output.history.len(), 394);
        let points = &output.result.points;
        assert_eq!(points.len(), 30);
        assert_eq!(points[0].date, last + Days::new(1));
        assert!(points.windows(2).all(|w| w[0].date < w[1].date));
        assert!(points.iter().all(|p| p.value.is_finite()));
        assert!(output.result.rmse.is_finite() && output.result.rmse >= 0.0);
    }

    #[test]
    fn exhausted_search_is_flagged_low_confidence() {
        let config = ForecastConfig { max_differencing_order: 0, ..ForecastConfig::default() };
        let output = ForecastPipeline::new(config).run(&series(trending(400, 23))).unwrap();
        assert!(output.result.low_confidence);
        assert_eq!(output.result.differencing_order, 0);
    }

    #[test]
    fn short_history_is_refused() {
        let pipeline = ForecastPipeline::new(ForecastConfig::default());
        let err = pipeline.run(&series(vec![50.0; 40])).unwrap_err();
        assert_eq!(err, ForecastError::InsufficientHistory { required: 54, available: 40 });
    }
}
