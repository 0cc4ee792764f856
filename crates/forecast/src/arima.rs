//! ARIMA(p, d, q) estimation and recursive forecasting.
//!
//! The ARMA part is fitted on the `d`-times differenced series with the
//! Hannan-Rissanen procedure: a long autoregression supplies proxies for the
//! unobserved innovations, then the series is regressed on its own `p` lags
//! and `q` lagged innovation proxies with an intercept. Both stages are plain
//! least squares. Forecasts set future innovations to zero and are integrated
//! back through every differencing level.

use crate::error::ForecastError;
use crate::least_squares::solve;
use crate::stationarity::difference;
use nalgebra::{DMatrix, DVector};

/// Upper bound on the order of the innovation-proxy autoregression.
const LONG_AR_ORDER: usize = 20;

/// Extra observations required on top of `p + d + q`.
const MIN_EXTRA_OBSERVATIONS: usize = 10;

/// An unfitted ARIMA(p, d, q) model order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arima {
    p: usize,
    d: usize,
    q: usize,
}

/// Estimated ARIMA model, ready to forecast from the end of its training data.
#[derive(Debug, Clone)]
pub struct FittedArima {
    model: Arima,
    intercept: f64,
    ar: Vec<f64>,
    ma: Vec<f64>,
    /// Last value of each differencing level `0..d`.
    anchors: Vec<f64>,
    /// The differenced series the ARMA part models.
    series: Vec<f64>,
    /// In-sample innovations aligned with `series`; zero before the first fitted row.
    residuals: Vec<f64>,
}

impl Arima {
    pub fn new(p: usize, d: usize, q: usize) -> Result<Self, ForecastError> {
        if p > 10 {
            return Err(ForecastError::InvalidParameters("AR order must be <= 10".to_string()));
        }
        if d > 2 {
            return Err(ForecastError::InvalidParameters("differencing order must be <= 2".to_string()));
        }
        if q > 10 {
            return Err(ForecastError::InvalidParameters("MA order must be <= 10".to_string()));
        }
        Ok(Self { p, d, q })
    }

    pub fn order(&self) -> (usize, usize, usize) {
        (self.p, self.d, self.q)
    }

    /// Fewest observations `fit` accepts.
    pub fn min_observations(&self) -> usize {
        self.p + self.d + self.q + MIN_EXTRA_OBSERVATIONS
    }

    pub fn fit(&self, data: &[f64]) -> Result<FittedArima, ForecastError> {
        let required = self.min_observations();
        if data.len() < required {
            return Err(ForecastError::InsufficientHistory { required, available: data.len() });
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::InvalidData("ARIMA input has non-finite values".to_string()));
        }

        let mut anchors = Vec::with_capacity(self.d);
        let mut series = data.to_vec();
        for _ in 0..self.d {
            if let Some(&last) = series.last() {
                anchors.push(last);
            }
            series = difference(&series, 1);
        }

        let mean = series.iter().sum::<f64>() / series.len() as f64;
        if series.iter().all(|v| (v - mean).abs() < 1e-12) {
            // A flat (differenced) series forecasts its own level.
            return Ok(FittedArima {
                model: *self,
                intercept: mean,
                ar: vec![0.0; self.p],
                ma: vec![0.0; self.q],
                anchors,
                residuals: vec![0.0; series.len()],
                series,
            });
        }

        let (innovations, start) = if self.q > 0 {
            let long_order = LONG_AR_ORDER.min(series.len() / 4).max(self.p + self.q);
            let proxies = long_ar_residuals(&series, long_order)?;
            (proxies, (long_order + self.q).max(self.p))
        } else {
            (vec![0.0; series.len()], self.p)
        };

        let cols = 1 + self.p + self.q;
        let rows = series.len().saturating_sub(start);
        if rows <= cols {
            return Err(ForecastError::Fit(format!(
                "{rows} usable rows for {cols} ARMA parameters"
            )));
        }

        let design = DMatrix::from_fn(rows, cols, |r, c| {
            let t = start + r;
            if c == 0 {
                1.0
            } else if c <= self.p {
                series[t - c]
            } else {
                innovations[t - (c - self.p)]
            }
        });
        let target = DVector::from_iterator(rows, series[start..].iter().copied());
        let fit = solve(&design, &target)?;

        let coefficients = fit.coefficients.as_slice();
        let mut residuals = vec![0.0; series.len()];
        residuals[start..].copy_from_slice(fit.residuals.as_slice());

        let fitted = FittedArima {
            model: *self,
            intercept: coefficients[0],
            ar: coefficients[1..=self.p].to_vec(),
            ma: coefficients[self.p + 1..].to_vec(),
            anchors,
            series,
            residuals,
        };
        tracing::debug!(
            p = self.p,
            d = self.d,
            q = self.q,
            intercept = fitted.intercept,
            ar = ?fitted.ar,
            ma = ?fitted.ma,
            "Fitted ARIMA model"
        );
        Ok(fitted)
    }
}

impl FittedArima {
    pub fn model(&self) -> Arima {
        self.model
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma
    }

    /// Forecasts `steps` values past the end of the training data, in the
    /// units of the undifferenced input.
    pub fn forecast(&self, steps: usize) -> Vec<f64> {
        let mut series = self.series.clone();
        let mut shocks = self.residuals.clone();

        for _ in 0..steps {
            let t = series.len();
            let ar: f64 = self
                .ar
                .iter()
                .enumerate()
                .filter_map(|(i, phi)| t.checked_sub(i + 1).map(|k| phi * series[k]))
                .sum();
            let ma: f64 = self
                .ma
                .iter()
                .enumerate()
                .filter_map(|(j, theta)| t.checked_sub(j + 1).map(|k| theta * shocks[k]))
                .sum();
            series.push(self.intercept + ar + ma);
            shocks.push(0.0);
        }

        let mut forecast = series.split_off(self.series.len());
        for &anchor in self.anchors.iter().rev() {
            let mut level = anchor;
            for value in forecast.iter_mut() {
                level += *value;
                *value = level;
            }
        }
        forecast
    }
}

/// Residuals of an AR(`order`) fit with intercept, zero for the first `order` rows.
fn long_ar_residuals(series: &[f64], order: usize) -> Result<Vec<f64>, ForecastError> {
    let rows = series.len().saturating_sub(order);
    let design = DMatrix::from_fn(rows, order + 1, |r, c| {
        if c == 0 { 1.0 } else { series[order + r - c] }
    });
    let target = DVector::from_iterator(rows, series[order..].iter().copied());
    let fit = solve(&design, &target)?;

    let mut residuals = vec![0.0; series.len()];
    residuals[order..].copy_from_slice(fit.residuals.as_slice());
    Ok(residuals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn ar1(phi: f64, n: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut x = 0.0;
        (0..n)
            .map(|_| {
                x = phi * x + rng.gen_range(-1.0..1.0);
                x
            })
            .collect()
    }

    #[test]
    fn rejects_out_of_range_orders() {
        assert!(Arima::new(11, 0, 0).is_err());
        assert!(Arima::new(1, 3, 0).is_err());
        assert!(Arima::new(1, 1, 11).is_err());
        assert_eq!(Arima::new(5, 1, 1).unwrap().min_observations(), 17);
    }

    #[test]
    fn recovers_ar1_coefficient() {
        let data = ar1(0.6, 3000, 42);
        let fitted = Arima::new(1, 0, 0).unwrap().fit(&data).unwrap();
        assert!((fitted.ar_coefficients()[0] - 0.6).abs() < 0.05, "phi = {}", fitted.ar_coefficients()[0]);
        assert!(fitted.intercept().abs() < 0.05);
    }

    #[test]
    fn arma_fit_forecasts_finite_values() {
        let data = ar1(0.5, 600, 9);
        let fitted = Arima::new(5, 0, 1).unwrap().fit(&data).unwrap();
        assert_eq!(fitted.ma_coefficients().len(), 1);
        let forecast = fitted.forecast(30);
        assert_eq!(forecast.len(), 30);
        assert!(forecast.iter().all(|v| v.is_finite()));
        // Stationary forecasts decay toward the mean.
        assert!(forecast[29].abs() < 0.5);
    }

    #[test]
    fn first_difference_continues_a_line() {
        let line: Vec<f64> = (0..50).map(|i| 3.0 + 2.0 * i as f64).collect();
        let forecast = Arima::new(2, 1, 1).unwrap().fit(&line).unwrap().forecast(3);
        assert_eq!(forecast, vec![103.0, 105.0, 107.0]);
    }

    #[test]
    fn second_difference_continues_a_parabola() {
        let squares: Vec<f64> = (0..50).map(|i| (i * i) as f64).collect();
        let forecast = Arima::new(1, 2, 0).unwrap().fit(&squares).unwrap().forecast(2);
        assert_eq!(forecast, vec![2500.0, 2601.0]);
    }

    #[test]
    fn too_little_data_is_insufficient_history() {
        let err = Arima::new(5, 1, 1).unwrap().fit(&[1.0; 10]).unwrap_err();
        assert_eq!(err, ForecastError::InsufficientHistory { required: 17, available: 10 });
    }

    #[test]
    fn non_finite_input_is_invalid() {
        let mut data = vec![1.0; 30];
        data[4] = f64::INFINITY;
        assert!(matches!(Arima::new(1, 0, 0).unwrap().fit(&data), Err(ForecastError::InvalidData(_))));
    }
}
