//! Augmented Dickey-Fuller unit-root test and differencing-order selection.

use crate::error::ForecastError;
use crate::least_squares::solve;
use configuration::{ForecastConfig, Significance};
use nalgebra::{DMatrix, DVector};

/// Fewest observations the test runs on.
pub const MIN_ADF_OBSERVATIONS: usize = 8;

/// Outcome of one ADF test (regression with a constant, no trend).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdfResult {
    /// t-statistic of the lagged level. `-inf` for a zero-variance series.
    pub statistic: f64,
    pub lags: usize,
    /// Observations used in the test regression.
    pub observations: usize,
    pub critical_value: f64,
    /// True when the unit-root null is rejected.
    pub stationary: bool,
}

/// Differencing order picked by repeated ADF tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifferencingOrder {
    pub order: usize,
    /// The search hit the configured cap without rejecting a unit root.
    pub exhausted: bool,
}

/// MacKinnon (2010) finite-sample critical value for the constant-only ADF test.
pub fn critical_value(significance: Significance, observations: usize) -> f64 {
    let (b0, b1, b2) = match significance {
        Significance::OnePercent => (-3.43035, -6.5393, -16.786),
        Significance::FivePercent => (-2.86154, -2.8903, -4.234),
        Significance::TenPercent => (-2.56677, -1.5384, -2.809),
    };
    let t = observations as f64;
    b0 + b1 / t + b2 / (t * t)
}

/// Schwert's rule `floor(12 * (n / 100)^(1/4))`, capped so the regression keeps
/// more rows than parameters.
pub fn lag_order(n: usize) -> usize {
    let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).floor() as usize;
    schwert.min((n / 2).saturating_sub(2))
}

/// Runs the ADF test on `values` at the given significance level.
pub fn adf_test(values: &[f64], significance: Significance) -> Result<AdfResult, ForecastError> {
    let n = values.len();
    if n < MIN_ADF_OBSERVATIONS {
        return Err(ForecastError::InsufficientHistory { required: MIN_ADF_OBSERVATIONS, available: n });
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::InvalidData("unit-root test input has non-finite values".to_string()));
    }

    let lags = lag_order(n);
    let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    // Row t regresses diffs[t] on [1, values[t], diffs[t-1], ..., diffs[t-lags]].
    let rows = diffs.len() - lags;
    let cols = lags + 2;
    let critical = critical_value(significance, rows);

    if variance(values) < f64::EPSILON {
        return Ok(AdfResult {
            statistic: f64::NEG_INFINITY,
            lags,
            observations: rows,
            critical_value: critical,
            stationary: true,
        });
    }

    let design = DMatrix::from_fn(rows, cols, |r, c| {
        let t = r + lags;
        match c {
            0 => 1.0,
            1 => values[t],
            _ => diffs[t - (c - 1)],
        }
    });
    let target = DVector::from_iterator(rows, diffs[lags..].iter().copied());
    let fit = solve(&design, &target)?;

    let sigma2 = fit.rss() / (rows - cols) as f64;
    let perfect_fit = fit.rss() <= 1e-20 * target.norm_squared().max(f64::MIN_POSITIVE);
    let statistic = if perfect_fit {
        f64::NAN
    } else {
        design
            .tr_mul(&design)
            .try_inverse()
            .map(|inv| {
                let se = (sigma2 * inv[(1, 1)]).sqrt();
                fit.coefficients[1] / se
            })
            .unwrap_or(f64::NAN)
    };

    // NaN never compares below the critical value, so a perfect fit keeps the unit root.
    let stationary = statistic < critical;
    tracing::trace!(statistic, critical, lags, rows, stationary, "ADF test");
    Ok(AdfResult { statistic, lags, observations: rows, critical_value: critical, stationary })
}

/// `order`-th difference of `values`.
pub fn difference(values: &[f64], order: usize) -> Vec<f64> {
    let mut result = values.to_vec();
    for _ in 0..order {
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Smallest differencing order, up to `max_differencing_order`, at which the
/// ADF test rejects a unit root.
///
/// When no order up to the cap is stationary the cap is returned with
/// `exhausted` set; callers carry on with it and flag the forecast as low
/// confidence.
pub fn get_differencing_order(values: &[f64], config: &ForecastConfig) -> Result<DifferencingOrder, ForecastError> {
    let max_order = config.max_differencing_order;
    let mut series = values.to_vec();
    for order in 0..=max_order {
        let result = adf_test(&series, config.significance)?;
        if result.stationary {
            tracing::debug!(order, statistic = result.statistic, "Series is stationary");
            return Ok(DifferencingOrder { order, exhausted: false });
        }
        series = difference(&series, 1);
    }
    tracing::warn!(max_order, "No stationary differencing order found, using the cap");
    Ok(DifferencingOrder { order: max_order, exhausted: true })
}

fn variance(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn noise(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()
    }

    fn trending_walk(n: usize, seed: u64) -> Vec<f64> {
        let mut level = 100.0;
        noise(n, seed)
            .into_iter()
            .map(|e| {
                level += 0.5 + e;
                level
            })
            .collect()
    }

    #[test]
    fn critical_values_approach_asymptotic_table() {
        assert!((critical_value(Significance::FivePercent, 1_000_000) + 2.86154).abs() < 1e-4);
        // Finite samples need a more negative statistic.
        assert!(critical_value(Significance::OnePercent, 100) < -3.43035);
        assert!(critical_value(Significance::TenPercent, 100) > critical_value(Significance::FivePercent, 100));
    }

    #[test]
    fn lag_order_follows_schwert_rule() {
        assert_eq!(lag_order(100), 12);
        assert_eq!(lag_order(500), 17);
        assert_eq!(lag_order(10), 3);
    }

    #[test]
    fn rejects_unit_root_for_white_noise() {
        let result = adf_test(&noise(500, 7), Significance::FivePercent).unwrap();
        assert!(result.stationary, "statistic {}", result.statistic);
    }

    #[test]
    fn keeps_unit_root_for_trending_walk() {
        let result = adf_test(&trending_walk(500, 11), Significance::FivePercent).unwrap();
        assert!(!result.stationary, "statistic {}", result.statistic);
    }

    #[test]
    fn constant_series_is_stationary() {
        let result = adf_test(&[100.0; 300], Significance::FivePercent).unwrap();
        assert!(result.stationary);
        assert_eq!(
            get_differencing_order(&[100.0; 300], &ForecastConfig::default()).unwrap(),
            DifferencingOrder { order: 0, exhausted: false }
        );
    }

    #[test]
    fn trending_walks_need_one_difference() {
        // A 5% test wrongly rejects the unit root for a few draws, so judge the rate.
        let orders: Vec<DifferencingOrder> = (0..20)
            .map(|seed| get_differencing_order(&trending_walk(500, seed), &ForecastConfig::default()).unwrap())
            .collect();
        let once = orders.iter().filter(|o| o.order == 1).count();
        assert!(once >= 16, "only {once} of 20 walks were differenced once: {orders:?}");
        assert!(orders.iter().all(|o| o.order <= 1 && !o.exhausted), "{orders:?}");
    }

    #[test]
    fn exhausted_search_returns_the_cap() {
        let config = ForecastConfig { max_differencing_order: 0, ..ForecastConfig::default() };
        let order = get_differencing_order(&trending_walk(300, 5), &config).unwrap();
        assert_eq!(order, DifferencingOrder { order: 0, exhausted: true });
    }

    #[test]
    fn linear_trend_is_differenced_once() {
        let line: Vec<f64> = (0..200).map(|i| 10.0 + 0.25 * i as f64).collect();
        let order = get_differencing_order(&line, &ForecastConfig::default()).unwrap();
        assert_eq!(order.order, 1);
    }

    #[test]
    fn short_input_is_refused() {
        let err = adf_test(&[1.0, 2.0, 3.0], Significance::FivePercent).unwrap_err();
        assert_eq!(err, ForecastError::InsufficientHistory { required: 8, available: 3 });
    }

    #[test]
    fn difference_reduces_length_by_order() {
        assert_eq!(difference(&[1.0, 4.0, 9.0, 16.0], 1), vec![3.0, 5.0, 7.0]);
        assert_eq!(difference(&[1.0, 4.0, 9.0, 16.0], 2), vec![2.0, 2.0]);
    }
}
