use crate::error::AnalyticsError;
use crate::report::{CapmReport, ScatterPoint};
use crate::returns::annualized_mean;
use configuration::CapmConfig;
use core_types::{AlignedTable, BetaRegime, RegressionResult, VolatilityClass};

/// A stateless calculator for CAPM beta, alpha and expected return.
///
/// The engine works on a table of daily returns (see [`crate::daily_return`])
/// in which one column is the benchmark: the table's marked benchmark column,
/// or else the column named `CapmConfig::benchmark_label`.
#[derive(Debug, Clone)]
pub struct CapmEngine {
    config: CapmConfig,
}

impl CapmEngine {
    pub fn new(config: CapmConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CapmConfig {
        &self.config
    }

    /// Ordinary least-squares fit of `instrument` returns on benchmark returns.
    ///
    /// # Returns
    ///
    /// The slope (beta) and intercept (alpha), or `InsufficientOverlap` when the
    /// table has fewer than `min_overlap` rows.
    pub fn calculate_beta(
        &self,
        returns: &AlignedTable,
        instrument: &str,
    ) -> Result<RegressionResult, AnalyticsError> {
        let market = self.benchmark_returns(returns)?;
        let stock = returns
            .column(instrument)
            .ok_or_else(|| AnalyticsError::UnknownColumn(instrument.to_string()))?;

        // A line fit needs two points; anything below the configured minimum is unstable.
        let required = self.config.min_overlap.max(2);
        if returns.len() < required {
            return Err(AnalyticsError::InsufficientOverlap { required, actual: returns.len() });
        }

        let result = linear_fit(market, stock)?;
        tracing::debug!(
            instrument,
            beta = result.beta,
            alpha = result.alpha,
            observations = result.observations,
            "Fitted CAPM regression"
        );
        Ok(result)
    }

    /// Annualized mean of the benchmark's daily returns.
    pub fn market_return(&self, returns: &AlignedTable) -> Result<f64, AnalyticsError> {
        let market = self.benchmark_returns(returns)?;
        annualized_mean(market, self.config.trading_days)
            .ok_or_else(|| AnalyticsError::InsufficientOverlap { required: 1, actual: 0 })
    }

    /// CAPM expected return with the configured risk-free rate.
    pub fn expected_return(&self, beta: f64, benchmark_returns: &[f64]) -> Result<f64, AnalyticsError> {
        expected_return(beta, benchmark_returns, self.config.risk_free_rate, self.config.trading_days)
    }

    /// Runs the regression and derives the full per-instrument report.
    pub fn analyze(&self, returns: &AlignedTable, instrument: &str) -> Result<CapmReport, AnalyticsError> {
        let regression = self.calculate_beta(returns, instrument)?;
        let market = self.benchmark_returns(returns)?;
        let expected = self.expected_return(regression.beta, market)?;
        Ok(CapmReport {
            symbol: instrument.to_string(),
            regression,
            expected_return: expected,
            volatility: VolatilityClass::from_beta(regression.beta),
            regime: BetaRegime::from_beta(regression.beta),
        })
    }

    /// Scatter pairs of (benchmark, instrument) returns with the fitted line value.
    pub fn regression_points(
        &self,
        returns: &AlignedTable,
        instrument: &str,
        regression: &RegressionResult,
    ) -> Result<Vec<ScatterPoint>, AnalyticsError> {
        let market = self.benchmark_returns(returns)?;
        let stock = returns
            .column(instrument)
            .ok_or_else(|| AnalyticsError::UnknownColumn(instrument.to_string()))?;
        Ok(market
            .iter()
            .zip(stock)
            .map(|(&x, &y)| ScatterPoint { market: x, instrument: y, fitted: regression.fitted(x) })
            .collect())
    }

    /// The table's marked benchmark column, or the configured label when none is marked.
    fn benchmark_returns<'a>(&self, returns: &'a AlignedTable) -> Result<&'a [f64], AnalyticsError> {
        let label = returns.benchmark_name().unwrap_or(&self.config.benchmark_label);
        returns
            .column(label)
            .ok_or_else(|| AnalyticsError::UnknownColumn(label.to_string()))
    }
}

/// `risk_free_rate + beta * (annualized_mean(benchmark_returns) - risk_free_rate)`.
///
/// Units follow the inputs: with returns in percent (as produced by
/// `daily_return`) the rate and the result are annual percentages.
pub fn expected_return(
    beta: f64,
    benchmark_returns: &[f64],
    risk_free_rate: f64,
    trading_days: u32,
) -> Result<f64, AnalyticsError> {
    let market = annualized_mean(benchmark_returns, trading_days)
        .ok_or_else(|| AnalyticsError::InsufficientOverlap { required: 1, actual: 0 })?;
    Ok(risk_free_rate + beta * (market - risk_free_rate))
}

/// Degree-1 least-squares fit of `y` on `x`.
fn linear_fit(x: &[f64], y: &[f64]) -> Result<RegressionResult, AnalyticsError> {
    let n = x.len().min(y.len());
    if n < 2 {
        return Err(AnalyticsError::InsufficientOverlap { required: 2, actual: n });
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(AnalyticsError::Degenerate("returns contain non-finite values".to_string()));
    }

    let n_f = n as f64;
    let mean_x = x.iter().sum::<f64>() / n_f;
    let mean_y = y.iter().sum::<f64>() / n_f;

    let (ss_xy, ss_xx) = x
        .iter()
        .zip(y)
        .fold((0.0, 0.0), |(sxy, sxx), (&xi, &yi)| {
            let dx = xi - mean_x;
            (sxy + dx * (yi - mean_y), sxx + dx * dx)
        });

    if ss_xx.abs() < f64::EPSILON {
        return Err(AnalyticsError::Degenerate("benchmark returns have zero variance".to_string()));
    }

    let beta = ss_xy / ss_xx;
    let alpha = mean_y - beta * mean_x;
    Ok(RegressionResult { beta, alpha, observations: n })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::returns::daily_return;
    use chrono::{Days, NaiveDate};
    use core_types::Column;

    fn returns_table(instrument: Vec<f64>, market: Vec<f64>) -> AlignedTable {
        let dates = (0..market.len())
            .map(|i| NaiveDate::from_ymd_opt(2022, 6, 1).unwrap() + Days::new(i as u64))
            .collect();
        AlignedTable::from_columns(
            dates,
            vec![
                Column { name: "TSLA".to_string(), values: instrument },
                Column { name: "sp500".to_string(), values: market },
            ],
        )
        .unwrap()
    }

    fn market_returns(n: usize) -> Vec<f64> {
        (0..n).map(|i| ((i * 7 % 11) as f64 - 5.0) * 0.3).collect()
    }

    #[test]
    fn identical_series_have_unit_beta_and_zero_alpha() {
        let market = market_returns(40);
        let table = returns_table(market.clone(), market);

        let result = CapmEngine::new(CapmConfig::default()).calculate_beta(&table, "TSLA").unwrap();

        assert!((result.beta - 1.0).abs() < 1e-9);
        assert!(result.alpha.abs() < 1e-9);
        assert_eq!(result.observations, 40);
    }

    #[test]
    fn recovers_known_slope_and_intercept() {
        let market = market_returns(60);
        let stock = market.iter().map(|m| 1.8 * m + 0.05).collect();
        let table = returns_table(stock, market);

        let result = CapmEngine::new(CapmConfig::default()).calculate_beta(&table, "TSLA").unwrap();

        assert!((result.beta - 1.8).abs() < 1e-9);
        assert!((result.alpha - 0.05).abs() < 1e-9);
    }

    #[test]
    fn refuses_fewer_than_ten_observations() {
        let market = market_returns(9);
        let table = returns_table(market.clone(), market);

        let err = CapmEngine::new(CapmConfig::default()).calculate_beta(&table, "TSLA").unwrap_err();

        assert_eq!(err, AnalyticsError::InsufficientOverlap { required: 10, actual: 9 });
    }

    #[test]
    fn unknown_instrument_is_reported() {
        let market = market_returns(20);
        let table = returns_table(market.clone(), market);

        let err = CapmEngine::new(CapmConfig::default()).calculate_beta(&table, "NFLX").unwrap_err();

        assert_eq!(err, AnalyticsError::UnknownColumn("NFLX".to_string()));
    }

    #[test]
    fn flat_benchmark_is_degenerate() {
        let table = returns_table(market_returns(20), vec![0.0; 20]);
        let err = CapmEngine::new(CapmConfig::default()).calculate_beta(&table, "TSLA").unwrap_err();
        assert!(matches!(err, AnalyticsError::Degenerate(_)));
    }

    #[test]
    fn marked_benchmark_overrides_configured_label() {
        let market = market_returns(30);
        let stock: Vec<f64> = market.iter().map(|m| 0.5 * m).collect();
        let dates = (0..30)
            .map(|i| NaiveDate::from_ymd_opt(2022, 6, 1).unwrap() + Days::new(i as u64))
            .collect();
        let table = AlignedTable::from_columns(
            dates,
            vec![
                Column { name: "KO".to_string(), values: stock },
                Column { name: "^GSPC".to_string(), values: market },
            ],
        )
        .unwrap()
        .with_benchmark("^GSPC")
        .unwrap();

        let result = CapmEngine::new(CapmConfig::default()).calculate_beta(&table, "KO").unwrap();

        assert!((result.beta - 0.5).abs() < 1e-9);
    }

    #[test]
    fn expected_return_matches_worked_example() {
        let benchmark = vec![0.0004; 252];
        let value = expected_return(1.5, &benchmark, 0.0, 252).unwrap();
        assert!((value - 1.5 * 0.0004 * 252.0).abs() < 1e-12);
        assert!((value - 0.1512).abs() < 1e-9);
    }

    #[test]
    fn expected_return_uses_risk_free_rate() {
        let benchmark = vec![0.04; 10];
        // market = 0.04 * 252 = 10.08; 4 + 0.5 * (10.08 - 4) = 7.04
        let value = expected_return(0.5, &benchmark, 4.0, 252).unwrap();
        assert!((value - 7.04).abs() < 1e-9);
    }

    #[test]
    fn analyze_builds_report_from_prices() {
        let market_prices: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64 * 0.7).sin() * 3.0 + i as f64 * 0.1).collect();
        let stock_prices: Vec<f64> = market_prices.iter().map(|p| p * 2.0).collect();
        let prices = returns_table(stock_prices, market_prices);
        let returns = daily_return(&prices);
        let engine = CapmEngine::new(CapmConfig::default());

        let report = engine.analyze(&returns, "TSLA").unwrap();

        // Proportional prices have identical percentage returns.
        assert!((report.regression.beta - 1.0).abs() < 1e-9);
        let market = engine.market_return(&returns).unwrap();
        assert!((report.expected_return - market).abs() < 1e-9);
        assert_eq!(report.regime, BetaRegime::MarketStandard);

        let points = engine.regression_points(&returns, "TSLA", &report.regression).unwrap();
        assert_eq!(points.len(), returns.len());
        assert!(points.iter().all(|p| (p.fitted - p.instrument).abs() < 1e-9));
    }
}
