use crate::error::ConfigError;
use serde::Deserialize;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `config.toml`; an omitted section falls back to
/// the defaults below, which reproduce the dashboard's fixed behaviour.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub capm: CapmConfig,
    #[serde(default)]
    pub indicators: IndicatorConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Parameters of the CAPM beta / expected-return engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CapmConfig {
    /// Ticker of the market benchmark (S&P 500 by default).
    pub benchmark: String,
    /// Column label given to the benchmark inside aligned tables.
    pub benchmark_label: String,
    /// Trading days per year, used to annualize the mean daily return.
    pub trading_days: u32,
    /// Annual risk-free rate in percent. 0 reproduces the simplified model.
    pub risk_free_rate: f64,
    /// Fewest aligned observations a regression is allowed to run on.
    pub min_overlap: usize,
    /// Look-back used when the caller does not give a period.
    pub default_period_years: u32,
}

/// Look-back periods and reference levels of the technical indicators.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub sma_period: usize,
    pub rsi_period: usize,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

/// Significance level of the unit-root test used to pick the differencing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Significance {
    #[serde(rename = "1%")]
    OnePercent,
    #[serde(rename = "5%")]
    FivePercent,
    #[serde(rename = "10%")]
    TenPercent,
}

/// Parameters of the smoothing / ARIMA forecast pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Trailing window of the rolling mean applied before fitting.
    pub rolling_window: usize,
    /// Upper bound of the differencing-order search.
    pub max_differencing_order: usize,
    pub significance: Significance,
    /// Autoregressive order (p).
    pub ar_order: usize,
    /// Moving-average order (q).
    pub ma_order: usize,
    /// Trailing observations held out to score the model.
    pub holdout: usize,
    /// Number of future days to forecast.
    pub horizon: usize,
    /// Years of history to fetch. `None` requests the full history.
    pub history_years: Option<u32>,
}

/// Settings for the remote price / fundamentals provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the chart (price history) endpoint.
    pub chart_url: String,
    /// Base URL of the quote-summary (company profile) endpoint.
    pub summary_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

/// Logging configuration. `RUST_LOG` overrides `level` when set.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// When set, logs are also written to a daily-rolling file in this directory.
    pub directory: Option<String>,
}

// --- Default Implementations ---

impl Default for CapmConfig {
    fn default() -> Self {
        Self {
            benchmark: "^GSPC".to_string(),
            benchmark_label: "sp500".to_string(),
            trading_days: 252,
            risk_free_rate: 0.0,
            min_overlap: 10,
            default_period_years: 3,
        }
    }
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma_period: 50,
            rsi_period: 14,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
        }
    }
}

impl Default for Significance {
    fn default() -> Self {
        Significance::FivePercent
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            rolling_window: 7,
            max_differencing_order: 2,
            significance: Significance::FivePercent,
            ar_order: 5,
            ma_order: 1,
            holdout: 30,
            horizon: 30,
            history_years: None,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            chart_url: "https://query1.finance.yahoo.com".to_string(),
            summary_url: "https://query2.finance.yahoo.com".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) quantview/0.1".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl Config {
    /// Rejects parameter combinations the engines cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let capm = &self.capm;
        if capm.trading_days == 0 {
            return Err(ConfigError::ValidationError("capm.trading_days must be positive".into()));
        }
        if capm.min_overlap < 2 {
            return Err(ConfigError::ValidationError(
                "capm.min_overlap must be at least 2 for a line fit".into(),
            ));
        }
        if capm.benchmark.trim().is_empty() || capm.benchmark_label.trim().is_empty() {
            return Err(ConfigError::ValidationError("capm.benchmark must be set".into()));
        }

        let ind = &self.indicators;
        if ind.sma_period == 0 || ind.rsi_period == 0 || ind.macd_signal == 0 {
            return Err(ConfigError::ValidationError("indicator periods must be positive".into()));
        }
        if ind.macd_fast == 0 || ind.macd_fast >= ind.macd_slow {
            return Err(ConfigError::ValidationError(
                "indicators.macd_fast must be positive and below macd_slow".into(),
            ));
        }
        if !(0.0..=100.0).contains(&ind.rsi_oversold)
            || !(0.0..=100.0).contains(&ind.rsi_overbought)
            || ind.rsi_oversold >= ind.rsi_overbought
        {
            return Err(ConfigError::ValidationError(
                "RSI bands must lie in [0, 100] with oversold below overbought".into(),
            ));
        }

        let fc = &self.forecast;
        if fc.rolling_window == 0 || fc.holdout == 0 || fc.horizon == 0 {
            return Err(ConfigError::ValidationError(
                "forecast.rolling_window, holdout and horizon must be positive".into(),
            ));
        }
        if fc.max_differencing_order > 2 {
            return Err(ConfigError::ValidationError(
                "forecast.max_differencing_order must be <= 2".into(),
            ));
        }
        if fc.ar_order > 10 || fc.ma_order > 10 {
            return Err(ConfigError::ValidationError("ARIMA orders must be <= 10".into()));
        }

        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::ValidationError("provider.timeout_secs must be positive".into()));
        }
        Ok(())
    }
}
