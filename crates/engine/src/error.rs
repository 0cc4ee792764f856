use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("No data available for '{symbol}': {reason}")]
    DataUnavailable { symbol: String, reason: String },

    #[error("API client error: {0}")]
    ApiClient(#[from] api_client::error::ApiError),

    #[error("CAPM error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] indicators::IndicatorError),

    #[error("Forecast error: {0}")]
    Forecast(#[from] forecast::ForecastError),

    #[error("Invalid data: {0}")]
    Core(#[from] core_types::CoreError),
}
