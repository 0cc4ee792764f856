use crate::error::EngineError;
use crate::QuantEngine;
use api_client::HistoryRange;
use core_types::CompanyProfile;
use forecast::ForecastOutput;
use serde::Serialize;

/// Forecast view: the company header plus the pipeline output.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub symbol: String,
    pub profile: CompanyProfile,
    pub forecast: ForecastOutput,
}

impl QuantEngine {
    /// Forecasts the next closes of `symbol` from its history over `range`.
    pub async fn predict(&self, symbol: &str, range: HistoryRange) -> Result<Prediction, EngineError> {
        let profile = self.profile_or_unavailable(symbol).await;
        let history = self.history(symbol, range).await?;
        let forecast = self.forecast.run(&history)?;
        Ok(Prediction { symbol: symbol.to_string(), profile, forecast })
    }
}
