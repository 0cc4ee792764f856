//! # Quantview Request Orchestration
//!
//! Wires the price provider to the three calculation engines. Every public
//! method on [`QuantEngine`] serves one dashboard view: it fetches what it
//! needs, runs the engines and hands back plain report structs. Nothing is
//! cached between requests.
//!
//! Failure handling differs per view: a missing company profile degrades to
//! an empty one, a failing indicator only empties its own slot, and one bad
//! ticker in a CAPM batch is reported without sinking the others.

use crate::error::EngineError;
use analytics::CapmEngine;
use api_client::error::ApiError;
use api_client::{HistoryRange, PriceProvider};
use chrono::NaiveDate;
use configuration::Config;
use core_types::{CompanyProfile, PriceSeries};
use forecast::ForecastPipeline;
use indicators::IndicatorEngine;
use std::sync::Arc;

pub mod analysis;
pub mod batch;
pub mod beta;
pub mod error;
pub mod prediction;

pub use analysis::{StockAnalysis, RECENT_ROWS};
pub use batch::{CapmBatch, InstrumentOutcome, InstrumentReport};
pub use beta::BetaAnalysis;
pub use prediction::Prediction;

/// The central orchestrator for the analytics views.
pub struct QuantEngine {
    config: Config,
    provider: Arc<dyn PriceProvider>,
    capm: CapmEngine,
    indicators: IndicatorEngine,
    forecast: ForecastPipeline,
}

impl QuantEngine {
    pub fn new(config: Config, provider: Arc<dyn PriceProvider>) -> Self {
        Self {
            capm: CapmEngine::new(config.capm.clone()),
            indicators: IndicatorEngine::new(config.indicators.clone()),
            forecast: ForecastPipeline::new(config.forecast.clone()),
            config,
            provider,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// History range of the CAPM views: `years` (or the configured default) up to `today`.
    pub fn capm_range(&self, today: NaiveDate, years: Option<u32>) -> HistoryRange {
        HistoryRange::years_back(today, years.unwrap_or(self.config.capm.default_period_years))
    }

    /// History range of the prediction view.
    pub fn forecast_range(&self, today: NaiveDate) -> HistoryRange {
        match self.config.forecast.history_years {
            Some(years) => HistoryRange::years_back(today, years),
            None => HistoryRange::Max,
        }
    }

    /// Fetches a price history, turning an empty answer into `DataUnavailable`.
    async fn history(&self, symbol: &str, range: HistoryRange) -> Result<PriceSeries, EngineError> {
        match self.provider.fetch_history(symbol, range).await {
            Ok(series) if series.is_empty() => Err(EngineError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "the provider returned no price bars".to_string(),
            }),
            Ok(series) => Ok(series),
            Err(ApiError::NoData(reason)) => Err(EngineError::DataUnavailable { symbol: symbol.to_string(), reason }),
            Err(e) => Err(e.into()),
        }
    }

    /// Company metadata, or an all-empty profile when the provider cannot supply it.
    async fn profile_or_unavailable(&self, symbol: &str) -> CompanyProfile {
        match self.provider.fetch_profile(symbol).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(symbol, error = %e, "Company profile unavailable");
                CompanyProfile::unavailable(symbol)
            }
        }
    }
}
