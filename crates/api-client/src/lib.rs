use crate::error::ApiError;
use async_trait::async_trait;
use chrono::{Days, Months, NaiveDate, NaiveTime};
use configuration::ProviderConfig;
use core_types::{CompanyProfile, PriceSeries};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub mod error;
pub mod responses;

// --- Public API ---
pub use responses::{ChartResponse, QuoteSummaryResponse};

/// The span of daily history to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryRange {
    /// Inclusive start and end dates.
    Between(NaiveDate, NaiveDate),
    /// Everything the provider has.
    Max,
}

impl HistoryRange {
    /// The `years` calendar years up to and including `end`.
    pub fn years_back(end: NaiveDate, years: u32) -> Self {
        let start = end.checked_sub_months(Months::new(years * 12)).unwrap_or(NaiveDate::MIN);
        HistoryRange::Between(start, end)
    }
}

/// The generic, abstract interface for a market-data provider.
/// Orchestration only talks to this trait, allowing the underlying
/// implementation (HTTP or in-memory) to be swapped out.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetches daily price bars for `symbol`.
    async fn fetch_history(&self, symbol: &str, range: HistoryRange) -> Result<PriceSeries, ApiError>;

    /// Fetches descriptive company metadata.
    async fn fetch_profile(&self, symbol: &str) -> Result<CompanyProfile, ApiError>;
}

/// A concrete implementation of the `PriceProvider` for the public Yahoo Finance API.
#[derive(Clone)]
pub struct YahooClient {
    client: reqwest::Client,
    chart_url: String,
    summary_url: String,
}

impl YahooClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            chart_url: config.chart_url.trim_end_matches('/').to_string(),
            summary_url: config.summary_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str::<T>(&text).map_err(|e| ApiError::Deserialization(e.to_string()))
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
                message: text.chars().take(200).collect(),
            })
        }
    }
}

/// Seconds since the epoch at midnight UTC of `date`.
fn epoch_seconds(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

fn history_query(range: HistoryRange) -> Vec<(&'static str, String)> {
    let mut query = vec![("interval", "1d".to_string()), ("events", "div,splits".to_string())];
    match range {
        HistoryRange::Between(start, end) => {
            // period2 is exclusive; step past `end` so it is included.
            let until = end.checked_add_days(Days::new(1)).unwrap_or(end);
            query.push(("period1", epoch_seconds(start).to_string()));
            query.push(("period2", epoch_seconds(until).to_string()));
        }
        HistoryRange::Max => query.push(("range", "max".to_string())),
    }
    query
}

#[async_trait]
impl PriceProvider for YahooClient {
    async fn fetch_history(&self, symbol: &str, range: HistoryRange) -> Result<PriceSeries, ApiError> {
        let url = format!("{}/v8/finance/chart/{}", self.chart_url, symbol);
        tracing::debug!(symbol, ?range, "Fetching price history");

        let response: ChartResponse = match self.get_json(&url, &history_query(range)).await {
            Err(ApiError::Status { status: 404, .. }) => return Err(ApiError::NoData(symbol.to_string())),
            other => other?,
        };
        let series = response.into_series(symbol)?;
        tracing::info!(symbol, bars = series.len(), "Fetched price history");
        Ok(series)
    }

    async fn fetch_profile(&self, symbol: &str) -> Result<CompanyProfile, ApiError> {
        let url = format!("{}/v10/finance/quoteSummary/{}", self.summary_url, symbol);
        let query = [("modules", "assetProfile,price,summaryDetail,financialData".to_string())];

        let response: QuoteSummaryResponse = self.get_json(&url, &query).await?;
        response.into_profile(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn between_range_includes_the_end_date() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();

        let query = history_query(HistoryRange::Between(start, end));

        assert!(query.contains(&("period1", "1709251200".to_string())));
        assert!(query.contains(&("period2", "1709596800".to_string())));
        assert!(query.contains(&("interval", "1d".to_string())));
    }

    #[test]
    fn max_range_asks_for_everything() {
        let query = history_query(HistoryRange::Max);
        assert!(query.contains(&("range", "max".to_string())));
        assert!(!query.iter().any(|(key, _)| *key == "period1"));
    }

    #[test]
    fn years_back_counts_calendar_years() {
        let end = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(
            HistoryRange::years_back(end, 3),
            HistoryRange::Between(NaiveDate::from_ymd_opt(2021, 2, 28).unwrap(), end)
        );
    }
}
