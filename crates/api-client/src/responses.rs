use crate::error::ApiError;
use chrono::{DateTime, NaiveDate};
use core_types::{CompanyProfile, PriceBar, PriceSeries};
use serde::Deserialize;
use std::collections::BTreeMap;

// Using `#[serde(rename_all = "camelCase")]` to automatically map from JSON camelCase to Rust snake_case.

/// Envelope of `GET /v8/finance/chart/{symbol}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartEnvelope,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartEnvelope {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    // Absent when the range holds no trading days.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: ChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartMeta {
    /// Exchange offset from UTC in seconds.
    #[serde(default)]
    pub gmtoffset: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<QuoteColumns>,
}

/// Column-oriented OHLC values; any entry may be null.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuoteColumns {
    pub open: Vec<Option<f64>>,
    pub high: Vec<Option<f64>>,
    pub low: Vec<Option<f64>>,
    pub close: Vec<Option<f64>>,
}

/// Error object shared by the chart and quote-summary endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub description: String,
}

impl ChartResponse {
    /// Converts the response into a daily price series.
    ///
    /// Timestamps are shifted by the exchange's UTC offset before being cut to
    /// a date, so a session always lands on its local trading day. Rows
    /// without a close are skipped; when a date repeats (the live session is
    /// sometimes reported twice) the later row wins.
    pub fn into_series(self, symbol: &str) -> Result<PriceSeries, ApiError> {
        if let Some(error) = self.chart.error {
            return Err(ApiError::NoData(format!("{symbol}: {}", error.description)));
        }
        let result = self
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| ApiError::NoData(symbol.to_string()))?;
        let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
        let offset = result.meta.gmtoffset;

        let mut by_date: BTreeMap<NaiveDate, PriceBar> = BTreeMap::new();
        for (i, &timestamp) in result.timestamp.iter().enumerate() {
            let Some(close) = value_at(&quote.close, i) else {
                continue;
            };
            let date = DateTime::from_timestamp(timestamp + offset, 0)
                .ok_or_else(|| ApiError::InvalidData(format!("timestamp {timestamp} is out of range")))?
                .date_naive();
            by_date.insert(
                date,
                PriceBar {
                    date,
                    open: value_at(&quote.open, i).unwrap_or(close),
                    high: value_at(&quote.high, i).unwrap_or(close),
                    low: value_at(&quote.low, i).unwrap_or(close),
                    close,
                },
            );
        }

        if by_date.is_empty() {
            return Err(ApiError::NoData(symbol.to_string()));
        }
        PriceSeries::new(symbol, by_date.into_values().collect())
            .map_err(|e| ApiError::InvalidData(e.to_string()))
    }
}

fn value_at(column: &[Option<f64>], index: usize) -> Option<f64> {
    column.get(index).copied().flatten().filter(|v| v.is_finite())
}

/// Envelope of `GET /v10/finance/quoteSummary/{symbol}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummaryResponse {
    pub quote_summary: QuoteSummaryEnvelope,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteSummaryEnvelope {
    pub result: Option<Vec<QuoteSummaryResult>>,
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteSummaryResult {
    pub asset_profile: Option<AssetProfile>,
    pub price: Option<PriceModule>,
    pub summary_detail: Option<SummaryDetail>,
    pub financial_data: Option<FinancialData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetProfile {
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub long_business_summary: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriceModule {
    pub long_name: Option<String>,
    pub short_name: Option<String>,
    pub market_cap: Option<RawValue>,
    pub regular_market_price: Option<RawValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SummaryDetail {
    pub beta: Option<RawValue>,
    pub fifty_two_week_high: Option<RawValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialData {
    pub current_price: Option<RawValue>,
}

/// Yahoo's `{"raw": 1.23, "fmt": "1.23"}` number wrapper; `{}` when unknown.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct RawValue {
    pub raw: Option<f64>,
}

fn raw(value: Option<RawValue>) -> Option<f64> {
    value.and_then(|v| v.raw).filter(|v| v.is_finite())
}

impl QuoteSummaryResponse {
    /// Converts the response into a profile. Absent modules and fields stay `None`.
    pub fn into_profile(self, symbol: &str) -> Result<CompanyProfile, ApiError> {
        if let Some(error) = self.quote_summary.error {
            return Err(ApiError::NoData(format!("{symbol}: {}", error.description)));
        }
        let result = self
            .quote_summary
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| ApiError::NoData(symbol.to_string()))?;

        let asset = result.asset_profile.unwrap_or_default();
        let price = result.price.unwrap_or_default();
        let detail = result.summary_detail.unwrap_or_default();
        let financial = result.financial_data.unwrap_or_default();

        Ok(CompanyProfile {
            symbol: symbol.to_string(),
            name: price.long_name,
            short_name: price.short_name,
            sector: asset.sector,
            industry: asset.industry,
            country: asset.country,
            summary: asset.long_business_summary,
            market_cap: raw(price.market_cap),
            beta: raw(detail.beta),
            fifty_two_week_high: raw(detail.fifty_two_week_high),
            current_price: raw(financial.current_price).or(raw(price.regular_market_price)),
        })
    }
}
