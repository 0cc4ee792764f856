use crate::error::EngineError;
use crate::QuantEngine;
use api_client::HistoryRange;
use core_types::{CompanyProfile, IndicatorSeries, PriceBar, PriceSeries, Timeframe};
use indicators::{price_change, IndicatorError, PriceChange};

/// Rows shown in the recent-history table.
pub const RECENT_ROWS: usize = 10;

/// Single-stock technical view.
///
/// Each indicator slot holds its own result, so a history too short for the
/// 50-day average still yields RSI and MACD.
#[derive(Debug, Clone)]
pub struct StockAnalysis {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub profile: CompanyProfile,
    /// The last `RECENT_ROWS` bars inside the requested date range, oldest first.
    pub recent: Vec<PriceBar>,
    /// Last close against the previous one, inside the requested date range.
    pub change: Result<PriceChange, IndicatorError>,
    /// OHLC bars inside the chart window.
    pub candles: Vec<PriceBar>,
    pub moving_average: Result<IndicatorSeries, IndicatorError>,
    pub rsi: Result<IndicatorSeries, IndicatorError>,
    pub macd: Result<IndicatorSeries, IndicatorError>,
}

impl QuantEngine {
    /// Builds the technical view of `symbol`.
    ///
    /// Charts use the full available history cut to `timeframe`; the recent
    /// table and the price-change metric use `recent`.
    pub async fn stock_analysis(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        recent: HistoryRange,
    ) -> Result<StockAnalysis, EngineError> {
        let profile = self.profile_or_unavailable(symbol).await;
        let history = self.history(symbol, HistoryRange::Max).await?;

        let in_range: Vec<PriceBar> = history
            .bars()
            .iter()
            .filter(|bar| match recent {
                HistoryRange::Between(start, end) => bar.date >= start && bar.date <= end,
                HistoryRange::Max => true,
            })
            .cloned()
            .collect();
        let skip = in_range.len().saturating_sub(RECENT_ROWS);
        let recent_bars = in_range[skip..].to_vec();
        let change = price_change(&PriceSeries::new(symbol, in_range)?);

        let analysis = StockAnalysis {
            symbol: symbol.to_string(),
            timeframe,
            profile,
            recent: recent_bars,
            change,
            candles: self.indicators.candles(&history, timeframe),
            moving_average: self.indicators.moving_average(&history, timeframe),
            rsi: self.indicators.rsi(&history, timeframe),
            macd: self.indicators.macd(&history, timeframe),
        };
        for (name, failed) in [
            ("moving_average", analysis.moving_average.as_ref().err()),
            ("rsi", analysis.rsi.as_ref().err()),
            ("macd", analysis.macd.as_ref().err()),
        ] {
            if let Some(e) = failed {
                tracing::warn!(symbol, indicator = name, error = %e, "Indicator unavailable");
            }
        }
        tracing::info!(symbol, %timeframe, bars = history.len(), "Stock analysis complete");
        Ok(analysis)
    }
}
