use crate::error::IndicatorError;
use crate::macd::macd;
use crate::moving_average::sma;
use crate::rsi::rsi;
use crate::window::window_offset;
use chrono::NaiveDate;
use configuration::IndicatorConfig;
use core_types::{IndicatorSeries, PriceBar, PriceSeries, Timeframe};
use serde::Serialize;

/// Computes chart indicators over a full price history and cuts them to a display window.
///
/// Every indicator runs over the entire history before the window filter is
/// applied, so look-back periods near the window's left edge are warmed up
/// by older data instead of being truncated.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    config: IndicatorConfig,
}

/// The latest close and its change against the previous session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceChange {
    pub date: NaiveDate,
    pub close: f64,
    pub previous_close: f64,
    pub change: f64,
    pub change_pct: f64,
}

impl IndicatorEngine {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Close price and its simple moving average.
    pub fn moving_average(
        &self,
        series: &PriceSeries,
        timeframe: Timeframe,
    ) -> Result<IndicatorSeries, IndicatorError> {
        let period = self.config.sma_period;
        let name = format!("SMA({period})");
        ensure_history(series, &name, period)?;

        let closes = series.closes();
        let averages = sma(&closes, period)?;
        let output = IndicatorSeries::new(series.dates())
            .with_column("close", closes.into_iter().map(Some).collect())?
            .with_column(format!("sma_{period}"), averages)?;
        Ok(filter(output, timeframe))
    }

    /// Relative strength index with its overbought/oversold reference bands.
    pub fn rsi(&self, series: &PriceSeries, timeframe: Timeframe) -> Result<IndicatorSeries, IndicatorError> {
        let period = self.config.rsi_period;
        ensure_history(series, &format!("RSI({period})"), period + 1)?;

        let values = rsi(&series.closes(), period);
        let output = IndicatorSeries::new(series.dates())
            .with_column("rsi", values)?
            .with_band("overbought", self.config.rsi_overbought)
            .with_band("oversold", self.config.rsi_oversold);
        Ok(filter(output, timeframe))
    }

    /// MACD line, signal line and histogram.
    pub fn macd(&self, series: &PriceSeries, timeframe: Timeframe) -> Result<IndicatorSeries, IndicatorError> {
        let IndicatorConfig { macd_fast, macd_slow, macd_signal, .. } = self.config;
        let name = format!("MACD({macd_fast}, {macd_slow}, {macd_signal})");
        ensure_history(series, &name, macd_slow)?;

        let columns = macd(&series.closes(), macd_fast, macd_slow, macd_signal)?;
        let output = IndicatorSeries::new(series.dates())
            .with_column("macd", columns.macd)?
            .with_column("signal", columns.signal)?
            .with_column("histogram", columns.histogram)?;
        Ok(filter(output, timeframe))
    }

    /// The raw OHLC bars inside the display window, for candlestick and line charts.
    pub fn candles(&self, series: &PriceSeries, timeframe: Timeframe) -> Vec<PriceBar> {
        let dates = series.dates();
        series.bars()[window_offset(&dates, timeframe)..].to_vec()
    }
}

/// Change of the last close against the one before it.
pub fn price_change(series: &PriceSeries) -> Result<PriceChange, IndicatorError> {
    let bars = series.bars();
    let [.., previous, last] = bars else {
        return Err(IndicatorError::InsufficientHistory {
            indicator: "price change".to_string(),
            required: 2,
            available: bars.len(),
        });
    };
    let change = last.close - previous.close;
    Ok(PriceChange {
        date: last.date,
        close: last.close,
        previous_close: previous.close,
        change,
        change_pct: change / previous.close * 100.0,
    })
}

/// Applies the display window to an already computed indicator.
pub fn filter(series: IndicatorSeries, timeframe: Timeframe) -> IndicatorSeries {
    let offset = window_offset(&series.dates, timeframe);
    series.tail_from(offset)
}

fn ensure_history(series: &PriceSeries, indicator: &str, required: usize) -> Result<(), IndicatorError> {
    if series.is_empty() {
        return Err(IndicatorError::EmptySeries);
    }
    if series.len() < required {
        tracing::warn!(indicator, required, available = series.len(), "Not enough history for indicator");
        return Err(IndicatorError::InsufficientHistory {
            indicator: indicator.to_string(),
            required,
            available: series.len(),
        });
    }
    Ok(())
}
