use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One daily OHLC observation as delivered by the price provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// An ordered, date-unique sequence of daily bars.
///
/// Dates are naive calendar dates. Any timezone handling happens at the
/// provider boundary, so every comparison inside the engines is timezone-free.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Builds a series, rejecting out-of-order or duplicated dates and non-finite closes.
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, CoreError> {
        let symbol = symbol.into();
        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(CoreError::InvalidInput(
                    format!("price series '{}'", symbol),
                    format!("dates must be strictly increasing ({} then {})", pair[0].date, pair[1].date),
                ));
            }
        }
        if let Some(bad) = bars.iter().find(|b| !b.close.is_finite()) {
            return Err(CoreError::InvalidInput(
                format!("price series '{}'", symbol),
                format!("non-finite close on {}", bad.date),
            ));
        }
        Ok(Self { symbol, bars })
    }

    /// Convenience constructor for close-only data (open/high/low mirror the close).
    pub fn from_closes(
        symbol: impl Into<String>,
        points: impl IntoIterator<Item = (NaiveDate, f64)>,
    ) -> Result<Self, CoreError> {
        let bars = points
            .into_iter()
            .map(|(date, close)| PriceBar { date, open: close, high: close, low: close, close })
            .collect();
        Self::new(symbol, bars)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// `(date, close)` pairs, the shape the forecast engine consumes.
    pub fn close_column(&self) -> Vec<(NaiveDate, f64)> {
        self.bars.iter().map(|b| (b.date, b.close)).collect()
    }
}

/// Slope and intercept of an instrument-vs-benchmark return regression.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    /// Slope of the fit, i.e. the instrument's beta.
    pub beta: f64,
    /// Intercept of the fit, i.e. the instrument's alpha (in daily % units).
    pub alpha: f64,
    /// Number of aligned observations the fit used.
    pub observations: usize,
}

impl RegressionResult {
    pub fn fitted(&self, benchmark_return: f64) -> f64 {
        self.beta * benchmark_return + self.alpha
    }
}

/// A named column of an indicator output. `None` marks rows the lookback has not reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// A horizontal reference line that belongs to an indicator's output contract (e.g. RSI 70/30).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceBand {
    pub label: String,
    pub value: f64,
}

/// Date-indexed indicator output, already restricted to the display window.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<IndicatorColumn>,
    pub bands: Vec<ReferenceBand>,
}

impl IndicatorSeries {
    pub fn new(dates: Vec<NaiveDate>) -> Self {
        Self { dates, columns: Vec::new(), bands: Vec::new() }
    }

    /// Appends a column. Its length must match the date index.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<Self, CoreError> {
        let name = name.into();
        if values.len() != self.dates.len() {
            return Err(CoreError::InvalidInput(
                format!("indicator column '{}'", name),
                format!("expected {} values, got {}", self.dates.len(), values.len()),
            ));
        }
        self.columns.push(IndicatorColumn { name, values });
        Ok(self)
    }

    pub fn with_band(mut self, label: impl Into<String>, value: f64) -> Self {
        self.bands.push(ReferenceBand { label: label.into(), value });
        self
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Keeps only the rows from `start` (an index into the current rows) onwards.
    pub fn tail_from(mut self, start: usize) -> Self {
        let start = start.min(self.dates.len());
        self.dates.drain(..start);
        for column in &mut self.columns {
            column.values.drain(..start);
        }
        self
    }
}

/// One step of a price forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// The output of one prediction request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub points: Vec<ForecastPoint>,
    /// Hold-out RMSE, expressed in the scaler's normalized units rather than price units.
    pub rmse: f64,
    pub differencing_order: usize,
    /// Set when the differencing search hit its cap without the series testing stationary.
    pub low_confidence: bool,
}

/// Descriptive company metadata. Every field the provider may omit is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub symbol: String,
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub summary: Option<String>,
    pub market_cap: Option<f64>,
    pub beta: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub current_price: Option<f64>,
}

impl CompanyProfile {
    /// A profile with nothing but the symbol, used when metadata could not be fetched.
    pub fn unavailable(symbol: impl Into<String>) -> Self {
        Self { symbol: symbol.into(), ..Self::default() }
    }

    /// The long name when known, otherwise the short name, otherwise the symbol.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.short_name.as_deref())
            .unwrap_or(&self.symbol)
    }

    pub fn market_cap_billions(&self) -> Option<f64> {
        self.market_cap.map(|cap| cap / 1e9)
    }

    /// True when the provider returned nothing beyond the symbol.
    pub fn is_empty(&self) -> bool {
        *self == Self::unavailable(self.symbol.clone())
    }
}

/// Display adapter that renders a missing value as `N/A`.
pub struct OrNa<'a, T: fmt::Display>(pub &'a Option<T>);

impl<T: fmt::Display> fmt::Display for OrNa<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => fmt::Display::fmt(value, f),
            None => f.write_str("N/A"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn series_rejects_unordered_dates() {
        let result = PriceSeries::from_closes("AAPL", vec![(d(2), 1.0), (d(1), 2.0)]);
        assert!(matches!(result, Err(CoreError::InvalidInput(_, _))));

        let duplicate = PriceSeries::from_closes("AAPL", vec![(d(1), 1.0), (d(1), 2.0)]);
        assert!(duplicate.is_err());
    }

    #[test]
    fn series_rejects_nan_close() {
        let result = PriceSeries::from_closes("AAPL", vec![(d(1), 1.0), (d(2), f64::NAN)]);
        assert!(result.is_err());
    }

    #[test]
    fn series_accessors() {
        let series = PriceSeries::from_closes("MSFT", vec![(d(1), 10.0), (d(4), 11.0)]).unwrap();
        assert_eq!(series.symbol(), "MSFT");
        assert_eq!(series.len(), 2);
        assert_eq!(series.first_date(), Some(d(1)));
        assert_eq!(series.last_date(), Some(d(4)));
        assert_eq!(series.closes(), vec![10.0, 11.0]);
    }

    #[test]
    fn indicator_series_tail_from_drops_leading_rows() {
        let series = IndicatorSeries::new(vec![d(1), d(2), d(3)])
            .with_column("x", vec![None, Some(1.0), Some(2.0)])
            .unwrap()
            .tail_from(1);
        assert_eq!(series.dates, vec![d(2), d(3)]);
        assert_eq!(series.column("x").unwrap(), &[Some(1.0), Some(2.0)]);
    }

    #[test]
    fn indicator_column_length_is_checked() {
        let result = IndicatorSeries::new(vec![d(1), d(2)]).with_column("x", vec![None]);
        assert!(result.is_err());
    }

    #[test]
    fn profile_missing_fields_render_as_na() {
        let profile = CompanyProfile::unavailable("XYZ");
        assert!(profile.is_empty());
        assert_eq!(profile.display_name(), "XYZ");
        assert_eq!(OrNa(&profile.sector).to_string(), "N/A");
        assert_eq!(OrNa(&Some(1.5)).to_string(), "1.5");
    }
}
