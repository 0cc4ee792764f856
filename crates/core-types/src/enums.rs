use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The display window selected for the indicator charts.
///
/// Indicators are always computed over the full history; the timeframe only
/// decides which trailing slice is handed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "max")]
    Max,
}

impl Timeframe {
    pub const ALL: [Timeframe; 8] = [
        Timeframe::FiveDays,
        Timeframe::OneMonth,
        Timeframe::ThreeMonths,
        Timeframe::SixMonths,
        Timeframe::YearToDate,
        Timeframe::OneYear,
        Timeframe::FiveYears,
        Timeframe::Max,
    ];

    /// The token used on the command line and in serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::FiveDays => "5d",
            Timeframe::OneMonth => "1mo",
            Timeframe::ThreeMonths => "3mo",
            Timeframe::SixMonths => "6mo",
            Timeframe::YearToDate => "ytd",
            Timeframe::OneYear => "1y",
            Timeframe::FiveYears => "5y",
            Timeframe::Max => "max",
        }
    }
}

impl Default for Timeframe {
    fn default() -> Self {
        Timeframe::OneYear
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        Timeframe::ALL
            .into_iter()
            .find(|tf| tf.as_str() == token)
            .ok_or_else(|| CoreError::UnknownTimeframe(s.to_string()))
    }
}

/// Coarse bucket used when ranking a batch of instruments by beta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolatilityClass {
    High,
    Low,
}

impl VolatilityClass {
    pub fn from_beta(beta: f64) -> Self {
        if beta > 1.0 {
            VolatilityClass::High
        } else {
            VolatilityClass::Low
        }
    }
}

impl fmt::Display for VolatilityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolatilityClass::High => f.write_str("High"),
            VolatilityClass::Low => f.write_str("Low"),
        }
    }
}

/// Finer label shown next to a single stock's beta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BetaRegime {
    HighVolatility,
    MarketStandard,
    LowVolatility,
}

impl BetaRegime {
    pub fn from_beta(beta: f64) -> Self {
        if beta > 1.2 {
            BetaRegime::HighVolatility
        } else if beta < 0.8 {
            BetaRegime::LowVolatility
        } else {
            BetaRegime::MarketStandard
        }
    }
}

impl fmt::Display for BetaRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetaRegime::HighVolatility => f.write_str("High Volatility"),
            BetaRegime::MarketStandard => f.write_str("Market Standard"),
            BetaRegime::LowVolatility => f.write_str("Low Volatility"),
        }
    }
}
