//! Technical indicators for price charts.
//!
//! Indicators are computed over a full price history with [`IndicatorEngine`]
//! and only then cut to the requested [`core_types::Timeframe`], so the first
//! rows of a short window still carry fully warmed-up values.

pub mod engine;
pub mod error;
pub mod macd;
pub mod moving_average;
pub mod rsi;
pub mod window;

pub use engine::{filter, price_change, IndicatorEngine, PriceChange};
pub use error::IndicatorError;
pub use macd::{macd, MacdColumns};
pub use moving_average::sma;
pub use rsi::rsi;
pub use window::{window_offset, window_start};
