pub mod enums;
pub mod error;
pub mod structs;
pub mod table;

// Re-export the core types to provide a clean public API.
pub use enums::{BetaRegime, Timeframe, VolatilityClass};
pub use error::CoreError;
pub use structs::{
    CompanyProfile, ForecastPoint, ForecastResult, IndicatorColumn, IndicatorSeries, OrNa,
    PriceBar, PriceSeries, ReferenceBand, RegressionResult,
};
pub use table::{AlignedTable, Column};
