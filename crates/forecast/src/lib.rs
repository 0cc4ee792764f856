//! Price forecasting: rolling-mean smoothing, ADF-driven differencing,
//! min-max scaling and an ARIMA model scored on a holdout window.
//!
//! [`ForecastPipeline`] runs the whole chain; the individual steps are
//! exported for callers that need them separately.

pub mod arima;
pub mod error;
mod least_squares;
pub mod model;
pub mod pipeline;
pub mod scaler;
pub mod smoothing;
pub mod stationarity;

pub use arima::{Arima, FittedArima};
pub use error::ForecastError;
pub use model::{evaluate_model, forecast_dates, get_forecast, rmse};
pub use pipeline::{ForecastOutput, ForecastPipeline};
pub use scaler::{inverse_scaling, scaling, MinMaxScaler};
pub use smoothing::{get_rolling_mean, rolling_mean, SmoothedSeries};
pub use stationarity::{adf_test, difference, get_differencing_order, AdfResult, DifferencingOrder};
