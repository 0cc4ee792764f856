use core_types::{BetaRegime, RegressionResult, VolatilityClass};
use serde::{Deserialize, Serialize};

/// The per-instrument outcome of a CAPM analysis.
///
/// This is the row handed to the results table and the risk/reward charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapmReport {
    pub symbol: String,
    pub regression: RegressionResult,
    /// Annual expected return, in the same units as the daily returns (percent).
    pub expected_return: f64,
    pub volatility: VolatilityClass,
    pub regime: BetaRegime,
}

impl CapmReport {
    pub fn beta(&self) -> f64 {
        self.regression.beta
    }

    pub fn alpha(&self) -> f64 {
        self.regression.alpha
    }
}

/// One point of the regression scatter plot: a day's benchmark and instrument
/// returns, plus the value of the fitted line at that benchmark return.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub market: f64,
    pub instrument: f64,
    pub fitted: f64,
}
