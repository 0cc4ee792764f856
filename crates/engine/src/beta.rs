use crate::error::EngineError;
use crate::QuantEngine;
use analytics::{daily_return, normalize, CapmReport, ScatterPoint};
use api_client::HistoryRange;
use core_types::AlignedTable;
use serde::Serialize;

/// Single-stock beta view: regression, expected return and the chart inputs.
#[derive(Debug, Clone, Serialize)]
pub struct BetaAnalysis {
    pub symbol: String,
    pub benchmark: String,
    pub report: CapmReport,
    /// Annualized mean benchmark return over the aligned window.
    pub market_return: f64,
    pub scatter: Vec<ScatterPoint>,
    /// Both price series rebased to 1.0 on the first aligned date.
    pub normalized: AlignedTable,
}

impl QuantEngine {
    /// Regresses `symbol` against the configured benchmark over `range`.
    pub async fn beta_analysis(&self, symbol: &str, range: HistoryRange) -> Result<BetaAnalysis, EngineError> {
        let capm = self.capm.config();
        let instrument = self.history(symbol, range).await?;
        let benchmark = self.history(&capm.benchmark, range).await?;

        let label = capm.benchmark_label.as_str();
        let prices = AlignedTable::inner_join(&[(symbol, &instrument), (label, &benchmark)])?
            .with_benchmark(label)?;
        tracing::info!(symbol, benchmark = %capm.benchmark, rows = prices.len(), "Aligned beta inputs");

        let returns = daily_return(&prices);
        let report = self.capm.analyze(&returns, symbol)?;
        let market_return = self.capm.market_return(&returns)?;
        let scatter = self.capm.regression_points(&returns, symbol, &report.regression)?;
        let normalized = normalize(&prices)?;

        tracing::info!(symbol, beta = report.beta(), regime = %report.regime, "Beta analysis complete");
        Ok(BetaAnalysis {
            symbol: symbol.to_string(),
            benchmark: capm.benchmark.clone(),
            report,
            market_return,
            scatter,
            normalized,
        })
    }
}
