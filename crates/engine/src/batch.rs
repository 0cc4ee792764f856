use crate::error::EngineError;
use crate::QuantEngine;
use analytics::{daily_return, normalize, CapmReport};
use api_client::HistoryRange;
use core_types::{AlignedTable, PriceSeries};
use serde::Serialize;

/// What happened to one ticker of a CAPM batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum InstrumentOutcome {
    Analyzed(CapmReport),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentReport {
    pub symbol: String,
    pub outcome: InstrumentOutcome,
}

/// Multi-ticker CAPM view.
#[derive(Debug, Clone, Serialize)]
pub struct CapmBatch {
    pub benchmark: String,
    /// `None` when the aligned window is empty.
    pub market_return: Option<f64>,
    /// One entry per requested ticker, in request order.
    pub instruments: Vec<InstrumentReport>,
    /// Prices of every fetched ticker and the benchmark, rebased to 1.0.
    pub normalized: AlignedTable,
}

impl CapmBatch {
    pub fn analyzed(&self) -> impl Iterator<Item = &CapmReport> {
        self.instruments.iter().filter_map(|r| match &r.outcome {
            InstrumentOutcome::Analyzed(report) => Some(report),
            InstrumentOutcome::Failed(_) => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &str)> {
        self.instruments.iter().filter_map(|r| match &r.outcome {
            InstrumentOutcome::Failed(reason) => Some((r.symbol.as_str(), reason.as_str())),
            InstrumentOutcome::Analyzed(_) => None,
        })
    }
}

impl QuantEngine {
    /// Runs the CAPM regression for several tickers against one benchmark.
    ///
    /// Tickers are fetched one after another and each is regressed on its own
    /// overlap with the benchmark, so a short history only limits its own
    /// sample. A ticker that cannot be fetched or analyzed is reported as
    /// `Failed` and the rest of the batch carries on; only a missing benchmark
    /// fails the whole request. The normalized chart and the market return use
    /// the dates every fetched ticker shares.
    pub async fn capm_batch(&self, symbols: &[String], range: HistoryRange) -> Result<CapmBatch, EngineError> {
        let capm = self.capm.config();
        let label = capm.benchmark_label.as_str();
        let benchmark = self.history(&capm.benchmark, range).await?;

        let mut requested: Vec<&str> = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            if !requested.contains(&symbol.as_str()) {
                requested.push(symbol.as_str());
            }
        }

        let mut fetched: Vec<(&str, PriceSeries)> = Vec::new();
        let mut instruments = Vec::with_capacity(requested.len());
        for &symbol in &requested {
            let outcome = match self.history(symbol, range).await {
                Ok(series) => {
                    let outcome = match self.analyze_against(symbol, &series, &benchmark) {
                        Ok(report) => InstrumentOutcome::Analyzed(report),
                        Err(e) => {
                            tracing::warn!(symbol, error = %e, "CAPM analysis failed");
                            InstrumentOutcome::Failed(e.to_string())
                        }
                    };
                    fetched.push((symbol, series));
                    outcome
                }
                Err(e) => {
                    tracing::warn!(symbol, error = %e, "Skipping ticker");
                    InstrumentOutcome::Failed(e.to_string())
                }
            };
            instruments.push(InstrumentReport { symbol: symbol.to_string(), outcome });
        }

        let mut inputs: Vec<(&str, &PriceSeries)> = fetched.iter().map(|(s, series)| (*s, series)).collect();
        inputs.push((label, &benchmark));
        let prices = AlignedTable::inner_join(&inputs)?.with_benchmark(label)?;
        let normalized = normalize(&prices).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Cannot normalize batch prices");
            AlignedTable::default()
        });

        let batch = CapmBatch {
            benchmark: capm.benchmark.clone(),
            market_return: self.capm.market_return(&daily_return(&prices)).ok(),
            instruments,
            normalized,
        };
        tracing::info!(
            requested = requested.len(),
            analyzed = batch.analyzed().count(),
            shared_rows = prices.len(),
            "CAPM batch complete"
        );
        Ok(batch)
    }

    /// Regression of one ticker on the benchmark over the dates both have.
    fn analyze_against(
        &self,
        symbol: &str,
        series: &PriceSeries,
        benchmark: &PriceSeries,
    ) -> Result<CapmReport, EngineError> {
        let label = self.capm.config().benchmark_label.as_str();
        let prices = AlignedTable::inner_join(&[(symbol, series), (label, benchmark)])?.with_benchmark(label)?;
        Ok(self.capm.analyze(&daily_return(&prices), symbol)?)
    }
}
