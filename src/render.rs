use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use core_types::{AlignedTable, CompanyProfile, IndicatorSeries, OrNa, PriceBar};
use engine::{BetaAnalysis, CapmBatch, InstrumentOutcome, Prediction, StockAnalysis};
use indicators::IndicatorError;
use serde_json::{json, Value};

fn table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn fixed(value: Option<f64>, decimals: usize) -> String {
    OrNa(&value.map(|v| format!("{v:.decimals$}"))).to_string()
}

pub fn beta(view: &BetaAnalysis) {
    let report = &view.report;
    let mut summary = table();
    summary.set_header(vec!["Ticker", "Benchmark", "Beta", "Alpha", "Expected Return (%)", "Regime", "Days"]);
    summary.add_row(vec![
        Cell::new(&view.symbol),
        Cell::new(&view.benchmark),
        Cell::new(format!("{:.2}", report.beta())),
        Cell::new(format!("{:.4}", report.alpha())),
        Cell::new(format!("{:.2}", report.expected_return)),
        Cell::new(report.regime),
        Cell::new(report.regression.observations),
    ]);
    println!("{summary}");
    println!("Annualized market return: {:.2}%", view.market_return);

    println!("\nNormalized prices (last 5 sessions)");
    println!("{}", normalized_tail(&view.normalized, 5));
}

pub fn capm(batch: &CapmBatch) {
    let mut results = table();
    results.set_header(vec!["Ticker", "Beta", "Alpha", "Expected Return (%)", "Volatility"]);
    for instrument in &batch.instruments {
        match &instrument.outcome {
            InstrumentOutcome::Analyzed(report) => {
                results.add_row(vec![
                    Cell::new(&report.symbol),
                    Cell::new(format!("{:.2}", report.beta())),
                    Cell::new(format!("{:.4}", report.alpha())),
                    Cell::new(format!("{:.2}", report.expected_return)),
                    Cell::new(report.volatility),
                ]);
            }
            InstrumentOutcome::Failed(reason) => {
                results.add_row(vec![
                    Cell::new(&instrument.symbol),
                    Cell::new("N/A"),
                    Cell::new("N/A"),
                    Cell::new("N/A"),
                    Cell::new(reason),
                ]);
            }
        }
    }
    println!("{results}");
    println!(
        "Benchmark {} annualized return: {}%",
        batch.benchmark,
        fixed(batch.market_return, 2)
    );

    if !batch.normalized.is_empty() {
        println!("\nNormalized prices (last 5 sessions)");
        println!("{}", normalized_tail(&batch.normalized, 5));
    }
}

fn normalized_tail(prices: &AlignedTable, rows: usize) -> Table {
    let mut out = table();
    let mut header = vec!["Date".to_string()];
    header.extend(prices.column_names().into_iter().map(str::to_string));
    out.set_header(header);

    let start = prices.len().saturating_sub(rows);
    for (offset, date) in prices.dates()[start..].iter().enumerate() {
        let mut row = vec![date.to_string()];
        row.extend(prices.columns().iter().map(|c| format!("{:.4}", c.values[start + offset])));
        out.add_row(row);
    }
    out
}

fn profile(profile: &CompanyProfile) {
    println!("{}", profile.display_name());
    if profile.is_empty() {
        println!("Company details unavailable.\n");
        return;
    }

    let mut details = table();
    details.set_header(vec!["Sector", "Industry", "Country", "Market Cap (B)", "Beta", "52W High", "Price"]);
    details.add_row(vec![
        OrNa(&profile.sector).to_string(),
        OrNa(&profile.industry).to_string(),
        OrNa(&profile.country).to_string(),
        fixed(profile.market_cap_billions(), 2),
        fixed(profile.beta, 2),
        fixed(profile.fifty_two_week_high, 2),
        fixed(profile.current_price, 2),
    ]);
    println!("{details}");
    if let Some(summary) = &profile.summary {
        println!("{summary}\n");
    }
}

pub fn analysis(view: &StockAnalysis) {
    profile(&view.profile);

    match &view.change {
        Ok(change) => println!(
            "Daily close {:.2} ({:+.2}, {:+.2}%) on {}",
            change.close, change.change, change.change_pct, change.date
        ),
        Err(e) => println!("Daily change unavailable: {e}"),
    }

    let mut recent = table();
    recent.set_header(vec!["Date", "Open", "High", "Low", "Close"]);
    for bar in view.recent.iter().rev() {
        recent.add_row(bar_row(bar));
    }
    println!("{recent}");

    println!("\nIndicators over {} (latest values)", view.timeframe);
    let mut latest = table();
    latest.set_header(vec!["Indicator", "Value"]);
    add_latest(&mut latest, &view.moving_average);
    add_latest(&mut latest, &view.rsi);
    add_latest(&mut latest, &view.macd);
    println!("{latest}");

    if let Ok(rsi) = &view.rsi {
        for band in &rsi.bands {
            println!("RSI {} level: {:.0}", band.label, band.value);
        }
    }
    println!("{} chart bars in the window", view.candles.len());
}

fn bar_row(bar: &PriceBar) -> Vec<String> {
    vec![
        bar.date.to_string(),
        format!("{:.2}", bar.open),
        format!("{:.2}", bar.high),
        format!("{:.2}", bar.low),
        format!("{:.2}", bar.close),
    ]
}

fn add_latest(out: &mut Table, slot: &Result<IndicatorSeries, IndicatorError>) {
    match slot {
        Ok(series) => {
            for column in &series.columns {
                let last = column.values.last().copied().flatten();
                out.add_row(vec![column.name.clone(), fixed(last, 2)]);
            }
        }
        Err(e) => {
            out.add_row(vec!["unavailable".to_string(), e.to_string()]);
        }
    }
}

/// JSON form of the analysis view; a failed indicator becomes `{"error": ...}`.
pub fn analysis_json(view: &StockAnalysis) -> Value {
    fn slot<T: serde::Serialize>(result: &Result<T, IndicatorError>) -> Value {
        match result {
            Ok(value) => json!(value),
            Err(e) => json!({ "error": e.to_string() }),
        }
    }
    json!({
        "symbol": view.symbol,
        "timeframe": view.timeframe.as_str(),
        "profile": view.profile,
        "recent": view.recent,
        "change": slot(&view.change),
        "candles": view.candles,
        "moving_average": slot(&view.moving_average),
        "rsi": slot(&view.rsi),
        "macd": slot(&view.macd),
    })
}

pub fn prediction(prediction: &Prediction) {
    profile(&prediction.profile);
    let result = &prediction.forecast.result;

    println!("Predicting the next {} days of closes for {}", result.points.len(), prediction.symbol);
    println!("Model RMSE (scaled): {:.6}", result.rmse);
    println!("Differencing order: {}", result.differencing_order);
    if result.low_confidence {
        println!("Warning: the series did not become stationary; treat this forecast as low confidence.");
    }

    let mut points = table();
    points.set_header(vec!["Date", "Close"]);
    for point in &result.points {
        points.add_row(vec![point.date.to_string(), format!("{:.3}", point.value)]);
    }
    println!("{points}");
}
