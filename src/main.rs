use anyhow::Context;
use api_client::{HistoryRange, PriceProvider, YahooClient};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use configuration::Config;
use core_types::Timeframe;
use engine::QuantEngine;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

mod render;

/// The main entry point for the Quantview analytics application.
fn main() -> ExitCode {
    // Provider overrides and RUST_LOG may live in a local .env file.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    let _log_guard = match configuration::init_tracing(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Logging setup failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Only the HTTP provider is async; a current-thread runtime is enough.
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start the async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli, config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Equity analytics from the terminal: CAPM beta, technical indicators and
/// ARIMA price forecasts.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults to `config.toml` when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Regress one stock against the market benchmark.
    Beta(BetaArgs),
    /// Beta and CAPM expected return for several stocks.
    Capm(CapmArgs),
    /// Company profile, recent prices and technical indicators.
    Analyze(AnalyzeArgs),
    /// Forecast the next 30 days of closes.
    Predict(PredictArgs),
}

/// The history window of the CAPM commands.
#[derive(Args)]
struct PeriodArgs {
    /// Years of history up to today. Defaults to `capm.default_period_years`.
    #[arg(long, conflicts_with_all = ["from", "to"])]
    years: Option<u32>,

    /// Start date (format: YYYY-MM-DD).
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,

    /// End date (format: YYYY-MM-DD).
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,
}

#[derive(Args)]
struct BetaArgs {
    /// The stock ticker (e.g., "TSLA").
    #[arg(long)]
    ticker: String,

    #[command(flatten)]
    period: PeriodArgs,
}

#[derive(Args)]
struct CapmArgs {
    /// Comma-separated stock tickers (e.g., "TSLA,AAPL,NFLX").
    #[arg(long, value_delimiter = ',', required = true)]
    tickers: Vec<String>,

    #[command(flatten)]
    period: PeriodArgs,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// The stock ticker (e.g., "AAPL").
    #[arg(long)]
    ticker: String,

    /// Chart window: 5d, 1mo, 3mo, 6mo, ytd, 1y, 5y or max.
    #[arg(long, default_value_t = Timeframe::OneYear)]
    timeframe: Timeframe,

    /// Start of the recent-prices table. Defaults to one year before `--to`.
    #[arg(long)]
    from: Option<NaiveDate>,

    /// End of the recent-prices table. Defaults to today.
    #[arg(long)]
    to: Option<NaiveDate>,
}

#[derive(Args)]
struct PredictArgs {
    /// The stock ticker (e.g., "AAPL").
    #[arg(long)]
    ticker: String,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => configuration::load_config_from(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => configuration::load_config()?,
    };
    Ok(config)
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let provider: Arc<dyn PriceProvider> = Arc::new(YahooClient::new(&config.provider)?);
    let engine = QuantEngine::new(config, provider);
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Beta(args) => {
            let ticker = normalize_ticker(&args.ticker);
            let range = period_range(&engine, &args.period, today);
            let view = with_spinner(format!("Fetching {ticker} and the benchmark..."), engine.beta_analysis(&ticker, range))
                .await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                render::beta(&view);
            }
        }
        Commands::Capm(args) => {
            let tickers: Vec<String> = args
                .tickers
                .iter()
                .map(|t| normalize_ticker(t))
                .filter(|t| !t.is_empty())
                .collect();
            anyhow::ensure!(!tickers.is_empty(), "no tickers given");
            let range = period_range(&engine, &args.period, today);
            let batch = with_spinner(format!("Fetching {} tickers...", tickers.len()), engine.capm_batch(&tickers, range))
                .await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&batch)?);
            } else {
                render::capm(&batch);
            }
        }
        Commands::Analyze(args) => {
            let ticker = normalize_ticker(&args.ticker);
            let to = args.to.unwrap_or(today);
            let recent = match args.from {
                Some(from) => HistoryRange::Between(from, to),
                None => HistoryRange::years_back(to, 1),
            };
            let view = with_spinner(
                format!("Fetching {ticker}..."),
                engine.stock_analysis(&ticker, args.timeframe, recent),
            )
            .await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&render::analysis_json(&view))?);
            } else {
                render::analysis(&view);
            }
        }
        Commands::Predict(args) => {
            let ticker = normalize_ticker(&args.ticker);
            let range = engine.forecast_range(today);
            let prediction = with_spinner(format!("Forecasting {ticker}..."), engine.predict(&ticker, range)).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&prediction)?);
            } else {
                render::prediction(&prediction);
            }
        }
    }
    Ok(())
}

/// Tickers are case-insensitive on the provider side; display them upper-case.
fn normalize_ticker(raw: &str) -> String {
    raw.trim().to_uppercase()
}

fn period_range(engine: &QuantEngine, period: &PeriodArgs, today: NaiveDate) -> HistoryRange {
    match (period.from, period.to) {
        (Some(from), Some(to)) => HistoryRange::Between(from, to),
        _ => engine.capm_range(today, period.years),
    }
}

/// Shows a spinner on stderr while `task` runs.
async fn with_spinner<T>(message: String, task: impl std::future::Future<Output = T>) -> T {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    let output = task.await;
    spinner.finish_and_clear();
    output
}
