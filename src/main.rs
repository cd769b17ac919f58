use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use signal_engine::data::{
    CsvPriceProvider, MemorySignalStore, PriceHistoryProvider, SignalStore,
};
use signal_engine::synthetic::{MarketScenario, SyntheticSeriesGenerator};
use signal_engine::{AnalysisRequest, EngineConfig, SignalEngine, SignalResult};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "signal-engine",
    about = "Technical-analysis signals from daily closing prices"
)]
struct Cli {
    /// Engine config file (TOML/JSON); SIGNAL_* env vars override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze one ticker and print the signal as JSON
    Analyze {
        /// Directory holding <TICKER>.csv files
        #[arg(long)]
        data_dir: PathBuf,
        #[arg(long)]
        ticker: String,
        /// Only use prices on or before this date (defaults to the last row)
        #[arg(long)]
        as_of: Option<NaiveDate>,
        #[arg(long)]
        pretty: bool,
    },
    /// Analyze every ticker in a directory in parallel
    Batch {
        #[arg(long)]
        data_dir: PathBuf,
        /// Restrict to these tickers
        #[arg(long, value_delimiter = ',')]
        tickers: Vec<String>,
    },
    /// Run the engine on synthetic data
    Demo {
        #[arg(long, value_enum, default_value = "uptrend")]
        scenario: MarketScenario,
        #[arg(long, default_value_t = 300)]
        days: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Starting price of the synthetic series
        #[arg(long, default_value_t = 150.0)]
        base_price: f64,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let cli = Cli::parse();
    let config =
        EngineConfig::load(cli.config.as_deref()).context("Failed to load engine config")?;
    let engine = SignalEngine::new(config);

    match cli.command {
        Command::Analyze {
            data_dir,
            ticker,
            as_of,
            pretty,
        } => analyze(&engine, &CsvPriceProvider::new(data_dir), &ticker, as_of, pretty),
        Command::Batch { data_dir, tickers } => {
            batch(&engine, &CsvPriceProvider::new(data_dir), tickers)
        }
        Command::Demo {
            scenario,
            days,
            seed,
            base_price,
        } => demo(&engine, scenario, days, seed, base_price),
    }
}

fn setup_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("signal_engine=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn analyze(
    engine: &SignalEngine,
    provider: &impl PriceHistoryProvider,
    ticker: &str,
    as_of: Option<NaiveDate>,
    pretty: bool,
) -> Result<()> {
    let request = load_request(provider, ticker, as_of)?;
    let result = engine.analyze(&request.ticker, &request.closes, request.as_of)?;

    let json = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", json);
    Ok(())
}

fn batch(
    engine: &SignalEngine,
    provider: &impl PriceHistoryProvider,
    tickers: Vec<String>,
) -> Result<()> {
    let tickers = if tickers.is_empty() {
        provider.tickers().context("Failed to list tickers")?
    } else {
        tickers
    };

    let mut requests = Vec::with_capacity(tickers.len());
    for ticker in &tickers {
        match load_request(provider, ticker, None) {
            Ok(request) => requests.push(request),
            Err(e) => tracing::warn!("Skipping {}: {:#}", ticker, e),
        }
    }

    tracing::info!("Analyzing {} tickers", requests.len());

    let mut store = MemorySignalStore::new();
    for (ticker, result) in engine.analyze_batch(&requests) {
        match result {
            Ok(signal) => {
                store.upsert(signal);
            }
            Err(e) => tracing::warn!("Analysis failed for {}: {}", ticker, e),
        }
    }

    print_table(store.iter());
    Ok(())
}

fn demo(
    engine: &SignalEngine,
    scenario: MarketScenario,
    days: usize,
    seed: u64,
    base_price: f64,
) -> Result<()> {
    let needed = engine.config().longest_period();
    if days < needed {
        tracing::warn!(
            "{} days is shorter than the longest look-back ({}), indicators may be neutral",
            days,
            needed
        );
    }

    let today = Local::now().date_naive();
    let series = SyntheticSeriesGenerator::new(seed)
        .with_base_price(base_price)
        .generate(scenario, days, today);
    let ticker = format!("SYNTH-{:?}", scenario).to_uppercase();

    let result = engine.analyze(&ticker, &series.closes, today)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn load_request(
    provider: &impl PriceHistoryProvider,
    ticker: &str,
    as_of: Option<NaiveDate>,
) -> Result<AnalysisRequest> {
    let history = provider
        .history(ticker)
        .with_context(|| format!("Failed to load price history for {}", ticker))?;
    let history = match as_of {
        Some(date) => history.up_to(date),
        None => history,
    };

    let as_of = history
        .last_date()
        .with_context(|| format!("No prices for {} in range", ticker))?;

    Ok(AnalysisRequest {
        ticker: history.ticker,
        closes: history.closes,
        as_of,
    })
}

fn print_table<'a>(results: impl Iterator<Item = &'a SignalResult>) {
    println!(
        "{:<10} {:>12} {:>10} {:>8} {:>6} {:<12}",
        "Ticker", "Date", "Price", "RSI", "Score", "Label"
    );
    println!("{}", "─".repeat(64));

    for r in results {
        println!(
            "{:<10} {:>12} {:>10.2} {:>8.2} {:>6} {:<12}",
            r.ticker, r.as_of, r.price, r.rsi, r.score, r.label
        );
    }
}
