use anyhow::Context;
use api_client::YahooClient;
use clap::{Parser, Subcommand, ValueEnum};
use comparison::{ComparisonRequest, ComparisonSession, FetchObserver};
use configuration::{BenchmarkWindow, Config};
use core_types::Period;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use std::path::PathBuf;

mod display;

/// The main entry point for the ETF comparison tool.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional: a .env file may carry RUST_LOG or ETF_COMPARE__* overrides.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = configuration::load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    let _log_guard = configuration::init_logging(&config.logging)?;
    tracing::debug!(path = %cli.config.display(), etfs = config.etfs.len(), "Configuration loaded.");

    // Execute the appropriate command
    match cli.command {
        Commands::List => {
            println!("{}", display::render_catalog(&config.etfs));
        }
        Commands::Compare(args) => handle_compare(args, &config).await?,
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Compare up to three ETFs on return, volatility, beta, drawdown and alpha.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file (optional; defaults apply when missing).
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the ETFs available for comparison and the selectable periods.
    List,
    /// Download prices and compare the selected ETFs against the benchmark.
    Compare(CompareArgs),
}

#[derive(Parser)]
struct CompareArgs {
    /// An ETF to compare, by name or symbol (e.g., "IWM"). Repeat for more.
    #[arg(long = "etf", short = 'e', required = true)]
    etfs: Vec<String>,

    /// Lookback period: 1mo, 3mo, 6mo, 1y, ytd, 5y or 10y. Repeat to compare
    /// several periods in one session.
    #[arg(long = "period", short = 'p')]
    periods: Vec<Period>,

    /// The simulated initial investment.
    #[arg(long)]
    amount: Option<Decimal>,

    /// Risk-free rate for the period, in percent.
    #[arg(long)]
    risk_free_rate: Option<Decimal>,

    /// Which part of the benchmark series is used for alpha.
    #[arg(long, value_enum)]
    benchmark_window: Option<BenchmarkWindow>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

// ==============================================================================
// Compare Command Logic
// ==============================================================================

/// Advances a progress bar as each ETF download finishes.
struct ProgressObserver {
    bar: ProgressBar,
}

impl FetchObserver for ProgressObserver {
    fn on_fetched(&self, symbol: &str, succeeded: bool) {
        let status = if succeeded { "done" } else { "failed" };
        self.bar.set_message(format!("{} {}", symbol, status));
        self.bar.inc(1);
    }
}

/// Handles the orchestration of a comparison.
async fn handle_compare(args: CompareArgs, config: &Config) -> anyhow::Result<()> {
    let provider = YahooClient::new(&config.provider)?;
    let session = ComparisonSession::new(provider, config);

    let mut base = ComparisonRequest::with_defaults(args.etfs, &config.comparison);
    if let Some(amount) = args.amount {
        base.initial_investment = amount;
    }
    if let Some(rate) = args.risk_free_rate {
        base.risk_free_rate_pct = rate;
    }
    if let Some(window) = args.benchmark_window {
        base.benchmark_window = window;
    }

    let periods = if args.periods.is_empty() {
        vec![config.comparison.default_period]
    } else {
        args.periods
    };

    let mut any_data = false;
    let mut json_reports = Vec::new();

    for period in periods {
        let request = ComparisonRequest {
            period,
            ..base.clone()
        };

        // Set up the progress bar
        let progress_bar = ProgressBar::new(request.selections.len() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );
        progress_bar.set_message(format!("Downloading prices ({})...", period.label()));

        let observer = ProgressObserver {
            bar: progress_bar.clone(),
        };
        let report = session.run(&request, &observer).await?;
        progress_bar.finish_and_clear();

        any_data |= report.has_any_data();
        match args.format {
            OutputFormat::Table => println!("{}\n", display::render_table(&report)),
            OutputFormat::Json => json_reports.push(display::render_json(&report)),
        }
    }

    if let OutputFormat::Json = args.format {
        println!("{}", serde_json::to_string_pretty(&json_reports)?);
    }

    if !any_data {
        anyhow::bail!("No valid data found for the selected ETFs.");
    }

    Ok(())
}
