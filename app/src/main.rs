// In app/src/main.rs

use analytics::{
    BucketStats, Column, SortOrder, StrategyComparator, TimeAnalysisConfig, TimeOfDayAnalyzer,
};
use anyhow::{Context, Result};
use app_config::Settings;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use simulator::{
    CancellationToken, PathSimulator, ReturnModel, SimulationConfig, SimulationRun, TradeResampler,
};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;
use tracing_subscriber::prelude::*;

mod ledger;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(
    name = "edgelab",
    author,
    version,
    about,
    long_about = "Monte Carlo projections, strategy comparison and time-of-day analysis for closed-trade ledgers."
)]
struct Cli {
    /// Print structured JSON instead of the text report.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides for the `[simulation]` settings.
#[derive(Args, Debug, Clone, Default)]
struct SimulationArgs {
    /// Number of simulated paths.
    #[arg(short = 'n', long)]
    simulations: Option<usize>,

    /// Starting capital of every path.
    #[arg(long)]
    capital: Option<f64>,

    /// Random seed; identical seeds reproduce identical paths.
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads (0 = one per core).
    #[arg(long)]
    threads: Option<usize>,
}

impl SimulationArgs {
    fn apply(&self, mut config: SimulationConfig) -> SimulationConfig {
        if let Some(n) = self.simulations {
            config.num_simulations = n;
        }
        if let Some(capital) = self.capital {
            config.initial_capital = capital;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(threads) = self.threads {
            config.worker_threads = threads;
        }
        config
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Model {
    /// Draw observed returns with replacement.
    Empirical,
    /// Draw from a normal fitted to the observed returns.
    Normal,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Projects equity paths by resampling a daily return series.
    Simulate {
        /// CSV file with a `return` column of fractional returns.
        #[arg(short, long)]
        returns: PathBuf,

        /// Periods per path.
        #[arg(long)]
        horizon: Option<usize>,

        #[arg(long, value_enum, default_value_t = Model::Empirical)]
        model: Model,

        #[command(flatten)]
        sim: SimulationArgs,
    },

    /// Resamples a trade ledger to measure sequencing risk.
    Resample {
        /// Trade ledger CSV.
        #[arg(short, long)]
        trades: PathBuf,

        /// Synthetic trades per path.
        #[arg(long)]
        num_trades: Option<usize>,

        /// Only use trades with this strategy tag.
        #[arg(long)]
        strategy: Option<String>,

        #[command(flatten)]
        sim: SimulationArgs,
    },

    /// Compares every strategy tag found in a trade ledger.
    Compare {
        /// Trade ledger CSV.
        #[arg(short, long)]
        trades: PathBuf,

        /// Column to rank by (e.g. total_pnl, sharpe_ratio, profit_factor).
        #[arg(long, default_value = "total_pnl")]
        rank_by: String,

        /// Run a two-sample t-test between two strategies.
        #[arg(long, num_args = 2, value_names = ["A", "B"])]
        test: Option<Vec<String>>,
    },

    /// Buckets trades by weekday and time of day.
    TimeAnalysis {
        /// Trade ledger CSV.
        #[arg(short, long)]
        trades: PathBuf,

        /// Minimum trades for a bucket to count as "best".
        #[arg(long)]
        min_trades: Option<usize>,

        /// `hour` or `half_hour`.
        #[arg(long)]
        granularity: Option<String>,

        /// Minutes east of UTC of the exchange clock (330 for IST).
        #[arg(long, allow_hyphen_values = true)]
        utc_offset: Option<i32>,

        /// How many best/worst slots to list.
        #[arg(long)]
        top: Option<usize>,
    },
}

// --- Main Application Entry Point ---

fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = app_config::load_settings().context("Failed to load settings")?;
    init_tracing(&settings.app.log_level)?;

    tracing::info!(environment = %settings.app.environment, "Starting edgelab");
    let started = Instant::now();

    match cli.command {
        Commands::Simulate {
            returns,
            horizon,
            model,
            sim,
        } => handle_simulate(&settings, returns, horizon, model, &sim, cli.json)?,
        Commands::Resample {
            trades,
            num_trades,
            strategy,
            sim,
        } => handle_resample(&settings, trades, num_trades, strategy, &sim, cli.json)?,
        Commands::Compare {
            trades,
            rank_by,
            test,
        } => handle_compare(trades, &rank_by, test, cli.json)?,
        Commands::TimeAnalysis {
            trades,
            min_trades,
            granularity,
            utc_offset,
            top,
        } => handle_time_analysis(&settings, trades, min_trades, granularity, utc_offset, top, cli.json)?,
    }

    tracing::info!(duration = ?started.elapsed(), "edgelab has finished successfully.");
    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let level = tracing::Level::from_str(log_level)
        .with_context(|| format!("Invalid log level: {log_level}"))?;
    // Reports go to stdout, so logs go to stderr.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(
            tracing_subscriber::filter::Targets::new().with_default(level),
        );
    tracing_subscriber::registry().with(fmt_layer).init();
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn emit_run(run: &SimulationRun, json: bool) -> Result<()> {
    if json {
        let stats = run.calculate_statistics()?;
        print_json(&serde_json::json!({
            "config": run.config(),
            "expected_terminal": run.expected_terminal(),
            "statistics": stats.to_map(),
        }))
    } else {
        println!("{}", run.generate_report()?);
        Ok(())
    }
}

fn handle_simulate(
    settings: &Settings,
    returns: PathBuf,
    horizon: Option<usize>,
    model: Model,
    sim: &SimulationArgs,
    json: bool,
) -> Result<()> {
    let series = ledger::load_returns(&returns)?;

    let mut config = sim.apply(settings.simulation.path_config(settings.app.worker_threads));
    if let Some(horizon) = horizon {
        config.horizon = horizon;
    }

    let return_model = match model {
        Model::Empirical => ReturnModel::Empirical(&series),
        Model::Normal => ReturnModel::fitted_normal(&series)?,
    };

    tracing::info!(
        simulations = config.num_simulations,
        horizon = config.horizon,
        ?model,
        "Running path simulation..."
    );
    let started = Instant::now();
    let run = PathSimulator::new(config).simulate_with(&return_model, &CancellationToken::new())?;
    tracing::info!(duration = ?started.elapsed(), seed = run.config().seed, "Path simulation finished.");

    emit_run(&run, json)
}

fn handle_resample(
    settings: &Settings,
    trades: PathBuf,
    num_trades: Option<usize>,
    strategy: Option<String>,
    sim: &SimulationArgs,
    json: bool,
) -> Result<()> {
    let mut trades = ledger::load_trades(&trades)?;
    if let Some(name) = &strategy {
        trades.retain(|t| t.strategy() == name);
        tracing::info!(strategy = %name, trades = trades.len(), "Filtered ledger by strategy.");
    }

    let mut config = sim.apply(settings.simulation.resample_config(settings.app.worker_threads));
    if let Some(n) = num_trades {
        config.horizon = n;
    }

    tracing::info!(
        simulations = config.num_simulations,
        num_trades = config.horizon,
        source_trades = trades.len(),
        "Running trade resampling..."
    );
    let started = Instant::now();
    let run = TradeResampler::new(config).resample(&trades)?;
    tracing::info!(duration = ?started.elapsed(), seed = run.config().seed, "Trade resampling finished.");

    emit_run(&run, json)
}

fn handle_compare(
    trades: PathBuf,
    rank_by: &str,
    test: Option<Vec<String>>,
    json: bool,
) -> Result<()> {
    let column = Column::from_str(rank_by)?;
    let trades = ledger::load_trades(&trades)?;

    let mut comparator = StrategyComparator::new();
    for (name, own) in ledger::group_by_strategy(&trades) {
        comparator.add_strategy(name, own)?;
    }

    let table = comparator.compare_all()?;
    let statistical_test = match test.as_deref() {
        Some([a, b]) => Some(comparator.run_statistical_test(a, b)?),
        _ => None,
    };

    if json {
        return print_json(&serde_json::json!({
            "ranked_by": column.name(),
            "rows": table.ranked_by(column, SortOrder::Descending),
            "statistical_test": statistical_test,
        }));
    }

    println!("{}", comparator.generate_comparison_report()?);
    if column != Column::SharpeRatio {
        println!("\nRANKING BY {}:", column.name().to_uppercase());
        for (i, row) in table.ranked_by(column, SortOrder::Descending).iter().enumerate() {
            println!("   {}. {}: {:.2}", i + 1, row.strategy, column.value(&row.report));
        }
    }
    if let Some(result) = &statistical_test {
        println!("\n{}", analytics::report::render_statistical_test(result));
    }
    Ok(())
}

#[derive(Serialize)]
struct BucketRow<'a> {
    weekday: String,
    slot: String,
    #[serde(flatten)]
    stats: &'a BucketStats,
}

fn handle_time_analysis(
    settings: &Settings,
    trades: PathBuf,
    min_trades: Option<usize>,
    granularity: Option<String>,
    utc_offset: Option<i32>,
    top: Option<usize>,
    json: bool,
) -> Result<()> {
    let mut config = TimeAnalysisConfig::from(&settings.time_analysis);
    if let Some(min) = min_trades {
        config.min_bucket_trades = min;
    }
    if let Some(raw) = granularity {
        config.granularity = raw.parse()?;
    }
    if let Some(offset) = utc_offset {
        config.utc_offset_minutes = offset;
    }
    let top_n = top.unwrap_or(settings.time_analysis.top_n);

    let trades = ledger::load_trades(&trades)?;
    let analyzer = TimeOfDayAnalyzer::new(&trades, config)?;
    tracing::info!(buckets = analyzer.buckets().len(), "Bucketed trades by time of day.");

    if json {
        let buckets: Vec<BucketRow> = analyzer
            .buckets()
            .iter()
            .map(|(key, stats)| BucketRow {
                weekday: key.weekday().to_string(),
                slot: key.slot.to_string(),
                stats,
            })
            .collect();
        let best = analyzer
            .find_best_trading_times()
            .ok()
            .map(|(key, _)| key.to_string());
        return print_json(&serde_json::json!({
            "buckets": buckets,
            "best_bucket": best,
            "best_hours": analyzer.best_hours(top_n).iter().map(ToString::to_string).collect::<Vec<_>>(),
            "worst_hours": analyzer.worst_hours(top_n).iter().map(ToString::to_string).collect::<Vec<_>>(),
        }));
    }

    println!("{}", analyzer.generate_report(top_n));
    Ok(())
}
