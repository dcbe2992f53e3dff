//! Tradebook CLI — run the trade log pipeline or check an input file.
//!
//! Commands:
//! - (none) — run the pipeline with defaults: `data.csv` → `./data_analyzed/`
//! - `run` — run the pipeline from a TOML config, with flag overrides
//! - `check` — normalize and account an input file without writing anything

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tradebook_core::account_file;
use tradebook_core::aggregate::SymbolHitStats;
use tradebook_runner::{run_pipeline, PipelineConfig, PipelineRun};

#[derive(Parser)]
#[command(
    name = "tradebook",
    about = "Tradebook — trade log accounting and performance workbook"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and write the workbook directory.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Input trade log CSV. Overrides the config file.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Directory the workbook directory is created in. Overrides the config file.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Skip Parquet export.
        #[arg(long, default_value_t = false)]
        no_parquet: bool,

        /// Skip the Markdown report.
        #[arg(long, default_value_t = false)]
        no_report: bool,
    },
    /// Normalize and account a trade log without writing any output.
    Check {
        /// Input trade log CSV.
        #[arg(long)]
        input: PathBuf,

        /// Path to a TOML config file (date formats, accounting parameters).
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        None => run_cmd(PipelineConfig::default()),
        Some(Commands::Run {
            config,
            input,
            output_dir,
            no_parquet,
            no_report,
        }) => {
            let mut config = load_config(config)?;
            if let Some(input) = input {
                config.input = input;
            }
            if let Some(output_dir) = output_dir {
                config.output_dir = output_dir;
            }
            if no_parquet {
                config.export.parquet = false;
            }
            if no_report {
                config.export.report = false;
            }
            run_cmd(config)
        }
        Some(Commands::Check { input, config }) => {
            let mut config = load_config(config)?;
            config.input = input;
            check_cmd(&config)
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::from_file(&path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

fn run_cmd(config: PipelineConfig) -> Result<()> {
    info!(input = %config.input.display(), "starting run");
    let run = run_pipeline(&config)
        .with_context(|| format!("run failed for {}", config.input.display()))?;
    print_summary(&run);
    Ok(())
}

fn check_cmd(config: &PipelineConfig) -> Result<()> {
    config.validate()?;
    let accounted = account_file(&config.input, &config.ingest_options(), &config.accounting)
        .with_context(|| format!("check failed for {}", config.input.display()))?;
    let ledger = &accounted.ledger;
    println!("Input:          {}", config.input.display());
    println!("Columns:        {}", accounted.columns.join(", "));
    println!("Rows:           {}", ledger.len());
    println!("Final Balance:  {:.2}", ledger.final_balance);
    println!("OK");
    Ok(())
}

fn print_summary(run: &PipelineRun) {
    let ledger = run.analysis.ledger();
    println!();
    println!("=== Tradebook Run ===");
    println!("Input:          {}", run.analysis.input.display());
    println!("Trades:         {}", ledger.len());
    println!("Initial:        {:.2}", ledger.initial_balance);
    println!("Final:          {:.2}", ledger.final_balance);
    println!("Net P/L:        {:.2}", ledger.total_net_pl());
    println!("Commission:     {:.2}", ledger.total_commission());
    println!();
    print_hit_by_symbol(&run.analysis.aggregates.symbols);
    println!();
    println!("Artifacts saved to: {}", run.artifacts.dir.display());
}

fn print_hit_by_symbol(stats: &[SymbolHitStats]) {
    println!("--- Hit By Symbol ---");
    println!(
        "{:<10} {:>8} {:>8} {:>8} {:>8}",
        "Symbol", "Profits", "Losses", "Total", "Hit %"
    );
    println!("{}", "-".repeat(46));
    for s in stats {
        println!(
            "{:<10} {:>8} {:>8} {:>8} {:>7.1}%",
            s.symbol,
            s.profits,
            s.losses,
            s.total,
            s.hit_ratio * 100.0
        );
    }
}
