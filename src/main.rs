//! GymScout CLI — wires the enrichment pipeline together.
//!
//! The application container built here owns the single scheduler instance
//! for the process; commands either park on it (`run`) or drive one cycle
//! (`once`).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use gymscout_core::config::GymScoutConfig;
use gymscout_core::error::GymScoutError;
use gymscout_core::types::UpdateStrategy;
use gymscout_providers::providers_for;
use gymscout_scheduler::{CycleOutcome, ProviderFactory, UpdateScheduler};
use gymscout_search::IntervalPacer;
use gymscout_store::{EnrichmentOracle, SqliteGymStore};

#[derive(Parser)]
#[command(name = "gymscout", version, about = "Gym place-data enrichment pipeline")]
struct Cli {
    /// Path to config.toml (default: ~/.gymscout/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the scheduler and run until interrupted
    Run,
    /// Run a single update cycle now
    Once {
        /// Strategy override for this cycle only
        #[arg(long)]
        strategy: Option<String>,
    },
    /// Print scheduler status as JSON
    Status,
    /// Print the planned search queries for a gym name
    Plan { name: String },
    /// Add a gym to the local database
    Seed {
        name: String,
        #[arg(default_value = "")]
        address: String,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}

fn load_config(path: &Option<PathBuf>) -> Result<GymScoutConfig> {
    match path {
        Some(p) => GymScoutConfig::load_from(p).context("Failed to load config"),
        None => GymScoutConfig::load().context("Failed to load config"),
    }
}

fn build_scheduler(config: &GymScoutConfig) -> Result<UpdateScheduler> {
    let store = Arc::new(SqliteGymStore::open(&config.store.resolved_path())?);
    let oracle = Arc::new(EnrichmentOracle::new(config.schedule.interval_days));
    let provider_config = config.providers.clone();
    let factory: ProviderFactory =
        Arc::new(move |strategy| providers_for(strategy, &provider_config));
    let pacer = Arc::new(IntervalPacer::new(std::time::Duration::from_millis(
        config.providers.query_gap_ms,
    )));
    Ok(UpdateScheduler::new(
        config.schedule.clone(),
        store,
        oracle,
        factory,
        pacer,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Command::Run => {
            let scheduler = build_scheduler(&config)?;
            scheduler.start();
            tracing::info!("🏋️ GymScout running, press Ctrl-C to stop");
            tokio::signal::ctrl_c().await?;
            scheduler.stop();
        }
        Command::Once { strategy } => {
            let scheduler = build_scheduler(&config).map_err(|e| {
                GymScoutError::Scheduler(format!(
                    "manual update requires an initialized scheduler: {e}"
                ))
            })?;
            let strategy_override = strategy.as_deref().map(UpdateStrategy::parse_or_default);
            match scheduler.run_manual_update(strategy_override).await {
                CycleOutcome::Completed(stats) => println!(
                    "updated {}/{} gyms ({} unresolved)",
                    stats.success_count, stats.total, stats.failure_count
                ),
                CycleOutcome::SkippedByGate => println!("skipped: gym data still fresh"),
                CycleOutcome::Skipped => println!("skipped: another cycle is running"),
                CycleOutcome::Failed => anyhow::bail!("update cycle failed, see logs"),
            }
        }
        Command::Status => {
            let scheduler = build_scheduler(&config)?;
            println!("{}", serde_json::to_string_pretty(&scheduler.status())?);
        }
        Command::Plan { name } => {
            for query in gymscout_search::planner::plan(&name) {
                println!("{query}");
            }
        }
        Command::Seed { name, address } => {
            let store = SqliteGymStore::open(&config.store.resolved_path())?;
            let id = store.insert(&name, &address)?;
            println!("added gym {id}: {name}");
        }
    }
    Ok(())
}
