//! Command-line entry point for the goban-ratings tool
//!
//! Wires configuration, logging, and the JSON record store together and
//! dispatches the rating subcommands.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use goban_ratings::batch::BatchRunner;
use goban_ratings::config::{validate_config, AppConfig};
use goban_ratings::rating::{EgfRatingCalculator, RatingCalculator};
use goban_ratings::registry::{register_player, NewPlayer};
use goban_ratings::store::{JsonFileStore, RecordStore};
use goban_ratings::types::{MatchResult, TournamentClass, Winner};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Goban Ratings - EGF rating updates for the club's player records
#[derive(Parser)]
#[command(
    name = "goban-ratings",
    version,
    about = "Computes EGF-style Go rating updates and maintains the club records"
)]
struct Args {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Override the JSON store file path
    #[arg(short, long, value_name = "FILE")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rate a single game and print both rating increments
    Rate {
        rating_a: f64,
        rating_b: f64,
        /// Winning side: first or second
        #[arg(long, default_value = "first")]
        winner: String,
        /// Handicap stones (0-9)
        #[arg(long, default_value_t = 0)]
        handicap: u8,
        /// Tournament class: a, b or c
        #[arg(long, default_value = "a")]
        class: String,
    },
    /// Rate all pending matches and write back the results
    Run {
        /// Compute and print results without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Register a new player
    AddPlayer {
        /// Explicit three-digit id; drawn at random when omitted
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        first_names: String,
        #[arg(long)]
        rating: f64,
    },
    /// Round display ratings and copy them into the base-rating column
    Sync,
    /// Round fractional display ratings for publication
    Publish,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    config.apply_env();
    if let Some(level) = &args.log_level {
        config.service.log_level = level.clone();
    }
    if let Some(path) = &args.store {
        config.store.path = path.clone();
    }
    validate_config(&config)?;
    Ok(config)
}

fn parse_winner(winner: &str) -> Result<Winner> {
    match winner.to_ascii_lowercase().as_str() {
        "first" | "a" | "1" => Ok(Winner::FirstPlayer),
        "second" | "b" | "2" => Ok(Winner::SecondPlayer),
        other => Err(anyhow!("unknown winner '{other}', expected first or second")),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    init_logging(&config.service.log_level)?;

    match args.command {
        Command::Rate {
            rating_a,
            rating_b,
            winner,
            handicap,
            class,
        } => {
            let class: TournamentClass = class.parse()?;
            let result =
                MatchResult::new(rating_a, rating_b, parse_winner(&winner)?, handicap, class)?;
            let deltas = EgfRatingCalculator::new().compute_deltas(&result)?;
            println!("{:+.2} {:+.2}", deltas.first, deltas.second);
        }
        Command::Run { dry_run } => {
            let store = Arc::new(JsonFileStore::open(&config.store.path)?);
            let runner = BatchRunner::new(store, Arc::new(EgfRatingCalculator::new()));
            let report = runner.run(dry_run)?;
            for update in &report.updates {
                println!(
                    "{}: {:+.2} -> {:.1} ({})",
                    update.player_id, update.delta, update.new_rating, update.grade
                );
            }
            info!(
                processed = report.processed,
                skipped = report.skipped,
                dry_run = report.dry_run,
                "batch complete"
            );
        }
        Command::AddPlayer {
            id,
            last_name,
            first_names,
            rating,
        } => {
            let store = JsonFileStore::open(&config.store.path)?;
            let record = register_player(
                &store,
                NewPlayer {
                    id,
                    last_name,
                    first_names,
                    rating,
                },
            )?;
            store.persist()?;
            println!(
                "registered {} {} as id {} ({})",
                record.first_names, record.last_name, record.id, record.grade
            );
        }
        Command::Sync => {
            let store = JsonFileStore::open(&config.store.path)?;
            store.sync_base_ratings()?;
            store.persist()?;
            info!("base ratings synchronized");
        }
        Command::Publish => {
            let store = JsonFileStore::open(&config.store.path)?;
            store.round_ratings()?;
            store.persist()?;
            info!("display ratings rounded");
        }
    }

    Ok(())
}
