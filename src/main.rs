use std::{fs, path::PathBuf, process::exit};

use clap::Parser;
use glicko_processor::{
    args::Args,
    database::memory::InMemoryStore,
    model::{
        error::{ConfigError, RatingError},
        structures::{match_entry::MatchEntry, participant_policy::ParticipantPolicy}
    },
    service::RatingService
};
use thiserror::Error;
use tracing::{error, info};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Error)]
enum AppError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error
    },

    #[error("malformed match history: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Rating(#[from] RatingError)
}

fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();

    init_logging(&args.log_level);

    if let Err(e) = run(&args) {
        error!("{e}");
        exit(1);
    }
}

fn init_logging(level: &str) {
    let indicatif_layer = IndicatifLayer::new();

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .init();
}

fn run(args: &Args) -> Result<(), AppError> {
    let config = args.rating_config()?;

    let raw = fs::read_to_string(&args.history).map_err(|source| AppError::Io {
        path: args.history.clone(),
        source
    })?;
    let history: Vec<MatchEntry> = serde_json::from_str(&raw)?;
    info!(matches = history.len(), path = %args.history.display(), "Loaded match history");

    let mut service = RatingService::new(
        InMemoryStore::with_history(history),
        config,
        ParticipantPolicy::AutoCreate
    );
    service.recalculate()?;

    let leaderboard = service.leaderboard()?;
    info!(players = leaderboard.len(), "Ratings recalculated");

    let json = serde_json::to_string_pretty(&leaderboard)?;
    match &args.output {
        Some(path) => fs::write(path, json).map_err(|source| AppError::Io {
            path: path.clone(),
            source
        })?,
        None => println!("{json}")
    }

    Ok(())
}
