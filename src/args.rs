use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::model::{
    config::RatingConfig,
    error::ConfigError,
    structures::{
        cap_scope::CapScope, decay_resolution::DecayResolution, outcome_scoring::OutcomeScoring,
        same_day_mode::SameDayMode
    }
};

#[derive(Parser, Clone, Debug)]
#[command(
    display_name = "Glicko Processor",
    long_about = "Replays a free-for-all match history with Glicko-2 and prints the resulting leaderboard"
)]
pub struct Args {
    /// JSON array of matches, each with a `date` (YYYY-MM-DD) and `placements`
    /// (`name` and 1-based `rank`, tied participants sharing a rank).
    #[arg(short = 'i', long, env = "HISTORY_FILE", help = "Match history file")]
    pub history: PathBuf,

    /// Where to write the leaderboard JSON. Defaults to stdout.
    #[arg(short, long, env = "OUTPUT_FILE")]
    pub output: Option<PathBuf>,

    #[arg(long, env, default_value_t = DecayResolution::Weeks)]
    pub decay_resolution: DecayResolution,

    #[arg(long, env, default_value_t = crate::model::constants::DEFAULT_TAU)]
    pub tau: f64,

    #[arg(long, env, default_value_t = crate::model::constants::MAX_RATING_CHANGE)]
    pub rating_change_cap: f64,

    #[arg(long, env, default_value_t = CapScope::EveryMatch)]
    pub cap_scope: CapScope,

    #[arg(long, env, default_value_t = SameDayMode::FirstGameFullRestLightweight)]
    pub same_day_mode: SameDayMode,

    /// Widens performance variance by the share of tied pairs in the match
    #[arg(long, env, action = clap::ArgAction::SetTrue)]
    pub tie_variance_inflation: bool,

    #[arg(long, env, default_value_t = OutcomeScoring::Pairwise)]
    pub outcome_scoring: OutcomeScoring,

    /// Scales rating movement by the number of opponents
    #[arg(long, env, action = clap::ArgAction::SetTrue)]
    pub field_size_scaling: bool,

    /// Spreads deviations by finish order, damped by this factor in (0, 1]
    #[arg(long, env)]
    pub rd_spread_damping: Option<f64>,

    /// Decay reference date for players without a match. Defaults to the
    /// earliest match in the history.
    #[arg(long, env)]
    pub season_start: Option<NaiveDate>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        env = "RUST_LOG",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"],
        help = "Sets the logging verbosity"
    )]
    pub log_level: String
}

impl Args {
    pub fn rating_config(&self) -> Result<RatingConfig, ConfigError> {
        RatingConfig::builder()
            .decay_resolution(self.decay_resolution)
            .tau(self.tau)
            .rating_change_cap(self.rating_change_cap)
            .cap_scope(self.cap_scope)
            .same_day_mode(self.same_day_mode)
            .tie_variance_inflation(self.tie_variance_inflation)
            .outcome_scoring(self.outcome_scoring)
            .field_size_scaling(self.field_size_scaling)
            .rd_spread_damping(self.rd_spread_damping)
            .season_start(self.season_start)
            .build()
    }
}
