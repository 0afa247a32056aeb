use chrono::NaiveDate;
use indexmap::IndexMap;
use itertools::Itertools;
use tracing::info;

use crate::{
    model::{
        config::RatingConfig,
        error::RatingError,
        match_processor::{validate_placements, MatchProcessor},
        rating_tracker::RatingTracker,
        structures::{match_entry::MatchEntry, player_rating::PlayerRating, processing::ProcessedMatch}
    },
    utils::progress_utils::progress_bar
};

/// Runs matches in sequence against a tracked population.
///
/// Participants seen for the first time start from the configured defaults.
pub struct GlickoModel {
    config: RatingConfig,
    season_start: NaiveDate,
    pub rating_tracker: RatingTracker
}

impl GlickoModel {
    pub fn new(config: RatingConfig, season_start: NaiveDate, initial_players: &[PlayerRating]) -> GlickoModel {
        let mut tracker = RatingTracker::new();
        for player in initial_players {
            tracker.track_new(player);
        }

        GlickoModel {
            config,
            season_start,
            rating_tracker: tracker
        }
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    pub fn season_start(&self) -> NaiveDate {
        self.season_start
    }

    /// Processes `matches` in the order given, stopping at the first failure.
    pub fn process(&mut self, matches: &[&MatchEntry]) -> Result<(), RatingError> {
        self.process_with(matches, |_, _| {})
    }

    /// Like [`process`](GlickoModel::process), handing every processed match to `on_processed`.
    pub fn process_with(
        &mut self,
        matches: &[&MatchEntry],
        mut on_processed: impl FnMut(&MatchEntry, ProcessedMatch)
    ) -> Result<(), RatingError> {
        let bar = progress_bar(matches.len() as u64, "Processing match history");

        for entry in matches {
            let processed = self.process_match(entry)?;
            on_processed(entry, processed);
            bar.inc(1);
        }

        bar.finish_and_clear();
        info!(
            matches = matches.len(),
            players = self.rating_tracker.len(),
            "Processed match history"
        );

        Ok(())
    }

    /// Rates one match and folds the result into the tracker.
    pub fn process_match(&mut self, entry: &MatchEntry) -> Result<ProcessedMatch, RatingError> {
        validate_placements(&entry.placements, entry.date)?;

        let participants: Vec<PlayerRating> = entry
            .placements
            .iter()
            .map(|placement| self.current_or_default(&placement.name))
            .collect();

        let processed = MatchProcessor::new(&self.config).process(&participants, &entry.placements, entry.date)?;

        for player in &participants {
            if !self.rating_tracker.contains(&player.name) {
                self.rating_tracker.track_new(player);
            }
        }
        self.rating_tracker.insert_or_update(&processed.ratings);
        self.rating_tracker.record_adjustments(&processed.adjustments);

        Ok(processed)
    }

    pub fn into_ratings(self) -> IndexMap<String, PlayerRating> {
        self.rating_tracker.into_ratings()
    }

    fn current_or_default(&self, name: &str) -> PlayerRating {
        self.rating_tracker
            .get_rating(name)
            .cloned()
            .unwrap_or_else(|| PlayerRating::new(name, self.season_start, &self.config))
    }
}

/// Matches ordered by date, then by id. Matches without an id keep their
/// relative input order after identified matches of the same date.
pub fn chronological(history: &[MatchEntry]) -> Vec<&MatchEntry> {
    history
        .iter()
        .sorted_by_key(|entry| (entry.date, entry.id.is_none(), entry.id))
        .collect()
}

/// The configured season start, or the date of the earliest match.
pub fn replay_season_start(history: &[MatchEntry], config: &RatingConfig) -> Option<NaiveDate> {
    config
        .season_start()
        .or_else(|| history.iter().map(|entry| entry.date).min())
}

/// # Full re-derivation
///
/// Replays `history` chronologically from default ratings and returns the
/// final state of every participant, best rating first.
///
/// The result depends only on the history and the config, so running it
/// twice gives identical states.
pub fn recalculate_all(
    history: &[MatchEntry],
    config: &RatingConfig
) -> Result<IndexMap<String, PlayerRating>, RatingError> {
    let Some(season_start) = replay_season_start(history, config) else {
        return Ok(IndexMap::new());
    };

    let mut model = GlickoModel::new(config.clone(), season_start, &[]);
    model.process(&chronological(history))?;

    Ok(model.into_ratings())
}
