use chrono::NaiveDate;
use tracing::{info, warn};

use crate::{
    database::store::{RatingStore, StoreError},
    model::{
        config::RatingConfig,
        error::RatingError,
        glicko_model::{replay_season_start, GlickoModel},
        match_processor::{process_match, validate_placements},
        rating_tracker::RatingTracker,
        structures::{
            match_entry::{MatchId, Placement},
            participant_policy::ParticipantPolicy,
            player_rating::PlayerRating,
            processing::ProcessedMatch,
            standing::Standing
        }
    }
};

/// Store-backed rating operations.
///
/// Every mutating operation runs inside one store transaction: it either
/// commits completely or leaves the store untouched.
pub struct RatingService<S: RatingStore> {
    store: S,
    config: RatingConfig,
    policy: ParticipantPolicy
}

impl<S: RatingStore> RatingService<S> {
    pub fn new(store: S, config: RatingConfig, policy: ParticipantPolicy) -> RatingService<S> {
        RatingService { store, config, policy }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    pub fn player(&self, name: &str) -> Result<Option<PlayerRating>, RatingError> {
        Ok(self.store.load_player_by_name(name)?)
    }

    /// Registers a player with the configured default state.
    pub fn add_player(&mut self, name: &str, season_start: NaiveDate) -> Result<PlayerRating, RatingError> {
        let player = PlayerRating::new(checked_name(name)?, season_start, &self.config);
        self.insert(player)
    }

    /// Registers a player with an explicit starting state.
    pub fn add_player_with_state(
        &mut self,
        name: &str,
        rating: f64,
        deviation: f64,
        volatility: f64,
        season_start: NaiveDate
    ) -> Result<PlayerRating, RatingError> {
        let player = PlayerRating::with_state(
            checked_name(name)?,
            rating,
            deviation,
            volatility,
            season_start,
            &self.config
        )?;
        self.insert(player)
    }

    /// Rates a match against the stored states and commits the new states
    /// together with the match record.
    ///
    /// When the match predates a participant's last played match, the whole
    /// history is replayed with the match in place instead.
    pub fn record_match(&mut self, date: NaiveDate, placements: &[Placement]) -> Result<ProcessedMatch, RatingError> {
        validate_placements(placements, date)?;

        let mut created = Vec::new();
        let mut participants = Vec::with_capacity(placements.len());
        for placement in placements {
            match self.store.load_player_by_name(&placement.name)? {
                Some(player) => participants.push(player),
                None if self.policy == ParticipantPolicy::AutoCreate => {
                    let season_start = self.config.season_start().unwrap_or(date);
                    let player = PlayerRating::new(placement.name.clone(), season_start, &self.config);
                    created.push(player.clone());
                    participants.push(player);
                }
                None => return Err(RatingError::UnknownParticipant(placement.name.clone()))
            }
        }

        // A match older than a participant's latest one cannot be stacked on
        // the current states; it is slotted into the history and replayed.
        let backdated = participants
            .iter()
            .any(|player| player.last_played.is_some_and(|last| last > date));

        let (id, processed) = if backdated {
            self.transaction(|service| {
                for player in &created {
                    service.store.insert_player(player)?;
                }

                let id = service.store.append_match(date, placements)?;
                let processed = service.replay_capturing(Some(id))?;
                Ok((id, processed))
            })?
        } else {
            let processed = process_match(&participants, placements, date, &self.config)?;

            let id = self.transaction(|service| {
                for player in &created {
                    service.store.insert_player(player)?;
                }
                for player in &processed.ratings {
                    service.store.upsert_player(player)?;
                }

                Ok(service.store.append_match(date, placements)?)
            })?;

            (id, Some(processed))
        };

        info!(match_id = id, %date, participants = placements.len(), backdated, "Recorded match");
        processed.ok_or_else(|| RatingError::Store(StoreError::MatchNotFound(id)))
    }

    /// Removes a player and rewrites history without them.
    ///
    /// Remaining placements are re-ranked, matches left with fewer than two
    /// participants are deleted, and every rating is re-derived.
    pub fn remove_player(&mut self, name: &str) -> Result<(), RatingError> {
        self.transaction(|service| {
            service.store.remove_player(name)?;

            for entry in service.store.load_match_history()? {
                if !entry.contains(name) {
                    continue;
                }

                match (entry.without_participant(name), entry.id) {
                    (Some(filtered), _) => service.store.update_match(&filtered)?,
                    (None, Some(id)) => service.store.delete_match(id)?,
                    (None, None) => {}
                }
            }

            service.replay()
        })?;

        info!(player = name, "Removed player");
        Ok(())
    }

    /// Deletes a match and re-derives every rating.
    pub fn delete_match(&mut self, id: MatchId) -> Result<(), RatingError> {
        self.transaction(|service| {
            service.store.delete_match(id)?;
            service.replay()
        })?;

        info!(match_id = id, "Deleted match");
        Ok(())
    }

    pub fn rename_player(&mut self, old_name: &str, new_name: &str) -> Result<(), RatingError> {
        let new_name = checked_name(new_name)?;
        self.transaction(|service| Ok(service.store.rename_player(old_name, &new_name)?))
    }

    /// Re-derives every stored rating from the stored match history.
    pub fn recalculate(&mut self) -> Result<(), RatingError> {
        self.transaction(|service| service.replay())
    }

    pub fn leaderboard(&self) -> Result<Vec<Standing>, RatingError> {
        let mut tracker = RatingTracker::new();
        tracker.insert_or_update(&self.store.load_all_players()?);

        Ok(tracker.standings())
    }

    fn insert(&mut self, player: PlayerRating) -> Result<PlayerRating, RatingError> {
        self.transaction(|service| Ok(service.store.insert_player(&player)?))?;

        info!(player = player.name.as_str(), "Added player");
        Ok(player)
    }

    /// Resets every stored player to the defaults and replays the history.
    ///
    /// Participants only found in the history are stored as well.
    fn replay(&mut self) -> Result<(), RatingError> {
        self.replay_capturing(None).map(|_| ())
    }

    /// [`replay`](Self::replay), returning the result of the match with id `target`.
    fn replay_capturing(&mut self, target: Option<MatchId>) -> Result<Option<ProcessedMatch>, RatingError> {
        let history = self.store.load_match_history()?;
        let players = self.store.load_all_players()?;

        let Some(season_start) = replay_season_start(&history, &self.config)
            .or_else(|| players.iter().map(|p| p.season_start).min())
        else {
            return Ok(None);
        };

        let initial: Vec<PlayerRating> = players
            .iter()
            .map(|p| PlayerRating::new(p.name.clone(), p.season_start, &self.config))
            .collect();

        let mut model = GlickoModel::new(self.config.clone(), season_start, &initial);
        let mut captured = None;
        model.process_with(&history.iter().collect::<Vec<_>>(), |entry, processed| {
            if target.is_some() && entry.id == target {
                captured = Some(processed);
            }
        })?;

        for player in model.rating_tracker.ratings() {
            self.store.upsert_player(player)?;
        }

        Ok(captured)
    }

    fn transaction<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T, RatingError>) -> Result<T, RatingError> {
        self.store.begin()?;

        match op(self) {
            Ok(value) => {
                self.store.commit()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_error) = self.store.rollback() {
                    warn!(error = %rollback_error, "Rollback failed");
                }
                Err(e)
            }
        }
    }
}

fn checked_name(name: &str) -> Result<String, RatingError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RatingError::EmptyName);
    }

    Ok(name.to_string())
}
