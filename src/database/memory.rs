use std::collections::BTreeMap;

use chrono::NaiveDate;
use indexmap::IndexMap;
use tracing::debug;

use crate::{
    database::store::{RatingStore, StoreError, StoreResult},
    model::{
        glicko_model::chronological,
        structures::{
            match_entry::{MatchEntry, MatchId, Placement},
            player_rating::PlayerRating
        }
    }
};

#[derive(Debug, Clone, Default, PartialEq)]
struct StoreState {
    players: IndexMap<String, PlayerRating>,
    matches: BTreeMap<MatchId, MatchEntry>,
    next_match_id: MatchId
}

/// A [`RatingStore`] held entirely in memory.
///
/// `begin` snapshots the whole state and `rollback` restores it.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: StoreState,
    snapshot: Option<StoreState>
}

impl InMemoryStore {
    pub fn new() -> InMemoryStore {
        InMemoryStore::default()
    }

    /// A store seeded with `history`. Matches without an id are assigned one
    /// after the highest existing id, in input order.
    pub fn with_history(history: Vec<MatchEntry>) -> InMemoryStore {
        let mut next_match_id = history.iter().filter_map(|entry| entry.id).max().unwrap_or(0) + 1;
        let mut matches = BTreeMap::new();

        for mut entry in history {
            let id = *entry.id.get_or_insert_with(|| {
                let id = next_match_id;
                next_match_id += 1;
                id
            });
            matches.insert(id, entry);
        }

        InMemoryStore {
            state: StoreState {
                players: IndexMap::new(),
                matches,
                next_match_id
            },
            snapshot: None
        }
    }

    pub fn in_transaction(&self) -> bool {
        self.snapshot.is_some()
    }

    fn player_mut(&mut self, name: &str) -> StoreResult<&mut PlayerRating> {
        self.state
            .players
            .get_mut(name)
            .ok_or_else(|| StoreError::PlayerNotFound(name.to_string()))
    }
}

impl RatingStore for InMemoryStore {
    fn load_all_players(&self) -> StoreResult<Vec<PlayerRating>> {
        Ok(self.state.players.values().cloned().collect())
    }

    fn load_player_by_name(&self, name: &str) -> StoreResult<Option<PlayerRating>> {
        Ok(self.state.players.get(name).cloned())
    }

    fn insert_player(&mut self, player: &PlayerRating) -> StoreResult<()> {
        if self.state.players.contains_key(&player.name) {
            return Err(StoreError::PlayerExists(player.name.clone()));
        }

        self.state.players.insert(player.name.clone(), player.clone());
        Ok(())
    }

    fn upsert_player(&mut self, player: &PlayerRating) -> StoreResult<()> {
        self.state.players.insert(player.name.clone(), player.clone());
        Ok(())
    }

    fn remove_player(&mut self, name: &str) -> StoreResult<()> {
        self.state
            .players
            .shift_remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::PlayerNotFound(name.to_string()))
    }

    fn rename_player(&mut self, old_name: &str, new_name: &str) -> StoreResult<()> {
        if old_name == new_name {
            return self.player_mut(old_name).map(|_| ());
        }

        if self.state.players.contains_key(new_name) {
            return Err(StoreError::PlayerExists(new_name.to_string()));
        }

        let mut player = self
            .state
            .players
            .shift_remove(old_name)
            .ok_or_else(|| StoreError::PlayerNotFound(old_name.to_string()))?;
        player.name = new_name.to_string();
        self.state.players.insert(player.name.clone(), player);

        for placement in self
            .state
            .matches
            .values_mut()
            .flat_map(|entry| entry.placements.iter_mut())
            .filter(|placement| placement.name == old_name)
        {
            placement.name = new_name.to_string();
        }

        Ok(())
    }

    fn append_match(&mut self, date: NaiveDate, placements: &[Placement]) -> StoreResult<MatchId> {
        let id = self.state.next_match_id.max(1);
        self.state.next_match_id = id + 1;

        self.state.matches.insert(
            id,
            MatchEntry {
                id: Some(id),
                date,
                placements: placements.to_vec()
            }
        );

        Ok(id)
    }

    fn update_match(&mut self, entry: &MatchEntry) -> StoreResult<()> {
        let id = entry.id.ok_or(StoreError::MatchNotFound(0))?;
        let stored = self.state.matches.get_mut(&id).ok_or(StoreError::MatchNotFound(id))?;

        stored.date = entry.date;
        stored.placements = entry.placements.clone();
        Ok(())
    }

    fn load_match_history(&self) -> StoreResult<Vec<MatchEntry>> {
        let history: Vec<MatchEntry> = self.state.matches.values().cloned().collect();
        Ok(chronological(&history).into_iter().cloned().collect())
    }

    fn delete_match(&mut self, id: MatchId) -> StoreResult<()> {
        self.state
            .matches
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::MatchNotFound(id))
    }

    fn begin(&mut self) -> StoreResult<()> {
        if self.snapshot.is_some() {
            return Err(StoreError::TransactionInProgress);
        }

        debug!("BEGIN");
        self.snapshot = Some(self.state.clone());
        Ok(())
    }

    fn commit(&mut self) -> StoreResult<()> {
        self.snapshot.take().ok_or(StoreError::NoTransaction)?;

        debug!("COMMIT");
        Ok(())
    }

    fn rollback(&mut self) -> StoreResult<()> {
        self.state = self.snapshot.take().ok_or(StoreError::NoTransaction)?;

        debug!("ROLLBACK");
        Ok(())
    }
}
