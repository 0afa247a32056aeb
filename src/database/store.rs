use chrono::NaiveDate;
use thiserror::Error;

use crate::model::structures::{
    match_entry::{MatchEntry, MatchId, Placement},
    player_rating::PlayerRating
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("player '{0}' does not exist")]
    PlayerNotFound(String),

    #[error("player '{0}' already exists")]
    PlayerExists(String),

    #[error("match {0} does not exist")]
    MatchNotFound(MatchId),

    #[error("no transaction is open")]
    NoTransaction,

    #[error("a transaction is already open")]
    TransactionInProgress
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for player states and match history.
///
/// Writes made between [`begin`](RatingStore::begin) and
/// [`commit`](RatingStore::commit) become visible together, or not at all
/// after [`rollback`](RatingStore::rollback).
pub trait RatingStore {
    fn load_all_players(&self) -> StoreResult<Vec<PlayerRating>>;
    fn load_player_by_name(&self, name: &str) -> StoreResult<Option<PlayerRating>>;
    /// Fails with [`StoreError::PlayerExists`] when the name is taken.
    fn insert_player(&mut self, player: &PlayerRating) -> StoreResult<()>;
    fn upsert_player(&mut self, player: &PlayerRating) -> StoreResult<()>;
    /// Removes the player record. Match history is left untouched.
    fn remove_player(&mut self, name: &str) -> StoreResult<()>;
    /// Renames the player record and every placement that references it.
    fn rename_player(&mut self, old_name: &str, new_name: &str) -> StoreResult<()>;

    fn append_match(&mut self, date: NaiveDate, placements: &[Placement]) -> StoreResult<MatchId>;
    /// Replaces the stored placements and date of an existing match.
    fn update_match(&mut self, entry: &MatchEntry) -> StoreResult<()>;
    /// Every stored match, ordered by date then id.
    fn load_match_history(&self) -> StoreResult<Vec<MatchEntry>>;
    /// Deletes a match together with its placements.
    fn delete_match(&mut self, id: MatchId) -> StoreResult<()>;

    fn begin(&mut self) -> StoreResult<()>;
    fn commit(&mut self) -> StoreResult<()>;
    fn rollback(&mut self) -> StoreResult<()>;
}
