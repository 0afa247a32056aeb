use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use itertools::Itertools;
use tracing::{debug, warn};

use crate::model::{
    config::RatingConfig,
    decay::decay,
    error::{InvalidMatchReason, RatingError},
    internal_rating::InternalRating,
    outcome::OutcomeMatrix,
    rating_engine::{FieldContext, OpponentResult, RatingEngine},
    structures::{
        match_entry::Placement,
        player_rating::PlayerRating,
        processing::ProcessedMatch,
        rating_adjustment::RatingAdjustment,
        rating_adjustment_type::RatingAdjustmentType
    },
    tie_reconciler::{reconcile_ties, spread_deviations}
};

/// Phases a match moves through, strictly in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchPhase {
    Collecting,
    Snapshotting,
    Updating,
    Reconciling,
    Committed
}

/// Rates a single match.
///
/// Nothing outside the returned [`ProcessedMatch`] is touched, so a failure in
/// any phase leaves the caller's state as it was. Persisting the result is up
/// to the caller once the processor reaches [`MatchPhase::Committed`].
pub struct MatchProcessor<'a> {
    config: &'a RatingConfig,
    phase: MatchPhase
}

impl<'a> MatchProcessor<'a> {
    pub fn new(config: &'a RatingConfig) -> MatchProcessor<'a> {
        MatchProcessor {
            config,
            phase: MatchPhase::Collecting
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// # Match processing
    ///
    /// Steps:
    /// 1. Collecting: validate the placements and resolve every participant.
    /// 2. Snapshotting: apply inactivity decay and freeze every participant's
    ///     pre-match state. No update starts before all snapshots exist.
    /// 3. Updating: derive the outcome matrix and rate every participant
    ///     against the snapshots only, so participant order cannot bias results.
    /// 4. Reconciling: equalize tie groups and optionally spread deviations.
    /// 5. Committed: stamp play dates and counters, emit adjustments.
    pub fn process(
        &mut self,
        participants: &[PlayerRating],
        placements: &[Placement],
        date: NaiveDate
    ) -> Result<ProcessedMatch, RatingError> {
        self.run(participants, placements, date).inspect_err(|e| {
            warn!(phase = ?self.phase, %date, error = %e, "Aborting match");
        })
    }

    fn run(
        &mut self,
        participants: &[PlayerRating],
        placements: &[Placement],
        date: NaiveDate
    ) -> Result<ProcessedMatch, RatingError> {
        self.phase = MatchPhase::Collecting;
        validate_placements(placements, date)?;

        // Work in name order so the input order cannot change floating point summation.
        let order: Vec<usize> = (0..placements.len())
            .sorted_by(|a, b| placements[*a].name.cmp(&placements[*b].name))
            .collect();
        let canonical: Vec<Placement> = order.iter().map(|idx| placements[*idx].clone()).collect();

        let current = resolve_participants(participants, &canonical)?;
        for player in &current {
            player.validate()?;
        }
        let ranks: Vec<u32> = canonical.iter().map(|p| p.rank).collect();

        self.advance(MatchPhase::Snapshotting);
        let mut adjustments = Vec::new();
        let snapshot: Vec<PlayerRating> = current
            .iter()
            .map(|player| {
                let decayed = decay(player, date, self.config).unwrap_or_else(|| (*player).clone());
                if decayed.deviation != player.deviation {
                    adjustments.push(RatingAdjustment::between(
                        player,
                        &decayed,
                        RatingAdjustmentType::Decay,
                        date
                    ));
                }

                decayed
            })
            .collect();
        let first_today: Vec<bool> = snapshot.iter().map(|p| p.is_first_match_on(date)).collect();
        let internal: Vec<InternalRating> = snapshot.iter().map(InternalRating::from).collect();

        self.advance(MatchPhase::Updating);
        let matrix = OutcomeMatrix::new(&ranks, self.config.outcome_scoring());
        let field = FieldContext {
            size: snapshot.len(),
            tie_fraction: matrix.tie_fraction()
        };
        let engine = RatingEngine::new(self.config);

        let mut updated = snapshot
            .iter()
            .enumerate()
            .map(|(idx, player)| {
                let results: Vec<OpponentResult> = matrix
                    .opponents_of(idx)
                    .map(|(opponent, score)| OpponentResult {
                        opponent: internal[opponent],
                        score
                    })
                    .collect();

                engine.rate(player, first_today[idx], &results, field)
            })
            .collect::<Result<Vec<PlayerRating>, RatingError>>()?;

        self.advance(MatchPhase::Reconciling);
        reconcile_ties(&mut updated, &ranks);
        if let Some(damping) = self.config.rd_spread_damping() {
            spread_deviations(&mut updated, &ranks, damping, self.config);
        }

        self.advance(MatchPhase::Committed);
        for (before, after) in snapshot.iter().zip(updated.iter_mut()) {
            after.last_played = Some(date);
            after.games_played_today = before.games_played_today + 1;
            after.games_played = before.games_played + 1;

            adjustments.push(RatingAdjustment::between(before, after, RatingAdjustmentType::Match, date));
        }

        let mut ratings: Vec<(usize, PlayerRating)> = order.into_iter().zip(updated).collect();
        ratings.sort_by_key(|(idx, _)| *idx);

        Ok(ProcessedMatch {
            date,
            ratings: ratings.into_iter().map(|(_, rating)| rating).collect(),
            adjustments
        })
    }

    fn advance(&mut self, next: MatchPhase) {
        debug_assert!(next > self.phase, "match phases must advance in order");
        debug!(from = ?self.phase, to = ?next, "Match phase transition");
        self.phase = next;
    }
}

/// Convenience wrapper running a fresh [`MatchProcessor`].
pub fn process_match(
    participants: &[PlayerRating],
    placements: &[Placement],
    date: NaiveDate,
    config: &RatingConfig
) -> Result<ProcessedMatch, RatingError> {
    MatchProcessor::new(config).process(participants, placements, date)
}

/// Rejects matches with fewer than two participants, duplicates, or ranks outside `1..=N`.
pub fn validate_placements(placements: &[Placement], date: NaiveDate) -> Result<(), RatingError> {
    let invalid = |reason| RatingError::InvalidMatch { date, reason };
    let n = placements.len();

    let mut seen = HashSet::with_capacity(n);
    for placement in placements {
        if !seen.insert(placement.name.as_str()) {
            return Err(invalid(InvalidMatchReason::DuplicateParticipant(placement.name.clone())));
        }
    }

    if n < 2 {
        return Err(invalid(InvalidMatchReason::TooFewParticipants(n)));
    }

    if let Some(p) = placements.iter().find(|p| p.rank < 1 || p.rank as usize > n) {
        return Err(invalid(InvalidMatchReason::RankOutOfRange {
            name: p.name.clone(),
            rank: p.rank,
            participants: n
        }));
    }

    Ok(())
}

fn resolve_participants<'p>(
    participants: &'p [PlayerRating],
    placements: &[Placement]
) -> Result<Vec<&'p PlayerRating>, RatingError> {
    let by_name: HashMap<&str, &PlayerRating> = participants.iter().map(|p| (p.name.as_str(), p)).collect();

    placements
        .iter()
        .map(|placement| {
            by_name
                .get(placement.name.as_str())
                .copied()
                .ok_or_else(|| RatingError::UnknownParticipant(placement.name.clone()))
        })
        .collect()
}
