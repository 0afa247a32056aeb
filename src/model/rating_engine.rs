use std::f64::consts::PI;

use tracing::debug;

use crate::model::{
    config::RatingConfig,
    error::RatingError,
    internal_rating::{to_internal_difference, InternalRating},
    structures::{cap_scope::CapScope, player_rating::PlayerRating, same_day_mode::SameDayMode},
    volatility::VolatilitySolver
};

/// One opponent as seen from the pre-match snapshot, with the participant's score against them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpponentResult {
    pub opponent: InternalRating,
    pub score: f64
}

/// Match-wide facts that scale a participant's update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldContext {
    pub size: usize,
    pub tie_fraction: f64
}

/// Discounts an opponent's contribution by their own uncertainty.
pub fn g(phi: f64) -> f64 {
    1.0 / (1.0 + 3.0 * phi.powi(2) / PI.powi(2)).sqrt()
}

/// Expected score of a player at `mu` against `opponent`.
pub fn expected_score(mu: f64, opponent: &InternalRating) -> f64 {
    1.0 / (1.0 + (-g(opponent.phi) * (mu - opponent.mu)).exp())
}

pub struct RatingEngine<'a> {
    config: &'a RatingConfig,
    solver: VolatilitySolver
}

impl<'a> RatingEngine<'a> {
    pub fn new(config: &'a RatingConfig) -> RatingEngine<'a> {
        RatingEngine {
            config,
            solver: VolatilitySolver::new(config)
        }
    }

    /// # Rating update
    ///
    /// Produces the participant's new state from their pre-match snapshot and
    /// their results against every opponent's pre-match snapshot.
    ///
    /// When same-day gating is enabled and this is not the participant's first
    /// match of the day, only the rating is nudged. Otherwise the full
    /// Glicko-2 step runs:
    /// 1. Variance `v` and improvement `delta` from the opponent results.
    /// 2. New volatility from [`VolatilitySolver`].
    /// 3. `phi* = sqrt(phi^2 + sigma'^2)`, `phi' = 1/sqrt(1/phi*^2 + 1/v)`.
    /// 4. `mu' = mu + phi'^2 * sum(g * (score - E))`, capped to the maximum change.
    pub fn rate(
        &self,
        participant: &PlayerRating,
        is_first_match_today: bool,
        results: &[OpponentResult],
        field: FieldContext
    ) -> Result<PlayerRating, RatingError> {
        if results.is_empty() {
            return Ok(participant.clone());
        }

        let lightweight =
            self.config.same_day_mode() == SameDayMode::FirstGameFullRestLightweight && !is_first_match_today;

        let updated = if lightweight {
            self.lightweight_update(participant, results)
        } else {
            self.full_update(participant, results, field)?
        };

        debug!(
            player = participant.name.as_str(),
            lightweight,
            rating_before = participant.rating,
            rating_after = updated.rating,
            deviation_after = updated.deviation,
            volatility_after = updated.volatility,
            "Rated participant"
        );

        Ok(updated)
    }

    fn full_update(
        &self,
        participant: &PlayerRating,
        results: &[OpponentResult],
        field: FieldContext
    ) -> Result<PlayerRating, RatingError> {
        let InternalRating { mu, phi } = InternalRating::from(participant);

        let mut variance_inv = 0.0;
        let mut score_sum = 0.0;
        for result in results {
            let g_phi = g(result.opponent.phi);
            let e = expected_score(mu, &result.opponent);

            variance_inv += g_phi.powi(2) * e * (1.0 - e);
            score_sum += g_phi * (result.score - e);
        }

        let mut v = 1.0 / variance_inv;
        if !(v.is_finite() && v > 0.0) {
            return Err(RatingError::IllConditioned {
                participant: participant.name.clone()
            });
        }

        if self.config.tie_variance_inflation() {
            v *= 1.0 + field.tie_fraction;
        }

        let mut delta = v * score_sum;
        if self.config.field_size_scaling() {
            delta /= field_scale(field.size);
        }

        let volatility = self
            .solver
            .solve(phi, participant.volatility, v, delta)
            .map_err(|source| RatingError::SolverNonConvergence {
                participant: participant.name.clone(),
                source
            })?;

        let phi_star = (phi.powi(2) + volatility.powi(2)).sqrt();
        let phi_prime = 1.0 / (1.0 / phi_star.powi(2) + 1.0 / v).sqrt();
        let mut mu_prime = mu + phi_prime.powi(2) * score_sum;

        if self.is_capped(participant) {
            let mut cap = to_internal_difference(self.config.rating_change_cap());
            if self.config.field_size_scaling() {
                cap *= field_scale(field.size);
            }

            mu_prime = mu_prime.clamp(mu - cap, mu + cap);
        }

        let (rating, deviation) = InternalRating {
            mu: mu_prime,
            phi: phi_prime
        }
        .to_public(self.config);

        Ok(PlayerRating {
            rating,
            deviation,
            volatility,
            ..participant.clone()
        })
    }

    /// Moves the rating only, using the current deviation as the step size.
    /// Every opponent term is evaluated against the pre-match rating.
    fn lightweight_update(&self, participant: &PlayerRating, results: &[OpponentResult]) -> PlayerRating {
        let InternalRating { mu, phi } = InternalRating::from(participant);

        let nudge: f64 = results
            .iter()
            .map(|result| phi.powi(2) * g(result.opponent.phi) * (result.score - expected_score(mu, &result.opponent)))
            .sum();

        let (rating, _) = InternalRating { mu: mu + nudge, phi }.to_public(self.config);

        PlayerRating {
            rating,
            ..participant.clone()
        }
    }

    fn is_capped(&self, participant: &PlayerRating) -> bool {
        match self.config.cap_scope() {
            CapScope::EveryMatch => true,
            CapScope::FirstMatchOnly => !participant.has_played()
        }
    }
}

fn field_scale(size: usize) -> f64 {
    (size.saturating_sub(1).max(1) as f64).sqrt()
}
