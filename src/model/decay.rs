use chrono::NaiveDate;
use tracing::{trace, warn};

use crate::model::{
    config::RatingConfig,
    internal_rating::InternalRating,
    structures::{decay_resolution::DecayResolution, player_rating::PlayerRating}
};

/// # How this works
/// - This gets called by the match processor for every participant before any
///     outcome is computed, with D being the match date.
/// - The player's reference date T is their last play date, or the season
///     start when they have never played.
/// - The elapsed units are (D - T) in days, or whole weeks depending on
///     [`DecayResolution`].
/// - Deviation grows as `phi* = sqrt(phi^2 + sigma^2 * units)` on the internal
///     scale and is clamped to the configured maximum.
///
/// # Rules
/// - Nothing happens when the player already played on D. In that case
///     `None` is returned.
/// - Otherwise the daily game counter is reset, even when no time unit
///     elapsed.
/// - Weekly decay never applies to a player without a prior match.
pub fn decay(player: &PlayerRating, current_date: NaiveDate, config: &RatingConfig) -> Option<PlayerRating> {
    if player.last_played == Some(current_date) {
        return None;
    }

    let mut decayed = player.clone();
    decayed.games_played_today = 0;

    let units = elapsed_units(player, current_date, config.decay_resolution());
    if units > 0 {
        decayed.deviation = decay_deviation(player.deviation, player.volatility, units, config);
        trace!(
            player = player.name.as_str(),
            units,
            before = player.deviation,
            after = decayed.deviation,
            "Applied inactivity decay"
        );
    }

    Some(decayed)
}

/// The number of decay units between the player's reference date and `current_date`.
fn elapsed_units(player: &PlayerRating, current_date: NaiveDate, resolution: DecayResolution) -> i64 {
    if decay_impossible(player, resolution) {
        return 0;
    }

    let reference = last_play_date(player);
    let days = (current_date - reference).num_days();

    if days < 0 {
        warn!(
            player = player.name.as_str(),
            %reference,
            %current_date,
            "Match predates the player's reference date, skipping decay"
        );
        return 0;
    }

    resolution.units(days)
}

fn last_play_date(player: &PlayerRating) -> NaiveDate {
    player.last_played.unwrap_or(player.season_start)
}

fn decay_impossible(player: &PlayerRating, resolution: DecayResolution) -> bool {
    resolution == DecayResolution::Weeks && !player.has_played()
}

fn decay_deviation(deviation: f64, volatility: f64, units: i64, config: &RatingConfig) -> f64 {
    let internal = InternalRating::from_public(0.0, deviation);
    let phi_star = (internal.phi.powi(2) + volatility.powi(2) * units as f64).sqrt();

    let (_, new_deviation) = InternalRating {
        phi: phi_star,
        ..internal
    }
    .to_public(config);

    new_deviation
}
