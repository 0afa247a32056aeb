use chrono::NaiveDate;

use super::{player_rating::PlayerRating, rating_adjustment::RatingAdjustment};

/// Result of rating one match, ready to be committed.
#[derive(Debug, Clone)]
pub struct ProcessedMatch {
    pub date: NaiveDate,
    /// New states, in the order the placements were given
    pub ratings: Vec<PlayerRating>,
    /// Decay adjustments first, then one match adjustment per participant
    pub adjustments: Vec<RatingAdjustment>
}
