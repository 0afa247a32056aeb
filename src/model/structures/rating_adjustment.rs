use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{player_rating::PlayerRating, rating_adjustment_type::RatingAdjustmentType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingAdjustment {
    pub name: String,
    pub adjustment_type: RatingAdjustmentType,
    pub date: NaiveDate,
    pub rating_before: f64,
    pub rating_after: f64,
    pub deviation_before: f64,
    pub deviation_after: f64,
    pub volatility_before: f64,
    pub volatility_after: f64
}

impl RatingAdjustment {
    pub fn between(
        before: &PlayerRating,
        after: &PlayerRating,
        adjustment_type: RatingAdjustmentType,
        date: NaiveDate
    ) -> RatingAdjustment {
        RatingAdjustment {
            name: after.name.clone(),
            adjustment_type,
            date,
            rating_before: before.rating,
            rating_after: after.rating,
            deviation_before: before.deviation,
            deviation_after: after.deviation,
            volatility_before: before.volatility,
            volatility_after: after.volatility
        }
    }

    /// The starting point of a player's history.
    pub fn initial(player: &PlayerRating, date: NaiveDate) -> RatingAdjustment {
        RatingAdjustment::between(player, player, RatingAdjustmentType::Initial, date)
    }

    pub fn rating_delta(&self) -> f64 {
        self.rating_after - self.rating_before
    }

    pub fn deviation_delta(&self) -> f64 {
        self.deviation_after - self.deviation_before
    }
}
