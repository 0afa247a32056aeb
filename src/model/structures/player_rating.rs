use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{config::RatingConfig, error::RatingError};

/// One participant's rating parameters at a point in time.
///
/// Values are replaced, never edited, by match processing: every update
/// produces a fresh `PlayerRating`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRating {
    pub name: String,
    pub rating: f64,
    pub deviation: f64,
    pub volatility: f64,
    /// `None` until the first rated match
    pub last_played: Option<NaiveDate>,
    /// Matches already rated on `last_played`
    pub games_played_today: u32,
    pub games_played: u32,
    /// Decay reference point for players who have never played
    pub season_start: NaiveDate
}

impl PlayerRating {
    /// Creates a player with the configured default rating, deviation and volatility.
    pub fn new(name: impl Into<String>, season_start: NaiveDate, config: &RatingConfig) -> PlayerRating {
        PlayerRating {
            name: name.into(),
            rating: config.default_rating(),
            deviation: config.default_deviation(),
            volatility: config.default_volatility(),
            last_played: None,
            games_played_today: 0,
            games_played: 0,
            season_start
        }
    }

    /// Creates a player with an explicit starting state.
    ///
    /// Negative or non-finite deviations and non-positive volatilities are
    /// rejected; accepted values are clamped into the configured bounds.
    pub fn with_state(
        name: impl Into<String>,
        rating: f64,
        deviation: f64,
        volatility: f64,
        season_start: NaiveDate,
        config: &RatingConfig
    ) -> Result<PlayerRating, RatingError> {
        let player = PlayerRating {
            name: name.into(),
            rating,
            deviation,
            volatility,
            last_played: None,
            games_played_today: 0,
            games_played: 0,
            season_start
        };
        player.validate()?;

        Ok(PlayerRating {
            deviation: config.clamp_deviation(deviation),
            volatility: config.clamp_volatility(volatility),
            ..player
        })
    }

    /// Rejects non-finite ratings, negative deviations and non-positive volatilities.
    pub fn validate(&self) -> Result<(), RatingError> {
        let out_of_bounds = |field: &'static str, value: f64| RatingError::OutOfBoundsInput {
            name: self.name.clone(),
            field,
            value
        };

        if !self.rating.is_finite() {
            return Err(out_of_bounds("rating", self.rating));
        }

        if !self.deviation.is_finite() || self.deviation < 0.0 {
            return Err(out_of_bounds("deviation", self.deviation));
        }

        if !self.volatility.is_finite() || self.volatility <= 0.0 {
            return Err(out_of_bounds("volatility", self.volatility));
        }

        Ok(())
    }

    pub fn has_played(&self) -> bool {
        self.last_played.is_some()
    }

    /// True when no match has been rated for this player on `date` yet.
    pub fn is_first_match_on(&self, date: NaiveDate) -> bool {
        self.last_played != Some(date) || self.games_played_today == 0
    }
}

#[cfg(test)]
mod tests {
    use super::PlayerRating;
    use crate::model::{config::RatingConfig, error::RatingError};
    use chrono::NaiveDate;

    fn season_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = RatingConfig::default();
        let player = PlayerRating::new("alice", season_start(), &config);

        assert_eq!(player.rating, 1500.0);
        assert_eq!(player.deviation, 350.0);
        assert_eq!(player.volatility, 0.06);
        assert_eq!(player.last_played, None);
        assert_eq!(player.games_played_today, 0);
        assert!(!player.has_played());
    }

    #[test]
    fn test_rejects_negative_deviation() {
        let config = RatingConfig::default();
        let result = PlayerRating::with_state("bob", 1500.0, -1.0, 0.06, season_start(), &config);

        assert!(matches!(
            result,
            Err(RatingError::OutOfBoundsInput { field: "deviation", .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_volatility() {
        let config = RatingConfig::default();

        for volatility in [0.0, -0.06, f64::NAN] {
            let result = PlayerRating::with_state("bob", 1500.0, 200.0, volatility, season_start(), &config);
            assert!(matches!(
                result,
                Err(RatingError::OutOfBoundsInput { field: "volatility", .. })
            ));
        }
    }

    #[test]
    fn test_clamps_into_bounds() {
        let config = RatingConfig::default();
        let player = PlayerRating::with_state("carol", 1500.0, 10.0, 0.5, season_start(), &config).unwrap();

        assert_eq!(player.deviation, 30.0);
        assert_eq!(player.volatility, 0.15);
    }

    #[test]
    fn test_first_match_on() {
        let config = RatingConfig::default();
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut player = PlayerRating::new("dave", season_start(), &config);

        assert!(player.is_first_match_on(day));

        player.last_played = Some(day);
        player.games_played_today = 1;
        assert!(!player.is_first_match_on(day));
        assert!(player.is_first_match_on(day.succ_opt().unwrap()));
    }
}
