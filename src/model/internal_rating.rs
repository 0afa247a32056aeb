use crate::model::{
    config::RatingConfig,
    constants::{BASE_RATING, SCALING_FACTOR},
    structures::player_rating::PlayerRating
};

/// A rating and deviation on the internal Glicko-2 scale, where every formula
/// of the engine operates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InternalRating {
    pub mu: f64,
    pub phi: f64
}

impl InternalRating {
    pub fn from_public(rating: f64, deviation: f64) -> InternalRating {
        InternalRating {
            mu: (rating - BASE_RATING) / SCALING_FACTOR,
            phi: deviation / SCALING_FACTOR
        }
    }

    /// Converts back to the public `(rating, deviation)` pair. The deviation
    /// is clamped to the configured bounds.
    pub fn to_public(self, config: &RatingConfig) -> (f64, f64) {
        (
            self.mu * SCALING_FACTOR + BASE_RATING,
            config.clamp_deviation(self.phi * SCALING_FACTOR)
        )
    }
}

impl From<&PlayerRating> for InternalRating {
    fn from(player: &PlayerRating) -> InternalRating {
        InternalRating::from_public(player.rating, player.deviation)
    }
}

/// Converts a public-scale rating difference to the internal scale.
pub fn to_internal_difference(difference: f64) -> f64 {
    difference / SCALING_FACTOR
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_is_origin() {
        let internal = InternalRating::from_public(1500.0, 350.0);

        assert_abs_diff_eq!(internal.mu, 0.0);
        assert_abs_diff_eq!(internal.phi, 2.014761872416068, epsilon = 1e-9);
    }

    #[test]
    fn test_glickman_scale() {
        let internal = InternalRating::from_public(1400.0, 30.0);

        assert_abs_diff_eq!(internal.mu, -0.5756, epsilon = 1e-4);
        assert_abs_diff_eq!(internal.phi, 0.1727, epsilon = 1e-4);
    }

    #[test]
    fn test_round_trip_clamps_deviation() {
        let config = RatingConfig::default();
        let (rating, deviation) = InternalRating { mu: 1.0, phi: 3.0 }.to_public(&config);

        assert_abs_diff_eq!(rating, 1673.7178, epsilon = 1e-9);
        assert_eq!(deviation, 350.0);
    }
}
