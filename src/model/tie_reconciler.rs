use crate::model::{config::RatingConfig, outcome::tie_groups, structures::player_rating::PlayerRating};

/// Gives every member of a tie group the group's mean rating and deviation.
///
/// `ratings` and `ranks` are parallel slices. Volatility stays individual.
pub fn reconcile_ties(ratings: &mut [PlayerRating], ranks: &[u32]) {
    for members in tie_groups(ranks).values().filter(|members| members.len() > 1) {
        let count = members.len() as f64;
        let rating = members.iter().map(|idx| ratings[*idx].rating).sum::<f64>() / count;
        let deviation = members.iter().map(|idx| ratings[*idx].deviation).sum::<f64>() / count;

        for idx in members {
            ratings[*idx].rating = rating;
            ratings[*idx].deviation = deviation;
        }
    }
}

/// Spreads the deviations of untied participants linearly across the field's
/// deviation range in finishing order, scaled by `damping`.
pub fn spread_deviations(ratings: &mut [PlayerRating], ranks: &[u32], damping: f64, config: &RatingConfig) {
    if ratings.len() < 2 {
        return;
    }

    let min = ratings.iter().map(|r| r.deviation).fold(f64::INFINITY, f64::min);
    let max = ratings.iter().map(|r| r.deviation).fold(f64::NEG_INFINITY, f64::max);
    let step = (max - min) / (ratings.len() - 1) as f64;

    let groups = tie_groups(ranks);
    let mut order: Vec<usize> = (0..ratings.len()).collect();
    order.sort_by_key(|idx| ranks[*idx]);

    for (position, idx) in order.into_iter().enumerate() {
        if groups[&ranks[idx]].len() > 1 {
            continue;
        }

        ratings[idx].deviation = config.clamp_deviation(min + position as f64 * step * damping);
    }
}

#[cfg(test)]
mod tests {
    use super::{reconcile_ties, spread_deviations};
    use crate::model::{config::RatingConfig, structures::player_rating::PlayerRating};
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    fn player(name: &str, rating: f64, deviation: f64, volatility: f64) -> PlayerRating {
        PlayerRating {
            name: name.to_string(),
            rating,
            deviation,
            volatility,
            last_played: None,
            games_played_today: 0,
            games_played: 0,
            season_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        }
    }

    #[test]
    fn test_reconcile_pair() {
        let mut ratings = vec![
            player("a", 1510.0, 100.0, 0.06),
            player("b", 1530.0, 120.0, 0.07),
            player("c", 1400.0, 80.0, 0.06),
        ];

        reconcile_ties(&mut ratings, &[1, 1, 3]);

        assert_eq!(ratings[0].rating.to_bits(), ratings[1].rating.to_bits());
        assert_eq!(ratings[0].deviation.to_bits(), ratings[1].deviation.to_bits());
        assert_abs_diff_eq!(ratings[0].rating, 1520.0);
        assert_abs_diff_eq!(ratings[0].deviation, 110.0);
        assert_eq!(ratings[0].volatility, 0.06);
        assert_eq!(ratings[1].volatility, 0.07);
        assert_eq!(ratings[2].rating, 1400.0);
    }

    #[test]
    fn test_reconcile_without_ties_is_noop() {
        let mut ratings = vec![player("a", 1510.0, 100.0, 0.06), player("b", 1530.0, 120.0, 0.06)];
        let before = ratings.clone();

        reconcile_ties(&mut ratings, &[1, 2]);

        assert_eq!(ratings, before);
    }

    #[test]
    fn test_spread_deviations() {
        let config = RatingConfig::default();
        let mut ratings = vec![
            player("c", 1400.0, 200.0, 0.06),
            player("a", 1600.0, 100.0, 0.06),
            player("b", 1500.0, 150.0, 0.06),
        ];

        spread_deviations(&mut ratings, &[3, 1, 2], 0.7, &config);

        assert_abs_diff_eq!(ratings[1].deviation, 100.0);
        assert_abs_diff_eq!(ratings[2].deviation, 135.0);
        assert_abs_diff_eq!(ratings[0].deviation, 170.0);
    }

    #[test]
    fn test_spread_skips_tied() {
        let config = RatingConfig::default();
        let mut ratings = vec![
            player("a", 1600.0, 120.0, 0.06),
            player("b", 1600.0, 120.0, 0.06),
            player("c", 1400.0, 200.0, 0.06),
        ];

        spread_deviations(&mut ratings, &[1, 1, 3], 0.7, &config);

        assert_eq!(ratings[0].deviation, 120.0);
        assert_eq!(ratings[1].deviation, 120.0);
        assert_abs_diff_eq!(ratings[2].deviation, 120.0 + 2.0 * 40.0 * 0.7);
    }
}
