use std::{cmp::Ordering, collections::HashMap};

use indexmap::IndexMap;

use crate::model::structures::{
    player_rating::PlayerRating, rating_adjustment::RatingAdjustment, standing::Standing
};

pub struct RatingTracker {
    // Sorted by rating descending after every update, so a player's index is their rank - 1.
    leaderboard: IndexMap<String, PlayerRating>,
    adjustments: HashMap<String, Vec<RatingAdjustment>>
}

impl Default for RatingTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RatingTracker {
    pub fn new() -> RatingTracker {
        RatingTracker {
            leaderboard: IndexMap::new(),
            adjustments: HashMap::new()
        }
    }

    /// Inserts or replaces a set of player ratings, then sorts the leaderboard once.
    ///
    /// Ratings are assumed to be inserted on a per-match basis.
    pub fn insert_or_update(&mut self, ratings: &[PlayerRating]) {
        for rating in ratings {
            self.leaderboard.insert(rating.name.clone(), rating.clone());
        }

        self.sort();
    }

    /// Appends adjustments to each player's history.
    pub fn record_adjustments(&mut self, adjustments: &[RatingAdjustment]) {
        for adjustment in adjustments {
            self.adjustments
                .entry(adjustment.name.clone())
                .or_default()
                .push(adjustment.clone());
        }
    }

    /// Starts tracking a new player, recording their initial state.
    pub fn track_new(&mut self, player: &PlayerRating) {
        self.adjustments.insert(
            player.name.clone(),
            vec![RatingAdjustment::initial(player, player.season_start)]
        );
        self.insert_or_update(std::slice::from_ref(player));
    }

    pub fn remove(&mut self, name: &str) -> Option<PlayerRating> {
        self.adjustments.remove(name);
        self.leaderboard.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.leaderboard.contains_key(name)
    }

    /// Returns the current rating for the player.
    pub fn get_rating(&self, name: &str) -> Option<&PlayerRating> {
        self.leaderboard.get(name)
    }

    pub fn get_rating_adjustments(&self, name: &str) -> Option<&Vec<RatingAdjustment>> {
        self.adjustments.get(name)
    }

    /// 1-based position on the leaderboard.
    pub fn rank(&self, name: &str) -> Option<u32> {
        self.leaderboard.get_index_of(name).map(|idx| idx as u32 + 1)
    }

    pub fn len(&self) -> usize {
        self.leaderboard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaderboard.is_empty()
    }

    /// Every player, best rating first.
    pub fn ratings(&self) -> impl Iterator<Item = &PlayerRating> {
        self.leaderboard.values()
    }

    pub fn into_ratings(self) -> IndexMap<String, PlayerRating> {
        self.leaderboard
    }

    pub fn standings(&self) -> Vec<Standing> {
        let total = self.leaderboard.len() as u32;

        self.leaderboard
            .values()
            .zip(1..)
            .map(|(player, rank)| Standing {
                name: player.name.clone(),
                rank,
                percentile: RatingTracker::percentile(rank, total).unwrap_or_default(),
                rating: player.rating,
                deviation: player.deviation,
                volatility: player.volatility,
                games_played: player.games_played
            })
            .collect()
    }

    /// Sorts by rating descending. Equal ratings fall back to name order so
    /// ranks do not depend on insertion order.
    fn sort(&mut self) {
        self.leaderboard.sort_by(|k1, v1, k2, v2| {
            v2.rating
                .partial_cmp(&v1.rating)
                .unwrap_or(Ordering::Equal)
                .then_with(|| k1.cmp(k2))
        });
    }

    /// `P = (n/N) * 100`
    fn percentile(rank: u32, total: u32) -> Option<f64> {
        match rank.cmp(&1) {
            Ordering::Less => None,
            _ => {
                let n = total.saturating_sub(rank); // The number of players below the player
                Some(n as f64 / total as f64 * 100.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use crate::{
        model::{
            rating_tracker::RatingTracker,
            structures::{rating_adjustment::RatingAdjustment, rating_adjustment_type::RatingAdjustmentType}
        },
        utils::test_utils::{generate_player_rating, test_date}
    };

    #[test]
    fn test_track_player_initial_rating_and_match_update() {
        let mut rating_tracker = RatingTracker::new();

        let initial = generate_player_rating("alice", 1500.0, 350.0);
        rating_tracker.track_new(&initial);

        let player = rating_tracker.get_rating("alice").unwrap();
        let player_adjustments = rating_tracker.get_rating_adjustments("alice").unwrap();

        assert_eq!(player.name, "alice");
        assert_eq!(player_adjustments.len(), 1);
        assert_eq!(player_adjustments[0].adjustment_type, RatingAdjustmentType::Initial);

        let updated = generate_player_rating("alice", 1600.0, 300.0);
        rating_tracker.insert_or_update(std::slice::from_ref(&updated));
        rating_tracker.record_adjustments(&[RatingAdjustment::between(
            &initial,
            &updated,
            RatingAdjustmentType::Match,
            test_date()
        )]);

        let player = rating_tracker.get_rating("alice").unwrap();
        let player_adjustments = rating_tracker.get_rating_adjustments("alice").unwrap();

        assert_eq!(player.rating, 1600.0);
        assert_eq!(player.deviation, 300.0);

        assert_eq!(player_adjustments.len(), 2);
        assert_eq!(player_adjustments.last().unwrap().rating_delta(), 100.0);
        assert_eq!(player_adjustments.last().unwrap().deviation_delta(), -50.0);
    }

    #[test]
    fn test_leaderboard_update() {
        let mut rating_tracker = RatingTracker::new();
        let player_ratings = vec![
            generate_player_rating("low", 1400.0, 100.0),
            generate_player_rating("high", 1700.0, 100.0),
        ];

        rating_tracker.insert_or_update(&player_ratings);

        assert_eq!(rating_tracker.len(), 2);
        assert_abs_diff_eq!(rating_tracker.ratings().next().unwrap().rating, 1700.0);
        assert_eq!(rating_tracker.rank("high"), Some(1));
        assert_eq!(rating_tracker.rank("low"), Some(2));

        let standings = rating_tracker.standings();
        assert_eq!(standings[0].name, "high");
        assert_abs_diff_eq!(standings[0].percentile, 50.0);
        assert_abs_diff_eq!(standings[1].percentile, 0.0);
    }

    #[test]
    fn test_equal_ratings_ordered_by_name() {
        let mut rating_tracker = RatingTracker::new();
        rating_tracker.insert_or_update(&[
            generate_player_rating("zed", 1500.0, 100.0),
            generate_player_rating("amy", 1500.0, 100.0),
        ]);

        assert_eq!(rating_tracker.rank("amy"), Some(1));
        assert_eq!(rating_tracker.rank("zed"), Some(2));
    }

    #[test]
    fn test_remove() {
        let mut rating_tracker = RatingTracker::new();
        rating_tracker.track_new(&generate_player_rating("alice", 1500.0, 350.0));

        assert!(rating_tracker.remove("alice").is_some());
        assert!(!rating_tracker.contains("alice"));
        assert!(rating_tracker.get_rating_adjustments("alice").is_none());
        assert!(rating_tracker.is_empty());
    }

    #[test]
    fn test_percentile() {
        assert_eq!(RatingTracker::percentile(0, 10), None);

        assert_eq!(RatingTracker::percentile(1, 1), Some(0.0));

        assert_abs_diff_eq!(RatingTracker::percentile(1, 2).unwrap(), 50.0, epsilon = 0.0001);
        assert_abs_diff_eq!(RatingTracker::percentile(2, 2).unwrap(), 0.0, epsilon = 0.0001);

        assert_abs_diff_eq!(RatingTracker::percentile(1, 10).unwrap(), 90.0, epsilon = 0.0001);
        assert_abs_diff_eq!(RatingTracker::percentile(1, 1000).unwrap(), 99.9, epsilon = 0.0001);
    }
}
