use crate::model::structures::{
    match_entry::{MatchEntry, Placement},
    player_rating::PlayerRating
};
use chrono::{Duration, NaiveDate};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

pub fn season_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

pub fn generate_player_rating(name: &str, rating: f64, deviation: f64) -> PlayerRating {
    PlayerRating {
        name: name.to_string(),
        rating,
        deviation,
        volatility: 0.06,
        last_played: None,
        games_played_today: 0,
        games_played: 0,
        season_start: season_start()
    }
}

pub fn generate_player_names(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("player-{i}")).collect()
}

pub fn generate_placement(name: &str, rank: u32) -> Placement {
    Placement::new(name, rank)
}

pub fn generate_match(id: u64, date: NaiveDate, placements: &[Placement]) -> MatchEntry {
    MatchEntry {
        id: Some(id),
        date,
        placements: placements.to_vec()
    }
}

/// `n` matches between random subsets of `names`, at most three per day.
///
/// Seeded so the same arguments always produce the same history. Roughly one
/// placement in five shares its rank with the participant ahead of it.
pub fn generate_matches(n: usize, names: &[String], start: NaiveDate) -> Vec<MatchEntry> {
    assert!(names.len() >= 2, "At least two players are needed to generate matches");

    // Initialize seeded RNG for reproducible results
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut matches = Vec::with_capacity(n);

    for i in 0..n {
        let date = start + Duration::days((i / 3) as i64);
        let size = rng.random_range(2..=names.len().min(8));

        let mut participants: Vec<&String> = names.iter().collect();
        participants.shuffle(&mut rng);
        participants.truncate(size);

        matches.push(generate_match(i as u64 + 1, date, &random_placements(&participants, &mut rng)));
    }

    matches
}

fn random_placements(participants: &[&String], rng: &mut ChaCha8Rng) -> Vec<Placement> {
    let mut placements: Vec<Placement> = Vec::with_capacity(participants.len());

    for (i, name) in participants.iter().enumerate() {
        let position = i as u32 + 1;
        let rank = match placements.last() {
            Some(previous) if rng.random_bool(0.2) => previous.rank,
            _ => position
        };

        placements.push(generate_placement(name, rank));
    }

    placements
}
