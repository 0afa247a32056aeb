mod common;

use approx::assert_abs_diff_eq;
use common::{day, service};
use glicko_processor::{
    database::{memory::InMemoryStore, store::RatingStore, store::StoreError},
    model::{
        config::RatingConfig,
        error::{InvalidMatchReason, RatingError},
        glicko_model::recalculate_all,
        structures::{match_entry::Placement, participant_policy::ParticipantPolicy}
    },
    service::RatingService
};

fn placements(names: &[(&str, u32)]) -> Vec<Placement> {
    names.iter().map(|(name, rank)| Placement::new(*name, *rank)).collect()
}

#[test]
fn test_record_match_persists_states_and_history() {
    let mut service = service(ParticipantPolicy::AutoCreate);

    let processed = service
        .record_match(day(0), &placements(&[("a", 1), ("b", 2), ("c", 3)]))
        .unwrap();

    assert_eq!(processed.ratings.len(), 3);
    for rated in &processed.ratings {
        assert_eq!(service.player(&rated.name).unwrap().as_ref(), Some(rated));
    }

    let history = service.store().load_match_history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, Some(1));
    assert!(!service.store().in_transaction());
}

#[test]
fn test_reject_unknown_leaves_store_untouched() {
    let mut service = service(ParticipantPolicy::RejectUnknown);
    service.add_player("a", day(0)).unwrap();

    let result = service.record_match(day(0), &placements(&[("a", 1), ("ghost", 2)]));

    assert!(matches!(result, Err(RatingError::UnknownParticipant(name)) if name == "ghost"));
    assert_eq!(service.player("a").unwrap().unwrap().games_played, 0);
    assert!(service.store().load_match_history().unwrap().is_empty());
}

#[test]
fn test_invalid_match_leaves_store_untouched() {
    let mut service = service(ParticipantPolicy::AutoCreate);

    let result = service.record_match(day(0), &placements(&[("a", 1), ("b", 1), ("a", 3)]));

    assert!(matches!(
        result,
        Err(RatingError::InvalidMatch {
            reason: InvalidMatchReason::DuplicateParticipant(_),
            ..
        })
    ));
    assert!(service.store().load_all_players().unwrap().is_empty());
}

#[test]
fn test_add_player_validation() {
    let mut service = service(ParticipantPolicy::AutoCreate);

    assert!(matches!(service.add_player("   ", day(0)), Err(RatingError::EmptyName)));

    service.add_player("alice", day(0)).unwrap();
    assert!(matches!(
        service.add_player("alice", day(0)),
        Err(RatingError::Store(StoreError::PlayerExists(_)))
    ));

    assert!(matches!(
        service.add_player_with_state("bob", 1500.0, -5.0, 0.06, day(0)),
        Err(RatingError::OutOfBoundsInput { field: "deviation", .. })
    ));
}

#[test]
fn test_recorded_matches_equal_full_replay() {
    let mut service = service(ParticipantPolicy::AutoCreate);

    service.record_match(day(0), &placements(&[("a", 1), ("b", 2), ("c", 2)])).unwrap();
    service.record_match(day(0), &placements(&[("c", 1), ("a", 2)])).unwrap();
    service.record_match(day(9), &placements(&[("b", 1), ("c", 2), ("a", 3)])).unwrap();
    service.record_match(day(30), &placements(&[("a", 1), ("b", 1), ("c", 1)])).unwrap();

    let history = service.store().load_match_history().unwrap();
    let replayed = recalculate_all(&history, service.config()).unwrap();

    for (name, expected) in &replayed {
        let stored = service.player(name).unwrap().unwrap();
        assert_abs_diff_eq!(stored.rating, expected.rating, epsilon = 1e-9);
        assert_abs_diff_eq!(stored.deviation, expected.deviation, epsilon = 1e-9);
        assert_abs_diff_eq!(stored.volatility, expected.volatility, epsilon = 1e-12);
        assert_eq!(stored.games_played, expected.games_played);
    }
}

#[test]
fn test_delete_match_replays_history() {
    let mut service = service(ParticipantPolicy::AutoCreate);
    service.record_match(day(0), &placements(&[("a", 1), ("b", 2)])).unwrap();
    service.record_match(day(1), &placements(&[("b", 1), ("a", 2)])).unwrap();

    service.delete_match(2).unwrap();

    let expected = recalculate_all(&service.store().load_match_history().unwrap(), service.config()).unwrap();
    assert_eq!(service.player("a").unwrap().as_ref(), expected.get("a"));
    assert_eq!(service.player("a").unwrap().unwrap().games_played, 1);

    assert!(matches!(
        service.delete_match(2),
        Err(RatingError::Store(StoreError::MatchNotFound(2)))
    ));
}

#[test]
fn test_remove_player_rewrites_history() {
    let mut service = service(ParticipantPolicy::AutoCreate);
    service.record_match(day(0), &placements(&[("a", 1), ("b", 2), ("c", 3)])).unwrap();
    service.record_match(day(1), &placements(&[("a", 1), ("b", 2)])).unwrap();

    service.remove_player("a").unwrap();

    let history = service.store().load_match_history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].placements, placements(&[("b", 1), ("c", 2)]));
    assert!(service.player("a").unwrap().is_none());

    let b = service.player("b").unwrap().unwrap();
    assert_eq!(b.games_played, 1);
    assert!(b.rating > 1500.0);
}

#[test]
fn test_remove_unknown_player_rolls_back() {
    let mut service = service(ParticipantPolicy::AutoCreate);
    service.record_match(day(0), &placements(&[("a", 1), ("b", 2)])).unwrap();

    assert!(matches!(
        service.remove_player("zed"),
        Err(RatingError::Store(StoreError::PlayerNotFound(_)))
    ));
    assert_eq!(service.store().load_match_history().unwrap().len(), 1);
    assert!(!service.store().in_transaction());
}

#[test]
fn test_rename_player() {
    let mut service = service(ParticipantPolicy::AutoCreate);
    service.record_match(day(0), &placements(&[("a", 1), ("b", 2)])).unwrap();
    let before = service.player("a").unwrap().unwrap();

    service.rename_player("a", "alpha").unwrap();

    let renamed = service.player("alpha").unwrap().unwrap();
    assert_eq!(renamed.rating, before.rating);
    assert_eq!(service.store().load_match_history().unwrap()[0].placements[0].name, "alpha");

    service.recalculate().unwrap();
    assert_abs_diff_eq!(service.player("alpha").unwrap().unwrap().rating, before.rating, epsilon = 1e-9);
}

#[test]
fn test_leaderboard() {
    let mut service = service(ParticipantPolicy::AutoCreate);
    service.record_match(day(0), &placements(&[("a", 1), ("b", 2), ("c", 3)])).unwrap();

    let leaderboard = service.leaderboard().unwrap();
    let names: Vec<&str> = leaderboard.iter().map(|s| s.name.as_str()).collect();

    assert_eq!(names, vec!["a", "b", "c"]);
    assert_eq!(leaderboard[0].rank, 1);
    assert_abs_diff_eq!(leaderboard[0].percentile, 200.0 / 3.0, epsilon = 1e-9);
}

#[test]
fn test_recalculate_seeded_store() {
    common::init_test_env();
    let history = glicko_processor::utils::test_utils::generate_matches(
        25,
        &glicko_processor::utils::test_utils::generate_player_names(6),
        day(0)
    );
    let config = RatingConfig::default();
    let expected = recalculate_all(&history, &config).unwrap();

    let mut service = RatingService::new(
        InMemoryStore::with_history(history),
        config,
        ParticipantPolicy::AutoCreate
    );
    service.recalculate().unwrap();

    let stored = service.store().load_all_players().unwrap();
    assert_eq!(stored.len(), expected.len());
    for player in stored {
        assert_eq!(expected.get(&player.name), Some(&player));
    }
}

#[test]
fn test_backdated_match_replays_history() {
    let mut service = service(ParticipantPolicy::AutoCreate);
    service.record_match(day(30), &placements(&[("a", 1), ("b", 2)])).unwrap();

    let processed = service.record_match(day(0), &placements(&[("a", 1), ("b", 2)])).unwrap();
    assert!(processed.ratings.iter().all(|rated| rated.last_played == Some(day(0))));

    let history = service.store().load_match_history().unwrap();
    assert_eq!(history[0].date, day(0));
    let replayed = recalculate_all(&history, service.config()).unwrap();

    for (name, expected) in &replayed {
        let stored = service.player(name).unwrap().unwrap();
        assert_eq!(stored.last_played, Some(day(30)));
        assert_eq!(stored.last_played, expected.last_played);
        assert_eq!(stored.games_played, expected.games_played);
        assert_abs_diff_eq!(stored.rating, expected.rating, epsilon = 1e-9);
        assert_abs_diff_eq!(stored.deviation, expected.deviation, epsilon = 1e-9);
        assert_abs_diff_eq!(stored.volatility, expected.volatility, epsilon = 1e-12);
    }
    assert!(!service.store().in_transaction());
}
