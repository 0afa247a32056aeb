#![allow(dead_code)]

use std::sync::Once;

use chrono::NaiveDate;
use glicko_processor::{
    database::memory::InMemoryStore,
    model::{config::RatingConfig, structures::participant_policy::ParticipantPolicy},
    service::RatingService
};

static INIT: Once = Once::new();

/// Initialize test environment with RUST_LOG=WARN
pub fn init_test_env() {
    INIT.call_once(|| {
        std::env::set_var("RUST_LOG", "warn");
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

pub fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap() + chrono::Duration::days(offset)
}

pub fn service(policy: ParticipantPolicy) -> RatingService<InMemoryStore> {
    init_test_env();
    RatingService::new(InMemoryStore::new(), RatingConfig::default(), policy)
}
