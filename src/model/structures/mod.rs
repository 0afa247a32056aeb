pub mod cap_scope;
pub mod decay_resolution;
pub mod match_entry;
pub mod outcome_scoring;
pub mod player_rating;
pub mod processing;
pub mod rating_adjustment;
pub mod rating_adjustment_type;
pub mod same_day_mode;
pub mod standing;
pub mod participant_policy;
